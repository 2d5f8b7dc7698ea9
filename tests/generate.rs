//! End-to-end generation from dataset schemas.
//!
//! These tests load the sample schemas from `tests/samples`, run the generator front end and
//! check both the produced code document and its C# rendering.

use dsgen::{prelude::*, codegen::DEFAULT_DATASET_NAME};
use std::path::PathBuf;

fn read_sample(name: &str) -> Result<String> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/samples")
        .join(name);
    Ok(std::fs::read_to_string(path)?)
}

fn generate(
    schema: &str,
    options: GenerateOption,
) -> Result<(GenerationResult, CodeCompileUnit, String)> {
    let emitter = CSharpEmitter::new();
    let mut unit = CodeCompileUnit::default();
    let mut namespace = CodeNamespace::new("Northwind.Data");
    let result = TypedDataSetGenerator::new()
        .options(options)
        .generate(schema, &mut unit, &mut namespace, &emitter)?;
    unit.namespaces.insert(0, namespace);
    let code = emitter.emit_compile_unit(&unit)?;
    Ok((result, unit, code))
}

#[test]
fn minimal_schema_generates_with_core_references() -> Result<()> {
    let schema = r#"<xs:schema id="Contacts" xmlns:xs="http://www.w3.org/2001/XMLSchema"
                     xmlns:msdata="urn:schemas-microsoft-com:xml-msdata">
      <xs:element name="Contacts" msdata:IsDataSet="true">
        <xs:complexType>
          <xs:choice maxOccurs="unbounded">
            <xs:element name="People">
              <xs:complexType>
                <xs:sequence>
                  <xs:element name="Name" type="xs:string" minOccurs="0"/>
                </xs:sequence>
              </xs:complexType>
            </xs:element>
          </xs:choice>
        </xs:complexType>
      </xs:element>
    </xs:schema>"#;

    let (result, unit, code) = generate(schema, GenerateOption::empty())?;
    assert_eq!(result.dataset_name, "Contacts");

    let names: Vec<&str> = result
        .referenced_assemblies
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert!(names.starts_with(&["System", "System.Data", "System.Xml"]));
    assert!(result.extension_assembly.is_none());
    assert!(unit
        .referenced_assemblies
        .iter()
        .any(|r| r == "System.Data.dll"));

    assert!(code.contains("partial class Contacts"));
    assert!(code.contains("PeopleDataTable"));
    assert!(code.contains("PeopleRow"));
    assert!(code.contains("using System.Data;"));
    Ok(())
}

#[test]
fn empty_schema_is_an_argument_error() {
    let mut unit = CodeCompileUnit::default();
    let mut namespace = CodeNamespace::new("Empty");
    let result =
        TypedDataSetGenerator::new().generate("", &mut unit, &mut namespace, &CSharpEmitter::new());
    match result {
        Err(error) => {
            assert!(error.is_argument_error());
            assert!(matches!(error, Error::ArgumentEmpty("input_file_content")));
        }
        Ok(_) => panic!("empty schema must be rejected"),
    }
    assert!(namespace.types.is_empty());
    assert!(unit.namespaces.is_empty());
}

#[test]
fn unreadable_schema_reports_the_cause() {
    let mut unit = CodeCompileUnit::default();
    let mut namespace = CodeNamespace::new("Broken");
    let result = TypedDataSetGenerator::new().generate(
        "<xs:schema xmlns:xs=\"http://www.w3.org/2001/XMLSchema\"><xs:element",
        &mut unit,
        &mut namespace,
        &CSharpEmitter::new(),
    );
    match result {
        Err(Error::SchemaConversion(message)) => assert!(!message.is_empty()),
        other => panic!("unexpected {:?}", other.map(|r| r.dataset_name)),
    }
}

#[test]
fn northwind_with_adapters_and_manager() -> Result<()> {
    let schema = read_sample("northwind.xsd")?;
    let (result, unit, code) = generate(&schema, GenerateOption::HIERARCHICAL_UPDATE)?;
    assert_eq!(result.dataset_name, "NorthwindDataSet");

    let adapters = unit
        .namespace("Northwind.Data.NorthwindDataSetTableAdapters")
        .expect("table adapter namespace");
    for name in [
        "CustomersTableAdapter",
        "OrdersTableAdapter",
        "QueriesTableAdapter",
        "TableAdapterManager",
    ] {
        assert!(adapters.type_named(name).is_some(), "missing {}", name);
    }

    assert!(code.contains("partial class NorthwindDataSet"));
    assert!(code.contains("FillByCity("));
    assert!(code.contains("GetDataByCity("));
    assert!(code.contains("GetCityPage("));
    assert!(code.contains("CountByCity("));
    assert!(code.contains("CustomerCount("));
    assert!(code.contains("UpdateAll("));
    assert!(code.contains("FindByCustomerID("));
    assert!(code.contains("GetOrdersRows("));
    assert!(code.contains("global::Northwind.Properties.Settings.Default.NorthwindConnectionString"));
    Ok(())
}

#[test]
fn linq_option_changes_table_base_and_references() -> Result<()> {
    let schema = read_sample("northwind.xsd")?;
    let (plain, _, plain_code) = generate(&schema, GenerateOption::empty())?;
    let (linq, _, linq_code) = generate(&schema, GenerateOption::LINQ_OVER_TYPED_DATASETS)?;

    assert!(plain.extension_assembly.is_none());
    assert!(!plain_code.contains("TypedTableBase"));

    let extension = linq.extension_assembly.expect("extension assembly");
    assert_eq!(extension.name, "System.Data.DataSetExtensions");
    assert_eq!(linq.referenced_assemblies.len(), plain.referenced_assemblies.len() + 1);
    assert!(linq_code.contains("TypedTableBase<CustomersRow>"));
    Ok(())
}

#[test]
fn extension_resolution_failure_is_not_fatal() -> Result<()> {
    let schema = read_sample("shop.xsd")?;
    let mut unit = CodeCompileUnit::default();
    let mut namespace = CodeNamespace::new("Shop");
    let result = TypedDataSetGenerator::new()
        .options(GenerateOption::LINQ_OVER_TYPED_DATASETS)
        .assembly_resolver(Box::new(KnownAssemblies::empty()))
        .generate(&schema, &mut unit, &mut namespace, &CSharpEmitter::new())?;
    assert!(result.extension_assembly.is_none());
    assert_eq!(result.referenced_assemblies.len(), 3);
    Ok(())
}

#[test]
fn provider_names() -> Result<()> {
    let generator = TypedDataSetGenerator::new();
    let schema = read_sample("northwind.xsd")?;
    assert_eq!(
        generator.get_provider_name(&schema, None)?.as_deref(),
        Some("System.Data.SqlClient")
    );
    assert_eq!(
        generator.get_provider_name(&schema, Some("Orders"))?.as_deref(),
        Some("System.Data.SqlClient")
    );
    assert_eq!(generator.get_provider_name(&schema, Some("Missing"))?, None);
    Ok(())
}

#[test]
fn unnamed_dataset_uses_placeholder_name() -> Result<()> {
    let mut unit = CodeCompileUnit::default();
    let mut namespace = CodeNamespace::new("Anon");
    let result = TypedDataSetGenerator::new().generate_data_source(
        DesignDataSource::new(""),
        &mut unit,
        &mut namespace,
        &CSharpEmitter::new(),
    )?;
    assert_eq!(result.dataset_name, DEFAULT_DATASET_NAME);
    Ok(())
}
