//! The schema importer bridge against a web-service schema that references a dataset schema.

use dsgen::{
    importer::{ImportTarget, TypedDataSetSchemaImporterExtension},
    prelude::*,
};
use std::path::PathBuf;

fn schemas() -> Result<SchemaSet> {
    let samples = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/samples");
    let mut set = SchemaSet::new();
    for name in ["northwind.xsd", "service.xsd"] {
        set.parse_and_add(&std::fs::read_to_string(samples.join(name))?)?;
    }
    Ok(set)
}

#[test]
fn diffgram_wrapper_generates_dataset_into_target() -> Result<()> {
    let set = schemas()?;
    let emitter = CSharpEmitter::new();
    let mut unit = CodeCompileUnit::default();
    let mut namespace = CodeNamespace::new("Client.Proxies");
    let mut importer = TypedDataSetSchemaImporterExtension::new();

    let name = {
        let mut target = ImportTarget::new(&mut unit, &mut namespace, &emitter);
        importer.import_schema_type_by_name("CustomersChanges", "urn:service", None, &set, &mut target)?
    };
    assert_eq!(name.as_deref(), Some("NorthwindDataSet.CustomersDataTable"));
    assert!(namespace.type_named("NorthwindDataSet").is_some());
    assert!(unit.referenced_assemblies.iter().any(|r| r == "System.Data.dll"));

    unit.namespaces.insert(0, namespace);
    let code = emitter.emit_compile_unit(&unit)?;
    assert!(code.contains("namespace Client.Proxies"));
    assert!(code.contains("partial class NorthwindDataSet"));
    Ok(())
}

#[test]
fn repeated_imports_reuse_the_generated_dataset() -> Result<()> {
    let set = schemas()?;
    let emitter = CSharpEmitter::new();
    let mut unit = CodeCompileUnit::default();
    let mut namespace = CodeNamespace::new("Client");
    let mut importer = TypedDataSetSchemaImporterExtension::new();

    for type_name in ["AllChanges", "NorthwindPayload", "CustomersChanges"] {
        let mut target = ImportTarget::new(&mut unit, &mut namespace, &emitter);
        assert!(importer
            .import_schema_type_by_name(type_name, "urn:service", None, &set, &mut target)?
            .is_some());
    }
    assert_eq!(importer.imported_count(), 1);
    assert_eq!(
        namespace
            .types
            .iter()
            .filter(|t| t.name == "NorthwindDataSet")
            .count(),
        1
    );
    Ok(())
}

#[test]
fn non_dataset_types_are_left_to_the_caller() -> Result<()> {
    let set = schemas()?;
    let emitter = CSharpEmitter::new();
    let mut unit = CodeCompileUnit::default();
    let mut namespace = CodeNamespace::new("Client");
    let mut importer = TypedDataSetSchemaImporterExtension::new();
    let mut target = ImportTarget::new(&mut unit, &mut namespace, &emitter);

    for type_name in ["Address", "ElsewherePayload", "Missing"] {
        assert_eq!(
            importer.import_schema_type_by_name(type_name, "urn:service", None, &set, &mut target)?,
            None,
            "{}",
            type_name
        );
    }
    assert_eq!(importer.imported_count(), 0);
    Ok(())
}
