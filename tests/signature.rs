//! Method signatures and method-name derivation for sources loaded from a schema.

use dsgen::{
    codedom::CSharpEmitter,
    codegen::{method_name, ContainerType, MethodSignatureGenerator},
    design::{DbCommand, DbSource, DesignDataSource},
    Error, Result,
};
use std::path::PathBuf;

fn northwind() -> Result<DesignDataSource> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/samples/northwind.xsd");
    DesignDataSource::from_schema(&std::fs::read_to_string(path)?)
}

fn source<'a>(ds: &'a DesignDataSource, table: &str, name: &str) -> &'a DbSource {
    ds.table(table)
        .and_then(|t| t.sources.iter().find(|s| s.name == name))
        .expect("source")
}

#[test]
fn paging_get_name_prefers_explicit_override() {
    let mut source = DbSource::new("FillByCity").with_get_method_name("GetDataByCity");
    assert_eq!(method_name(&source, true, true), "GetDataByCityPage");
    assert_eq!(method_name(&source, true, false), "GetDataByCity");
    assert_eq!(method_name(&source, false, false), "FillByCity");

    source.generator_get_method_name_for_paging = Some("FooPage".to_string());
    assert_eq!(method_name(&source, true, true), "FooPage");

    let unnamed = DbSource::new("Fill");
    assert_eq!(method_name(&unnamed, true, true), "GetDataPage");
}

#[test]
fn loaded_sources_render_signatures() -> Result<()> {
    let ds = northwind()?;
    let emitter = CSharpEmitter::new();
    let by_city = source(&ds, "Customers", "FillByCity");

    let generator = MethodSignatureGenerator::new()
        .emitter(&emitter)
        .source(by_city)
        .data_set_class_name(ds.class_name())
        .table_class_name("CustomersDataTable");

    let fill = generator.generate_method_signature()?.expect("fill line");
    assert!(fill.starts_with("int FillByCity(NorthwindDataSet.CustomersDataTable dataTable"));
    assert!(!fill.ends_with(';'));

    let page = generator.clone().get_method(true).paging(true);
    assert_eq!(page.method_name()?, "GetCityPage");
    let line = page.generate_method_signature()?.expect("paging line");
    assert!(line.starts_with("NorthwindDataSet.CustomersDataTable GetCityPage("));

    let count = MethodSignatureGenerator::new()
        .emitter(&emitter)
        .source(source(&ds, "Customers", "CountByCity"))
        .generate_method_signature()?
        .expect("function line");
    assert!(count.contains("CountByCity("));
    Ok(())
}

#[test]
fn dataset_container_changes_parameter() -> Result<()> {
    let emitter = CSharpEmitter::new();
    let fill = DbSource::new("Fill").with_select(DbCommand::text("SELECT * FROM Orders"));
    let line = MethodSignatureGenerator::new()
        .emitter(&emitter)
        .source(&fill)
        .container_type(ContainerType::DataSet)
        .data_set_class_name("NorthwindDataSet")
        .generate_method_signature()?;
    assert_eq!(line.as_deref(), Some("int Fill(NorthwindDataSet dataSet)"));
    Ok(())
}

#[test]
fn unset_source_is_reported() {
    let emitter = CSharpEmitter::new();
    let generator = MethodSignatureGenerator::new().emitter(&emitter);
    assert!(matches!(generator.method_name(), Err(Error::ArgumentMissing("source"))));
}

#[test]
fn updating_methods_for_loaded_table() -> Result<()> {
    let ds = northwind()?;
    let emitter = CSharpEmitter::new();
    let customers = ds.table("Customers").expect("Customers");
    let wrapper = MethodSignatureGenerator::new()
        .emitter(&emitter)
        .design_table(customers)
        .data_set_class_name(ds.class_name())
        .generate_updating_methods()?;

    let names: Vec<&str> = wrapper.methods().map(|m| m.name.as_str()).collect();
    assert!(names.contains(&"Update"));
    assert!(names.contains(&"Insert"));
    assert!(names.contains(&"Delete"));
    assert!(wrapper.methods().all(|m| m.body.is_none()));
    Ok(())
}
