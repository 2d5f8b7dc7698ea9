//! Persisted property references as they appear in dataset schemas.

use dsgen::{
    codedom::{CodeExpression, CodeTypeReference},
    design::DesignDataSource,
    serializer::{PropertyReference, PropertyReferenceSerializer},
    Result,
};
use std::path::PathBuf;

#[test]
fn schema_connection_reference_survives_a_save() -> Result<()> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/samples/northwind.xsd");
    let ds = DesignDataSource::from_schema(&std::fs::read_to_string(path)?)?;
    let reference = ds
        .default_connection()
        .and_then(|c| c.property_reference.clone())
        .expect("property reference");

    let text = PropertyReferenceSerializer::serialize(&reference)?;
    assert_eq!(
        text,
        "ApplicationSettings.Northwind.Properties.Settings.GlobalReference.Default.NorthwindConnectionString"
    );
    assert_eq!(PropertyReferenceSerializer::deserialize(&text)?, reference);
    Ok(())
}

#[test]
fn app_config_reference_round_trips() -> Result<()> {
    let expression = CodeExpression::type_ref(CodeTypeReference::new(
        "System.Configuration.ConfigurationManager",
    ))
    .property("ConnectionStrings")
    .index(vec![CodeExpression::string("MainDb")])
    .property("ConnectionString");

    let text = PropertyReferenceSerializer::serialize(&expression)?;
    assert!(text.starts_with("AppConfig."));
    assert!(matches!(
        PropertyReference::decode(&text)?,
        PropertyReference::AppConfig { ref index, .. } if index == "MainDb"
    ));
    assert_eq!(PropertyReferenceSerializer::deserialize(&text)?, expression);
    Ok(())
}

#[test]
fn unrecognized_expressions_use_the_general_form() -> Result<()> {
    let expression = CodeExpression::this()
        .property("Settings")
        .invoke("Lookup", vec![CodeExpression::string("a.b")]);
    let text = PropertyReferenceSerializer::serialize(&expression)?;
    assert!(!text.starts_with("ApplicationSettings."));
    assert!(!text.starts_with("AppConfig."));
    assert_eq!(PropertyReferenceSerializer::deserialize(&text)?, expression);
    Ok(())
}

#[test]
fn truncated_compact_text_is_rejected() {
    assert!(PropertyReferenceSerializer::deserialize("ApplicationSettings.Settings.Default").is_err());
    assert!(PropertyReferenceSerializer::deserialize("AppConfig.Manager.0.Name.Strings").is_err());
}
