//! Integration tests for the design model invariants on a loaded schema.

use dsgen::{
    design::{DataColumn, DesignColumn, DesignDataSource, NULL_VALUE_THROW},
    Error, Result,
};
use std::path::PathBuf;

fn northwind() -> Result<DesignDataSource> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/samples/northwind.xsd");
    DesignDataSource::from_schema(&std::fs::read_to_string(path)?)
}

#[test]
fn loads_tables_relations_and_sources() -> Result<()> {
    let ds = northwind()?;
    assert_eq!(ds.name, "Northwind");
    assert_eq!(ds.class_name(), "NorthwindDataSet");
    assert_eq!(ds.tables().len(), 2);
    assert_eq!(ds.relations().len(), 1);
    assert_eq!(ds.sources.len(), 1);

    let customers = ds.table("Customers").expect("Customers");
    assert_eq!(customers.sources.len(), 2);
    assert_eq!(customers.column("CustomerID").map(DesignColumn::max_length), Some(5));
    assert!(customers.is_key_column("CustomerID"));
    assert!(!customers.is_key_column("City"));

    let connection = ds.default_connection().expect("connection");
    assert!(connection.property_reference.is_some());
    Ok(())
}

#[test]
fn duplicate_rename_fails_and_keeps_name() -> Result<()> {
    let mut ds = northwind()?;
    let customers = ds.table_mut("Customers").expect("Customers");

    let result = customers.rename_column("City", "CompanyName");
    assert!(matches!(result, Err(Error::DuplicateName { .. })));
    assert!(customers.column("City").is_some());
    assert_eq!(customers.column_source("City"), "City");

    customers.rename_column("City", "Town")?;
    assert!(customers.column("City").is_none());
    assert_eq!(customers.column_source("Town"), "City");
    Ok(())
}

#[test]
fn column_handle_renames_and_maps() -> Result<()> {
    let mut ds = northwind()?;
    let orders = ds.table_mut("Orders").expect("Orders");
    let mut freight = orders.column_mut("Freight").expect("Freight");
    assert_eq!(freight.source(), "Freight");
    freight.set_source("ShippingCost")?;
    assert_eq!(freight.source(), "ShippingCost");
    assert!(freight.set_name("OrderDate").is_err());
    assert_eq!(freight.name(), "Freight");

    let order_id = orders.column_mut("OrderID").expect("OrderID");
    assert!(order_id.is_key_column());
    Ok(())
}

#[test]
fn max_length_widens_past_current_bound() -> Result<()> {
    let mut ds = northwind()?;
    let customers = ds.table_mut("Customers").expect("Customers");
    let mut city = customers.column_mut("City").expect("City");
    assert_eq!(city.max_length(), 15);
    city.set_max_length(60);
    assert_eq!(city.max_length(), 60);
    city.set_max_length(10);
    assert_eq!(city.max_length(), 10);
    Ok(())
}

#[test]
fn null_value_and_clone() -> Result<()> {
    let ds = northwind()?;
    let customers = ds.table("Customers").expect("Customers");
    assert_eq!(customers.column("CompanyName").map(DesignColumn::null_value), Some(NULL_VALUE_THROW));
    assert_eq!(customers.column("City").map(DesignColumn::null_value), Some("_empty"));

    let city = customers.column("City").expect("City");
    assert_eq!(city.owner(), Some("Customers"));
    let copy = city.detached_clone();
    assert_eq!(copy.owner(), None);
    assert_eq!(copy.max_length(), city.max_length());
    assert_eq!(copy.null_value(), "_empty");
    Ok(())
}

#[test]
fn auto_increment_and_data_type_are_coupled() -> Result<()> {
    let mut column = DesignColumn::from_data_column(Some(DataColumn::new("Key")))?;
    assert!(column.set_auto_increment(true));
    assert_eq!(column.data_type(), "System.Int32");
    assert!(!column.set_auto_increment(true));

    assert!(!column.set_data_type("System.Int64"));
    assert!(column.auto_increment());
    assert!(column.set_data_type("System.String"));
    assert!(!column.auto_increment());
    Ok(())
}
