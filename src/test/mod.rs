use crate::design::{DataColumn, DesignColumn, DesignDataSource, DesignTable};

const SHOP: &str = include_str!("../../tests/samples/shop.xsd");
const NORTHWIND: &str = include_str!("../../tests/samples/northwind.xsd");
const SERVICE: &str = include_str!("../../tests/samples/service.xsd");

// One table with an auto-increment key, a scalar source and an attribute column
pub fn shop_schema() -> String {
    SHOP.to_string()
}

// Customers and Orders related by FK_Orders_Customers, with full adapters
pub fn northwind_schema() -> String {
    NORTHWIND.to_string()
}

// Diffgram and wildcard wrappers pointing at the Northwind namespace
pub fn service_schema() -> String {
    SERVICE.to_string()
}

pub fn northwind() -> DesignDataSource {
    DesignDataSource::from_schema(NORTHWIND).unwrap()
}

// Helper function to create a column of the given CLR type
pub fn create_column(name: &str, data_type: &str) -> DesignColumn {
    DesignColumn::from_data_column(Some(DataColumn::with_type(name, data_type))).unwrap()
}

// Helper function to create a table from (name, type) pairs
pub fn create_table(name: &str, columns: &[(&str, &str)]) -> DesignTable {
    let mut table = DesignTable::new(name);
    for (column, data_type) in columns {
        table.add_column(create_column(column, data_type)).unwrap();
    }
    table
}
