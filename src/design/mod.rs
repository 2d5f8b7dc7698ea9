//! Design model of a typed dataset.
//!
//! A [`DesignDataSource`] is what the generators consume: tables with their columns,
//! constraints and table-adapter sources, relations between tables, connections, and
//! data-source-level functions. It is loaded from dataset schema text, or built by hand.
//!
//! Columns wrap a [`DataColumn`] and keep it consistent with design-time rules: names are
//! unique within their table (case-insensitively), auto-increment implies an integral type,
//! and a column that belongs to a table can only be renamed through that table.
//!
//! # Key Components
//!
//! - [`DesignDataSource`] - the dataset: tables, relations, connections, functions
//! - [`DesignTable`] - a table with columns, mappings, constraints and sources
//! - [`DesignColumn`] / [`DataColumn`] - a column and its underlying runtime description
//! - [`DbSource`], [`DbCommand`], [`DesignParameter`] - queries behind table adapters
//! - [`DesignRelation`], [`DesignConnection`]
//!
//! # Examples
//!
//! ```rust
//! use dsgen::design::{DesignColumn, DesignDataSource, DesignTable};
//!
//! let mut ds = DesignDataSource::new("Northwind");
//! let mut customers = DesignTable::new("Customers");
//! customers.add_column(DesignColumn::new("CustomerID"))?;
//! customers.add_column(DesignColumn::new("CompanyName"))?;
//! ds.add_table(customers)?;
//!
//! // Renaming goes through the owning table so uniqueness is enforced
//! let table = ds.table_mut("Customers").unwrap();
//! assert!(table.rename_column("CompanyName", "customerid").is_err());
//! table.rename_column("CompanyName", "Name")?;
//! assert_eq!(ds.table("Customers").unwrap().columns().len(), 2);
//! # Ok::<(), dsgen::Error>(())
//! ```

mod column;
mod connection;
mod data_source;
pub(crate) mod loader;
mod relation;
mod source;
mod table;

pub use column::{
    is_auto_increment_type, is_value_type, ColumnHints, DataColumn, DesignColumn, MappingType,
    NULL_VALUE_EMPTY, NULL_VALUE_NULL, NULL_VALUE_THROW,
};
pub use connection::{DesignConnection, DEFAULT_PROVIDER};
pub use data_source::{DataSetHints, DesignDataSource};
pub use relation::{DesignRelation, RelationHints, RelationKind};
pub use source::{
    CommandOperation, CommandType, DbCommand, DbSource, DbType, DesignParameter,
    DesignParameterDirection, GenerateMethodTypes, QueryType,
};
pub use table::{
    ColumnMapping, ColumnMut, Constraint, DesignColumnCollection, DesignTable,
    ForeignKeyConstraint, Rule, TableHints, UniqueConstraint,
};
