//! Columns of the design model.
//!
//! A [`DesignColumn`] wraps the runtime-facing [`DataColumn`] description and adds what only the
//! generator cares about: the null-replacement value and the generator naming hints.
//!
//! # Auto-increment coupling
//!
//! [`DataColumn`] keeps `auto_increment` and `data_type` consistent on its own:
//!
//! - turning auto-increment on for a type that cannot auto-increment switches the type to
//!   `System.Int32`;
//! - changing the type of an auto-increment column to a type that cannot auto-increment turns
//!   auto-increment off.
//!
//! The setters on [`DesignColumn`] report whether the other side changed.

use strum::{Display, EnumString};

use crate::{Error, Result};

/// Null-value sentinel: reading a null column throws.
pub const NULL_VALUE_THROW: &str = "_throw";
/// Null-value sentinel: reading a null column returns `null`.
pub const NULL_VALUE_NULL: &str = "_null";
/// Null-value sentinel: reading a null column returns an empty string.
pub const NULL_VALUE_EMPTY: &str = "_empty";

/// Types an auto-increment column may have.
const AUTO_INCREMENT_TYPES: [&str; 4] = [
    "System.Int16",
    "System.Int32",
    "System.Int64",
    "System.Decimal",
];

/// Returns `true` if a column of CLR type `data_type` may auto-increment.
#[must_use]
pub fn is_auto_increment_type(data_type: &str) -> bool {
    AUTO_INCREMENT_TYPES.contains(&data_type)
}

/// Returns `true` for CLR value types, which need `Nullable<T>` to express null.
#[must_use]
pub fn is_value_type(data_type: &str) -> bool {
    !matches!(
        data_type,
        "System.String" | "System.Object" | "System.Byte[]" | "System.Type"
    ) && !data_type.ends_with("[]")
}

/// How a column is represented in the dataset XML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum MappingType {
    /// Child element
    #[default]
    Element,
    /// Attribute
    Attribute,
    /// Text content of the row element
    SimpleContent,
    /// Not serialized
    Hidden,
}

/// The runtime description of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct DataColumn {
    column_name: String,
    data_type: String,
    auto_increment: bool,
    /// First auto-increment value
    pub auto_increment_seed: i64,
    /// Auto-increment step
    pub auto_increment_step: i64,
    /// Whether the column accepts null
    pub allow_db_null: bool,
    max_length: i32,
    /// Computed-column formula, empty for stored columns
    pub expression: String,
    /// Default value text
    pub default_value: Option<String>,
    /// Whether the column is read-only
    pub read_only: bool,
    /// Caption, defaults to the column name
    pub caption: Option<String>,
    /// XML mapping
    pub mapping: MappingType,
}

impl DataColumn {
    /// Creates a `System.String` column.
    pub fn new(column_name: impl Into<String>) -> Self {
        Self::with_type(column_name, "System.String")
    }

    /// Creates a column of CLR type `data_type`.
    pub fn with_type(column_name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            data_type: data_type.into(),
            auto_increment: false,
            auto_increment_seed: 0,
            auto_increment_step: 1,
            allow_db_null: true,
            max_length: -1,
            expression: String::new(),
            default_value: None,
            read_only: false,
            caption: None,
            mapping: MappingType::Element,
        }
    }

    /// Column name.
    #[must_use]
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// CLR type name, e.g. `System.Int32`.
    #[must_use]
    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    /// Whether values are generated by auto-increment.
    #[must_use]
    pub fn auto_increment(&self) -> bool {
        self.auto_increment
    }

    /// Maximum length of string values, -1 when unlimited.
    #[must_use]
    pub fn max_length(&self) -> i32 {
        self.max_length
    }

    fn set_column_name(&mut self, name: String) {
        self.column_name = name;
    }

    /// Sets the auto-increment flag, switching the type to `System.Int32` if needed.
    pub fn set_auto_increment(&mut self, value: bool) {
        if value && !is_auto_increment_type(&self.data_type) {
            self.data_type = "System.Int32".to_string();
        }
        self.auto_increment = value;
    }

    /// Sets the data type, turning auto-increment off if the new type cannot auto-increment.
    pub fn set_data_type(&mut self, data_type: impl Into<String>) {
        let data_type = data_type.into();
        if self.auto_increment && !is_auto_increment_type(&data_type) {
            self.auto_increment = false;
        }
        self.data_type = data_type;
    }

    /// Sets the maximum length. Values below -1 are stored as -1.
    pub(crate) fn set_max_length(&mut self, value: i32) {
        self.max_length = value.max(-1);
    }
}

/// Generator naming hints of a column.
///
/// Each hint is `None` until the generator (or a loaded schema) fixes a name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnHints {
    /// Name the user gave the column before any fix-up
    pub user_column_name: Option<String>,
    /// Name of the column property on the table class (`<Col>Column`)
    pub column_prop_name_in_table: Option<String>,
    /// Name of the column field on the table class (`column<Col>`)
    pub column_var_name_in_table: Option<String>,
    /// Name of the typed property on the row class
    pub column_prop_name_in_row: Option<String>,
}

/// A column of a [`crate::design::DesignTable`].
///
/// Columns created with [`DesignColumn::new`] or [`DesignColumn::from_data_column`] are
/// detached. Once added to a table the column can only be renamed through the table, which
/// enforces sibling-name uniqueness and keeps the column mappings in sync.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignColumn {
    column: DataColumn,
    null_value: Option<String>,
    unique: bool,
    /// Generator naming hints
    pub hints: ColumnHints,
    pub(crate) owner: Option<String>,
}

impl DesignColumn {
    /// Creates a detached `System.String` column.
    pub fn new(name: impl Into<String>) -> Self {
        Self::wrap(DataColumn::new(name))
    }

    /// Wraps an existing column description.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NeedsDataColumn`] if `column` is `None`.
    pub fn from_data_column(column: Option<DataColumn>) -> Result<Self> {
        column.map(Self::wrap).ok_or(Error::NeedsDataColumn)
    }

    fn wrap(column: DataColumn) -> Self {
        Self {
            column,
            null_value: None,
            unique: false,
            hints: ColumnHints::default(),
            owner: None,
        }
    }

    /// The wrapped column description.
    #[must_use]
    pub fn data_column(&self) -> &DataColumn {
        &self.column
    }

    /// Mutable access to the wrapped description fields that carry no invariants.
    pub fn data_column_mut(&mut self) -> &mut DataColumn {
        &mut self.column
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.column.column_name
    }

    /// Name of the owning table, `None` when detached.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Renames a detached column. Renaming to the current name is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSupported`] if the column belongs to a table; attached columns are
    /// renamed with [`crate::design::DesignTable::rename_column`].
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name == self.column.column_name {
            return Ok(());
        }
        if let Some(owner) = &self.owner {
            return Err(Error::NotSupported(format!(
                "column '{}' belongs to table '{}' and must be renamed through it",
                self.column.column_name, owner
            )));
        }
        self.column.set_column_name(name);
        Ok(())
    }

    pub(crate) fn rename_attached(&mut self, name: String) {
        self.column.set_column_name(name);
    }

    /// CLR type name.
    #[must_use]
    pub fn data_type(&self) -> &str {
        &self.column.data_type
    }

    /// Sets the CLR type.
    ///
    /// Returns `true` if auto-increment was switched off as a side effect.
    pub fn set_data_type(&mut self, data_type: impl Into<String>) -> bool {
        let data_type = data_type.into();
        if data_type == self.column.data_type {
            return false;
        }
        let old_auto_increment = self.column.auto_increment;
        self.column.set_data_type(data_type);
        self.on_data_type_changed();
        let changed = old_auto_increment != self.column.auto_increment;
        if changed {
            log::debug!(
                "column '{}': auto-increment turned off by data type change to {}",
                self.name(),
                self.column.data_type
            );
        }
        changed
    }

    // Hook for null-value revalidation after a type change. Every sentinel and literal stays
    // valid for now.
    fn on_data_type_changed(&mut self) {}

    /// Whether values are generated by auto-increment.
    #[must_use]
    pub fn auto_increment(&self) -> bool {
        self.column.auto_increment
    }

    /// Sets the auto-increment flag.
    ///
    /// Returns `true` if the data type was switched to `System.Int32` as a side effect.
    pub fn set_auto_increment(&mut self, value: bool) -> bool {
        if value == self.column.auto_increment {
            return false;
        }
        let old_type = self.column.data_type.clone();
        self.column.set_auto_increment(value);
        let changed = old_type != self.column.data_type;
        if changed {
            log::debug!(
                "column '{}': data type changed from {} to {} by enabling auto-increment",
                self.name(),
                old_type,
                self.column.data_type
            );
        }
        changed
    }

    /// Maximum length, -1 when unlimited.
    #[must_use]
    pub fn max_length(&self) -> i32 {
        self.column.max_length
    }

    /// Sets the maximum length.
    ///
    /// Narrowing or setting a first bound applies directly. Widening a positive bound first
    /// resets the bound to unlimited and then applies the new value.
    pub fn set_max_length(&mut self, value: i32) {
        let current = self.column.max_length;
        if current > 0 && value > current {
            self.column.set_max_length(-1);
        }
        self.column.set_max_length(value);
    }

    /// Computed-column expression, empty for stored columns.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.column.expression
    }

    /// Sets the computed-column expression.
    pub fn set_expression(&mut self, expression: impl Into<String>) {
        self.column.expression = expression.into();
    }

    /// Null replacement value; [`NULL_VALUE_THROW`] unless overridden.
    #[must_use]
    pub fn null_value(&self) -> &str {
        self.null_value.as_deref().unwrap_or(NULL_VALUE_THROW)
    }

    /// Overrides the null replacement value. `None` restores the default.
    pub fn set_null_value(&mut self, value: Option<String>) {
        self.null_value = value;
    }

    /// Whether the column carries its own uniqueness flag.
    #[must_use]
    pub fn unique(&self) -> bool {
        self.unique
    }

    /// Sets the uniqueness flag.
    pub fn set_unique(&mut self, value: bool) {
        self.unique = value;
    }

    /// Whether the column accepts null.
    #[must_use]
    pub fn allow_db_null(&self) -> bool {
        self.column.allow_db_null
    }

    /// Returns a deep copy that belongs to no table.
    #[must_use]
    pub fn detached_clone(&self) -> Self {
        Self {
            owner: None,
            ..self.clone()
        }
    }

    /// Name of the typed row property, from the hints or the column name.
    #[must_use]
    pub fn row_property_name(&self) -> &str {
        self.hints
            .column_prop_name_in_row
            .as_deref()
            .unwrap_or(self.name())
    }
}
