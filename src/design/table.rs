//! Tables of the design model.
//!
//! A [`DesignTable`] owns its columns, the mapping between dataset column names and source
//! column names, its constraints and the data-access sources of its table adapter. Every
//! operation that must keep those consistent (renaming a column, changing a column's source)
//! goes through the table.

use std::ops::{Deref, DerefMut};

use strum::{Display, EnumString};

use crate::{
    codegen::naming::fix_identifier,
    design::{DbSource, DesignColumn},
    Error, Result,
};

/// A mapping from a source column name to a dataset column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Column name in the database result
    pub source_column: String,
    /// Column name in the dataset
    pub data_set_column: String,
}

/// Referential action of a foreign-key constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum Rule {
    /// Take no action
    None,
    /// Propagate the change
    #[default]
    Cascade,
    /// Set the child columns to null
    SetNull,
    /// Set the child columns to their default
    SetDefault,
}

/// A unique or primary-key constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueConstraint {
    /// Constraint name
    pub name: String,
    /// Constrained columns
    pub columns: Vec<String>,
    /// Whether this is the table's primary key
    pub is_primary_key: bool,
}

/// A foreign-key constraint on the child table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyConstraint {
    /// Constraint name
    pub name: String,
    /// Referencing columns of this table
    pub columns: Vec<String>,
    /// Referenced table
    pub related_table: String,
    /// Referenced columns
    pub related_columns: Vec<String>,
    /// Action on parent update
    pub update_rule: Rule,
    /// Action on parent delete
    pub delete_rule: Rule,
}

/// A table constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Unique or primary key
    Unique(UniqueConstraint),
    /// Foreign key
    ForeignKey(ForeignKeyConstraint),
}

impl Constraint {
    /// Constraint name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Constraint::Unique(u) => &u.name,
            Constraint::ForeignKey(f) => &f.name,
        }
    }

    /// Columns of this table the constraint covers.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        match self {
            Constraint::Unique(u) => &u.columns,
            Constraint::ForeignKey(f) => &f.columns,
        }
    }
}

/// Generator naming hints of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableHints {
    /// Name the user gave the table
    pub user_table_name: Option<String>,
    /// Typed table class name
    pub table_class_name: Option<String>,
    /// Table field name on the dataset class
    pub table_var_name: Option<String>,
    /// Table property name on the dataset class
    pub table_prop_name: Option<String>,
    /// Typed row class name
    pub row_class_name: Option<String>,
    /// Row-change event handler delegate name
    pub row_ev_handler_name: Option<String>,
    /// Row-change event args class name
    pub row_ev_arg_name: Option<String>,
}

/// Ordered, name-unique columns of one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesignColumnCollection {
    columns: Vec<DesignColumn>,
}

impl DesignColumnCollection {
    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` when there are no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterates over the columns in order.
    pub fn iter(&self) -> std::slice::Iter<'_, DesignColumn> {
        self.columns.iter()
    }

    /// Returns the column named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DesignColumn> {
        self.index_of(name).map(|i| &self.columns[i])
    }

    /// Position of the column named `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Fails if a column other than the one at `except` is already named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] on a clash; names compare case-insensitively.
    pub fn validate_unique_name(&self, name: &str, except: Option<usize>) -> Result<()> {
        let clash = self
            .columns
            .iter()
            .enumerate()
            .any(|(i, c)| Some(i) != except && c.name().eq_ignore_ascii_case(name));
        if clash {
            return Err(Error::DuplicateName {
                kind: "column",
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a DesignColumnCollection {
    type Item = &'a DesignColumn;
    type IntoIter = std::slice::Iter<'a, DesignColumn>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// A table of the design model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesignTable {
    name: String,
    columns: DesignColumnCollection,
    mappings: Vec<ColumnMapping>,
    constraints: Vec<Constraint>,
    /// Generator naming hints
    pub hints: TableHints,
    /// The adapter's primary source (Fill/GetData)
    pub main_source: Option<DbSource>,
    /// Additional adapter queries
    pub sources: Vec<DbSource>,
    /// Table adapter class name
    pub data_accessor_name: Option<String>,
    /// Base class of the table adapter
    pub base_class: Option<String>,
}

impl DesignTable {
    /// Creates an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        for column in &mut self.columns.columns {
            column.owner = Some(name.clone());
        }
        self.name = name;
    }

    /// The columns.
    #[must_use]
    pub fn columns(&self) -> &DesignColumnCollection {
        &self.columns
    }

    /// Returns the column named `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&DesignColumn> {
        self.columns.get(name)
    }

    /// Mutable handle to the column named `name`.
    pub fn column_mut(&mut self, name: &str) -> Option<ColumnMut<'_>> {
        let index = self.columns.index_of(name)?;
        Some(ColumnMut { table: self, index })
    }

    /// Appends a column and attaches it to this table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] if a sibling already has the column's name.
    pub fn add_column(&mut self, mut column: DesignColumn) -> Result<()> {
        self.columns.validate_unique_name(column.name(), None)?;
        column.owner = Some(self.name.clone());
        self.columns.columns.push(column);
        Ok(())
    }

    /// Removes the column named `name` together with its mappings and returns it detached.
    pub fn remove_column(&mut self, name: &str) -> Option<DesignColumn> {
        let index = self.columns.index_of(name)?;
        let mut column = self.columns.columns.remove(index);
        self.mappings.retain(|m| m.data_set_column != name);
        column.owner = None;
        Some(column)
    }

    /// Renames a column.
    ///
    /// Renaming to the current name is a no-op. Mappings keyed by the old name follow the
    /// rename when both names are non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no column `old`, and [`Error::DuplicateName`] if a
    /// sibling is already named `new`; the column keeps its old name in both cases.
    pub fn rename_column(&mut self, old: &str, new: &str) -> Result<()> {
        let index = self
            .columns
            .index_of(old)
            .ok_or_else(|| Error::NotFound(format!("column '{}' in table '{}'", old, self.name)))?;
        if old == new {
            return Ok(());
        }
        self.columns.validate_unique_name(new, Some(index))?;
        self.columns.columns[index].rename_attached(new.to_string());
        if !old.is_empty() && !new.is_empty() {
            self.update_column_mapping_name(old, new);
        }
        Ok(())
    }

    fn update_column_mapping_name(&mut self, old: &str, new: &str) {
        for mapping in &mut self.mappings {
            if mapping.data_set_column == old {
                mapping.data_set_column = new.to_string();
            }
        }
        for constraint in &mut self.constraints {
            let columns = match constraint {
                Constraint::Unique(u) => &mut u.columns,
                Constraint::ForeignKey(f) => &mut f.columns,
            };
            for column in columns.iter_mut().filter(|c| *c == old) {
                *column = new.to_string();
            }
        }
    }

    /// The column mappings.
    #[must_use]
    pub fn mappings(&self) -> &[ColumnMapping] {
        &self.mappings
    }

    /// Adds a mapping without validation; used while loading.
    pub fn add_mapping(&mut self, source_column: impl Into<String>, data_set_column: impl Into<String>) {
        self.mappings.push(ColumnMapping {
            source_column: source_column.into(),
            data_set_column: data_set_column.into(),
        });
    }

    /// Source column mapped to the dataset column `column`, empty if unmapped.
    #[must_use]
    pub fn column_source(&self, column: &str) -> &str {
        self.mappings
            .iter()
            .find(|m| m.data_set_column == column)
            .map_or("", |m| m.source_column.as_str())
    }

    /// Maps `column` to `source`, replacing an existing mapping. An empty `source` removes it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the table has no column named `column`.
    pub fn set_column_source(&mut self, column: &str, source: &str) -> Result<()> {
        if self.columns.get(column).is_none() {
            return Err(Error::NotFound(format!(
                "column '{}' in table '{}'",
                column, self.name
            )));
        }
        if source.is_empty() {
            self.mappings.retain(|m| m.data_set_column != column);
            return Ok(());
        }
        match self.mappings.iter_mut().find(|m| m.data_set_column == column) {
            Some(mapping) => mapping.source_column = source.to_string(),
            None => self.add_mapping(source, column),
        }
        Ok(())
    }

    /// The constraints.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub(crate) fn rename_related_table(&mut self, old: &str, new: &str) {
        for constraint in &mut self.constraints {
            if let Constraint::ForeignKey(fk) = constraint {
                if fk.related_table == old {
                    fk.related_table = new.to_string();
                }
            }
        }
    }

    /// Adds a constraint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if a covered column does not exist, and
    /// [`Error::DuplicateName`] if a constraint with the same name exists.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<()> {
        if self.constraints.iter().any(|c| c.name() == constraint.name()) {
            return Err(Error::DuplicateName {
                kind: "constraint",
                name: constraint.name().to_string(),
            });
        }
        if let Some(missing) = constraint
            .columns()
            .iter()
            .find(|c| self.columns.get(c).is_none())
        {
            return Err(Error::NotFound(format!(
                "column '{}' in table '{}'",
                missing, self.name
            )));
        }
        if let Constraint::Unique(u) = &constraint {
            if u.is_primary_key {
                for c in &mut self.constraints {
                    if let Constraint::Unique(other) = c {
                        other.is_primary_key = false;
                    }
                }
            }
        }
        self.constraints.push(constraint);
        Ok(())
    }

    /// The primary key, if any.
    #[must_use]
    pub fn primary_key(&self) -> Option<&UniqueConstraint> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::Unique(u) if u.is_primary_key => Some(u),
            _ => None,
        })
    }

    /// Returns `true` if some unique constraint covers exactly the column `column`.
    #[must_use]
    pub fn is_key_column(&self, column: &str) -> bool {
        self.constraints.iter().any(|c| match c {
            Constraint::Unique(u) => u.columns.len() == 1 && u.columns[0] == column,
            Constraint::ForeignKey(_) => false,
        })
    }

    /// All sources, main source first.
    pub fn all_sources(&self) -> impl Iterator<Item = &DbSource> {
        self.main_source.iter().chain(self.sources.iter())
    }

    /// Identifier-safe form of the table name.
    #[must_use]
    pub fn identifier(&self) -> String {
        fix_identifier(&self.name)
    }

    /// Typed table class name, `<Table>DataTable` unless hinted.
    #[must_use]
    pub fn table_class_name(&self) -> String {
        self.hints
            .table_class_name
            .clone()
            .unwrap_or_else(|| format!("{}DataTable", self.identifier()))
    }

    /// Typed row class name, `<Table>Row` unless hinted.
    #[must_use]
    pub fn row_class_name(&self) -> String {
        self.hints
            .row_class_name
            .clone()
            .unwrap_or_else(|| format!("{}Row", self.identifier()))
    }

    /// Table field name on the dataset class, `table<Table>` unless hinted.
    #[must_use]
    pub fn table_var_name(&self) -> String {
        self.hints
            .table_var_name
            .clone()
            .unwrap_or_else(|| format!("table{}", self.identifier()))
    }

    /// Table property name on the dataset class, `<Table>` unless hinted.
    #[must_use]
    pub fn table_prop_name(&self) -> String {
        self.hints
            .table_prop_name
            .clone()
            .unwrap_or_else(|| self.identifier())
    }

    /// Table adapter class name, `<Table>TableAdapter` unless set.
    #[must_use]
    pub fn adapter_class_name(&self) -> String {
        self.data_accessor_name
            .clone()
            .unwrap_or_else(|| format!("{}TableAdapter", self.identifier()))
    }
}

/// A mutable handle to one attached column.
///
/// Dereferences to the [`DesignColumn`] for everything that does not involve the table, and
/// adds the operations that do.
pub struct ColumnMut<'a> {
    table: &'a mut DesignTable,
    index: usize,
}

impl ColumnMut<'_> {
    /// Renames the column, enforcing sibling-name uniqueness.
    ///
    /// # Errors
    ///
    /// See [`DesignTable::rename_column`].
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        let old = self.table.columns.columns[self.index].name().to_string();
        self.table.rename_column(&old, name)
    }

    /// Mapped source column name, empty if unmapped.
    #[must_use]
    pub fn source(&self) -> &str {
        self.table
            .column_source(self.table.columns.columns[self.index].name())
    }

    /// Maps the column to `source`.
    ///
    /// # Errors
    ///
    /// See [`DesignTable::set_column_source`].
    pub fn set_source(&mut self, source: &str) -> Result<()> {
        let name = self.table.columns.columns[self.index].name().to_string();
        self.table.set_column_source(&name, source)
    }

    /// Whether a single-column unique constraint covers this column.
    #[must_use]
    pub fn is_key_column(&self) -> bool {
        self.table
            .is_key_column(self.table.columns.columns[self.index].name())
    }
}

impl Deref for ColumnMut<'_> {
    type Target = DesignColumn;

    fn deref(&self) -> &DesignColumn {
        &self.table.columns.columns[self.index]
    }
}

impl DerefMut for ColumnMut<'_> {
    fn deref_mut(&mut self) -> &mut DesignColumn {
        &mut self.table.columns.columns[self.index]
    }
}
