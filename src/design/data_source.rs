//! The root of the design model.

use crate::{
    codegen::naming::fix_identifier,
    design::{loader, DbSource, DesignConnection, DesignRelation, DesignTable},
    schema::{Schema, SchemaSet},
    Error, Result,
};

/// Generator naming hints of a data source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSetHints {
    /// Name the user gave the dataset
    pub user_ds_name: Option<String>,
    /// Dataset class name
    pub data_set_name: Option<String>,
    /// Class name of the component holding data-source-level functions
    pub functions_component_class_name: Option<String>,
}

/// A dataset: tables, relations, connections and data-source-level functions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesignDataSource {
    /// Dataset name, empty until set
    pub name: String,
    /// Target namespace of the dataset schema
    pub namespace: String,
    /// Generator naming hints
    pub hints: DataSetHints,
    tables: Vec<DesignTable>,
    relations: Vec<DesignRelation>,
    /// Named connections
    pub connections: Vec<DesignConnection>,
    /// Index into `connections` of the default connection
    pub default_connection_index: Option<usize>,
    /// Data-source-level functions
    pub sources: Vec<DbSource>,
    /// Name of the component holding data-source-level functions
    pub functions_component_name: Option<String>,
}

impl DesignDataSource {
    /// Creates an empty data source.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Loads a data source from dataset schema text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a well-formed schema or its dataset annotations
    /// are inconsistent (unknown tables, duplicate names, unparsable numbers).
    pub fn from_schema(text: &str) -> Result<Self> {
        let mut set = SchemaSet::new();
        set.parse_and_add(text)?;
        Self::from_schema_set(&set)
    }

    /// Loads a data source from the first schema of `set` that declares a dataset, or from the
    /// first schema if none does. Other schemas of the set resolve type references.
    ///
    /// # Errors
    ///
    /// See [`DesignDataSource::from_schema`]; an empty set is reported as [`Error::NotFound`].
    pub fn from_schema_set(set: &SchemaSet) -> Result<Self> {
        let schema = set
            .schemas()
            .find(|s| crate::importer::find_data_set_element(s, set).is_some())
            .or_else(|| set.schemas().next())
            .ok_or_else(|| Error::NotFound("no schema to load".to_string()))?;
        loader::load(schema, set)
    }

    /// Loads a data source from `schema`, a document of `set`.
    ///
    /// # Errors
    ///
    /// See [`DesignDataSource::from_schema`].
    pub fn from_schema_in_set(schema: &Schema, set: &SchemaSet) -> Result<Self> {
        loader::load(schema, set)
    }

    /// Dataset class name, the hint or the identifier-safe dataset name.
    #[must_use]
    pub fn class_name(&self) -> String {
        self.hints
            .data_set_name
            .clone()
            .unwrap_or_else(|| fix_identifier(&self.name))
    }

    /// Class name of the component holding data-source-level functions.
    #[must_use]
    pub fn functions_class_name(&self) -> String {
        self.hints
            .functions_component_class_name
            .clone()
            .or_else(|| self.functions_component_name.clone())
            .unwrap_or_else(|| "QueriesTableAdapter".to_string())
    }

    /// The tables in order.
    #[must_use]
    pub fn tables(&self) -> &[DesignTable] {
        &self.tables
    }

    /// Returns the table named `name`.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&DesignTable> {
        self.tables.iter().find(|t| t.name() == name)
    }

    /// Returns the table named `name` for modification.
    pub fn table_mut(&mut self, name: &str) -> Option<&mut DesignTable> {
        self.tables.iter_mut().find(|t| t.name() == name)
    }

    /// Adds a table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] if a table with the same name exists.
    pub fn add_table(&mut self, table: DesignTable) -> Result<()> {
        if self.table(table.name()).is_some() {
            return Err(Error::DuplicateName {
                kind: "table",
                name: table.name().to_string(),
            });
        }
        self.tables.push(table);
        Ok(())
    }

    /// Renames a table and every relation and foreign key that refers to it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown table and [`Error::DuplicateName`] if `new`
    /// is taken.
    pub fn rename_table(&mut self, old: &str, new: &str) -> Result<()> {
        if old == new {
            return Ok(());
        }
        if self.table(new).is_some() {
            return Err(Error::DuplicateName {
                kind: "table",
                name: new.to_string(),
            });
        }
        let table = self
            .table_mut(old)
            .ok_or_else(|| Error::NotFound(format!("table '{}'", old)))?;
        table.set_name(new.to_string());

        for relation in &mut self.relations {
            if relation.parent_table == old {
                relation.parent_table = new.to_string();
            }
            if relation.child_table == old {
                relation.child_table = new.to_string();
            }
        }
        for table in &mut self.tables {
            table.rename_related_table(old, new);
        }
        Ok(())
    }

    /// The relations.
    #[must_use]
    pub fn relations(&self) -> &[DesignRelation] {
        &self.relations
    }

    /// Adds a relation between two existing tables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if a table or column does not exist, [`Error::DuplicateName`]
    /// for a name clash and [`Error::Malformed`] when the column lists differ in length.
    pub fn add_relation(&mut self, relation: DesignRelation) -> Result<()> {
        if self.relations.iter().any(|r| r.name == relation.name) {
            return Err(Error::DuplicateName {
                kind: "relation",
                name: relation.name,
            });
        }
        if relation.parent_columns.len() != relation.child_columns.len()
            || relation.parent_columns.is_empty()
        {
            return Err(malformed_error!(
                "Relation '{}' has mismatched key columns",
                relation.name
            ));
        }
        for (table, columns) in [
            (&relation.parent_table, &relation.parent_columns),
            (&relation.child_table, &relation.child_columns),
        ] {
            let found = self
                .table(table)
                .ok_or_else(|| Error::NotFound(format!("table '{}'", table)))?;
            if let Some(missing) = columns.iter().find(|c| found.column(c).is_none()) {
                return Err(Error::NotFound(format!(
                    "column '{}' in table '{}'",
                    missing, table
                )));
            }
        }
        self.relations.push(relation);
        Ok(())
    }

    /// Relations in which `table` is the child.
    pub fn parent_relations<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a DesignRelation> {
        self.relations.iter().filter(move |r| r.child_table == table)
    }

    /// Relations in which `table` is the parent.
    pub fn child_relations<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a DesignRelation> {
        self.relations.iter().filter(move |r| r.parent_table == table)
    }

    /// The default connection, if any.
    #[must_use]
    pub fn default_connection(&self) -> Option<&DesignConnection> {
        match self.default_connection_index {
            Some(index) => self.connections.get(index),
            None => self.connections.first(),
        }
    }

    /// Returns the connection named `name`.
    #[must_use]
    pub fn connection(&self, name: &str) -> Option<&DesignConnection> {
        self.connections.iter().find(|c| c.name == name)
    }

    /// Connection used by `source`: its named connection, else the default one.
    #[must_use]
    pub fn connection_for(&self, source: &DbSource) -> Option<&DesignConnection> {
        match &source.connection_ref {
            Some(name) => self.connection(name),
            None => self.default_connection(),
        }
    }

    /// Provider name of the default connection, or of `table`'s connection when a table is
    /// given. `None` when it cannot be determined.
    #[must_use]
    pub fn provider_name(&self, table: Option<&str>) -> Option<String> {
        let connection = match table {
            Some(name) => {
                let source = self.table(name)?.main_source.as_ref()?;
                self.connection_for(source)?
            }
            None => self.default_connection()?,
        };
        Some(connection.provider_name().to_string())
    }

    /// Distinct provider names of the connections used by any source.
    #[must_use]
    pub fn used_providers(&self) -> Vec<String> {
        let mut providers: Vec<String> = Vec::new();
        let sources = self
            .tables
            .iter()
            .flat_map(DesignTable::all_sources)
            .chain(self.sources.iter());
        for source in sources {
            if let Some(connection) = self.connection_for(source) {
                let provider = connection.provider_name();
                if !providers.iter().any(|p| p == provider) {
                    providers.push(provider.to_string());
                }
            }
        }
        providers
    }
}
