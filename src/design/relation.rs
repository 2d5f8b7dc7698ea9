//! Relations between design tables.

use strum::{Display, EnumString};

/// What a keyref in the schema produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum RelationKind {
    /// A navigable relation without a foreign-key constraint
    Relation,
    /// A foreign-key constraint only
    ForeignKeyConstraint,
    /// Both
    #[default]
    Both,
}

/// Generator naming hints of a relation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationHints {
    /// Name of the relation field on the dataset class
    pub relation_var_name: Option<String>,
    /// Name of the parent-row property on the child row class
    pub parent_prop_name: Option<String>,
    /// Name of the child-rows method on the parent row class
    pub child_prop_name: Option<String>,
}

/// A parent/child relation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DesignRelation {
    /// Relation name
    pub name: String,
    /// Parent table
    pub parent_table: String,
    /// Child table
    pub child_table: String,
    /// Key columns of the parent
    pub parent_columns: Vec<String>,
    /// Referencing columns of the child
    pub child_columns: Vec<String>,
    /// Whether child rows are nested in the parent in XML
    pub is_nested: bool,
    /// What the relation produces
    pub kind: RelationKind,
    /// Naming hints
    pub hints: RelationHints,
}

impl DesignRelation {
    /// Creates a single-column relation.
    pub fn new(
        name: impl Into<String>,
        parent_table: impl Into<String>,
        parent_column: impl Into<String>,
        child_table: impl Into<String>,
        child_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            parent_table: parent_table.into(),
            child_table: child_table.into(),
            parent_columns: vec![parent_column.into()],
            child_columns: vec![child_column.into()],
            ..Self::default()
        }
    }

    /// Whether the relation is navigable from generated rows.
    #[must_use]
    pub fn is_navigable(&self) -> bool {
        self.kind != RelationKind::ForeignKeyConstraint
    }
}
