//! Connections referenced by table adapters and functions.

use crate::codedom::CodeExpression;

/// Default provider when a connection does not name one.
pub const DEFAULT_PROVIDER: &str = "System.Data.SqlClient";

/// A named database connection of a data source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DesignConnection {
    /// Connection name
    pub name: String,
    /// Literal connection string, used when no settings property is bound
    pub connection_string: String,
    /// Provider invariant name, e.g. `System.Data.SqlClient`
    pub provider: String,
    /// Settings class holding the connection string
    pub app_settings_object_name: Option<String>,
    /// Settings property holding the connection string
    pub app_settings_property_name: Option<String>,
    /// Whether the connection string comes from a settings property
    pub is_app_settings_property: bool,
    /// Expression reading the connection string at run time
    pub property_reference: Option<CodeExpression>,
}

impl DesignConnection {
    /// Creates a connection with a literal connection string.
    pub fn new(
        name: impl Into<String>,
        provider: impl Into<String>,
        connection_string: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            provider: provider.into(),
            connection_string: connection_string.into(),
            ..Self::default()
        }
    }

    /// Provider name, falling back to [`DEFAULT_PROVIDER`] when unset.
    #[must_use]
    pub fn provider_name(&self) -> &str {
        if self.provider.is_empty() {
            DEFAULT_PROVIDER
        } else {
            &self.provider
        }
    }

    /// Expression producing the connection string in generated code: the bound settings
    /// property if any, otherwise the literal string.
    #[must_use]
    pub fn connection_string_expression(&self) -> CodeExpression {
        match &self.property_reference {
            Some(reference) => reference.clone(),
            None => CodeExpression::string(self.connection_string.clone()),
        }
    }
}
