//! Data providers and the types generated adapters are built from.
//!
//! A connection names its provider by invariant name (`System.Data.SqlClient`). The registry
//! maps that name to the connection, command, adapter and parameter types the generated
//! table adapters use, and to the assemblies those types live in. Providers unknown to the
//! built-in table can be registered by callers.

use crate::assembly::{AssemblyIdentity, AssemblyVersion};

/// Types of one ADO.NET data provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataProvider {
    /// Invariant name, e.g. `System.Data.SqlClient`
    pub invariant_name: String,
    /// Connection type
    pub connection_type: String,
    /// Command type
    pub command_type: String,
    /// Data adapter type
    pub adapter_type: String,
    /// Parameter type
    pub parameter_type: String,
    /// Transaction type
    pub transaction_type: String,
    /// Assemblies the provider types live in
    pub assemblies: Vec<AssemblyIdentity>,
}

impl DataProvider {
    /// Creates a provider whose types follow the `<Prefix>Connection`, `<Prefix>Command`, ...
    /// naming pattern inside `namespace`.
    pub fn with_prefix(
        invariant_name: impl Into<String>,
        namespace: &str,
        prefix: &str,
        assemblies: Vec<AssemblyIdentity>,
    ) -> Self {
        Self {
            invariant_name: invariant_name.into(),
            connection_type: format!("{}.{}Connection", namespace, prefix),
            command_type: format!("{}.{}Command", namespace, prefix),
            adapter_type: format!("{}.{}DataAdapter", namespace, prefix),
            parameter_type: format!("{}.{}Parameter", namespace, prefix),
            transaction_type: format!("{}.{}Transaction", namespace, prefix),
            assemblies,
        }
    }
}

/// Lookup table of data providers by invariant name.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<DataProvider>,
}

impl ProviderRegistry {
    /// Creates a registry with the framework providers.
    #[must_use]
    pub fn new() -> Self {
        let system_data = AssemblyIdentity::framework("System.Data", AssemblyVersion::new(4, 0, 0, 0));
        let oracle = AssemblyIdentity::framework(
            "System.Data.OracleClient",
            AssemblyVersion::new(4, 0, 0, 0),
        );
        let ce = AssemblyIdentity::new(
            "System.Data.SqlServerCe",
            AssemblyVersion::new(3, 5, 0, 0),
            None,
            Some([0x89, 0x84, 0x5d, 0xcd, 0x80, 0x80, 0xcc, 0x91]),
        );

        Self {
            providers: vec![
                DataProvider::with_prefix(
                    "System.Data.SqlClient",
                    "System.Data.SqlClient",
                    "Sql",
                    vec![system_data.clone()],
                ),
                DataProvider::with_prefix(
                    "System.Data.OleDb",
                    "System.Data.OleDb",
                    "OleDb",
                    vec![system_data.clone()],
                ),
                DataProvider::with_prefix(
                    "System.Data.Odbc",
                    "System.Data.Odbc",
                    "Odbc",
                    vec![system_data],
                ),
                DataProvider::with_prefix(
                    "System.Data.OracleClient",
                    "System.Data.OracleClient",
                    "Oracle",
                    vec![oracle],
                ),
                DataProvider::with_prefix(
                    "System.Data.SqlServerCe.3.5",
                    "System.Data.SqlServerCe",
                    "SqlCe",
                    vec![ce],
                ),
            ],
        }
    }

    /// Creates a registry without any provider.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Adds or replaces the provider with the same invariant name.
    pub fn register(&mut self, provider: DataProvider) {
        match self
            .providers
            .iter_mut()
            .find(|p| p.invariant_name == provider.invariant_name)
        {
            Some(existing) => *existing = provider,
            None => self.providers.push(provider),
        }
    }

    /// Returns the provider registered as `invariant_name`.
    #[must_use]
    pub fn get(&self, invariant_name: &str) -> Option<&DataProvider> {
        self.providers
            .iter()
            .find(|p| p.invariant_name == invariant_name)
    }

    /// Distinct assemblies required by the named providers. Unknown names contribute nothing.
    #[must_use]
    pub fn assemblies_for<S: AsRef<str>>(&self, invariant_names: &[S]) -> Vec<AssemblyIdentity> {
        let mut assemblies: Vec<AssemblyIdentity> = Vec::new();
        for name in invariant_names {
            let Some(provider) = self.get(name.as_ref()) else {
                log::debug!("no registered provider '{}'", name.as_ref());
                continue;
            };
            for assembly in &provider.assemblies {
                if !assemblies.contains(assembly) {
                    assemblies.push(assembly.clone());
                }
            }
        }
        assemblies
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framework_providers_are_known() {
        let registry = ProviderRegistry::new();
        let sql = registry.get("System.Data.SqlClient").unwrap();
        assert_eq!(sql.connection_type, "System.Data.SqlClient.SqlConnection");
        assert_eq!(sql.adapter_type, "System.Data.SqlClient.SqlDataAdapter");
        let ce = registry.get("System.Data.SqlServerCe.3.5").unwrap();
        assert_eq!(ce.command_type, "System.Data.SqlServerCe.SqlCeCommand");
        assert!(registry.get("Npgsql").is_none());
    }

    #[test]
    fn assemblies_are_distinct() {
        let registry = ProviderRegistry::new();
        let assemblies = registry.assemblies_for(&[
            "System.Data.SqlClient",
            "System.Data.OleDb",
            "System.Data.OracleClient",
            "Unknown",
        ]);
        let names: Vec<&str> = assemblies.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["System.Data", "System.Data.OracleClient"]);
    }

    #[test]
    fn custom_providers_can_be_registered() {
        let mut registry = ProviderRegistry::empty();
        registry.register(DataProvider::with_prefix(
            "Npgsql",
            "Npgsql",
            "Npgsql",
            vec![AssemblyIdentity::new("Npgsql", AssemblyVersion::new(2, 0, 0, 0), None, None)],
        ));
        assert_eq!(
            registry.get("Npgsql").unwrap().parameter_type,
            "Npgsql.NpgsqlParameter"
        );
        assert_eq!(registry.assemblies_for(&["Npgsql"]).len(), 1);
    }
}
