//! Assembly identities and the assembly-resolution seam.
//!
//! Generated code has to be compiled against a set of .NET assemblies: the three core framework
//! assemblies every typed dataset needs, the assemblies of the data providers its connections
//! use, and optionally the LINQ extension assembly. This module describes those references.
//!
//! # Key Components
//!
//! - [`AssemblyIdentity`] - name, version, culture and public key token of an assembly
//! - [`AssemblyVersion`] - four-part version (major.minor.build.revision)
//! - [`AssemblyResolver`] - looks up an assembly by (partial) identity
//! - [`KnownAssemblies`] - the default resolver, seeded with framework assemblies
//!
//! # Display Names
//!
//! Identities are parsed from and rendered to the familiar display-name format:
//!
//! ```text
//! System.Data, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089
//! ```
//!
//! # Examples
//!
//! ```rust
//! use dsgen::assembly::{AssemblyIdentity, AssemblyResolver, KnownAssemblies};
//!
//! let wanted = AssemblyIdentity::parse(
//!     "System.Data.DataSetExtensions, Version=3.5.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089",
//! )?;
//! let found = KnownAssemblies::new().resolve(&wanted);
//! assert_eq!(found.map(|a| a.name), Some("System.Data.DataSetExtensions".to_string()));
//! # Ok::<(), dsgen::Error>(())
//! ```

use std::{fmt, fmt::Write as _, str::FromStr};

use crate::{Error, Result};

/// Public key token of the ECMA/Microsoft framework key.
pub const FRAMEWORK_PUBLIC_KEY_TOKEN: [u8; 8] = [0xb7, 0x7a, 0x5c, 0x56, 0x19, 0x34, 0xe0, 0x89];

/// Identity of one .NET assembly.
///
/// Equality and hashing consider every component, including the public key token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssemblyIdentity {
    /// Simple assembly name (e.g. "System.Data").
    pub name: String,

    /// Four-part version number.
    pub version: AssemblyVersion,

    /// Culture of satellite assemblies. `None` for culture-neutral assemblies.
    pub culture: Option<String>,

    /// Eight-byte public key token of strong-named assemblies.
    pub public_key_token: Option<[u8; 8]>,
}

/// Four-part assembly version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AssemblyVersion {
    /// Major version
    pub major: u16,
    /// Minor version
    pub minor: u16,
    /// Build number
    pub build: u16,
    /// Revision number
    pub revision: u16,
}

impl AssemblyIdentity {
    /// Creates a new identity.
    ///
    /// # Arguments
    ///
    /// * `name` - Simple assembly name
    /// * `version` - Assembly version
    /// * `culture` - Culture, `None` for culture-neutral
    /// * `public_key_token` - Strong-name token, `None` if not strong-named
    pub fn new(
        name: impl Into<String>,
        version: AssemblyVersion,
        culture: Option<String>,
        public_key_token: Option<[u8; 8]>,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            culture,
            public_key_token,
        }
    }

    /// Creates a culture-neutral identity signed with the framework key.
    pub fn framework(name: impl Into<String>, version: AssemblyVersion) -> Self {
        Self::new(name, version, None, Some(FRAMEWORK_PUBLIC_KEY_TOKEN))
    }

    /// Parses an assembly display name.
    ///
    /// Components other than the simple name are optional. `Culture=neutral` and
    /// `PublicKeyToken=null` map to `None`; unknown components are ignored.
    ///
    /// # Arguments
    ///
    /// * `display_name` - e.g. `"System.Xml, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089"`
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the name is empty, the version is not a dotted
    /// list of at most four 16-bit numbers, or the token is not 16 hex digits.
    pub fn parse(display_name: &str) -> Result<Self> {
        let mut parts = display_name.split(',').map(str::trim);

        let name = parts.next().unwrap_or_default().to_string();
        if name.is_empty() {
            return Err(malformed_error!("Assembly name cannot be empty"));
        }

        let mut identity = Self::new(name, AssemblyVersion::default(), None, None);
        for part in parts {
            if let Some(value) = part.strip_prefix("Version=") {
                identity.version = AssemblyVersion::parse(value)?;
            } else if let Some(value) = part.strip_prefix("Culture=") {
                if !value.eq_ignore_ascii_case("neutral") && !value.is_empty() {
                    identity.culture = Some(value.to_string());
                }
            } else if let Some(value) = part.strip_prefix("PublicKeyToken=") {
                if value != "null" && !value.is_empty() {
                    let bytes = hex::decode(value).map_err(|e| {
                        malformed_error!("Invalid hex in PublicKeyToken '{}': {}", value, e)
                    })?;
                    let token: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                        malformed_error!(
                            "PublicKeyToken must be exactly 8 bytes, got {} bytes from '{}'",
                            bytes.len(),
                            value
                        )
                    })?;
                    identity.public_key_token = Some(token);
                }
            }
        }

        Ok(identity)
    }

    /// Renders the full display name of this identity.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut result = String::with_capacity(self.name.len() + 80);
        result.push_str(&self.name);
        let _ = write!(result, ", Version={}", self.version);
        let _ = write!(
            result,
            ", Culture={}",
            self.culture.as_deref().unwrap_or("neutral")
        );
        result.push_str(", PublicKeyToken=");
        match &self.public_key_token {
            Some(token) => result.push_str(&hex::encode(token)),
            None => result.push_str("null"),
        }
        result
    }

    /// File name a compiler expects for this assembly, `<name>.dll`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.dll", self.name)
    }

    /// Returns `true` if this assembly can be used where `required` is referenced.
    ///
    /// Names match case-insensitively, cultures exactly, and the version must be equal or
    /// newer within the same major version. A required token, when present, must match.
    #[must_use]
    pub fn satisfies(&self, required: &AssemblyIdentity) -> bool {
        if !self.name.eq_ignore_ascii_case(&required.name) || self.culture != required.culture {
            return false;
        }
        if required.public_key_token.is_some() && self.public_key_token != required.public_key_token
        {
            return false;
        }
        self.version.is_compatible_with(&required.version)
    }
}

impl AssemblyVersion {
    /// Creates a version from its four components.
    #[must_use]
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Returns `true` if this version can stand in for `required`: same major, not older.
    #[must_use]
    pub fn is_compatible_with(&self, required: &AssemblyVersion) -> bool {
        self.major == required.major && self >= required
    }

    /// Parses a dotted version with one to four components. Missing components are zero.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] for more than four components or a component that
    /// is not a 16-bit unsigned number.
    pub fn parse(version_str: &str) -> Result<Self> {
        let parts: Vec<&str> = version_str.split('.').collect();
        if parts.len() > 4 {
            return Err(malformed_error!("Invalid version format: {}", version_str));
        }

        let mut components = [0u16; 4];
        for (i, part) in parts.iter().enumerate() {
            components[i] = part
                .parse::<u16>()
                .map_err(|_| malformed_error!("Invalid version component: {}", part))?;
        }

        Ok(Self::new(
            components[0],
            components[1],
            components[2],
            components[3],
        ))
    }
}

impl fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

impl fmt::Display for AssemblyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

impl FromStr for AssemblyVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl FromStr for AssemblyIdentity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Looks up assemblies by identity.
///
/// Generation asks the resolver for optional references (the LINQ extension assembly). A
/// resolver that returns `None` makes the reference go missing, which is logged but not fatal.
pub trait AssemblyResolver {
    /// Returns the available assembly satisfying `identity`, if any.
    fn resolve(&self, identity: &AssemblyIdentity) -> Option<AssemblyIdentity>;
}

/// A resolver over a fixed list of available assemblies.
///
/// [`KnownAssemblies::new`] is pre-seeded with the framework assemblies used by generated
/// typed datasets and the built-in data providers.
#[derive(Debug, Clone)]
pub struct KnownAssemblies {
    available: Vec<AssemblyIdentity>,
}

impl KnownAssemblies {
    /// Creates a resolver seeded with the framework assemblies.
    #[must_use]
    pub fn new() -> Self {
        const V2: AssemblyVersion = AssemblyVersion::new(2, 0, 0, 0);
        const V35: AssemblyVersion = AssemblyVersion::new(3, 5, 0, 0);
        const V4: AssemblyVersion = AssemblyVersion::new(4, 0, 0, 0);

        let available = vec![
            AssemblyIdentity::framework("System", V4),
            AssemblyIdentity::framework("System.Data", V4),
            AssemblyIdentity::framework("System.Xml", V4),
            AssemblyIdentity::framework("System.Core", V4),
            AssemblyIdentity::framework("System.Data.DataSetExtensions", V35),
            AssemblyIdentity::framework("System.Data.DataSetExtensions", V4),
            AssemblyIdentity::framework("System.Data.OracleClient", V4),
            AssemblyIdentity::new(
                "System.Data.SqlServerCe",
                V35,
                None,
                Some([0x89, 0x84, 0x5d, 0xcd, 0x80, 0x80, 0xcc, 0x91]),
            ),
            AssemblyIdentity::framework("System.Transactions", V2),
        ];
        Self { available }
    }

    /// Creates a resolver that knows no assembly at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            available: Vec::new(),
        }
    }

    /// Adds an available assembly.
    #[must_use]
    pub fn with(mut self, identity: AssemblyIdentity) -> Self {
        self.available.push(identity);
        self
    }

    /// Iterates over the available assemblies.
    pub fn iter(&self) -> impl Iterator<Item = &AssemblyIdentity> {
        self.available.iter()
    }
}

impl Default for KnownAssemblies {
    fn default() -> Self {
        Self::new()
    }
}

impl AssemblyResolver for KnownAssemblies {
    fn resolve(&self, identity: &AssemblyIdentity) -> Option<AssemblyIdentity> {
        self.available
            .iter()
            .filter(|candidate| candidate.satisfies(identity))
            .min_by_key(|candidate| candidate.version)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_display_name() {
        let identity = AssemblyIdentity::parse(
            "System.Data, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089",
        )
        .unwrap();
        assert_eq!(identity.name, "System.Data");
        assert_eq!(identity.version, AssemblyVersion::new(4, 0, 0, 0));
        assert!(identity.culture.is_none());
        assert_eq!(identity.public_key_token, Some(FRAMEWORK_PUBLIC_KEY_TOKEN));
        assert_eq!(
            identity.display_name(),
            "System.Data, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089"
        );
        assert_eq!(identity.file_name(), "System.Data.dll");
    }

    #[test]
    fn parse_simple_name_only() {
        let identity: AssemblyIdentity = "MyLib".parse().unwrap();
        assert_eq!(identity.version, AssemblyVersion::default());
        assert_eq!(
            identity.to_string(),
            "MyLib, Version=0.0.0.0, Culture=neutral, PublicKeyToken=null"
        );
    }

    #[test]
    fn parse_errors() {
        assert!(AssemblyIdentity::parse("").is_err());
        assert!(AssemblyIdentity::parse("A, Version=1.2.3.4.5").is_err());
        assert!(AssemblyIdentity::parse("A, Version=1.x").is_err());
        assert!(AssemblyIdentity::parse("A, PublicKeyToken=zz").is_err());
        assert!(AssemblyIdentity::parse("A, PublicKeyToken=b77a5c56").is_err());
    }

    #[test]
    fn version_compatibility() {
        let v35 = AssemblyVersion::new(3, 5, 0, 0);
        let v36 = AssemblyVersion::new(3, 6, 0, 0);
        let v4 = AssemblyVersion::new(4, 0, 0, 0);
        assert!(v36.is_compatible_with(&v35));
        assert!(!v35.is_compatible_with(&v36));
        assert!(!v4.is_compatible_with(&v35));
    }

    #[test]
    fn known_assemblies_resolve_linq_extension() {
        let wanted = AssemblyIdentity::framework(
            "System.Data.DataSetExtensions",
            AssemblyVersion::new(3, 5, 0, 0),
        );
        let resolved = KnownAssemblies::new().resolve(&wanted).unwrap();
        assert_eq!(resolved.version, AssemblyVersion::new(3, 5, 0, 0));
        assert!(KnownAssemblies::empty().resolve(&wanted).is_none());
    }
}
