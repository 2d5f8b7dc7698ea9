//! Compact text format for connection-string property references.
//!
//! Generated adapters read their connection string through a property expression that the
//! designer persists as text. Two expression shapes have a compact, dot-joined form:
//!
//! - application settings, `Type.Middle.Outer`:
//!   `ApplicationSettings.<BaseType>.<Options>.<Middle>.<Outer>`
//! - app-config indexer, `Type.Middle["index"].Outer`:
//!   `AppConfig.<BaseType>.<Options>.<index>.<Middle>.<Outer>`
//!
//! `<Options>` is the enum text of the type reference options, `<BaseType>` may itself
//! contain dots. Every other expression, and every node carrying generator metadata, is written
//! as JSON instead; text with neither prefix is read back as JSON, which also keeps older
//! persisted values readable.
//!
//! # Examples
//!
//! ```rust
//! use dsgen::codedom::{CodeExpression, CodeTypeReference};
//! use dsgen::serializer::PropertyReferenceSerializer;
//!
//! let expression = CodeExpression::type_ref(CodeTypeReference::global("App.Properties.Settings"))
//!     .property("Default")
//!     .property("MainConnectionString");
//! let text = PropertyReferenceSerializer::serialize(&expression)?;
//! assert_eq!(
//!     text,
//!     "ApplicationSettings.App.Properties.Settings.GlobalReference.Default.MainConnectionString"
//! );
//! assert_eq!(PropertyReferenceSerializer::deserialize(&text)?, expression);
//! # Ok::<(), dsgen::Error>(())
//! ```

use crate::{
    codedom::{CodeExpression, CodeTypeReference, ExpressionKind, PrimitiveValue, TypeReferenceOptions},
    Error, Result,
};

const APPLICATION_SETTINGS: &str = "ApplicationSettings";
const APP_CONFIG: &str = "AppConfig";

/// A property-reference expression, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyReference {
    /// `Type.Middle.Outer`
    ApplicationSettings {
        /// The settings type
        type_ref: CodeTypeReference,
        /// Property read on the type
        middle: String,
        /// Property read on the middle value
        property: String,
    },
    /// `Type.Middle["index"].Outer`
    AppConfig {
        /// The configuration type
        type_ref: CodeTypeReference,
        /// Collection property read on the type
        middle: String,
        /// String index into the collection
        index: String,
        /// Property read on the indexed value
        property: String,
    },
    /// Any other expression
    Opaque(CodeExpression),
}

impl PropertyReference {
    /// Classifies `expression`.
    #[must_use]
    pub fn from_expression(expression: &CodeExpression) -> Self {
        Self::recognize(expression).unwrap_or_else(|| PropertyReference::Opaque(expression.clone()))
    }

    fn recognize(expression: &CodeExpression) -> Option<Self> {
        let (target, property) = property_of(expression)?;
        if let Some((type_ref, middle)) = settings_of(target) {
            return Some(PropertyReference::ApplicationSettings {
                type_ref,
                middle,
                property,
            });
        }

        if !target.user_data.is_empty() {
            return None;
        }
        let ExpressionKind::Indexer { target, indices } = &target.kind else {
            return None;
        };
        let [index] = indices.as_slice() else {
            return None;
        };
        let ExpressionKind::Primitive(PrimitiveValue::String(index_value)) = &index.kind else {
            return None;
        };
        if !index.user_data.is_empty() || index_value.contains('.') {
            return None;
        }
        let (type_ref, middle) = settings_of(target)?;
        Some(PropertyReference::AppConfig {
            type_ref,
            middle,
            index: index_value.clone(),
            property,
        })
    }

    /// The expression this reference stands for.
    #[must_use]
    pub fn to_expression(&self) -> CodeExpression {
        match self {
            PropertyReference::ApplicationSettings {
                type_ref,
                middle,
                property,
            } => CodeExpression::type_ref(type_ref.clone())
                .property(middle)
                .property(property),
            PropertyReference::AppConfig {
                type_ref,
                middle,
                index,
                property,
            } => CodeExpression::type_ref(type_ref.clone())
                .property(middle)
                .index(vec![CodeExpression::string(index.clone())])
                .property(property),
            PropertyReference::Opaque(expression) => expression.clone(),
        }
    }

    /// Writes the persisted form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] when an opaque expression cannot be written, and
    /// [`Error::Internal`] when its JSON form is longer than `i32::MAX` bytes.
    pub fn encode(&self) -> Result<String> {
        match self {
            PropertyReference::ApplicationSettings {
                type_ref,
                middle,
                property,
            } => Ok([
                APPLICATION_SETTINGS,
                &type_ref.base_type,
                &type_ref.options.to_enum_text(),
                middle,
                property,
            ]
            .join(".")),
            PropertyReference::AppConfig {
                type_ref,
                middle,
                index,
                property,
            } => Ok([
                APP_CONFIG,
                &type_ref.base_type,
                &type_ref.options.to_enum_text(),
                index,
                middle,
                property,
            ]
            .join(".")),
            PropertyReference::Opaque(expression) => {
                log::debug!("property reference has no compact form, writing JSON");
                let text = serde_json::to_string(expression)?;
                if i32::try_from(text.len()).is_err() {
                    return Err(Error::Internal(format!(
                        "serialized property reference is {} bytes long",
                        text.len()
                    )));
                }
                Ok(text)
            }
        }
    }

    /// Reads a persisted form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] for compact text with too few parts or unknown options,
    /// and [`Error::Json`] when text without a compact prefix is not a JSON expression.
    pub fn decode(text: &str) -> Result<Self> {
        let mut tokens: Vec<&str> = text.split('.').collect();
        let app_config = match tokens.first().copied() {
            Some(APPLICATION_SETTINGS) => false,
            Some(APP_CONFIG) => true,
            _ => {
                let expression: CodeExpression = serde_json::from_str(text)?;
                return Ok(PropertyReference::Opaque(expression));
            }
        };

        let needed = if app_config { 6 } else { 5 };
        if tokens.len() < needed {
            return Err(malformed_error!("Property reference '{}' has too few parts", text));
        }
        let mut take = || tokens.pop().map(str::to_string).unwrap_or_default();
        let property = take();
        let middle = take();
        let index = if app_config { Some(take()) } else { None };
        let options_text = take();
        let options = TypeReferenceOptions::from_enum_text(&options_text).ok_or_else(|| {
            malformed_error!("Invalid type reference options '{}'", options_text)
        })?;
        let type_ref = CodeTypeReference {
            base_type: tokens[1..].join("."),
            options,
            ..CodeTypeReference::default()
        };

        Ok(match index {
            Some(index) => PropertyReference::AppConfig {
                type_ref,
                middle,
                index,
                property,
            },
            None => PropertyReference::ApplicationSettings {
                type_ref,
                middle,
                property,
            },
        })
    }
}

/// Target and name of a metadata-free property reference with a dot-free name.
fn property_of(expression: &CodeExpression) -> Option<(&CodeExpression, String)> {
    if !expression.user_data.is_empty() {
        return None;
    }
    match &expression.kind {
        ExpressionKind::PropertyReference {
            target: Some(target),
            property_name,
        } if !property_name.contains('.') => Some((target, property_name.clone())),
        _ => None,
    }
}

/// `Type.Middle` where the type is plain and nothing carries metadata.
fn settings_of(expression: &CodeExpression) -> Option<(CodeTypeReference, String)> {
    let (target, middle) = property_of(expression)?;
    if !target.user_data.is_empty() {
        return None;
    }
    match &target.kind {
        ExpressionKind::TypeReference(type_ref) if type_ref.is_plain() => {
            Some((type_ref.clone(), middle))
        }
        _ => None,
    }
}

/// Reads and writes persisted property references.
pub struct PropertyReferenceSerializer;

impl PropertyReferenceSerializer {
    /// Writes `expression` in its compact form, or as JSON.
    ///
    /// # Errors
    ///
    /// See [`PropertyReference::encode`].
    pub fn serialize(expression: &CodeExpression) -> Result<String> {
        PropertyReference::from_expression(expression).encode()
    }

    /// Reads an expression written by [`PropertyReferenceSerializer::serialize`].
    ///
    /// # Errors
    ///
    /// See [`PropertyReference::decode`].
    pub fn deserialize(text: &str) -> Result<CodeExpression> {
        Ok(PropertyReference::decode(text)?.to_expression())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> CodeExpression {
        CodeExpression::type_ref(CodeTypeReference::global("Northwind.Properties.Settings"))
            .property("Default")
            .property("NorthwindConnectionString")
    }

    fn app_config() -> CodeExpression {
        CodeExpression::type_ref(CodeTypeReference::new("System.Configuration.ConfigurationManager"))
            .property("ConnectionStrings")
            .index(vec![CodeExpression::string("Northwind")])
            .property("ConnectionString")
    }

    #[test]
    fn application_settings_shape() {
        let text = PropertyReferenceSerializer::serialize(&settings()).unwrap();
        assert_eq!(
            text,
            "ApplicationSettings.Northwind.Properties.Settings.GlobalReference.Default.NorthwindConnectionString"
        );
        match PropertyReference::decode(&text).unwrap() {
            PropertyReference::ApplicationSettings {
                type_ref,
                middle,
                property,
            } => {
                assert_eq!(type_ref.base_type, "Northwind.Properties.Settings");
                assert_eq!(type_ref.options, TypeReferenceOptions::GLOBAL_REFERENCE);
                assert_eq!(middle, "Default");
                assert_eq!(property, "NorthwindConnectionString");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(PropertyReferenceSerializer::deserialize(&text).unwrap(), settings());
    }

    #[test]
    fn app_config_shape() {
        let text = PropertyReferenceSerializer::serialize(&app_config()).unwrap();
        assert_eq!(
            text,
            "AppConfig.System.Configuration.ConfigurationManager.0.Northwind.ConnectionStrings.ConnectionString"
        );
        match PropertyReference::decode(&text).unwrap() {
            PropertyReference::AppConfig {
                type_ref,
                middle,
                index,
                property,
            } => {
                assert_eq!(type_ref.base_type, "System.Configuration.ConfigurationManager");
                assert!(type_ref.options.is_empty());
                assert_eq!(index, "Northwind");
                assert_eq!(middle, "ConnectionStrings");
                assert_eq!(property, "ConnectionString");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(PropertyReferenceSerializer::deserialize(&text).unwrap(), app_config());
    }

    #[test]
    fn metadata_forces_fallback() {
        let mut expression = settings();
        expression
            .user_data
            .insert("origin".to_string(), "designer".to_string());
        assert!(matches!(
            PropertyReference::from_expression(&expression),
            PropertyReference::Opaque(_)
        ));
        let text = PropertyReferenceSerializer::serialize(&expression).unwrap();
        assert!(text.starts_with('{'));
        assert_eq!(PropertyReferenceSerializer::deserialize(&text).unwrap(), expression);
    }

    #[test]
    fn non_plain_types_and_dotted_indexes_fall_back() {
        let generic = CodeExpression::type_ref(CodeTypeReference::generic(
            "Settings",
            vec![CodeTypeReference::new("System.String")],
        ))
        .property("Default")
        .property("Value");
        assert!(matches!(
            PropertyReference::from_expression(&generic),
            PropertyReference::Opaque(_)
        ));

        let dotted = CodeExpression::type_ref(CodeTypeReference::new("Config"))
            .property("Items")
            .index(vec![CodeExpression::string("a.b")])
            .property("Value");
        let text = PropertyReferenceSerializer::serialize(&dotted).unwrap();
        assert_eq!(PropertyReferenceSerializer::deserialize(&text).unwrap(), dotted);
    }

    #[test]
    fn element_type_without_rank_falls_back() {
        let mut type_ref = CodeTypeReference::new("A.B");
        type_ref.array_element_type = Some(Box::new(CodeTypeReference::new("System.Int32")));
        let expression = CodeExpression::type_ref(type_ref).property("M").property("P");
        assert!(matches!(
            PropertyReference::from_expression(&expression),
            PropertyReference::Opaque(_)
        ));
        let text = PropertyReferenceSerializer::serialize(&expression).unwrap();
        assert!(text.starts_with('{'));
        assert_eq!(PropertyReferenceSerializer::deserialize(&text).unwrap(), expression);
    }

    #[test]
    fn other_expressions_round_trip_as_json() {
        let expression = CodeExpression::this().field("connection").property("ConnectionString");
        let text = PropertyReferenceSerializer::serialize(&expression).unwrap();
        assert_eq!(PropertyReferenceSerializer::deserialize(&text).unwrap(), expression);

        let two_indexes = CodeExpression::type_ref(CodeTypeReference::new("Config"))
            .property("Items")
            .index(vec![CodeExpression::string("a"), CodeExpression::string("b")])
            .property("Value");
        assert!(matches!(
            PropertyReference::from_expression(&two_indexes),
            PropertyReference::Opaque(_)
        ));
    }

    #[test]
    fn malformed_compact_text() {
        assert!(matches!(
            PropertyReference::decode("ApplicationSettings.Default.Value"),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            PropertyReference::decode("ApplicationSettings.T.Bogus.Default.Value"),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            PropertyReferenceSerializer::deserialize("not json"),
            Err(Error::Json(_))
        ));
    }
}
