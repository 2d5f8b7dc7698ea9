//! Type references used throughout the code document.

use std::collections::BTreeMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Free-form metadata attached to a code object by generators.
///
/// Compact serialization formats only apply to objects that carry no user data.
pub type UserData = BTreeMap<String, String>;

bitflags! {
    /// Options that change how a type reference is rendered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct TypeReferenceOptions: u32 {
        /// Render with a `global::` qualifier
        const GLOBAL_REFERENCE = 0x1;
        /// The reference names a generic type parameter
        const GENERIC_TYPE_PARAMETER = 0x2;
    }
}

impl TypeReferenceOptions {
    const NAMES: [(&'static str, TypeReferenceOptions); 2] = [
        ("GlobalReference", TypeReferenceOptions::GLOBAL_REFERENCE),
        ("GenericTypeParameter", TypeReferenceOptions::GENERIC_TYPE_PARAMETER),
    ];

    /// Renders the options as enum text: `0` for none, otherwise the flag names joined
    /// by `", "`.
    #[must_use]
    pub fn to_enum_text(self) -> String {
        if self.is_empty() {
            return "0".to_string();
        }
        Self::NAMES
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parses enum text produced by [`TypeReferenceOptions::to_enum_text`]. Numeric values
    /// are accepted as raw bits.
    #[must_use]
    pub fn from_enum_text(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(bits) = text.parse::<u32>() {
            return Self::from_bits(bits);
        }
        let mut options = Self::empty();
        for part in text.split(',') {
            let part = part.trim();
            let (_, flag) = Self::NAMES
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(part))?;
            options |= *flag;
        }
        Some(options)
    }
}

/// A reference to a type, by name.
///
/// Nested types are written with `.` separators in `base_type`; generic arguments are kept
/// separately in `type_arguments`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CodeTypeReference {
    /// Full name of the type without generic arguments
    pub base_type: String,
    /// Rendering options
    pub options: TypeReferenceOptions,
    /// Generic type arguments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<CodeTypeReference>,
    /// Array rank, 0 when this is not an array
    #[serde(default)]
    pub array_rank: u32,
    /// Element type for arrays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_element_type: Option<Box<CodeTypeReference>>,
    /// Generator metadata
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub user_data: UserData,
}

impl CodeTypeReference {
    /// Creates a plain reference to `base_type`.
    pub fn new(base_type: impl Into<String>) -> Self {
        Self {
            base_type: base_type.into(),
            ..Self::default()
        }
    }

    /// Creates a `global::` qualified reference to `base_type`.
    pub fn global(base_type: impl Into<String>) -> Self {
        Self {
            base_type: base_type.into(),
            options: TypeReferenceOptions::GLOBAL_REFERENCE,
            ..Self::default()
        }
    }

    /// Creates a generic reference `base_type<arguments>`.
    pub fn generic(base_type: impl Into<String>, arguments: Vec<CodeTypeReference>) -> Self {
        Self {
            base_type: base_type.into(),
            options: TypeReferenceOptions::GLOBAL_REFERENCE,
            type_arguments: arguments,
            ..Self::default()
        }
    }

    /// Creates a single-dimensional array of `element`.
    #[must_use]
    pub fn array_of(element: CodeTypeReference) -> Self {
        Self {
            base_type: element.base_type.clone(),
            array_rank: 1,
            array_element_type: Some(Box::new(element)),
            ..Self::default()
        }
    }

    /// Creates a reference to `System.Nullable<element>`.
    #[must_use]
    pub fn nullable(element: CodeTypeReference) -> Self {
        Self::generic("System.Nullable", vec![element])
    }

    /// Creates a reference to `void`.
    #[must_use]
    pub fn void() -> Self {
        Self::new("System.Void")
    }

    /// Returns `true` for array references.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.array_rank > 0
    }

    /// Returns `true` if the reference names `System.Void`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.base_type == "System.Void" || self.base_type == "void"
    }

    /// Returns `true` when neither this reference nor its parts carry generator metadata,
    /// generic arguments or array shape.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.user_data.is_empty()
            && self.type_arguments.is_empty()
            && !self.is_array()
            && self.array_element_type.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_enum_text() {
        assert_eq!(TypeReferenceOptions::empty().to_enum_text(), "0");
        assert_eq!(
            TypeReferenceOptions::GLOBAL_REFERENCE.to_enum_text(),
            "GlobalReference"
        );
        let both = TypeReferenceOptions::all();
        assert_eq!(both.to_enum_text(), "GlobalReference, GenericTypeParameter");
        assert_eq!(TypeReferenceOptions::from_enum_text(&both.to_enum_text()), Some(both));
        assert_eq!(
            TypeReferenceOptions::from_enum_text("0"),
            Some(TypeReferenceOptions::empty())
        );
        assert_eq!(TypeReferenceOptions::from_enum_text("Bogus"), None);
    }

    #[test]
    fn plain_references() {
        assert!(CodeTypeReference::new("A.B").is_plain());
        assert!(!CodeTypeReference::array_of(CodeTypeReference::new("A")).is_plain());
        assert!(!CodeTypeReference::nullable(CodeTypeReference::new("System.Int32")).is_plain());
        let mut element_only = CodeTypeReference::new("A.B");
        element_only.array_element_type = Some(Box::new(CodeTypeReference::new("A")));
        assert!(!element_only.is_plain());
    }
}
