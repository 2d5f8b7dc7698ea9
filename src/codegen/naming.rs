//! Identifier fix-up and per-scope name uniqueness.
//!
//! Names in a dataset schema are free text (`Order Details`, `1stQuarter`, `class`). Before
//! they become class, property or field names they are made identifier-safe with
//! [`fix_identifier`], escaped for the target language with [`escape`], and made unique within
//! their declaring type with a [`NameScope`].

use std::collections::HashSet;

use crate::codedom::CodeEmitter;

/// Replaces every character that cannot appear in an identifier with `_`, and prefixes
/// names that start with a digit with `_`. Empty names become `_`.
#[must_use]
pub fn fix_identifier(name: &str) -> String {
    let mut fixed: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    match fixed.chars().next() {
        None => fixed.push('_'),
        Some(first) if first.is_numeric() => fixed.insert(0, '_'),
        Some(_) => {}
    }
    fixed
}

/// Makes `name` identifier-safe and escapes it if the emitter's language reserves it.
#[must_use]
pub fn escape(emitter: &dyn CodeEmitter, name: &str) -> String {
    let fixed = fix_identifier(name);
    if emitter.is_valid_identifier(&fixed) {
        fixed
    } else {
        emitter.create_escaped_identifier(&fixed)
    }
}

/// Lower-cases the first character, for parameter and local names.
#[must_use]
pub fn camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Set of names already taken in one declaring type.
///
/// Comparison is case-insensitive so that generated members also stay distinct for
/// case-insensitive target languages.
#[derive(Debug, Clone, Default)]
pub struct NameScope {
    taken: HashSet<String>,
}

impl NameScope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scope whose `reserved` names can never be handed out.
    pub fn with_reserved<'a>(reserved: impl IntoIterator<Item = &'a str>) -> Self {
        let mut scope = Self::new();
        for name in reserved {
            scope.taken.insert(name.to_lowercase());
        }
        scope
    }

    /// Returns `true` if `name` is already taken.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.taken.contains(&name.to_lowercase())
    }

    /// Claims `name`, appending `1`, `2`, ... until it is unique, and returns the claimed name.
    pub fn claim(&mut self, name: &str) -> String {
        let base = fix_identifier(name);
        let mut candidate = base.clone();
        let mut counter = 0u32;
        while self.contains(&candidate) {
            counter += 1;
            candidate = format!("{}{}", base, counter);
        }
        self.taken.insert(candidate.to_lowercase());
        candidate
    }
}
