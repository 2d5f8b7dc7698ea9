//! Code emission: rendering a code document to source text.
//!
//! The generators only ever build code documents; turning them into text is the job of a
//! [`CodeEmitter`]. One emitter ships with the crate, [`CSharpEmitter`], which renders in the
//! same layout the classic CodeDOM C# provider used (block braces, `global::` qualified
//! references, four-space indentation).

mod csharp;

pub use csharp::CSharpEmitter;

use crate::{
    codedom::{CodeCompileUnit, CodeNamespace, CodeTypeDeclaration, CodeTypeReference},
    Error, Result,
};

/// A code-emission service for one target language.
pub trait CodeEmitter {
    /// Display name of the language, e.g. `CSharp`.
    fn language(&self) -> &'static str;

    /// File extension for emitted source files, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Returns `true` if `value` can be used verbatim as an identifier.
    fn is_valid_identifier(&self, value: &str) -> bool;

    /// Escapes `value` so that it can be used as an identifier even if it is a keyword.
    fn create_escaped_identifier(&self, value: &str) -> String;

    /// Renders a type reference the way it would appear in source.
    fn type_name(&self, reference: &CodeTypeReference) -> String;

    /// Renders one type declaration.
    ///
    /// # Errors
    ///
    /// Returns an error if the declaration cannot be rendered.
    fn emit_type(&self, declaration: &CodeTypeDeclaration) -> Result<String>;

    /// Renders one namespace with its imports and types.
    ///
    /// # Errors
    ///
    /// Returns an error if any contained type cannot be rendered.
    fn emit_namespace(&self, namespace: &CodeNamespace) -> Result<String>;

    /// Renders a whole compile unit.
    ///
    /// # Errors
    ///
    /// Returns an error if any contained namespace cannot be rendered.
    fn emit_compile_unit(&self, unit: &CodeCompileUnit) -> Result<String> {
        let mut out = String::new();
        for namespace in &unit.namespaces {
            out.push_str(&self.emit_namespace(namespace)?);
        }
        Ok(out)
    }
}

/// Resolves an emitter by language name (`CSharp`, `C#`, `cs`, case-insensitive).
///
/// # Errors
///
/// Returns [`Error::NotSupported`] for any other language.
pub fn emitter_for_language(language: &str) -> Result<Box<dyn CodeEmitter>> {
    match language.to_ascii_lowercase().as_str() {
        "csharp" | "c#" | "cs" => Ok(Box::new(CSharpEmitter::new())),
        _ => Err(Error::NotSupported(format!(
            "no code emitter for language '{}'",
            language
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_languages_only() {
        assert_eq!(emitter_for_language("C#").unwrap().language(), "CSharp");
        assert_eq!(emitter_for_language("cs").unwrap().file_extension(), "cs");
        assert!(matches!(
            emitter_for_language("VisualBasic"),
            Err(Error::NotSupported(_))
        ));
    }
}
