//! Code generation from the design model.
//!
//! Generation builds code documents only; rendering them to text is left to a
//! [`CodeEmitter`](crate::codedom::CodeEmitter). The pieces, leaves first:
//!
//! # Key Components
//!
//! - [`naming`] - identifier fix-up, escaping and per-type name uniqueness
//! - [`provider`] - data-provider types and the assemblies they live in
//! - [`QueryGenerator`], [`FunctionGenerator`], [`QueryHandler`] - table-adapter methods
//! - [`MethodSignatureGenerator`] - one accessor method, or its one-line signature
//! - [`TypedDataSetBuilder`] - the dataset class with nested table and row classes
//! - [`TableAdapterBuilder`] - the table-adapter namespace
//! - [`TypedDataSetGenerator`] - the front end tying schema, model and generators together
//!
//! # Examples
//!
//! ```rust
//! use dsgen::codegen::{GenerateOption, TypedDataSetGenerator};
//! use dsgen::codedom::{CodeCompileUnit, CodeNamespace, CSharpEmitter};
//!
//! let schema = r#"<xs:schema id="Shop" xmlns:xs="http://www.w3.org/2001/XMLSchema"
//!                  xmlns:msdata="urn:schemas-microsoft-com:xml-msdata">
//!   <xs:element name="Shop" msdata:IsDataSet="true">
//!     <xs:complexType><xs:choice maxOccurs="unbounded">
//!       <xs:element name="Items"><xs:complexType><xs:sequence>
//!         <xs:element name="Title" type="xs:string" minOccurs="0"/>
//!       </xs:sequence></xs:complexType></xs:element>
//!     </xs:choice></xs:complexType>
//!   </xs:element>
//! </xs:schema>"#;
//!
//! let mut unit = CodeCompileUnit::default();
//! let mut namespace = CodeNamespace::new("Demo");
//! let result = TypedDataSetGenerator::new()
//!     .options(GenerateOption::LINQ_OVER_TYPED_DATASETS)
//!     .generate(schema, &mut unit, &mut namespace, &CSharpEmitter::new())?;
//! assert_eq!(result.dataset_name, "Shop");
//! assert!(namespace.type_named("Shop").is_some());
//! # Ok::<(), dsgen::Error>(())
//! ```

mod generator;
pub mod naming;
pub mod provider;
mod query;
mod signature;
mod table_adapter;
mod typed_dataset;

pub use generator::{GenerateOption, GenerationResult, TypedDataSetGenerator, DEFAULT_DATASET_NAME};
pub use query::{
    command_collection_item, method_name, ContainerType, FunctionGenerator, MethodSettings,
    ParameterGenerationOption, QueryGenerator, QueryHandler, DEFAULT_GET_METHOD_NAME,
    PAGING_SUFFIX,
};
pub use signature::MethodSignatureGenerator;
pub use table_adapter::TableAdapterBuilder;
pub use typed_dataset::TypedDataSetBuilder;

use crate::codedom::{CodeExpression, CodeTypeReference};

/// Type reference for a CLR type name; `T[]` names become array references.
pub(crate) fn clr_type(name: &str) -> CodeTypeReference {
    match name.strip_suffix("[]") {
        Some(element) => CodeTypeReference::array_of(CodeTypeReference::global(element)),
        None => CodeTypeReference::global(name),
    }
}

/// `global::Name` as an expression target, for static member access.
pub(crate) fn global_type(name: &str) -> CodeExpression {
    CodeExpression::type_ref(CodeTypeReference::global(name))
}

/// `this.name` as a field reference.
pub(crate) fn this_field(name: &str) -> CodeExpression {
    CodeExpression::this().field(name)
}

/// `this.Name` as a property reference.
pub(crate) fn this_property(name: &str) -> CodeExpression {
    CodeExpression::this().property(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codedom::{CSharpEmitter, CodeEmitter};

    #[test]
    fn clr_types_map_arrays_and_aliases() {
        let emitter = CSharpEmitter::new();
        assert_eq!(emitter.type_name(&clr_type("System.Int32")), "int");
        assert_eq!(emitter.type_name(&clr_type("System.Byte[]")), "byte[]");
        assert_eq!(
            emitter.type_name(&clr_type("System.Guid")),
            "global::System.Guid"
        );
    }
}
