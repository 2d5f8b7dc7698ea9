//! Code document model.
//!
//! Generators never produce source text directly. They build a tree of
//! [`CodeCompileUnit`] → [`CodeNamespace`] → [`CodeTypeDeclaration`] → members, statements and
//! expressions, and hand it to a [`CodeEmitter`] for rendering. Every expression and type
//! reference carries a [`UserData`] map for generator metadata; the property-reference
//! serializer only uses its compact format on nodes whose map is empty.
//!
//! # Key Components
//!
//! - [`CodeTypeReference`] - reference to a type by name, with generic arguments and array shape
//! - [`CodeExpression`] / [`ExpressionKind`] - expression tree
//! - [`CodeStatement`] - statements of method bodies
//! - [`CodeTypeDeclaration`], [`CodeTypeMember`] - types and their members
//! - [`CodeEmitter`], [`CSharpEmitter`] - rendering to source text
//!
//! # Examples
//!
//! ```rust
//! use dsgen::codedom::{
//!     CodeEmitter, CodeMemberMethod, CodeTypeDeclaration, CodeTypeMember, CodeTypeReference,
//!     CSharpEmitter,
//! };
//!
//! let mut method = CodeMemberMethod::new("Clear");
//! method.body = None;
//! let mut wrapper = CodeTypeDeclaration::interface("Wrapper");
//! wrapper.add(CodeTypeMember::Method(method));
//!
//! let text = CSharpEmitter::new().emit_type(&wrapper)?;
//! assert!(text.contains("void Clear();"));
//! # Ok::<(), dsgen::Error>(())
//! ```

mod expressions;
mod members;
mod statements;
mod types;

pub mod emitter;

pub use emitter::{emitter_for_language, CSharpEmitter, CodeEmitter};
pub use expressions::{BinaryOperator, CodeExpression, ExpressionKind, PrimitiveValue};
pub use members::{
    CodeAttributeDeclaration, CodeCompileUnit, CodeConstructor, CodeMemberEvent, CodeMemberField,
    CodeMemberMethod, CodeMemberProperty, CodeNamespace, CodeParameter, CodeTypeDeclaration,
    CodeTypeMember, MemberAttributes, ParameterDirection, TypeKind,
};
pub use statements::{CatchClause, CodeStatement};
pub use types::{CodeTypeReference, TypeReferenceOptions, UserData};
