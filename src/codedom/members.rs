//! Type declarations, members, namespaces and compile units.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::codedom::{CodeExpression, CodeStatement, CodeTypeReference};

bitflags! {
    /// Accessibility and scope modifiers of types and members.
    ///
    /// Members that are neither `FINAL`, `STATIC`, `OVERRIDE`, `ABSTRACT` nor `PRIVATE`
    /// are rendered as overridable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MemberAttributes: u32 {
        /// `public`
        const PUBLIC = 0x0001;
        /// `private`
        const PRIVATE = 0x0002;
        /// `protected`
        const FAMILY = 0x0004;
        /// `internal`
        const ASSEMBLY = 0x0008;
        /// `static`
        const STATIC = 0x0010;
        /// Not overridable
        const FINAL = 0x0020;
        /// `override`
        const OVERRIDE = 0x0040;
        /// `abstract`
        const ABSTRACT = 0x0080;
        /// `new`
        const NEW = 0x0100;
        /// `const`
        const CONST = 0x0200;
    }
}

/// An attribute applied to a type or member, e.g. `[Serializable()]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeAttributeDeclaration {
    /// Attribute type
    pub attribute_type: CodeTypeReference,
    /// Positional and named arguments
    pub arguments: Vec<(Option<String>, CodeExpression)>,
}

impl CodeAttributeDeclaration {
    /// Creates an attribute without arguments.
    pub fn new(attribute_type: impl Into<String>) -> Self {
        Self {
            attribute_type: CodeTypeReference::global(attribute_type),
            arguments: Vec::new(),
        }
    }

    /// Adds a positional argument.
    #[must_use]
    pub fn arg(mut self, value: CodeExpression) -> Self {
        self.arguments.push((None, value));
        self
    }
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeParameter {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub param_type: CodeTypeReference,
    /// Passing direction
    pub direction: ParameterDirection,
}

impl CodeParameter {
    /// Creates an input parameter.
    pub fn new(param_type: CodeTypeReference, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type,
            direction: ParameterDirection::In,
        }
    }
}

/// How a parameter is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParameterDirection {
    /// By value
    #[default]
    In,
    /// `out`
    Out,
    /// `ref`
    Ref,
}

/// A field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeMemberField {
    /// Field name
    pub name: String,
    /// Field type
    pub field_type: CodeTypeReference,
    /// Modifiers
    pub attributes: MemberAttributes,
    /// Initializer
    pub init: Option<CodeExpression>,
}

/// A property or indexer (when `parameters` is non-empty and `name` is `Item`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeMemberProperty {
    /// Property name
    pub name: String,
    /// Property type
    pub property_type: CodeTypeReference,
    /// Modifiers
    pub attributes: MemberAttributes,
    /// Indexer parameters
    pub parameters: Vec<CodeParameter>,
    /// Getter body, `None` when there is no getter
    pub getter: Option<Vec<CodeStatement>>,
    /// Setter body, `None` when there is no setter
    pub setter: Option<Vec<CodeStatement>>,
    /// Custom attributes
    pub custom_attributes: Vec<CodeAttributeDeclaration>,
}

/// A method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeMemberMethod {
    /// Method name
    pub name: String,
    /// Modifiers
    pub attributes: MemberAttributes,
    /// Return type
    pub return_type: CodeTypeReference,
    /// Parameters
    pub parameters: Vec<CodeParameter>,
    /// Body, `None` for a signature-only declaration
    pub body: Option<Vec<CodeStatement>>,
    /// Custom attributes
    pub custom_attributes: Vec<CodeAttributeDeclaration>,
    /// Documentation comment lines
    pub comments: Vec<String>,
}

impl CodeMemberMethod {
    /// Creates a public `void` method with an empty body.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: MemberAttributes::PUBLIC,
            return_type: CodeTypeReference::void(),
            parameters: Vec::new(),
            body: Some(Vec::new()),
            custom_attributes: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Appends a statement to the body, creating one if the method had none.
    pub fn push(&mut self, statement: impl Into<CodeStatement>) {
        self.body.get_or_insert_with(Vec::new).push(statement.into());
    }
}

/// A constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeConstructor {
    /// Modifiers
    pub attributes: MemberAttributes,
    /// Parameters
    pub parameters: Vec<CodeParameter>,
    /// Arguments passed to `base(...)`
    pub base_arguments: Vec<CodeExpression>,
    /// Body
    pub statements: Vec<CodeStatement>,
}

/// An event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeMemberEvent {
    /// Event name
    pub name: String,
    /// Delegate type
    pub event_type: CodeTypeReference,
    /// Modifiers
    pub attributes: MemberAttributes,
}

/// A member of a type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CodeTypeMember {
    /// Field
    Field(CodeMemberField),
    /// Property or indexer
    Property(CodeMemberProperty),
    /// Method
    Method(CodeMemberMethod),
    /// Constructor
    Constructor(CodeConstructor),
    /// Event
    Event(CodeMemberEvent),
    /// Nested type
    NestedType(Box<CodeTypeDeclaration>),
}

impl CodeTypeMember {
    /// Name of the member (`.ctor` for constructors).
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            CodeTypeMember::Field(f) => &f.name,
            CodeTypeMember::Property(p) => &p.name,
            CodeTypeMember::Method(m) => &m.name,
            CodeTypeMember::Constructor(_) => ".ctor",
            CodeTypeMember::Event(e) => &e.name,
            CodeTypeMember::NestedType(t) => &t.name,
        }
    }
}

/// Kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TypeKind {
    /// `class`
    #[default]
    Class,
    /// `struct`
    Struct,
    /// `interface`
    Interface,
    /// `enum`
    Enum,
}

/// A type declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CodeTypeDeclaration {
    /// Simple name
    pub name: String,
    /// Kind of type
    pub kind: TypeKind,
    /// Modifiers
    pub attributes: MemberAttributes,
    /// `partial`
    pub is_partial: bool,
    /// Base class first, then interfaces
    pub base_types: Vec<CodeTypeReference>,
    /// Members in declaration order
    pub members: Vec<CodeTypeMember>,
    /// Custom attributes
    pub custom_attributes: Vec<CodeAttributeDeclaration>,
    /// Documentation comment lines
    pub comments: Vec<String>,
}

impl CodeTypeDeclaration {
    /// Creates a public class.
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Class,
            attributes: MemberAttributes::PUBLIC,
            ..Self::default()
        }
    }

    /// Creates an interface.
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Interface,
            attributes: MemberAttributes::PUBLIC,
            ..Self::default()
        }
    }

    /// Appends a member.
    pub fn add(&mut self, member: CodeTypeMember) {
        self.members.push(member);
    }

    /// Iterates over the methods of this type.
    pub fn methods(&self) -> impl Iterator<Item = &CodeMemberMethod> {
        self.members.iter().filter_map(|m| match m {
            CodeTypeMember::Method(method) => Some(method),
            _ => None,
        })
    }

    /// Iterates over the properties of this type.
    pub fn properties(&self) -> impl Iterator<Item = &CodeMemberProperty> {
        self.members.iter().filter_map(|m| match m {
            CodeTypeMember::Property(property) => Some(property),
            _ => None,
        })
    }

    /// Iterates over the nested types of this type.
    pub fn nested_types(&self) -> impl Iterator<Item = &CodeTypeDeclaration> {
        self.members.iter().filter_map(|m| match m {
            CodeTypeMember::NestedType(nested) => Some(nested.as_ref()),
            _ => None,
        })
    }

    /// Returns the method named `name`.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&CodeMemberMethod> {
        self.methods().find(|m| m.name == name)
    }

    /// Returns the nested type named `name`.
    #[must_use]
    pub fn nested_type(&self, name: &str) -> Option<&CodeTypeDeclaration> {
        self.nested_types().find(|t| t.name == name)
    }
}

/// A namespace with its imports and types.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CodeNamespace {
    /// Namespace name, empty for the global namespace
    pub name: String,
    /// `using` directives
    pub imports: Vec<String>,
    /// Declared types
    pub types: Vec<CodeTypeDeclaration>,
    /// Leading comment lines
    pub comments: Vec<String>,
}

impl CodeNamespace {
    /// Creates an empty namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds an import unless it is already present.
    pub fn add_import(&mut self, import: impl Into<String>) {
        let import = import.into();
        if !self.imports.contains(&import) {
            self.imports.push(import);
        }
    }

    /// Returns the type named `name`.
    #[must_use]
    pub fn type_named(&self, name: &str) -> Option<&CodeTypeDeclaration> {
        self.types.iter().find(|t| t.name == name)
    }
}

/// The root of a code document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CodeCompileUnit {
    /// Namespaces in emission order
    pub namespaces: Vec<CodeNamespace>,
    /// Assemblies the emitted code must be compiled against
    pub referenced_assemblies: Vec<String>,
}

impl CodeCompileUnit {
    /// Adds an assembly reference unless it is already present.
    pub fn add_reference(&mut self, reference: impl Into<String>) {
        let reference = reference.into();
        if !self.referenced_assemblies.contains(&reference) {
            self.referenced_assemblies.push(reference);
        }
    }

    /// Returns the namespace named `name`.
    #[must_use]
    pub fn namespace(&self, name: &str) -> Option<&CodeNamespace> {
        self.namespaces.iter().find(|n| n.name == name)
    }
}
