//! Expressions of the code document.

use serde::{Deserialize, Serialize};

use crate::codedom::{CodeTypeReference, UserData};

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrimitiveValue {
    /// `null`
    Null,
    /// Boolean literal
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Floating point literal
    Double(f64),
    /// String literal
    String(String),
    /// Character literal
    Char(char),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `==` on values
    ValueEquality,
    /// `!=` on values
    IdentityInequality,
    /// `==` on references
    IdentityEquality,
    /// `&&`
    BooleanAnd,
    /// `||`
    BooleanOr,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `|`
    BitwiseOr,
}

/// An expression together with its generator metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeExpression {
    /// The expression shape
    pub kind: ExpressionKind,
    /// Generator metadata attached to this node
    #[serde(default, skip_serializing_if = "std::collections::BTreeMap::is_empty")]
    pub user_data: UserData,
}

/// The shape of an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    /// Literal value
    Primitive(PrimitiveValue),
    /// `this`
    This,
    /// `base`
    Base,
    /// Local variable
    Variable(String),
    /// Method argument
    Argument(String),
    /// A type used as the target of a static member access
    TypeReference(CodeTypeReference),
    /// `typeof(T)`
    TypeOf(CodeTypeReference),
    /// Field access
    FieldReference {
        /// Target object, `None` for an unqualified access
        target: Option<Box<CodeExpression>>,
        /// Field name
        field_name: String,
    },
    /// Property access
    PropertyReference {
        /// Target object, `None` for an unqualified access
        target: Option<Box<CodeExpression>>,
        /// Property name
        property_name: String,
    },
    /// Event access
    EventReference {
        /// Target object
        target: Option<Box<CodeExpression>>,
        /// Event name
        event_name: String,
    },
    /// Indexer access `target[indices]`
    Indexer {
        /// Indexed object
        target: Box<CodeExpression>,
        /// Index expressions
        indices: Vec<CodeExpression>,
    },
    /// Method call
    MethodInvoke {
        /// Target object, `None` for an unqualified call
        target: Option<Box<CodeExpression>>,
        /// Method name
        method_name: String,
        /// Call arguments
        arguments: Vec<CodeExpression>,
    },
    /// `new T(arguments)`
    ObjectCreate {
        /// Created type
        create_type: CodeTypeReference,
        /// Constructor arguments
        arguments: Vec<CodeExpression>,
    },
    /// `new T[] { initializers }` or `new T[size]`
    ArrayCreate {
        /// Element type
        element_type: CodeTypeReference,
        /// Initializers
        initializers: Vec<CodeExpression>,
        /// Size when there are no initializers
        size: Option<Box<CodeExpression>>,
    },
    /// `((T)(expression))`
    Cast {
        /// Target type
        target_type: CodeTypeReference,
        /// Converted expression
        expression: Box<CodeExpression>,
    },
    /// `(left op right)`
    Binary {
        /// Left operand
        left: Box<CodeExpression>,
        /// Operator
        operator: BinaryOperator,
        /// Right operand
        right: Box<CodeExpression>,
    },
    /// Raw source text
    Snippet(String),
}

impl From<ExpressionKind> for CodeExpression {
    fn from(kind: ExpressionKind) -> Self {
        CodeExpression {
            kind,
            user_data: UserData::new(),
        }
    }
}

impl CodeExpression {
    /// `null`
    #[must_use]
    pub fn null() -> Self {
        ExpressionKind::Primitive(PrimitiveValue::Null).into()
    }

    /// A string literal.
    pub fn string(value: impl Into<String>) -> Self {
        ExpressionKind::Primitive(PrimitiveValue::String(value.into())).into()
    }

    /// An integer literal.
    #[must_use]
    pub fn int(value: i64) -> Self {
        ExpressionKind::Primitive(PrimitiveValue::Int(value)).into()
    }

    /// A boolean literal.
    #[must_use]
    pub fn bool(value: bool) -> Self {
        ExpressionKind::Primitive(PrimitiveValue::Bool(value)).into()
    }

    /// `this`
    #[must_use]
    pub fn this() -> Self {
        ExpressionKind::This.into()
    }

    /// `base`
    #[must_use]
    pub fn base() -> Self {
        ExpressionKind::Base.into()
    }

    /// A local variable.
    pub fn variable(name: impl Into<String>) -> Self {
        ExpressionKind::Variable(name.into()).into()
    }

    /// A method argument.
    pub fn argument(name: impl Into<String>) -> Self {
        ExpressionKind::Argument(name.into()).into()
    }

    /// A type as a static access target.
    #[must_use]
    pub fn type_ref(reference: CodeTypeReference) -> Self {
        ExpressionKind::TypeReference(reference).into()
    }

    /// `typeof(T)`
    #[must_use]
    pub fn type_of(reference: CodeTypeReference) -> Self {
        ExpressionKind::TypeOf(reference).into()
    }

    /// Raw source text.
    pub fn snippet(text: impl Into<String>) -> Self {
        ExpressionKind::Snippet(text.into()).into()
    }

    /// `self.field_name`
    #[must_use]
    pub fn field(self, field_name: impl Into<String>) -> Self {
        ExpressionKind::FieldReference {
            target: Some(Box::new(self)),
            field_name: field_name.into(),
        }
        .into()
    }

    /// `self.property_name`
    #[must_use]
    pub fn property(self, property_name: impl Into<String>) -> Self {
        ExpressionKind::PropertyReference {
            target: Some(Box::new(self)),
            property_name: property_name.into(),
        }
        .into()
    }

    /// `self.event_name`
    #[must_use]
    pub fn event(self, event_name: impl Into<String>) -> Self {
        ExpressionKind::EventReference {
            target: Some(Box::new(self)),
            event_name: event_name.into(),
        }
        .into()
    }

    /// `self[indices]`
    #[must_use]
    pub fn index(self, indices: Vec<CodeExpression>) -> Self {
        ExpressionKind::Indexer {
            target: Box::new(self),
            indices,
        }
        .into()
    }

    /// `self.method_name(arguments)`
    #[must_use]
    pub fn invoke(self, method_name: impl Into<String>, arguments: Vec<CodeExpression>) -> Self {
        ExpressionKind::MethodInvoke {
            target: Some(Box::new(self)),
            method_name: method_name.into(),
            arguments,
        }
        .into()
    }

    /// `new T(arguments)`
    #[must_use]
    pub fn new_object(create_type: CodeTypeReference, arguments: Vec<CodeExpression>) -> Self {
        ExpressionKind::ObjectCreate {
            create_type,
            arguments,
        }
        .into()
    }

    /// `new T[] { initializers }`
    #[must_use]
    pub fn new_array(element_type: CodeTypeReference, initializers: Vec<CodeExpression>) -> Self {
        ExpressionKind::ArrayCreate {
            element_type,
            initializers,
            size: None,
        }
        .into()
    }

    /// `((T)(self))`
    #[must_use]
    pub fn cast(self, target_type: CodeTypeReference) -> Self {
        ExpressionKind::Cast {
            target_type,
            expression: Box::new(self),
        }
        .into()
    }

    /// `(self op right)`
    #[must_use]
    pub fn binary(self, operator: BinaryOperator, right: CodeExpression) -> Self {
        ExpressionKind::Binary {
            left: Box::new(self),
            operator,
            right: Box::new(right),
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_nest_targets() {
        let expr = CodeExpression::this().field("tableCustomers").property("Count");
        match expr.kind {
            ExpressionKind::PropertyReference {
                target: Some(target),
                property_name,
            } => {
                assert_eq!(property_name, "Count");
                assert!(matches!(target.kind, ExpressionKind::FieldReference { .. }));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
