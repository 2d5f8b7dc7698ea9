//! Statements of the code document.

use serde::{Deserialize, Serialize};

use crate::codedom::{CodeExpression, CodeTypeReference};

/// One `catch` clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    /// Caught exception type
    pub exception_type: CodeTypeReference,
    /// Variable bound to the exception, if any
    pub variable: Option<String>,
    /// Handler body
    pub statements: Vec<CodeStatement>,
}

/// A statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CodeStatement {
    /// Expression evaluated for its side effects
    Expression(CodeExpression),
    /// `left = right;`
    Assign {
        /// Assigned location
        left: CodeExpression,
        /// Assigned value
        right: CodeExpression,
    },
    /// `T name = init;`
    VariableDeclaration {
        /// Variable type
        var_type: CodeTypeReference,
        /// Variable name
        name: String,
        /// Initializer
        init: Option<CodeExpression>,
    },
    /// `return expr;`
    Return(Option<CodeExpression>),
    /// `throw expr;`
    Throw(CodeExpression),
    /// `if (condition) { .. } else { .. }`
    If {
        /// Condition
        condition: CodeExpression,
        /// Statements when true
        true_statements: Vec<CodeStatement>,
        /// Statements when false
        false_statements: Vec<CodeStatement>,
    },
    /// `try { .. } catch .. finally { .. }`
    TryCatchFinally {
        /// Protected block
        try_statements: Vec<CodeStatement>,
        /// Catch clauses
        catch_clauses: Vec<CatchClause>,
        /// Finally block
        finally_statements: Vec<CodeStatement>,
    },
    /// `// text`
    Comment(String),
}

impl CodeStatement {
    /// `left = right;`
    #[must_use]
    pub fn assign(left: CodeExpression, right: CodeExpression) -> Self {
        CodeStatement::Assign { left, right }
    }

    /// `return expr;`
    #[must_use]
    pub fn ret(expr: CodeExpression) -> Self {
        CodeStatement::Return(Some(expr))
    }

    /// `T name = init;`
    pub fn declare(var_type: CodeTypeReference, name: impl Into<String>, init: CodeExpression) -> Self {
        CodeStatement::VariableDeclaration {
            var_type,
            name: name.into(),
            init: Some(init),
        }
    }

    /// `if (condition) { true_statements }`
    #[must_use]
    pub fn if_then(condition: CodeExpression, true_statements: Vec<CodeStatement>) -> Self {
        CodeStatement::If {
            condition,
            true_statements,
            false_statements: Vec::new(),
        }
    }

    /// `if (condition) { .. } else { .. }`
    #[must_use]
    pub fn if_else(
        condition: CodeExpression,
        true_statements: Vec<CodeStatement>,
        false_statements: Vec<CodeStatement>,
    ) -> Self {
        CodeStatement::If {
            condition,
            true_statements,
            false_statements,
        }
    }
}

impl From<CodeExpression> for CodeStatement {
    fn from(expr: CodeExpression) -> Self {
        CodeStatement::Expression(expr)
    }
}
