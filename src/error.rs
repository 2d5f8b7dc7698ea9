use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Argument Errors
/// - [`Error::ArgumentMissing`] - A required per-call setting was never supplied
/// - [`Error::ArgumentEmpty`] - A required string input was empty
/// - [`Error::NeedsDataColumn`] - A design column was created without a backing column
///
/// ## Schema Reading Errors
/// - [`Error::Malformed`] - The XML or XML Schema input is structurally invalid
/// - [`Error::Xml`] - The underlying XML reader rejected the input
///
/// ## Design Model Errors
/// - [`Error::DuplicateName`] - A rename or insert would break sibling-name uniqueness
/// - [`Error::NotFound`] - A named table, column or source does not exist
///
/// ## Wrapped Pipeline Errors
/// - [`Error::SchemaConversion`] - Turning schema text into a design model failed
/// - [`Error::CodeGeneration`] - Populating the code document failed
///
/// Both wrapped variants carry the full message chain of the triggering error, built
/// with [`Error::chain_message`].
///
/// # Examples
///
/// ```rust
/// use dsgen::{Error, codegen::TypedDataSetGenerator, codedom::{CodeCompileUnit, CodeNamespace, CSharpEmitter}};
///
/// let mut unit = CodeCompileUnit::default();
/// let mut ns = CodeNamespace::new("Demo");
/// match TypedDataSetGenerator::new().generate("", &mut unit, &mut ns, &CSharpEmitter::new()) {
///     Err(Error::ArgumentEmpty(name)) => assert_eq!(name, "input_file_content"),
///     other => panic!("unexpected result: {:?}", other.map(|r| r.dataset_name)),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The input is damaged and could not be read.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A required argument or per-call setting was not supplied.
    #[error("Required argument '{0}' was not supplied")]
    ArgumentMissing(&'static str),

    /// A required string argument was empty.
    #[error("Argument '{0}' must not be empty")]
    ArgumentEmpty(&'static str),

    /// A design column must wrap an existing data column.
    #[error("A DesignColumn needs a DataColumn")]
    NeedsDataColumn,

    /// A name is already used by a sibling object.
    #[error("A {kind} named '{name}' already exists")]
    DuplicateName {
        /// What kind of object clashed (column, table, relation, ...)
        kind: &'static str,
        /// The clashing name
        name: String,
    },

    /// A named object could not be found in the design model.
    #[error("Could not find {0}")]
    NotFound(String),

    /// Internal consistency failure, a caller forgot a prerequisite that has no argument form.
    #[error("Internal error: {0}")]
    Internal(String),

    /// The schema could not be turned into a design model.
    #[error("Error while reading the dataset schema: {0}")]
    SchemaConversion(String),

    /// Code generation failed while populating the code document.
    #[error("Error while generating the typed dataset code: {0}")]
    CodeGeneration(String),

    /// The requested feature or language is not supported.
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Error from the quick-xml reader.
    #[error("{0}")]
    Xml(#[from] quick_xml::Error),

    /// Error from the generic fallback formatter.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Error while writing generated text.
    #[error("{0}")]
    Fmt(#[from] std::fmt::Error),

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),
}

impl Error {
    /// Concatenates the message of `err` with the message of every error in its `source()` chain.
    ///
    /// Wrapping layers use this so the root cause stays visible through
    /// [`Error::SchemaConversion`] and [`Error::CodeGeneration`].
    #[must_use]
    pub fn chain_message(err: &dyn std::error::Error) -> String {
        let mut message = err.to_string();
        let mut current = err.source();
        while let Some(inner) = current {
            message.push(' ');
            message.push_str(&inner.to_string());
            current = inner.source();
        }
        message
    }

    /// Wraps `err` into a [`Error::SchemaConversion`] carrying its full message chain.
    #[must_use]
    pub fn schema_conversion(err: &Error) -> Error {
        Error::SchemaConversion(Self::chain_message(err))
    }

    /// Wraps `err` into a [`Error::CodeGeneration`] carrying its full message chain.
    #[must_use]
    pub fn code_generation(err: &Error) -> Error {
        Error::CodeGeneration(Self::chain_message(err))
    }

    /// Returns `true` for the argument-shaped variants.
    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Error::ArgumentMissing(_) | Error::ArgumentEmpty(_) | Error::NeedsDataColumn
        )
    }
}
