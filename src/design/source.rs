//! Data-access sources: commands, parameters and their naming overrides.

use strum::{Display, EnumIter, EnumString};

/// Shape of the result a source produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
pub enum QueryType {
    /// A table of rows
    #[default]
    Rowset,
    /// A single value
    Scalar,
    /// No result, only an affected-row count
    NoData,
}

/// The operation a command performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
pub enum CommandOperation {
    /// `SELECT`
    #[default]
    Select,
    /// `INSERT`
    Insert,
    /// `UPDATE`
    Update,
    /// `DELETE`
    Delete,
    /// Anything else (DDL, procedures without a recognizable verb)
    Unknown,
}

impl CommandOperation {
    /// Classifies a command text by its leading verb.
    #[must_use]
    pub fn from_command_text(text: &str) -> Self {
        let verb = text
            .trim_start_matches(|c: char| c.is_whitespace() || c == '(')
            .split(|c: char| c.is_whitespace() || c == '(')
            .next()
            .unwrap_or("");
        match verb.to_ascii_uppercase().as_str() {
            "SELECT" | "WITH" => CommandOperation::Select,
            "INSERT" => CommandOperation::Insert,
            "UPDATE" => CommandOperation::Update,
            "DELETE" => CommandOperation::Delete,
            _ => CommandOperation::Unknown,
        }
    }
}

/// How the command text is interpreted by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum CommandType {
    /// SQL text
    #[default]
    Text,
    /// Stored procedure name
    StoredProcedure,
    /// Table name
    TableDirect,
}

/// Which accessor methods are generated for a rowset source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum GenerateMethodTypes {
    /// Only `Get` methods returning a new table
    Get,
    /// Only `Fill` methods filling a caller-supplied table
    Fill,
    /// Both
    #[default]
    Both,
}

/// Direction of a command parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum DesignParameterDirection {
    /// Passed in
    #[default]
    Input,
    /// Returned through the parameter
    Output,
    /// Passed in and returned
    InputOutput,
    /// The command's return value
    ReturnValue,
}

/// Provider-independent parameter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
pub enum DbType {
    /// Variable-length non-Unicode text
    AnsiString,
    /// Binary data
    Binary,
    /// 8-bit unsigned
    Byte,
    /// Boolean
    Boolean,
    /// Currency
    Currency,
    /// Date
    Date,
    /// Date and time
    DateTime,
    /// Decimal
    Decimal,
    /// Double
    Double,
    /// GUID
    Guid,
    /// 16-bit signed
    Int16,
    /// 32-bit signed
    Int32,
    /// 64-bit signed
    Int64,
    /// Any object
    #[default]
    Object,
    /// 8-bit signed
    SByte,
    /// Single
    Single,
    /// Unicode text
    String,
    /// Time
    Time,
    /// 16-bit unsigned
    UInt16,
    /// 32-bit unsigned
    UInt32,
    /// 64-bit unsigned
    UInt64,
    /// Variable-length numeric
    VarNumeric,
    /// Fixed-length non-Unicode text
    AnsiStringFixedLength,
    /// Fixed-length Unicode text
    StringFixedLength,
    /// XML
    Xml,
    /// Date and time with extended range
    DateTime2,
    /// Date and time with offset
    DateTimeOffset,
}

impl DbType {
    /// CLR type carrying values of this database type.
    #[must_use]
    pub fn clr_type(self) -> &'static str {
        match self {
            DbType::AnsiString
            | DbType::String
            | DbType::AnsiStringFixedLength
            | DbType::StringFixedLength
            | DbType::Xml => "System.String",
            DbType::Binary => "System.Byte[]",
            DbType::Byte => "System.Byte",
            DbType::Boolean => "System.Boolean",
            DbType::Currency | DbType::Decimal | DbType::VarNumeric => "System.Decimal",
            DbType::Date | DbType::DateTime | DbType::DateTime2 => "System.DateTime",
            DbType::DateTimeOffset => "System.DateTimeOffset",
            DbType::Double => "System.Double",
            DbType::Guid => "System.Guid",
            DbType::Int16 => "System.Int16",
            DbType::Int32 => "System.Int32",
            DbType::Int64 => "System.Int64",
            DbType::Object => "System.Object",
            DbType::SByte => "System.SByte",
            DbType::Single => "System.Single",
            DbType::Time => "System.TimeSpan",
            DbType::UInt16 => "System.UInt16",
            DbType::UInt32 => "System.UInt32",
            DbType::UInt64 => "System.UInt64",
        }
    }

    /// `SqlTypes` structure carrying values of this database type.
    #[must_use]
    pub fn sql_type(self) -> &'static str {
        match self {
            DbType::AnsiString
            | DbType::String
            | DbType::AnsiStringFixedLength
            | DbType::StringFixedLength => "System.Data.SqlTypes.SqlString",
            DbType::Xml => "System.Data.SqlTypes.SqlXml",
            DbType::Binary => "System.Data.SqlTypes.SqlBinary",
            DbType::Byte => "System.Data.SqlTypes.SqlByte",
            DbType::Boolean => "System.Data.SqlTypes.SqlBoolean",
            DbType::Currency => "System.Data.SqlTypes.SqlMoney",
            DbType::Decimal | DbType::VarNumeric => "System.Data.SqlTypes.SqlDecimal",
            DbType::Date | DbType::DateTime | DbType::DateTime2 => {
                "System.Data.SqlTypes.SqlDateTime"
            }
            DbType::Double => "System.Data.SqlTypes.SqlDouble",
            DbType::Guid => "System.Data.SqlTypes.SqlGuid",
            DbType::Int16 => "System.Data.SqlTypes.SqlInt16",
            DbType::Int32 => "System.Data.SqlTypes.SqlInt32",
            DbType::Int64 => "System.Data.SqlTypes.SqlInt64",
            DbType::Single => "System.Data.SqlTypes.SqlSingle",
            _ => "System.Object",
        }
    }
}

/// One parameter of a [`DbCommand`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DesignParameter {
    /// Provider parameter name, e.g. `@CustomerID`
    pub parameter_name: String,
    /// Database type
    pub db_type: DbType,
    /// Provider-specific type name, e.g. `NVarChar`
    pub provider_type: Option<String>,
    /// Direction
    pub direction: DesignParameterDirection,
    /// Whether null may be passed
    pub allow_db_null: bool,
    /// Size of variable-length values
    pub size: i32,
    /// Column supplying the value during updates
    pub source_column: Option<String>,
    /// Row version supplying the value (`Current` or `Original`)
    pub source_version: Option<String>,
    /// Whether the designer named the parameter itself
    pub auto_generated_name: bool,
    /// Whether the parameter is the `IsNull_` companion of an optimistic-concurrency check
    pub source_column_null_mapping: bool,
}

impl DesignParameter {
    /// Creates an input parameter.
    pub fn new(parameter_name: impl Into<String>, db_type: DbType) -> Self {
        Self {
            parameter_name: parameter_name.into(),
            db_type,
            ..Self::default()
        }
    }

    /// Method-argument name derived from the provider parameter name.
    ///
    /// Leading `@`, `:` and `?` markers are dropped; `Original_X` keeps its prefix.
    #[must_use]
    pub fn argument_name(&self) -> String {
        let trimmed = self
            .parameter_name
            .trim_start_matches(|c| c == '@' || c == ':' || c == '?');
        let name = if trimmed.is_empty() {
            self.source_column.as_deref().unwrap_or("param")
        } else {
            trimmed
        };
        crate::codegen::naming::fix_identifier(name)
    }

    /// Returns `true` for parameters that carry a value into the command.
    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(
            self.direction,
            DesignParameterDirection::Input | DesignParameterDirection::InputOutput
        )
    }
}

/// One command of a source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DbCommand {
    /// Text interpretation
    pub command_type: CommandType,
    /// SQL text or procedure name
    pub command_text: String,
    /// Whether the user edited the generated text
    pub modified_by_user: bool,
    /// Parameters in declaration order
    pub parameters: Vec<DesignParameter>,
}

impl DbCommand {
    /// Creates a text command without parameters.
    pub fn text(command_text: impl Into<String>) -> Self {
        Self {
            command_text: command_text.into(),
            ..Self::default()
        }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: DesignParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Operation derived from the command text; stored procedures report `Unknown`.
    #[must_use]
    pub fn operation(&self) -> CommandOperation {
        match self.command_type {
            CommandType::Text => CommandOperation::from_command_text(&self.command_text),
            CommandType::TableDirect => CommandOperation::Select,
            CommandType::StoredProcedure => CommandOperation::Unknown,
        }
    }
}

/// One data-access command description with its generator naming overrides.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DbSource {
    /// Source name, also the default Fill method name
    pub name: String,
    /// Name the user gave the source
    pub user_source_name: Option<String>,
    /// Result shape
    pub query_type: QueryType,
    /// Connection the source runs on, by name
    pub connection_ref: Option<String>,
    /// Base name of Get methods
    pub get_method_name: Option<String>,
    /// Accessor methods to generate
    pub generate_methods: GenerateMethodTypes,
    /// Whether paging overloads are generated
    pub generate_paging_methods: bool,
    /// Whether DB-direct Insert/Update/Delete methods are generated (main source only)
    pub generate_short_commands: bool,
    /// Access modifier of generated methods
    pub modifier: Option<String>,
    /// Explicit Fill method name
    pub generator_source_name: Option<String>,
    /// Explicit Get method name
    pub generator_get_method_name: Option<String>,
    /// Explicit FillPage method name
    pub generator_source_name_for_paging: Option<String>,
    /// Explicit GetPage method name
    pub generator_get_method_name_for_paging: Option<String>,
    /// `SELECT` command
    pub select_command: Option<DbCommand>,
    /// `INSERT` command
    pub insert_command: Option<DbCommand>,
    /// `UPDATE` command
    pub update_command: Option<DbCommand>,
    /// `DELETE` command
    pub delete_command: Option<DbCommand>,
}

impl DbSource {
    /// Creates a rowset source.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the select command.
    #[must_use]
    pub fn with_select(mut self, command: DbCommand) -> Self {
        self.select_command = Some(command);
        self
    }

    /// Sets the query type.
    #[must_use]
    pub fn with_query_type(mut self, query_type: QueryType) -> Self {
        self.query_type = query_type;
        self
    }

    /// Sets the base Get method name.
    #[must_use]
    pub fn with_get_method_name(mut self, name: impl Into<String>) -> Self {
        self.get_method_name = Some(name.into());
        self
    }

    /// The command the source runs when invoked as a query or function: the select command if
    /// present, otherwise the first present of insert, update, delete.
    #[must_use]
    pub fn active_command(&self) -> Option<&DbCommand> {
        self.select_command
            .as_ref()
            .or(self.insert_command.as_ref())
            .or(self.update_command.as_ref())
            .or(self.delete_command.as_ref())
    }

    /// Operation of the active command.
    #[must_use]
    pub fn command_operation(&self) -> CommandOperation {
        if self.select_command.is_some() {
            return CommandOperation::Select;
        }
        self.active_command()
            .map_or(CommandOperation::Unknown, DbCommand::operation)
    }

    /// Returns `true` when the source yields rows from a select operation, which is the case
    /// handled by the query generator.
    #[must_use]
    pub fn is_rowset_select(&self) -> bool {
        self.query_type == QueryType::Rowset && self.command_operation() == CommandOperation::Select
    }

    /// Input parameters of the active command.
    pub fn input_parameters(&self) -> impl Iterator<Item = &DesignParameter> {
        self.active_command()
            .into_iter()
            .flat_map(|c| c.parameters.iter())
            .filter(|p| p.is_input())
    }

    /// Whether Fill methods are generated.
    #[must_use]
    pub fn generates_fill(&self) -> bool {
        matches!(
            self.generate_methods,
            GenerateMethodTypes::Fill | GenerateMethodTypes::Both
        )
    }

    /// Whether Get methods are generated.
    #[must_use]
    pub fn generates_get(&self) -> bool {
        matches!(
            self.generate_methods,
            GenerateMethodTypes::Get | GenerateMethodTypes::Both
        ) && self.get_method_name.as_deref().is_some_and(|n| !n.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_command_text() {
        assert_eq!(
            CommandOperation::from_command_text("  SELECT * FROM t"),
            CommandOperation::Select
        );
        assert_eq!(
            CommandOperation::from_command_text("(select 1)"),
            CommandOperation::Select
        );
        assert_eq!(
            CommandOperation::from_command_text("insert into t values (1)"),
            CommandOperation::Insert
        );
        assert_eq!(
            CommandOperation::from_command_text("EXEC sp"),
            CommandOperation::Unknown
        );
    }

    #[test]
    fn active_command_prefers_select() {
        let mut source = DbSource::new("Fill");
        source.update_command = Some(DbCommand::text("UPDATE t SET a = 1"));
        assert_eq!(source.command_operation(), CommandOperation::Update);
        assert!(!source.is_rowset_select());
        source.select_command = Some(DbCommand::text("SELECT a FROM t"));
        assert!(source.is_rowset_select());
    }

    #[test]
    fn parameter_argument_names() {
        assert_eq!(
            DesignParameter::new("@Original_CustomerID", DbType::String).argument_name(),
            "Original_CustomerID"
        );
        assert_eq!(DesignParameter::new("?", DbType::Int32).argument_name(), "param");
        assert_eq!("Int32".parse::<DbType>().unwrap(), DbType::Int32);
    }

    #[test]
    fn get_requires_method_name() {
        let source = DbSource::new("Fill");
        assert!(source.generates_fill());
        assert!(!source.generates_get());
        assert!(source.with_get_method_name("GetData").generates_get());
    }
}
