//! Accessor-method synthesis for data-access sources.
//!
//! Three generators build table-adapter methods from a [`DbSource`]:
//!
//! - [`QueryGenerator`] - `Fill`/`Get` (and paging) methods for rowset select sources
//! - [`FunctionGenerator`] - scalar and non-query methods for every other source
//! - [`QueryHandler`] - the `Update` overloads and DB-direct `Insert`/`Update`/`Delete`
//!   methods of a table's main source
//!
//! Each generator can emit a complete method or, in signature-only mode, a declaration with
//! no body. Method parameters come from the input parameters of the source's active command
//! and are typed according to a [`ParameterGenerationOption`].

use strum::{Display, EnumIter, EnumString};

use crate::{
    codedom::{
        BinaryOperator, CodeEmitter, CodeExpression, CodeMemberMethod, CodeParameter,
        CodeStatement, CodeTypeDeclaration, CodeTypeMember, CodeTypeReference, ExpressionKind,
        MemberAttributes,
    },
    codegen::{
        clr_type,
        naming::{escape, NameScope},
        this_property,
    },
    design::{
        is_value_type, DbCommand, DbSource, DesignParameter, DesignTable, QueryType,
    },
    Error, Result,
};

/// Suffix of paging method names: `FillPage`, `GetDataPage`.
pub const PAGING_SUFFIX: &str = "Page";

/// Base name of Get methods when a source names none.
pub const DEFAULT_GET_METHOD_NAME: &str = "GetData";

/// How method parameters are typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
pub enum ParameterGenerationOption {
    /// CLR types, `Nullable<T>` for nullable value-type parameters
    #[default]
    ClrTypes,
    /// `System.Data.SqlTypes` structures
    SqlTypes,
    /// `object` for every parameter
    Objects,
}

/// What the container parameter of `Fill` methods holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
pub enum ContainerType {
    /// A whole typed dataset
    DataSet,
    /// One typed table
    #[default]
    DataTable,
}

impl ContainerType {
    /// Name of the container parameter.
    #[must_use]
    pub fn parameter_name(self) -> &'static str {
        match self {
            ContainerType::DataSet => "dataSet",
            ContainerType::DataTable => "dataTable",
        }
    }
}

/// Name of the accessor method generated for `source`.
///
/// Non-rowset sources use their own name unless overridden. Rowset sources choose between
/// the Fill and Get name, each with a paging variant; explicit generator names always win
/// over the derived ones.
#[must_use]
pub fn method_name(source: &DbSource, get_method: bool, paging: bool) -> String {
    if source.query_type != QueryType::Rowset {
        return source
            .generator_source_name
            .clone()
            .unwrap_or_else(|| source.name.clone());
    }

    let base_get = || {
        source
            .get_method_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_GET_METHOD_NAME.to_string())
    };
    match (get_method, paging) {
        (true, true) => source
            .generator_get_method_name_for_paging
            .clone()
            .unwrap_or_else(|| format!("{}{}", base_get(), PAGING_SUFFIX)),
        (true, false) => source
            .generator_get_method_name
            .clone()
            .unwrap_or_else(base_get),
        (false, true) => source
            .generator_source_name_for_paging
            .clone()
            .unwrap_or_else(|| format!("{}{}", source.name, PAGING_SUFFIX)),
        (false, false) => source
            .generator_source_name
            .clone()
            .unwrap_or_else(|| source.name.clone()),
    }
}

/// Access modifier of a generated accessor, from the source's modifier text.
fn modifier_attributes(modifier: Option<&str>) -> MemberAttributes {
    match modifier.map(str::to_ascii_lowercase).as_deref() {
        Some("private") => MemberAttributes::PRIVATE,
        Some("internal") | Some("assembly") | Some("friend") => {
            MemberAttributes::ASSEMBLY | MemberAttributes::FINAL
        }
        Some("protected") | Some("family") => MemberAttributes::FAMILY,
        _ => MemberAttributes::PUBLIC,
    }
}

fn parameter_type(parameter: &DesignParameter, option: ParameterGenerationOption) -> CodeTypeReference {
    match option {
        ParameterGenerationOption::Objects => CodeTypeReference::global("System.Object"),
        ParameterGenerationOption::SqlTypes => CodeTypeReference::global(parameter.db_type.sql_type()),
        ParameterGenerationOption::ClrTypes => {
            let clr = parameter.db_type.clr_type();
            if parameter.allow_db_null && is_value_type(clr) {
                CodeTypeReference::nullable(clr_type(clr))
            } else {
                clr_type(clr)
            }
        }
    }
}

/// One method argument bound to a command parameter.
struct BoundParameter<'a> {
    index: usize,
    argument: String,
    parameter: &'a DesignParameter,
    code: CodeParameter,
}

fn bind_parameters<'a>(
    emitter: &dyn CodeEmitter,
    command: Option<&'a DbCommand>,
    option: ParameterGenerationOption,
    scope: &mut NameScope,
) -> Vec<BoundParameter<'a>> {
    command
        .into_iter()
        .flat_map(|c| c.parameters.iter().enumerate())
        .filter(|(_, p)| p.is_input())
        .map(|(index, parameter)| {
            let argument = escape(emitter, &scope.claim(&parameter.argument_name()));
            BoundParameter {
                index,
                code: CodeParameter::new(parameter_type(parameter, option), argument.clone()),
                argument,
                parameter,
            }
        })
        .collect()
}

/// Statements copying one argument into `command.Parameters[index].Value`.
fn assign_parameter(
    command: &CodeExpression,
    bound: &BoundParameter<'_>,
    option: ParameterGenerationOption,
) -> Vec<CodeStatement> {
    let value = command
        .clone()
        .property("Parameters")
        .index(vec![CodeExpression::int(bound.index as i64)])
        .property("Value");
    let argument = CodeExpression::argument(bound.argument.clone());
    let db_null = CodeExpression::type_ref(CodeTypeReference::global("System.DBNull")).field("Value");

    if option != ParameterGenerationOption::ClrTypes {
        return vec![CodeStatement::assign(value, argument.cast(CodeTypeReference::global("System.Object")))];
    }

    let clr = bound.parameter.db_type.clr_type();
    if is_value_type(clr) {
        if bound.parameter.allow_db_null {
            vec![CodeStatement::if_else(
                argument
                    .clone()
                    .property("HasValue")
                    .binary(BinaryOperator::ValueEquality, CodeExpression::bool(true)),
                vec![CodeStatement::assign(
                    value.clone(),
                    argument.property("Value").cast(clr_type(clr)),
                )],
                vec![CodeStatement::assign(value, db_null)],
            )]
        } else {
            vec![CodeStatement::assign(value, argument.cast(clr_type(clr)))]
        }
    } else {
        let null_branch = if bound.parameter.allow_db_null {
            CodeStatement::assign(value.clone(), db_null)
        } else {
            CodeStatement::Throw(CodeExpression::new_object(
                CodeTypeReference::global("System.ArgumentNullException"),
                vec![CodeExpression::string(bound.argument.clone())],
            ))
        };
        vec![CodeStatement::if_else(
            argument
                .clone()
                .binary(BinaryOperator::IdentityEquality, CodeExpression::null()),
            vec![null_branch],
            vec![CodeStatement::assign(value, argument.cast(clr_type(clr)))],
        )]
    }
}

/// Open the command's connection if needed, run `execute`, restore the connection state,
/// and return the result as `result_type`.
fn execute_statements(
    command: &CodeExpression,
    execute: &str,
    result_type: CodeTypeReference,
) -> Vec<CodeStatement> {
    let connection = command.clone().property("Connection");
    let state_type = CodeExpression::type_ref(CodeTypeReference::global("System.Data.ConnectionState"));
    vec![
        CodeStatement::declare(
            CodeTypeReference::global("System.Data.ConnectionState"),
            "previousConnectionState",
            connection.clone().property("State"),
        ),
        CodeStatement::if_then(
            connection.clone().property("State").binary(
                BinaryOperator::IdentityInequality,
                state_type.clone().field("Open"),
            ),
            vec![connection.clone().invoke("Open", vec![]).into()],
        ),
        CodeStatement::VariableDeclaration {
            var_type: result_type,
            name: "returnValue".to_string(),
            init: None,
        },
        CodeStatement::TryCatchFinally {
            try_statements: vec![CodeStatement::assign(
                CodeExpression::variable("returnValue"),
                command.clone().invoke(execute, vec![]),
            )],
            catch_clauses: Vec::new(),
            finally_statements: vec![CodeStatement::if_then(
                CodeExpression::variable("previousConnectionState")
                    .binary(BinaryOperator::IdentityEquality, state_type.field("Closed")),
                vec![connection.invoke("Close", vec![]).into()],
            )],
        },
    ]
}

/// Settings shared by the query and function generators.
#[derive(Clone)]
pub struct MethodSettings<'a> {
    emitter: &'a dyn CodeEmitter,
    source: &'a DbSource,
    method_name: Option<String>,
    signature_only: bool,
    get_method: bool,
    paging: bool,
    parameter_option: ParameterGenerationOption,
    command: CodeExpression,
    command_type: CodeTypeReference,
}

impl<'a> MethodSettings<'a> {
    /// Creates settings for `source`, reaching its command as `this.CommandCollection[0]`.
    pub fn new(emitter: &'a dyn CodeEmitter, source: &'a DbSource) -> Self {
        Self {
            emitter,
            source,
            method_name: None,
            signature_only: false,
            get_method: false,
            paging: false,
            parameter_option: ParameterGenerationOption::ClrTypes,
            command: this_property("CommandCollection").index(vec![CodeExpression::int(0)]),
            command_type: CodeTypeReference::global("System.Data.IDbCommand"),
        }
    }

    /// Overrides the derived method name.
    #[must_use]
    pub fn method_name(mut self, name: impl Into<String>) -> Self {
        self.method_name = Some(name.into());
        self
    }

    /// Produces declarations without bodies.
    #[must_use]
    pub fn signature_only(mut self, value: bool) -> Self {
        self.signature_only = value;
        self
    }

    /// Produces the Get variant instead of Fill.
    #[must_use]
    pub fn get_method(mut self, value: bool) -> Self {
        self.get_method = value;
        self
    }

    /// Produces the paging variant.
    #[must_use]
    pub fn paging(mut self, value: bool) -> Self {
        self.paging = value;
        self
    }

    /// Sets how parameters are typed.
    #[must_use]
    pub fn parameter_option(mut self, option: ParameterGenerationOption) -> Self {
        self.parameter_option = option;
        self
    }

    /// Sets the expression reaching the command and its static type.
    #[must_use]
    pub fn command(mut self, command: CodeExpression, command_type: CodeTypeReference) -> Self {
        self.command = command;
        self.command_type = command_type;
        self
    }

    fn resolved_name(&self) -> String {
        let name = self
            .method_name
            .clone()
            .unwrap_or_else(|| method_name(self.source, self.get_method, self.paging));
        escape(self.emitter, &name)
    }

    fn declaration(&self, return_type: CodeTypeReference) -> CodeMemberMethod {
        let mut method = CodeMemberMethod::new(self.resolved_name());
        method.attributes = modifier_attributes(self.source.modifier.as_deref());
        method.return_type = return_type;
        if self.signature_only {
            method.body = None;
        }
        method
    }
}

/// Builds `Fill`/`Get` methods for rowset select sources.
#[derive(Clone)]
pub struct QueryGenerator<'a> {
    settings: MethodSettings<'a>,
    container_type: ContainerType,
    container_parameter_name: String,
    container_parameter_type: CodeTypeReference,
}

impl<'a> QueryGenerator<'a> {
    /// Creates a generator filling a typed table of type `container_parameter_type`.
    pub fn new(settings: MethodSettings<'a>, container_parameter_type: CodeTypeReference) -> Self {
        Self {
            settings,
            container_type: ContainerType::DataTable,
            container_parameter_name: ContainerType::DataTable.parameter_name().to_string(),
            container_parameter_type,
        }
    }

    /// Sets the container kind, name and type of the Fill container parameter.
    #[must_use]
    pub fn container(
        mut self,
        container_type: ContainerType,
        name: impl Into<String>,
        type_reference: CodeTypeReference,
    ) -> Self {
        self.container_type = container_type;
        self.container_parameter_name = name.into();
        self.container_parameter_type = type_reference;
        self
    }

    /// Builds the method.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSupported`] when the source is not a rowset select.
    pub fn generate(&self) -> Result<CodeMemberMethod> {
        let s = &self.settings;
        if !s.source.is_rowset_select() {
            return Err(Error::NotSupported(format!(
                "source '{}' is not a rowset select",
                s.source.name
            )));
        }

        let return_type = if s.get_method {
            self.container_parameter_type.clone()
        } else {
            CodeTypeReference::global("System.Int32")
        };
        let mut method = s.declaration(return_type);

        let mut scope = NameScope::new();
        let container = if s.get_method {
            None
        } else {
            let name = scope.claim(&self.container_parameter_name);
            method.parameters.push(CodeParameter::new(
                self.container_parameter_type.clone(),
                name.clone(),
            ));
            Some(name)
        };
        let paging = if s.paging {
            Some((scope.claim("startRecord"), scope.claim("maxRecords")))
        } else {
            None
        };
        let int = CodeTypeReference::global("System.Int32");
        if let (false, Some((start, max))) = (s.get_method, &paging) {
            method.parameters.push(CodeParameter::new(int.clone(), start.clone()));
            method.parameters.push(CodeParameter::new(int.clone(), max.clone()));
        }

        let bound = bind_parameters(
            s.emitter,
            s.source.select_command.as_ref(),
            s.parameter_option,
            &mut scope,
        );
        method.parameters.extend(bound.iter().map(|b| b.code.clone()));
        // Get pages keep the paging arguments after the query parameters
        if let (true, Some((start, max))) = (s.get_method, &paging) {
            method.parameters.push(CodeParameter::new(int.clone(), start.clone()));
            method.parameters.push(CodeParameter::new(int, max.clone()));
        }

        if s.signature_only {
            return Ok(method);
        }

        let select = this_property("Adapter").property("SelectCommand");
        method.push(CodeStatement::assign(select.clone(), s.command.clone()));
        for b in &bound {
            for statement in assign_parameter(&select, b, s.parameter_option) {
                method.push(statement);
            }
        }

        let target = match &container {
            Some(name) => CodeExpression::argument(name.clone()),
            None => CodeExpression::variable(self.container_parameter_name.clone()),
        };
        let mut fill_arguments = Vec::new();
        match (&paging, self.container_type) {
            (Some((start, max)), ContainerType::DataTable) => {
                fill_arguments.push(CodeExpression::argument(start.clone()));
                fill_arguments.push(CodeExpression::argument(max.clone()));
                fill_arguments.push(target.clone());
            }
            (Some((start, max)), ContainerType::DataSet) => {
                fill_arguments.push(target.clone());
                fill_arguments.push(CodeExpression::argument(start.clone()));
                fill_arguments.push(CodeExpression::argument(max.clone()));
                fill_arguments.push(CodeExpression::string("Table"));
            }
            (None, _) => fill_arguments.push(target.clone()),
        }
        let fill = this_property("Adapter").invoke("Fill", fill_arguments);

        if s.get_method {
            method.push(CodeStatement::declare(
                self.container_parameter_type.clone(),
                self.container_parameter_name.clone(),
                CodeExpression::new_object(self.container_parameter_type.clone(), vec![]),
            ));
            method.push(fill);
            method.push(CodeStatement::ret(target));
        } else {
            if self.container_type == ContainerType::DataTable {
                method.push(CodeStatement::if_then(
                    this_property("ClearBeforeFill")
                        .binary(BinaryOperator::ValueEquality, CodeExpression::bool(true)),
                    vec![target.invoke("Clear", vec![]).into()],
                ));
            }
            method.push(CodeStatement::declare(
                CodeTypeReference::global("System.Int32"),
                "returnValue",
                fill,
            ));
            method.push(CodeStatement::ret(CodeExpression::variable("returnValue")));
        }
        Ok(method)
    }
}

/// Builds scalar and non-query methods.
#[derive(Clone)]
pub struct FunctionGenerator<'a> {
    settings: MethodSettings<'a>,
}

impl<'a> FunctionGenerator<'a> {
    /// Creates a function generator.
    pub fn new(settings: MethodSettings<'a>) -> Self {
        Self { settings }
    }

    /// Builds the method.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the source has no command to run.
    pub fn generate(&self) -> Result<CodeMemberMethod> {
        let s = &self.settings;
        let command = s
            .source
            .active_command()
            .ok_or_else(|| Error::NotFound(format!("command of source '{}'", s.source.name)))?;

        let scalar = s.source.query_type == QueryType::Scalar;
        let result_type = if scalar {
            CodeTypeReference::global("System.Object")
        } else {
            CodeTypeReference::global("System.Int32")
        };
        let mut method = s.declaration(result_type.clone());

        let mut scope = NameScope::new();
        let bound = bind_parameters(s.emitter, Some(command), s.parameter_option, &mut scope);
        method.parameters.extend(bound.iter().map(|b| b.code.clone()));
        if s.signature_only {
            return Ok(method);
        }

        let local = CodeExpression::variable("command");
        method.push(CodeStatement::declare(
            s.command_type.clone(),
            "command",
            s.command.clone(),
        ));
        for b in &bound {
            for statement in assign_parameter(&local, b, s.parameter_option) {
                method.push(statement);
            }
        }
        let execute = if scalar { "ExecuteScalar" } else { "ExecuteNonQuery" };
        for statement in execute_statements(&local, execute, result_type.clone()) {
            method.push(statement);
        }

        let result = CodeExpression::variable("returnValue");
        if scalar {
            let is_null = result
                .clone()
                .binary(BinaryOperator::IdentityEquality, CodeExpression::null())
                .binary(
                    BinaryOperator::BooleanOr,
                    result.clone().invoke("GetType", vec![]).binary(
                        BinaryOperator::IdentityEquality,
                        CodeExpression::type_of(CodeTypeReference::global("System.DBNull")),
                    ),
                );
            method.push(CodeStatement::if_else(
                is_null,
                vec![CodeStatement::ret(CodeExpression::null())],
                vec![CodeStatement::ret(result.cast(result_type))],
            ));
        } else {
            method.push(CodeStatement::ret(result));
        }
        Ok(method)
    }
}

/// Builds the updating methods of one table adapter.
pub struct QueryHandler<'a> {
    emitter: &'a dyn CodeEmitter,
    table: &'a DesignTable,
    data_set_type: CodeTypeReference,
    table_type: CodeTypeReference,
    signature_only: bool,
    parameter_option: ParameterGenerationOption,
}

impl<'a> QueryHandler<'a> {
    /// Creates a handler for `table`, whose typed table and dataset types are given.
    pub fn new(
        emitter: &'a dyn CodeEmitter,
        table: &'a DesignTable,
        data_set_type: CodeTypeReference,
        table_type: CodeTypeReference,
    ) -> Self {
        Self {
            emitter,
            table,
            data_set_type,
            table_type,
            signature_only: false,
            parameter_option: ParameterGenerationOption::ClrTypes,
        }
    }

    /// Produces declarations without bodies.
    #[must_use]
    pub fn signature_only(mut self, value: bool) -> Self {
        self.signature_only = value;
        self
    }

    /// Sets how parameters of the DB-direct methods are typed.
    #[must_use]
    pub fn parameter_option(mut self, option: ParameterGenerationOption) -> Self {
        self.parameter_option = option;
        self
    }

    fn update_overload(
        &self,
        parameter_type: CodeTypeReference,
        parameter_name: &str,
        arguments: Vec<CodeExpression>,
    ) -> CodeMemberMethod {
        let mut method = CodeMemberMethod::new("Update");
        method.return_type = CodeTypeReference::global("System.Int32");
        method
            .parameters
            .push(CodeParameter::new(parameter_type, parameter_name));
        if self.signature_only {
            method.body = None;
        } else {
            method.push(CodeStatement::ret(
                this_property("Adapter").invoke("Update", arguments),
            ));
        }
        method
    }

    fn direct_method(&self, name: &str, command_property: &str, command: &DbCommand) -> CodeMemberMethod {
        let mut method = CodeMemberMethod::new(name);
        method.return_type = CodeTypeReference::global("System.Int32");
        let mut scope = NameScope::new();
        let bound = bind_parameters(self.emitter, Some(command), self.parameter_option, &mut scope);
        method.parameters.extend(bound.iter().map(|b| b.code.clone()));
        if self.signature_only {
            method.body = None;
            return method;
        }

        let target = this_property("Adapter").property(command_property);
        for b in &bound {
            for statement in assign_parameter(&target, b, self.parameter_option) {
                method.push(statement);
            }
        }
        for statement in execute_statements(
            &target,
            "ExecuteNonQuery",
            CodeTypeReference::global("System.Int32"),
        ) {
            method.push(statement);
        }
        method.push(CodeStatement::ret(CodeExpression::variable("returnValue")));
        method
    }

    /// Adds the updating methods to `declaration`.
    ///
    /// The four `Update` overloads (typed table, dataset, row, row array) are always added;
    /// the DB-direct `Delete`, `Insert` and `Update` methods only when the main source asks
    /// for short commands and defines the corresponding command.
    pub fn add_to(&self, declaration: &mut CodeTypeDeclaration) {
        let row = CodeTypeReference::global("System.Data.DataRow");
        let overloads = [
            self.update_overload(
                self.table_type.clone(),
                "dataTable",
                vec![CodeExpression::argument("dataTable")],
            ),
            self.update_overload(
                self.data_set_type.clone(),
                "dataSet",
                vec![
                    CodeExpression::argument("dataSet"),
                    CodeExpression::string(self.table.name()),
                ],
            ),
            self.update_overload(
                row.clone(),
                "dataRow",
                vec![CodeExpression::new_array(
                    row.clone(),
                    vec![CodeExpression::argument("dataRow")],
                )],
            ),
            self.update_overload(
                CodeTypeReference::array_of(row),
                "dataRows",
                vec![CodeExpression::argument("dataRows")],
            ),
        ];
        for method in overloads {
            declaration.add(CodeTypeMember::Method(method));
        }

        let Some(main) = self.table.main_source.as_ref() else {
            return;
        };
        if !main.generate_short_commands {
            return;
        }
        let direct = [
            ("Delete", "DeleteCommand", main.delete_command.as_ref()),
            ("Insert", "InsertCommand", main.insert_command.as_ref()),
            ("Update", "UpdateCommand", main.update_command.as_ref()),
        ];
        for (name, property, command) in direct {
            if let Some(command) = command {
                declaration.add(CodeTypeMember::Method(self.direct_method(name, property, command)));
            }
        }
    }
}

/// Reference to an element of a command array: `this.CommandCollection[index]`.
#[must_use]
pub fn command_collection_item(index: usize) -> CodeExpression {
    this_property("CommandCollection").index(vec![CodeExpression::int(index as i64)])
}

/// `new T[size]`.
pub(crate) fn sized_array(element_type: CodeTypeReference, size: usize) -> CodeExpression {
    ExpressionKind::ArrayCreate {
        element_type,
        initializers: Vec::new(),
        size: Some(Box::new(CodeExpression::int(size as i64))),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codedom::CSharpEmitter,
        design::{DbType, DesignParameterDirection},
    };

    fn customers_by_city() -> DbSource {
        let mut city = DesignParameter::new("@City", DbType::String);
        city.allow_db_null = true;
        let mut id = DesignParameter::new("@MinId", DbType::Int32);
        id.allow_db_null = true;
        let mut ret = DesignParameter::new("@RETURN_VALUE", DbType::Int32);
        ret.direction = DesignParameterDirection::ReturnValue;
        DbSource::new("FillByCity")
            .with_get_method_name("GetDataByCity")
            .with_select(
                DbCommand::text("SELECT * FROM Customers WHERE City = @City AND Id > @MinId")
                    .with_parameter(ret)
                    .with_parameter(city)
                    .with_parameter(id),
            )
    }

    #[test]
    fn method_names_follow_overrides() {
        let mut source = customers_by_city();
        assert_eq!(method_name(&source, false, false), "FillByCity");
        assert_eq!(method_name(&source, false, true), "FillByCityPage");
        assert_eq!(method_name(&source, true, false), "GetDataByCity");
        assert_eq!(method_name(&source, true, true), "GetDataByCityPage");

        source.generator_get_method_name_for_paging = Some("FooPage".to_string());
        source.generator_source_name = Some("Load".to_string());
        assert_eq!(method_name(&source, true, true), "FooPage");
        assert_eq!(method_name(&source, false, false), "Load");

        let scalar = DbSource::new("CountRows").with_query_type(QueryType::Scalar);
        assert_eq!(method_name(&scalar, true, true), "CountRows");
    }

    #[test]
    fn fill_signature_binds_input_parameters() {
        let emitter = CSharpEmitter::new();
        let source = customers_by_city();
        let method = QueryGenerator::new(
            MethodSettings::new(&emitter, &source).signature_only(true),
            CodeTypeReference::new("NorthwindDataSet.CustomersDataTable"),
        )
        .generate()
        .unwrap();
        assert!(method.body.is_none());
        let names: Vec<&str> = method.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["dataTable", "City", "MinId"]);
        assert_eq!(emitter.type_name(&method.parameters[2].param_type), "global::System.Nullable<int>");
    }

    #[test]
    fn get_page_puts_paging_arguments_last() {
        let emitter = CSharpEmitter::new();
        let source = customers_by_city();
        let method = QueryGenerator::new(
            MethodSettings::new(&emitter, &source)
                .get_method(true)
                .paging(true)
                .parameter_option(ParameterGenerationOption::Objects),
            CodeTypeReference::new("NorthwindDataSet.CustomersDataTable"),
        )
        .generate()
        .unwrap();
        assert_eq!(method.name, "GetDataByCityPage");
        let names: Vec<&str> = method.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["City", "MinId", "startRecord", "maxRecords"]);
        assert!(method.body.as_ref().is_some_and(|b| !b.is_empty()));
    }

    #[test]
    fn functions_return_scalar_or_count() {
        let emitter = CSharpEmitter::new();
        let scalar = DbSource::new("CountCustomers")
            .with_query_type(QueryType::Scalar)
            .with_select(DbCommand::text("SELECT COUNT(*) FROM Customers"));
        let method = FunctionGenerator::new(MethodSettings::new(&emitter, &scalar))
            .generate()
            .unwrap();
        let text = emitter.emit_type(&{
            let mut t = CodeTypeDeclaration::class("Q");
            t.add(CodeTypeMember::Method(method));
            t
        })
        .unwrap();
        assert!(text.contains("public virtual object CountCustomers()"));
        assert!(text.contains("command.ExecuteScalar()"));

        let empty = DbSource::new("Nothing").with_query_type(QueryType::NoData);
        assert!(FunctionGenerator::new(MethodSettings::new(&emitter, &empty))
            .generate()
            .is_err());
    }

    #[test]
    fn rowset_generator_rejects_functions() {
        let emitter = CSharpEmitter::new();
        let scalar = DbSource::new("Count")
            .with_query_type(QueryType::Scalar)
            .with_select(DbCommand::text("SELECT COUNT(*) FROM T"));
        assert!(QueryGenerator::new(
            MethodSettings::new(&emitter, &scalar),
            CodeTypeReference::new("T")
        )
        .generate()
        .is_err());
    }

    #[test]
    fn query_handler_adds_update_overloads() {
        let emitter = CSharpEmitter::new();
        let mut table = DesignTable::new("Customers");
        let mut main = customers_by_city();
        main.generate_short_commands = true;
        main.delete_command = Some(
            DbCommand::text("DELETE FROM Customers WHERE Id = @Original_Id")
                .with_parameter(DesignParameter::new("@Original_Id", DbType::Int32)),
        );
        table.main_source = Some(main);

        let mut wrapper = CodeTypeDeclaration::class("Wrapper");
        QueryHandler::new(
            &emitter,
            &table,
            CodeTypeReference::new("NorthwindDataSet"),
            CodeTypeReference::new("NorthwindDataSet.CustomersDataTable"),
        )
        .signature_only(true)
        .add_to(&mut wrapper);

        let names: Vec<&str> = wrapper.methods().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Update", "Update", "Update", "Update", "Delete"]);
        assert!(wrapper.methods().all(|m| m.body.is_none()));
        assert_eq!(wrapper.method("Delete").unwrap().parameters[0].name, "Original_Id");
    }
}
