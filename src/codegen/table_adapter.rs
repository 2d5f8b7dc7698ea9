//! Table adapter generation.
//!
//! Adapters live in their own namespace, `<Namespace>.<DataSet>TableAdapters`. Every table
//! with a main source gets a `<Table>TableAdapter` component that owns a provider data
//! adapter, a connection and one command per source; data-source-level functions go to a
//! queries adapter, and with [`GenerateOption::HIERARCHICAL_UPDATE`] a `TableAdapterManager`
//! updates all tables in relation order.

use crate::{
    codedom::{
        BinaryOperator, CodeAttributeDeclaration, CodeConstructor, CodeEmitter, CodeExpression,
        CodeMemberField, CodeMemberMethod, CodeMemberProperty, CodeNamespace, CodeParameter,
        CodeStatement, CodeTypeDeclaration, CodeTypeMember, CodeTypeReference, MemberAttributes,
    },
    codegen::{
        global_type,
        naming::{camel_case, escape, NameScope},
        provider::{DataProvider, ProviderRegistry},
        query::{
            command_collection_item, ContainerType, FunctionGenerator, MethodSettings,
            QueryGenerator, QueryHandler,
        },
        this_field, this_property, GenerateOption,
    },
    design::{DbCommand, DbSource, DesignDataSource, DesignTable, DEFAULT_PROVIDER},
    Error, Result,
};

const MANAGER_CLASS_NAME: &str = "TableAdapterManager";

fn private_field(name: &str, field_type: CodeTypeReference) -> CodeTypeMember {
    CodeTypeMember::Field(CodeMemberField {
        name: name.to_string(),
        field_type,
        attributes: MemberAttributes::PRIVATE,
        init: None,
    })
}

fn property(
    name: &str,
    property_type: CodeTypeReference,
    attributes: MemberAttributes,
    getter: Vec<CodeStatement>,
    setter: Option<Vec<CodeStatement>>,
) -> CodeTypeMember {
    CodeTypeMember::Property(CodeMemberProperty {
        name: name.to_string(),
        property_type,
        attributes,
        parameters: Vec::new(),
        getter: Some(getter),
        setter,
        custom_attributes: Vec::new(),
    })
}

fn private_method(name: &str, body: Vec<CodeStatement>) -> CodeTypeMember {
    let mut method = CodeMemberMethod::new(name);
    method.attributes = MemberAttributes::PRIVATE;
    method.body = Some(body);
    CodeTypeMember::Method(method)
}

/// `if ((this.field == null)) { this.Init(); } return this.field;`
fn lazy_getter(field: &str, init: &str) -> Vec<CodeStatement> {
    vec![
        CodeStatement::if_then(
            this_field(field).binary(BinaryOperator::IdentityEquality, CodeExpression::null()),
            vec![CodeExpression::this().invoke(init, vec![]).into()],
        ),
        CodeStatement::ret(this_field(field)),
    ]
}

fn component_class(name: &str, base_class: Option<&str>) -> CodeTypeDeclaration {
    let mut class = CodeTypeDeclaration::class(name);
    class.is_partial = true;
    class.base_types.push(CodeTypeReference::global(
        base_class.unwrap_or("System.ComponentModel.Component"),
    ));
    class.custom_attributes = vec![
        CodeAttributeDeclaration::new("System.ComponentModel.DesignerCategoryAttribute")
            .arg(CodeExpression::string("code")),
        CodeAttributeDeclaration::new("System.ComponentModel.ToolboxItem")
            .arg(CodeExpression::bool(true)),
    ];
    class
}

/// Statements creating and registering the parameters of `command` on `target`.
///
/// `param` is declared on first use; `declared` tracks that across calls in one method.
fn parameter_statements(
    provider: &DataProvider,
    target: &CodeExpression,
    command: &DbCommand,
    declared: &mut bool,
) -> Vec<CodeStatement> {
    let mut statements = Vec::new();
    let param = CodeExpression::variable("param");
    for parameter in &command.parameters {
        if !*declared {
            statements.push(CodeStatement::VariableDeclaration {
                var_type: CodeTypeReference::global(provider.parameter_type.clone()),
                name: "param".to_string(),
                init: None,
            });
            *declared = true;
        }
        statements.push(CodeStatement::assign(
            param.clone(),
            CodeExpression::new_object(
                CodeTypeReference::global(provider.parameter_type.clone()),
                vec![],
            ),
        ));
        let mut set = |property: &str, value: CodeExpression| {
            statements.push(CodeStatement::assign(param.clone().property(property), value));
        };
        set(
            "ParameterName",
            CodeExpression::string(parameter.parameter_name.clone()),
        );
        set(
            "DbType",
            global_type("System.Data.DbType").field(parameter.db_type.to_string()),
        );
        set(
            "Direction",
            global_type("System.Data.ParameterDirection").field(parameter.direction.to_string()),
        );
        if parameter.allow_db_null {
            set("IsNullable", CodeExpression::bool(true));
        }
        if parameter.size > 0 {
            set("Size", CodeExpression::int(i64::from(parameter.size)));
        }
        if let Some(column) = &parameter.source_column {
            set("SourceColumn", CodeExpression::string(column.clone()));
        }
        if let Some(version) = &parameter.source_version {
            set(
                "SourceVersion",
                global_type("System.Data.DataRowVersion").field(version.clone()),
            );
        }
        if parameter.source_column_null_mapping {
            set("SourceColumnNullMapping", CodeExpression::bool(true));
        }
        statements.push(
            target
                .clone()
                .property("Parameters")
                .invoke("Add", vec![param.clone()])
                .into(),
        );
    }
    statements
}

/// Statements initializing `target` as a provider command running `command`.
fn command_statements(
    provider: &DataProvider,
    target: &CodeExpression,
    command: &DbCommand,
    connection: CodeExpression,
    declared: &mut bool,
) -> Vec<CodeStatement> {
    let mut statements = vec![
        CodeStatement::assign(
            target.clone(),
            CodeExpression::new_object(
                CodeTypeReference::global(provider.command_type.clone()),
                vec![],
            ),
        ),
        CodeStatement::assign(target.clone().property("Connection"), connection),
        CodeStatement::assign(
            target.clone().property("CommandText"),
            CodeExpression::string(command.command_text.clone()),
        ),
        CodeStatement::assign(
            target.clone().property("CommandType"),
            global_type("System.Data.CommandType").field(command.command_type.to_string()),
        ),
    ];
    statements.extend(parameter_statements(provider, target, command, declared));
    statements
}

/// Sources of one adapter paired with the command each runs, in command-collection order.
fn collection_commands<'s>(sources: impl Iterator<Item = &'s DbSource>) -> Vec<(&'s DbSource, &'s DbCommand)> {
    sources
        .filter_map(|source| {
            let command = if source.is_rowset_select() {
                source.select_command.as_ref()
            } else {
                source.active_command()
            };
            command.map(|c| (source, c))
        })
        .collect()
}

/// Builds the table-adapter namespace of a data source.
pub struct TableAdapterBuilder<'a> {
    emitter: &'a dyn CodeEmitter,
    ds: &'a DesignDataSource,
    providers: &'a ProviderRegistry,
    options: GenerateOption,
    namespace: String,
}

impl<'a> TableAdapterBuilder<'a> {
    /// Creates a builder for adapters of `ds`, whose dataset class lives in `namespace`.
    pub fn new(
        emitter: &'a dyn CodeEmitter,
        ds: &'a DesignDataSource,
        providers: &'a ProviderRegistry,
        options: GenerateOption,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            emitter,
            ds,
            providers,
            options,
            namespace: namespace.into(),
        }
    }

    /// Name of the adapter namespace, `<Namespace>.<DataSet>TableAdapters`.
    #[must_use]
    pub fn namespace_name(&self) -> String {
        let name = format!("{}TableAdapters", self.ds.class_name());
        if self.namespace.is_empty() {
            name
        } else {
            format!("{}.{}", self.namespace, name)
        }
    }

    /// Global reference to the dataset class, or to a type nested in it.
    fn data_set_type(&self, nested: Option<&str>) -> CodeTypeReference {
        let mut name = String::new();
        if !self.namespace.is_empty() {
            name.push_str(&self.namespace);
            name.push('.');
        }
        name.push_str(&escape(self.emitter, &self.ds.class_name()));
        if let Some(nested) = nested {
            name.push('.');
            name.push_str(nested);
        }
        CodeTypeReference::global(name)
    }

    fn provider_for(&self, source: &DbSource) -> Result<&'a DataProvider> {
        let name = self
            .ds
            .connection_for(source)
            .map_or(DEFAULT_PROVIDER, |c| c.provider_name());
        self.providers
            .get(name)
            .ok_or_else(|| Error::NotSupported(format!("data provider '{}'", name)))
    }

    /// Builds the namespace, or `None` when the data source has nothing to adapt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSupported`] when a source uses a provider the registry does not
    /// know, and propagates method generation errors.
    pub fn build(&self) -> Result<Option<CodeNamespace>> {
        let tables: Vec<&DesignTable> = self
            .ds
            .tables()
            .iter()
            .filter(|t| t.main_source.is_some())
            .collect();
        if tables.is_empty() && self.ds.sources.is_empty() {
            return Ok(None);
        }

        let mut namespace = CodeNamespace::new(self.namespace_name());
        let mut scope = NameScope::with_reserved([MANAGER_CLASS_NAME]);
        let mut adapters = Vec::new();
        for table in &tables {
            let class_name = escape(self.emitter, &scope.claim(&table.adapter_class_name()));
            namespace.types.push(self.table_adapter(table, &class_name)?);
            adapters.push((*table, class_name));
        }
        if !self.ds.sources.is_empty() {
            let class_name = escape(self.emitter, &scope.claim(&self.ds.functions_class_name()));
            namespace.types.push(self.queries_adapter(&class_name)?);
        }
        if self.options.contains(GenerateOption::HIERARCHICAL_UPDATE) && !adapters.is_empty() {
            namespace.types.push(self.manager(&adapters));
        }
        Ok(Some(namespace))
    }

    fn table_adapter(&self, table: &DesignTable, class_name: &str) -> Result<CodeTypeDeclaration> {
        let main = table
            .main_source
            .as_ref()
            .ok_or_else(|| Error::Internal(format!("table '{}' has no main source", table.name())))?;
        let provider = self.provider_for(main)?;
        let commands = collection_commands(table.all_sources());

        let command_type = CodeTypeReference::global(provider.command_type.clone());
        let command_array = CodeTypeReference::array_of(command_type.clone());
        let connection_type = CodeTypeReference::global(provider.connection_type.clone());
        let transaction_type = CodeTypeReference::global(provider.transaction_type.clone());
        let bool_type = CodeTypeReference::global("System.Boolean");

        let mut class = component_class(class_name, table.base_class.as_deref());
        class.add(private_field(
            "_adapter",
            CodeTypeReference::global(provider.adapter_type.clone()),
        ));
        class.add(private_field("_connection", connection_type.clone()));
        class.add(private_field("_transaction", transaction_type.clone()));
        class.add(private_field("_commandCollection", command_array.clone()));
        class.add(private_field("_clearBeforeFill", bool_type.clone()));

        class.add(CodeTypeMember::Constructor(CodeConstructor {
            attributes: MemberAttributes::PUBLIC,
            parameters: Vec::new(),
            base_arguments: Vec::new(),
            statements: vec![CodeStatement::assign(
                this_property("ClearBeforeFill"),
                CodeExpression::bool(true),
            )],
        }));

        class.add(property(
            "Adapter",
            CodeTypeReference::global(provider.adapter_type.clone()),
            MemberAttributes::PRIVATE,
            lazy_getter("_adapter", "InitAdapter"),
            None,
        ));

        let value = CodeExpression::variable("value");
        let adapter_commands = ["InsertCommand", "DeleteCommand", "UpdateCommand"];
        let mut connection_setter = vec![CodeStatement::assign(this_field("_connection"), value.clone())];
        let mut transaction_setter = vec![CodeStatement::assign(this_field("_transaction"), value.clone())];
        for name in adapter_commands {
            let command = this_property("Adapter").property(name);
            let present = command
                .clone()
                .binary(BinaryOperator::IdentityInequality, CodeExpression::null());
            connection_setter.push(CodeStatement::if_then(
                present.clone(),
                vec![CodeStatement::assign(command.clone().property("Connection"), value.clone())],
            ));
            transaction_setter.push(CodeStatement::if_then(
                present,
                vec![CodeStatement::assign(
                    command.property("Transaction"),
                    this_field("_transaction"),
                )],
            ));
        }
        for index in 0..commands.len() {
            let item = command_collection_item(index);
            let present = item
                .clone()
                .binary(BinaryOperator::IdentityInequality, CodeExpression::null());
            connection_setter.push(CodeStatement::if_then(
                present,
                vec![CodeStatement::assign(item.clone().property("Connection"), value.clone())],
            ));
            transaction_setter.push(CodeStatement::assign(
                item.property("Transaction"),
                this_field("_transaction"),
            ));
        }
        class.add(property(
            "Connection",
            connection_type,
            MemberAttributes::ASSEMBLY | MemberAttributes::FINAL,
            lazy_getter("_connection", "InitConnection"),
            Some(connection_setter),
        ));
        class.add(property(
            "Transaction",
            transaction_type,
            MemberAttributes::ASSEMBLY | MemberAttributes::FINAL,
            vec![CodeStatement::ret(this_field("_transaction"))],
            Some(transaction_setter),
        ));
        class.add(property(
            "CommandCollection",
            command_array,
            MemberAttributes::FAMILY | MemberAttributes::FINAL,
            lazy_getter("_commandCollection", "InitCommandCollection"),
            None,
        ));
        class.add(property(
            "ClearBeforeFill",
            bool_type,
            MemberAttributes::PUBLIC | MemberAttributes::FINAL,
            vec![CodeStatement::ret(this_field("_clearBeforeFill"))],
            Some(vec![CodeStatement::assign(this_field("_clearBeforeFill"), value)]),
        ));

        class.add(private_method("InitAdapter", self.init_adapter(table, main, provider)));
        class.add(private_method("InitConnection", self.init_connection(main, provider)));
        class.add(private_method(
            "InitCommandCollection",
            self.init_command_collection(provider, &commands, || this_property("Connection")),
        ));

        let table_type = self.data_set_type(Some(&escape(self.emitter, &table.table_class_name())));
        for (index, (source, _)) in commands.iter().enumerate() {
            for method in self.source_methods(source, index, &command_type, &table_type)? {
                class.add(CodeTypeMember::Method(method));
            }
        }

        if main.insert_command.is_some() || main.update_command.is_some() || main.delete_command.is_some() {
            QueryHandler::new(self.emitter, table, self.data_set_type(None), table_type)
                .add_to(&mut class);
        }
        Ok(class)
    }

    fn init_adapter(&self, table: &DesignTable, main: &DbSource, provider: &DataProvider) -> Vec<CodeStatement> {
        let adapter = this_field("_adapter");
        let mapping = CodeExpression::variable("tableMapping");
        let mapping_type = CodeTypeReference::global("System.Data.Common.DataTableMapping");
        let mut statements = vec![
            CodeStatement::assign(
                adapter.clone(),
                CodeExpression::new_object(
                    CodeTypeReference::global(provider.adapter_type.clone()),
                    vec![],
                ),
            ),
            CodeStatement::declare(
                mapping_type.clone(),
                "tableMapping",
                CodeExpression::new_object(mapping_type, vec![]),
            ),
            CodeStatement::assign(
                mapping.clone().property("SourceTable"),
                CodeExpression::string("Table"),
            ),
            CodeStatement::assign(
                mapping.clone().property("DataSetTable"),
                CodeExpression::string(table.name()),
            ),
        ];
        for entry in table.mappings() {
            statements.push(
                mapping
                    .clone()
                    .property("ColumnMappings")
                    .invoke(
                        "Add",
                        vec![
                            CodeExpression::string(entry.source_column.clone()),
                            CodeExpression::string(entry.data_set_column.clone()),
                        ],
                    )
                    .into(),
            );
        }
        statements.push(
            adapter
                .clone()
                .property("TableMappings")
                .invoke("Add", vec![mapping])
                .into(),
        );

        let mut declared = false;
        let updates = [
            ("DeleteCommand", main.delete_command.as_ref()),
            ("InsertCommand", main.insert_command.as_ref()),
            ("UpdateCommand", main.update_command.as_ref()),
        ];
        for (name, command) in updates {
            if let Some(command) = command {
                statements.extend(command_statements(
                    provider,
                    &adapter.clone().property(name),
                    command,
                    this_property("Connection"),
                    &mut declared,
                ));
            }
        }
        statements
    }

    fn init_connection(&self, source: &DbSource, provider: &DataProvider) -> Vec<CodeStatement> {
        let mut statements = vec![CodeStatement::assign(
            this_field("_connection"),
            CodeExpression::new_object(
                CodeTypeReference::global(provider.connection_type.clone()),
                vec![],
            ),
        )];
        if let Some(connection) = self.ds.connection_for(source) {
            statements.push(CodeStatement::assign(
                this_field("_connection").property("ConnectionString"),
                connection.connection_string_expression(),
            ));
        }
        statements
    }

    fn init_command_collection(
        &self,
        provider: &DataProvider,
        commands: &[(&DbSource, &DbCommand)],
        connection: impl Fn() -> CodeExpression,
    ) -> Vec<CodeStatement> {
        let mut statements = vec![CodeStatement::assign(
            this_field("_commandCollection"),
            super::query::sized_array(
                CodeTypeReference::global(provider.command_type.clone()),
                commands.len(),
            ),
        )];
        let mut declared = false;
        for (index, (_, command)) in commands.iter().enumerate() {
            let target = this_field("_commandCollection")
                .index(vec![CodeExpression::int(index as i64)]);
            statements.extend(command_statements(
                provider,
                &target,
                command,
                connection(),
                &mut declared,
            ));
        }
        statements
    }

    /// Fill/Get (and paging) methods of a rowset source, or its function method.
    fn source_methods(
        &self,
        source: &DbSource,
        index: usize,
        command_type: &CodeTypeReference,
        table_type: &CodeTypeReference,
    ) -> Result<Vec<CodeMemberMethod>> {
        let settings = MethodSettings::new(self.emitter, source)
            .command(command_collection_item(index), command_type.clone());
        if !source.is_rowset_select() {
            return Ok(vec![FunctionGenerator::new(settings).generate()?]);
        }

        let mut variants = Vec::new();
        if source.generates_fill() {
            variants.push((false, false));
            if source.generate_paging_methods {
                variants.push((false, true));
            }
        }
        if source.generates_get() {
            variants.push((true, false));
            if source.generate_paging_methods {
                variants.push((true, true));
            }
        }
        variants
            .into_iter()
            .map(|(get, paging)| {
                QueryGenerator::new(settings.clone().get_method(get).paging(paging), table_type.clone())
                    .container(
                        ContainerType::DataTable,
                        ContainerType::DataTable.parameter_name(),
                        table_type.clone(),
                    )
                    .generate()
            })
            .collect()
    }

    /// Adapter for data-source-level functions. Each command may use a different provider,
    /// so the collection is typed as `IDbCommand[]`.
    fn queries_adapter(&self, class_name: &str) -> Result<CodeTypeDeclaration> {
        let idb_command = CodeTypeReference::global("System.Data.IDbCommand");
        let command_array = CodeTypeReference::array_of(idb_command.clone());
        let mut class = component_class(class_name, None);
        class.add(private_field("_commandCollection", command_array.clone()));
        class.add(property(
            "CommandCollection",
            command_array,
            MemberAttributes::FAMILY | MemberAttributes::FINAL,
            lazy_getter("_commandCollection", "InitCommandCollection"),
            None,
        ));

        let sources: Vec<&DbSource> = self
            .ds
            .sources
            .iter()
            .filter(|source| {
                let keep = !source.is_rowset_select();
                if !keep {
                    log::debug!("skipping rowset source '{}' of the queries adapter", source.name);
                }
                keep
            })
            .collect();
        let commands = collection_commands(sources.into_iter());

        let mut init = vec![CodeStatement::assign(
            this_field("_commandCollection"),
            super::query::sized_array(idb_command, commands.len()),
        )];
        let mut declared = false;
        let mut methods = Vec::new();
        for (index, (source, command)) in commands.iter().enumerate() {
            let provider = self.provider_for(source)?;
            let command_type = CodeTypeReference::global(provider.command_type.clone());
            let slot = this_field("_commandCollection").index(vec![CodeExpression::int(index as i64)]);
            init.push(CodeStatement::assign(
                slot.clone(),
                CodeExpression::new_object(command_type.clone(), vec![]),
            ));
            let target = slot.cast(command_type.clone());
            let connection = CodeExpression::new_object(
                CodeTypeReference::global(provider.connection_type.clone()),
                self.ds
                    .connection_for(source)
                    .map(|c| vec![c.connection_string_expression()])
                    .unwrap_or_default(),
            );
            init.extend(
                command_statements(provider, &target, command, connection, &mut declared)
                    .into_iter()
                    .skip(1),
            );

            let settings = MethodSettings::new(self.emitter, source)
                .command(command_collection_item(index).cast(command_type.clone()), command_type);
            methods.push(FunctionGenerator::new(settings).generate()?);
        }
        class.add(private_method("InitCommandCollection", init));
        for method in methods {
            class.add(CodeTypeMember::Method(method));
        }
        Ok(class)
    }

    /// Tables in parent-before-child order; tables on a relation cycle keep their order.
    fn update_order<'t>(&self, adapters: &'t [(&'t DesignTable, String)]) -> Vec<&'t (&'t DesignTable, String)> {
        let mut ordered: Vec<&(&DesignTable, String)> = Vec::new();
        let mut pending: Vec<&(&DesignTable, String)> = adapters.iter().collect();
        while !pending.is_empty() {
            let ready = pending.iter().position(|(table, _)| {
                self.ds.parent_relations(table.name()).all(|r| {
                    r.parent_table == table.name()
                        || !pending.iter().any(|(p, _)| p.name() == r.parent_table)
                })
            });
            ordered.push(pending.remove(ready.unwrap_or(0)));
        }
        ordered
    }

    fn manager(&self, adapters: &[(&DesignTable, String)]) -> CodeTypeDeclaration {
        let mut class = component_class(MANAGER_CLASS_NAME, None);
        for (_, adapter) in adapters {
            let field = format!("_{}", camel_case(adapter.trim_start_matches('@')));
            let adapter_type = CodeTypeReference::new(adapter.clone());
            class.add(private_field(&field, adapter_type.clone()));
            class.add(property(
                adapter,
                adapter_type,
                MemberAttributes::PUBLIC | MemberAttributes::FINAL,
                vec![CodeStatement::ret(this_field(&field))],
                Some(vec![CodeStatement::assign(
                    this_field(&field),
                    CodeExpression::variable("value"),
                )]),
            ));
        }

        let data_set = CodeExpression::argument("dataSet");
        let result = CodeExpression::variable("result");
        let row_state = |states: &[&str]| {
            states
                .iter()
                .map(|s| global_type("System.Data.DataViewRowState").field(*s))
                .reduce(|a, b| a.binary(BinaryOperator::BitwiseOr, b))
                .unwrap_or_else(CodeExpression::null)
        };
        let update_pass = |table: &DesignTable, adapter: &str, rows: &str, states: &[&str]| {
            let field = this_field(&format!("_{}", camel_case(adapter.trim_start_matches('@'))));
            let rows_var = CodeExpression::variable(rows);
            CodeStatement::if_then(
                field
                    .clone()
                    .binary(BinaryOperator::IdentityInequality, CodeExpression::null()),
                vec![
                    CodeStatement::declare(
                        CodeTypeReference::array_of(CodeTypeReference::global("System.Data.DataRow")),
                        rows,
                        data_set
                            .clone()
                            .property("Tables")
                            .index(vec![CodeExpression::string(table.name())])
                            .invoke(
                                "Select",
                                vec![CodeExpression::null(), CodeExpression::null(), row_state(states)],
                            ),
                    ),
                    CodeStatement::if_then(
                        rows_var
                            .clone()
                            .binary(BinaryOperator::IdentityInequality, CodeExpression::null())
                            .binary(
                                BinaryOperator::BooleanAnd,
                                CodeExpression::int(0).binary(
                                    BinaryOperator::LessThan,
                                    rows_var.clone().property("Length"),
                                ),
                            ),
                        vec![CodeStatement::assign(
                            result.clone(),
                            result
                                .clone()
                                .binary(BinaryOperator::Add, field.invoke("Update", vec![rows_var])),
                        )],
                    ),
                ],
            )
        };

        let mut update_all = CodeMemberMethod::new("UpdateAll");
        update_all.attributes = MemberAttributes::PUBLIC;
        update_all.return_type = CodeTypeReference::global("System.Int32");
        update_all.parameters.push(CodeParameter::new(
            CodeTypeReference::global("System.Data.DataSet"),
            "dataSet",
        ));
        update_all.push(CodeStatement::if_then(
            data_set
                .clone()
                .binary(BinaryOperator::IdentityEquality, CodeExpression::null()),
            vec![CodeStatement::Throw(CodeExpression::new_object(
                CodeTypeReference::global("System.ArgumentNullException"),
                vec![CodeExpression::string("dataSet")],
            ))],
        ));
        update_all.push(CodeStatement::if_then(
            data_set
                .clone()
                .invoke("HasChanges", vec![])
                .binary(BinaryOperator::ValueEquality, CodeExpression::bool(false)),
            vec![CodeStatement::ret(CodeExpression::int(0))],
        ));
        update_all.push(CodeStatement::declare(
            CodeTypeReference::global("System.Int32"),
            "result",
            CodeExpression::int(0),
        ));

        let order = self.update_order(adapters);
        for (table, adapter) in &order {
            update_all.push(update_pass(table, adapter, "updatedRows", &["Added", "ModifiedCurrent"]));
        }
        for (table, adapter) in order.iter().rev() {
            update_all.push(update_pass(table, adapter, "deletedRows", &["Deleted"]));
        }
        update_all.push(CodeStatement::ret(result));
        class.add(CodeTypeMember::Method(update_all));
        class
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codedom::CSharpEmitter,
        design::{DbType, DesignColumn, DesignConnection, DesignParameter, DesignRelation, QueryType},
    };

    fn northwind() -> DesignDataSource {
        let mut ds = DesignDataSource::new("NorthwindDataSet");
        ds.connections.push(DesignConnection::new(
            "NorthwindConnectionString",
            "System.Data.SqlClient",
            "Data Source=.;Initial Catalog=Northwind",
        ));

        let mut customers = DesignTable::new("Customers");
        customers.add_column(DesignColumn::new("CustomerID")).unwrap();
        customers.add_mapping("CustomerID", "CustomerID");
        let mut main = DbSource::new("Fill")
            .with_select(DbCommand::text("SELECT CustomerID FROM Customers"))
            .with_get_method_name("GetData");
        main.generate_paging_methods = true;
        main.generate_short_commands = true;
        main.delete_command = Some(
            DbCommand::text("DELETE FROM Customers WHERE CustomerID = @Original_CustomerID")
                .with_parameter(DesignParameter::new("@Original_CustomerID", DbType::String)),
        );
        customers.main_source = Some(main);
        customers.sources.push(
            DbSource::new("CountCustomers")
                .with_select(DbCommand::text("SELECT COUNT(*) FROM Customers"))
                .with_query_type(QueryType::Scalar),
        );

        let mut orders = DesignTable::new("Orders");
        orders.add_column(DesignColumn::new("OrderID")).unwrap();
        orders.add_column(DesignColumn::new("CustomerID")).unwrap();
        orders.main_source = Some(DbSource::new("Fill").with_select(DbCommand::text("SELECT * FROM Orders")));

        ds.add_table(orders).unwrap();
        ds.add_table(customers).unwrap();
        ds.add_relation(DesignRelation::new(
            "FK_Orders_Customers",
            "Customers",
            "CustomerID",
            "Orders",
            "CustomerID",
        ))
        .unwrap();
        ds.sources.push(
            DbSource::new("TotalSales")
                .with_select(DbCommand::text("SELECT SUM(Total) FROM Sales"))
                .with_query_type(QueryType::Scalar),
        );
        ds
    }

    #[test]
    fn builds_adapter_per_table_with_sources() {
        let emitter = CSharpEmitter::new();
        let ds = northwind();
        let registry = ProviderRegistry::new();
        let builder = TableAdapterBuilder::new(&emitter, &ds, &registry, GenerateOption::empty(), "Demo");
        assert_eq!(builder.namespace_name(), "Demo.NorthwindDataSetTableAdapters");

        let namespace = builder.build().unwrap().unwrap();
        let adapter = namespace.type_named("CustomersTableAdapter").unwrap();
        let names: Vec<&str> = adapter.methods().map(|m| m.name.as_str()).collect();
        for expected in ["Fill", "FillPage", "GetData", "GetDataPage", "CountCustomers", "Update", "Delete"] {
            assert!(names.contains(&expected), "missing {}", expected);
        }
        assert!(namespace.type_named("QueriesTableAdapter").is_some());
        assert!(namespace.type_named(MANAGER_CLASS_NAME).is_none());

        let text = emitter.emit_namespace(&namespace).unwrap();
        assert!(text.contains("private global::System.Data.SqlClient.SqlDataAdapter _adapter;"));
        assert!(text.contains("this._connection.ConnectionString = \"Data Source=.;Initial Catalog=Northwind\";"));
        assert!(text.contains("public virtual int Fill(global::Demo.NorthwindDataSet.CustomersDataTable dataTable)"));
    }

    #[test]
    fn hierarchical_update_adds_manager_in_parent_order() {
        let emitter = CSharpEmitter::new();
        let ds = northwind();
        let registry = ProviderRegistry::new();
        let builder = TableAdapterBuilder::new(
            &emitter,
            &ds,
            &registry,
            GenerateOption::HIERARCHICAL_UPDATE,
            "",
        );
        let namespace = builder.build().unwrap().unwrap();
        assert_eq!(namespace.name, "NorthwindDataSetTableAdapters");
        let manager = namespace.type_named(MANAGER_CLASS_NAME).unwrap();
        assert!(manager.method("UpdateAll").is_some());

        let text = emitter.emit_type(manager).unwrap();
        let customers = text.find("this._customersTableAdapter.Update(updatedRows)").unwrap();
        let orders = text.find("this._ordersTableAdapter.Update(updatedRows)").unwrap();
        assert!(customers < orders);
        let customers_deleted = text.find("this._customersTableAdapter.Update(deletedRows)").unwrap();
        let orders_deleted = text.find("this._ordersTableAdapter.Update(deletedRows)").unwrap();
        assert!(orders_deleted < customers_deleted);
    }

    #[test]
    fn unknown_provider_is_not_supported() {
        let emitter = CSharpEmitter::new();
        let mut ds = northwind();
        ds.connections[0].provider = "Npgsql".to_string();
        let registry = ProviderRegistry::new();
        let builder = TableAdapterBuilder::new(&emitter, &ds, &registry, GenerateOption::empty(), "Demo");
        assert!(matches!(builder.build(), Err(Error::NotSupported(_))));
    }

    #[test]
    fn nothing_to_adapt_yields_no_namespace() {
        let emitter = CSharpEmitter::new();
        let mut ds = DesignDataSource::new("Empty");
        ds.add_table(DesignTable::new("T")).unwrap();
        let registry = ProviderRegistry::new();
        let builder = TableAdapterBuilder::new(&emitter, &ds, &registry, GenerateOption::empty(), "Demo");
        assert!(builder.build().unwrap().is_none());
    }
}
