//! Typed dataset class generation.
//!
//! The dataset class derives from `System.Data.DataSet` and nests, for every table, a typed
//! table class, a typed row class and a row-change event-args class. Tables derive from
//! `TypedTableBase<Row>` when LINQ support is requested and from `DataTable` implementing
//! `IEnumerable` otherwise.
//!
//! Names come from the design model's generator hints, falling back to the default naming
//! rules (`<Table>DataTable`, `<Table>Row`, `table<Table>`, `column<Col>`, `<Col>Column`,
//! `relation<Rel>`), and are made unique per declaring type.

use crate::{
    codedom::{
        BinaryOperator, CatchClause, CodeAttributeDeclaration, CodeConstructor, CodeEmitter,
        CodeExpression, CodeMemberEvent, CodeMemberField, CodeMemberMethod, CodeMemberProperty,
        CodeParameter, CodeStatement, CodeTypeDeclaration, CodeTypeMember, CodeTypeReference,
        MemberAttributes,
    },
    codegen::{
        clr_type, global_type,
        naming::{escape, fix_identifier, NameScope},
        this_field, this_property, GenerateOption,
    },
    design::{
        is_value_type, Constraint, DesignColumn, DesignDataSource, DesignRelation, DesignTable,
        MappingType, Rule, NULL_VALUE_EMPTY, NULL_VALUE_NULL, NULL_VALUE_THROW,
    },
    Error, Result,
};

const DATASET_MEMBERS: &[&str] = &[
    "Tables", "Relations", "DataSetName", "Namespace", "Prefix", "Locale", "CaseSensitive",
    "EnforceConstraints", "HasErrors", "ExtendedProperties", "Clone", "InitVars", "InitClass",
    "Site", "Container",
];

const ROW_MEMBERS: &[&str] = &[
    "Table", "Item", "ItemArray", "RowState", "RowError", "HasErrors", "Delete", "Clone",
];

const ROW_EVENTS: [(&str, &str); 4] = [
    ("Changing", "OnRowChanging"),
    ("Changed", "OnRowChanged"),
    ("Deleting", "OnRowDeleting"),
    ("Deleted", "OnRowDeleted"),
];

struct ColumnNames<'a> {
    column: &'a DesignColumn,
    var: String,
    prop: String,
    row_prop: String,
}

struct TableNames<'a> {
    table: &'a DesignTable,
    class: String,
    row: String,
    var: String,
    prop: String,
    event_args: String,
    columns: Vec<ColumnNames<'a>>,
}

impl TableNames<'_> {
    fn column(&self, name: &str) -> Result<&ColumnNames<'_>> {
        self.columns
            .iter()
            .find(|c| c.column.name() == name)
            .ok_or_else(|| {
                Error::NotFound(format!("column '{}' in table '{}'", name, self.table.name()))
            })
    }

    fn class_ref(&self) -> CodeTypeReference {
        CodeTypeReference::new(self.class.clone())
    }

    fn row_ref(&self) -> CodeTypeReference {
        CodeTypeReference::new(self.row.clone())
    }
}

fn attribute(name: &str) -> CodeAttributeDeclaration {
    CodeAttributeDeclaration::new(name)
}

fn browsable_false() -> CodeAttributeDeclaration {
    attribute("System.ComponentModel.BrowsableAttribute").arg(CodeExpression::bool(false))
}

fn field(name: &str, field_type: CodeTypeReference) -> CodeTypeMember {
    CodeTypeMember::Field(CodeMemberField {
        name: name.to_string(),
        field_type,
        attributes: MemberAttributes::PRIVATE,
        init: None,
    })
}

fn read_only_property(
    name: &str,
    property_type: CodeTypeReference,
    getter: Vec<CodeStatement>,
) -> CodeMemberProperty {
    CodeMemberProperty {
        name: name.to_string(),
        property_type,
        attributes: MemberAttributes::PUBLIC | MemberAttributes::FINAL,
        parameters: Vec::new(),
        getter: Some(getter),
        setter: None,
        custom_attributes: Vec::new(),
    }
}

fn method(
    name: &str,
    attributes: MemberAttributes,
    return_type: CodeTypeReference,
    parameters: Vec<CodeParameter>,
    body: Vec<CodeStatement>,
) -> CodeTypeMember {
    let mut m = CodeMemberMethod::new(name);
    m.attributes = attributes;
    m.return_type = return_type;
    m.parameters = parameters;
    m.body = Some(body);
    CodeTypeMember::Method(m)
}

fn column_array(columns: Vec<CodeExpression>) -> CodeExpression {
    CodeExpression::new_array(CodeTypeReference::global("System.Data.DataColumn"), columns)
}

fn find_table<'n, 'a>(names: &'n [TableNames<'a>], table: &str) -> Result<&'n TableNames<'a>> {
    names
        .iter()
        .find(|n| n.table.name() == table)
        .ok_or_else(|| Error::NotFound(format!("table '{}'", table)))
}

/// `this.table<X>.<Col>Column` for each named column.
fn column_refs(table: &TableNames<'_>, columns: &[String]) -> Result<Vec<CodeExpression>> {
    columns
        .iter()
        .map(|c| Ok(this_field(&table.var).property(table.column(c)?.prop.clone())))
        .collect()
}

fn rule_expression(rule: Rule) -> CodeExpression {
    global_type("System.Data.Rule").field(rule.to_string())
}

/// Builds the typed dataset class of a data source.
pub struct TypedDataSetBuilder<'a> {
    emitter: &'a dyn CodeEmitter,
    ds: &'a DesignDataSource,
    options: GenerateOption,
}

impl<'a> TypedDataSetBuilder<'a> {
    /// Creates a builder.
    pub fn new(emitter: &'a dyn CodeEmitter, ds: &'a DesignDataSource, options: GenerateOption) -> Self {
        Self { emitter, ds, options }
    }

    fn table_names(&self) -> Vec<TableNames<'a>> {
        let mut scope = NameScope::with_reserved(DATASET_MEMBERS.iter().copied());
        scope.claim(&self.ds.class_name());
        self.ds
            .tables()
            .iter()
            .map(|table| {
                let class = escape(self.emitter, &scope.claim(&table.table_class_name()));
                let row = escape(self.emitter, &scope.claim(&table.row_class_name()));
                let event_args = scope.claim(
                    table
                        .hints
                        .row_ev_arg_name
                        .as_deref()
                        .unwrap_or(&format!("{}ChangeEvent", row)),
                );
                let var = scope.claim(&table.table_var_name());
                let prop = escape(self.emitter, &scope.claim(&table.table_prop_name()));

                let mut row_scope = NameScope::with_reserved(ROW_MEMBERS.iter().copied());
                row_scope.claim(&row);
                let mut table_scope = NameScope::with_reserved(["Count", "Item", "Rows", "Columns"]);
                table_scope.claim(&class);
                let columns = table
                    .columns()
                    .iter()
                    .map(|column| {
                        let ident = fix_identifier(column.name());
                        ColumnNames {
                            column,
                            var: table_scope.claim(
                                column
                                    .hints
                                    .column_var_name_in_table
                                    .as_deref()
                                    .unwrap_or(&format!("column{}", ident)),
                            ),
                            prop: escape(
                                self.emitter,
                                &table_scope.claim(
                                    column
                                        .hints
                                        .column_prop_name_in_table
                                        .as_deref()
                                        .unwrap_or(&format!("{}Column", ident)),
                                ),
                            ),
                            row_prop: escape(self.emitter, &row_scope.claim(column.row_property_name())),
                        }
                    })
                    .collect();

                TableNames {
                    table,
                    class,
                    row,
                    var,
                    prop,
                    event_args,
                    columns,
                }
            })
            .collect()
    }

    /// Builds the dataset class with its nested table, row and event classes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when a constraint or relation names a table or column that
    /// does not exist.
    pub fn build(&self) -> Result<CodeTypeDeclaration> {
        let names = self.table_names();
        let class_name = escape(self.emitter, &self.ds.class_name());
        let mut class = CodeTypeDeclaration::class(class_name.clone());
        class.is_partial = true;
        class.base_types.push(CodeTypeReference::global("System.Data.DataSet"));
        class.custom_attributes = vec![
            attribute("System.Serializable"),
            attribute("System.ComponentModel.DesignerCategoryAttribute")
                .arg(CodeExpression::string("code")),
            attribute("System.ComponentModel.ToolboxItem").arg(CodeExpression::bool(true)),
            attribute("System.Xml.Serialization.XmlRootAttribute")
                .arg(CodeExpression::string(self.ds.name.clone())),
        ];

        let relations: Vec<(&DesignRelation, String)> = {
            let mut scope = NameScope::with_reserved(names.iter().map(|n| n.var.as_str()));
            self.ds
                .relations()
                .iter()
                .filter(|r| r.is_navigable())
                .map(|r| {
                    let var = r
                        .hints
                        .relation_var_name
                        .clone()
                        .unwrap_or_else(|| format!("relation{}", fix_identifier(&r.name)));
                    (r, scope.claim(&var))
                })
                .collect()
        };

        for table in &names {
            class.add(field(&table.var, table.class_ref()));
        }
        for (_, var) in &relations {
            class.add(field(var, CodeTypeReference::global("System.Data.DataRelation")));
        }

        class.add(CodeTypeMember::Constructor(CodeConstructor {
            attributes: MemberAttributes::PUBLIC,
            parameters: Vec::new(),
            base_arguments: Vec::new(),
            statements: vec![
                CodeExpression::this().invoke("BeginInit", vec![]).into(),
                CodeExpression::this().invoke("InitClass", vec![]).into(),
                CodeExpression::this().invoke("EndInit", vec![]).into(),
            ],
        }));

        for table in &names {
            let mut property = read_only_property(
                &table.prop,
                table.class_ref(),
                vec![CodeStatement::ret(this_field(&table.var))],
            );
            property.custom_attributes.push(browsable_false());
            class.add(CodeTypeMember::Property(property));
        }

        let class_ref = CodeTypeReference::new(class_name.clone());
        class.add(clone_method(&class_ref, "System.Data.DataSet", MemberAttributes::PUBLIC));
        for name in ["ShouldSerializeTables", "ShouldSerializeRelations"] {
            class.add(method(
                name,
                MemberAttributes::FAMILY | MemberAttributes::OVERRIDE,
                CodeTypeReference::global("System.Boolean"),
                Vec::new(),
                vec![CodeStatement::ret(CodeExpression::bool(false))],
            ));
        }

        let mut init_vars = Vec::new();
        for table in &names {
            init_vars.push(CodeStatement::assign(
                this_field(&table.var),
                CodeExpression::base()
                    .property("Tables")
                    .index(vec![CodeExpression::string(table.table.name())])
                    .cast(table.class_ref()),
            ));
            init_vars.push(CodeStatement::if_then(
                this_field(&table.var)
                    .binary(BinaryOperator::IdentityInequality, CodeExpression::null()),
                vec![this_field(&table.var).invoke("InitVars", vec![]).into()],
            ));
        }
        for (relation, var) in &relations {
            init_vars.push(CodeStatement::assign(
                this_field(var),
                this_property("Relations").index(vec![CodeExpression::string(relation.name.clone())]),
            ));
        }
        class.add(method(
            "InitVars",
            MemberAttributes::ASSEMBLY | MemberAttributes::FINAL,
            CodeTypeReference::void(),
            Vec::new(),
            init_vars,
        ));
        class.add(method(
            "InitClass",
            MemberAttributes::PRIVATE,
            CodeTypeReference::void(),
            Vec::new(),
            self.init_class(&names, &relations)?,
        ));

        for table in &names {
            class.add(method(
                &format!("ShouldSerialize{}", table.prop.trim_start_matches('@')),
                MemberAttributes::PRIVATE,
                CodeTypeReference::global("System.Boolean"),
                Vec::new(),
                vec![CodeStatement::ret(CodeExpression::bool(false))],
            ));
        }

        for table in &names {
            class.add(CodeTypeMember::NestedType(Box::new(self.table_class(table)?)));
        }
        for table in &names {
            class.add(CodeTypeMember::NestedType(Box::new(
                self.row_class(table, &names, &relations)?,
            )));
        }
        for table in &names {
            class.add(CodeTypeMember::NestedType(Box::new(event_args_class(table))));
        }
        Ok(class)
    }

    fn init_class(
        &self,
        names: &[TableNames<'_>],
        relations: &[(&DesignRelation, String)],
    ) -> Result<Vec<CodeStatement>> {
        let mut statements = vec![
            CodeStatement::assign(this_property("DataSetName"), CodeExpression::string(self.ds.name.clone())),
            CodeStatement::assign(this_property("Prefix"), CodeExpression::string("")),
            CodeStatement::assign(this_property("Namespace"), CodeExpression::string(self.ds.namespace.clone())),
            CodeStatement::assign(this_property("EnforceConstraints"), CodeExpression::bool(true)),
        ];
        for table in names {
            statements.push(CodeStatement::assign(
                this_field(&table.var),
                CodeExpression::new_object(table.class_ref(), vec![]),
            ));
            statements.push(
                CodeExpression::base()
                    .property("Tables")
                    .invoke("Add", vec![this_field(&table.var)])
                    .into(),
            );
        }

        let mut declared = false;
        for child in names {
            for constraint in child.table.constraints() {
                let Constraint::ForeignKey(fk) = constraint else {
                    continue;
                };
                if !declared {
                    statements.push(CodeStatement::VariableDeclaration {
                        var_type: CodeTypeReference::global("System.Data.ForeignKeyConstraint"),
                        name: "fkc".to_string(),
                        init: None,
                    });
                    declared = true;
                }
                let parent = find_table(names, &fk.related_table)?;
                let fkc = CodeExpression::variable("fkc");
                statements.push(CodeStatement::assign(
                    fkc.clone(),
                    CodeExpression::new_object(
                        CodeTypeReference::global("System.Data.ForeignKeyConstraint"),
                        vec![
                            CodeExpression::string(fk.name.clone()),
                            column_array(column_refs(parent, &fk.related_columns)?),
                            column_array(column_refs(child, &fk.columns)?),
                        ],
                    ),
                ));
                statements.push(
                    this_field(&child.var)
                        .property("Constraints")
                        .invoke("Add", vec![fkc.clone()])
                        .into(),
                );
                statements.push(CodeStatement::assign(
                    fkc.clone().property("AcceptRejectRule"),
                    global_type("System.Data.AcceptRejectRule").field("None"),
                ));
                statements.push(CodeStatement::assign(
                    fkc.clone().property("DeleteRule"),
                    rule_expression(fk.delete_rule),
                ));
                statements.push(CodeStatement::assign(
                    fkc.property("UpdateRule"),
                    rule_expression(fk.update_rule),
                ));
            }
        }

        for (relation, var) in relations {
            let parent = find_table(names, &relation.parent_table)?;
            let child = find_table(names, &relation.child_table)?;
            statements.push(CodeStatement::assign(
                this_field(var),
                CodeExpression::new_object(
                    CodeTypeReference::global("System.Data.DataRelation"),
                    vec![
                        CodeExpression::string(relation.name.clone()),
                        column_array(column_refs(parent, &relation.parent_columns)?),
                        column_array(column_refs(child, &relation.child_columns)?),
                        CodeExpression::bool(false),
                    ],
                ),
            ));
            if relation.is_nested {
                statements.push(CodeStatement::assign(
                    this_field(var).property("Nested"),
                    CodeExpression::bool(true),
                ));
            }
            statements.push(
                this_property("Relations")
                    .invoke("Add", vec![this_field(var)])
                    .into(),
            );
        }
        Ok(statements)
    }

    fn table_class(&self, names: &TableNames<'_>) -> Result<CodeTypeDeclaration> {
        let linq = self.options.contains(GenerateOption::LINQ_OVER_TYPED_DATASETS);
        let mut class = CodeTypeDeclaration::class(names.class.clone());
        class.is_partial = true;
        class.custom_attributes.push(attribute("System.Serializable"));
        if linq {
            class.base_types.push(CodeTypeReference::generic(
                "System.Data.TypedTableBase",
                vec![names.row_ref()],
            ));
        } else {
            class.base_types.push(CodeTypeReference::global("System.Data.DataTable"));
            class
                .base_types
                .push(CodeTypeReference::global("System.Collections.IEnumerable"));
        }

        for column in &names.columns {
            class.add(field(&column.var, CodeTypeReference::global("System.Data.DataColumn")));
        }

        class.add(CodeTypeMember::Constructor(CodeConstructor {
            attributes: MemberAttributes::PUBLIC,
            parameters: Vec::new(),
            base_arguments: Vec::new(),
            statements: vec![
                CodeStatement::assign(
                    this_property("TableName"),
                    CodeExpression::string(names.table.name()),
                ),
                CodeExpression::this().invoke("BeginInit", vec![]).into(),
                CodeExpression::this().invoke("InitClass", vec![]).into(),
                CodeExpression::this().invoke("EndInit", vec![]).into(),
            ],
        }));

        for column in &names.columns {
            let mut property = read_only_property(
                &column.prop,
                CodeTypeReference::global("System.Data.DataColumn"),
                vec![CodeStatement::ret(this_field(&column.var))],
            );
            property.custom_attributes.push(browsable_false());
            class.add(CodeTypeMember::Property(property));
        }

        let mut count = read_only_property(
            "Count",
            CodeTypeReference::global("System.Int32"),
            vec![CodeStatement::ret(this_property("Rows").property("Count"))],
        );
        count.custom_attributes.push(browsable_false());
        class.add(CodeTypeMember::Property(count));

        class.add(CodeTypeMember::Property(CodeMemberProperty {
            name: "Item".to_string(),
            property_type: names.row_ref(),
            attributes: MemberAttributes::PUBLIC | MemberAttributes::FINAL,
            parameters: vec![CodeParameter::new(
                CodeTypeReference::global("System.Int32"),
                "index",
            )],
            getter: Some(vec![CodeStatement::ret(
                this_property("Rows")
                    .index(vec![CodeExpression::argument("index")])
                    .cast(names.row_ref()),
            )]),
            setter: None,
            custom_attributes: Vec::new(),
        }));

        let event_type = CodeTypeReference::generic(
            "System.EventHandler",
            vec![CodeTypeReference::new(names.event_args.clone())],
        );
        for (suffix, _) in ROW_EVENTS {
            class.add(CodeTypeMember::Event(CodeMemberEvent {
                name: format!("{}{}", names.row, suffix),
                event_type: event_type.clone(),
                attributes: MemberAttributes::PUBLIC,
            }));
        }

        let public_final = MemberAttributes::PUBLIC | MemberAttributes::FINAL;
        let row_arg = CodeExpression::argument("row");
        class.add(method(
            &format!("Add{}", names.row),
            public_final,
            CodeTypeReference::void(),
            vec![CodeParameter::new(names.row_ref(), "row")],
            vec![this_property("Rows").invoke("Add", vec![row_arg.clone()]).into()],
        ));
        class.add(self.typed_add_row(names));
        if let Some(find) = self.find_by_key(names)? {
            class.add(find);
        }
        if !linq {
            class.add(method(
                "GetEnumerator",
                MemberAttributes::PUBLIC,
                CodeTypeReference::global("System.Collections.IEnumerator"),
                Vec::new(),
                vec![CodeStatement::ret(
                    this_property("Rows").invoke("GetEnumerator", vec![]),
                )],
            ));
        }
        class.add(clone_method(&names.class_ref(), "System.Data.DataTable", MemberAttributes::PUBLIC));
        class.add(method(
            "CreateInstance",
            MemberAttributes::FAMILY | MemberAttributes::OVERRIDE,
            CodeTypeReference::global("System.Data.DataTable"),
            Vec::new(),
            vec![CodeStatement::ret(CodeExpression::new_object(names.class_ref(), vec![]))],
        ));

        let init_vars = names
            .columns
            .iter()
            .map(|c| {
                CodeStatement::assign(
                    this_field(&c.var),
                    CodeExpression::base()
                        .property("Columns")
                        .index(vec![CodeExpression::string(c.column.name())]),
                )
            })
            .collect();
        class.add(method(
            "InitVars",
            MemberAttributes::ASSEMBLY | MemberAttributes::FINAL,
            CodeTypeReference::void(),
            Vec::new(),
            init_vars,
        ));
        class.add(method(
            "InitClass",
            MemberAttributes::PRIVATE,
            CodeTypeReference::void(),
            Vec::new(),
            table_init_class(names)?,
        ));

        class.add(method(
            &format!("New{}", names.row),
            public_final,
            names.row_ref(),
            Vec::new(),
            vec![CodeStatement::ret(
                CodeExpression::this().invoke("NewRow", vec![]).cast(names.row_ref()),
            )],
        ));
        class.add(method(
            "NewRowFromBuilder",
            MemberAttributes::FAMILY | MemberAttributes::OVERRIDE,
            CodeTypeReference::global("System.Data.DataRow"),
            vec![CodeParameter::new(
                CodeTypeReference::global("System.Data.DataRowBuilder"),
                "builder",
            )],
            vec![CodeStatement::ret(CodeExpression::new_object(
                names.row_ref(),
                vec![CodeExpression::argument("builder")],
            ))],
        ));
        class.add(method(
            "GetRowType",
            MemberAttributes::FAMILY | MemberAttributes::OVERRIDE,
            CodeTypeReference::global("System.Type"),
            Vec::new(),
            vec![CodeStatement::ret(CodeExpression::type_of(names.row_ref()))],
        ));

        for (suffix, handler) in ROW_EVENTS {
            let event = CodeExpression::this().event(format!("{}{}", names.row, suffix));
            let e = CodeExpression::argument("e");
            class.add(method(
                handler,
                MemberAttributes::FAMILY | MemberAttributes::OVERRIDE,
                CodeTypeReference::void(),
                vec![CodeParameter::new(
                    CodeTypeReference::global("System.Data.DataRowChangeEventArgs"),
                    "e",
                )],
                vec![
                    CodeExpression::base().invoke(handler, vec![e.clone()]).into(),
                    CodeStatement::if_then(
                        event
                            .clone()
                            .binary(BinaryOperator::IdentityInequality, CodeExpression::null()),
                        vec![CodeExpression::this()
                            .invoke(
                                format!("{}{}", names.row, suffix),
                                vec![
                                    CodeExpression::this(),
                                    CodeExpression::new_object(
                                        CodeTypeReference::new(names.event_args.clone()),
                                        vec![
                                            e.clone().property("Row").cast(names.row_ref()),
                                            e.property("Action"),
                                        ],
                                    ),
                                ],
                            )
                            .into()],
                    ),
                ],
            ));
        }

        class.add(method(
            &format!("Remove{}", names.row),
            public_final,
            CodeTypeReference::void(),
            vec![CodeParameter::new(names.row_ref(), "row")],
            vec![this_property("Rows").invoke("Remove", vec![row_arg]).into()],
        ));
        Ok(class)
    }

    /// `Add<Row>(values...)`: one argument per settable column, auto-increment and computed
    /// columns are left to the table.
    fn typed_add_row(&self, names: &TableNames<'_>) -> CodeTypeMember {
        let row_var = format!("row{}", names.row);
        let mut parameters = Vec::new();
        let mut values = Vec::new();
        for column in &names.columns {
            if column.column.auto_increment() || !column.column.expression().is_empty() {
                values.push(CodeExpression::null());
            } else {
                parameters.push(CodeParameter::new(
                    clr_type(column.column.data_type()),
                    column.row_prop.clone(),
                ));
                values.push(CodeExpression::argument(column.row_prop.clone()));
            }
        }
        let row = CodeExpression::variable(row_var.clone());
        method(
            &format!("Add{}", names.row),
            MemberAttributes::PUBLIC | MemberAttributes::FINAL,
            names.row_ref(),
            parameters,
            vec![
                CodeStatement::declare(
                    names.row_ref(),
                    row_var,
                    CodeExpression::this().invoke("NewRow", vec![]).cast(names.row_ref()),
                ),
                CodeStatement::declare(
                    CodeTypeReference::array_of(CodeTypeReference::global("System.Object")),
                    "columnValuesArray",
                    CodeExpression::new_array(CodeTypeReference::global("System.Object"), values),
                ),
                CodeStatement::assign(
                    row.clone().property("ItemArray"),
                    CodeExpression::variable("columnValuesArray"),
                ),
                this_property("Rows").invoke("Add", vec![row.clone()]).into(),
                CodeStatement::ret(row),
            ],
        )
    }

    fn find_by_key(&self, names: &TableNames<'_>) -> Result<Option<CodeTypeMember>> {
        let Some(key) = names.table.primary_key() else {
            return Ok(None);
        };
        let mut name = String::from("FindBy");
        let mut parameters = Vec::new();
        let mut keys = Vec::new();
        for column in &key.columns {
            let column = names.column(column)?;
            name.push_str(column.row_prop.trim_start_matches('@'));
            parameters.push(CodeParameter::new(
                clr_type(column.column.data_type()),
                column.row_prop.clone(),
            ));
            keys.push(CodeExpression::argument(column.row_prop.clone()));
        }
        Ok(Some(method(
            &name,
            MemberAttributes::PUBLIC | MemberAttributes::FINAL,
            names.row_ref(),
            parameters,
            vec![CodeStatement::ret(
                this_property("Rows")
                    .invoke(
                        "Find",
                        vec![CodeExpression::new_array(
                            CodeTypeReference::global("System.Object"),
                            keys,
                        )],
                    )
                    .cast(names.row_ref()),
            )],
        )))
    }

    fn row_class(
        &self,
        names: &TableNames<'_>,
        all: &[TableNames<'_>],
        relations: &[(&DesignRelation, String)],
    ) -> Result<CodeTypeDeclaration> {
        let mut class = CodeTypeDeclaration::class(names.row.clone());
        class.is_partial = true;
        class.base_types.push(CodeTypeReference::global("System.Data.DataRow"));
        class.add(field(&names.var, names.class_ref()));
        class.add(CodeTypeMember::Constructor(CodeConstructor {
            attributes: MemberAttributes::ASSEMBLY,
            parameters: vec![CodeParameter::new(
                CodeTypeReference::global("System.Data.DataRowBuilder"),
                "rb",
            )],
            base_arguments: vec![CodeExpression::argument("rb")],
            statements: vec![CodeStatement::assign(
                this_field(&names.var),
                this_property("Table").cast(names.class_ref()),
            )],
        }));

        for column in &names.columns {
            class.add(CodeTypeMember::Property(row_property(names, column)));
        }

        let mut scope = NameScope::with_reserved(ROW_MEMBERS.iter().copied());
        for column in &names.columns {
            scope.claim(&column.row_prop);
        }

        for (relation, _) in relations.iter().filter(|(r, _)| r.child_table == names.table.name()) {
            let parent = find_table(all, &relation.parent_table)?;
            let several = relations
                .iter()
                .filter(|(r, _)| r.child_table == relation.child_table && r.parent_table == relation.parent_table)
                .count()
                > 1;
            let default = if several {
                format!("{}By{}", parent.row, fix_identifier(&relation.name))
            } else {
                parent.row.clone()
            };
            let name = escape(
                self.emitter,
                &scope.claim(relation.hints.parent_prop_name.as_deref().unwrap_or(&default)),
            );
            let parent_relation = this_property("Table")
                .property("ParentRelations")
                .index(vec![CodeExpression::string(relation.name.clone())]);
            class.add(CodeTypeMember::Property(CodeMemberProperty {
                name,
                property_type: parent.row_ref(),
                attributes: MemberAttributes::PUBLIC | MemberAttributes::FINAL,
                parameters: Vec::new(),
                getter: Some(vec![CodeStatement::ret(
                    CodeExpression::this()
                        .invoke("GetParentRow", vec![parent_relation.clone()])
                        .cast(parent.row_ref()),
                )]),
                setter: Some(vec![CodeExpression::this()
                    .invoke(
                        "SetParentRow",
                        vec![CodeExpression::variable("value"), parent_relation],
                    )
                    .into()]),
                custom_attributes: Vec::new(),
            }));
        }

        for column in names.columns.iter().filter(|c| c.column.allow_db_null()) {
            let column_ref = this_field(&names.var).property(column.prop.clone());
            let base = column.row_prop.trim_start_matches('@');
            class.add(method(
                &format!("Is{}Null", base),
                MemberAttributes::PUBLIC | MemberAttributes::FINAL,
                CodeTypeReference::global("System.Boolean"),
                Vec::new(),
                vec![CodeStatement::ret(
                    CodeExpression::this().invoke("IsNull", vec![column_ref.clone()]),
                )],
            ));
            class.add(method(
                &format!("Set{}Null", base),
                MemberAttributes::PUBLIC | MemberAttributes::FINAL,
                CodeTypeReference::void(),
                Vec::new(),
                vec![CodeStatement::assign(
                    CodeExpression::this().index(vec![column_ref]),
                    global_type("System.Convert").field("DBNull"),
                )],
            ));
        }

        for (relation, _) in relations.iter().filter(|(r, _)| r.parent_table == names.table.name()) {
            let child = find_table(all, &relation.child_table)?;
            let several = relations
                .iter()
                .filter(|(r, _)| r.child_table == relation.child_table && r.parent_table == relation.parent_table)
                .count()
                > 1;
            let child_ident = fix_identifier(child.table.name());
            let default = if several {
                format!("Get{}RowsBy{}", child_ident, fix_identifier(&relation.name))
            } else {
                format!("Get{}Rows", child_ident)
            };
            let name = escape(
                self.emitter,
                &scope.claim(relation.hints.child_prop_name.as_deref().unwrap_or(&default)),
            );
            let child_relation = this_property("Table")
                .property("ChildRelations")
                .index(vec![CodeExpression::string(relation.name.clone())]);
            let rows = CodeTypeReference::array_of(child.row_ref());
            class.add(method(
                &name,
                MemberAttributes::PUBLIC | MemberAttributes::FINAL,
                rows.clone(),
                Vec::new(),
                vec![CodeStatement::if_else(
                    child_relation
                        .clone()
                        .binary(BinaryOperator::IdentityEquality, CodeExpression::null()),
                    vec![CodeStatement::ret(super::query::sized_array(child.row_ref(), 0))],
                    vec![CodeStatement::ret(
                        CodeExpression::base()
                            .invoke("GetChildRows", vec![child_relation])
                            .cast(rows),
                    )],
                )],
            ));
        }
        Ok(class)
    }
}

fn clone_method(class: &CodeTypeReference, base: &str, attributes: MemberAttributes) -> CodeTypeMember {
    method(
        "Clone",
        attributes | MemberAttributes::OVERRIDE,
        CodeTypeReference::global(base),
        Vec::new(),
        vec![
            CodeStatement::declare(
                class.clone(),
                "cln",
                CodeExpression::base().invoke("Clone", vec![]).cast(class.clone()),
            ),
            CodeExpression::variable("cln").invoke("InitVars", vec![]).into(),
            CodeStatement::ret(CodeExpression::variable("cln")),
        ],
    )
}

fn table_init_class(names: &TableNames<'_>) -> Result<Vec<CodeStatement>> {
    let mut statements = Vec::new();
    for column in &names.columns {
        let data = column.column.data_column();
        let var = this_field(&column.var);
        statements.push(CodeStatement::assign(
            var.clone(),
            CodeExpression::new_object(
                CodeTypeReference::global("System.Data.DataColumn"),
                vec![
                    CodeExpression::string(column.column.name()),
                    CodeExpression::type_of(clr_type(column.column.data_type())),
                    CodeExpression::null(),
                    global_type("System.Data.MappingType").field(data.mapping.to_string()),
                ],
            ),
        ));
        statements.push(
            CodeExpression::base()
                .property("Columns")
                .invoke("Add", vec![var.clone()])
                .into(),
        );
    }

    for constraint in names.table.constraints() {
        let Constraint::Unique(unique) = constraint else {
            continue;
        };
        let columns = unique
            .columns
            .iter()
            .map(|c| Ok(this_field(&names.column(c)?.var)))
            .collect::<Result<Vec<_>>>()?;
        statements.push(
            this_property("Constraints")
                .invoke(
                    "Add",
                    vec![CodeExpression::new_object(
                        CodeTypeReference::global("System.Data.UniqueConstraint"),
                        vec![
                            CodeExpression::string(unique.name.clone()),
                            column_array(columns),
                            CodeExpression::bool(unique.is_primary_key),
                        ],
                    )],
                )
                .into(),
        );
    }

    for column in &names.columns {
        let design = column.column;
        let data = design.data_column();
        let var = this_field(&column.var);
        let mut set = |property: &str, value: CodeExpression| {
            statements.push(CodeStatement::assign(var.clone().property(property), value));
        };
        if design.auto_increment() {
            set("AutoIncrement", CodeExpression::bool(true));
            set("AutoIncrementSeed", CodeExpression::int(data.auto_increment_seed));
            set("AutoIncrementStep", CodeExpression::int(data.auto_increment_step));
        }
        if !design.allow_db_null() {
            set("AllowDBNull", CodeExpression::bool(false));
        }
        if data.read_only {
            set("ReadOnly", CodeExpression::bool(true));
        }
        if design.unique() {
            set("Unique", CodeExpression::bool(true));
        }
        if design.max_length() > 0 {
            set("MaxLength", CodeExpression::int(i64::from(design.max_length())));
        }
        if let Some(caption) = &data.caption {
            set("Caption", CodeExpression::string(caption.clone()));
        }
        if !design.expression().is_empty() {
            set("Expression", CodeExpression::string(design.expression()));
        }
        if let Some(default) = &data.default_value {
            let value = if design.data_type() == "System.String" {
                CodeExpression::string(default.clone())
            } else {
                global_type("System.ComponentModel.TypeDescriptor")
                    .invoke(
                        "GetConverter",
                        vec![CodeExpression::type_of(clr_type(design.data_type()))],
                    )
                    .invoke("ConvertFromInvariantString", vec![CodeExpression::string(default.clone())])
            };
            set(
                "DefaultValue",
                value.cast(CodeTypeReference::global("System.Object")),
            );
        }
    }
    Ok(statements)
}

/// Typed row property honoring the column's null-value policy.
fn row_property(names: &TableNames<'_>, column: &ColumnNames<'_>) -> CodeMemberProperty {
    let design = column.column;
    let data_type = design.data_type();
    let value_type = is_value_type(data_type);
    let property_type = clr_type(data_type);
    let item = CodeExpression::this().index(vec![this_field(&names.var).property(column.prop.clone())]);
    let typed = item.clone().cast(property_type.clone());
    let is_null = CodeExpression::this().invoke(
        format!("Is{}Null", column.row_prop.trim_start_matches('@')),
        vec![],
    );

    let getter = if !design.allow_db_null() {
        vec![CodeStatement::ret(typed)]
    } else {
        match design.null_value() {
            NULL_VALUE_NULL if !value_type => vec![CodeStatement::if_else(
                is_null,
                vec![CodeStatement::ret(CodeExpression::null())],
                vec![CodeStatement::ret(typed)],
            )],
            NULL_VALUE_EMPTY if data_type == "System.String" => vec![CodeStatement::if_else(
                is_null,
                vec![CodeStatement::ret(global_type("System.String").field("Empty"))],
                vec![CodeStatement::ret(typed)],
            )],
            literal
                if literal != NULL_VALUE_THROW
                    && literal != NULL_VALUE_NULL
                    && literal != NULL_VALUE_EMPTY
                    && data_type == "System.String" =>
            {
                vec![CodeStatement::if_else(
                    is_null,
                    vec![CodeStatement::ret(CodeExpression::string(literal))],
                    vec![CodeStatement::ret(typed)],
                )]
            }
            _ => vec![CodeStatement::TryCatchFinally {
                try_statements: vec![CodeStatement::ret(typed)],
                catch_clauses: vec![CatchClause {
                    exception_type: CodeTypeReference::global("System.InvalidCastException"),
                    variable: Some("e".to_string()),
                    statements: vec![CodeStatement::Throw(CodeExpression::new_object(
                        CodeTypeReference::global("System.Data.StrongTypingException"),
                        vec![
                            CodeExpression::string(format!(
                                "The value for column '{}' in table '{}' is DBNull.",
                                design.name(),
                                names.table.name()
                            )),
                            CodeExpression::variable("e"),
                        ],
                    ))],
                }],
                finally_statements: Vec::new(),
            }],
        }
    };

    let setter = if design.data_column().mapping == MappingType::Hidden {
        None
    } else {
        Some(vec![CodeStatement::assign(item, CodeExpression::variable("value"))])
    };
    CodeMemberProperty {
        name: column.row_prop.clone(),
        property_type,
        attributes: MemberAttributes::PUBLIC | MemberAttributes::FINAL,
        parameters: Vec::new(),
        getter: Some(getter),
        setter,
        custom_attributes: Vec::new(),
    }
}

fn event_args_class(names: &TableNames<'_>) -> CodeTypeDeclaration {
    let mut class = CodeTypeDeclaration::class(names.event_args.clone());
    class.base_types.push(CodeTypeReference::global("System.EventArgs"));
    let action_type = CodeTypeReference::global("System.Data.DataRowAction");
    class.add(field("eventRow", names.row_ref()));
    class.add(field("eventAction", action_type.clone()));
    class.add(CodeTypeMember::Constructor(CodeConstructor {
        attributes: MemberAttributes::PUBLIC,
        parameters: vec![
            CodeParameter::new(names.row_ref(), "row"),
            CodeParameter::new(action_type.clone(), "action"),
        ],
        base_arguments: Vec::new(),
        statements: vec![
            CodeStatement::assign(this_field("eventRow"), CodeExpression::argument("row")),
            CodeStatement::assign(this_field("eventAction"), CodeExpression::argument("action")),
        ],
    }));
    class.add(CodeTypeMember::Property(read_only_property(
        "Row",
        names.row_ref(),
        vec![CodeStatement::ret(this_field("eventRow"))],
    )));
    class.add(CodeTypeMember::Property(read_only_property(
        "Action",
        action_type,
        vec![CodeStatement::ret(this_field("eventAction"))],
    )));
    class
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codedom::CSharpEmitter,
        design::{DesignColumn, UniqueConstraint},
    };

    fn northwind() -> DesignDataSource {
        let mut ds = DesignDataSource::new("NorthwindDataSet");
        ds.namespace = "http://tempuri.org/NorthwindDataSet.xsd".to_string();

        let mut customers = DesignTable::new("Customers");
        let mut id = DesignColumn::new("CustomerID");
        id.data_column_mut().allow_db_null = false;
        customers.add_column(id).unwrap();
        let mut city = DesignColumn::new("City");
        city.set_null_value(Some(NULL_VALUE_EMPTY.to_string()));
        customers.add_column(city).unwrap();
        customers
            .add_constraint(Constraint::Unique(UniqueConstraint {
                name: "Constraint1".to_string(),
                columns: vec!["CustomerID".to_string()],
                is_primary_key: true,
            }))
            .unwrap();

        let mut orders = DesignTable::new("Orders");
        let mut order_id = DesignColumn::new("OrderID");
        order_id.set_auto_increment(true);
        orders.add_column(order_id).unwrap();
        orders.add_column(DesignColumn::new("CustomerID")).unwrap();

        ds.add_table(customers).unwrap();
        ds.add_table(orders).unwrap();
        ds.add_relation(DesignRelation::new(
            "FK_Orders_Customers",
            "Customers",
            "CustomerID",
            "Orders",
            "CustomerID",
        ))
        .unwrap();
        ds
    }

    #[test]
    fn builds_dataset_table_and_row_classes() {
        let emitter = CSharpEmitter::new();
        let ds = northwind();
        let class = TypedDataSetBuilder::new(&emitter, &ds, GenerateOption::empty())
            .build()
            .unwrap();
        assert_eq!(class.name, "NorthwindDataSet");
        assert!(class.nested_type("CustomersDataTable").is_some());
        assert!(class.nested_type("OrdersRow").is_some());
        assert!(class.nested_type("CustomersRowChangeEvent").is_some());

        let table = class.nested_type("CustomersDataTable").unwrap();
        assert!(table.method("FindByCustomerID").is_some());
        assert!(table.method("GetEnumerator").is_some());
        assert_eq!(
            emitter.type_name(&table.base_types[0]),
            "global::System.Data.DataTable"
        );

        let orders = class.nested_type("OrdersDataTable").unwrap();
        let add = orders
            .methods()
            .find(|m| m.name == "AddOrdersRow" && m.parameters.len() == 1 && m.parameters[0].name != "row")
            .unwrap();
        assert_eq!(add.parameters[0].name, "CustomerID");

        let order_row = class.nested_type("OrdersRow").unwrap();
        assert!(order_row.properties().any(|p| p.name == "CustomersRow"));
        let customer_row = class.nested_type("CustomersRow").unwrap();
        assert!(customer_row.method("GetOrdersRows").is_some());
        assert!(customer_row.method("IsCityNull").is_some());
        assert!(customer_row.method("IsCustomerIDNull").is_none());
    }

    #[test]
    fn linq_tables_derive_from_typed_table_base() {
        let emitter = CSharpEmitter::new();
        let ds = northwind();
        let class = TypedDataSetBuilder::new(&emitter, &ds, GenerateOption::LINQ_OVER_TYPED_DATASETS)
            .build()
            .unwrap();
        let table = class.nested_type("OrdersDataTable").unwrap();
        assert_eq!(
            emitter.type_name(&table.base_types[0]),
            "global::System.Data.TypedTableBase<OrdersRow>"
        );
        assert!(table.method("GetEnumerator").is_none());
    }

    #[test]
    fn null_value_policy_shapes_getters() {
        let emitter = CSharpEmitter::new();
        let ds = northwind();
        let class = TypedDataSetBuilder::new(&emitter, &ds, GenerateOption::empty())
            .build()
            .unwrap();
        let text = emitter.emit_type(&class).unwrap();
        assert!(text.contains("return string.Empty;"));
        assert!(text.contains("throw new global::System.Data.StrongTypingException("));
        assert!(text.contains("this.relationFK_Orders_Customers = new global::System.Data.DataRelation("));
    }

    #[test]
    fn loaded_schema_uses_relation_hints() {
        let emitter = CSharpEmitter::new();
        let ds = crate::test::northwind();
        let class = TypedDataSetBuilder::new(&emitter, &ds, GenerateOption::empty())
            .build()
            .unwrap();
        assert_eq!(class.name, "NorthwindDataSet");
        assert!(class.nested_type("CustomersRow").unwrap().method("GetOrdersRows").is_some());
        assert!(class.nested_type("OrdersDataTable").is_some());
    }

    #[test]
    fn unknown_relation_columns_fail() {
        let emitter = CSharpEmitter::new();
        let mut ds = northwind();
        ds.table_mut("Orders")
            .unwrap()
            .add_constraint(Constraint::ForeignKey(crate::design::ForeignKeyConstraint {
                name: "FK_Bad".to_string(),
                columns: vec!["CustomerID".to_string()],
                related_table: "Suppliers".to_string(),
                related_columns: vec!["SupplierID".to_string()],
                update_rule: Rule::Cascade,
                delete_rule: Rule::Cascade,
            }))
            .unwrap();
        assert!(matches!(
            TypedDataSetBuilder::new(&emitter, &ds, GenerateOption::empty()).build(),
            Err(Error::NotFound(_))
        ));
    }
}
