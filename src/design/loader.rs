//! Builds a [`DesignDataSource`] from a dataset schema.
//!
//! The schema conventions read here are the ones dataset designers write:
//!
//! - the dataset is the global element flagged `msdata:IsDataSet`; its choice or sequence
//!   lists the tables;
//! - a table's simple-typed child elements and attributes are its columns, annotated with
//!   `msdata:*` column properties and `msprop:Generator_*` naming hints;
//! - `xs:unique`/`xs:key` and `xs:keyref` on the dataset element become constraints and
//!   relations, `msdata:Relationship` annotations become constraint-free relations;
//! - the `msdatasource:DataSource` annotation describes connections, table adapters and
//!   data-source-level functions.
//!
//! Without a dataset element every global element with a complex type is read as a table and
//! the data source is left unnamed.

use crate::{
    design::{
        CommandType, Constraint, DataColumn, DbCommand, DbSource, DbType,
        DesignColumn, DesignConnection, DesignDataSource, DesignParameter,
        DesignParameterDirection, DesignRelation, DesignTable, ForeignKeyConstraint,
        GenerateMethodTypes, MappingType, QueryType, RelationKind, Rule, UniqueConstraint,
    },
    importer::find_data_set_element,
    schema::{
        ComplexType, IdentityConstraint, IdentityConstraintKind, ParticleItem, Schema,
        SchemaAttribute, SchemaElement, SchemaSet, SimpleType, MSDATASOURCE_NAMESPACE,
        MSDATA_NAMESPACE, MSPROP_NAMESPACE, XSD_NAMESPACE,
    },
    serializer::PropertyReferenceSerializer,
    xml::{QualifiedName, XmlAttribute, XmlElement},
    Error, Result,
};

pub(crate) fn load(schema: &Schema, set: &SchemaSet) -> Result<DesignDataSource> {
    let mut ds = DesignDataSource::default();
    ds.namespace = schema.target_namespace.clone();

    match find_data_set_element(schema, set) {
        Some(element) => {
            ds.name = element.name.clone();
            ds.hints.data_set_name = msprop(&element.unhandled_attributes, "Generator_DataSetName");
            ds.hints.user_ds_name = msprop(&element.unhandled_attributes, "Generator_UserDSName");

            if let Some(ct) = set.element_complex_type(element) {
                if let Some(particle) = &ct.particle {
                    load_tables(&mut ds, &particle.group().items, set)?;
                }
            }
            load_constraints(&mut ds, &element.constraints)?;
            for appinfo in &element.appinfo {
                load_relationship(&mut ds, appinfo)?;
            }
        }
        None => {
            for element in schema.elements() {
                if let Some(ct) = set.element_complex_type(element) {
                    load_table(&mut ds, element, ct, set)?;
                }
            }
        }
    }

    for appinfo in &schema.appinfo {
        if appinfo.is(MSDATASOURCE_NAMESPACE, "DataSource") {
            load_data_source_annotation(&mut ds, appinfo)?;
        } else {
            load_relationship(&mut ds, appinfo)?;
        }
    }

    log::debug!(
        "loaded data source '{}' with {} tables and {} relations",
        ds.name,
        ds.tables().len(),
        ds.relations().len()
    );
    Ok(ds)
}

fn msdata<'a>(attributes: &'a [XmlAttribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|a| a.namespace == MSDATA_NAMESPACE && a.local_name == name)
        .map(|a| a.value.as_str())
}

fn msprop(attributes: &[XmlAttribute], name: &str) -> Option<String> {
    attributes
        .iter()
        .find(|a| a.namespace == MSPROP_NAMESPACE && a.local_name == name)
        .map(|a| a.value.clone())
}

fn flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn number<T: std::str::FromStr>(value: Option<&str>, what: &str) -> Result<Option<T>> {
    value
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|_| malformed_error!("Invalid {} '{}'", what, v))
        })
        .transpose()
}

fn load_tables(ds: &mut DesignDataSource, items: &[ParticleItem], set: &SchemaSet) -> Result<()> {
    for item in items {
        match item {
            ParticleItem::Element(element) => {
                let element = match &element.ref_name {
                    Some(name) => set.global_element(name).unwrap_or(element),
                    None => element,
                };
                if let Some(ct) = set.element_complex_type(element) {
                    load_table(ds, element, ct, set)?;
                }
            }
            ParticleItem::Group(particle) => load_tables(ds, &particle.group().items, set)?,
            ParticleItem::Any(_) => {}
        }
    }
    Ok(())
}

fn load_table(
    ds: &mut DesignDataSource,
    element: &SchemaElement,
    ct: &ComplexType,
    set: &SchemaSet,
) -> Result<()> {
    let mut table = DesignTable::new(element.name.clone());
    let attributes = &element.unhandled_attributes;
    table.hints.table_class_name = msprop(attributes, "Generator_TableClassName");
    table.hints.table_var_name = msprop(attributes, "Generator_TableVarName");
    table.hints.table_prop_name = msprop(attributes, "Generator_TablePropName");
    table.hints.row_class_name = msprop(attributes, "Generator_RowClassName");
    table.hints.user_table_name = msprop(attributes, "Generator_UserTableName");
    table.hints.row_ev_handler_name = msprop(attributes, "Generator_RowEvHandlerName");
    table.hints.row_ev_arg_name = msprop(attributes, "Generator_RowEvArgName");

    let mut nested = Vec::new();
    if let Some(particle) = &ct.particle {
        collect_columns(&mut table, &particle.group().items, set, &mut nested)?;
    }
    for attribute in &ct.attributes {
        table.add_column(attribute_column(attribute, set)?)?;
    }
    if let Some(base) = &ct.simple_content_base {
        let mut column = DataColumn::with_type(
            format!("{}_Text", element.name),
            clr_type_of(base, None, set),
        );
        column.mapping = MappingType::SimpleContent;
        table.add_column(DesignColumn::from_data_column(Some(column))?)?;
    }

    ds.add_table(table)?;
    for (child, child_type) in nested {
        load_table(ds, child, child_type, set)?;
    }
    Ok(())
}

fn collect_columns<'a>(
    table: &mut DesignTable,
    items: &'a [ParticleItem],
    set: &'a SchemaSet,
    nested: &mut Vec<(&'a SchemaElement, &'a ComplexType)>,
) -> Result<()> {
    for item in items {
        match item {
            ParticleItem::Element(element) => match set.element_complex_type(element) {
                Some(ct) => nested.push((element, ct)),
                None => table.add_column(element_column(element, set)?)?,
            },
            ParticleItem::Group(particle) => {
                collect_columns(table, &particle.group().items, set, nested)?;
            }
            ParticleItem::Any(_) => {}
        }
    }
    Ok(())
}

fn element_column(element: &SchemaElement, set: &SchemaSet) -> Result<DesignColumn> {
    let attributes = &element.unhandled_attributes;
    let simple = element.simple_type().cloned().or_else(|| {
        element
            .type_name
            .as_ref()
            .and_then(|name| simple_type_named(name, set))
    });
    let data_type = match msdata(attributes, "DataType") {
        Some(declared) => declared.split(',').next().unwrap_or(declared).trim().to_string(),
        None => match (&element.type_name, &simple) {
            (Some(name), _) => clr_type_of(name, simple.as_ref(), set),
            (None, Some(st)) => st
                .base
                .as_ref()
                .map_or_else(|| "System.String".to_string(), |b| clr_type_of(b, None, set)),
            (None, None) => "System.String".to_string(),
        },
    };

    let mut column = DataColumn::with_type(element.name.clone(), data_type);
    column.allow_db_null = element.min_occurs == 0;
    column.default_value = element.default_value.clone();
    if let Some(max_length) = simple.as_ref().and_then(|st| st.max_length) {
        column.set_max_length(max_length);
    }
    finish_column(column, attributes)
}

fn attribute_column(attribute: &SchemaAttribute, set: &SchemaSet) -> Result<DesignColumn> {
    let data_type = match msdata(&attribute.unhandled_attributes, "DataType") {
        Some(declared) => declared.split(',').next().unwrap_or(declared).trim().to_string(),
        None => match (&attribute.type_name, &attribute.simple_type) {
            (Some(name), st) => clr_type_of(name, st.as_ref(), set),
            (None, Some(st)) => st
                .base
                .as_ref()
                .map_or_else(|| "System.String".to_string(), |b| clr_type_of(b, None, set)),
            (None, None) => "System.String".to_string(),
        },
    };
    let mut column = DataColumn::with_type(attribute.name.clone(), data_type);
    column.mapping = MappingType::Attribute;
    column.allow_db_null = !attribute.required;
    column.default_value = attribute.default_value.clone();
    if let Some(max_length) = attribute.simple_type.as_ref().and_then(|st| st.max_length) {
        column.set_max_length(max_length);
    }
    finish_column(column, &attribute.unhandled_attributes)
}

fn finish_column(mut column: DataColumn, attributes: &[XmlAttribute]) -> Result<DesignColumn> {
    if let Some(seed) = number::<i64>(msdata(attributes, "AutoIncrementSeed"), "AutoIncrementSeed")? {
        column.auto_increment_seed = seed;
    }
    if let Some(step) = number::<i64>(msdata(attributes, "AutoIncrementStep"), "AutoIncrementStep")? {
        column.auto_increment_step = step;
    }
    column.read_only = flag(msdata(attributes, "ReadOnly"));
    column.caption = msdata(attributes, "Caption").map(str::to_string);
    if let Some(expression) = msdata(attributes, "Expression") {
        column.expression = expression.to_string();
    }

    let mut design = DesignColumn::from_data_column(Some(column))?;
    if flag(msdata(attributes, "AutoIncrement")) {
        design.set_auto_increment(true);
    }
    design.set_null_value(msprop(attributes, "nullValue"));
    design.hints.user_column_name = msprop(attributes, "Generator_UserColumnName");
    design.hints.column_prop_name_in_table = msprop(attributes, "Generator_ColumnPropNameInTable");
    design.hints.column_var_name_in_table = msprop(attributes, "Generator_ColumnVarNameInTable");
    design.hints.column_prop_name_in_row = msprop(attributes, "Generator_ColumnPropNameInRow");
    Ok(design)
}

fn simple_type_named(name: &QualifiedName, set: &SchemaSet) -> Option<SimpleType> {
    set.schemas_for_namespace(&name.namespace)
        .into_iter()
        .find_map(|s| s.simple_type(&name.name))
        .cloned()
}

/// Maps a built-in XML Schema type (or a simple type derived from one) to its CLR type.
pub(crate) fn clr_type_of(name: &QualifiedName, simple: Option<&SimpleType>, set: &SchemaSet) -> String {
    if name.namespace != XSD_NAMESPACE {
        let derived = simple.cloned().or_else(|| simple_type_named(name, set));
        return match derived.and_then(|st| st.base) {
            Some(base) if base != *name => clr_type_of(&base, None, set),
            _ => "System.String".to_string(),
        };
    }
    match name.name.as_str() {
        "boolean" => "System.Boolean",
        "byte" => "System.SByte",
        "unsignedByte" => "System.Byte",
        "short" => "System.Int16",
        "unsignedShort" => "System.UInt16",
        "int" => "System.Int32",
        "unsignedInt" => "System.UInt32",
        "long" | "integer" => "System.Int64",
        "unsignedLong" => "System.UInt64",
        "decimal" => "System.Decimal",
        "double" => "System.Double",
        "float" => "System.Single",
        "dateTime" | "date" | "time" => "System.DateTime",
        "duration" => "System.TimeSpan",
        "base64Binary" | "hexBinary" => "System.Byte[]",
        "anyURI" => "System.Uri",
        "QName" => "System.Xml.XmlQualifiedName",
        "anyType" => "System.Object",
        _ => "System.String",
    }
    .to_string()
}

/// Last step of a selector or field path, without namespace prefix or attribute marker.
fn xpath_name(path: &str) -> &str {
    let last = path.rsplit('/').next().unwrap_or(path);
    let last = last.rsplit(':').next().unwrap_or(last);
    last.trim_start_matches('@').trim()
}

fn load_constraints(ds: &mut DesignDataSource, constraints: &[IdentityConstraint]) -> Result<()> {
    for constraint in constraints
        .iter()
        .filter(|c| c.kind != IdentityConstraintKind::KeyRef)
    {
        let table_name = xpath_name(&constraint.selector).to_string();
        let name = msdata(&constraint.unhandled_attributes, "ConstraintName")
            .unwrap_or(&constraint.name)
            .to_string();
        let table = ds
            .table_mut(&table_name)
            .ok_or_else(|| Error::NotFound(format!("table '{}'", table_name)))?;
        table.add_constraint(Constraint::Unique(UniqueConstraint {
            name,
            columns: constraint.fields.iter().map(|f| xpath_name(f).to_string()).collect(),
            is_primary_key: constraint.kind == IdentityConstraintKind::Key
                || flag(msdata(&constraint.unhandled_attributes, "PrimaryKey")),
        }))?;
    }

    for keyref in constraints
        .iter()
        .filter(|c| c.kind == IdentityConstraintKind::KeyRef)
    {
        let refer = keyref
            .refer
            .as_ref()
            .ok_or_else(|| malformed_error!("keyref '{}' has no refer", keyref.name))?;
        let key = constraints
            .iter()
            .find(|c| c.kind != IdentityConstraintKind::KeyRef && c.name == refer.name)
            .ok_or_else(|| Error::NotFound(format!("key '{}'", refer.name)))?;

        let attributes = &keyref.unhandled_attributes;
        let parent_table = xpath_name(&key.selector).to_string();
        let child_table = xpath_name(&keyref.selector).to_string();
        let parent_columns: Vec<String> =
            key.fields.iter().map(|f| xpath_name(f).to_string()).collect();
        let child_columns: Vec<String> =
            keyref.fields.iter().map(|f| xpath_name(f).to_string()).collect();
        let constraint_only = flag(msdata(attributes, "ConstraintOnly"));
        let rule = |name: &str| -> Result<Rule> {
            match msdata(attributes, name) {
                Some(value) => value
                    .parse()
                    .map_err(|_| malformed_error!("Invalid {} '{}'", name, value)),
                None => Ok(Rule::Cascade),
            }
        };

        let child = ds
            .table_mut(&child_table)
            .ok_or_else(|| Error::NotFound(format!("table '{}'", child_table)))?;
        child.add_constraint(Constraint::ForeignKey(ForeignKeyConstraint {
            name: msdata(attributes, "ConstraintName")
                .unwrap_or(&keyref.name)
                .to_string(),
            columns: child_columns.clone(),
            related_table: parent_table.clone(),
            related_columns: parent_columns.clone(),
            update_rule: rule("UpdateRule")?,
            delete_rule: rule("DeleteRule")?,
        }))?;

        let mut relation = DesignRelation {
            name: msdata(attributes, "RelationName")
                .unwrap_or(&keyref.name)
                .to_string(),
            parent_table,
            child_table,
            parent_columns,
            child_columns,
            is_nested: flag(msdata(attributes, "IsNested")),
            kind: if constraint_only {
                RelationKind::ForeignKeyConstraint
            } else {
                RelationKind::Both
            },
            ..DesignRelation::default()
        };
        relation.hints.parent_prop_name = msprop(attributes, "Generator_ParentPropName");
        relation.hints.child_prop_name = msprop(attributes, "Generator_ChildPropName");
        relation.hints.relation_var_name = msprop(attributes, "Generator_RelationVarName");
        ds.add_relation(relation)?;
    }
    Ok(())
}

fn load_relationship(ds: &mut DesignDataSource, node: &XmlElement) -> Result<()> {
    if !node.is(MSDATA_NAMESPACE, "Relationship") {
        return Ok(());
    }
    let attr = |name: &str| {
        node.attribute(MSDATA_NAMESPACE, name)
            .or_else(|| node.attribute("", name))
            .unwrap_or("")
    };
    let split = |value: &str| -> Vec<String> {
        value
            .split_whitespace()
            .map(|s| xpath_name(s).to_string())
            .collect()
    };
    let mut relation = DesignRelation {
        name: attr("name").to_string(),
        parent_table: attr("parent").to_string(),
        child_table: attr("child").to_string(),
        parent_columns: split(attr("parentkey")),
        child_columns: split(attr("childkey")),
        is_nested: flag(node.attribute(MSDATA_NAMESPACE, "IsNested")),
        kind: RelationKind::Relation,
        ..DesignRelation::default()
    };
    relation.hints.parent_prop_name = node
        .attribute(MSPROP_NAMESPACE, "Generator_ParentPropName")
        .map(str::to_string);
    relation.hints.child_prop_name = node
        .attribute(MSPROP_NAMESPACE, "Generator_ChildPropName")
        .map(str::to_string);
    relation.hints.relation_var_name = node
        .attribute(MSPROP_NAMESPACE, "Generator_RelationVarName")
        .map(str::to_string);
    ds.add_relation(relation)
}

fn ds_child<'a>(node: &'a XmlElement, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
    node.children_named(MSDATASOURCE_NAMESPACE, name)
}

fn load_data_source_annotation(ds: &mut DesignDataSource, node: &XmlElement) -> Result<()> {
    ds.default_connection_index =
        number::<usize>(node.attribute("", "DefaultConnectionIndex"), "DefaultConnectionIndex")?;
    ds.functions_component_name = node.attribute("", "FunctionsComponentName").map(str::to_string);
    ds.hints.functions_component_class_name = node
        .attribute("", "GeneratorFunctionsComponentClassName")
        .map(str::to_string);

    for connections in ds_child(node, "Connections") {
        for connection in ds_child(connections, "Connection") {
            ds.connections.push(load_connection(connection));
        }
    }

    for tables in ds_child(node, "Tables") {
        for adapter in ds_child(tables, "TableAdapter") {
            let table_name = adapter
                .attribute("", "Name")
                .ok_or_else(|| malformed_error!("TableAdapter without a Name"))?;
            let table = ds
                .table_mut(table_name)
                .ok_or_else(|| Error::NotFound(format!("table '{}'", table_name)))?;
            load_table_adapter(table, adapter)?;
        }
    }

    for sources in ds_child(node, "Sources") {
        for source in ds_child(sources, "DbSource") {
            ds.sources.push(load_db_source(source)?);
        }
    }
    Ok(())
}

fn load_connection(node: &XmlElement) -> DesignConnection {
    let attr = |name: &str| node.attribute("", name).map(str::to_string);
    let property_reference = attr("PropertyReference").and_then(|text| {
        match PropertyReferenceSerializer::deserialize(&text) {
            Ok(expression) => Some(expression),
            Err(err) => {
                log::warn!("ignoring unreadable connection property reference: {}", err);
                None
            }
        }
    });
    DesignConnection {
        name: attr("Name").unwrap_or_default(),
        connection_string: attr("ConnectionStringObject").unwrap_or_default(),
        provider: attr("Provider").unwrap_or_default(),
        app_settings_object_name: attr("AppSettingsObjectName"),
        app_settings_property_name: attr("AppSettingsPropertyName"),
        is_app_settings_property: flag(node.attribute("", "IsAppSettingsProperty")),
        property_reference,
    }
}

fn load_table_adapter(table: &mut DesignTable, node: &XmlElement) -> Result<()> {
    table.data_accessor_name = node
        .attribute("", "GeneratorDataComponentClassName")
        .or_else(|| node.attribute("", "DataAccessorName"))
        .map(str::to_string);
    table.base_class = node.attribute("", "BaseClass").map(str::to_string);

    if let Some(main) = node
        .child(MSDATASOURCE_NAMESPACE, "MainSource")
        .and_then(|m| m.child(MSDATASOURCE_NAMESPACE, "DbSource"))
    {
        table.main_source = Some(load_db_source(main)?);
    }
    for sources in ds_child(node, "Sources") {
        for source in ds_child(sources, "DbSource") {
            table.sources.push(load_db_source(source)?);
        }
    }
    for mappings in ds_child(node, "Mappings") {
        for mapping in ds_child(mappings, "Mapping") {
            table.add_mapping(
                mapping.attribute("", "SourceColumn").unwrap_or(""),
                mapping.attribute("", "DataSetColumn").unwrap_or(""),
            );
        }
    }
    Ok(())
}

fn load_db_source(node: &XmlElement) -> Result<DbSource> {
    let attr = |name: &str| {
        node.attribute("", name)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let query_type = match attr("QueryType") {
        Some(value) => value
            .parse::<QueryType>()
            .map_err(|_| malformed_error!("Invalid QueryType '{}'", value))?,
        None => QueryType::Rowset,
    };
    let generate_methods = match attr("GenerateMethods") {
        Some(value) => value
            .parse::<GenerateMethodTypes>()
            .map_err(|_| malformed_error!("Invalid GenerateMethods '{}'", value))?,
        None => GenerateMethodTypes::Both,
    };

    let name = attr("Name")
        .or_else(|| attr("FillMethodName"))
        .or_else(|| attr("UserSourceName"))
        .unwrap_or_else(|| "Fill".to_string());

    let command = |element: &str| -> Result<Option<DbCommand>> {
        node.child(MSDATASOURCE_NAMESPACE, element)
            .and_then(|c| c.child(MSDATASOURCE_NAMESPACE, "DbCommand"))
            .map(load_db_command)
            .transpose()
    };

    Ok(DbSource {
        name,
        user_source_name: attr("UserSourceName"),
        query_type,
        connection_ref: attr("ConnectionRef"),
        get_method_name: attr("GetMethodName"),
        generate_methods,
        generate_paging_methods: flag(node.attribute("", "GeneratePagingMethods")),
        generate_short_commands: flag(node.attribute("", "GenerateShortCommands")),
        modifier: attr("Modifier").or_else(|| attr("FillMethodModifier")),
        generator_source_name: attr("GeneratorSourceName"),
        generator_get_method_name: attr("GeneratorGetMethodName"),
        generator_source_name_for_paging: attr("GeneratorSourceNameForPaging"),
        generator_get_method_name_for_paging: attr("GeneratorGetMethodNameForPaging"),
        select_command: command("SelectCommand")?,
        insert_command: command("InsertCommand")?,
        update_command: command("UpdateCommand")?,
        delete_command: command("DeleteCommand")?,
    })
}

fn load_db_command(node: &XmlElement) -> Result<DbCommand> {
    let command_type = match node.attribute("", "CommandType") {
        Some(value) => value
            .parse::<CommandType>()
            .map_err(|_| malformed_error!("Invalid CommandType '{}'", value))?,
        None => CommandType::Text,
    };
    let mut command = DbCommand {
        command_type,
        command_text: node
            .child(MSDATASOURCE_NAMESPACE, "CommandText")
            .map(|t| t.text.trim().to_string())
            .unwrap_or_default(),
        modified_by_user: flag(node.attribute("", "ModifiedByUser")),
        parameters: Vec::new(),
    };
    for parameters in ds_child(node, "Parameters") {
        for parameter in ds_child(parameters, "Parameter") {
            command.parameters.push(load_parameter(parameter)?);
        }
    }
    Ok(command)
}

fn load_parameter(node: &XmlElement) -> Result<DesignParameter> {
    let attr = |name: &str| node.attribute("", name).filter(|v| !v.is_empty());
    let db_type = match attr("DbType") {
        Some(value) => value
            .parse::<DbType>()
            .map_err(|_| malformed_error!("Invalid DbType '{}'", value))?,
        None => DbType::Object,
    };
    let direction = match attr("Direction") {
        Some(value) => value
            .parse::<DesignParameterDirection>()
            .map_err(|_| malformed_error!("Invalid Direction '{}'", value))?,
        None => DesignParameterDirection::Input,
    };
    Ok(DesignParameter {
        parameter_name: attr("ParameterName").unwrap_or("").to_string(),
        db_type,
        provider_type: attr("ProviderType").map(str::to_string),
        direction,
        allow_db_null: flag(attr("AllowDbNull")),
        size: number::<i32>(attr("Size"), "Size")?.unwrap_or(0),
        source_column: attr("SourceColumn").map(str::to_string),
        source_version: attr("SourceVersion").map(str::to_string),
        auto_generated_name: flag(attr("AutogeneratedName")),
        source_column_null_mapping: flag(attr("SourceColumnNullMapping")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::shop_schema;

    #[test]
    fn xpath_names() {
        assert_eq!(xpath_name(".//mstns:Customers"), "Customers");
        assert_eq!(xpath_name("mstns:CustomerID"), "CustomerID");
        assert_eq!(xpath_name("@Key"), "Key");
        assert_eq!(xpath_name("Plain"), "Plain");
    }

    #[test]
    fn builtin_type_mapping() {
        let set = SchemaSet::new();
        let q = |n: &str| QualifiedName::new(XSD_NAMESPACE, n);
        assert_eq!(clr_type_of(&q("int"), None, &set), "System.Int32");
        assert_eq!(clr_type_of(&q("unsignedByte"), None, &set), "System.Byte");
        assert_eq!(clr_type_of(&q("base64Binary"), None, &set), "System.Byte[]");
        assert_eq!(clr_type_of(&q("whatever"), None, &set), "System.String");
        assert_eq!(
            clr_type_of(&QualifiedName::new("urn:x", "Custom"), None, &set),
            "System.String"
        );
    }

    #[test]
    fn loads_columns_constraints_and_adapters() {
        let text = shop_schema();
        let ds = DesignDataSource::from_schema(&text).unwrap();
        assert_eq!(ds.name, "Shop");
        assert_eq!(ds.class_name(), "ShopDataSet");
        assert_eq!(ds.namespace, "urn:shop");

        let items = ds.table("Items").unwrap();
        assert_eq!(items.row_class_name(), "ItemRow");
        let id = items.column("Id").unwrap();
        assert!(id.auto_increment());
        assert_eq!(id.data_type(), "System.Int32");
        assert_eq!(id.data_column().auto_increment_seed, -1);
        assert!(id.data_column().read_only);
        assert!(!id.allow_db_null());
        let title = items.column("Title").unwrap();
        assert_eq!(title.max_length(), 40);
        assert_eq!(title.null_value(), "_empty");
        assert!(title.allow_db_null());
        let code = items.column("Code").unwrap();
        assert_eq!(code.data_column().mapping, MappingType::Attribute);
        assert!(!code.allow_db_null());

        assert!(items.is_key_column("Id"));
        assert_eq!(items.column_source("Title"), "Title");
        assert_eq!(items.adapter_class_name(), "ItemsTableAdapter");

        let main = items.main_source.as_ref().unwrap();
        assert_eq!(main.name, "Fill");
        assert_eq!(main.get_method_name.as_deref(), Some("GetData"));
        assert!(main.is_rowset_select());
        let count = &items.sources[0];
        assert_eq!(count.query_type, QueryType::Scalar);
        let parameter = &count.select_command.as_ref().unwrap().parameters[0];
        assert_eq!(parameter.db_type, DbType::String);
        assert_eq!(parameter.size, 40);

        assert_eq!(ds.provider_name(Some("Items")).as_deref(), Some("System.Data.SqlClient"));
    }
}
