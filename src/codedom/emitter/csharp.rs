//! C# rendering of the code document.

use crate::{
    codedom::{
        emitter::CodeEmitter, BinaryOperator, CodeAttributeDeclaration, CodeCompileUnit,
        CodeConstructor, CodeExpression, CodeMemberEvent, CodeMemberField, CodeMemberMethod,
        CodeMemberProperty, CodeNamespace, CodeParameter, CodeStatement, CodeTypeDeclaration,
        CodeTypeMember, CodeTypeReference, ExpressionKind, MemberAttributes, ParameterDirection,
        PrimitiveValue, TypeKind, TypeReferenceOptions,
    },
    Result,
};

const INDENT: &str = "    ";

const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

const ALIASES: &[(&str, &str)] = &[
    ("System.Int16", "short"),
    ("System.Int32", "int"),
    ("System.Int64", "long"),
    ("System.UInt16", "ushort"),
    ("System.UInt32", "uint"),
    ("System.UInt64", "ulong"),
    ("System.String", "string"),
    ("System.Object", "object"),
    ("System.Boolean", "bool"),
    ("System.Void", "void"),
    ("System.Char", "char"),
    ("System.Byte", "byte"),
    ("System.SByte", "sbyte"),
    ("System.Single", "float"),
    ("System.Double", "double"),
    ("System.Decimal", "decimal"),
];

/// Emits C# source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpEmitter;

impl CSharpEmitter {
    /// Creates a new C# emitter.
    #[must_use]
    pub fn new() -> Self {
        CSharpEmitter
    }
}

struct Writer {
    out: String,
    depth: usize,
}

impl Writer {
    fn new() -> Self {
        Writer {
            out: String::new(),
            depth: 0,
        }
    }

    /// Writes `text` at the current depth. Every line of a multi-line expression is indented.
    fn line(&mut self, text: &str) {
        for part in text.split('\n') {
            if !part.is_empty() {
                for _ in 0..self.depth {
                    self.out.push_str(INDENT);
                }
                self.out.push_str(part);
            }
            self.out.push('\n');
        }
    }

    fn open(&mut self, text: &str) {
        self.line(&format!("{} {{", text));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }
}

impl CodeEmitter for CSharpEmitter {
    fn language(&self) -> &'static str {
        "CSharp"
    }

    fn file_extension(&self) -> &'static str {
        "cs"
    }

    fn is_valid_identifier(&self, value: &str) -> bool {
        let mut chars = value.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        (first.is_alphabetic() || first == '_')
            && chars.all(|c| c.is_alphanumeric() || c == '_')
            && !KEYWORDS.contains(&value)
    }

    fn create_escaped_identifier(&self, value: &str) -> String {
        if KEYWORDS.contains(&value) {
            format!("@{}", value)
        } else {
            value.to_string()
        }
    }

    fn type_name(&self, reference: &CodeTypeReference) -> String {
        if let Some(element) = &reference.array_element_type {
            let rank = ",".repeat(reference.array_rank.saturating_sub(1) as usize);
            return format!("{}[{}]", self.type_name(element), rank);
        }

        if let Some((_, alias)) = ALIASES.iter().find(|(full, _)| *full == reference.base_type) {
            if reference.type_arguments.is_empty() {
                return (*alias).to_string();
            }
        }

        let mut name = String::new();
        if reference.options.contains(TypeReferenceOptions::GLOBAL_REFERENCE)
            && !reference.options.contains(TypeReferenceOptions::GENERIC_TYPE_PARAMETER)
        {
            name.push_str("global::");
        }
        name.push_str(&reference.base_type.replace('+', "."));
        if !reference.type_arguments.is_empty() {
            let arguments: Vec<String> = reference
                .type_arguments
                .iter()
                .map(|a| self.type_name(a))
                .collect();
            name.push('<');
            name.push_str(&arguments.join(", "));
            name.push('>');
        }
        name
    }

    fn emit_type(&self, declaration: &CodeTypeDeclaration) -> Result<String> {
        let mut writer = Writer::new();
        self.write_type(&mut writer, declaration);
        Ok(writer.out)
    }

    fn emit_namespace(&self, namespace: &CodeNamespace) -> Result<String> {
        let mut writer = Writer::new();
        for comment in &namespace.comments {
            writer.line(&format!("// {}", comment));
        }
        let named = !namespace.name.is_empty();
        if named {
            writer.open(&format!("namespace {}", namespace.name));
        }
        for import in &namespace.imports {
            writer.line(&format!("using {};", import));
        }
        for declaration in &namespace.types {
            writer.line("");
            writer.line("");
            self.write_type(&mut writer, declaration);
        }
        if named {
            writer.close();
        }
        Ok(writer.out)
    }

    fn emit_compile_unit(&self, unit: &CodeCompileUnit) -> Result<String> {
        let mut out = String::new();
        out.push_str("//------------------------------------------------------------------------------\n");
        out.push_str("// <auto-generated>\n");
        out.push_str("//     This code was generated by a tool.\n");
        out.push_str("//\n");
        out.push_str("//     Changes to this file may cause incorrect behavior and will be lost if\n");
        out.push_str("//     the code is regenerated.\n");
        out.push_str("// </auto-generated>\n");
        out.push_str("//------------------------------------------------------------------------------\n");
        out.push('\n');
        out.push_str("#pragma warning disable 1591\n");
        out.push('\n');
        for namespace in &unit.namespaces {
            out.push_str(&self.emit_namespace(namespace)?);
        }
        out.push('\n');
        out.push_str("#pragma warning restore 1591\n");
        Ok(out)
    }
}

impl CSharpEmitter {
    fn write_type(&self, w: &mut Writer, declaration: &CodeTypeDeclaration) {
        for comment in &declaration.comments {
            w.line(&format!("///{}", comment));
        }
        for attribute in &declaration.custom_attributes {
            w.line(&self.attribute(attribute));
        }

        let mut header = String::new();
        header.push_str(type_access(declaration.attributes));
        if declaration.kind == TypeKind::Class {
            if declaration.attributes.contains(MemberAttributes::ABSTRACT) {
                header.push_str("abstract ");
            } else if declaration.attributes.contains(MemberAttributes::FINAL) {
                header.push_str("sealed ");
            }
        }
        if declaration.is_partial {
            header.push_str("partial ");
        }
        header.push_str(match declaration.kind {
            TypeKind::Class => "class ",
            TypeKind::Struct => "struct ",
            TypeKind::Interface => "interface ",
            TypeKind::Enum => "enum ",
        });
        header.push_str(&self.create_escaped_identifier(&declaration.name));
        if !declaration.base_types.is_empty() {
            let bases: Vec<String> = declaration
                .base_types
                .iter()
                .map(|b| self.type_name(b))
                .collect();
            header.push_str(" : ");
            header.push_str(&bases.join(", "));
        }

        w.open(&header);
        let interface = declaration.kind == TypeKind::Interface;
        for member in &declaration.members {
            w.line("");
            match member {
                CodeTypeMember::Field(field) => self.write_field(w, field),
                CodeTypeMember::Property(property) => self.write_property(w, property, interface),
                CodeTypeMember::Method(method) => self.write_method(w, method, interface),
                CodeTypeMember::Constructor(ctor) => {
                    self.write_constructor(w, &declaration.name, ctor)
                }
                CodeTypeMember::Event(event) => self.write_event(w, event),
                CodeTypeMember::NestedType(nested) => self.write_type(w, nested),
            }
        }
        w.close();
    }

    fn attribute(&self, attribute: &CodeAttributeDeclaration) -> String {
        let arguments: Vec<String> = attribute
            .arguments
            .iter()
            .map(|(name, value)| match name {
                Some(name) => format!("{}={}", name, self.expression(value)),
                None => self.expression(value),
            })
            .collect();
        format!(
            "[{}({})]",
            self.type_name(&attribute.attribute_type),
            arguments.join(", ")
        )
    }

    fn write_field(&self, w: &mut Writer, field: &CodeMemberField) {
        let mut text = String::from(member_access(field.attributes));
        if field.attributes.contains(MemberAttributes::CONST) {
            text.push_str("const ");
        } else if field.attributes.contains(MemberAttributes::STATIC) {
            text.push_str("static ");
        }
        text.push_str(&self.type_name(&field.field_type));
        text.push(' ');
        text.push_str(&self.create_escaped_identifier(&field.name));
        if let Some(init) = &field.init {
            text.push_str(" = ");
            text.push_str(&self.expression(init));
        }
        text.push(';');
        w.line(&text);
    }

    fn write_property(&self, w: &mut Writer, property: &CodeMemberProperty, interface: bool) {
        for attribute in &property.custom_attributes {
            w.line(&self.attribute(attribute));
        }
        let mut header = String::new();
        if !interface {
            header.push_str(member_access(property.attributes));
            header.push_str(member_scope(property.attributes));
        }
        header.push_str(&self.type_name(&property.property_type));
        header.push(' ');
        if property.parameters.is_empty() {
            header.push_str(&self.create_escaped_identifier(&property.name));
        } else {
            header.push_str(&format!("this[{}]", self.parameters(&property.parameters)));
        }

        w.open(&header);
        let abstract_body = interface || property.attributes.contains(MemberAttributes::ABSTRACT);
        for (keyword, body) in [("get", &property.getter), ("set", &property.setter)] {
            if let Some(statements) = body {
                if abstract_body {
                    w.line(&format!("{};", keyword));
                } else {
                    w.open(keyword);
                    self.write_statements(w, statements);
                    w.close();
                }
            }
        }
        w.close();
    }

    fn write_method(&self, w: &mut Writer, method: &CodeMemberMethod, interface: bool) {
        for comment in &method.comments {
            w.line(&format!("///{}", comment));
        }
        for attribute in &method.custom_attributes {
            w.line(&self.attribute(attribute));
        }
        let mut header = String::new();
        if !interface {
            header.push_str(member_access(method.attributes));
            header.push_str(member_scope(method.attributes));
        }
        header.push_str(&self.type_name(&method.return_type));
        header.push(' ');
        header.push_str(&self.create_escaped_identifier(&method.name));
        header.push('(');
        header.push_str(&self.parameters(&method.parameters));
        header.push(')');

        match &method.body {
            Some(statements)
                if !interface && !method.attributes.contains(MemberAttributes::ABSTRACT) =>
            {
                w.open(&header);
                self.write_statements(w, statements);
                w.close();
            }
            _ => w.line(&format!("{};", header)),
        }
    }

    fn write_constructor(&self, w: &mut Writer, type_name: &str, ctor: &CodeConstructor) {
        let mut header = String::from(member_access(ctor.attributes));
        if ctor.attributes.contains(MemberAttributes::STATIC) {
            header.push_str("static ");
        }
        header.push_str(&self.create_escaped_identifier(type_name));
        header.push('(');
        header.push_str(&self.parameters(&ctor.parameters));
        header.push(')');
        if !ctor.base_arguments.is_empty() {
            header.push_str(" : base(");
            header.push_str(&self.arguments(&ctor.base_arguments));
            header.push(')');
        }
        w.open(&header);
        self.write_statements(w, &ctor.statements);
        w.close();
    }

    fn write_event(&self, w: &mut Writer, event: &CodeMemberEvent) {
        w.line(&format!(
            "{}event {} {};",
            member_access(event.attributes),
            self.type_name(&event.event_type),
            self.create_escaped_identifier(&event.name)
        ));
    }

    fn parameters(&self, parameters: &[CodeParameter]) -> String {
        parameters
            .iter()
            .map(|p| {
                let direction = match p.direction {
                    ParameterDirection::In => "",
                    ParameterDirection::Out => "out ",
                    ParameterDirection::Ref => "ref ",
                };
                format!(
                    "{}{} {}",
                    direction,
                    self.type_name(&p.param_type),
                    self.create_escaped_identifier(&p.name)
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn arguments(&self, arguments: &[CodeExpression]) -> String {
        arguments
            .iter()
            .map(|a| self.expression(a))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn write_statements(&self, w: &mut Writer, statements: &[CodeStatement]) {
        for statement in statements {
            self.write_statement(w, statement);
        }
    }

    fn write_statement(&self, w: &mut Writer, statement: &CodeStatement) {
        match statement {
            CodeStatement::Expression(expr) => w.line(&format!("{};", self.expression(expr))),
            CodeStatement::Assign { left, right } => w.line(&format!(
                "{} = {};",
                self.expression(left),
                self.expression(right)
            )),
            CodeStatement::VariableDeclaration {
                var_type,
                name,
                init,
            } => match init {
                Some(init) => w.line(&format!(
                    "{} {} = {};",
                    self.type_name(var_type),
                    self.create_escaped_identifier(name),
                    self.expression(init)
                )),
                None => w.line(&format!(
                    "{} {};",
                    self.type_name(var_type),
                    self.create_escaped_identifier(name)
                )),
            },
            CodeStatement::Return(Some(expr)) => {
                w.line(&format!("return {};", self.expression(expr)))
            }
            CodeStatement::Return(None) => w.line("return;"),
            CodeStatement::Throw(expr) => w.line(&format!("throw {};", self.expression(expr))),
            CodeStatement::If {
                condition,
                true_statements,
                false_statements,
            } => {
                w.open(&format!("if ({})", self.expression(condition)));
                self.write_statements(w, true_statements);
                w.close();
                if !false_statements.is_empty() {
                    w.open("else");
                    self.write_statements(w, false_statements);
                    w.close();
                }
            }
            CodeStatement::TryCatchFinally {
                try_statements,
                catch_clauses,
                finally_statements,
            } => {
                w.open("try");
                self.write_statements(w, try_statements);
                w.close();
                for clause in catch_clauses {
                    let header = match &clause.variable {
                        Some(var) => format!(
                            "catch ({} {})",
                            self.type_name(&clause.exception_type),
                            var
                        ),
                        None => format!("catch ({})", self.type_name(&clause.exception_type)),
                    };
                    w.open(&header);
                    self.write_statements(w, &clause.statements);
                    w.close();
                }
                if !finally_statements.is_empty() {
                    w.open("finally");
                    self.write_statements(w, finally_statements);
                    w.close();
                }
            }
            CodeStatement::Comment(text) => w.line(&format!("// {}", text)),
        }
    }

    fn target(&self, target: &Option<Box<CodeExpression>>, member: &str) -> String {
        let member = self.create_escaped_identifier(member);
        match target {
            Some(target) => format!("{}.{}", self.expression(target), member),
            None => member,
        }
    }

    /// Renders one expression.
    #[must_use]
    pub fn expression(&self, expr: &CodeExpression) -> String {
        match &expr.kind {
            ExpressionKind::Primitive(value) => primitive(value),
            ExpressionKind::This => "this".to_string(),
            ExpressionKind::Base => "base".to_string(),
            ExpressionKind::Variable(name) | ExpressionKind::Argument(name) => {
                self.create_escaped_identifier(name)
            }
            ExpressionKind::TypeReference(reference) => self.type_name(reference),
            ExpressionKind::TypeOf(reference) => format!("typeof({})", self.type_name(reference)),
            ExpressionKind::FieldReference { target, field_name } => {
                self.target(target, field_name)
            }
            ExpressionKind::PropertyReference {
                target,
                property_name,
            } => self.target(target, property_name),
            ExpressionKind::EventReference { target, event_name } => {
                self.target(target, event_name)
            }
            ExpressionKind::Indexer { target, indices } => {
                format!("{}[{}]", self.expression(target), self.arguments(indices))
            }
            ExpressionKind::MethodInvoke {
                target,
                method_name,
                arguments,
            } => format!(
                "{}({})",
                self.target(target, method_name),
                self.arguments(arguments)
            ),
            ExpressionKind::ObjectCreate {
                create_type,
                arguments,
            } => format!(
                "new {}({})",
                self.type_name(create_type),
                self.arguments(arguments)
            ),
            ExpressionKind::ArrayCreate {
                element_type,
                initializers,
                size,
            } => match size {
                Some(size) if initializers.is_empty() => format!(
                    "new {}[{}]",
                    self.type_name(element_type),
                    self.expression(size)
                ),
                _ => format!(
                    "new {}[] {{\n{}}}",
                    self.type_name(element_type),
                    initializers
                        .iter()
                        .map(|i| {
                            let nested = self
                                .expression(i)
                                .replace('\n', &format!("\n{}", INDENT));
                            format!("{}{},\n", INDENT, nested)
                        })
                        .collect::<String>()
                ),
            },
            ExpressionKind::Cast {
                target_type,
                expression,
            } => format!(
                "(({})({}))",
                self.type_name(target_type),
                self.expression(expression)
            ),
            ExpressionKind::Binary {
                left,
                operator,
                right,
            } => format!(
                "({} {} {})",
                self.expression(left),
                operator_text(*operator),
                self.expression(right)
            ),
            ExpressionKind::Snippet(text) => text.clone(),
        }
    }
}

fn type_access(attributes: MemberAttributes) -> &'static str {
    if attributes.contains(MemberAttributes::PUBLIC) {
        "public "
    } else if attributes.contains(MemberAttributes::ASSEMBLY) {
        "internal "
    } else {
        ""
    }
}

fn member_access(attributes: MemberAttributes) -> &'static str {
    if attributes.contains(MemberAttributes::PUBLIC) {
        "public "
    } else if attributes.contains(MemberAttributes::FAMILY | MemberAttributes::ASSEMBLY) {
        "protected internal "
    } else if attributes.contains(MemberAttributes::FAMILY) {
        "protected "
    } else if attributes.contains(MemberAttributes::ASSEMBLY) {
        "internal "
    } else {
        "private "
    }
}

fn member_scope(attributes: MemberAttributes) -> &'static str {
    let new = attributes.contains(MemberAttributes::NEW);
    if attributes.contains(MemberAttributes::ABSTRACT) {
        "abstract "
    } else if attributes.contains(MemberAttributes::STATIC) {
        "static "
    } else if attributes.contains(MemberAttributes::OVERRIDE) {
        "override "
    } else if attributes.contains(MemberAttributes::FINAL)
        || attributes.contains(MemberAttributes::PRIVATE)
        || !(attributes.intersects(
            MemberAttributes::PUBLIC | MemberAttributes::FAMILY | MemberAttributes::ASSEMBLY,
        ))
    {
        if new {
            "new "
        } else {
            ""
        }
    } else if new {
        "new virtual "
    } else {
        "virtual "
    }
}

fn operator_text(operator: BinaryOperator) -> &'static str {
    match operator {
        BinaryOperator::Add => "+",
        BinaryOperator::Subtract => "-",
        BinaryOperator::ValueEquality | BinaryOperator::IdentityEquality => "==",
        BinaryOperator::IdentityInequality => "!=",
        BinaryOperator::BooleanAnd => "&&",
        BinaryOperator::BooleanOr => "||",
        BinaryOperator::LessThan => "<",
        BinaryOperator::GreaterThan => ">",
        BinaryOperator::GreaterThanOrEqual => ">=",
        BinaryOperator::BitwiseOr => "|",
    }
}

fn primitive(value: &PrimitiveValue) -> String {
    match value {
        PrimitiveValue::Null => "null".to_string(),
        PrimitiveValue::Bool(b) => b.to_string(),
        PrimitiveValue::Int(i) => i.to_string(),
        PrimitiveValue::Double(d) => format!("{:?}D", d),
        PrimitiveValue::Char(c) => format!("'{}'", escape(&c.to_string())),
        PrimitiveValue::String(s) => format!("\"{}\"", escape(s)),
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codedom::CodeTypeReference;

    fn fill_method() -> CodeMemberMethod {
        let mut method = CodeMemberMethod::new("Fill");
        method.return_type = CodeTypeReference::new("System.Int32");
        method.parameters.push(CodeParameter::new(
            CodeTypeReference::new("NorthwindDataSet.CustomersDataTable"),
            "dataTable",
        ));
        method.push(CodeStatement::ret(CodeExpression::int(0)));
        method
    }

    #[test]
    fn renders_public_methods_as_virtual() {
        let mut class = CodeTypeDeclaration::class("Adapter");
        class.add(CodeTypeMember::Method(fill_method()));
        let text = CSharpEmitter::new().emit_type(&class).unwrap();
        assert!(text.contains(
            "public virtual int Fill(NorthwindDataSet.CustomersDataTable dataTable) {"
        ));
        assert!(text.contains("return 0;"));
    }

    #[test]
    fn renders_interface_members_without_modifiers() {
        let mut wrapper = CodeTypeDeclaration::interface("Wrapper");
        wrapper.add(CodeTypeMember::Method(fill_method()));
        let text = CSharpEmitter::new().emit_type(&wrapper).unwrap();
        assert!(text.contains("    int Fill(NorthwindDataSet.CustomersDataTable dataTable);\n"));
    }

    #[test]
    fn wrapped_initializers_follow_statement_depth() {
        let mut method = CodeMemberMethod::new("Columns");
        method.push(CodeStatement::Expression(CodeExpression::this().invoke(
            "SetKey",
            vec![CodeExpression::new_array(
                CodeTypeReference::new("System.String"),
                vec![CodeExpression::string("Id"), CodeExpression::string("Name")],
            )],
        )));
        let mut class = CodeTypeDeclaration::class("Table");
        class.add(CodeTypeMember::Method(method));
        let text = CSharpEmitter::new().emit_type(&class).unwrap();
        assert!(text.contains(
            "        this.SetKey(new string[] {\n            \"Id\",\n            \"Name\",\n        });\n"
        ));
    }

    #[test]
    fn type_names_use_aliases_and_global_prefix() {
        let emitter = CSharpEmitter::new();
        assert_eq!(emitter.type_name(&CodeTypeReference::global("System.String")), "string");
        assert_eq!(
            emitter.type_name(&CodeTypeReference::global("System.Data.DataSet")),
            "global::System.Data.DataSet"
        );
        assert_eq!(
            emitter.type_name(&CodeTypeReference::nullable(CodeTypeReference::new("System.Int32"))),
            "global::System.Nullable<int>"
        );
        assert_eq!(
            emitter.type_name(&CodeTypeReference::array_of(CodeTypeReference::new("System.Byte"))),
            "byte[]"
        );
    }

    #[test]
    fn escapes_keywords_and_strings() {
        let emitter = CSharpEmitter::new();
        assert_eq!(emitter.create_escaped_identifier("class"), "@class");
        assert!(!emitter.is_valid_identifier("class"));
        assert!(!emitter.is_valid_identifier("1abc"));
        assert!(emitter.is_valid_identifier("_abc1"));
        assert_eq!(
            emitter.expression(&CodeExpression::string("a\"b")),
            "\"a\\\"b\""
        );
    }
}
