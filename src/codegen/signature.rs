//! Single-method generation for one data-access source.
//!
//! [`MethodSignatureGenerator`] answers "what would the accessor for this source look like":
//! either as a method declaration, or as the one line of source text the emitter produces for
//! it. Designers use the text form to show signatures without generating a whole adapter.

use std::str::FromStr;

use crate::{
    codedom::{CodeEmitter, CodeMemberMethod, CodeTypeDeclaration, CodeTypeMember, CodeTypeReference},
    codegen::query::{
        method_name, ContainerType, FunctionGenerator, MethodSettings, ParameterGenerationOption,
        QueryGenerator, QueryHandler,
    },
    design::{DbSource, DesignTable},
    Error, Result,
};

const WRAPPER_NAME: &str = "Wrapper";

/// Generates the accessor method of one [`DbSource`].
///
/// # Examples
///
/// ```rust
/// use dsgen::codegen::{ContainerType, MethodSignatureGenerator};
/// use dsgen::codedom::CSharpEmitter;
/// use dsgen::design::{DbCommand, DbSource};
///
/// let emitter = CSharpEmitter::new();
/// let source = DbSource::new("Fill").with_select(DbCommand::text("SELECT * FROM Customers"));
/// let signature = MethodSignatureGenerator::new()
///     .emitter(&emitter)
///     .source(&source)
///     .container_type(ContainerType::DataTable)
///     .data_set_class_name("NorthwindDataSet")
///     .table_class_name("CustomersDataTable")
///     .generate_method_signature()?;
/// assert_eq!(
///     signature.as_deref(),
///     Some("int Fill(NorthwindDataSet.CustomersDataTable dataTable)")
/// );
/// # Ok::<(), dsgen::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct MethodSignatureGenerator<'a> {
    emitter: Option<&'a dyn CodeEmitter>,
    source: Option<&'a DbSource>,
    design_table: Option<&'a DesignTable>,
    container_type: ContainerType,
    get_method: bool,
    paging: bool,
    parameter_option: ParameterGenerationOption,
    data_set_class_name: Option<String>,
    table_class_name: Option<String>,
}

impl<'a> MethodSignatureGenerator<'a> {
    /// Creates a generator with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the code-emission target.
    #[must_use]
    pub fn emitter(mut self, emitter: &'a dyn CodeEmitter) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Sets the source to generate for.
    #[must_use]
    pub fn source(mut self, source: &'a DbSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the table whose updating methods [`generate_updating_methods`](Self::generate_updating_methods) builds.
    #[must_use]
    pub fn design_table(mut self, table: &'a DesignTable) -> Self {
        self.design_table = Some(table);
        self
    }

    /// Sets what the Fill container parameter holds.
    #[must_use]
    pub fn container_type(mut self, container_type: ContainerType) -> Self {
        self.container_type = container_type;
        self
    }

    /// Sets the container kind from its type name, `DataSet` or `DataTable`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSupported`] for any other name.
    pub fn container_type_named(mut self, name: &str) -> Result<Self> {
        self.container_type = ContainerType::from_str(name)
            .map_err(|_| Error::NotSupported(format!("container type '{}'", name)))?;
        Ok(self)
    }

    /// Generates the Get variant instead of Fill.
    #[must_use]
    pub fn get_method(mut self, value: bool) -> Self {
        self.get_method = value;
        self
    }

    /// Generates the paging variant.
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

    /// Sets the typed dataset class name.
    #[must_use]
    pub fn data_set_class_name(mut self, name: impl Into<String>) -> Self {
        self.data_set_class_name = Some(name.into());
        self
    }

    /// Sets the typed table class name.
    #[must_use]
    pub fn table_class_name(mut self, name: impl Into<String>) -> Self {
        self.table_class_name = Some(name.into());
        self
    }

    fn data_set_class(&self) -> Result<&str> {
        self.data_set_class_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::Internal("dataset class name is not set".to_string()))
    }

    /// Name of the container parameter.
    #[must_use]
    pub fn container_parameter_name(&self) -> &'static str {
        self.container_type.parameter_name()
    }

    /// Type name of the container parameter: the dataset class, or `<DataSet>.<Table>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] when a required class name is missing or empty.
    pub fn container_parameter_type_name(&self) -> Result<String> {
        let data_set = self.data_set_class()?;
        match self.container_type {
            ContainerType::DataSet => Ok(data_set.to_string()),
            ContainerType::DataTable => {
                let table = self
                    .table_class_name
                    .as_deref()
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| Error::Internal("table class name is not set".to_string()))?;
                Ok(format!("{}.{}", data_set, table))
            }
        }
    }

    /// Name the generated method gets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArgumentMissing`] when no source is set.
    pub fn method_name(&self) -> Result<String> {
        let source = self.source.ok_or(Error::ArgumentMissing("source"))?;
        Ok(method_name(source, self.get_method, self.paging))
    }

    fn required(&self) -> Result<(&'a dyn CodeEmitter, &'a DbSource)> {
        let emitter = self.emitter.ok_or(Error::ArgumentMissing("emitter"))?;
        let source = self.source.ok_or(Error::ArgumentMissing("source"))?;
        Ok((emitter, source))
    }

    /// Builds the method declaration, without a body.
    ///
    /// Rowset selects go through the query generator with the container parameter, anything
    /// else through the function generator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArgumentMissing`] when the emitter or the source is not set, and
    /// [`Error::Internal`] when a rowset method lacks its container class names.
    pub fn generate_method(&self) -> Result<CodeMemberMethod> {
        let (emitter, source) = self.required()?;
        let settings = MethodSettings::new(emitter, source)
            .method_name(method_name(source, self.get_method, self.paging))
            .signature_only(true)
            .get_method(self.get_method)
            .paging(self.paging)
            .parameter_option(self.parameter_option);

        if source.is_rowset_select() {
            let container = CodeTypeReference::new(self.container_parameter_type_name()?);
            QueryGenerator::new(settings, container.clone())
                .container(self.container_type, self.container_parameter_name(), container)
                .generate()
        } else {
            FunctionGenerator::new(settings).generate()
        }
    }

    /// Renders the method as one line of source text, trimmed and without the trailing `;`.
    ///
    /// Returns `None` if the rendered wrapper contains no line naming the method.
    ///
    /// # Errors
    ///
    /// Same as [`generate_method`](Self::generate_method), plus emitter failures.
    pub fn generate_method_signature(&self) -> Result<Option<String>> {
        let (emitter, _) = self.required()?;
        let method = self.generate_method()?;
        let name = method.name.clone();

        let mut wrapper = CodeTypeDeclaration::interface(WRAPPER_NAME);
        wrapper.add(CodeTypeMember::Method(method));
        let text = emitter.emit_type(&wrapper)?;

        Ok(text.lines().find(|line| line.contains(&name)).map(|line| {
            let line = line.trim();
            line.strip_suffix(';').unwrap_or(line).to_string()
        }))
    }

    /// Builds a wrapper type holding the updating methods of the design table, without bodies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] when the design table or the dataset class name is not set,
    /// and [`Error::ArgumentMissing`] when the emitter is not set.
    pub fn generate_updating_methods(&self) -> Result<CodeTypeDeclaration> {
        let table = self
            .design_table
            .ok_or_else(|| Error::Internal("design table is not set".to_string()))?;
        let data_set = self.data_set_class()?;
        let emitter = self.emitter.ok_or(Error::ArgumentMissing("emitter"))?;

        let mut wrapper = CodeTypeDeclaration::class(WRAPPER_NAME);
        let table_class = self
            .table_class_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| table.table_class_name());
        QueryHandler::new(
            emitter,
            table,
            CodeTypeReference::new(data_set),
            CodeTypeReference::new(format!("{}.{}", data_set, table_class)),
        )
        .signature_only(true)
        .parameter_option(self.parameter_option)
        .add_to(&mut wrapper);
        Ok(wrapper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codedom::CSharpEmitter,
        design::{DbCommand, DesignParameter, DbType, QueryType},
    };

    fn customers_source() -> DbSource {
        DbSource::new("FillByCity")
            .with_select(
                DbCommand::text("SELECT * FROM Customers WHERE City = @City")
                    .with_parameter(DesignParameter::new("@City", DbType::String)),
            )
            .with_get_method_name("GetDataByCity")
    }

    fn generator<'a>(emitter: &'a CSharpEmitter, source: &'a DbSource) -> MethodSignatureGenerator<'a> {
        MethodSignatureGenerator::new()
            .emitter(emitter)
            .source(source)
            .data_set_class_name("NorthwindDataSet")
            .table_class_name("CustomersDataTable")
    }

    #[test]
    fn fill_signature_is_one_trimmed_line() {
        let emitter = CSharpEmitter::new();
        let source = customers_source();
        let signature = generator(&emitter, &source).generate_method_signature().unwrap();
        assert_eq!(
            signature.as_deref(),
            Some("int FillByCity(NorthwindDataSet.CustomersDataTable dataTable, string City)")
        );
    }

    #[test]
    fn get_paging_signature_uses_derived_name() {
        let emitter = CSharpEmitter::new();
        let source = customers_source();
        let signature = generator(&emitter, &source)
            .get_method(true)
            .paging(true)
            .generate_method_signature()
            .unwrap()
            .unwrap();
        assert!(signature.starts_with("NorthwindDataSet.CustomersDataTable GetDataByCityPage("));
        assert!(signature.ends_with("int startRecord, int maxRecords)"));
    }

    #[test]
    fn dataset_container_uses_dataset_class() {
        let emitter = CSharpEmitter::new();
        let source = customers_source();
        let generator = generator(&emitter, &source).container_type(ContainerType::DataSet);
        assert_eq!(generator.container_parameter_name(), "dataSet");
        assert_eq!(generator.container_parameter_type_name().unwrap(), "NorthwindDataSet");
        assert!(generator.clone().container_type_named("DataView").is_err());
        assert_eq!(
            generator
                .container_type_named("DataTable")
                .unwrap()
                .container_parameter_type_name()
                .unwrap(),
            "NorthwindDataSet.CustomersDataTable"
        );
    }

    #[test]
    fn functions_use_function_generator() {
        let emitter = CSharpEmitter::new();
        let source = DbSource::new("CountCustomers")
            .with_select(DbCommand::text("SELECT COUNT(*) FROM Customers"))
            .with_query_type(QueryType::Scalar);
        let method = MethodSignatureGenerator::new()
            .emitter(&emitter)
            .source(&source)
            .generate_method()
            .unwrap();
        assert_eq!(method.name, "CountCustomers");
        assert!(method.body.is_none());
        assert_eq!(emitter.type_name(&method.return_type), "object");
    }

    #[test]
    fn missing_pieces_are_argument_errors() {
        let emitter = CSharpEmitter::new();
        let source = customers_source();
        assert!(matches!(
            MethodSignatureGenerator::new().source(&source).generate_method(),
            Err(Error::ArgumentMissing("emitter"))
        ));
        assert!(matches!(
            MethodSignatureGenerator::new().emitter(&emitter).generate_method_signature(),
            Err(Error::ArgumentMissing("source"))
        ));
        let no_table = MethodSignatureGenerator::new()
            .emitter(&emitter)
            .source(&source)
            .data_set_class_name("NorthwindDataSet")
            .table_class_name("");
        assert!(matches!(no_table.generate_method(), Err(Error::Internal(_))));
    }

    #[test]
    fn updating_methods_need_table_and_dataset_name() {
        let emitter = CSharpEmitter::new();
        let mut table = DesignTable::new("Customers");
        let mut main = DbSource::new("Fill").with_select(DbCommand::text("SELECT * FROM Customers"));
        main.generate_short_commands = true;
        main.delete_command = Some(DbCommand::text("DELETE FROM Customers WHERE CustomerID = @ID"));
        table.main_source = Some(main);

        assert!(matches!(
            MethodSignatureGenerator::new()
                .emitter(&emitter)
                .data_set_class_name("NorthwindDataSet")
                .generate_updating_methods(),
            Err(Error::Internal(_))
        ));
        assert!(matches!(
            MethodSignatureGenerator::new()
                .emitter(&emitter)
                .design_table(&table)
                .generate_updating_methods(),
            Err(Error::Internal(_))
        ));

        let wrapper = MethodSignatureGenerator::new()
            .emitter(&emitter)
            .design_table(&table)
            .data_set_class_name("NorthwindDataSet")
            .generate_updating_methods()
            .unwrap();
        let names: Vec<&str> = wrapper.methods().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Update", "Update", "Update", "Update", "Delete"]);
        assert!(wrapper.methods().all(|m| m.body.is_none()));
    }
}
