//! The generator front end.
//!
//! [`TypedDataSetGenerator`] turns dataset schema text into code: it loads the design model,
//! builds the dataset class into the caller's namespace and the table adapters into their own
//! namespace of the compile unit, and reports which assemblies the generated code references.
//! The reference list is returned per call in a [`GenerationResult`] and also registered on the
//! compile unit.

use bitflags::bitflags;

use crate::{
    assembly::{AssemblyIdentity, AssemblyResolver, AssemblyVersion, KnownAssemblies},
    codedom::{CodeCompileUnit, CodeEmitter, CodeNamespace, CodeTypeDeclaration},
    codegen::{naming::escape, provider::ProviderRegistry, TableAdapterBuilder, TypedDataSetBuilder},
    design::DesignDataSource,
    Error, Result,
};

/// Dataset name used when the schema does not name one.
pub const DEFAULT_DATASET_NAME: &str = "NewDataSet";

const V4: AssemblyVersion = AssemblyVersion::new(4, 0, 0, 0);

const IMPORTS: [&str; 3] = ["System", "System.Data", "System.Xml"];

bitflags! {
    /// Optional features of the generated code. `GenerateOption::empty()` is plain generation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GenerateOption: u32 {
        /// Generate a `TableAdapterManager` that updates related tables in order
        const HIERARCHICAL_UPDATE = 0x1;
        /// Derive typed tables from `TypedTableBase<T>` and reference the LINQ extension assembly
        const LINQ_OVER_TYPED_DATASETS = 0x2;
    }
}

/// What one generation produced besides the code itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Class name of the generated dataset
    pub dataset_name: String,
    /// Assemblies the generated code needs, fixed ones first
    pub referenced_assemblies: Vec<AssemblyIdentity>,
    /// The LINQ extension assembly, when requested and resolved
    pub extension_assembly: Option<AssemblyIdentity>,
}

/// Front end of typed dataset generation.
///
/// # Examples
///
/// ```rust
/// use dsgen::{Error, codegen::TypedDataSetGenerator};
/// use dsgen::codedom::{CodeCompileUnit, CodeNamespace, CSharpEmitter};
///
/// let mut unit = CodeCompileUnit::default();
/// let mut namespace = CodeNamespace::new("Demo");
/// let result = TypedDataSetGenerator::new().generate("", &mut unit, &mut namespace, &CSharpEmitter::new());
/// assert!(matches!(result, Err(Error::ArgumentEmpty("input_file_content"))));
/// ```
pub struct TypedDataSetGenerator {
    options: GenerateOption,
    dataset_namespace: Option<String>,
    resolver: Box<dyn AssemblyResolver>,
    providers: ProviderRegistry,
}

impl TypedDataSetGenerator {
    /// Creates a generator with no options, the framework resolver and the built-in providers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: GenerateOption::empty(),
            dataset_namespace: None,
            resolver: Box::new(KnownAssemblies::new()),
            providers: ProviderRegistry::new(),
        }
    }

    /// Sets the generation options.
    #[must_use]
    pub fn options(mut self, options: GenerateOption) -> Self {
        self.options = options;
        self
    }

    /// Sets the XML namespace of datasets whose schema declares none.
    #[must_use]
    pub fn dataset_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.dataset_namespace = Some(namespace.into());
        self
    }

    /// Sets the resolver used for the optional LINQ extension assembly.
    #[must_use]
    pub fn assembly_resolver(mut self, resolver: Box<dyn AssemblyResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Sets the data providers adapters are generated for.
    #[must_use]
    pub fn provider_registry(mut self, providers: ProviderRegistry) -> Self {
        self.providers = providers;
        self
    }

    /// The configured options.
    #[must_use]
    pub fn generate_options(&self) -> GenerateOption {
        self.options
    }

    /// Provider name of the default connection, or of `table`'s connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaConversion`] when the schema cannot be loaded.
    pub fn get_provider_name(&self, schema: &str, table: Option<&str>) -> Result<Option<String>> {
        let ds = DesignDataSource::from_schema(schema).map_err(|e| Error::schema_conversion(&e))?;
        Ok(ds.provider_name(table))
    }

    /// Generates code for the dataset described by `schema`.
    ///
    /// The dataset class is added to `namespace`, the table-adapter namespace (if any) and the
    /// assembly references to `unit`. Nothing is added when generation fails.
    ///
    /// # Errors
    ///
    /// - [`Error::ArgumentEmpty`] for empty schema text, before any parsing
    /// - [`Error::SchemaConversion`] when the schema cannot be loaded
    /// - [`Error::CodeGeneration`] when code generation fails
    pub fn generate(
        &self,
        schema: &str,
        unit: &mut CodeCompileUnit,
        namespace: &mut CodeNamespace,
        emitter: &dyn CodeEmitter,
    ) -> Result<GenerationResult> {
        if schema.trim().is_empty() {
            return Err(Error::ArgumentEmpty("input_file_content"));
        }
        let ds = DesignDataSource::from_schema(schema).map_err(|e| Error::schema_conversion(&e))?;
        self.generate_data_source(ds, unit, namespace, emitter)
    }

    /// Generates code for an already loaded data source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CodeGeneration`] when code generation fails.
    pub fn generate_data_source(
        &self,
        mut ds: DesignDataSource,
        unit: &mut CodeCompileUnit,
        namespace: &mut CodeNamespace,
        emitter: &dyn CodeEmitter,
    ) -> Result<GenerationResult> {
        if ds.name.is_empty() {
            ds.name = DEFAULT_DATASET_NAME.to_string();
        }
        if ds.namespace.is_empty() {
            if let Some(xml_namespace) = &self.dataset_namespace {
                ds.namespace = xml_namespace.clone();
            }
        }
        log::debug!(
            "generating dataset '{}' into '{}' with {:?}",
            ds.name,
            namespace.name,
            self.options
        );

        let (class, adapters) = self
            .build(&ds, &namespace.name, emitter)
            .map_err(|e| Error::code_generation(&e))?;

        namespace.types.push(class);
        for import in IMPORTS {
            namespace.add_import(import);
        }
        if let Some(adapters) = adapters {
            unit.namespaces.push(adapters);
        }

        let (referenced_assemblies, extension_assembly) = self.referenced_assemblies(&ds);
        for assembly in &referenced_assemblies {
            unit.add_reference(assembly.file_name());
        }
        log::debug!(
            "dataset '{}' references {} assemblies",
            ds.name,
            referenced_assemblies.len()
        );

        Ok(GenerationResult {
            dataset_name: escape(emitter, &ds.class_name()),
            referenced_assemblies,
            extension_assembly,
        })
    }

    fn build(
        &self,
        ds: &DesignDataSource,
        namespace: &str,
        emitter: &dyn CodeEmitter,
    ) -> Result<(CodeTypeDeclaration, Option<CodeNamespace>)> {
        let class = TypedDataSetBuilder::new(emitter, ds, self.options).build()?;
        let adapters =
            TableAdapterBuilder::new(emitter, ds, &self.providers, self.options, namespace).build()?;
        Ok((class, adapters))
    }

    /// Fixed assemblies, then provider assemblies, then the LINQ extension assembly.
    fn referenced_assemblies(
        &self,
        ds: &DesignDataSource,
    ) -> (Vec<AssemblyIdentity>, Option<AssemblyIdentity>) {
        let mut assemblies = vec![
            AssemblyIdentity::framework("System", V4),
            AssemblyIdentity::framework("System.Data", V4),
            AssemblyIdentity::framework("System.Xml", V4),
        ];
        for assembly in self.providers.assemblies_for(&ds.used_providers()) {
            if !assemblies.contains(&assembly) {
                assemblies.push(assembly);
            }
        }

        let mut extension = None;
        if self.options.contains(GenerateOption::LINQ_OVER_TYPED_DATASETS) {
            let wanted = AssemblyIdentity::framework(
                "System.Data.DataSetExtensions",
                AssemblyVersion::new(3, 5, 0, 0),
            );
            match self.resolver.resolve(&wanted) {
                Some(found) => {
                    assemblies.push(found.clone());
                    extension = Some(found);
                }
                None => log::warn!("cannot resolve {}, reference left out", wanted.display_name()),
            }
        }
        (assemblies, extension)
    }
}

impl Default for TypedDataSetGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codedom::CSharpEmitter, test::shop_schema};

    #[test]
    fn empty_schema_is_rejected_before_parsing() {
        let mut unit = CodeCompileUnit::default();
        let mut namespace = CodeNamespace::new("Demo");
        let result = TypedDataSetGenerator::new().generate(
            "  ",
            &mut unit,
            &mut namespace,
            &CSharpEmitter::new(),
        );
        assert!(matches!(result, Err(Error::ArgumentEmpty("input_file_content"))));
        assert!(namespace.types.is_empty());
    }

    #[test]
    fn broken_schema_is_a_conversion_error() {
        let mut unit = CodeCompileUnit::default();
        let mut namespace = CodeNamespace::new("Demo");
        let result = TypedDataSetGenerator::new().generate(
            "<xs:schema",
            &mut unit,
            &mut namespace,
            &CSharpEmitter::new(),
        );
        assert!(matches!(result, Err(Error::SchemaConversion(_))));
        assert!(unit.namespaces.is_empty());
    }

    #[test]
    fn references_fixed_and_provider_assemblies() {
        let mut unit = CodeCompileUnit::default();
        let mut namespace = CodeNamespace::new("Demo");
        let result = TypedDataSetGenerator::new()
            .generate(&shop_schema(), &mut unit, &mut namespace, &CSharpEmitter::new())
            .unwrap();
        assert_eq!(result.dataset_name, "ShopDataSet");
        let names: Vec<&str> = result
            .referenced_assemblies
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["System", "System.Data", "System.Xml"]);
        assert!(result.extension_assembly.is_none());
        assert_eq!(unit.referenced_assemblies.len(), 3);
        assert_eq!(unit.namespaces.len(), 1);
        assert!(namespace.imports.iter().any(|i| i == "System.Data"));
    }

    #[test]
    fn linq_adds_extension_assembly_when_resolvable() {
        let mut unit = CodeCompileUnit::default();
        let mut namespace = CodeNamespace::new("Demo");
        let result = TypedDataSetGenerator::new()
            .options(GenerateOption::LINQ_OVER_TYPED_DATASETS)
            .generate(&shop_schema(), &mut unit, &mut namespace, &CSharpEmitter::new())
            .unwrap();
        let extension = result.extension_assembly.unwrap();
        assert_eq!(extension.name, "System.Data.DataSetExtensions");
        assert_eq!(extension.version, AssemblyVersion::new(3, 5, 0, 0));
        assert_eq!(result.referenced_assemblies.last(), Some(&extension));

        let mut unit = CodeCompileUnit::default();
        let mut namespace = CodeNamespace::new("Demo");
        let result = TypedDataSetGenerator::new()
            .options(GenerateOption::LINQ_OVER_TYPED_DATASETS)
            .assembly_resolver(Box::new(KnownAssemblies::empty()))
            .generate(&shop_schema(), &mut unit, &mut namespace, &CSharpEmitter::new())
            .unwrap();
        assert!(result.extension_assembly.is_none());
        assert_eq!(result.referenced_assemblies.len(), 3);
    }

    #[test]
    fn unnamed_dataset_gets_default_name() {
        let mut unit = CodeCompileUnit::default();
        let mut namespace = CodeNamespace::new("Demo");
        let result = TypedDataSetGenerator::new()
            .dataset_namespace("urn:demo")
            .generate_data_source(
                DesignDataSource::new(""),
                &mut unit,
                &mut namespace,
                &CSharpEmitter::new(),
            )
            .unwrap();
        assert_eq!(result.dataset_name, DEFAULT_DATASET_NAME);
        assert!(namespace.type_named(DEFAULT_DATASET_NAME).is_some());
    }

    #[test]
    fn keyword_dataset_name_matches_emitted_class() {
        let mut unit = CodeCompileUnit::default();
        let mut namespace = CodeNamespace::new("Demo");
        let result = TypedDataSetGenerator::new()
            .generate_data_source(
                DesignDataSource::new("class"),
                &mut unit,
                &mut namespace,
                &CSharpEmitter::new(),
            )
            .unwrap();
        assert_eq!(result.dataset_name, "@class");
        assert!(namespace.type_named(&result.dataset_name).is_some());
    }

    #[test]
    fn provider_name_of_table() {
        let generator = TypedDataSetGenerator::new();
        assert_eq!(
            generator.get_provider_name(&shop_schema(), Some("Items")).unwrap().as_deref(),
            Some("System.Data.SqlClient")
        );
        assert!(matches!(
            generator.get_provider_name("not xml", None),
            Err(Error::SchemaConversion(_))
        ));
    }
}
