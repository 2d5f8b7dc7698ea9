//! Schema importer bridge for typed datasets.
//!
//! A web-service or serialization importer that meets a schema type it cannot map on its own
//! hands it to [`TypedDataSetSchemaImporterExtension`]. The extension recognizes three shapes
//! and turns each into a generated typed dataset:
//!
//! - the type of an element flagged `msdata:IsDataSet`: the dataset itself;
//! - a diffgram wrapper (schema wildcard + diffgram wildcard) whose fixed `namespace`
//!   attribute points at a dataset schema, optionally naming one generated table type;
//! - a single-wildcard wrapper whose wildcard names exactly one dataset namespace.
//!
//! Anything else is not importable and yields `Ok(None)`; only a failing generation is an
//! error. Generated types are cached per extension, so importing the same dataset type twice
//! generates code once.
//!
//! # Key Components
//!
//! - [`TypedDataSetSchemaImporterExtension`] - the importer with its type cache
//! - [`ImportTarget`] - where generated code goes
//! - [`WrapperShape`] - shape recognition
//! - [`is_data_set`], [`find_data_set_element`] - dataset element lookup
//!
//! # Examples
//!
//! ```rust
//! use dsgen::codedom::{CodeCompileUnit, CodeNamespace, CSharpEmitter};
//! use dsgen::importer::{ImportTarget, TypedDataSetSchemaImporterExtension};
//! use dsgen::schema::SchemaSet;
//!
//! let mut schemas = SchemaSet::new();
//! schemas.parse_and_add(r#"<xs:schema targetNamespace="urn:ds" xmlns="urn:ds"
//!         xmlns:xs="http://www.w3.org/2001/XMLSchema"
//!         xmlns:msdata="urn:schemas-microsoft-com:xml-msdata">
//!   <xs:element name="Shop" msdata:IsDataSet="true">
//!     <xs:complexType><xs:choice maxOccurs="unbounded">
//!       <xs:element name="Items"><xs:complexType><xs:sequence>
//!         <xs:element name="Title" type="xs:string" minOccurs="0"/>
//!       </xs:sequence></xs:complexType></xs:element>
//!     </xs:choice></xs:complexType>
//!   </xs:element>
//! </xs:schema>"#)?;
//!
//! let mut unit = CodeCompileUnit::default();
//! let mut namespace = CodeNamespace::new("Client");
//! let emitter = CSharpEmitter::new();
//! let mut target = ImportTarget::new(&mut unit, &mut namespace, &emitter);
//!
//! let mut importer = TypedDataSetSchemaImporterExtension::new();
//! let name = importer.import_namespace("urn:ds", &schemas, &mut target)?;
//! assert_eq!(name.as_deref(), Some("Shop"));
//! # Ok::<(), dsgen::Error>(())
//! ```

mod shape;

use std::collections::HashMap;

pub use shape::{is_data_set, WrapperShape};

use crate::{
    codedom::{CodeCompileUnit, CodeEmitter, CodeNamespace},
    codegen::TypedDataSetGenerator,
    design::DesignDataSource,
    schema::{ComplexType, Schema, SchemaElement, SchemaSet, TypeKey},
    Error, Result,
};

/// Returns the dataset-flagged global element of `schema`, as the set knows it.
///
/// The element is looked up again by qualified name in `set`, so that schemas sharing a
/// dataset across documents resolve to one canonical declaration.
#[must_use]
pub fn find_data_set_element<'a>(schema: &'a Schema, set: &'a SchemaSet) -> Option<&'a SchemaElement> {
    let element = schema.elements().find(|e| is_data_set(e))?;
    Some(set.global_element(&element.qualified_name).unwrap_or(element))
}

/// Destination of imported code.
pub struct ImportTarget<'a> {
    /// Unit receiving table-adapter namespaces and assembly references
    pub unit: &'a mut CodeCompileUnit,
    /// Namespace receiving the dataset classes
    pub namespace: &'a mut CodeNamespace,
    /// Emitter used for identifier checks
    pub emitter: &'a dyn CodeEmitter,
}

impl<'a> ImportTarget<'a> {
    /// Bundles the destination of imported code.
    pub fn new(
        unit: &'a mut CodeCompileUnit,
        namespace: &'a mut CodeNamespace,
        emitter: &'a dyn CodeEmitter,
    ) -> Self {
        Self {
            unit,
            namespace,
            emitter,
        }
    }
}

/// Imports dataset schema types as generated typed datasets.
///
/// Not meant for concurrent use: the type cache lives in the instance.
pub struct TypedDataSetSchemaImporterExtension {
    generator: TypedDataSetGenerator,
    imported: HashMap<TypeKey, String>,
}

impl TypedDataSetSchemaImporterExtension {
    /// Creates an importer that generates with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_generator(TypedDataSetGenerator::new())
    }

    /// Creates an importer that generates with `generator`.
    #[must_use]
    pub fn with_generator(generator: TypedDataSetGenerator) -> Self {
        Self {
            generator,
            imported: HashMap::new(),
        }
    }

    /// Number of dataset types generated so far.
    #[must_use]
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    /// Imports the global complex type `name` of `namespace`.
    ///
    /// Returns `Ok(None)` unless exactly one schema of `schemas` has that target namespace and
    /// declares the type, or when the type is not importable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaConversion`] or [`Error::CodeGeneration`] when an importable
    /// dataset fails to generate.
    pub fn import_schema_type_by_name(
        &mut self,
        name: &str,
        namespace: &str,
        context: Option<&SchemaElement>,
        schemas: &SchemaSet,
        target: &mut ImportTarget<'_>,
    ) -> Result<Option<String>> {
        let Some(schema) = schemas.unique_schema_for_namespace(namespace) else {
            log::debug!("no unique schema for namespace '{}'", namespace);
            return Ok(None);
        };
        let Some(ty) = schema.complex_type(name) else {
            return Ok(None);
        };
        self.import_schema_type(ty, context, schemas, target)
    }

    /// Imports `ty`, declared by the `context` element if there is one.
    ///
    /// Returns the generated type name, or `Ok(None)` when the type is not importable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaConversion`] or [`Error::CodeGeneration`] when an importable
    /// dataset fails to generate.
    pub fn import_schema_type(
        &mut self,
        ty: &ComplexType,
        context: Option<&SchemaElement>,
        schemas: &SchemaSet,
        target: &mut ImportTarget<'_>,
    ) -> Result<Option<String>> {
        match (WrapperShape::classify(ty, context), context) {
            (WrapperShape::DataSetRoot, Some(element)) => {
                self.import_data_set(ty, element, schemas, target)
            }
            (WrapperShape::Diffgram { namespace, table_type_name }, _) => {
                log::debug!("diffgram wrapper '{}' for namespace '{}'", ty.key.0, namespace);
                let name = self.import_namespace(&namespace, schemas, target)?;
                Ok(name.map(|dataset| match table_type_name {
                    Some(table) => format!("{}.{}", dataset, table),
                    None => dataset,
                }))
            }
            (WrapperShape::SingleWildcard { namespace }, _) => {
                log::debug!("wildcard wrapper '{}' for namespace '{}'", ty.key.0, namespace);
                self.import_namespace(&namespace, schemas, target)
            }
            _ => Ok(None),
        }
    }

    /// Imports the dataset declared by the only schema of `namespace`.
    ///
    /// # Errors
    ///
    /// See [`TypedDataSetSchemaImporterExtension::import_schema_type`].
    pub fn import_namespace(
        &mut self,
        namespace: &str,
        schemas: &SchemaSet,
        target: &mut ImportTarget<'_>,
    ) -> Result<Option<String>> {
        let Some(schema) = schemas.unique_schema_for_namespace(namespace) else {
            log::debug!("no unique schema for namespace '{}'", namespace);
            return Ok(None);
        };
        let Some(element) = find_data_set_element(schema, schemas) else {
            log::debug!("schema for '{}' declares no dataset", namespace);
            return Ok(None);
        };
        let Some(ty) = schemas.element_complex_type(element) else {
            return Ok(None);
        };
        self.import_schema_type(ty, Some(element), schemas, target)
    }

    fn import_data_set(
        &mut self,
        ty: &ComplexType,
        element: &SchemaElement,
        schemas: &SchemaSet,
        target: &mut ImportTarget<'_>,
    ) -> Result<Option<String>> {
        if let Some(name) = self.imported.get(&ty.key) {
            log::debug!("dataset type '{}' already imported as '{}'", ty.key.0, name);
            target.namespace.add_import("System.Data");
            target.unit.add_reference("System.Data.dll");
            return Ok(Some(name.clone()));
        }

        let Some(schema) = schemas.schema_of_element(&element.qualified_name) else {
            return Ok(None);
        };
        let ds = DesignDataSource::from_schema_in_set(schema, schemas)
            .map_err(|e| Error::schema_conversion(&e))?;
        let result =
            self.generator
                .generate_data_source(ds, target.unit, target.namespace, target.emitter)?;

        log::debug!("imported dataset type '{}' as '{}'", ty.key.0, result.dataset_name);
        self.imported.insert(ty.key.clone(), result.dataset_name.clone());
        Ok(Some(result.dataset_name))
    }
}

impl Default for TypedDataSetSchemaImporterExtension {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codedom::CSharpEmitter,
        test::{northwind_schema, service_schema},
        xml::QualifiedName,
    };

    fn schemas() -> SchemaSet {
        let mut set = SchemaSet::new();
        set.parse_and_add(&northwind_schema()).unwrap();
        set.parse_and_add(&service_schema()).unwrap();
        set
    }

    fn import(
        importer: &mut TypedDataSetSchemaImporterExtension,
        set: &SchemaSet,
        type_name: &str,
        namespace: &mut CodeNamespace,
    ) -> Option<String> {
        let mut unit = CodeCompileUnit::default();
        let emitter = CSharpEmitter::new();
        let mut target = ImportTarget::new(&mut unit, namespace, &emitter);
        importer
            .import_schema_type_by_name(type_name, "urn:service", None, set, &mut target)
            .unwrap()
    }

    #[test]
    fn finds_canonical_dataset_element() {
        let set = schemas();
        let schema = set.unique_schema_for_namespace("urn:northwind").unwrap();
        let element = find_data_set_element(schema, &set).unwrap();
        assert_eq!(element.name, "Northwind");
        assert!(is_data_set(element));

        let service = set.unique_schema_for_namespace("urn:service").unwrap();
        assert!(find_data_set_element(service, &set).is_none());
    }

    #[test]
    fn diffgram_wrapper_names_table_type() {
        let set = schemas();
        let mut importer = TypedDataSetSchemaImporterExtension::new();
        let mut namespace = CodeNamespace::new("Client");
        assert_eq!(
            import(&mut importer, &set, "CustomersChanges", &mut namespace).as_deref(),
            Some("NorthwindDataSet.CustomersDataTable")
        );
        assert_eq!(
            import(&mut importer, &set, "AllChanges", &mut namespace).as_deref(),
            Some("NorthwindDataSet")
        );
        assert_eq!(namespace.types.len(), 1);
        assert_eq!(importer.imported_count(), 1);
    }

    #[test]
    fn wildcard_wrapper_imports_dataset_once() {
        let set = schemas();
        let mut importer = TypedDataSetSchemaImporterExtension::new();
        let mut namespace = CodeNamespace::new("Client");
        assert_eq!(
            import(&mut importer, &set, "NorthwindPayload", &mut namespace).as_deref(),
            Some("NorthwindDataSet")
        );

        let mut unit = CodeCompileUnit::default();
        let emitter = CSharpEmitter::new();
        let mut target = ImportTarget::new(&mut unit, &mut namespace, &emitter);
        let element = set
            .global_element(&QualifiedName::new("urn:northwind", "Northwind"))
            .unwrap();
        let ty = set.element_complex_type(element).unwrap();
        let again = importer
            .import_schema_type(ty, Some(element), &set, &mut target)
            .unwrap();
        assert_eq!(again.as_deref(), Some("NorthwindDataSet"));
        assert_eq!(unit.referenced_assemblies, vec!["System.Data.dll".to_string()]);
        assert_eq!(namespace.types.len(), 1);
    }

    #[test]
    fn unrecognized_and_ambiguous_are_not_importable() {
        let set = schemas();
        let mut importer = TypedDataSetSchemaImporterExtension::new();
        let mut namespace = CodeNamespace::new("Client");
        assert!(import(&mut importer, &set, "Address", &mut namespace).is_none());
        assert!(import(&mut importer, &set, "Missing", &mut namespace).is_none());
        assert!(import(&mut importer, &set, "ElsewherePayload", &mut namespace).is_none());

        let mut twice = schemas();
        twice.parse_and_add(&service_schema()).unwrap();
        assert!(import(&mut importer, &twice, "NorthwindPayload", &mut namespace).is_none());
        assert!(namespace.types.is_empty());
    }
}
