//! XML Schema object model for typed-dataset schemas.
//!
//! This is a deliberately small model: it covers the constructs that dataset schemas,
//! diffgram wrappers and the schema importer bridge rely on (global and local elements,
//! complex types with sequence/all/choice particles, `xs:any` wildcards, attributes,
//! simple-type restrictions and identity constraints) and keeps every attribute it does
//! not understand as an "unhandled" attribute so that private-namespace markers such as
//! `msdata:IsDataSet` stay visible.
//!
//! # Key Components
//!
//! - [`SchemaSet`] - A set of schema documents with lookup by namespace and qualified name
//! - [`Schema`] - One parsed schema document, including its source text
//! - [`SchemaElement`], [`ComplexType`], [`Particle`], [`AnyWildcard`] - the object model
//!
//! # Examples
//!
//! ```rust
//! use dsgen::schema::{SchemaSet, XSD_NAMESPACE};
//!
//! let mut set = SchemaSet::new();
//! set.parse_and_add(r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:t">
//!     <xs:element name="Root" type="xs:string"/>
//! </xs:schema>"#)?;
//! let schema = set.unique_schema_for_namespace("urn:t").unwrap();
//! assert_eq!(schema.elements().count(), 1);
//! # Ok::<(), dsgen::Error>(())
//! ```

mod parser;

use crate::{
    xml::{QualifiedName, XmlAttribute, XmlElement},
    Result,
};

/// The W3C XML Schema namespace.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
/// Private namespace carrying dataset markers such as `IsDataSet`.
pub const MSDATA_NAMESPACE: &str = "urn:schemas-microsoft-com:xml-msdata";
/// Private namespace carrying generator properties (`Generator_*`, `nullValue`).
pub const MSPROP_NAMESPACE: &str = "urn:schemas-microsoft-com:xml-msprop";
/// Namespace of diffgram payloads.
pub const DIFFGRAM_NAMESPACE: &str = "urn:schemas-microsoft-com:xml-diffgram-v1";
/// Namespace of the designer data-source annotation.
pub const MSDATASOURCE_NAMESPACE: &str = "urn:schemas-microsoft-com:xml-msdatasource";

/// Stable identity of a schema type, used as a cache key by the importer bridge.
///
/// Named types are keyed by namespace and name; anonymous types by the path of the
/// element that declares them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(pub String);

/// `maxOccurs` value of a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxOccurs {
    /// A bounded count
    Bounded(u32),
    /// `maxOccurs="unbounded"`
    Unbounded,
}

impl Default for MaxOccurs {
    fn default() -> Self {
        MaxOccurs::Bounded(1)
    }
}

/// A parsed schema document.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// `targetNamespace`, empty when absent
    pub target_namespace: String,
    /// Optional `id` attribute
    pub id: Option<String>,
    /// Top-level items in document order
    pub items: Vec<SchemaItem>,
    /// `xs:appinfo` children of top-level annotations
    pub appinfo: Vec<XmlElement>,
    /// The text the schema was parsed from
    pub source: String,
}

/// A top-level schema item.
#[derive(Debug, Clone)]
pub enum SchemaItem {
    /// Global element declaration
    Element(SchemaElement),
    /// Named complex type
    ComplexType(ComplexType),
    /// Named simple type
    SimpleType(SimpleType),
    /// `xs:import`
    Import {
        /// Imported namespace
        namespace: String,
        /// Optional location hint
        schema_location: Option<String>,
    },
}

/// An element declaration, global or local.
#[derive(Debug, Clone, Default)]
pub struct SchemaElement {
    /// Local name (for `ref=` elements, the referenced name)
    pub name: String,
    /// Qualified name the element has in instance documents
    pub qualified_name: QualifiedName,
    /// `type=` reference
    pub type_name: Option<QualifiedName>,
    /// `ref=` reference
    pub ref_name: Option<QualifiedName>,
    /// Anonymous type declared inline
    pub inline_type: Option<SchemaType>,
    /// `minOccurs`
    pub min_occurs: u32,
    /// `maxOccurs`
    pub max_occurs: MaxOccurs,
    /// `default=` value
    pub default_value: Option<String>,
    /// `fixed=` value
    pub fixed_value: Option<String>,
    /// Attributes outside the schema namespace and the null namespace
    pub unhandled_attributes: Vec<XmlAttribute>,
    /// `xs:unique`, `xs:key`, `xs:keyref` children
    pub constraints: Vec<IdentityConstraint>,
    /// `xs:appinfo` children of annotations on this element
    pub appinfo: Vec<XmlElement>,
}

impl SchemaElement {
    /// Returns the value of an unhandled attribute in `namespace` named `name`.
    #[must_use]
    pub fn unhandled_attribute(&self, namespace: &str, name: &str) -> Option<&str> {
        find_attribute(&self.unhandled_attributes, namespace, name)
    }

    /// Returns the inline complex type of this element, if any.
    #[must_use]
    pub fn complex_type(&self) -> Option<&ComplexType> {
        match &self.inline_type {
            Some(SchemaType::Complex(ct)) => Some(ct),
            _ => None,
        }
    }

    /// Returns the inline simple type of this element, if any.
    #[must_use]
    pub fn simple_type(&self) -> Option<&SimpleType> {
        match &self.inline_type {
            Some(SchemaType::Simple(st)) => Some(st),
            _ => None,
        }
    }
}

/// A simple or complex type.
#[derive(Debug, Clone)]
pub enum SchemaType {
    /// Simple type
    Simple(SimpleType),
    /// Complex type
    Complex(ComplexType),
}

/// A complex type declaration.
#[derive(Debug, Clone)]
pub struct ComplexType {
    /// Identity of the type
    pub key: TypeKey,
    /// Name for global types, `None` for anonymous ones
    pub name: Option<String>,
    /// Namespace the type belongs to
    pub namespace: String,
    /// Content model
    pub particle: Option<Particle>,
    /// Attribute declarations
    pub attributes: Vec<SchemaAttribute>,
    /// `xs:simpleContent` extension base
    pub simple_content_base: Option<QualifiedName>,
    /// Attributes outside the schema namespace and the null namespace
    pub unhandled_attributes: Vec<XmlAttribute>,
}

impl ComplexType {
    /// Returns the value of an unhandled attribute in `namespace` named `name`.
    #[must_use]
    pub fn unhandled_attribute(&self, namespace: &str, name: &str) -> Option<&str> {
        find_attribute(&self.unhandled_attributes, namespace, name)
    }
}

/// A model group.
#[derive(Debug, Clone)]
pub enum Particle {
    /// `xs:sequence`
    Sequence(ParticleGroup),
    /// `xs:choice`
    Choice(ParticleGroup),
    /// `xs:all`
    All(ParticleGroup),
}

impl Particle {
    /// Returns the group, regardless of its compositor.
    #[must_use]
    pub fn group(&self) -> &ParticleGroup {
        match self {
            Particle::Sequence(g) | Particle::Choice(g) | Particle::All(g) => g,
        }
    }
}

/// The items of a model group.
#[derive(Debug, Clone, Default)]
pub struct ParticleGroup {
    /// Items in document order
    pub items: Vec<ParticleItem>,
    /// `minOccurs`
    pub min_occurs: u32,
    /// `maxOccurs`
    pub max_occurs: MaxOccurs,
}

/// One item of a model group.
#[derive(Debug, Clone)]
pub enum ParticleItem {
    /// Local element or element reference
    Element(SchemaElement),
    /// `xs:any` wildcard
    Any(AnyWildcard),
    /// Nested group
    Group(Particle),
}

/// An `xs:any` wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnyWildcard {
    /// Raw `namespace` attribute (defaults to `##any`)
    pub namespace: String,
    /// `minOccurs`
    pub min_occurs: u32,
    /// `maxOccurs`
    pub max_occurs: MaxOccurs,
    /// `processContents`
    pub process_contents: Option<String>,
}

/// A simple type restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleType {
    /// Name for global types
    pub name: Option<String>,
    /// Restriction base
    pub base: Option<QualifiedName>,
    /// `xs:maxLength` facet
    pub max_length: Option<i32>,
    /// `xs:enumeration` facets
    pub enumeration: Vec<String>,
}

/// An attribute declaration.
#[derive(Debug, Clone, Default)]
pub struct SchemaAttribute {
    /// Local name
    pub name: String,
    /// `type=` reference
    pub type_name: Option<QualifiedName>,
    /// Inline simple type
    pub simple_type: Option<SimpleType>,
    /// `fixed=` value
    pub fixed_value: Option<String>,
    /// `default=` value
    pub default_value: Option<String>,
    /// `use="required"`
    pub required: bool,
    /// Attributes outside the schema namespace and the null namespace
    pub unhandled_attributes: Vec<XmlAttribute>,
}

impl SchemaAttribute {
    /// Returns the value of an unhandled attribute in `namespace` named `name`.
    #[must_use]
    pub fn unhandled_attribute(&self, namespace: &str, name: &str) -> Option<&str> {
        find_attribute(&self.unhandled_attributes, namespace, name)
    }
}

/// Kind of identity constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityConstraintKind {
    /// `xs:unique`
    Unique,
    /// `xs:key`
    Key,
    /// `xs:keyref`
    KeyRef,
}

/// An identity constraint declared on an element.
#[derive(Debug, Clone)]
pub struct IdentityConstraint {
    /// Constraint kind
    pub kind: IdentityConstraintKind,
    /// `name`
    pub name: String,
    /// `xs:selector/@xpath`
    pub selector: String,
    /// `xs:field/@xpath` values
    pub fields: Vec<String>,
    /// `refer` for key references
    pub refer: Option<QualifiedName>,
    /// Attributes outside the schema namespace and the null namespace
    pub unhandled_attributes: Vec<XmlAttribute>,
}

impl IdentityConstraint {
    /// Returns the value of an unhandled attribute in `namespace` named `name`.
    #[must_use]
    pub fn unhandled_attribute(&self, namespace: &str, name: &str) -> Option<&str> {
        find_attribute(&self.unhandled_attributes, namespace, name)
    }
}

fn find_attribute<'a>(attributes: &'a [XmlAttribute], namespace: &str, name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|a| a.namespace == namespace && a.local_name == name)
        .map(|a| a.value.as_str())
}

impl Schema {
    /// Parses a schema document.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not well-formed XML or its root is not `xs:schema`.
    pub fn parse(text: &str) -> Result<Schema> {
        parser::parse_schema(text)
    }

    /// Iterates over the global element declarations.
    pub fn elements(&self) -> impl Iterator<Item = &SchemaElement> {
        self.items.iter().filter_map(|item| match item {
            SchemaItem::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Returns the global element named `name`.
    #[must_use]
    pub fn element(&self, name: &str) -> Option<&SchemaElement> {
        self.elements().find(|e| e.name == name)
    }

    /// Returns the named global complex type `name`.
    #[must_use]
    pub fn complex_type(&self, name: &str) -> Option<&ComplexType> {
        self.items.iter().find_map(|item| match item {
            SchemaItem::ComplexType(ct) if ct.name.as_deref() == Some(name) => Some(ct),
            _ => None,
        })
    }

    /// Returns the named global simple type `name`.
    #[must_use]
    pub fn simple_type(&self, name: &str) -> Option<&SimpleType> {
        self.items.iter().find_map(|item| match item {
            SchemaItem::SimpleType(st) if st.name.as_deref() == Some(name) => Some(st),
            _ => None,
        })
    }
}

/// A set of schema documents.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    schemas: Vec<Schema>,
}

impl SchemaSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an already parsed schema.
    pub fn add(&mut self, schema: Schema) {
        self.schemas.push(schema);
    }

    /// Parses `text` and adds the resulting schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be parsed.
    pub fn parse_and_add(&mut self, text: &str) -> Result<&Schema> {
        let schema = Schema::parse(text)?;
        self.schemas.push(schema);
        Ok(&self.schemas[self.schemas.len() - 1])
    }

    /// Iterates over all schemas in insertion order.
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.iter()
    }

    /// Returns the number of schemas in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns `true` if the set holds no schema.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Returns all schemas whose target namespace is `namespace`.
    #[must_use]
    pub fn schemas_for_namespace(&self, namespace: &str) -> Vec<&Schema> {
        self.schemas
            .iter()
            .filter(|s| s.target_namespace == namespace)
            .collect()
    }

    /// Returns the schema for `namespace` only if exactly one document has it.
    #[must_use]
    pub fn unique_schema_for_namespace(&self, namespace: &str) -> Option<&Schema> {
        let mut matching = self.schemas_for_namespace(namespace).into_iter();
        match (matching.next(), matching.next()) {
            (Some(schema), None) => Some(schema),
            _ => None,
        }
    }

    /// Returns the canonical global element for `name` across the whole set.
    #[must_use]
    pub fn global_element(&self, name: &QualifiedName) -> Option<&SchemaElement> {
        self.schemas_for_namespace(&name.namespace)
            .into_iter()
            .find_map(|s| s.element(&name.name))
    }

    /// Returns the canonical global complex type for `name` across the whole set.
    #[must_use]
    pub fn global_complex_type(&self, name: &QualifiedName) -> Option<&ComplexType> {
        self.schemas_for_namespace(&name.namespace)
            .into_iter()
            .find_map(|s| s.complex_type(&name.name))
    }

    /// Returns the schema document that declares the global element `name`.
    #[must_use]
    pub fn schema_of_element(&self, name: &QualifiedName) -> Option<&Schema> {
        self.schemas_for_namespace(&name.namespace)
            .into_iter()
            .find(|s| s.element(&name.name).is_some())
    }

    /// Returns the complex type of `element`, inline or referenced by `type=`.
    #[must_use]
    pub fn element_complex_type<'a>(&'a self, element: &'a SchemaElement) -> Option<&'a ComplexType> {
        if let Some(ct) = element.complex_type() {
            return Some(ct);
        }
        element
            .type_name
            .as_ref()
            .and_then(|name| self.global_complex_type(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_DOCS_A: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:a">
        <xs:complexType name="T"><xs:sequence><xs:element name="X" type="xs:int"/></xs:sequence></xs:complexType>
        <xs:element name="E" type="T" xmlns="urn:a"/>
    </xs:schema>"#;

    #[test]
    fn unique_schema_requires_exactly_one_document() {
        let mut set = SchemaSet::new();
        set.parse_and_add(TWO_DOCS_A).unwrap();
        assert!(set.unique_schema_for_namespace("urn:a").is_some());
        assert!(set.unique_schema_for_namespace("urn:missing").is_none());
        set.parse_and_add(TWO_DOCS_A).unwrap();
        assert!(set.unique_schema_for_namespace("urn:a").is_none());
    }

    #[test]
    fn element_type_resolves_through_global_types() {
        let mut set = SchemaSet::new();
        set.parse_and_add(TWO_DOCS_A).unwrap();
        let element = set.global_element(&QualifiedName::new("urn:a", "E")).unwrap();
        let ct = set.element_complex_type(element).unwrap();
        assert_eq!(ct.name.as_deref(), Some("T"));
        assert_eq!(ct.key, TypeKey("urn:a#T".to_string()));
    }
}
