//! Minimal namespace-aware XML document model.
//!
//! The schema reader and the design-model loader both need a resolved view of an XML
//! document: every element and attribute tagged with its namespace URI, plus the ability
//! to resolve QName-valued attribute values such as `type="xs:string"`. This module builds
//! that view on top of the [`quick_xml`] pull reader.
//!
//! # Examples
//!
//! ```rust
//! use dsgen::xml::XmlElement;
//!
//! let root = XmlElement::parse(r#"<a:root xmlns:a="urn:a" x="1"><a:child>text</a:child></a:root>"#)?;
//! assert_eq!(root.namespace, "urn:a");
//! assert_eq!(root.attribute("", "x"), Some("1"));
//! assert_eq!(root.child("urn:a", "child").map(|c| c.text.as_str()), Some("text"));
//! # Ok::<(), dsgen::Error>(())
//! ```

use std::collections::BTreeMap;

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

use crate::Result;

/// Namespace bound to the `xml` prefix by definition.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A namespace-qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct QualifiedName {
    /// Namespace URI, empty for the null namespace
    pub namespace: String,
    /// Local part of the name
    pub name: String,
}

impl QualifiedName {
    /// Creates a new qualified name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}:{}", self.namespace, self.name)
        }
    }
}

/// One attribute of an [`XmlElement`], with its namespace resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// Namespace URI of the attribute, empty when unprefixed
    pub namespace: String,
    /// Local name of the attribute
    pub local_name: String,
    /// Unescaped attribute value
    pub value: String,
}

/// An element of a parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    /// Resolved namespace URI of the element
    pub namespace: String,
    /// Local name of the element
    pub local_name: String,
    /// Attributes in document order, `xmlns` declarations excluded
    pub attributes: Vec<XmlAttribute>,
    /// Child elements in document order
    pub children: Vec<XmlElement>,
    /// Concatenated text and CDATA content directly inside this element
    pub text: String,
    /// Prefix to namespace bindings in scope at this element
    pub namespaces: BTreeMap<String, String>,
}

impl XmlElement {
    /// Parses a complete XML document and returns its root element.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Xml`] or [`crate::Error::Malformed`] when the text is not
    /// well-formed, uses an undeclared prefix, or has no root element.
    pub fn parse(text: &str) -> Result<XmlElement> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let element = Self::open(&start, stack.last())?;
                    stack.push(element);
                }
                Event::Empty(start) => {
                    let element = Self::open(&start, stack.last())?;
                    Self::close(element, &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| malformed_error!("Unbalanced end tag"))?;
                    Self::close(element, &mut stack, &mut root)?;
                }
                Event::Text(text) => {
                    let value = text
                        .unescape()
                        .map_err(|e| malformed_error!("Invalid text content: {}", e))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&value);
                    }
                }
                Event::CData(data) => {
                    let value = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&value);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(malformed_error!("Unexpected end of document"));
        }
        root.ok_or_else(|| malformed_error!("Document has no root element"))
    }

    fn open(start: &BytesStart<'_>, parent: Option<&XmlElement>) -> Result<XmlElement> {
        let mut namespaces = parent.map(|p| p.namespaces.clone()).unwrap_or_default();
        let mut raw_attributes = Vec::new();

        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| malformed_error!("Invalid attribute: {}", e))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| malformed_error!("Invalid attribute value: {}", e))?
                .into_owned();

            if key == "xmlns" {
                namespaces.insert(String::new(), value);
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                namespaces.insert(prefix.to_string(), value);
            } else {
                raw_attributes.push((key, value));
            }
        }

        let qname = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let (prefix, local_name) = split_prefix(&qname);
        let namespace = Self::lookup(&namespaces, prefix.unwrap_or(""), &qname)?;

        let mut attributes = Vec::with_capacity(raw_attributes.len());
        for (key, value) in raw_attributes {
            let (prefix, local) = split_prefix(&key);
            // Unprefixed attributes are in no namespace, regardless of the default namespace
            let namespace = match prefix {
                Some(p) => Self::lookup(&namespaces, p, &key)?,
                None => String::new(),
            };
            attributes.push(XmlAttribute {
                namespace,
                local_name: local.to_string(),
                value,
            });
        }

        Ok(XmlElement {
            namespace,
            local_name: local_name.to_string(),
            attributes,
            children: Vec::new(),
            text: String::new(),
            namespaces,
        })
    }

    fn close(
        element: XmlElement,
        stack: &mut [XmlElement],
        root: &mut Option<XmlElement>,
    ) -> Result<()> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None => {
                if root.is_some() {
                    return Err(malformed_error!("Document has more than one root element"));
                }
                *root = Some(element);
            }
        }
        Ok(())
    }

    fn lookup(namespaces: &BTreeMap<String, String>, prefix: &str, qname: &str) -> Result<String> {
        if prefix == "xml" {
            return Ok(XML_NAMESPACE.to_string());
        }
        match namespaces.get(prefix) {
            Some(uri) => Ok(uri.clone()),
            None if prefix.is_empty() => Ok(String::new()),
            None => Err(malformed_error!("Undeclared namespace prefix in '{}'", qname)),
        }
    }

    /// Returns `true` if this element has the given namespace and local name.
    #[must_use]
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace == namespace && self.local_name == local_name
    }

    /// Returns the value of the attribute with the given namespace and local name.
    #[must_use]
    pub fn attribute(&self, namespace: &str, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace == namespace && a.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    /// Returns the first child element with the given namespace and local name.
    #[must_use]
    pub fn child(&self, namespace: &str, local_name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.is(namespace, local_name))
    }

    /// Iterates over all child elements with the given namespace and local name.
    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children
            .iter()
            .filter(move |c| c.is(namespace, local_name))
    }

    /// Resolves a QName-valued string (`prefix:local` or `local`) against the namespaces
    /// in scope at this element. Unprefixed names resolve to the default namespace.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] for an undeclared prefix.
    pub fn resolve_qname(&self, value: &str) -> Result<QualifiedName> {
        let value = value.trim();
        let (prefix, local) = split_prefix(value);
        let namespace = Self::lookup(&self.namespaces, prefix.unwrap_or(""), value)?;
        Ok(QualifiedName::new(namespace, local))
    }
}

fn split_prefix(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_element_and_attribute_namespaces() {
        let root = XmlElement::parse(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:d="urn:d">
                 <xs:element name="A" d:flag="1" type="xs:string"/>
               </xs:schema>"#,
        )
        .unwrap();
        assert!(root.is("http://www.w3.org/2001/XMLSchema", "schema"));
        let element = &root.children[0];
        assert_eq!(element.attribute("urn:d", "flag"), Some("1"));
        assert_eq!(element.attribute("", "name"), Some("A"));
        let ty = element.resolve_qname(element.attribute("", "type").unwrap()).unwrap();
        assert_eq!(ty, QualifiedName::new("http://www.w3.org/2001/XMLSchema", "string"));
    }

    #[test]
    fn default_namespace_does_not_apply_to_attributes() {
        let root = XmlElement::parse(r#"<root xmlns="urn:x" a="b"/>"#).unwrap();
        assert_eq!(root.namespace, "urn:x");
        assert_eq!(root.attributes[0].namespace, "");
    }

    #[test]
    fn collects_text_and_cdata() {
        let root = XmlElement::parse("<c><t>SELECT 1</t><u><![CDATA[a < b]]></u></c>").unwrap();
        assert_eq!(root.children[0].text, "SELECT 1");
        assert_eq!(root.children[1].text, "a < b");
    }

    #[test]
    fn rejects_undeclared_prefix() {
        assert!(XmlElement::parse("<p:root/>").is_err());
    }

    #[test]
    fn rejects_empty_document() {
        assert!(XmlElement::parse("").is_err());
    }
}
