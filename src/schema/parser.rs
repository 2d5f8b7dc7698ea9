//! Builds the schema object model from an [`XmlElement`] tree.

use crate::{
    schema::{
        AnyWildcard, ComplexType, IdentityConstraint, IdentityConstraintKind, MaxOccurs,
        Particle, ParticleGroup, ParticleItem, Schema, SchemaAttribute, SchemaElement,
        SchemaItem, SchemaType, SimpleType, TypeKey, XSD_NAMESPACE,
    },
    xml::{QualifiedName, XmlAttribute, XmlElement},
    Result,
};

struct Context<'a> {
    target_namespace: &'a str,
    elements_qualified: bool,
}

pub(super) fn parse_schema(text: &str) -> Result<Schema> {
    let root = XmlElement::parse(text)?;
    if !root.is(XSD_NAMESPACE, "schema") {
        return Err(malformed_error!(
            "Expected an xs:schema root element, found '{}'",
            root.local_name
        ));
    }

    let target_namespace = root.attribute("", "targetNamespace").unwrap_or("");
    let ctx = Context {
        target_namespace,
        elements_qualified: root.attribute("", "elementFormDefault") == Some("qualified"),
    };

    let mut schema = Schema {
        target_namespace: target_namespace.to_string(),
        id: root.attribute("", "id").map(str::to_string),
        source: text.to_string(),
        ..Schema::default()
    };

    for child in root.children.iter().filter(|c| c.namespace == XSD_NAMESPACE) {
        match child.local_name.as_str() {
            "element" => {
                let element = parse_element(child, &ctx, true, "")?;
                schema.items.push(SchemaItem::Element(element));
            }
            "complexType" => {
                let name = required(child, "name")?;
                let key = TypeKey(format!("{}#{}", target_namespace, name));
                let ct = parse_complex_type(child, &ctx, Some(name.to_string()), key, name)?;
                schema.items.push(SchemaItem::ComplexType(ct));
            }
            "simpleType" => {
                let mut st = parse_simple_type(child)?;
                st.name = Some(required(child, "name")?.to_string());
                schema.items.push(SchemaItem::SimpleType(st));
            }
            "import" => schema.items.push(SchemaItem::Import {
                namespace: child.attribute("", "namespace").unwrap_or("").to_string(),
                schema_location: child.attribute("", "schemaLocation").map(str::to_string),
            }),
            "annotation" => schema.appinfo.extend(appinfo_of(child)),
            _ => {}
        }
    }

    Ok(schema)
}

fn required<'a>(node: &'a XmlElement, name: &str) -> Result<&'a str> {
    node.attribute("", name).ok_or_else(|| {
        malformed_error!("xs:{} is missing the '{}' attribute", node.local_name, name)
    })
}

fn unhandled(node: &XmlElement) -> Vec<XmlAttribute> {
    node.attributes
        .iter()
        .filter(|a| !a.namespace.is_empty() && a.namespace != XSD_NAMESPACE)
        .cloned()
        .collect()
}

fn appinfo_of(annotation: &XmlElement) -> Vec<XmlElement> {
    annotation
        .children_named(XSD_NAMESPACE, "appinfo")
        .flat_map(|appinfo| appinfo.children.iter().cloned())
        .collect()
}

fn occurs(node: &XmlElement) -> Result<(u32, MaxOccurs)> {
    let min = match node.attribute("", "minOccurs") {
        Some(v) => v
            .trim()
            .parse::<u32>()
            .map_err(|_| malformed_error!("Invalid minOccurs '{}'", v))?,
        None => 1,
    };
    let max = match node.attribute("", "maxOccurs") {
        Some("unbounded") => MaxOccurs::Unbounded,
        Some(v) => MaxOccurs::Bounded(
            v.trim()
                .parse::<u32>()
                .map_err(|_| malformed_error!("Invalid maxOccurs '{}'", v))?,
        ),
        None => MaxOccurs::Bounded(1),
    };
    Ok((min, max))
}

fn parse_element(
    node: &XmlElement,
    ctx: &Context<'_>,
    global: bool,
    parent_path: &str,
) -> Result<SchemaElement> {
    let (min_occurs, max_occurs) = occurs(node)?;
    let ref_name = node
        .attribute("", "ref")
        .map(|r| node.resolve_qname(r))
        .transpose()?;

    let (name, qualified_name) = match &ref_name {
        Some(reference) => (reference.name.clone(), reference.clone()),
        None => {
            let name = required(node, "name")?.to_string();
            let qualified = global
                || match node.attribute("", "form") {
                    Some(form) => form == "qualified",
                    None => ctx.elements_qualified,
                };
            let namespace = if qualified { ctx.target_namespace } else { "" };
            (name.clone(), QualifiedName::new(namespace, name))
        }
    };

    let path = if parent_path.is_empty() {
        name.clone()
    } else {
        format!("{}/{}", parent_path, name)
    };

    let mut element = SchemaElement {
        name,
        qualified_name,
        type_name: node
            .attribute("", "type")
            .map(|t| node.resolve_qname(t))
            .transpose()?,
        ref_name,
        min_occurs,
        max_occurs,
        default_value: node.attribute("", "default").map(str::to_string),
        fixed_value: node.attribute("", "fixed").map(str::to_string),
        unhandled_attributes: unhandled(node),
        ..SchemaElement::default()
    };

    for child in node.children.iter().filter(|c| c.namespace == XSD_NAMESPACE) {
        match child.local_name.as_str() {
            "complexType" => {
                let key = TypeKey(format!("{}#element({})", ctx.target_namespace, path));
                let ct = parse_complex_type(child, ctx, None, key, &path)?;
                element.inline_type = Some(SchemaType::Complex(ct));
            }
            "simpleType" => {
                element.inline_type = Some(SchemaType::Simple(parse_simple_type(child)?));
            }
            "unique" => element
                .constraints
                .push(parse_constraint(child, IdentityConstraintKind::Unique)?),
            "key" => element
                .constraints
                .push(parse_constraint(child, IdentityConstraintKind::Key)?),
            "keyref" => element
                .constraints
                .push(parse_constraint(child, IdentityConstraintKind::KeyRef)?),
            "annotation" => element.appinfo.extend(appinfo_of(child)),
            _ => {}
        }
    }

    Ok(element)
}

fn parse_complex_type(
    node: &XmlElement,
    ctx: &Context<'_>,
    name: Option<String>,
    key: TypeKey,
    path: &str,
) -> Result<ComplexType> {
    let mut ct = ComplexType {
        key,
        name,
        namespace: ctx.target_namespace.to_string(),
        particle: None,
        attributes: Vec::new(),
        simple_content_base: None,
        unhandled_attributes: unhandled(node),
    };

    for child in node.children.iter().filter(|c| c.namespace == XSD_NAMESPACE) {
        match child.local_name.as_str() {
            "sequence" | "choice" | "all" => {
                ct.particle = Some(parse_particle(child, ctx, path)?);
            }
            "attribute" => ct.attributes.push(parse_attribute(child)?),
            "simpleContent" => {
                if let Some(extension) = child.child(XSD_NAMESPACE, "extension") {
                    ct.simple_content_base = extension
                        .attribute("", "base")
                        .map(|b| extension.resolve_qname(b))
                        .transpose()?;
                    for attribute in extension.children_named(XSD_NAMESPACE, "attribute") {
                        ct.attributes.push(parse_attribute(attribute)?);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(ct)
}

fn parse_particle(node: &XmlElement, ctx: &Context<'_>, path: &str) -> Result<Particle> {
    let (min_occurs, max_occurs) = occurs(node)?;
    let mut group = ParticleGroup {
        items: Vec::new(),
        min_occurs,
        max_occurs,
    };

    for child in node.children.iter().filter(|c| c.namespace == XSD_NAMESPACE) {
        match child.local_name.as_str() {
            "element" => group
                .items
                .push(ParticleItem::Element(parse_element(child, ctx, false, path)?)),
            "any" => {
                let (min_occurs, max_occurs) = occurs(child)?;
                group.items.push(ParticleItem::Any(AnyWildcard {
                    namespace: child.attribute("", "namespace").unwrap_or("##any").to_string(),
                    min_occurs,
                    max_occurs,
                    process_contents: child.attribute("", "processContents").map(str::to_string),
                }));
            }
            "sequence" | "choice" | "all" => group
                .items
                .push(ParticleItem::Group(parse_particle(child, ctx, path)?)),
            _ => {}
        }
    }

    Ok(match node.local_name.as_str() {
        "sequence" => Particle::Sequence(group),
        "choice" => Particle::Choice(group),
        _ => Particle::All(group),
    })
}

fn parse_attribute(node: &XmlElement) -> Result<SchemaAttribute> {
    let name = match node.attribute("", "name") {
        Some(name) => name.to_string(),
        None => match node.attribute("", "ref") {
            Some(reference) => node.resolve_qname(reference)?.name,
            None => return Err(malformed_error!("xs:attribute needs a name or ref")),
        },
    };

    Ok(SchemaAttribute {
        name,
        type_name: node
            .attribute("", "type")
            .map(|t| node.resolve_qname(t))
            .transpose()?,
        simple_type: node
            .child(XSD_NAMESPACE, "simpleType")
            .map(parse_simple_type)
            .transpose()?,
        fixed_value: node.attribute("", "fixed").map(str::to_string),
        default_value: node.attribute("", "default").map(str::to_string),
        required: node.attribute("", "use") == Some("required"),
        unhandled_attributes: unhandled(node),
    })
}

fn parse_simple_type(node: &XmlElement) -> Result<SimpleType> {
    let mut st = SimpleType::default();
    if let Some(restriction) = node.child(XSD_NAMESPACE, "restriction") {
        st.base = restriction
            .attribute("", "base")
            .map(|b| restriction.resolve_qname(b))
            .transpose()?;
        for facet in restriction.children.iter().filter(|c| c.namespace == XSD_NAMESPACE) {
            let value = facet.attribute("", "value").unwrap_or("");
            match facet.local_name.as_str() {
                "maxLength" | "length" => {
                    st.max_length = Some(
                        value
                            .trim()
                            .parse::<i32>()
                            .map_err(|_| malformed_error!("Invalid maxLength '{}'", value))?,
                    );
                }
                "enumeration" => st.enumeration.push(value.to_string()),
                _ => {}
            }
        }
    }
    Ok(st)
}

fn parse_constraint(node: &XmlElement, kind: IdentityConstraintKind) -> Result<IdentityConstraint> {
    let selector = node
        .child(XSD_NAMESPACE, "selector")
        .and_then(|s| s.attribute("", "xpath"))
        .ok_or_else(|| malformed_error!("Identity constraint without a selector"))?
        .to_string();

    Ok(IdentityConstraint {
        kind,
        name: required(node, "name")?.to_string(),
        selector,
        fields: node
            .children_named(XSD_NAMESPACE, "field")
            .filter_map(|f| f.attribute("", "xpath"))
            .map(str::to_string)
            .collect(),
        refer: node
            .attribute("", "refer")
            .map(|r| node.resolve_qname(r))
            .transpose()?,
        unhandled_attributes: unhandled(node),
    })
}

#[cfg(test)]
mod tests {
    use crate::schema::*;

    const DIFFGRAM_WRAPPER: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:svc">
        <xs:complexType name="CustomersWrapper">
          <xs:sequence>
            <xs:any minOccurs="0" maxOccurs="unbounded" namespace="http://www.w3.org/2001/XMLSchema" processContents="lax"/>
            <xs:any minOccurs="1" namespace="urn:schemas-microsoft-com:xml-diffgram-v1" processContents="lax"/>
          </xs:sequence>
          <xs:attribute fixed="http://tempuri.org/DataSet1.xsd" name="namespace"/>
          <xs:attribute fixed="CustomersDataTable" name="tableTypeName"/>
        </xs:complexType>
    </xs:schema>"#;

    #[test]
    fn parses_wildcards_and_fixed_attributes() {
        let schema = Schema::parse(DIFFGRAM_WRAPPER).unwrap();
        let ct = schema.complex_type("CustomersWrapper").unwrap();
        let group = ct.particle.as_ref().unwrap().group();
        assert_eq!(group.items.len(), 2);
        match &group.items[1] {
            ParticleItem::Any(any) => assert_eq!(any.namespace, DIFFGRAM_NAMESPACE),
            other => panic!("unexpected item {:?}", other),
        }
        match &group.items[0] {
            ParticleItem::Any(any) => assert_eq!(any.max_occurs, MaxOccurs::Unbounded),
            other => panic!("unexpected item {:?}", other),
        }
        assert_eq!(ct.attributes[1].fixed_value.as_deref(), Some("CustomersDataTable"));
    }

    #[test]
    fn parses_local_elements_constraints_and_facets() {
        let schema = Schema::parse(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:msdata="urn:schemas-microsoft-com:xml-msdata"
                 targetNamespace="urn:ds" xmlns:mstns="urn:ds" elementFormDefault="qualified">
              <xs:element name="DS" msdata:IsDataSet="true">
                <xs:complexType>
                  <xs:choice minOccurs="0" maxOccurs="unbounded">
                    <xs:element name="T">
                      <xs:complexType><xs:sequence>
                        <xs:element name="Name" minOccurs="0">
                          <xs:simpleType><xs:restriction base="xs:string"><xs:maxLength value="40"/></xs:restriction></xs:simpleType>
                        </xs:element>
                      </xs:sequence></xs:complexType>
                    </xs:element>
                  </xs:choice>
                </xs:complexType>
                <xs:unique name="PK" msdata:PrimaryKey="true">
                  <xs:selector xpath=".//mstns:T"/><xs:field xpath="mstns:Name"/>
                </xs:unique>
              </xs:element>
            </xs:schema>"#,
        )
        .unwrap();

        let ds = schema.element("DS").unwrap();
        assert_eq!(ds.unhandled_attribute(MSDATA_NAMESPACE, "IsDataSet"), Some("true"));
        assert_eq!(ds.constraints.len(), 1);
        assert_eq!(ds.constraints[0].fields, vec!["mstns:Name".to_string()]);

        let ct = ds.complex_type().unwrap();
        assert_eq!(ct.key, TypeKey("urn:ds#element(DS)".to_string()));
        let table = match &ct.particle.as_ref().unwrap().group().items[0] {
            ParticleItem::Element(e) => e,
            other => panic!("unexpected item {:?}", other),
        };
        assert_eq!(table.qualified_name.namespace, "urn:ds");
        let column = match &table.complex_type().unwrap().particle.as_ref().unwrap().group().items[0] {
            ParticleItem::Element(e) => e,
            other => panic!("unexpected item {:?}", other),
        };
        assert_eq!(column.min_occurs, 0);
        assert_eq!(column.simple_type().unwrap().max_length, Some(40));
    }

    #[test]
    fn rejects_non_schema_root() {
        assert!(Schema::parse("<root/>").is_err());
    }
}
