//! Recognition of the schema shapes the importer handles.

use crate::schema::{
    AnyWildcard, ComplexType, Particle, ParticleItem, SchemaElement, DIFFGRAM_NAMESPACE,
    MSDATA_NAMESPACE, XSD_NAMESPACE,
};

/// The shape of a schema type as seen by the importer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrapperShape {
    /// The type of an element flagged `msdata:IsDataSet`
    DataSetRoot,
    /// A schema wildcard followed by a diffgram wildcard, pointing at a dataset namespace
    Diffgram {
        /// Namespace of the dataset schema
        namespace: String,
        /// Generated table type to return instead of the dataset type
        table_type_name: Option<String>,
    },
    /// A group holding exactly one wildcard for a single concrete namespace
    SingleWildcard {
        /// Namespace of the dataset schema
        namespace: String,
    },
    /// Anything else
    Unrecognized,
}

impl WrapperShape {
    /// Classifies `ty`, the type of the `context` element if there is one.
    #[must_use]
    pub fn classify(ty: &ComplexType, context: Option<&SchemaElement>) -> WrapperShape {
        if context.is_some_and(is_data_set) {
            return WrapperShape::DataSetRoot;
        }
        let Some(particle) = &ty.particle else {
            return WrapperShape::Unrecognized;
        };

        if let Particle::Sequence(group) = particle {
            if let [ParticleItem::Any(schema_any), ParticleItem::Any(diffgram_any)] =
                group.items.as_slice()
            {
                if schema_any.namespace == XSD_NAMESPACE
                    && diffgram_any.namespace == DIFFGRAM_NAMESPACE
                {
                    return diffgram_shape(ty);
                }
            }
        }

        match particle {
            Particle::Sequence(group) | Particle::All(group) => match group.items.as_slice() {
                [ParticleItem::Any(any)] => match single_namespace(any) {
                    Some(namespace) => WrapperShape::SingleWildcard {
                        namespace: namespace.to_string(),
                    },
                    None => WrapperShape::Unrecognized,
                },
                _ => WrapperShape::Unrecognized,
            },
            Particle::Choice(_) => WrapperShape::Unrecognized,
        }
    }
}

/// Whether `element` carries `msdata:IsDataSet` set to `True`, `true` or `1`.
#[must_use]
pub fn is_data_set(element: &SchemaElement) -> bool {
    matches!(
        element.unhandled_attribute(MSDATA_NAMESPACE, "IsDataSet"),
        Some("True" | "true" | "1")
    )
}

/// Reads the fixed `namespace` and `tableTypeName` attributes of a diffgram wrapper. Each may
/// be declared at most once and `namespace` must be present.
fn diffgram_shape(ty: &ComplexType) -> WrapperShape {
    let mut namespace = None;
    let mut table_type_name = None;
    for attribute in &ty.attributes {
        let slot = match attribute.name.as_str() {
            "namespace" => &mut namespace,
            "tableTypeName" => &mut table_type_name,
            _ => continue,
        };
        if slot.is_some() {
            return WrapperShape::Unrecognized;
        }
        *slot = Some(attribute.fixed_value.as_deref().unwrap_or("").trim().to_string());
    }

    match namespace {
        Some(namespace) if !namespace.is_empty() => WrapperShape::Diffgram {
            namespace,
            table_type_name: table_type_name.filter(|name| !name.is_empty()),
        },
        _ => WrapperShape::Unrecognized,
    }
}

/// The wildcard's namespace when it names exactly one URI.
fn single_namespace(any: &AnyWildcard) -> Option<&str> {
    let namespace = any.namespace.trim();
    if namespace.is_empty()
        || namespace.starts_with("##")
        || namespace.split_whitespace().nth(1).is_some()
    {
        None
    } else {
        Some(namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        schema::{MaxOccurs, ParticleGroup, SchemaAttribute, TypeKey},
        xml::XmlAttribute,
    };

    fn any(namespace: &str) -> ParticleItem {
        ParticleItem::Any(AnyWildcard {
            namespace: namespace.to_string(),
            min_occurs: 1,
            max_occurs: MaxOccurs::Bounded(1),
            process_contents: Some("lax".to_string()),
        })
    }

    fn fixed(name: &str, value: &str) -> SchemaAttribute {
        SchemaAttribute {
            name: name.to_string(),
            fixed_value: Some(value.to_string()),
            ..SchemaAttribute::default()
        }
    }

    fn complex(particle: Option<Particle>, attributes: Vec<SchemaAttribute>) -> ComplexType {
        ComplexType {
            key: TypeKey("urn:t#T".to_string()),
            name: Some("T".to_string()),
            namespace: "urn:t".to_string(),
            particle,
            attributes,
            simple_content_base: None,
            unhandled_attributes: Vec::new(),
        }
    }

    fn sequence(items: Vec<ParticleItem>) -> Option<Particle> {
        Some(Particle::Sequence(ParticleGroup {
            items,
            ..ParticleGroup::default()
        }))
    }

    fn flagged(value: &str) -> SchemaElement {
        SchemaElement {
            name: "DS".to_string(),
            unhandled_attributes: vec![XmlAttribute {
                namespace: MSDATA_NAMESPACE.to_string(),
                local_name: "IsDataSet".to_string(),
                value: value.to_string(),
            }],
            ..SchemaElement::default()
        }
    }

    #[test]
    fn is_data_set_values() {
        assert!(is_data_set(&flagged("True")));
        assert!(is_data_set(&flagged("true")));
        assert!(!is_data_set(&flagged("TRUE")));
        assert!(is_data_set(&flagged("1")));
        assert!(!is_data_set(&flagged("false")));
        assert!(!is_data_set(&flagged("yes")));
        assert!(!is_data_set(&flagged("")));
        assert!(!is_data_set(&SchemaElement::default()));
    }

    #[test]
    fn is_data_set_ignores_other_namespaces() {
        let mut element = flagged("true");
        element.unhandled_attributes[0].namespace = "urn:other".to_string();
        assert!(!is_data_set(&element));
    }

    #[test]
    fn dataset_context_wins() {
        let ty = complex(sequence(vec![any("urn:ds")]), Vec::new());
        assert_eq!(
            WrapperShape::classify(&ty, Some(&flagged("1"))),
            WrapperShape::DataSetRoot
        );
    }

    #[test]
    fn diffgram_wrapper() {
        let ty = complex(
            sequence(vec![any(XSD_NAMESPACE), any(DIFFGRAM_NAMESPACE)]),
            vec![fixed("namespace", " urn:ds "), fixed("tableTypeName", "OrdersDataTable")],
        );
        assert_eq!(
            WrapperShape::classify(&ty, None),
            WrapperShape::Diffgram {
                namespace: "urn:ds".to_string(),
                table_type_name: Some("OrdersDataTable".to_string()),
            }
        );
    }

    #[test]
    fn diffgram_attribute_multiplicity() {
        let ty = complex(
            sequence(vec![any(XSD_NAMESPACE), any(DIFFGRAM_NAMESPACE)]),
            vec![fixed("namespace", "urn:a"), fixed("namespace", "urn:b")],
        );
        assert_eq!(WrapperShape::classify(&ty, None), WrapperShape::Unrecognized);

        let ty = complex(sequence(vec![any(XSD_NAMESPACE), any(DIFFGRAM_NAMESPACE)]), Vec::new());
        assert_eq!(WrapperShape::classify(&ty, None), WrapperShape::Unrecognized);
    }

    #[test]
    fn single_wildcard_needs_one_concrete_namespace() {
        let ty = complex(sequence(vec![any("urn:ds")]), Vec::new());
        assert_eq!(
            WrapperShape::classify(&ty, None),
            WrapperShape::SingleWildcard {
                namespace: "urn:ds".to_string()
            }
        );

        for namespace in ["##any", "##other", "urn:a urn:b", ""] {
            let ty = complex(sequence(vec![any(namespace)]), Vec::new());
            assert_eq!(WrapperShape::classify(&ty, None), WrapperShape::Unrecognized);
        }

        let ty = complex(
            Some(Particle::All(ParticleGroup {
                items: vec![any("urn:ds")],
                ..ParticleGroup::default()
            })),
            Vec::new(),
        );
        assert!(matches!(
            WrapperShape::classify(&ty, None),
            WrapperShape::SingleWildcard { .. }
        ));
    }

    #[test]
    fn other_shapes_are_unrecognized() {
        let choice = complex(
            Some(Particle::Choice(ParticleGroup {
                items: vec![any("urn:ds")],
                ..ParticleGroup::default()
            })),
            Vec::new(),
        );
        assert_eq!(WrapperShape::classify(&choice, None), WrapperShape::Unrecognized);
        assert_eq!(
            WrapperShape::classify(&complex(None, Vec::new()), None),
            WrapperShape::Unrecognized
        );
        let three = complex(sequence(vec![any("urn:a"), any("urn:b"), any("urn:c")]), Vec::new());
        assert_eq!(WrapperShape::classify(&three, None), WrapperShape::Unrecognized);
    }
}
