use std::path::Path;

use anyhow::Context;
use dsgen::{
    codedom::CodeExpression,
    serializer::{PropertyReference, PropertyReferenceSerializer},
};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    output::{emit, Fields, Render},
};

#[derive(Debug, Serialize)]
pub struct ReferenceInfo {
    pub form: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub normalized: String,
    pub expression: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct EncodedReference {
    pub form: &'static str,
    pub text: String,
}

fn form_name(reference: &PropertyReference) -> &'static str {
    match reference {
        PropertyReference::ApplicationSettings { .. } => "ApplicationSettings",
        PropertyReference::AppConfig { .. } => "AppConfig",
        PropertyReference::Opaque(_) => "Expression",
    }
}

pub fn encode(input: &str, opts: &GlobalOptions) -> anyhow::Result<()> {
    let json = if Path::new(input).is_file() {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))?
    } else {
        input.to_string()
    };
    let expression: CodeExpression =
        serde_json::from_str(&json).context("input is not a JSON code expression")?;

    let encoded = EncodedReference {
        form: form_name(&PropertyReference::from_expression(&expression)),
        text: PropertyReferenceSerializer::serialize(&expression)?,
    };
    emit(&encoded, opts)
}

pub fn decode(text: &str, opts: &GlobalOptions) -> anyhow::Result<()> {
    let reference = PropertyReference::decode(text)?;
    let expression = reference.to_expression();

    let (type_name, path) = match &reference {
        PropertyReference::ApplicationSettings {
            type_ref,
            middle,
            property,
        } => (
            Some(type_ref.base_type.clone()),
            Some(format!("{middle}.{property}")),
        ),
        PropertyReference::AppConfig {
            type_ref,
            middle,
            index,
            property,
        } => (
            Some(type_ref.base_type.clone()),
            Some(format!("{middle}[\"{index}\"].{property}")),
        ),
        PropertyReference::Opaque(_) => (None, None),
    };

    let info = ReferenceInfo {
        form: form_name(&reference),
        type_name,
        path,
        normalized: PropertyReferenceSerializer::serialize(&expression)?,
        expression: serde_json::to_value(&expression)?,
    };

    emit(&info, opts)
}

impl Render for EncodedReference {
    fn render(&self) -> String {
        format!("{}\n", self.text)
    }
}

impl Render for ReferenceInfo {
    fn render(&self) -> String {
        Fields::new()
            .field("Form", self.form)
            .optional("Type", self.type_name.as_deref())
            .optional("Member", self.path.as_deref())
            .field("Persisted", &self.normalized)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoded_app_config_fields() {
        let info = ReferenceInfo {
            form: "AppConfig",
            type_name: Some("System.Configuration.ConfigurationManager".to_string()),
            path: Some("ConnectionStrings[\"Northwind\"].ConnectionString".to_string()),
            normalized: "AppConfig.System.Configuration.ConfigurationManager.0.Northwind.ConnectionStrings.ConnectionString".to_string(),
            expression: serde_json::Value::Null,
        };
        let text = info.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Form:      AppConfig");
        assert_eq!(lines[2], "Member:    ConnectionStrings[\"Northwind\"].ConnectionString");
    }

    #[test]
    fn opaque_reference_has_no_type_or_member() {
        let info = ReferenceInfo {
            form: "Expression",
            type_name: None,
            path: None,
            normalized: "{}".to_string(),
            expression: serde_json::Value::Null,
        };
        assert_eq!(info.render(), "Form:      Expression\nPersisted: {}\n");
    }
}
