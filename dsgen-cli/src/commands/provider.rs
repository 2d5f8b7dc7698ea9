use std::path::Path;

use dsgen::codegen::TypedDataSetGenerator;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::read_schema,
    output::{emit, Render},
};

#[derive(Debug, Serialize)]
pub struct ProviderInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    pub provider: Option<String>,
}

pub fn run(path: &Path, table: Option<&str>, opts: &GlobalOptions) -> anyhow::Result<()> {
    let schema = read_schema(path)?;
    let provider = TypedDataSetGenerator::new().get_provider_name(&schema, table)?;
    let info = ProviderInfo {
        table: table.map(str::to_string),
        provider,
    };

    emit(&info, opts)
}

impl Render for ProviderInfo {
    fn render(&self) -> String {
        format!("{}\n", self.provider.as_deref().unwrap_or("(none)"))
    }
}
