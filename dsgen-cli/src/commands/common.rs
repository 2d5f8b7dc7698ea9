use std::path::Path;

use anyhow::Context;
use dsgen::design::DesignDataSource;

/// Read a schema file into memory.
pub fn read_schema(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema: {}", path.display()))
}

/// Read and load a dataset schema into its design model.
pub fn load_data_source(path: &Path) -> anyhow::Result<DesignDataSource> {
    let text = read_schema(path)?;
    DesignDataSource::from_schema(&text)
        .with_context(|| format!("failed to load dataset schema: {}", path.display()))
}
