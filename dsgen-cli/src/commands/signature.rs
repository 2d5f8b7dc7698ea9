use std::path::Path;

use anyhow::{bail, Context};
use dsgen::{
    codedom::emitter_for_language,
    codegen::MethodSignatureGenerator,
    design::DbSource,
};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::load_data_source,
    output::{emit, Render},
};

pub struct SignatureArgs<'a> {
    pub table: Option<&'a str>,
    pub query: Option<&'a str>,
    pub get: bool,
    pub paging: bool,
    pub container: &'a str,
    pub language: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SignatureInfo {
    pub method: String,
    pub signature: Option<String>,
}

fn named<'a>(mut sources: impl Iterator<Item = &'a DbSource>, name: &str) -> Option<&'a DbSource> {
    sources.find(|s| s.name == name || s.user_source_name.as_deref() == Some(name))
}

pub fn run(path: &Path, args: SignatureArgs<'_>, opts: &GlobalOptions) -> anyhow::Result<()> {
    let ds = load_data_source(path)?;
    let emitter = emitter_for_language(args.language)?;
    let data_set_class = ds.class_name();

    let mut generator = MethodSignatureGenerator::new()
        .emitter(emitter.as_ref())
        .data_set_class_name(data_set_class)
        .get_method(args.get)
        .paging(args.paging)
        .container_type_named(args.container)?;

    generator = match args.table {
        Some(table_name) => {
            let Some(table) = ds.table(table_name) else {
                bail!("no table named '{}'", table_name);
            };
            let source = match args.query {
                Some(query) => named(table.all_sources(), query)
                    .with_context(|| format!("no source '{}' on table '{}'", query, table_name))?,
                None => table
                    .main_source
                    .as_ref()
                    .with_context(|| format!("table '{}' has no table adapter", table_name))?,
            };
            generator
                .source(source)
                .design_table(table)
                .table_class_name(table.table_class_name())
        }
        None => {
            let Some(query) = args.query else {
                bail!("either --table or --query is required");
            };
            let source = named(ds.sources.iter(), query)
                .with_context(|| format!("no data-source level function '{}'", query))?;
            generator.source(source)
        }
    };

    let info = SignatureInfo {
        method: generator.method_name()?,
        signature: generator.generate_method_signature()?,
    };

    emit(&info, opts)
}

impl Render for SignatureInfo {
    fn render(&self) -> String {
        match &self.signature {
            Some(signature) => format!("{signature}\n"),
            None => format!("{} (no signature line)\n", self.method),
        }
    }
}
