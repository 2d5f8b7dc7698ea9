use std::path::Path;

use anyhow::Context;
use dsgen::{
    codedom::{emitter_for_language, CodeCompileUnit, CodeNamespace},
    codegen::{GenerateOption, TypedDataSetGenerator},
};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::read_schema,
    output::{emit, Render},
};

pub struct GenerateArgs<'a> {
    pub namespace: &'a str,
    pub language: &'a str,
    pub hierarchical_update: bool,
    pub linq: bool,
    pub output: Option<&'a Path>,
}

#[derive(Debug, Serialize)]
pub struct GenerateSummary {
    pub dataset_name: String,
    pub language: String,
    pub namespaces: Vec<String>,
    pub references: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_assembly: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip)]
    pub code: String,
}

pub fn run(path: &Path, args: GenerateArgs<'_>, opts: &GlobalOptions) -> anyhow::Result<()> {
    let schema = read_schema(path)?;
    let emitter = emitter_for_language(args.language)?;

    let mut options = GenerateOption::empty();
    options.set(GenerateOption::HIERARCHICAL_UPDATE, args.hierarchical_update);
    options.set(GenerateOption::LINQ_OVER_TYPED_DATASETS, args.linq);

    let mut unit = CodeCompileUnit::default();
    let mut namespace = CodeNamespace::new(args.namespace);
    let result = TypedDataSetGenerator::new()
        .options(options)
        .generate(&schema, &mut unit, &mut namespace, emitter.as_ref())
        .with_context(|| format!("failed to generate from {}", path.display()))?;
    unit.namespaces.insert(0, namespace);

    let code = emitter.emit_compile_unit(&unit)?;
    if let Some(target) = args.output {
        std::fs::write(target, &code)
            .with_context(|| format!("failed to write {}", target.display()))?;
        log::info!("wrote {} ({})", target.display(), result.dataset_name);
    }

    let summary = GenerateSummary {
        dataset_name: result.dataset_name,
        language: emitter.language().to_string(),
        namespaces: unit.namespaces.iter().map(|n| n.name.clone()).collect(),
        references: result
            .referenced_assemblies
            .iter()
            .map(ToString::to_string)
            .collect(),
        extension_assembly: result.extension_assembly.map(|a| a.to_string()),
        output: args.output.map(|p| p.display().to_string()),
        code,
    };

    emit(&summary, opts)
}

impl Render for GenerateSummary {
    /// The generated code, or nothing when it was written to a file.
    fn render(&self) -> String {
        match self.output {
            Some(_) => String::new(),
            None => self.code.clone(),
        }
    }
}
