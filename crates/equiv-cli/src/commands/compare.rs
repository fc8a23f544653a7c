use std::path::PathBuf;

use equiv_core::config::EngineConfig;
use equiv_core::{create_default_registry, EquivalenceEngine, MatchMode};

use super::{load_tree, OutputFormat};
use crate::formatters::{json, terminal};

pub struct CompareOptions {
    pub a: PathBuf,
    pub b: PathBuf,
    pub language: Option<String>,
    pub format: OutputFormat,
    pub config: EngineConfig,
}

pub fn compare_command(opts: CompareOptions) -> anyhow::Result<()> {
    let a = load_tree(&opts.a, opts.language.as_deref())?;
    let b = load_tree(&opts.b, opts.language.as_deref())?;

    let registry = create_default_registry();
    let engine = EquivalenceEngine::with_config(&registry, opts.config);
    let verdict = engine.compare(a.root(), b.root(), MatchMode::Code);
    tracing::info!(a = %opts.a.display(), b = %opts.b.display(), matched = verdict.is_match(), "compared");

    let a_name = opts.a.to_string_lossy();
    let b_name = opts.b.to_string_lossy();
    match opts.format {
        OutputFormat::Json => println!("{}", json::format_compare(&a_name, &b_name, &verdict)),
        OutputFormat::Terminal => println!("{}", terminal::format_compare(&a_name, &b_name, &verdict)),
    }
    Ok(())
}
