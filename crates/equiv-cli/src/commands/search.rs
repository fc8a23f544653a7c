use std::path::PathBuf;

use equiv_core::config::EngineConfig;
use equiv_core::engine::search::MatchSummary;
use equiv_core::{create_default_registry, EquivalenceEngine};
use rayon::prelude::*;

use super::{load_tree, OutputFormat};
use crate::formatters::{json, terminal};

pub struct SearchOptions {
    pub pattern: PathBuf,
    pub files: Vec<PathBuf>,
    pub language: Option<String>,
    pub format: OutputFormat,
    pub config: EngineConfig,
}

pub struct FileMatches {
    pub file_path: String,
    pub matches: Vec<MatchSummary>,
}

pub fn search_command(opts: SearchOptions) -> anyhow::Result<()> {
    let language = opts.language.as_deref();
    let pattern = load_tree(&opts.pattern, language)?;

    let registry = create_default_registry();
    let engine = EquivalenceEngine::with_config(&registry, opts.config);

    // Unreadable or unsupported files are reported and skipped.
    let mut results: Vec<FileMatches> = opts
        .files
        .par_iter()
        .filter_map(|path| {
            let tree = match load_tree(path, language) {
                Ok(tree) => tree,
                Err(e) => {
                    tracing::warn!("skipping {}: {e:#}", path.display());
                    return None;
                }
            };
            let matches: Vec<MatchSummary> = engine
                .search(pattern.root(), tree.root())
                .iter()
                .map(|m| m.summary())
                .collect();
            tracing::debug!(file = %path.display(), count = matches.len(), "searched");
            Some(FileMatches {
                file_path: path.to_string_lossy().to_string(),
                matches,
            })
        })
        .collect();
    results.sort_by(|a, b| a.file_path.cmp(&b.file_path));

    match opts.format {
        OutputFormat::Json => println!("{}", json::format_search(&results)),
        OutputFormat::Terminal => println!("{}", terminal::format_search(&results)),
    }
    Ok(())
}
