pub mod compare;
pub mod cost;
pub mod search;

use std::path::Path;

use anyhow::{anyhow, Context};
use equiv_core::model::language::find_language;
use equiv_core::parser::{parse_file_content, parse_source};
use equiv_core::SyntaxTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Self {
        match s {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Terminal,
        }
    }
}

/// Read and parse a file, by explicit language id or by extension.
pub fn load_tree(path: &Path, language: Option<&str>) -> anyhow::Result<SyntaxTree> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let tree = match language {
        Some(id) => {
            let language = find_language(id).ok_or_else(|| anyhow!("unknown language '{id}'"))?;
            parse_source(language, &content)
        }
        None => parse_file_content(&path.to_string_lossy(), &content),
    };
    tree.with_context(|| format!("failed to parse {}", path.display()))
}
