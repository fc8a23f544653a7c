use std::path::PathBuf;

use equiv_core::config::EngineConfig;
use equiv_core::{create_default_registry, ChildRole, EquivalenceEngine, ProviderRegistry, SyntaxTree};

use super::{load_tree, OutputFormat};
use crate::formatters::{json, terminal};

pub struct CostOptions {
    pub file: PathBuf,
    pub language: Option<String>,
    pub format: OutputFormat,
    pub config: EngineConfig,
}

pub struct FunctionCost {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub cost: u32,
}

pub struct CostReport {
    pub file_path: String,
    pub total: u32,
    pub functions: Vec<FunctionCost>,
}

pub fn cost_command(opts: CostOptions) -> anyhow::Result<()> {
    let tree = load_tree(&opts.file, opts.language.as_deref())?;
    let registry = create_default_registry();
    let engine = EquivalenceEngine::with_config(&registry, opts.config);

    let report = CostReport {
        file_path: opts.file.to_string_lossy().to_string(),
        total: engine.subtree_cost(tree.root()),
        functions: function_costs(&tree, &registry, &engine),
    };

    match opts.format {
        OutputFormat::Json => println!("{}", json::format_cost(&report)),
        OutputFormat::Terminal => println!("{}", terminal::format_cost(&report)),
    }
    Ok(())
}

/// Every node whose descriptor names a function, with its subtree cost.
fn function_costs(tree: &SyntaxTree, registry: &ProviderRegistry, engine: &EquivalenceEngine) -> Vec<FunctionCost> {
    tree.root()
        .descendants()
        .filter_map(|node| {
            let descriptor = registry.get_provider(node)?.build_descriptor(node)?;
            let name = descriptor
                .entries()
                .iter()
                .find(|e| e.role == ChildRole::FunctionName)?
                .node;
            Some(FunctionCost {
                name: name.text().to_string(),
                start_line: node.start_line(),
                end_line: node.end_line(),
                cost: engine.subtree_cost(node),
            })
        })
        .collect()
}
