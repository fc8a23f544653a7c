//! Structural equivalence engine.
//!
//! Syntax trees are compared through per-language equivalence descriptors:
//! each provider says which children of a node take part in a comparison, in
//! what order and with what optionality, and which tokens are noise. The
//! engine walks two trees in lock-step using those descriptors and answers
//! whether they are equivalent (code vs code) or whether a search template
//! matches a piece of code (pattern vs code).

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod provider;
pub mod settings;

pub use config::EngineConfig;
pub use engine::matcher::{EquivalenceEngine, MatchMode, Verdict};
pub use error::EquivError;
pub use model::descriptor::{ChildRole, Descriptor, DescriptorBuilder, Optionality};
pub use model::language::Language;
pub use model::token_set::TokenSet;
pub use model::tree::{Node, SyntaxTree, TreeBuilder};
pub use provider::plugin::EquivalenceDescriptorProvider;
pub use provider::providers::create_default_registry;
pub use provider::registry::ProviderRegistry;
