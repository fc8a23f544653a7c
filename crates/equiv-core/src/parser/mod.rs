//! Parsing source text into `SyntaxTree`s with the registered tree-sitter grammars.

mod languages;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use crate::error::EquivError;
use crate::model::language::Language;
use crate::model::tree::SyntaxTree;
pub use languages::{get_grammar_config, get_grammar_for_language, GrammarConfig};

// Thread-local parser cache: one Parser per language per thread.
thread_local! {
    static PARSER_CACHE: RefCell<HashMap<&'static str, tree_sitter::Parser>> = RefCell::new(HashMap::new());
}

pub fn parse_source(language: &'static Language, content: &str) -> Result<SyntaxTree, EquivError> {
    let config = get_grammar_for_language(language)
        .ok_or_else(|| EquivError::UnsupportedLanguage(language.id.to_string()))?;
    parse_with(config, content)
}

/// Pick the grammar from the file extension.
pub fn parse_file_content(file_path: &str, content: &str) -> Result<SyntaxTree, EquivError> {
    let ext = Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();
    let config = get_grammar_config(&ext)
        .ok_or_else(|| EquivError::UnsupportedLanguage(file_path.to_string()))?;
    parse_with(config, content)
}

pub fn supports_file(file_path: &str) -> bool {
    Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| get_grammar_config(&format!(".{}", e.to_lowercase())).is_some())
}

fn parse_with(config: &'static GrammarConfig, content: &str) -> Result<SyntaxTree, EquivError> {
    let id = config.language.id;
    let grammar = (config.get_language)().ok_or_else(|| EquivError::Grammar(id.to_string()))?;

    PARSER_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        let parser = match cache.entry(id) {
            std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::hash_map::Entry::Vacant(e) => {
                let mut p = tree_sitter::Parser::new();
                p.set_language(&grammar)
                    .map_err(|_| EquivError::Grammar(id.to_string()))?;
                e.insert(p)
            }
        };

        let tree = parser
            .parse(content.as_bytes(), None)
            .ok_or_else(|| EquivError::Parse(id.to_string()))?;
        Ok(SyntaxTree::from_tree_sitter(&tree, content, config.language))
    })
}
