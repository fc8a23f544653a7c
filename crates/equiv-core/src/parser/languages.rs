use crate::model::language::{Language, JAVA};

/// A tree-sitter grammar the engine can parse with.
pub struct GrammarConfig {
    pub language: &'static Language,
    pub extensions: &'static [&'static str],
    pub get_language: fn() -> Option<tree_sitter::Language>,
}

fn get_java() -> Option<tree_sitter::Language> {
    Some(tree_sitter_java::LANGUAGE.into())
}

static JAVA_CONFIG: GrammarConfig = GrammarConfig {
    language: &JAVA,
    extensions: &[".java", ".jsh"],
    get_language: get_java,
};

static ALL_CONFIGS: &[&GrammarConfig] = &[&JAVA_CONFIG];

pub fn get_grammar_config(extension: &str) -> Option<&'static GrammarConfig> {
    ALL_CONFIGS
        .iter()
        .find(|c| c.extensions.contains(&extension))
        .copied()
}

pub fn get_grammar_for_language(language: &Language) -> Option<&'static GrammarConfig> {
    ALL_CONFIGS
        .iter()
        .find(|c| c.language == language)
        .copied()
}
