use thiserror::Error;

#[derive(Error, Debug)]
pub enum EquivError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("failed to load grammar for {0}")]
    Grammar(String),
    #[error("parser produced no tree for {0}")]
    Parse(String),
    #[error("unbalanced tree: {0}")]
    UnbalancedTree(&'static str),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
}
