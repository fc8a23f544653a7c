use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::EquivError;

/// Knobs for the equivalence engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Require variable names (entries with the `VariableName` role) to match textually.
    pub distinguish_variables: bool,
    /// Require function names (entries with the `FunctionName` role) to match textually.
    pub distinguish_functions: bool,
    /// Require literals to have equal values. When off, any literal matches any literal.
    pub distinguish_literals: bool,
    /// Give up on a comparison once the accumulated node cost exceeds this.
    pub max_cost: Option<u32>,
    /// Search results whose subtree cost is below this are dropped.
    pub min_match_cost: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            distinguish_variables: true,
            distinguish_functions: true,
            distinguish_literals: true,
            max_cost: None,
            min_match_cost: 0,
        }
    }
}

impl EngineConfig {
    /// Duplicate-detection preset: names and literal values are anonymized.
    pub fn anonymized() -> Self {
        Self {
            distinguish_variables: false,
            distinguish_functions: false,
            distinguish_literals: false,
            ..Self::default()
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, EquivError> {
        Ok(toml::from_str(contents)?)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("equiv.toml")
}

/// Load the engine config, falling back to defaults when the file does not exist.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, EquivError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(EngineConfig::default());
    }

    let contents = std::fs::read_to_string(&path)?;
    EngineConfig::from_toml(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("equiv.toml");
        fs::write(&path, "distinguish_literals = false\nmax_cost = 40\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert!(!config.distinguish_literals);
        assert!(config.distinguish_variables);
        assert_eq!(config.max_cost, Some(40));
        assert_eq!(config.min_match_cost, 0);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("equiv.toml");
        fs::write(&path, "max_cost = \"lots\"\n").unwrap();
        assert!(matches!(load_config(Some(&path)), Err(EquivError::Config(_))));
    }

    #[test]
    fn test_anonymized_preset() {
        let config = EngineConfig::anonymized();
        assert!(!config.distinguish_variables);
        assert!(!config.distinguish_functions);
        assert!(!config.distinguish_literals);
        assert_eq!(config.max_cost, None);
    }
}
