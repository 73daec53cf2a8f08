//! Editor configuration
//!
//! Defaults and limits used when components are created from the UI. The
//! host can override them with a YAML (or JSON) document, e.g.
//!
//! ```yaml
//! default_tuning: "D/A/D/G/A/d"
//! default_length: 32
//! max_length: 70
//! articulation_scaffold: "PM----"
//! ```

use serde::{Deserialize, Serialize};

use super::errors::{EditorError, EditorResult};
use super::stave::{is_articulation_char, DEFAULT_ARTICULATION_SCAFFOLD, DEFAULT_STAVE_LENGTH};
use super::tuning::Tuning;

/// Longest stave the resize handle will produce
pub const DEFAULT_MAX_LENGTH: usize = 70;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    /// Tuning of newly added staves, `/`-separated
    pub default_tuning: String,

    /// Column count of newly added staves
    pub default_length: usize,

    /// Upper bound applied by the resize controller
    pub max_length: usize,

    /// Initial content of a newly added articulation row
    pub articulation_scaffold: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_tuning: Tuning::standard().joined(),
            default_length: DEFAULT_STAVE_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            articulation_scaffold: DEFAULT_ARTICULATION_SCAFFOLD.to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_yaml(source: &str) -> EditorResult<Self> {
        let config: EditorConfig =
            serde_yaml::from_str(source).map_err(|e| EditorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(source: &str) -> EditorResult<Self> {
        let config: EditorConfig =
            serde_json::from_str(source).map_err(|e| EditorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EditorResult<()> {
        self.tuning()?;
        if self.default_length < 1 {
            return Err(EditorError::Config(format!(
                "default_length must be at least 1 (got {})",
                self.default_length
            )));
        }
        if self.max_length < self.default_length {
            return Err(EditorError::Config(format!(
                "max_length {} is smaller than default_length {}",
                self.max_length, self.default_length
            )));
        }
        if let Some(c) = self.articulation_scaffold.chars().find(|c| !is_articulation_char(*c)) {
            return Err(EditorError::Config(format!(
                "articulation_scaffold cannot contain {:?}",
                c
            )));
        }
        Ok(())
    }

    pub fn tuning(&self) -> EditorResult<Tuning> {
        Tuning::parse(&self.default_tuning).map_err(|e| EditorError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tuning().unwrap(), Tuning::standard());
        assert_eq!(config.default_length, 24);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = EditorConfig::from_yaml("default_tuning: \"D/A/D/G/A/d\"\ndefault_length: 32\n").unwrap();
        assert_eq!(config.default_length, 32);
        assert_eq!(config.max_length, DEFAULT_MAX_LENGTH);
        assert_eq!(config.tuning().unwrap().joined(), "D/A/D/G/A/d");
    }

    #[test]
    fn test_json_config() {
        let config = EditorConfig::from_json(r#"{"articulation_scaffold": "LR---"}"#).unwrap();
        assert_eq!(config.articulation_scaffold, "LR---");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(EditorConfig::from_yaml("default_tuning: EADGBE\n").is_err());
        assert!(EditorConfig::from_yaml("default_length: 0\n").is_err());
        assert!(EditorConfig::from_yaml("max_length: 10\n").is_err());
        assert!(EditorConfig::from_yaml("articulation_scaffold: \"PM--|\"\n").is_err());
    }
}
