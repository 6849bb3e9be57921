//! CLI configuration file (YAML)
//!
//! ```yaml
//! preprocess:
//!   input_size: 256
//! ensemble:
//!   include_voting: true
//! ```

use anyhow::{Context as _, Result};
use ich_ensemble::EnsembleConfig;
use ich_windowing::PreprocessConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub preprocess: PreprocessConfig,
    pub ensemble: EnsembleConfig,
}

impl PipelineConfig {
    /// Load from `path`, or use defaults when no path was given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config
            .preprocess
            .validate()
            .with_context(|| format!("Invalid preprocessing config: {}", path.display()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_path_uses_defaults() {
        assert_eq!(PipelineConfig::load(None).unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ensemble:\n  include_voting: false").unwrap();

        let config = PipelineConfig::load(Some(file.path())).unwrap();
        assert!(!config.ensemble.include_voting);
        assert_eq!(config.preprocess, PreprocessConfig::default());
    }

    #[test]
    fn test_invalid_window_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "preprocess:\n  windows:\n    - {{ name: a, level: 1.0, width: 1.0 }}\n    - {{ name: b, level: 1.0, width: -5.0 }}\n    - {{ name: c, level: 1.0, width: 1.0 }}"
        )
        .unwrap();

        assert!(PipelineConfig::load(Some(file.path())).is_err());
    }
}
