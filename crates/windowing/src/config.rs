//! Preprocessing configuration (YAML)

use crate::resize::MODEL_INPUT_SIZE;
use crate::window::{WindowSpec, CANONICAL_WINDOWS, CHANNEL_COUNT};
use ich_common::{IchError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Configuration for slice preprocessing
///
/// The defaults reproduce the training-time setup exactly; changing them shifts
/// the classifiers' input distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Windows stacked into channels 0, 1, 2
    pub windows: [WindowSpec; CHANNEL_COUNT],
    /// Square classifier input edge length (pixels)
    pub input_size: u32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            windows: CANONICAL_WINDOWS,
            input_size: MODEL_INPUT_SIZE,
        }
    }
}

impl PreprocessConfig {
    /// Parse and validate a YAML document
    ///
    /// # Errors
    /// Returns `Config` for malformed YAML or a zero input size, and
    /// `InvalidWindowSpec` for a window with non-positive width
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    ///
    /// # Errors
    /// Returns `IoError` when the file cannot be read, otherwise as [`Self::from_yaml_str`]
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading preprocessing config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Check every window and the input size
    ///
    /// # Errors
    /// Returns the first invalid window, or `Config` for a zero input size
    pub fn validate(&self) -> Result<()> {
        for window in &self.windows {
            window.validate()?;
        }
        if self.input_size == 0 {
            return Err(IchError::Config("input_size must be > 0".to_string()));
        }
        Ok(())
    }
}
