//! JSON input documents
//!
//! Detector decoding happens upstream; the CLI consumes its output as JSON.

use anyhow::{Context as _, Result};
use ich_windowing::{Calibration, RawGrid};
use serde::Deserialize;
use std::path::Path;

/// A decoded slice: stored pixel rows plus rescale metadata
#[derive(Debug, Deserialize)]
pub struct SliceInput {
    pub pixels: Vec<Vec<f32>>,
    #[serde(default)]
    pub intercept: Option<f32>,
    #[serde(default)]
    pub slope: Option<f32>,
    #[serde(default)]
    pub photometric_interpretation: Option<String>,
}

impl SliceInput {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read slice: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse slice JSON: {}", path.display()))
    }

    pub fn into_grid(self) -> Result<RawGrid> {
        let calibration = Calibration::from_metadata(
            self.intercept,
            self.slope,
            self.photometric_interpretation.as_deref().unwrap_or_default(),
        );
        RawGrid::from_rows(&self.pixels, calibration).context("Invalid pixel grid")
    }
}

/// One classifier's raw output
#[derive(Debug, Deserialize)]
pub struct ModelOutput {
    pub name: String,
    pub probabilities: Vec<f32>,
}

pub fn load_model_outputs(path: &Path) -> Result<Vec<ModelOutput>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read predictions: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse predictions JSON: {}", path.display()))
}
