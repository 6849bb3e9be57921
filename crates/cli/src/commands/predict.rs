//! Run ONNX classifiers on a decoded slice (feature `onnx`)

use crate::commands::print_json;
use crate::config::PipelineConfig;
use crate::input::SliceInput;
use anyhow::{Context as _, Result};
use clap::Args;
use ich_ensemble::{predict_all, Classifier, OnnxClassifier};
use ich_windowing::prepare_slice;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args)]
pub struct PredictCommand {
    /// Decoded slice JSON
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Classifier as NAME=PATH (repeatable), e.g. model_a=models/model_a.onnx
    #[arg(short, long = "model", value_name = "NAME=PATH", required = true)]
    models: Vec<String>,

    /// Pipeline configuration (YAML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn parse_model_arg(arg: &str) -> Result<(String, PathBuf)> {
    let (name, path) = arg
        .split_once('=')
        .with_context(|| format!("Expected NAME=PATH, got '{}'", arg))?;
    anyhow::ensure!(!name.is_empty(), "Empty model name in '{}'", arg);
    Ok((name.to_string(), PathBuf::from(path)))
}

impl PredictCommand {
    pub fn execute(self) -> Result<()> {
        let config = PipelineConfig::load(self.config.as_deref())?;

        // Models that fail to load are skipped; any loaded subset is usable
        let mut classifiers: Vec<Box<dyn Classifier>> = Vec::new();
        for arg in &self.models {
            let (name, path) = parse_model_arg(arg)?;
            match OnnxClassifier::from_file(name.clone(), &path) {
                Ok(classifier) => classifiers.push(Box::new(classifier)),
                Err(e) => warn!("Skipping {}: {}", name, e),
            }
        }
        anyhow::ensure!(!classifiers.is_empty(), "No classifiers could be loaded");
        info!("{} classifiers loaded", classifiers.len());

        let grid = SliceInput::load(&self.input)?.into_grid()?;
        let prepared = prepare_slice(&grid, &config.preprocess).context("Preprocessing failed")?;

        let report = predict_all(&classifiers, prepared.model_input.view(), &config.ensemble)
            .context("Prediction failed")?;
        print_json(&report)
    }
}
