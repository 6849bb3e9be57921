//! Combine per-classifier probabilities

use crate::commands::print_json;
use crate::input::{load_model_outputs, ModelOutput};
use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use ich_ensemble::{combine_mean_results, combine_vote, display_name, ClassifierResult, EnsembleResult};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CombineMethod {
    Mean,
    Vote,
    Both,
}

#[derive(Args)]
pub struct CombineCommand {
    /// Predictions JSON: [{"name": "model_a", "probabilities": [6 values]}, ...]
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Combination rule
    #[arg(short, long, value_enum, default_value = "both")]
    method: CombineMethod,
}

#[derive(Debug, Serialize)]
pub struct CombineReport {
    pub models: Vec<ClassifierResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ensemble: Option<EnsembleResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voting: Option<EnsembleResult>,
}

impl CombineCommand {
    pub fn execute(self) -> Result<()> {
        let outputs = load_model_outputs(&self.input)?;
        let report = combine(outputs, self.method)?;

        info!(
            "Combined {} classifier outputs ({:?})",
            report.models.len(),
            self.method
        );
        print_json(&report)
    }
}

pub fn combine(outputs: Vec<ModelOutput>, method: CombineMethod) -> Result<CombineReport> {
    let models = outputs
        .into_iter()
        .map(|output| {
            ClassifierResult::from_probabilities(display_name(&output.name), &output.probabilities)
                .with_context(|| format!("Invalid output from {}", output.name))
        })
        .collect::<Result<Vec<_>>>()?;

    let ensemble = match method {
        CombineMethod::Mean | CombineMethod::Both => {
            Some(combine_mean_results(&models).context("Mean ensemble failed")?)
        }
        CombineMethod::Vote => None,
    };
    let voting = match method {
        CombineMethod::Vote | CombineMethod::Both => {
            Some(combine_vote(&models).context("Voting ensemble failed")?)
        }
        CombineMethod::Mean => None,
    };

    Ok(CombineReport {
        models,
        ensemble,
        voting,
    })
}
