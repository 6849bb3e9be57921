//! Run several classifiers on one prepared slice and combine their outputs

use crate::classifier::{display_name, Classifier};
use crate::combine::{combine_mean_results, combine_vote};
use crate::result::{ClassifierResult, EnsembleResult};
use ich_common::{IchError, Result};
use ndarray::ArrayView3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Configuration for a prediction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Also compute the majority-vote ensemble
    pub include_voting: bool,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            include_voting: true,
        }
    }
}

/// Every classifier's result plus the combined results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    /// Per-classifier results, in the order the classifiers were given
    pub models: Vec<ClassifierResult>,
    /// Mean ensemble
    pub ensemble: EnsembleResult,
    /// Majority-vote ensemble, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voting: Option<EnsembleResult>,
}

/// Run every classifier on `input` and combine the results
///
/// Classifiers run in parallel; results keep the order of `classifiers`. Any
/// non-empty subset of the available classifiers is accepted.
///
/// # Errors
/// Returns `EmptyInput` with no classifiers, `ShapeMismatch` when `input` is not
/// `(height, width, 3)`, and a classifier failure or invalid output
pub fn predict_all<C>(
    classifiers: &[C],
    input: ArrayView3<'_, f32>,
    config: &EnsembleConfig,
) -> Result<PredictionReport>
where
    C: AsRef<dyn Classifier>,
    C: Sync,
{
    if classifiers.is_empty() {
        return Err(IchError::EmptyInput(
            "no classifiers available for prediction".to_string(),
        ));
    }

    let (height, width, channels) = input.dim();
    if channels != 3 || height == 0 || width == 0 {
        return Err(IchError::ShapeMismatch {
            context: "classifier input".to_string(),
            expected: "(height, width, 3)".to_string(),
            actual: format!("({}, {}, {})", height, width, channels),
        });
    }

    let start = Instant::now();

    let models = classifiers
        .par_iter()
        .map(|classifier| -> Result<ClassifierResult> {
            let classifier = classifier.as_ref();
            let probabilities = classifier.predict(input)?;
            let result =
                ClassifierResult::from_probabilities(display_name(classifier.name()), &probabilities)?;
            info!(
                "{}: {} hemorrhages detected",
                result.model_name,
                result.detected().len()
            );
            Ok(result)
        })
        .collect::<Result<Vec<_>>>()?;

    let ensemble = combine_mean_results(&models)?;
    info!(
        "Ensemble: {} hemorrhages detected",
        ensemble.detected().len()
    );

    let voting = if config.include_voting {
        Some(combine_vote(&models)?)
    } else {
        None
    };

    debug!(
        "Prediction run over {} classifiers took {:?}",
        models.len(),
        start.elapsed()
    );

    Ok(PredictionReport {
        models,
        ensemble,
        voting,
    })
}
