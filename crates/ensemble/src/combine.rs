//! Mean and majority-vote combination of classifier outputs
//!
//! The two rules are computed independently and are allowed to disagree:
//! - Mean: average probability per label, detected at `>= 0.5`
//! - Voting: detected when strictly more than half of the classifiers detected
//!   the label on their own; an even split counts as absent

use crate::result::{
    labels_at_threshold, validate_probabilities, ClassifierResult, EnsembleMethod, EnsembleResult,
};
use ich_common::{IchError, LabelMap, Result};
use tracing::debug;

/// Arithmetic mean that does not depend on the order of `values`
///
/// Summing in sorted order makes the floating-point result identical for any
/// permutation of the classifiers.
fn order_independent_mean(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.iter().sum::<f64>() / values.len() as f64
}

/// Combine raw probability vectors by averaging each label
///
/// # Errors
/// Returns `EmptyInput` for zero vectors, `ShapeMismatch` for a vector that is not
/// one probability per label and `DomainViolation` for values outside [0, 1]
pub fn combine_mean<V: AsRef<[f32]>>(vectors: &[V]) -> Result<EnsembleResult> {
    if vectors.is_empty() {
        return Err(IchError::EmptyInput(
            "mean ensemble needs at least one classifier output".to_string(),
        ));
    }

    for (i, vector) in vectors.iter().enumerate() {
        validate_probabilities(&format!("classifier output {}", i), vector.as_ref())?;
    }

    let probabilities = LabelMap::from_fn(|label| {
        order_independent_mean(
            vectors
                .iter()
                .map(|v| f64::from(v.as_ref()[label.index()]))
                .collect(),
        )
    });
    let detected = labels_at_threshold(&probabilities);

    debug!(
        "Mean ensemble over {} classifiers: {} labels detected",
        vectors.len(),
        detected.len()
    );

    Ok(EnsembleResult::new(
        EnsembleMethod::Mean,
        probabilities,
        detected,
        None,
        vectors.len(),
    ))
}

/// Mean rule applied to already formatted classifier results
///
/// # Errors
/// Returns `EmptyInput` when `results` is empty
pub fn combine_mean_results(results: &[ClassifierResult]) -> Result<EnsembleResult> {
    let vectors: Vec<&[f32]> = results
        .iter()
        .map(|r| r.probabilities().values().as_slice())
        .collect();
    combine_mean(&vectors)
}

/// Combine classifier results by strict majority vote
///
/// Each classifier's own detection decision counts as one vote. The reported
/// confidence is the mean over all classifiers, whether or not they voted for
/// the label.
///
/// # Errors
/// Returns `EmptyInput` when `results` is empty
pub fn combine_vote(results: &[ClassifierResult]) -> Result<EnsembleResult> {
    if results.is_empty() {
        return Err(IchError::EmptyInput(
            "voting ensemble needs at least one classifier result".to_string(),
        ));
    }

    let num_models = results.len();
    let vote_counts =
        LabelMap::from_fn(|label| results.iter().filter(|r| r.is_detected(label)).count());
    let probabilities = LabelMap::from_fn(|label| {
        order_independent_mean(
            results
                .iter()
                .map(|r| f64::from(r.probabilities()[label]))
                .collect(),
        )
    });

    // votes > n / 2 without going through floating point
    let detected = vote_counts
        .iter()
        .filter(|&(_, &votes)| 2 * votes > num_models)
        .map(|(label, _)| label)
        .collect::<Vec<_>>();

    debug!(
        "Voting ensemble over {} classifiers: votes={:?}, {} labels detected",
        num_models,
        vote_counts.values(),
        detected.len()
    );

    Ok(EnsembleResult::new(
        EnsembleMethod::Voting,
        probabilities,
        detected,
        Some(vote_counts),
        num_models,
    ))
}
