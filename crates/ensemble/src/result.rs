//! Per-classifier and combined prediction results

use ich_common::{
    round_confidence, HemorrhageLabel, IchError, LabelMap, Result, CONFIDENCE_SCALE,
    DETECTION_THRESHOLD, LABEL_COUNT,
};
use serde::{Serialize, Serializer};

/// Labels whose probability reaches the detection threshold, in label order
pub(crate) fn labels_at_threshold(probabilities: &LabelMap<f64>) -> Vec<HemorrhageLabel> {
    probabilities
        .iter()
        .filter(|&(_, &p)| p >= DETECTION_THRESHOLD)
        .map(|(label, _)| label)
        .collect()
}

/// Unrounded 0-100 confidences
fn to_confidences(probabilities: &LabelMap<f64>) -> LabelMap<f64> {
    probabilities.map(|p| p * CONFIDENCE_SCALE)
}

/// Confidences rounded to two decimals, the form shown to users
fn serialize_display_confidences<S: Serializer>(
    probabilities: &LabelMap<f64>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    to_confidences(probabilities)
        .map(|c| round_confidence(*c))
        .serialize(serializer)
}

/// Check one classifier output vector
///
/// # Errors
/// Returns `ShapeMismatch` for a vector that is not one value per label and
/// `DomainViolation` for values that are not probabilities
pub(crate) fn validate_probabilities(source: &str, probabilities: &[f32]) -> Result<()> {
    if probabilities.len() != LABEL_COUNT {
        return Err(IchError::ShapeMismatch {
            context: source.to_string(),
            expected: format!("{} probabilities", LABEL_COUNT),
            actual: format!("{} probabilities", probabilities.len()),
        });
    }

    if let Some((i, p)) = probabilities
        .iter()
        .enumerate()
        .find(|(_, p)| !(0.0..=1.0).contains(*p))
    {
        return Err(IchError::DomainViolation(format!(
            "{}: probability for '{}' is {} (expected 0.0-1.0)",
            source,
            HemorrhageLabel::ALL[i],
            p
        )));
    }

    Ok(())
}

/// Predictions from a single classifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierResult {
    pub model_name: String,
    /// Raw model output, authoritative for thresholding
    #[serde(rename = "confidences", serialize_with = "serialize_f32_confidences")]
    probabilities: LabelMap<f32>,
    detected: Vec<HemorrhageLabel>,
}

fn serialize_f32_confidences<S: Serializer>(
    probabilities: &LabelMap<f32>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serialize_display_confidences(&probabilities.map(|&p| f64::from(p)), serializer)
}

impl ClassifierResult {
    /// Format one classifier's output vector
    ///
    /// # Errors
    /// Returns `ShapeMismatch` when the vector length differs from the label count
    /// and `DomainViolation` when a value lies outside [0, 1] or is not finite
    pub fn from_probabilities(model_name: impl Into<String>, probabilities: &[f32]) -> Result<Self> {
        let model_name = model_name.into();
        validate_probabilities(&model_name, probabilities)?;

        let probabilities = LabelMap::from_fn(|label| probabilities[label.index()]);
        let detected = labels_at_threshold(&probabilities.map(|&p| f64::from(p)));

        Ok(Self {
            model_name,
            probabilities,
            detected,
        })
    }

    /// Raw probabilities in label order
    #[must_use]
    pub fn probabilities(&self) -> &LabelMap<f32> {
        &self.probabilities
    }

    /// Unrounded confidence (0-100) for one label
    #[must_use]
    pub fn confidence(&self, label: HemorrhageLabel) -> f64 {
        f64::from(self.probabilities[label]) * CONFIDENCE_SCALE
    }

    /// Unrounded confidences (0-100) for every label
    #[must_use]
    pub fn confidences(&self) -> LabelMap<f64> {
        to_confidences(&self.probabilities.map(|&p| f64::from(p)))
    }

    /// Labels at or above the detection threshold, in label order
    #[must_use]
    pub fn detected(&self) -> &[HemorrhageLabel] {
        &self.detected
    }

    #[must_use]
    pub fn is_detected(&self, label: HemorrhageLabel) -> bool {
        self.detected.contains(&label)
    }
}

/// How an ensemble result was combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnsembleMethod {
    /// Mean probability per label, detected at >= 0.5
    Mean,
    /// Strict majority of per-classifier detections
    Voting,
}

impl EnsembleMethod {
    /// Name reported in the `model_name` field
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            EnsembleMethod::Mean => "Ensemble (Mean)",
            EnsembleMethod::Voting => "Ensemble (Voting)",
        }
    }
}

/// Predictions combined from several classifiers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleResult {
    pub model_name: String,
    pub method: EnsembleMethod,
    /// Mean probability per label across classifiers
    #[serde(rename = "confidences", serialize_with = "serialize_display_confidences")]
    pub(crate) probabilities: LabelMap<f64>,
    pub(crate) detected: Vec<HemorrhageLabel>,
    /// Per-label detection votes (voting only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) vote_counts: Option<LabelMap<usize>>,
    /// Number of classifiers combined
    pub num_models: usize,
}

impl EnsembleResult {
    pub(crate) fn new(
        method: EnsembleMethod,
        probabilities: LabelMap<f64>,
        detected: Vec<HemorrhageLabel>,
        vote_counts: Option<LabelMap<usize>>,
        num_models: usize,
    ) -> Self {
        Self {
            model_name: method.display_name().to_string(),
            method,
            probabilities,
            detected,
            vote_counts,
            num_models,
        }
    }

    /// Mean probabilities in label order
    #[must_use]
    pub fn probabilities(&self) -> &LabelMap<f64> {
        &self.probabilities
    }

    /// Unrounded mean confidence (0-100) for one label
    #[must_use]
    pub fn confidence(&self, label: HemorrhageLabel) -> f64 {
        self.probabilities[label] * CONFIDENCE_SCALE
    }

    /// Unrounded mean confidences (0-100) for every label
    #[must_use]
    pub fn confidences(&self) -> LabelMap<f64> {
        to_confidences(&self.probabilities)
    }

    /// Labels the combination rule detected, in label order
    #[must_use]
    pub fn detected(&self) -> &[HemorrhageLabel] {
        &self.detected
    }

    #[must_use]
    pub fn is_detected(&self, label: HemorrhageLabel) -> bool {
        self.detected.contains(&label)
    }

    /// Votes per label, present only for [`EnsembleMethod::Voting`]
    #[must_use]
    pub fn vote_counts(&self) -> Option<&LabelMap<usize>> {
        self.vote_counts.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_from_probabilities_thresholds_inclusive() {
        let result =
            ClassifierResult::from_probabilities("Model A", &[0.5, 0.4999, 0.9, 0.0, 1.0, 0.1])
                .unwrap();

        assert_eq!(
            result.detected(),
            &[
                HemorrhageLabel::Any,
                HemorrhageLabel::Intraventricular,
                HemorrhageLabel::Subdural
            ]
        );
        assert!(result.is_detected(HemorrhageLabel::Any));
        assert!(!result.is_detected(HemorrhageLabel::Intraparenchymal));
        assert_abs_diff_eq!(result.confidence(HemorrhageLabel::Intraventricular), 90.0, epsilon = 1e-4);
    }

    #[test]
    fn test_from_probabilities_rejects_bad_vectors() {
        let short = ClassifierResult::from_probabilities("Model A", &[0.1, 0.2]);
        assert!(matches!(short, Err(IchError::ShapeMismatch { .. })));

        let nan = ClassifierResult::from_probabilities("Model A", &[0.1, f32::NAN, 0.1, 0.1, 0.1, 0.1]);
        assert!(matches!(nan, Err(IchError::DomainViolation(_))));

        let over = ClassifierResult::from_probabilities("Model A", &[0.1, 0.1, 1.5, 0.1, 0.1, 0.1]);
        assert!(matches!(over, Err(IchError::DomainViolation(_))));
    }

    #[test]
    fn test_classifier_result_payload_shape() {
        let result =
            ClassifierResult::from_probabilities("Model B", &[0.123456, 0.0, 0.0, 0.0, 0.75, 0.0])
                .unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["model_name"], "Model B");
        assert_eq!(json["confidences"]["Any ICH"], 12.35);
        assert_eq!(json["confidences"]["Subdural"], 75.0);
        assert_eq!(json["detected"], serde_json::json!(["Subdural"]));
    }

    #[test]
    fn test_rounding_does_not_affect_detection() {
        // 49.996 displays as 50.0 but stays below the threshold
        let result =
            ClassifierResult::from_probabilities("Model C", &[0.49996, 0.0, 0.0, 0.0, 0.0, 0.0])
                .unwrap();
        assert!(result.detected().is_empty());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["confidences"]["Any ICH"], 50.0);
    }
}
