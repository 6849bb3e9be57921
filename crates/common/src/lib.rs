/// Common types and utilities for ICH slice processing
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::ops::{Index, IndexMut};
use thiserror::Error;

/// Number of labels every classifier reports
pub const LABEL_COUNT: usize = 6;

/// Probability at or above which a label counts as detected (0.0-1.0 scale)
pub const DETECTION_THRESHOLD: f64 = 0.5;

/// Factor between a probability (0-1) and a displayed confidence (0-100)
pub const CONFIDENCE_SCALE: f64 = 100.0;

/// Processing errors
#[derive(Debug, Error)]
pub enum IchError {
    #[error("Invalid window spec '{name}': level={level}, width={width} (width must be finite and > 0)")]
    InvalidWindowSpec { name: String, level: f32, width: f32 },

    #[error("Shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: String,
        actual: String,
    },

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Domain violation: {0}")]
    DomainViolation(String),

    #[error("Classifier '{model}' failed: {reason}")]
    Classifier { model: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for IchError {
    fn from(err: serde_yaml::Error) -> Self {
        IchError::Config(err.to_string())
    }
}

/// Result type for processing operations
pub type Result<T> = std::result::Result<T, IchError>;

/// Intracranial hemorrhage labels, in the order every classifier emits them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HemorrhageLabel {
    #[serde(rename = "Any ICH")]
    Any,
    #[serde(rename = "Intraparenchymal")]
    Intraparenchymal,
    #[serde(rename = "Intraventricular")]
    Intraventricular,
    #[serde(rename = "Subarachnoid")]
    Subarachnoid,
    #[serde(rename = "Subdural")]
    Subdural,
    #[serde(rename = "Epidural")]
    Epidural,
}

impl HemorrhageLabel {
    /// All labels in canonical output order
    pub const ALL: [HemorrhageLabel; LABEL_COUNT] = [
        HemorrhageLabel::Any,
        HemorrhageLabel::Intraparenchymal,
        HemorrhageLabel::Intraventricular,
        HemorrhageLabel::Subarachnoid,
        HemorrhageLabel::Subdural,
        HemorrhageLabel::Epidural,
    ];

    /// Position of this label in classifier output vectors
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label name used in response payloads
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            HemorrhageLabel::Any => "Any ICH",
            HemorrhageLabel::Intraparenchymal => "Intraparenchymal",
            HemorrhageLabel::Intraventricular => "Intraventricular",
            HemorrhageLabel::Subarachnoid => "Subarachnoid",
            HemorrhageLabel::Subdural => "Subdural",
            HemorrhageLabel::Epidural => "Epidural",
        }
    }
}

impl std::fmt::Display for HemorrhageLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-order container holding one value per [`HemorrhageLabel`]
///
/// Positional alignment between classifiers is what the ensemble math relies on,
/// so values are addressed by label rather than by string key. Serializes as a map
/// from label name to value, in canonical label order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LabelMap<T>([T; LABEL_COUNT]);

impl<T> LabelMap<T> {
    /// Wrap values already laid out in canonical label order
    pub const fn new(values: [T; LABEL_COUNT]) -> Self {
        Self(values)
    }

    /// Build a map by evaluating `f` once per label, in label order
    pub fn from_fn(mut f: impl FnMut(HemorrhageLabel) -> T) -> Self {
        Self(HemorrhageLabel::ALL.map(&mut f))
    }

    /// Iterate `(label, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (HemorrhageLabel, &T)> {
        HemorrhageLabel::ALL.into_iter().zip(self.0.iter())
    }

    /// Values in canonical order
    #[must_use]
    pub fn values(&self) -> &[T; LABEL_COUNT] {
        &self.0
    }

    /// Apply `f` to every value, keeping label alignment
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> LabelMap<U> {
        LabelMap(std::array::from_fn(|i| f(&self.0[i])))
    }
}

impl<T> Index<HemorrhageLabel> for LabelMap<T> {
    type Output = T;

    fn index(&self, label: HemorrhageLabel) -> &T {
        &self.0[label.index()]
    }
}

impl<T> IndexMut<HemorrhageLabel> for LabelMap<T> {
    fn index_mut(&mut self, label: HemorrhageLabel) -> &mut T {
        &mut self.0[label.index()]
    }
}

impl<T: Serialize> Serialize for LabelMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(LABEL_COUNT))?;
        for (label, value) in self.iter() {
            map.serialize_entry(label.name(), value)?;
        }
        map.end()
    }
}

/// Round a displayed confidence to two decimal places
#[must_use]
pub fn round_confidence(confidence: f64) -> f64 {
    (confidence * 100.0).round() / 100.0
}
