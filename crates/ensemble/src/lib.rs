//! Ensemble combination of multi-label ICH classifier outputs
//!
//! Each classifier maps a prepared slice to one probability per
//! [`HemorrhageLabel`](ich_common::HemorrhageLabel). This crate formats those
//! outputs and merges them into a consensus.
//!
//! ## Combination rules
//!
//! 1. **Mean**: per-label arithmetic mean of the probabilities; a label is
//!    detected when the mean is `>= 0.5`
//! 2. **Voting**: each classifier first decides on its own (`>= 0.5`); a label is
//!    detected when strictly more than half the classifiers detected it, so an
//!    even split is reported as absent
//!
//! Confidences are reported on a 0-100 scale and rounded to two decimals only
//! when serialized.
//!
//! ## Example
//!
//! ```rust
//! use ich_common::HemorrhageLabel;
//! use ich_ensemble::{combine_mean, combine_vote, ClassifierResult};
//!
//! let outputs: [[f32; 6]; 3] = [
//!     [0.92, 0.10, 0.05, 0.61, 0.02, 0.01],
//!     [0.81, 0.55, 0.03, 0.40, 0.01, 0.02],
//!     [0.30, 0.20, 0.01, 0.47, 0.03, 0.00],
//! ];
//!
//! let mean = combine_mean(&outputs).unwrap();
//! assert_eq!(mean.detected(), &[HemorrhageLabel::Any]);
//!
//! let results: Vec<ClassifierResult> = outputs
//!     .iter()
//!     .enumerate()
//!     .map(|(i, p)| ClassifierResult::from_probabilities(format!("Model {}", i), p).unwrap())
//!     .collect();
//! let vote = combine_vote(&results).unwrap();
//! assert_eq!(vote.vote_counts().unwrap()[HemorrhageLabel::Subarachnoid], 1);
//! assert_eq!(vote.detected(), &[HemorrhageLabel::Any]);
//! ```

pub mod classifier;
pub mod combine;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod predict;
pub mod result;

pub use classifier::{display_name, Classifier, FnClassifier};
pub use combine::{combine_mean, combine_mean_results, combine_vote};
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use predict::{predict_all, EnsembleConfig, PredictionReport};
pub use result::{ClassifierResult, EnsembleMethod, EnsembleResult};
