//! Intracranial hemorrhage detection pipeline
//!
//! Facade over the workspace crates:
//!
//! - [`common`]: labels, thresholds and the shared error type
//! - [`windowing`]: HU windowing, RGB stacking and resizing of CT slices
//! - [`ensemble`]: per-classifier results and mean/vote combination
//!
//! ```rust
//! use ich_detect::prelude::*;
//! use ndarray::Array2;
//!
//! let grid = RawGrid::new(Array2::from_elem((32, 32), 1064.0), Calibration::new(-1024.0, 1.0, false))?;
//! let prepared = prepare_slice(&grid, &PreprocessConfig::default())?;
//!
//! let flat = FnClassifier::new("Model A", |_input: ndarray::ArrayView3<'_, f32>| Ok(vec![0.7, 0.1, 0.1, 0.6, 0.0, 0.0]));
//! let classifiers: Vec<Box<dyn Classifier>> = vec![Box::new(flat)];
//! let report = predict_all(&classifiers, prepared.model_input.view(), &EnsembleConfig::default())?;
//! assert!(report.ensemble.is_detected(HemorrhageLabel::Subarachnoid));
//! # Ok::<(), ich_detect::common::IchError>(())
//! ```

pub use ich_common as common;
pub use ich_ensemble as ensemble;
pub use ich_windowing as windowing;

/// Commonly used types from every crate
pub mod prelude {
    pub use ich_common::{HemorrhageLabel, IchError, LabelMap, Result};
    pub use ich_ensemble::{
        combine_mean, combine_mean_results, combine_vote, predict_all, Classifier,
        ClassifierResult, EnsembleConfig, EnsembleMethod, EnsembleResult, FnClassifier,
        PredictionReport,
    };
    pub use ich_windowing::{
        prepare_slice, stack_channels, Calibration, MultiChannelImage, PreparedSlice,
        PreprocessConfig, RawGrid, WindowSpec,
    };
}
