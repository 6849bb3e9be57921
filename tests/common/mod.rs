//! Shared fixtures for integration tests

#![allow(dead_code)]

use ich_detect::prelude::*;
use ndarray::{Array2, ArrayView3};

/// Stored values spanning air to dense bone once rescaled with intercept -1024
pub fn ramp_grid(height: usize, width: usize) -> RawGrid {
    let pixels = Array2::from_shape_fn((height, width), |(y, x)| {
        ((y * width + x) * 4096 / (height * width)) as f32
    });
    RawGrid::new(pixels, Calibration::new(-1024.0, 1.0, false)).expect("valid grid")
}

/// Classifier that always reports `probabilities`
pub fn fixed_classifier(name: &str, probabilities: [f32; 6]) -> Box<dyn Classifier> {
    Box::new(FnClassifier::new(name, move |_: ArrayView3<'_, f32>| {
        Ok(probabilities.to_vec())
    }))
}

/// Classifier whose output depends on the mean intensity of its input
pub fn intensity_classifier(name: &str) -> Box<dyn Classifier> {
    Box::new(FnClassifier::new(name, |input: ArrayView3<'_, f32>| {
        let mean = input.mean().unwrap_or(0.0).clamp(0.0, 1.0);
        Ok(vec![mean, mean / 2.0, 0.0, 1.0 - mean, 0.25, 0.75])
    }))
}
