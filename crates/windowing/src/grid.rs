//! Decoded slice intensities and their linear calibration

use ich_common::{IchError, Result};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Photometric interpretation whose display polarity is inverted
pub const INVERTED_PHOTOMETRIC: &str = "MONOCHROME1";

/// Linear calibration from stored detector values to physical units (HU)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Rescale intercept
    pub intercept: f32,
    /// Rescale slope
    pub slope: f32,
    /// Invert normalized output (higher stored value = darker)
    pub invert: bool,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            intercept: 0.0,
            slope: 1.0,
            invert: false,
        }
    }
}

impl Calibration {
    pub fn new(intercept: f32, slope: f32, invert: bool) -> Self {
        Self {
            intercept,
            slope,
            invert,
        }
    }

    /// Build a calibration from optional decoder metadata
    ///
    /// A missing intercept defaults to 0, a missing slope to 1, and the output is
    /// inverted only for `MONOCHROME1` slices.
    pub fn from_metadata(
        intercept: Option<f32>,
        slope: Option<f32>,
        photometric_interpretation: &str,
    ) -> Self {
        Self {
            intercept: intercept.unwrap_or(0.0),
            slope: slope.unwrap_or(1.0),
            invert: photometric_interpretation.trim() == INVERTED_PHOTOMETRIC,
        }
    }

    /// Convert one stored value to physical units
    #[inline]
    #[must_use]
    pub fn apply(&self, raw: f32) -> f32 {
        raw * self.slope + self.intercept
    }
}

/// Raw slice intensities plus the calibration that applies to every pixel
#[derive(Debug, Clone)]
pub struct RawGrid {
    pixels: Array2<f32>,
    calibration: Calibration,
}

impl RawGrid {
    /// Wrap a decoded `(height, width)` intensity array
    ///
    /// # Errors
    /// Returns `EmptyInput` when either dimension is zero
    pub fn new(pixels: Array2<f32>, calibration: Calibration) -> Result<Self> {
        let (height, width) = pixels.dim();
        if height == 0 || width == 0 {
            return Err(IchError::EmptyInput(format!(
                "raw grid has zero extent ({}x{})",
                width, height
            )));
        }

        Ok(Self {
            pixels,
            calibration,
        })
    }

    /// Build a grid from row vectors, as produced by JSON decoders
    ///
    /// # Errors
    /// Returns `ShapeMismatch` for ragged rows and `EmptyInput` for an empty grid
    pub fn from_rows(rows: &[Vec<f32>], calibration: Calibration) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        if let Some((y, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(IchError::ShapeMismatch {
                context: format!("raw grid row {}", y),
                expected: format!("{} columns", width),
                actual: format!("{} columns", row.len()),
            });
        }

        let flat: Vec<f32> = rows.iter().flatten().copied().collect();
        let pixels =
            Array2::from_shape_vec((height, width), flat).map_err(|e| IchError::ShapeMismatch {
                context: "raw grid".to_string(),
                expected: format!("{}x{} values", width, height),
                actual: e.to_string(),
            })?;

        Self::new(pixels, calibration)
    }

    #[must_use]
    pub fn pixels(&self) -> ArrayView2<'_, f32> {
        self.pixels.view()
    }

    #[must_use]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// `(height, width)`
    #[must_use]
    pub fn dim(&self) -> (usize, usize) {
        self.pixels.dim()
    }

    /// Calibrated (HU) values, elementwise `raw * slope + intercept`
    #[must_use]
    pub fn calibrated(&self) -> Array2<f32> {
        let calibration = self.calibration;
        self.pixels.mapv(|raw| calibration.apply(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_calibration_defaults_from_metadata() {
        let cal = Calibration::from_metadata(None, None, "MONOCHROME2");
        assert_eq!(cal, Calibration::default());

        let cal = Calibration::from_metadata(Some(-1024.0), Some(1.0), "MONOCHROME1");
        assert_eq!(cal.intercept, -1024.0);
        assert_eq!(cal.slope, 1.0);
        assert!(cal.invert);
    }

    #[test]
    fn test_calibrated_values() {
        let grid = RawGrid::new(
            array![[0.0, 1024.0], [1064.0, 2048.0]],
            Calibration::new(-1024.0, 1.0, false),
        )
        .unwrap();

        assert_eq!(grid.calibrated(), array![[-1024.0, 0.0], [40.0, 1024.0]]);
        assert_eq!(grid.dim(), (2, 2));
    }

    #[test]
    fn test_empty_grid_rejected() {
        let result = RawGrid::new(Array2::zeros((0, 4)), Calibration::default());
        assert!(matches!(result, Err(IchError::EmptyInput(_))));
    }

    #[test]
    fn test_from_rows() {
        let grid = RawGrid::from_rows(
            &[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
            Calibration::default(),
        )
        .unwrap();
        assert_eq!(grid.dim(), (2, 3));
        assert_eq!(grid.pixels()[[1, 2]], 6.0);

        let ragged = RawGrid::from_rows(&[vec![1.0, 2.0], vec![3.0]], Calibration::default());
        assert!(matches!(ragged, Err(IchError::ShapeMismatch { .. })));

        let empty = RawGrid::from_rows(&[], Calibration::default());
        assert!(matches!(empty, Err(IchError::EmptyInput(_))));
    }
}
