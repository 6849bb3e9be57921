//! HU windowing: calibrate, clip to a window, normalize to [0, 1]
//!
//! Each [`WindowSpec`] selects a visibility range `[level - width/2, level + width/2]`
//! in Hounsfield units. Stacking three windows gives the pseudo-RGB image the
//! classifiers were trained on:
//! - Channel 0: blood window (level 75, width 215)
//! - Channel 1: brain window (level 40, width 80)
//! - Channel 2: bone window (level 600, width 2800)

use crate::grid::RawGrid;
use ich_common::{IchError, Result};
use ndarray::{Array2, Array3, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{debug, info};

/// Number of windows stacked into a model input
pub const CHANNEL_COUNT: usize = 3;

/// Blood / hemorrhage-sensitive window
pub const BLOOD_WINDOW: WindowSpec = WindowSpec::preset("blood", 75.0, 215.0);

/// Brain soft-tissue window
pub const BRAIN_WINDOW: WindowSpec = WindowSpec::preset("brain", 40.0, 80.0);

/// Bone / dense structure window
pub const BONE_WINDOW: WindowSpec = WindowSpec::preset("bone", 600.0, 2800.0);

/// Windows fixed at classifier training time, in channel order
pub const CANONICAL_WINDOWS: [WindowSpec; CHANNEL_COUNT] = [BLOOD_WINDOW, BRAIN_WINDOW, BONE_WINDOW];

/// A named window level/width pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub name: Cow<'static, str>,
    /// Window center (HU)
    pub level: f32,
    /// Window width (HU), must be > 0
    pub width: f32,
}

impl WindowSpec {
    /// Unvalidated spec for the compile-time presets below
    const fn preset(name: &'static str, level: f32, width: f32) -> Self {
        Self {
            name: Cow::Borrowed(name),
            level,
            width,
        }
    }

    /// Create a validated window spec
    ///
    /// # Errors
    /// Returns `InvalidWindowSpec` when width is not > 0 or either value is not finite
    pub fn new(name: impl Into<Cow<'static, str>>, level: f32, width: f32) -> Result<Self> {
        let spec = Self {
            name: name.into(),
            level,
            width,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check the width precondition of [`windowed_channel`]
    ///
    /// # Errors
    /// Returns `InvalidWindowSpec` when width is not > 0 or either value is not finite
    pub fn validate(&self) -> Result<()> {
        if !self.level.is_finite() || !self.width.is_finite() || self.width <= 0.0 {
            return Err(IchError::InvalidWindowSpec {
                name: self.name.to_string(),
                level: self.level,
                width: self.width,
            });
        }
        Ok(())
    }

    /// `(lower, upper)` bounds of the visibility range
    #[must_use]
    pub fn bounds(&self) -> (f32, f32) {
        let half = self.width / 2.0;
        (self.level - half, self.level + half)
    }
}

/// One windowed channel, values in [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedChannel {
    spec: WindowSpec,
    values: Array2<f32>,
}

impl NormalizedChannel {
    #[must_use]
    pub fn spec(&self) -> &WindowSpec {
        &self.spec
    }

    #[must_use]
    pub fn values(&self) -> ArrayView2<'_, f32> {
        self.values.view()
    }

    /// `(height, width)`
    #[must_use]
    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub(crate) fn from_parts(spec: WindowSpec, values: Array2<f32>) -> Self {
        Self { spec, values }
    }

    fn non_finite_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_finite()).count()
    }

    /// `(min, max)` over all values
    fn value_range(&self) -> (f32, f32) {
        self.values
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Apply one HU window to a raw grid
///
/// Calibrates with the grid's slope/intercept, clips into the window bounds,
/// rescales to [0, 1] and inverts when the calibration asks for it. The width is
/// not checked here: a zero width yields NaN values, which [`stack_channels`]
/// reports as a domain violation.
#[must_use]
pub fn windowed_channel(grid: &RawGrid, spec: &WindowSpec) -> NormalizedChannel {
    let calibration = *grid.calibration();
    let (lower, upper) = spec.bounds();
    let range = upper - lower;

    let values = grid.pixels().mapv(|raw| {
        let hu = calibration.apply(raw);
        // NaN falls through both comparisons and stays NaN
        let clipped = if hu < lower {
            lower
        } else if hu > upper {
            upper
        } else {
            hu
        };
        let normalized = (clipped - lower) / range;
        if calibration.invert {
            1.0 - normalized
        } else {
            normalized
        }
    });

    NormalizedChannel {
        spec: spec.clone(),
        values,
    }
}

/// Three windowed channels of identical shape, in window order
#[derive(Debug, Clone, PartialEq)]
pub struct MultiChannelImage {
    channels: [NormalizedChannel; CHANNEL_COUNT],
}

impl MultiChannelImage {
    /// Assemble an image from already windowed channels
    ///
    /// # Errors
    /// Returns `ShapeMismatch` when the channels differ in height or width
    pub fn from_channels(channels: [NormalizedChannel; CHANNEL_COUNT]) -> Result<Self> {
        let expected = channels[0].dim();
        for channel in &channels[1..] {
            if channel.dim() != expected {
                return Err(IchError::ShapeMismatch {
                    context: format!("channel '{}'", channel.spec.name),
                    expected: format!("{}x{}", expected.1, expected.0),
                    actual: format!("{}x{}", channel.dim().1, channel.dim().0),
                });
            }
        }
        Ok(Self { channels })
    }

    #[must_use]
    pub fn channels(&self) -> &[NormalizedChannel; CHANNEL_COUNT] {
        &self.channels
    }

    /// Channel `index` in window order, if it exists
    #[must_use]
    pub fn channel(&self, index: usize) -> Option<&NormalizedChannel> {
        self.channels.get(index)
    }

    /// `(height, width)` shared by all channels
    #[must_use]
    pub fn dim(&self) -> (usize, usize) {
        self.channels[0].dim()
    }

    /// Channels-last `(height, width, 3)` array, the layout classifiers consume
    #[must_use]
    pub fn to_hwc(&self) -> Array3<f32> {
        let (height, width) = self.dim();
        let mut hwc = Array3::zeros((height, width, CHANNEL_COUNT));
        for (c, channel) in self.channels.iter().enumerate() {
            hwc.index_axis_mut(Axis(2), c).assign(&channel.values);
        }
        hwc
    }

    /// `(min, max)` over every channel
    #[must_use]
    pub fn value_range(&self) -> (f32, f32) {
        self.channels
            .iter()
            .map(NormalizedChannel::value_range)
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), (l, h)| {
                (lo.min(l), hi.max(h))
            })
    }
}

/// Window a grid once per spec and stack the results in spec order
///
/// Every channel uses the grid's calibration.
///
/// # Errors
/// Returns `DomainViolation` when calibration yields NaN or infinite HU values
/// (non-finite pixels, a non-finite slope or intercept, f32 overflow) or when a
/// zero-width window leaves NaN in a channel
pub fn stack_channels(
    grid: &RawGrid,
    specs: &[WindowSpec; CHANNEL_COUNT],
) -> Result<MultiChannelImage> {
    // Clipping would turn +/-inf HU into a finite 0 or 1, so check before windowing
    let calibration = grid.calibration();
    let bad_hu = grid
        .pixels()
        .iter()
        .filter(|&&raw| !calibration.apply(raw).is_finite())
        .count();
    if bad_hu > 0 {
        return Err(IchError::DomainViolation(format!(
            "{} non-finite calibrated values (intercept={}, slope={})",
            bad_hu, calibration.intercept, calibration.slope
        )));
    }

    let channels = specs.each_ref().map(|spec| windowed_channel(grid, spec));

    for channel in &channels {
        let bad = channel.non_finite_count();
        if bad > 0 {
            return Err(IchError::DomainViolation(format!(
                "{} non-finite values in channel '{}' (level={}, width={}, intercept={}, slope={})",
                bad,
                channel.spec.name,
                channel.spec.level,
                channel.spec.width,
                calibration.intercept,
                calibration.slope
            )));
        }
        debug!(
            "Window '{}' applied: bounds={:?}",
            channel.spec.name,
            channel.spec.bounds()
        );
    }

    let image = MultiChannelImage::from_channels(channels)?;
    let (min, max) = image.value_range();
    let (height, width) = image.dim();
    info!(
        "RGB stack created: shape=({}, {}, {}), min={:.3}, max={:.3}",
        height, width, CHANNEL_COUNT, min, max
    );

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Calibration;
    use ndarray::array;

    fn identity_grid(values: Array2<f32>, invert: bool) -> RawGrid {
        RawGrid::new(values, Calibration::new(0.0, 1.0, invert)).unwrap()
    }

    #[test]
    fn test_canonical_windows() {
        assert_eq!(BLOOD_WINDOW.bounds(), (-32.5, 182.5));
        assert_eq!(BRAIN_WINDOW.bounds(), (0.0, 80.0));
        assert_eq!(BONE_WINDOW.bounds(), (-800.0, 2000.0));
        assert_eq!(CANONICAL_WINDOWS[1].name, "brain");
    }

    #[test]
    fn test_window_spec_validation() {
        assert!(WindowSpec::new("ok", 40.0, 80.0).is_ok());
        for width in [0.0, -10.0, f32::NAN, f32::INFINITY] {
            let err = WindowSpec::new("bad", 40.0, width).unwrap_err();
            assert!(matches!(err, IchError::InvalidWindowSpec { .. }));
        }
        assert!(WindowSpec::new("bad", f32::NAN, 80.0).is_err());
    }

    #[test]
    fn test_brain_window_known_values() {
        let grid = identity_grid(array![[0.0, 80.0, 120.0, -50.0, 40.0]], false);
        let channel = windowed_channel(&grid, &BRAIN_WINDOW);
        assert_eq!(channel.values(), array![[0.0, 1.0, 1.0, 0.0, 0.5]]);
    }

    #[test]
    fn test_level_maps_to_half() {
        for spec in &CANONICAL_WINDOWS {
            let grid = identity_grid(array![[spec.level]], false);
            assert_eq!(windowed_channel(&grid, spec).values()[[0, 0]], 0.5);
        }
    }

    #[test]
    fn test_bounds_map_to_extremes() {
        let (lower, upper) = BLOOD_WINDOW.bounds();
        let plain = windowed_channel(&identity_grid(array![[lower, upper]], false), &BLOOD_WINDOW);
        assert_eq!(plain.values(), array![[0.0, 1.0]]);

        let inverted =
            windowed_channel(&identity_grid(array![[lower, upper]], true), &BLOOD_WINDOW);
        assert_eq!(inverted.values(), array![[1.0, 0.0]]);
    }

    #[test]
    fn test_inversion_is_complement() {
        let raw = array![[-2000.0, -32.0, 0.0, 17.5], [75.0, 300.0, 1500.0, 4000.0]];
        for spec in &CANONICAL_WINDOWS {
            let plain = windowed_channel(&identity_grid(raw.clone(), false), spec);
            let inverted = windowed_channel(&identity_grid(raw.clone(), true), spec);
            assert_eq!(inverted.values(), plain.values().mapv(|v| 1.0 - v));
        }
    }

    #[test]
    fn test_calibration_applied_before_window() {
        // Stored 1064 with intercept -1024 is 40 HU, the brain window level
        let grid = RawGrid::new(array![[1064.0]], Calibration::new(-1024.0, 1.0, false)).unwrap();
        assert_eq!(windowed_channel(&grid, &BRAIN_WINDOW).values()[[0, 0]], 0.5);

        let grid = RawGrid::new(array![[20.0]], Calibration::new(0.0, 2.0, false)).unwrap();
        assert_eq!(windowed_channel(&grid, &BRAIN_WINDOW).values()[[0, 0]], 0.5);
    }

    #[test]
    fn test_zero_width_propagates_nan() {
        let spec = WindowSpec {
            name: Cow::Borrowed("degenerate"),
            level: 40.0,
            width: 0.0,
        };
        let grid = identity_grid(array![[40.0, 10.0]], false);
        let channel = windowed_channel(&grid, &spec);
        assert!(channel.values().iter().all(|v| v.is_nan()));

        let specs = [spec, BRAIN_WINDOW, BONE_WINDOW];
        let err = stack_channels(&grid, &specs).unwrap_err();
        assert!(matches!(err, IchError::DomainViolation(_)));
    }

    #[test]
    fn test_infinite_hu_is_reported() {
        let grid = identity_grid(array![[f32::NEG_INFINITY, 1.0]], false);
        let err = stack_channels(&grid, &CANONICAL_WINDOWS).unwrap_err();
        assert!(matches!(err, IchError::DomainViolation(_)));

        // Finite stored value, overflowing slope
        let grid = RawGrid::new(array![[3.0e38]], Calibration::new(0.0, 2.0, false)).unwrap();
        let err = stack_channels(&grid, &CANONICAL_WINDOWS).unwrap_err();
        assert!(matches!(err, IchError::DomainViolation(_)));
    }

    #[test]
    fn test_nan_pixels_are_reported() {
        let grid = identity_grid(array![[f32::NAN, 1.0]], false);
        let err = stack_channels(&grid, &CANONICAL_WINDOWS).unwrap_err();
        assert!(matches!(err, IchError::DomainViolation(_)));
    }

    #[test]
    fn test_stack_matches_individual_channels() {
        let grid = RawGrid::new(
            array![[0.0, 500.0, 1000.0], [1064.0, 1500.0, 3000.0]],
            Calibration::new(-1024.0, 1.0, false),
        )
        .unwrap();
        let image = stack_channels(&grid, &CANONICAL_WINDOWS).unwrap();

        for (i, spec) in CANONICAL_WINDOWS.iter().enumerate() {
            assert_eq!(image.channel(i).unwrap(), &windowed_channel(&grid, spec));
        }
        assert!(image.channel(3).is_none());

        let hwc = image.to_hwc();
        assert_eq!(hwc.dim(), (2, 3, 3));
        for c in 0..CHANNEL_COUNT {
            assert_eq!(hwc.index_axis(Axis(2), c), image.channels()[c].values());
        }

        let (min, max) = image.value_range();
        assert!(min >= 0.0 && max <= 1.0);
    }

    #[test]
    fn test_from_channels_rejects_mismatched_shapes() {
        let small = identity_grid(Array2::zeros((2, 2)), false);
        let large = identity_grid(Array2::zeros((2, 3)), false);
        let result = MultiChannelImage::from_channels([
            windowed_channel(&small, &BLOOD_WINDOW),
            windowed_channel(&large, &BRAIN_WINDOW),
            windowed_channel(&small, &BONE_WINDOW),
        ]);
        assert!(matches!(result, Err(IchError::ShapeMismatch { .. })));
    }
}
