//! Multi-window HU preprocessing for ICH classifiers
//!
//! Turns a decoded CT slice (stored intensities plus rescale slope/intercept and
//! an inversion flag) into the pseudo-RGB input the hemorrhage classifiers were
//! trained on: three HU windows (blood, brain, bone) normalized to [0, 1],
//! stacked channels-last and resized bilinearly to 256x256.
//!
//! # Features
//! - Exact windowing: calibrate, clip, normalize, optional inversion
//! - Canonical training-time windows as constants
//! - OpenCV-compatible bilinear resize
//! - 8-bit previews of the original slice and the windowed stack
//! - YAML-configurable window set and input size
//!
//! # Example
//! ```
//! use ich_windowing::{prepare_slice, Calibration, PreprocessConfig, RawGrid};
//! use ndarray::Array2;
//!
//! # fn main() -> ich_common::Result<()> {
//! let pixels = Array2::from_elem((512, 512), 1064.0);
//! let grid = RawGrid::new(pixels, Calibration::new(-1024.0, 1.0, false))?;
//!
//! let prepared = prepare_slice(&grid, &PreprocessConfig::default())?;
//! assert_eq!(prepared.model_input.dim(), (256, 256, 3));
//! assert_eq!(prepared.model_input[[0, 0, 1]], 0.5);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod grid;
pub mod preview;
pub mod resize;
pub mod window;

pub use config::PreprocessConfig;
pub use grid::{Calibration, RawGrid};
pub use preview::{original_preview, processed_preview};
pub use resize::{resize_bilinear, resize_image, MODEL_INPUT_SIZE};
pub use window::{
    stack_channels, windowed_channel, MultiChannelImage, NormalizedChannel, WindowSpec,
    BLOOD_WINDOW, BONE_WINDOW, BRAIN_WINDOW, CANONICAL_WINDOWS, CHANNEL_COUNT,
};

use ich_common::Result;
use ndarray::{Array3, ArrayView4, Axis};
use tracing::info;

/// Output of the preprocessing pipeline for one slice
#[derive(Debug, Clone)]
pub struct PreparedSlice {
    /// Windowed stack at the slice's native resolution
    pub stacked: MultiChannelImage,
    /// Stack resized to the classifier input size
    pub resized: MultiChannelImage,
    /// `resized` laid out channels-last, `(input_size, input_size, 3)`
    pub model_input: Array3<f32>,
}

impl PreparedSlice {
    /// `model_input` with a leading batch axis, `(1, input_size, input_size, 3)`
    #[must_use]
    pub fn batched(&self) -> ArrayView4<'_, f32> {
        self.model_input.view().insert_axis(Axis(0))
    }
}

/// Window, stack and resize one slice
///
/// # Errors
/// Returns `InvalidWindowSpec`/`Config` for an invalid configuration and
/// `DomainViolation` when windowing produces non-finite values
pub fn prepare_slice(grid: &RawGrid, config: &PreprocessConfig) -> Result<PreparedSlice> {
    config.validate()?;

    let (height, width) = grid.dim();
    let calibration = grid.calibration();
    info!(
        "Preparing slice: shape=({}, {}), intercept={}, slope={}, invert={}",
        height, width, calibration.intercept, calibration.slope, calibration.invert
    );

    let stacked = stack_channels(grid, &config.windows)?;
    let resized = resize_image(&stacked, config.input_size, config.input_size)?;
    let model_input = resized.to_hwc();

    info!(
        "Slice prepared: model input shape={:?}",
        model_input.dim()
    );

    Ok(PreparedSlice {
        stacked,
        resized,
        model_input,
    })
}
