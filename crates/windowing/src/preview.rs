//! 8-bit renderings of a slice for visualization
//!
//! The surrounding service stores these as PNGs next to the prediction payload;
//! encoding and disk I/O stay with the caller.

use crate::grid::RawGrid;
use crate::window::MultiChannelImage;
use image::{GrayImage, Luma, Rgb, RgbImage};

/// Truncating conversion of a [0, 1] value to a byte
#[inline]
fn to_byte(value: f32) -> u8 {
    // `as` saturates, so out-of-range and NaN inputs land on 0 or 255
    (value * 255.0) as u8
}

/// Render the uncalibrated slice with min-max normalization
///
/// A constant slice has no contrast to stretch and renders black.
#[must_use]
pub fn original_preview(grid: &RawGrid) -> GrayImage {
    let pixels = grid.pixels();
    let (height, width) = pixels.dim();

    let (min, max) = pixels
        .iter()
        .filter(|v| v.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        let raw = pixels[[y as usize, x as usize]];
        let normalized = if range > 0.0 { (raw - min) / range } else { 0.0 };
        Luma([to_byte(normalized)])
    })
}

/// Render a windowed stack as RGB (channel 0 = red, 1 = green, 2 = blue)
#[must_use]
pub fn processed_preview(image: &MultiChannelImage) -> RgbImage {
    let (height, width) = image.dim();
    let [red, green, blue] = image.channels();
    let (red, green, blue) = (red.values(), green.values(), blue.values());

    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let idx = [y as usize, x as usize];
        Rgb([to_byte(red[idx]), to_byte(green[idx]), to_byte(blue[idx])])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Calibration;
    use crate::window::{stack_channels, CANONICAL_WINDOWS};
    use ndarray::array;

    #[test]
    fn test_original_preview_stretches_contrast() {
        let grid = RawGrid::new(array![[100.0, 150.0], [200.0, 300.0]], Calibration::default())
            .unwrap();
        let preview = original_preview(&grid);

        assert_eq!(preview.dimensions(), (2, 2));
        assert_eq!(preview.get_pixel(0, 0)[0], 0);
        assert_eq!(preview.get_pixel(1, 0)[0], 63);
        assert_eq!(preview.get_pixel(0, 1)[0], 127);
        assert_eq!(preview.get_pixel(1, 1)[0], 255);
    }

    #[test]
    fn test_constant_slice_renders_black() {
        let grid = RawGrid::new(array![[7.0, 7.0, 7.0]], Calibration::default()).unwrap();
        let preview = original_preview(&grid);
        assert_eq!(preview.dimensions(), (3, 1));
        assert!(preview.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_processed_preview_channel_mapping() {
        // 40 HU: blood 0.33, brain 0.5, bone 0.3
        let grid = RawGrid::new(array![[40.0], [-2000.0]], Calibration::default()).unwrap();
        let image = stack_channels(&grid, &CANONICAL_WINDOWS).unwrap();
        let preview = processed_preview(&image);

        assert_eq!(preview.dimensions(), (1, 2));
        let Rgb([r, g, b]) = *preview.get_pixel(0, 0);
        assert_eq!(r, (72.5f32 / 215.0 * 255.0) as u8);
        assert_eq!(g, 127);
        assert_eq!(b, (840.0f32 / 2800.0 * 255.0) as u8);
        assert_eq!(*preview.get_pixel(0, 1), Rgb([0, 0, 0]));
    }
}
