// Intentional ML conversions: pixel coordinates, image dimensions, interpolation
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

//! Bilinear resize of windowed channels to the classifier input size
//!
//! Matches the half-pixel-center bilinear interpolation the classifiers were
//! trained with (OpenCV `INTER_LINEAR`): output pixel `d` samples input position
//! `(d + 0.5) * scale - 0.5`, clamped to the edge pixels, and blends its two
//! neighbours per axis. Unlike a triangle filter, the kernel is not widened when
//! downsampling, so every output is a convex blend of at most four inputs and
//! stays in [0, 1].

use crate::window::{MultiChannelImage, NormalizedChannel};
use ich_common::{IchError, Result};
use ndarray::{Array2, ArrayView2};

/// Classifier input edge length
pub const MODEL_INPUT_SIZE: u32 = 256;

/// Source index and blend weight for each output coordinate along one axis
fn axis_taps(in_len: usize, out_len: usize) -> Vec<(usize, usize, f32)> {
    let scale = in_len as f64 / out_len as f64;
    let last = in_len - 1;

    (0..out_len)
        .map(|d| {
            let pos = (d as f64 + 0.5) * scale - 0.5;
            let floor = pos.floor();
            let mut frac = (pos - floor) as f32;
            let mut i0 = floor as isize;

            if i0 < 0 {
                i0 = 0;
                frac = 0.0;
            }
            let mut i0 = i0 as usize;
            if i0 >= last {
                i0 = last;
                frac = 0.0;
            }
            let i1 = (i0 + 1).min(last);
            (i0, i1, frac)
        })
        .collect()
}

/// Resize one 2D plane to `(out_height, out_width)`
#[must_use = "returns the resized plane"]
pub fn resize_bilinear(input: ArrayView2<'_, f32>, out_height: usize, out_width: usize) -> Array2<f32> {
    let (in_height, in_width) = input.dim();
    if in_height == 0 || in_width == 0 || out_height == 0 || out_width == 0 {
        return Array2::zeros((out_height, out_width));
    }

    let x_taps = axis_taps(in_width, out_width);
    let y_taps = axis_taps(in_height, out_height);

    Array2::from_shape_fn((out_height, out_width), |(y, x)| {
        let (y0, y1, fy) = y_taps[y];
        let (x0, x1, fx) = x_taps[x];

        let (a, b) = (input[[y0, x0]], input[[y0, x1]]);
        let (c, d) = (input[[y1, x0]], input[[y1, x1]]);

        let top = a + (b - a) * fx;
        let bottom = c + (d - c) * fx;
        let value = top + (bottom - top) * fy;

        // Keep rounding error inside the hull of the four taps
        if value.is_nan() {
            value
        } else {
            let lo = a.min(b).min(c).min(d);
            let hi = a.max(b).max(c).max(d);
            value.max(lo).min(hi)
        }
    })
}

/// Resize every channel of an image, keeping channel order and window metadata
///
/// # Errors
/// Returns `Config` when a target dimension is zero
pub fn resize_image(image: &MultiChannelImage, width: u32, height: u32) -> Result<MultiChannelImage> {
    if width == 0 || height == 0 {
        return Err(IchError::Config(format!(
            "resize target must be non-empty, got {}x{}",
            width, height
        )));
    }

    let channels = image.channels().each_ref().map(|channel| {
        let values = resize_bilinear(channel.values(), height as usize, width as usize);
        NormalizedChannel::from_parts(channel.spec().clone(), values)
    });

    MultiChannelImage::from_channels(channels)
}
