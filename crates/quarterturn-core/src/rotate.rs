//! Exact quarter-turn rotation by coordinate remapping.
//!
//! Rotations of 0/90/180/270 degrees move whole pixels, so no interpolation
//! is performed: each output pixel is copied from exactly one source pixel.
//!
//! # Algorithm
//!
//! The rotation uses inverse mapping. For each pixel in the output image we
//! compute the source coordinate that lands there under a clockwise rotation
//! by the given step:
//!
//! ```text
//! 90 CW:   src = (y, out_w - 1 - x)
//! 180:     src = (out_w - 1 - x, out_h - 1 - y)
//! 270 CW:  src = (out_h - 1 - y, x)
//! ```
//!
//! For 90 and 270 the output dimensions are the source dimensions swapped.

use crate::angle::RotationStep;
use crate::raster::{Raster, CHANNELS};

/// Compute the dimensions of an image after rotating by `step`.
///
/// 90 and 270 degree steps swap width and height; 0 and 180 preserve them.
pub fn rotated_dimensions(width: u32, height: u32, step: RotationStep) -> (u32, u32) {
    if step.swaps_dimensions() {
        (height, width)
    } else {
        (width, height)
    }
}

/// Rotate an image clockwise by an exact quarter-turn step.
///
/// # Arguments
///
/// * `src` - Source image
/// * `step` - Canonical rotation step
///
/// # Returns
///
/// A new `Raster` with the rotated content. The result is always a fresh
/// buffer, including for `Deg0`, so callers never alias the source.
pub fn rotate(src: &Raster, step: RotationStep) -> Raster {
    // Fast path: a zero step is a plain copy into a new buffer
    if step == RotationStep::Deg0 {
        return src.clone();
    }

    let (out_w, out_h) = rotated_dimensions(src.width, src.height, step);
    let mut pixels = vec![0u8; out_w as usize * out_h as usize * CHANNELS];

    let max_x = out_w.saturating_sub(1);
    let max_y = out_h.saturating_sub(1);

    for y in 0..out_h {
        for x in 0..out_w {
            let (src_x, src_y) = source_coordinates(x, y, max_x, max_y, step);
            let dst_idx = (y as usize * out_w as usize + x as usize) * CHANNELS;
            pixels[dst_idx..dst_idx + CHANNELS].copy_from_slice(src.pixel(src_x, src_y));
        }
    }

    Raster::new(out_w, out_h, pixels)
}

/// Source coordinate contributing to output pixel `(x, y)`.
#[inline]
fn source_coordinates(x: u32, y: u32, max_x: u32, max_y: u32, step: RotationStep) -> (u32, u32) {
    match step {
        RotationStep::Deg0 => (x, y),
        RotationStep::Deg90 => (y, max_x - x),
        RotationStep::Deg180 => (max_x - x, max_y - y),
        RotationStep::Deg270 => (max_y - y, x),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
