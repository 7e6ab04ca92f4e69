//! Neighborhood-averaging downsampler.
//!
//! Output pixel `(i, j)` is taken from source pixel `(i * factor, j * factor)`
//! averaged with whichever of its eight immediate neighbors lie inside the
//! source. Neighbors are one *source* pixel away, not `factor` pixels, so this
//! is a 3x3 mean around the sampled point rather than a block average.
//!
//! The divisor is the number of samples actually read: 4 at a corner, 6 on
//! an edge, 9 inside. Out-of-bounds neighbors are skipped, never clamped to
//! the edge.

use crate::error::PageError;

use super::index::PageSize;
use super::pixel::{alloc_pixels, ChannelSum};

/// Offsets of the 8-connected neighbors as `(dx, dy)`.
const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

/// Downsample an ARGB buffer of `size` by `factor` (must be > 1).
///
/// Returns the output size and its pixels, row-major.
pub fn downsample(
    src: &[u32],
    size: PageSize,
    factor: u32,
) -> Result<(PageSize, Vec<u32>), PageError> {
    debug_assert!(factor > 1);
    debug_assert_eq!(Some(src.len()), size.pixel_count());

    let out = size.downsampled(factor);
    let (out_w, out_h) = (out.width as usize, out.height as usize);
    let mut pixels = alloc_pixels(out_w * out_h, "downsample buffer")?;

    let (src_w, src_h) = (size.width as usize, size.height as usize);
    let step = factor as usize;

    for i in 0..out_w {
        let sx = i * step;
        for j in 0..out_h {
            let sy = j * step;
            pixels[j * out_w + i] = neighborhood_mean(src, src_w, src_h, sx, sy);
        }
    }

    Ok((out, pixels))
}

/// Mean of `(x, y)` and its in-bounds 8-connected neighbors.
#[inline]
fn neighborhood_mean(src: &[u32], width: usize, height: usize, x: usize, y: usize) -> u32 {
    let mut sum = ChannelSum::default();
    sum.add(src[y * width + x]);

    for (dx, dy) in NEIGHBORS {
        let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
            continue;
        };
        if nx < width && ny < height {
            sum.add(src[ny * width + nx]);
        }
    }

    sum.mean()
}

// =============================================================================
// Tests
// =============================================================================
