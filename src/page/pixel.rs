//! Channel manipulation on packed 32-bit pixels.

use crate::error::PageError;

/// Per-channel mask applied when unpacking a pixel word.
pub const COLOR_MASK: u32 = 0xFF;

/// Bytes per pixel in every buffer this crate hands out.
pub const BYTES_PER_PIXEL: usize = 4;

/// Swap the red and blue lanes of an `a,b,g,r` word, producing `a,r,g,b`.
///
/// The operation is its own inverse.
#[inline]
pub fn abgr_to_argb(px: u32) -> u32 {
    (px & 0xFF00_FF00) | ((px >> 16) & COLOR_MASK) | ((px & COLOR_MASK) << 16)
}

/// Apply [`abgr_to_argb`] to every pixel of a buffer.
pub fn abgr_to_argb_in_place(pixels: &mut [u32]) {
    for px in pixels.iter_mut() {
        *px = abgr_to_argb(*px);
    }
}

/// Pack channels into an `a,r,g,b` word, clamping each to `[0, 255]`.
#[inline]
pub fn pack_argb(a: u32, r: u32, g: u32, b: u32) -> u32 {
    (a.min(COLOR_MASK) << 24)
        | (r.min(COLOR_MASK) << 16)
        | (g.min(COLOR_MASK) << 8)
        | b.min(COLOR_MASK)
}

/// Allocate a zeroed pixel buffer, reporting failure instead of aborting.
pub(crate) fn alloc_pixels(count: usize, purpose: &'static str) -> Result<Vec<u32>, PageError> {
    let bytes = count.saturating_mul(BYTES_PER_PIXEL);
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(count)
        .map_err(|_| PageError::AllocationFailed { purpose, bytes })?;
    pixels.resize(count, 0);
    Ok(pixels)
}

/// Running per-channel sums of ARGB pixels.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ChannelSum {
    a: u32,
    r: u32,
    g: u32,
    b: u32,
    count: u32,
}

impl ChannelSum {
    #[inline]
    pub fn add(&mut self, px: u32) {
        self.a += (px >> 24) & COLOR_MASK;
        self.r += (px >> 16) & COLOR_MASK;
        self.g += (px >> 8) & COLOR_MASK;
        self.b += px & COLOR_MASK;
        self.count += 1;
    }

    /// Integer mean of every channel, repacked as ARGB.
    #[inline]
    pub fn mean(&self) -> u32 {
        if self.count == 0 {
            return 0;
        }
        let n = self.count;
        pack_argb(self.a / n, self.r / n, self.g / n, self.b / n)
    }
}
