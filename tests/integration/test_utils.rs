//! Test utilities for integration tests.
//!
//! Builds multi-page TIFF files with the `tiff` crate encoder and writes them
//! to temporary files.

use std::io::{Cursor, Write};

use tempfile::NamedTempFile;
use tiff::encoder::{colortype, TiffEncoder};

use tiff_pages::PixelSurface;

// =============================================================================
// Fixture Pages
// =============================================================================

/// RGBA sample every pixel of [`multi_page_tiff`]'s first page carries.
pub const PAGE0_RGBA: [u8; 4] = [0x11, 0x22, 0x33, 0x44];

/// [`PAGE0_RGBA`] as an `a,r,g,b` word.
pub const PAGE0_ARGB: u32 = 0x4411_2233;

/// RGB sample of the second page.
pub const PAGE1_RGB: [u8; 3] = [10, 20, 30];

/// [`PAGE1_RGB`] as an opaque `a,r,g,b` word.
pub const PAGE1_ARGB: u32 = 0xFF0A_141E;

/// Page sizes of [`multi_page_tiff`], in directory order.
pub const MULTI_PAGE_SIZES: [(u32, u32); 3] = [(100, 50), (64, 64), (4, 4)];

/// Gray level of the third page at `(x, y)`.
pub fn gradient_value(x: u32, y: u32) -> u8 {
    (10 * x + 40 * y) as u8
}

/// Opaque gray `a,r,g,b` word.
pub fn gray_argb(v: u8) -> u32 {
    let v = v as u32;
    0xFF00_0000 | (v << 16) | (v << 8) | v
}

/// A three-page little-endian TIFF:
///
/// 0. 100x50 RGBA8, uniform [`PAGE0_RGBA`]
/// 1. 64x64 RGB8, uniform [`PAGE1_RGB`]
/// 2. 4x4 Gray8 gradient, see [`gradient_value`]
pub fn multi_page_tiff() -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    let mut encoder = TiffEncoder::new(&mut buf).unwrap();

    let (w, h) = MULTI_PAGE_SIZES[0];
    let page0: Vec<u8> = PAGE0_RGBA
        .iter()
        .copied()
        .cycle()
        .take((w * h * 4) as usize)
        .collect();
    encoder
        .write_image::<colortype::RGBA8>(w, h, &page0)
        .unwrap();

    let (w, h) = MULTI_PAGE_SIZES[1];
    let page1: Vec<u8> = PAGE1_RGB
        .iter()
        .copied()
        .cycle()
        .take((w * h * 3) as usize)
        .collect();
    encoder.write_image::<colortype::RGB8>(w, h, &page1).unwrap();

    let (w, h) = MULTI_PAGE_SIZES[2];
    let page2: Vec<u8> = (0..h)
        .flat_map(|y| (0..w).map(move |x| gradient_value(x, y)))
        .collect();
    encoder
        .write_image::<colortype::Gray8>(w, h, &page2)
        .unwrap();

    buf.into_inner()
}

/// A single-page RGBA8 TIFF of the given size, uniform [`PAGE0_RGBA`].
pub fn single_page_tiff(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    let mut encoder = TiffEncoder::new(&mut buf).unwrap();
    let data: Vec<u8> = PAGE0_RGBA
        .iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect();
    encoder
        .write_image::<colortype::RGBA8>(width, height, &data)
        .unwrap();
    buf.into_inner()
}

/// A little-endian Gray8 TIFF that declares `width x height` pixels but
/// carries a single 4-byte strip. Opening it is cheap; decoding it is not.
pub fn header_only_gray_tiff(width: u32, height: u32) -> Vec<u8> {
    const ENTRIES: u16 = 9;
    const LONG: u16 = 4;
    const SHORT: u16 = 3;
    let strip_offset = 8 + 2 + ENTRIES as u32 * 12 + 4;

    let mut data = Vec::new();
    data.extend_from_slice(b"II");
    data.extend_from_slice(&42u16.to_le_bytes());
    data.extend_from_slice(&8u32.to_le_bytes());
    data.extend_from_slice(&ENTRIES.to_le_bytes());

    let entries: [(u16, u16, u32); ENTRIES as usize] = [
        (256, LONG, width),        // ImageWidth
        (257, LONG, height),       // ImageLength
        (258, SHORT, 8),           // BitsPerSample
        (259, SHORT, 1),           // Compression: none
        (262, SHORT, 1),           // PhotometricInterpretation: BlackIsZero
        (273, LONG, strip_offset), // StripOffsets
        (277, SHORT, 1),           // SamplesPerPixel
        (278, LONG, height),       // RowsPerStrip
        (279, LONG, 4),            // StripByteCounts
    ];
    for (tag, field_type, value) in entries {
        data.extend_from_slice(&tag.to_le_bytes());
        data.extend_from_slice(&field_type.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        if field_type == SHORT {
            data.extend_from_slice(&(value as u16).to_le_bytes());
            data.extend_from_slice(&[0, 0]);
        } else {
            data.extend_from_slice(&value.to_le_bytes());
        }
    }
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&[0x80; 4]);
    data
}

/// Write `data` to a temporary `.tif` file that lives as long as the handle.
pub fn write_temp_tiff(data: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".tif")
        .tempfile()
        .unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    file
}

// =============================================================================
// Host Surface
// =============================================================================

/// Vec-backed [`PixelSurface`].
pub struct VecSurface {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl VecSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
        }
    }
}

impl PixelSurface for VecSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }
}

// =============================================================================
// Assertion Helpers
// =============================================================================

/// Check if data starts with PNG signature.
pub fn is_valid_png(data: &[u8]) -> bool {
    data.len() >= 8 && data[..8] == [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]
}

/// Check if data is a complete JPEG stream (SOI ... EOI).
pub fn is_valid_jpeg(data: &[u8]) -> bool {
    data.len() >= 4
        && data[0] == 0xFF
        && data[1] == 0xD8
        && data[data.len() - 2] == 0xFF
        && data[data.len() - 1] == 0xD9
}
