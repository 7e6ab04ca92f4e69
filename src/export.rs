//! Bitmap export.
//!
//! Encodes rendered pages as PNG or JPEG through the `image` crate.
//!
//! - **PNG** keeps the alpha channel and is lossless.
//! - **JPEG** drops alpha; quality is clamped to 1-100.

use std::path::Path;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};

use crate::error::ExportError;
use crate::page::Bitmap;

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Minimum allowed JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum allowed JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

/// Output container for an exported bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    pub const fn name(&self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpeg => "JPEG",
        }
    }
}

// =============================================================================
// Encoder
// =============================================================================

/// Encoder for rendered bitmaps.
#[derive(Debug, Clone, Copy)]
pub struct BitmapEncoder {
    quality: u8,
}

impl Default for BitmapEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl BitmapEncoder {
    /// Create an encoder; `quality` only affects JPEG output.
    pub fn new(quality: u8) -> Self {
        Self {
            quality: clamp_quality(quality),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode `bitmap` in the given format.
    ///
    /// # Errors
    ///
    /// Returns an error if the bitmap has no pixels (e.g. a page smaller than
    /// the downsampling factor) or the encoder rejects it.
    pub fn encode(&self, bitmap: &Bitmap, format: ExportFormat) -> Result<Bytes, ExportError> {
        if bitmap.is_empty() {
            return Err(ExportError::EmptyBitmap {
                width: bitmap.width(),
                height: bitmap.height(),
            });
        }

        let rgba = bitmap.to_rgba_image();
        let mut output = Vec::new();

        let result = match format {
            ExportFormat::Png => PngEncoder::new(&mut output).write_image(
                rgba.as_raw(),
                rgba.width(),
                rgba.height(),
                ExtendedColorType::Rgba8,
            ),
            ExportFormat::Jpeg => {
                let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();
                JpegEncoder::new_with_quality(&mut output, self.quality).write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )
            }
        };
        result.map_err(|e| ExportError::EncodeError {
            message: e.to_string(),
        })?;

        Ok(Bytes::from(output))
    }

    /// Encode `bitmap` and write it to `path`.
    pub fn save(
        &self,
        bitmap: &Bitmap,
        format: ExportFormat,
        path: impl AsRef<Path>,
    ) -> Result<usize, ExportError> {
        let data = self.encode(bitmap, format)?;
        std::fs::write(path.as_ref(), &data).map_err(|e| ExportError::Io {
            message: format!("{}: {}", path.as_ref().display(), e),
        })?;
        Ok(data.len())
    }
}

/// Clamp quality to valid range.
#[inline]
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
}

// =============================================================================
// Tests
// =============================================================================
