//! # tiff-pages
//!
//! Page-level access to multi-page TIFF images.
//!
//! Opening a file records the dimensions of every page up front, so page
//! count and page size queries are answered without touching the file again.
//! Pages are decoded on demand into `a,r,g,b` pixel words, optionally
//! downsampled with a 3x3 neighborhood mean for thumbnails and previews.
//!
//! ## Architecture
//!
//! - [`tiff_image`] - the [`TiffImage`] handle: open, query, render, close
//! - [`page`] - page index, bitmaps, pixel helpers and the downsampling filter
//! - [`mod@format`] - the [`PageCodec`] seam and its `tiff` crate implementation
//! - [`export`] - PNG/JPEG encoding of rendered bitmaps
//! - [`config`] - decode limits and the command-line interface
//! - [`error`] - error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use tiff_pages::{BitmapEncoder, ExportFormat, TiffImage};
//!
//! let mut image = TiffImage::try_open("fax.tif")?;
//! println!("{} page(s)", image.page_count()?);
//!
//! let preview = image.render_page(0, 8)?;
//! BitmapEncoder::default().save(&preview, ExportFormat::Png, "preview.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod page;
pub mod tiff_image;

// Re-export commonly used types
pub use config::{
    Cli, Command, DecodeOptions, InfoConfig, InfoFormat, RenderConfig, DEFAULT_MAX_DECODE_MB,
    DEFAULT_SAMPLE_SIZE,
};
pub use error::{CodecError, ExportError, PageError};
pub use export::{
    clamp_quality, BitmapEncoder, ExportFormat, DEFAULT_JPEG_QUALITY, MAX_JPEG_QUALITY,
    MIN_JPEG_QUALITY,
};
pub use format::{pack_abgr, FileCodec, PageCodec, TiffCodec};
pub use page::{
    abgr_to_argb, abgr_to_argb_in_place, downsample, pack_argb, Bitmap, PageIndex, PageSize,
    PixelSurface, BYTES_PER_PIXEL, COLOR_MASK,
};
pub use tiff_image::TiffImage;
