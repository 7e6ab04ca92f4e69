//! The multi-page image handle.
//!
//! A [`TiffImage`] owns an open codec and the [`PageIndex`] built from it.
//! Opening walks every directory once to record page sizes; after that size
//! queries never touch the file. Rendering a page decodes it, swaps it into
//! `a,r,g,b` order and optionally downsamples it.
//!
//! # Example
//!
//! ```no_run
//! use tiff_pages::TiffImage;
//!
//! let mut image = TiffImage::open("scan.tif");
//! if !image.is_loaded() {
//!     eprintln!("page could not be loaded: {:?}", image.load_error());
//!     return Ok(());
//! }
//!
//! for page in 0..image.page_count()? {
//!     let thumb = image.render_page(page, 4)?;
//!     println!("page {}: {}x{}", page, thumb.width(), thumb.height());
//! }
//! image.close();
//! # Ok::<(), tiff_pages::PageError>(())
//! ```

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use bytes::Bytes;
use tracing::{debug, error, warn};

use crate::config::DecodeOptions;
use crate::error::{CodecError, PageError};
use crate::format::{FileCodec, PageCodec, TiffCodec};
use crate::page::{
    abgr_to_argb_in_place, alloc_pixels, downsample, Bitmap, PageIndex, PageSize, BYTES_PER_PIXEL,
};

/// State of a handle whose open succeeded.
#[derive(Debug)]
struct Loaded<C> {
    codec: C,
    index: PageIndex,
}

/// An opened multi-page TIFF.
///
/// A handle is either loaded (codec and page index available) or failed, in
/// which case every query returns [`PageError::NotLoaded`] and
/// [`load_error`](Self::load_error) explains why. The underlying file is
/// released when the handle is closed or dropped.
#[derive(Debug)]
pub struct TiffImage<C = FileCodec> {
    source_id: String,
    max_decode_bytes: usize,
    state: Result<Loaded<C>, PageError>,
}

// =============================================================================
// Constructors
// =============================================================================

impl TiffImage<FileCodec> {
    /// Open a file with default [`DecodeOptions`].
    ///
    /// Always returns a handle; check [`is_loaded`](Self::is_loaded).
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::open_with(path, &DecodeOptions::default())
    }

    /// Open a file, failing fast if it cannot be loaded.
    pub fn try_open(path: impl AsRef<Path>) -> Result<Self, PageError> {
        Self::open_with(path, &DecodeOptions::default()).into_result()
    }

    /// [`try_open`](Self::try_open) with explicit decode options.
    pub fn try_open_with(
        path: impl AsRef<Path>,
        options: &DecodeOptions,
    ) -> Result<Self, PageError> {
        Self::open_with(path, options).into_result()
    }

    /// Open a file with explicit decode options.
    pub fn open_with(path: impl AsRef<Path>, options: &DecodeOptions) -> Self {
        let path = path.as_ref();
        let source_id = path.display().to_string();
        debug!("Trying to load the tiff file: {}", source_id);

        Self::from_codec_result(source_id, options, FileCodec::open(path, options))
    }
}

impl TiffImage<TiffCodec<Cursor<Bytes>>> {
    /// Open a TIFF held in memory.
    pub fn from_bytes(data: impl Into<Bytes>, options: &DecodeOptions) -> Self {
        let data = data.into();
        let source_id = format!("memory ({} bytes)", data.len());
        Self::from_codec_result(source_id, options, TiffCodec::new(Cursor::new(data), options))
    }
}

impl<R: Read + Seek> TiffImage<TiffCodec<R>> {
    /// Open a TIFF from any seekable stream. `source_id` names it in logs and errors.
    pub fn from_reader(reader: R, source_id: impl Into<String>, options: &DecodeOptions) -> Self {
        Self::from_codec_result(source_id.into(), options, TiffCodec::new(reader, options))
    }
}

impl<C: PageCodec> TiffImage<C> {
    /// Wrap an already opened codec positioned on directory 0 and index it.
    pub fn from_codec(codec: C, source_id: impl Into<String>) -> Self {
        Self::from_codec_with(codec, source_id, &DecodeOptions::default())
    }

    /// [`from_codec`](Self::from_codec) with explicit decode options.
    pub fn from_codec_with(
        codec: C,
        source_id: impl Into<String>,
        options: &DecodeOptions,
    ) -> Self {
        Self::from_codec_result(source_id.into(), options, Ok(codec))
    }

    fn from_codec_result(
        source_id: String,
        options: &DecodeOptions,
        codec: Result<C, CodecError>,
    ) -> Self {
        let state = codec
            .map_err(|e| PageError::OpenFailed {
                source_id: source_id.clone(),
                reason: e.to_string(),
            })
            .and_then(|mut codec| {
                let index = PageIndex::build(&mut codec)?;
                Ok(Loaded { codec, index })
            });

        match &state {
            Ok(loaded) => debug!("Loaded {}: {} page(s)", source_id, loaded.index.len()),
            Err(e) => error!("Error while loading the tiff file {}: {}", source_id, e),
        }

        Self {
            source_id,
            max_decode_bytes: options.max_decode_bytes,
            state,
        }
    }

    fn into_result(self) -> Result<Self, PageError> {
        if let Err(e) = &self.state {
            return Err(e.clone());
        }
        Ok(self)
    }
}

// =============================================================================
// Queries
// =============================================================================

impl<C: PageCodec> TiffImage<C> {
    /// Whether the open succeeded and the image can be used.
    pub fn is_loaded(&self) -> bool {
        self.state.is_ok()
    }

    /// Why the open failed, if it did.
    pub fn load_error(&self) -> Option<&PageError> {
        self.state.as_ref().err()
    }

    /// Path or description of the source this handle was opened from.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    fn loaded(&self) -> Result<&Loaded<C>, PageError> {
        self.state.as_ref().map_err(|_| PageError::NotLoaded)
    }

    /// Number of pages (directories). Always at least 1 for a loaded image.
    pub fn page_count(&self) -> Result<usize, PageError> {
        Ok(self.loaded()?.index.len())
    }

    /// Size of page `index`.
    pub fn page_size(&self, index: usize) -> Result<PageSize, PageError> {
        self.loaded()?.index.get(index)
    }

    /// Sizes of all pages in directory order.
    pub fn page_sizes(&self) -> Result<&[PageSize], PageError> {
        Ok(self.loaded()?.index.as_slice())
    }

    /// Decode page `index` into an `a,r,g,b` bitmap.
    ///
    /// With `sample_size <= 1` the page is returned at full resolution.
    /// Otherwise both dimensions are divided by `sample_size` (rounding down)
    /// and each output pixel is the mean of its sample point's 3x3
    /// neighborhood; see [`downsample`](crate::page::downsample).
    pub fn render_page(&mut self, index: usize, sample_size: u32) -> Result<Bitmap, PageError> {
        let source_id = &self.source_id;
        let max_decode_bytes = self.max_decode_bytes;
        let loaded = self.state.as_mut().map_err(|_| PageError::NotLoaded)?;
        let size = loaded.index.get(index)?;

        debug!(
            "Rendering page {} of {} ({}x{}, sample size {})",
            index, source_id, size.width, size.height, sample_size
        );

        let decoded =
            decode_page(&mut loaded.codec, index, size, max_decode_bytes).map_err(|e| {
                warn!("Page {} of {} could not be loaded: {}", index, source_id, e);
                e
            })?;

        if sample_size <= 1 {
            return Ok(Bitmap::new(size, decoded));
        }

        let (out_size, pixels) = downsample(&decoded, size, sample_size).map_err(|e| {
            error!("{}", e);
            e
        })?;
        drop(decoded);

        Ok(Bitmap::new(out_size, pixels))
    }

    /// Release the codec and the file it holds.
    pub fn close(self) {
        debug!("Closing {}", self.source_id);
    }
}

/// Seek to `index`, decode it and reorder its channels.
///
/// The page's declared size is checked against `max_decode_bytes` before any
/// pixel memory is reserved.
fn decode_page<C: PageCodec>(
    codec: &mut C,
    index: usize,
    size: PageSize,
    max_decode_bytes: usize,
) -> Result<Vec<u32>, PageError> {
    let decode_failed = |source| PageError::DecodeFailed {
        page: index,
        source,
    };

    let count = size.pixel_count().ok_or(PageError::AllocationFailed {
        purpose: "decode buffer",
        bytes: usize::MAX,
    })?;
    let bytes = count.saturating_mul(BYTES_PER_PIXEL);
    if bytes > max_decode_bytes {
        return Err(PageError::AllocationFailed {
            purpose: "decode buffer",
            bytes,
        });
    }

    codec.seek(index).map_err(decode_failed)?;

    let mut pixels = alloc_pixels(count, "decode buffer")?;

    codec
        .read_rgba(size.width, size.height, &mut pixels)
        .map_err(|e| match e {
            CodecError::LimitsExceeded => PageError::AllocationFailed {
                purpose: "decode buffer",
                bytes,
            },
            other => decode_failed(other),
        })?;

    abgr_to_argb_in_place(&mut pixels);
    Ok(pixels)
}

// =============================================================================
// Tests
// =============================================================================
