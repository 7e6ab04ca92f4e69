use thiserror::Error;
use tiff::TiffFormatError;

/// Errors reported by the page codec
#[derive(Debug, Clone, Error)]
pub enum CodecError {
    /// The stream does not start with a TIFF or BigTIFF signature
    #[error("Not a TIFF file: {0}")]
    NotTiff(String),

    /// I/O error while reading the stream
    #[error("I/O error: {0}")]
    Io(String),

    /// Malformed TIFF structure or image data
    #[error("Format error: {0}")]
    Format(String),

    /// Valid TIFF feature that cannot be turned into RGBA
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Decoding would exceed the configured buffer limits
    #[error("Decoding limits exceeded")]
    LimitsExceeded,

    /// Requested directory does not exist in the file
    #[error("No such directory: {0}")]
    NoSuchDirectory(usize),

    /// Destination buffer does not match the page geometry
    #[error("Buffer size mismatch: expected {expected} pixels, got {actual}")]
    BufferSize { expected: usize, actual: usize },
}

impl From<tiff::TiffError> for CodecError {
    fn from(err: tiff::TiffError) -> Self {
        match err {
            tiff::TiffError::FormatError(
                e @ (TiffFormatError::TiffSignatureNotFound
                | TiffFormatError::TiffSignatureInvalid),
            ) => CodecError::NotTiff(e.to_string()),
            tiff::TiffError::IoError(e) => CodecError::Io(e.to_string()),
            tiff::TiffError::LimitsExceeded => CodecError::LimitsExceeded,
            tiff::TiffError::UnsupportedError(e) => CodecError::Unsupported(e.to_string()),
            other => CodecError::Format(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::Io(err.to_string())
    }
}

/// Errors surfaced by [`TiffImage`](crate::TiffImage) operations
#[derive(Debug, Clone, Error)]
pub enum PageError {
    /// The container could not be opened
    #[error("Failed to open {source_id}: {reason}")]
    OpenFailed { source_id: String, reason: String },

    /// The directory walk could not determine page geometry
    #[error("Failed to index pages: {reason}")]
    IndexFailed { reason: String },

    /// Page index outside `[0, count)`
    #[error("Page {index} out of range: image has {count} page(s)")]
    OutOfRange { index: usize, count: usize },

    /// A pixel buffer could not be obtained
    #[error("Failed to allocate {bytes} bytes for {purpose}")]
    AllocationFailed { purpose: &'static str, bytes: usize },

    /// The codec could not materialize a page's pixels
    #[error("Failed to decode page {page}: {source}")]
    DecodeFailed { page: usize, source: CodecError },

    /// Operation on a handle whose open failed
    #[error("Image is not loaded")]
    NotLoaded,

    /// Destination surface has different dimensions than the bitmap
    #[error("Surface is {surface_width}x{surface_height}, bitmap is {width}x{height}")]
    SurfaceMismatch {
        width: u32,
        height: u32,
        surface_width: u32,
        surface_height: u32,
    },
}

/// Errors that can occur when exporting a rendered bitmap
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    /// The bitmap has no pixels to encode
    #[error("Cannot encode an empty {width}x{height} bitmap")]
    EmptyBitmap { width: u32, height: u32 },

    /// Encoder rejected the image
    #[error("Encode error: {message}")]
    EncodeError { message: String },

    /// Writing the encoded output failed
    #[error("I/O error: {message}")]
    Io { message: String },
}

// =============================================================================
// Tests
// =============================================================================
