//! [`PageCodec`] backed by the `tiff` crate.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use tiff::decoder::Decoder;
use tiff::tags::Tag;
use tiff::{ColorType, TiffError, TiffFormatError};
use tracing::debug;

use crate::config::DecodeOptions;
use crate::error::CodecError;

use super::codec::PageCodec;
use super::rgba;

/// Orientation tag value for a top-left origin.
const ORIENTATION_TOP_LEFT: u16 = 1;

/// Codec over a buffered file handle.
pub type FileCodec = TiffCodec<BufReader<File>>;

/// TIFF decoder positioned on one directory at a time.
pub struct TiffCodec<R: Read + Seek> {
    decoder: Decoder<R>,
    current: usize,
}

impl<R: Read + Seek> std::fmt::Debug for TiffCodec<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiffCodec")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl FileCodec {
    /// Open a file on disk for reading.
    pub fn open(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<Self, CodecError> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file), options)
    }
}

impl<R: Read + Seek> TiffCodec<R> {
    /// Wrap a seekable stream and read its first directory.
    ///
    /// A stream without a TIFF or BigTIFF signature fails with
    /// [`CodecError::NotTiff`].
    pub fn new(reader: R, options: &DecodeOptions) -> Result<Self, CodecError> {
        let decoder = Decoder::new(reader)?.with_limits(options.limits());
        debug!(
            "Opened TIFF stream, decode buffer limit {} bytes",
            options.max_decode_bytes
        );

        Ok(Self {
            decoder,
            current: 0,
        })
    }

    /// Index of the directory the cursor is on.
    pub fn current_directory(&self) -> usize {
        self.current
    }
}

impl<R: Read + Seek> PageCodec for TiffCodec<R> {
    fn dimensions(&mut self) -> Result<(u32, u32), CodecError> {
        let width = self.decoder.get_tag_u32(Tag::ImageWidth)?;
        let height = self.decoder.get_tag_u32(Tag::ImageLength)?;
        Ok((width, height))
    }

    fn has_next_directory(&mut self) -> bool {
        self.decoder.more_images()
    }

    fn next_directory(&mut self) -> Result<(), CodecError> {
        self.decoder.next_image()?;
        self.current += 1;
        Ok(())
    }

    fn seek(&mut self, index: usize) -> Result<(), CodecError> {
        // Always reload the directory so a page can be decoded more than once
        self.decoder.seek_to_image(index).map_err(|e| match e {
            TiffError::FormatError(TiffFormatError::ImageFileDirectoryNotFound) => {
                CodecError::NoSuchDirectory(index)
            }
            other => CodecError::from(other),
        })?;
        self.current = index;
        Ok(())
    }

    fn read_rgba(&mut self, width: u32, height: u32, dst: &mut [u32]) -> Result<(), CodecError> {
        let expected = width as usize * height as usize;
        if dst.len() != expected {
            return Err(CodecError::BufferSize {
                expected,
                actual: dst.len(),
            });
        }

        let color = self.decoder.colortype()?;
        let colormap = match color {
            ColorType::Palette(_) => Some(self.decoder.get_tag_u16_vec(Tag::ColorMap)?),
            _ => None,
        };
        let orientation = self
            .decoder
            .find_tag_unsigned::<u16>(Tag::Orientation)?
            .unwrap_or(ORIENTATION_TOP_LEFT);

        let data = self.decoder.read_image()?;
        rgba::convert(color, data, width, height, colormap.as_deref(), dst)?;
        rgba::apply_orientation(orientation, width, height, dst);

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
