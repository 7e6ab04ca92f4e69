use crate::error::CodecError;

/// Directory-oriented access to a multi-page raster container.
///
/// A codec keeps a cursor on one directory (page) at a time. The cursor
/// starts on directory 0 once the codec is constructed; opening is the
/// implementor's constructor and closing is drop.
///
/// Implementations are driven from a single thread. Every method that moves
/// the cursor takes `&mut self`.
pub trait PageCodec {
    /// Width and height of the current directory, read from its image width
    /// and image length tags without decoding pixel data.
    fn dimensions(&mut self) -> Result<(u32, u32), CodecError>;

    /// Whether another directory follows the current one.
    fn has_next_directory(&mut self) -> bool;

    /// Advance the cursor to the next directory.
    fn next_directory(&mut self) -> Result<(), CodecError>;

    /// Move the cursor to directory `index` (0-based).
    fn seek(&mut self, index: usize) -> Result<(), CodecError>;

    /// Decode the current directory into `dst`, top-left oriented.
    ///
    /// Each word is packed as `a << 24 | b << 16 | g << 8 | r`. `dst` must hold
    /// exactly `width * height` words.
    fn read_rgba(&mut self, width: u32, height: u32, dst: &mut [u32]) -> Result<(), CodecError>;
}
