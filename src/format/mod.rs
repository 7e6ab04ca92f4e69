//! TIFF container access.
//!
//! - [`PageCodec`]: directory-at-a-time access to a multi-page container
//! - [`TiffCodec`]: the `tiff` crate implementation, with RGBA normalization
//!   of decoded samples

mod codec;
mod rgba;
mod tiff_codec;

pub use codec::PageCodec;
pub use rgba::pack_abgr;
pub use tiff_codec::{FileCodec, TiffCodec};
