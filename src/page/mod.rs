//! Page geometry, pixel buffers and the downsampling filter.
//!
//! - [`PageIndex`] / [`PageSize`]: per-page dimensions collected at open time
//! - [`Bitmap`]: a rendered page in `a,r,g,b` word order
//! - [`PixelSurface`]: host surface a bitmap can be copied into
//! - [`downsample`]: 3x3 neighborhood mean sampled every `factor` pixels

mod bitmap;
mod filter;
mod index;
mod pixel;

pub use bitmap::{Bitmap, PixelSurface};
pub use filter::downsample;
pub use index::{PageIndex, PageSize};
pub use pixel::{abgr_to_argb, abgr_to_argb_in_place, pack_argb, BYTES_PER_PIXEL, COLOR_MASK};

pub(crate) use pixel::alloc_pixels;
