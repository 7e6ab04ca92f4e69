use image::RgbaImage;

use crate::error::PageError;

use super::index::PageSize;
use super::pixel::BYTES_PER_PIXEL;

/// A host-owned, writable pixel surface with the same layout as [`Bitmap`]:
/// one `a,r,g,b` word per pixel, row-major, no row padding.
pub trait PixelSurface {
    /// Surface width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Mutable access to the surface's pixel words.
    fn pixels_mut(&mut self) -> &mut [u32];
}

/// A rendered page: `width * height` pixels packed as `a << 24 | r << 16 | g << 8 | b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    size: PageSize,
    pixels: Vec<u32>,
}

impl Bitmap {
    pub(crate) fn new(size: PageSize, pixels: Vec<u32>) -> Self {
        debug_assert_eq!(Some(pixels.len()), size.pixel_count());
        Self { size, pixels }
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixel words, row-major.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.size.width as usize + x as usize)
            .copied()
    }

    /// Size of the pixel data in bytes.
    pub fn byte_len(&self) -> usize {
        self.pixels.len() * BYTES_PER_PIXEL
    }

    /// Pixel data as bytes, `A, R, G, B` per pixel.
    pub fn to_argb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|px| px.to_be_bytes()).collect()
    }

    /// Convert into an `image` buffer (`R, G, B, A` per pixel).
    pub fn to_rgba_image(&self) -> RgbaImage {
        let raw = self
            .pixels
            .iter()
            .flat_map(|px| {
                let [a, r, g, b] = px.to_be_bytes();
                [r, g, b, a]
            })
            .collect();
        debug_assert_eq!(Some(self.pixels.len()), self.size.pixel_count());
        RgbaImage::from_raw(self.size.width, self.size.height, raw)
            .expect("bitmap holds width * height pixels")
    }

    /// Copy the pixels into a host surface of identical dimensions.
    pub fn copy_into<S: PixelSurface + ?Sized>(&self, surface: &mut S) -> Result<(), PageError> {
        let (surface_width, surface_height) = surface.dimensions();
        let dst = surface.pixels_mut();
        if (surface_width, surface_height) != (self.size.width, self.size.height)
            || dst.len() != self.pixels.len()
        {
            return Err(PageError::SurfaceMismatch {
                width: self.size.width,
                height: self.size.height,
                surface_width,
                surface_height,
            });
        }

        dst.copy_from_slice(&self.pixels);
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
