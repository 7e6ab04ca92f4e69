//! Per-page geometry, collected once when an image is opened.

use serde::Serialize;
use tracing::debug;

use crate::error::PageError;
use crate::format::PageCodec;

/// Width and height of one page, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

impl PageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels, or `None` if it does not fit in `usize`.
    pub fn pixel_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    /// Dimensions after downsampling by `factor` (floor division).
    ///
    /// A factor of 0 or 1 leaves the size unchanged.
    pub fn downsampled(&self, factor: u32) -> PageSize {
        if factor <= 1 {
            return *self;
        }
        PageSize::new(self.width / factor, self.height / factor)
    }
}

impl From<(u32, u32)> for PageSize {
    fn from((width, height): (u32, u32)) -> Self {
        PageSize::new(width, height)
    }
}

/// Ordered page sizes, one per directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageIndex {
    sizes: Vec<PageSize>,
}

impl PageIndex {
    /// Walk every directory once and record its size.
    ///
    /// The codec must be positioned on directory 0. On success it is rewound
    /// to directory 0 again.
    pub fn build<C: PageCodec>(codec: &mut C) -> Result<Self, PageError> {
        let mut sizes = Vec::new();

        loop {
            let (width, height) = codec.dimensions().map_err(|e| PageError::IndexFailed {
                reason: format!("directory {}: {}", sizes.len(), e),
            })?;
            sizes.push(PageSize::new(width, height));

            if !codec.has_next_directory() {
                break;
            }
            codec.next_directory().map_err(|e| PageError::IndexFailed {
                reason: format!("advancing past directory {}: {}", sizes.len() - 1, e),
            })?;
        }

        codec.seek(0).map_err(|e| PageError::IndexFailed {
            reason: format!("rewinding to directory 0: {}", e),
        })?;

        debug!("Indexed {} page(s)", sizes.len());
        Self::from_sizes(sizes)
    }

    /// Build an index from known sizes. An empty list is rejected.
    pub fn from_sizes(sizes: Vec<PageSize>) -> Result<Self, PageError> {
        if sizes.is_empty() {
            return Err(PageError::IndexFailed {
                reason: "container has no directories".to_string(),
            });
        }
        Ok(Self { sizes })
    }

    /// Number of pages (always at least 1).
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Size of page `index`, or `OutOfRange`.
    pub fn get(&self, index: usize) -> Result<PageSize, PageError> {
        self.sizes
            .get(index)
            .copied()
            .ok_or(PageError::OutOfRange {
                index,
                count: self.sizes.len(),
            })
    }

    pub fn as_slice(&self) -> &[PageSize] {
        &self.sizes
    }
}

// =============================================================================
// Tests
// =============================================================================
