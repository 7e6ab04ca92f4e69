//! Rendering tests.
//!
//! Tests verify:
//! - Decoded pixels come out in `a,r,g,b` order
//! - Downsampling dimensions and neighborhood means on a known gradient
//! - Pages can be rendered in any order and more than once
//! - Decode limits surface as allocation failures

use tiff_pages::{DecodeOptions, PageError, PageSize, TiffImage};

use super::test_utils::{
    gradient_value, gray_argb, header_only_gray_tiff, multi_page_tiff, single_page_tiff,
    write_temp_tiff, VecSurface, PAGE0_ARGB, PAGE1_ARGB,
};

fn open_fixture() -> TiffImage<tiff_pages::TiffCodec<std::io::Cursor<bytes::Bytes>>> {
    let image = TiffImage::from_bytes(multi_page_tiff(), &DecodeOptions::default());
    assert!(image.is_loaded(), "load error: {:?}", image.load_error());
    image
}

// =============================================================================
// Full Resolution
// =============================================================================

#[test]
fn test_render_rgba_page() {
    let mut image = open_fixture();

    let bitmap = image.render_page(0, 1).unwrap();
    assert_eq!(bitmap.size(), PageSize::new(100, 50));
    assert_eq!(bitmap.pixels().len(), 100 * 50);
    assert!(bitmap.pixels().iter().all(|&p| p == PAGE0_ARGB));
}

#[test]
fn test_render_rgb_page_is_opaque() {
    let mut image = open_fixture();

    let bitmap = image.render_page(1, 1).unwrap();
    assert_eq!(bitmap.size(), PageSize::new(64, 64));
    assert!(bitmap.pixels().iter().all(|&p| p == PAGE1_ARGB));
}

#[test]
fn test_render_gray_page() {
    let mut image = open_fixture();

    let bitmap = image.render_page(2, 1).unwrap();
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(
                bitmap.pixel(x, y),
                Some(gray_argb(gradient_value(x, y))),
                "pixel ({}, {})",
                x,
                y
            );
        }
    }
}

#[test]
fn test_render_from_file() {
    let file = write_temp_tiff(&multi_page_tiff());
    let mut image = TiffImage::try_open(file.path()).unwrap();

    let bitmap = image.render_page(1, 1).unwrap();
    assert_eq!(bitmap.pixel(63, 63), Some(PAGE1_ARGB));
}

#[test]
fn test_render_any_order_and_repeat() {
    let mut image = open_fixture();

    let last = image.render_page(2, 1).unwrap();
    let first = image.render_page(0, 1).unwrap();
    let last_again = image.render_page(2, 1).unwrap();
    let last_third = image.render_page(2, 1).unwrap();

    assert_eq!(first.pixel(0, 0), Some(PAGE0_ARGB));
    assert_eq!(last, last_again);
    assert_eq!(last, last_third);
}

// =============================================================================
// Downsampling
// =============================================================================

#[test]
fn test_downsampled_dimensions() {
    let mut image = open_fixture();

    let bitmap = image.render_page(0, 3).unwrap();
    assert_eq!(bitmap.size(), PageSize::new(33, 16));
    assert_eq!(bitmap.pixels().len(), 33 * 16);

    // Uniform page stays uniform, alpha included
    assert!(bitmap.pixels().iter().all(|&p| p == PAGE0_ARGB));
}

#[test]
fn test_downsampled_gradient_means() {
    let mut image = open_fixture();

    let bitmap = image.render_page(2, 2).unwrap();
    assert_eq!(bitmap.size(), PageSize::new(2, 2));

    // Corner: (0,0) (1,0) (0,1) (1,1) -> (0 + 10 + 40 + 50) / 4
    assert_eq!(bitmap.pixel(0, 0), Some(gray_argb(25)));
    // Top edge around (2,0): six samples
    assert_eq!(bitmap.pixel(1, 0), Some(gray_argb(40)));
    // Left edge around (0,2): six samples
    assert_eq!(bitmap.pixel(0, 1), Some(gray_argb(85)));
    // Interior around (2,2): nine samples
    assert_eq!(bitmap.pixel(1, 1), Some(gray_argb(100)));
}

#[test]
fn test_sample_size_larger_than_page() {
    let mut image = open_fixture();

    let bitmap = image.render_page(2, 5).unwrap();
    assert_eq!(bitmap.size(), PageSize::new(0, 0));
    assert!(bitmap.is_empty());
}

#[test]
fn test_sample_size_zero_and_one_match() {
    let mut image = open_fixture();

    let zero = image.render_page(2, 0).unwrap();
    let one = image.render_page(2, 1).unwrap();
    assert_eq!(zero, one);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_render_out_of_range() {
    let mut image = open_fixture();

    let result = image.render_page(3, 1);
    assert!(matches!(
        result,
        Err(PageError::OutOfRange { index: 3, count: 3 })
    ));

    // Handle remains usable
    assert!(image.render_page(1, 1).is_ok());
}

#[test]
fn test_decode_limit_reports_allocation_failure() {
    let options = DecodeOptions {
        max_decode_bytes: 1024,
    };
    let mut image = TiffImage::from_bytes(single_page_tiff(64, 64), &options);
    assert!(image.is_loaded());
    assert_eq!(image.page_size(0).unwrap(), PageSize::new(64, 64));

    let result = image.render_page(0, 1);
    assert!(
        matches!(result, Err(PageError::AllocationFailed { .. })),
        "unexpected result: {:?}",
        result.map(|b| b.size())
    );
}

#[test]
fn test_decode_limit_applies_to_declared_size() {
    let options = DecodeOptions::with_max_decode_mb(64);
    let mut image = TiffImage::from_bytes(header_only_gray_tiff(16_000, 16_000), &options);
    assert!(image.is_loaded(), "load error: {:?}", image.load_error());
    assert_eq!(image.page_size(0).unwrap(), PageSize::new(16_000, 16_000));

    let result = image.render_page(0, 1);
    match result {
        Err(PageError::AllocationFailed { purpose, bytes }) => {
            assert_eq!(purpose, "decode buffer");
            assert_eq!(bytes, 16_000 * 16_000 * 4);
        }
        other => panic!("Expected AllocationFailed, got {:?}", other.map(|b| b.size())),
    }
}

// =============================================================================
// Host Surfaces
// =============================================================================

#[test]
fn test_copy_into_surface() {
    let mut image = open_fixture();
    let bitmap = image.render_page(0, 2).unwrap();

    let mut surface = VecSurface::new(50, 25);
    bitmap.copy_into(&mut surface).unwrap();
    assert!(surface.pixels.iter().all(|&p| p == PAGE0_ARGB));

    let mut wrong = VecSurface::new(25, 50);
    assert!(matches!(
        bitmap.copy_into(&mut wrong),
        Err(PageError::SurfaceMismatch { .. })
    ));
}
