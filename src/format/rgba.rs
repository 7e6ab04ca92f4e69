//! Normalization of decoded TIFF samples into packed RGBA words.
//!
//! The decoder hands back samples in the page's own photometric layout. The
//! rest of the crate works on one layout only: a `u32` per pixel packed as
//! `a << 24 | b << 16 | g << 8 | r`, top-left origin. This mirrors what
//! libtiff's RGBA reader produces, so 16-bit samples are reduced to their
//! high byte, grayscale is replicated across the color channels and pages
//! without alpha are opaque.

use tiff::decoder::DecodingResult;
use tiff::ColorType;

use crate::error::CodecError;

const OPAQUE: u8 = 0xFF;

/// Pack 8-bit channels into the codec word layout.
#[inline]
pub fn pack_abgr(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from_le_bytes([r, g, b, a])
}

#[inline]
fn high_byte(v: u16) -> u8 {
    (v >> 8) as u8
}

/// Convert one decoded page into packed words.
///
/// `colormap` is the page's ColorMap tag (all red entries, then green, then
/// blue) and is required for palette images only.
pub fn convert(
    color: ColorType,
    data: DecodingResult,
    width: u32,
    height: u32,
    colormap: Option<&[u16]>,
    dst: &mut [u32],
) -> Result<(), CodecError> {
    let (w, h) = (width as usize, height as usize);

    match (color, data) {
        (ColorType::Gray(8), DecodingResult::U8(s)) => {
            fill(&s, 1, dst, |p| pack_abgr(p[0], p[0], p[0], OPAQUE))
        }
        (ColorType::Gray(16), DecodingResult::U16(s)) => fill(&s, 1, dst, |p| {
            let v = high_byte(p[0]);
            pack_abgr(v, v, v, OPAQUE)
        }),
        (ColorType::Gray(bits @ (1 | 2 | 4)), DecodingResult::U8(s)) => {
            let max = (1u32 << bits) - 1;
            unpack_bits(&s, bits, w, h, dst, |v| {
                let v = (v as u32 * 255 / max) as u8;
                pack_abgr(v, v, v, OPAQUE)
            })
        }
        (ColorType::GrayA(8), DecodingResult::U8(s)) => {
            fill(&s, 2, dst, |p| pack_abgr(p[0], p[0], p[0], p[1]))
        }
        (ColorType::GrayA(16), DecodingResult::U16(s)) => fill(&s, 2, dst, |p| {
            let v = high_byte(p[0]);
            pack_abgr(v, v, v, high_byte(p[1]))
        }),
        (ColorType::RGB(8), DecodingResult::U8(s)) => {
            fill(&s, 3, dst, |p| pack_abgr(p[0], p[1], p[2], OPAQUE))
        }
        (ColorType::RGB(16), DecodingResult::U16(s)) => fill(&s, 3, dst, |p| {
            pack_abgr(high_byte(p[0]), high_byte(p[1]), high_byte(p[2]), OPAQUE)
        }),
        (ColorType::RGBA(8), DecodingResult::U8(s)) => {
            fill(&s, 4, dst, |p| pack_abgr(p[0], p[1], p[2], p[3]))
        }
        (ColorType::RGBA(16), DecodingResult::U16(s)) => fill(&s, 4, dst, |p| {
            pack_abgr(
                high_byte(p[0]),
                high_byte(p[1]),
                high_byte(p[2]),
                high_byte(p[3]),
            )
        }),
        (ColorType::CMYK(8), DecodingResult::U8(s)) => fill(&s, 4, dst, |p| {
            let k = 255 - p[3] as u32;
            let channel = |c: u8| ((255 - c as u32) * k / 255) as u8;
            pack_abgr(channel(p[0]), channel(p[1]), channel(p[2]), OPAQUE)
        }),
        (ColorType::Palette(bits @ (1 | 2 | 4 | 8)), DecodingResult::U8(s)) => {
            let colormap = colormap.ok_or_else(|| {
                CodecError::Format("palette image without ColorMap".to_string())
            })?;
            let entries = 1usize << bits;
            if colormap.len() < entries * 3 {
                return Err(CodecError::Format(format!(
                    "ColorMap has {} entries, {}-bit palette needs {}",
                    colormap.len(),
                    bits,
                    entries * 3
                )));
            }
            let (reds, rest) = colormap.split_at(entries);
            let (greens, blues) = rest.split_at(entries);
            let lookup = |v: u8| {
                let i = v as usize;
                pack_abgr(
                    high_byte(reds[i]),
                    high_byte(greens[i]),
                    high_byte(blues[i]),
                    OPAQUE,
                )
            };
            if bits == 8 {
                fill(&s, 1, dst, |p| lookup(p[0]))
            } else {
                unpack_bits(&s, bits, w, h, dst, lookup)
            }
        }
        (color, _) => Err(CodecError::Unsupported(format!(
            "cannot convert {:?} samples to RGBA",
            color
        ))),
    }
}

/// Fill `dst` from interleaved samples, `channels` samples per pixel.
fn fill<T: Copy>(
    samples: &[T],
    channels: usize,
    dst: &mut [u32],
    pack: impl Fn(&[T]) -> u32,
) -> Result<(), CodecError> {
    let needed = dst.len() * channels;
    if samples.len() < needed {
        return Err(CodecError::Format(format!(
            "decoder produced {} samples, expected {}",
            samples.len(),
            needed
        )));
    }

    for (px, chunk) in dst.iter_mut().zip(samples.chunks_exact(channels)) {
        *px = pack(chunk);
    }
    Ok(())
}

/// Fill `dst` from sub-byte samples packed MSB-first, rows padded to a byte.
fn unpack_bits(
    data: &[u8],
    bits: u8,
    width: usize,
    height: usize,
    dst: &mut [u32],
    pack: impl Fn(u8) -> u32,
) -> Result<(), CodecError> {
    let bits = bits as usize;
    let row_bytes = (width * bits).div_ceil(8);
    if data.len() < row_bytes * height {
        return Err(CodecError::Format(format!(
            "decoder produced {} bytes, expected {}",
            data.len(),
            row_bytes * height
        )));
    }

    let mask = ((1u16 << bits) - 1) as u8;
    for (y, row) in data.chunks_exact(row_bytes).take(height).enumerate() {
        let out = &mut dst[y * width..(y + 1) * width];
        for (x, px) in out.iter_mut().enumerate() {
            let bit = x * bits;
            let shift = 8 - bits - (bit % 8);
            *px = pack((row[bit / 8] >> shift) & mask);
        }
    }
    Ok(())
}

/// Rearrange a decoded page so that row 0 is the top and column 0 the left.
///
/// Follows libtiff's RGBA reader, which only flips: orientations that would
/// need a transpose (5-8) are flipped like their non-transposed counterparts
/// and keep their stored width and height.
pub fn apply_orientation(orientation: u16, width: u32, height: u32, dst: &mut [u32]) {
    let (w, h) = (width as usize, height as usize);
    match orientation {
        2 | 6 => flip_horizontal(w, dst),
        3 | 7 => {
            flip_horizontal(w, dst);
            flip_vertical(w, h, dst);
        }
        4 | 8 => flip_vertical(w, h, dst),
        _ => {}
    }
}

fn flip_horizontal(width: usize, dst: &mut [u32]) {
    if width == 0 {
        return;
    }
    for row in dst.chunks_exact_mut(width) {
        row.reverse();
    }
}

fn flip_vertical(width: usize, height: usize, dst: &mut [u32]) {
    for y in 0..height / 2 {
        let (top, bottom) = dst.split_at_mut((height - 1 - y) * width);
        top[y * width..(y + 1) * width].swap_with_slice(&mut bottom[..width]);
    }
}

// =============================================================================
// Tests
// =============================================================================
