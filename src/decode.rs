//! WebP decoding and feature probing across the native boundary.

use crate::error::{Error, Result};
use crate::native::NativeBuffer;
use crate::types::{FeatureSet, PixelLayout};
use alloc::vec::Vec;
use imgref::ImgVec;
use rgb::{FromSlice, RGB8, RGBA8};
use whereat::*;

/// Read bitstream features without decoding pixels.
///
/// # Errors
///
/// [`Error::CodecStatus`] carrying libwebp's status when the header is
/// malformed or truncated.
///
/// # Example
///
/// ```rust
/// let webp = webp_bridge::encode_rgba(&[0, 0, 0, 0], 1, 1, 4, 80.0)?;
/// let features = webp_bridge::probe_features(&webp)?;
/// assert!(features.has_alpha);
/// assert_eq!((features.width, features.height), (1, 1));
/// # Ok::<(), webp_bridge::At<webp_bridge::Error>>(())
/// ```
pub fn probe_features(data: &[u8]) -> Result<FeatureSet> {
    FeatureSet::from_webp(data)
}

/// Decode WebP data to tightly packed RGBA pixels.
///
/// Returns the pixels and the dimensions read from the bitstream.
///
/// # Errors
///
/// [`Error::DecodeFailed`] when libwebp cannot decode the data.
pub fn decode_rgba(data: &[u8]) -> Result<(Vec<u8>, u32, u32)> {
    decode(data, PixelLayout::Rgba)
}

/// Decode WebP data to tightly packed RGB pixels (alpha dropped).
///
/// Returns the pixels and the dimensions read from the bitstream.
///
/// # Errors
///
/// [`Error::DecodeFailed`] when libwebp cannot decode the data.
pub fn decode_rgb(data: &[u8]) -> Result<(Vec<u8>, u32, u32)> {
    decode(data, PixelLayout::Rgb)
}

/// Decode WebP data to an imgref RGBA image.
pub fn decode_rgba_img(data: &[u8]) -> Result<ImgVec<RGBA8>> {
    let (pixels, width, height) = decode_rgba(data)?;
    Ok(ImgVec::new(pixels.as_rgba().to_vec(), width as usize, height as usize))
}

/// Decode WebP data to an imgref RGB image.
pub fn decode_rgb_img(data: &[u8]) -> Result<ImgVec<RGB8>> {
    let (pixels, width, height) = decode_rgb(data)?;
    Ok(ImgVec::new(pixels.as_rgb().to_vec(), width as usize, height as usize))
}

fn decode(data: &[u8], layout: PixelLayout) -> Result<(Vec<u8>, u32, u32)> {
    let mut width: i32 = 0;
    let mut height: i32 = 0;

    log::trace!("decoding {} bytes to {:?}", data.len(), layout);
    let ptr = unsafe {
        match layout {
            PixelLayout::Rgb => {
                libwebp_sys::WebPDecodeRGB(data.as_ptr(), data.len(), &mut width, &mut height)
            }
            PixelLayout::Rgba => {
                libwebp_sys::WebPDecodeRGBA(data.as_ptr(), data.len(), &mut width, &mut height)
            }
        }
    };

    let Some(buffer) = (unsafe { NativeBuffer::from_raw(ptr) }) else {
        log::debug!("native decoder rejected {} bytes", data.len());
        return Err(at!(Error::DecodeFailed));
    };

    let Some(size) = packed_size(width, height, layout) else {
        log::debug!("native decoder reported impossible size {}x{}", width, height);
        return Err(at!(Error::DecodeFailed));
    };

    // SAFETY: libwebp returns a packed `width * height * channels` buffer.
    let pixels = unsafe { buffer.copy_out(size) };

    Ok((pixels, width as u32, height as u32))
}

/// `width * height * channels`, or `None` for non-positive or overflowing sizes.
fn packed_size(width: i32, height: i32, layout: PixelLayout) -> Option<usize> {
    let width = usize::try_from(width).ok().filter(|&w| w > 0)?;
    let height = usize::try_from(height).ok().filter(|&h| h > 0)?;
    width
        .checked_mul(height)?
        .checked_mul(layout.channels() as usize)
}
