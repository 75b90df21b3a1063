//! WebP encoding across the native boundary.

use crate::error::{Error, Result};
use crate::native::NativeBuffer;
use crate::types::{PixelDescriptor, PixelLayout};
use alloc::vec::Vec;
use core::ptr;
use imgref::ImgRef;
use rgb::{RGB8, RGBA8};
use whereat::*;

/// Encode RGB pixels to lossy WebP.
///
/// # Arguments
///
/// * `data` - interleaved RGB pixel data (3 bytes per pixel)
/// * `width` - image width in pixels
/// * `height` - image height in pixels
/// * `stride` - bytes between row starts (at least `width * 3`)
/// * `quality` - quality factor (0.0 = smallest, 100.0 = best)
///
/// # Errors
///
/// [`Error::InvalidArgument`] if the geometry is inconsistent or
/// `stride * height` exceeds `data.len()`; [`Error::EncodeFailed`] if libwebp
/// produces no output.
///
/// # Example
///
/// ```rust
/// let rgb = [255u8; 12]; // 2x2 white
/// let webp = webp_bridge::encode_rgb(&rgb, 2, 2, 6, 80.0)?;
/// assert!(!webp.is_empty());
/// # Ok::<(), webp_bridge::At<webp_bridge::Error>>(())
/// ```
pub fn encode_rgb(
    data: &[u8],
    width: u32,
    height: u32,
    stride: u32,
    quality: f32,
) -> Result<Vec<u8>> {
    let desc = PixelDescriptor::new(PixelLayout::Rgb, width, height, stride, quality);
    encode(data, &desc)
}

/// Encode RGBA pixels to lossy WebP.
///
/// Same contract as [`encode_rgb`] with 4 bytes per pixel.
pub fn encode_rgba(
    data: &[u8],
    width: u32,
    height: u32,
    stride: u32,
    quality: f32,
) -> Result<Vec<u8>> {
    let desc = PixelDescriptor::new(PixelLayout::Rgba, width, height, stride, quality);
    encode(data, &desc)
}

/// Encode an imgref RGB image, honoring its row stride.
///
/// The view's buffer only needs to reach the last visible pixel, so
/// sub-images touching the bottom edge encode without copying.
///
/// # Example
///
/// ```rust
/// use imgref::ImgVec;
/// use rgb::RGB8;
///
/// // 3x2 view with rows padded to 4 pixels; the last row is unpadded
/// let img = ImgVec::new_stride(vec![RGB8::new(0, 128, 255); 4 + 3], 3, 2, 4);
/// let webp = webp_bridge::encode_rgb_img(img.as_ref(), 90.0)?;
/// let (_, w, h) = webp_bridge::decode_rgb(&webp)?;
/// assert_eq!((w, h), (3, 2));
/// # Ok::<(), webp_bridge::At<webp_bridge::Error>>(())
/// ```
pub fn encode_rgb_img(img: ImgRef<'_, RGB8>, quality: f32) -> Result<Vec<u8>> {
    let (bytes, desc) = img_bytes(
        img.buf(),
        img.width(),
        img.height(),
        img.stride(),
        3,
        PixelLayout::Rgb,
        quality,
    )?;
    // SAFETY: RGB8 is repr(C) and has the same layout as [u8; 3]
    let data = unsafe { core::slice::from_raw_parts(img.buf().as_ptr() as *const u8, bytes) };
    encode_view(data, &desc)
}

/// Encode an imgref RGBA image, honoring its row stride.
pub fn encode_rgba_img(img: ImgRef<'_, RGBA8>, quality: f32) -> Result<Vec<u8>> {
    let (bytes, desc) = img_bytes(
        img.buf(),
        img.width(),
        img.height(),
        img.stride(),
        4,
        PixelLayout::Rgba,
        quality,
    )?;
    // SAFETY: RGBA8 is repr(C) and has the same layout as [u8; 4]
    let data = unsafe { core::slice::from_raw_parts(img.buf().as_ptr() as *const u8, bytes) };
    encode_view(data, &desc)
}

/// Byte length of a typed buffer and the descriptor for its view.
fn img_bytes<P>(
    buf: &[P],
    width: usize,
    height: usize,
    stride_px: usize,
    bpp: usize,
    layout: PixelLayout,
    quality: f32,
) -> Result<(usize, PixelDescriptor)> {
    let to_u32 = |v: usize, what: &str| {
        u32::try_from(v).map_err(|_| {
            at!(Error::InvalidArgument(alloc::format!("{} {} out of range", what, v)))
        })
    };
    let bytes = buf
        .len()
        .checked_mul(bpp)
        .ok_or_else(|| at!(Error::InvalidArgument("image buffer too large".into())))?;
    let stride = stride_px
        .checked_mul(bpp)
        .ok_or_else(|| at!(Error::InvalidArgument("image stride too large".into())))?;
    let desc = PixelDescriptor::new(
        layout,
        to_u32(width, "width")?,
        to_u32(height, "height")?,
        to_u32(stride, "stride")?,
        quality,
    );
    Ok((bytes, desc))
}

/// Encode a raw buffer that covers `stride * height` bytes.
fn encode(data: &[u8], desc: &PixelDescriptor) -> Result<Vec<u8>> {
    if let Err(e) = desc.validate(data.len()) {
        log::debug!("rejected encode of {} bytes: {}", data.len(), e.error());
        return Err(e);
    }
    encode_validated(data, desc)
}

/// Encode an image view whose buffer ends after the last visible pixel.
fn encode_view(data: &[u8], desc: &PixelDescriptor) -> Result<Vec<u8>> {
    if let Err(e) = desc.validate_view(data.len()) {
        log::debug!("rejected view encode of {} bytes: {}", data.len(), e.error());
        return Err(e);
    }
    encode_validated(data, desc)
}

/// Call the native encoder on a buffer already checked against `desc`.
fn encode_validated(data: &[u8], desc: &PixelDescriptor) -> Result<Vec<u8>> {
    // validation bounds every value below i32::MAX
    let width = desc.width as i32;
    let height = desc.height as i32;
    let stride = desc.stride as i32;

    log::trace!(
        "encoding {}x{} {:?} (stride {}, quality {})",
        width,
        height,
        desc.layout,
        stride,
        desc.quality
    );

    let mut output: *mut u8 = ptr::null_mut();
    let size = unsafe {
        match desc.layout {
            PixelLayout::Rgb => libwebp_sys::WebPEncodeRGB(
                data.as_ptr(),
                width,
                height,
                stride,
                desc.quality,
                &mut output,
            ),
            PixelLayout::Rgba => libwebp_sys::WebPEncodeRGBA(
                data.as_ptr(),
                width,
                height,
                stride,
                desc.quality,
                &mut output,
            ),
        }
    };

    // SAFETY: `output` is null or a fresh libwebp allocation of `size` bytes.
    unsafe { take_output(output, size) }.map_err(|e| {
        log::debug!("native encoder produced no output for {}x{}", width, height);
        e
    })
}

/// Copy an encoder result out and release the native allocation.
///
/// The allocation is freed on both outcomes; a zero `size` is
/// [`Error::EncodeFailed`] whether or not `output` is null.
///
/// # Safety
///
/// `output` must be null or a libwebp allocation holding at least `size`
/// bytes that nothing else will free.
unsafe fn take_output(output: *mut u8, size: usize) -> Result<Vec<u8>> {
    // Owned before the size check so a zero-length result still frees.
    // SAFETY: upheld by the caller.
    let buffer = unsafe { NativeBuffer::from_raw(output) };

    match buffer {
        // SAFETY: upheld by the caller.
        Some(buffer) if size > 0 => Ok(unsafe { buffer.copy_out(size) }),
        _ => Err(at!(Error::EncodeFailed)),
    }
}
