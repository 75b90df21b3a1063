//! Core types describing pixel buffers and bitstream metadata.

use crate::error::{Error, Result};
use whereat::*;

/// Largest width or height libwebp accepts.
pub const MAX_DIMENSION: u32 = 16383;

/// Channel layout of an interleaved pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    /// RGB - 3 bytes per pixel (red, green, blue)
    Rgb,
    /// RGBA - 4 bytes per pixel (red, green, blue, alpha)
    Rgba,
}

impl PixelLayout {
    /// Bytes per pixel for this layout.
    #[must_use]
    pub const fn channels(self) -> u32 {
        match self {
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }

    /// Whether this layout carries an alpha channel.
    #[must_use]
    pub const fn has_alpha(self) -> bool {
        matches!(self, PixelLayout::Rgba)
    }
}

/// Geometry and quality of a raw pixel buffer handed to the encoder.
///
/// A descriptor is plain data until [`validate`](Self::validate) checks it
/// against the buffer it describes. All size arithmetic is done in `u64`, so
/// no combination of `u32` inputs can wrap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelDescriptor {
    /// Channel layout of the buffer.
    pub layout: PixelLayout,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bytes between the starts of consecutive rows.
    pub stride: u32,
    /// Lossy quality factor (0.0 = smallest, 100.0 = best).
    pub quality: f32,
}

impl PixelDescriptor {
    /// Describe a buffer with an explicit row stride.
    #[must_use]
    pub fn new(layout: PixelLayout, width: u32, height: u32, stride: u32, quality: f32) -> Self {
        Self {
            layout,
            width,
            height,
            stride,
            quality,
        }
    }

    /// Describe a tightly packed buffer (`stride == width * channels`).
    #[must_use]
    pub fn packed(layout: PixelLayout, width: u32, height: u32, quality: f32) -> Self {
        let stride = width.saturating_mul(layout.channels());
        Self::new(layout, width, height, stride, quality)
    }

    /// Smallest stride that holds one row of pixels.
    #[must_use]
    pub fn min_stride(&self) -> u64 {
        u64::from(self.width) * u64::from(self.layout.channels())
    }

    /// Bytes the native encoder may read: `stride * height`.
    #[must_use]
    pub fn required_len(&self) -> u64 {
        u64::from(self.stride) * u64::from(self.height)
    }

    /// Bytes from the first pixel to the end of the last row's pixels:
    /// `stride * (height - 1) + width * channels`. Zero for an empty image.
    #[must_use]
    pub fn read_extent(&self) -> u64 {
        match self.height {
            0 => 0,
            h => (u64::from(self.stride) * u64::from(h - 1)).saturating_add(self.min_stride()),
        }
    }

    /// Check the descriptor against a buffer of `buffer_len` bytes.
    ///
    /// The buffer must hold `stride * height` bytes, padding of the last row
    /// included. Passing this check guarantees the encoder never reads past
    /// the end of the buffer and that every value fits the native `int`
    /// parameters.
    pub fn validate(&self, buffer_len: usize) -> Result<()> {
        self.validate_geometry()?;
        let required = self.required_len();
        if required > buffer_len as u64 {
            return Err(at!(Error::InvalidArgument(alloc::format!(
                "buffer too small: got {}, need {} (stride {} × height {})",
                buffer_len,
                required,
                self.stride,
                self.height
            ))));
        }
        Ok(())
    }

    /// Like [`validate`](Self::validate), but the last row only needs its
    /// pixels, not its padding.
    ///
    /// This is the layout of image views, where the buffer ends right after
    /// the last visible pixel.
    pub fn validate_view(&self, buffer_len: usize) -> Result<()> {
        self.validate_geometry()?;
        let extent = self.read_extent();
        if extent > buffer_len as u64 {
            return Err(at!(Error::InvalidArgument(alloc::format!(
                "view buffer too small: got {}, need {} (stride {} × {} rows + {})",
                buffer_len,
                extent,
                self.stride,
                self.height - 1,
                self.min_stride()
            ))));
        }
        Ok(())
    }

    fn validate_geometry(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(at!(Error::InvalidArgument(alloc::format!(
                "width and height must be non-zero (got {}x{})",
                self.width,
                self.height
            ))));
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(at!(Error::InvalidArgument(alloc::format!(
                "dimensions {}x{} exceed maximum ({} x {})",
                self.width,
                self.height,
                MAX_DIMENSION,
                MAX_DIMENSION
            ))));
        }
        if !(0.0..=100.0).contains(&self.quality) {
            return Err(at!(Error::InvalidArgument(alloc::format!(
                "quality must be within 0..=100, got {}",
                self.quality
            ))));
        }
        if u64::from(self.stride) < self.min_stride() {
            return Err(at!(Error::InvalidArgument(alloc::format!(
                "stride too small: got {}, minimum {}",
                self.stride,
                self.min_stride()
            ))));
        }
        if i32::try_from(self.stride).is_err() {
            return Err(at!(Error::InvalidArgument(alloc::format!(
                "stride {} does not fit a native int",
                self.stride
            ))));
        }
        Ok(())
    }
}

/// Bitstream format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum BitstreamFormat {
    /// Mixed or undetermined.
    #[default]
    Undefined,
    /// Lossy compression (VP8).
    Lossy,
    /// Lossless compression (VP8L).
    Lossless,
}

impl From<i32> for BitstreamFormat {
    fn from(raw: i32) -> Self {
        match raw {
            1 => BitstreamFormat::Lossy,
            2 => BitstreamFormat::Lossless,
            _ => BitstreamFormat::Undefined,
        }
    }
}

/// Metadata read from a WebP header without decoding pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSet {
    /// Whether the bitstream carries an alpha channel.
    pub has_alpha: bool,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Whether the file is an animation.
    pub has_animation: bool,
    /// Lossy, lossless, or mixed.
    pub format: BitstreamFormat,
}

#[cfg(feature = "decode")]
impl FeatureSet {
    /// Read the features from a WebP bitstream header.
    ///
    /// Fails with [`Error::CodecStatus`] when libwebp rejects the header.
    pub fn from_webp(data: &[u8]) -> Result<Self> {
        let mut features = core::mem::MaybeUninit::<libwebp_sys::WebPBitstreamFeatures>::uninit();

        log::trace!("probing {} bytes", data.len());
        let status = unsafe {
            libwebp_sys::WebPGetFeatures(data.as_ptr(), data.len(), features.as_mut_ptr())
        };

        if status != libwebp_sys::VP8StatusCode::VP8_STATUS_OK {
            let code = crate::error::StatusCode::from(status as i32);
            log::debug!("feature query rejected {} bytes: {}", data.len(), code);
            return Err(at!(Error::CodecStatus(code)));
        }

        // SAFETY: an OK status means libwebp filled in every field.
        let features = unsafe { features.assume_init() };

        Ok(FeatureSet {
            has_alpha: features.has_alpha != 0,
            width: features.width as u32,
            height: features.height as u32,
            has_animation: features.has_animation != 0,
            format: BitstreamFormat::from(features.format),
        })
    }
}
