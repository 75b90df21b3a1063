//! # webp-bridge
//!
//! Safe WebP encode/decode boundary over libwebp for scripting hosts.
//!
//! The crate wraps libwebp's simple API via FFI and owns the parts a
//! binding has to get right:
//! - argument validation before any native call (geometry, stride, quality)
//! - native output buffers copied out and freed exactly once
//! - a distinct error for every failure cause, never an empty success value
//!
//! ## Quick Start
//!
//! ```rust
//! // 2x2 RGB, all white, rows packed at 6 bytes
//! let rgb = [255u8; 12];
//!
//! let webp = webp_bridge::encode_rgb(&rgb, 2, 2, 6, 80.0)?;
//! assert!(!webp_bridge::probe_features(&webp)?.has_alpha);
//!
//! let (pixels, width, height) = webp_bridge::decode_rgb(&webp)?;
//! assert_eq!((width, height), (2, 2));
//! assert_eq!(pixels.len(), 12);
//! # Ok::<(), webp_bridge::At<webp_bridge::Error>>(())
//! ```
//!
//! ## Errors
//!
//! ```rust
//! use webp_bridge::Error;
//!
//! // stride 10 x height 10 needs 100 bytes
//! let err = webp_bridge::encode_rgb(&[0u8; 50], 3, 10, 10, 80.0).unwrap_err();
//! assert!(matches!(err.error(), Error::InvalidArgument(_)));
//! ```
//!
//! ## Host methods
//!
//! The [`binding`] module exposes the same operations as a table of named
//! methods over dynamically typed [`binding::Value`]s.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

extern crate alloc;

whereat::define_at_crate_info!();

mod error;
mod types;

#[cfg(any(feature = "decode", feature = "encode"))]
mod native;

#[cfg(feature = "decode")]
mod decode;

#[cfg(feature = "encode")]
mod encode;

#[cfg(feature = "binding")]
pub mod binding;

// Re-exports
pub use error::{Error, Result, StatusCode};
pub use types::{BitstreamFormat, FeatureSet, PixelDescriptor, PixelLayout, MAX_DIMENSION};
pub use whereat::{at, At};

#[cfg(feature = "decode")]
pub use decode::{decode_rgb, decode_rgb_img, decode_rgba, decode_rgba_img, probe_features};

#[cfg(feature = "encode")]
pub use encode::{encode_rgb, encode_rgb_img, encode_rgba, encode_rgba_img};

/// Version of the linked libwebp decoder as `(major, minor, patch)`.
pub fn version() -> (u32, u32, u32) {
    // SAFETY: takes no arguments and only reads a compile-time constant.
    let v = unsafe { libwebp_sys::WebPGetDecoderVersion() } as u32;
    ((v >> 16) & 0xff, (v >> 8) & 0xff, v & 0xff)
}
