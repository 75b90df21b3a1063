//! Error types for codec boundary operations.

use alloc::string::String;
use core::fmt;
use whereat::At;

/// Result type for codec boundary operations.
///
/// Errors carry the source location that raised them.
pub type Result<T> = core::result::Result<T, At<Error>>;

/// Error type for codec boundary operations.
///
/// Every failure is one of these variants; no operation reports failure
/// through an empty or default success value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Caller-supplied arguments are inconsistent (geometry, buffer size,
    /// quality, argument types). Raised before any native call.
    InvalidArgument(String),
    /// The native feature query reported a non-OK status.
    CodecStatus(StatusCode),
    /// The native encoder produced no output.
    EncodeFailed,
    /// The native decoder produced no output.
    DecodeFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::CodecStatus(code) => write!(f, "codec status error: {}", code),
            Error::EncodeFailed => write!(f, "encode failed: encoder produced no output"),
            Error::DecodeFailed => write!(f, "decode failed: decoder produced no output"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Status codes reported by libwebp's bitstream parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// No error
    Ok,
    /// Memory allocation error
    OutOfMemory,
    /// Invalid parameter
    InvalidParam,
    /// Bitstream error
    BitstreamError,
    /// Unsupported feature
    UnsupportedFeature,
    /// Suspended (need more data)
    Suspended,
    /// User abort
    UserAbort,
    /// Not enough data
    NotEnoughData,
    /// A code this crate does not know, kept as reported.
    Other(i32),
}

impl StatusCode {
    /// Raw numeric value as reported by libwebp.
    pub fn code(self) -> i32 {
        match self {
            StatusCode::Ok => 0,
            StatusCode::OutOfMemory => 1,
            StatusCode::InvalidParam => 2,
            StatusCode::BitstreamError => 3,
            StatusCode::UnsupportedFeature => 4,
            StatusCode::Suspended => 5,
            StatusCode::UserAbort => 6,
            StatusCode::NotEnoughData => 7,
            StatusCode::Other(code) => code,
        }
    }
}

impl From<i32> for StatusCode {
    fn from(code: i32) -> Self {
        match code {
            0 => StatusCode::Ok,
            1 => StatusCode::OutOfMemory,
            2 => StatusCode::InvalidParam,
            3 => StatusCode::BitstreamError,
            4 => StatusCode::UnsupportedFeature,
            5 => StatusCode::Suspended,
            6 => StatusCode::UserAbort,
            7 => StatusCode::NotEnoughData,
            other => StatusCode::Other(other),
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            StatusCode::Ok => "ok",
            StatusCode::OutOfMemory => "out of memory",
            StatusCode::InvalidParam => "invalid param",
            StatusCode::BitstreamError => "bitstream error",
            StatusCode::UnsupportedFeature => "unsupported feature",
            StatusCode::Suspended => "suspended",
            StatusCode::UserAbort => "user abort",
            StatusCode::NotEnoughData => "not enough data",
            StatusCode::Other(_) => "unknown status",
        };
        write!(f, "{} (code {})", msg, self.code())
    }
}
