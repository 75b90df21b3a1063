//! Host-facing entry points.
//!
//! A scripting host sees the codec as a table of named methods that take a
//! list of dynamically typed arguments and return a dynamically typed value.
//! This module owns that view: argument unwrapping, range checks on host
//! integers, and packing results back into [`Value`]s.
//!
//! Every failure comes back as an `Err`; [`Value::None`] is never used to
//! signal an error.
//!
//! # Example
//!
//! ```rust
//! use webp_bridge::binding::{call, Value};
//!
//! let encoded = call(
//!     "WebPEncodeRGB",
//!     &[
//!         Value::Bytes(vec![255; 12]),
//!         Value::Int(2),
//!         Value::Int(2),
//!         Value::Int(6),
//!         Value::Float(80.0),
//!     ],
//! )?;
//!
//! let decoded = call("WebPDecodeRGB", &[encoded])?;
//! let Value::Tuple(parts) = decoded else { unreachable!() };
//! assert_eq!(parts[1], Value::Int(2));
//! assert_eq!(parts[2], Value::Int(2));
//! # Ok::<(), webp_bridge::At<webp_bridge::Error>>(())
//! ```

use crate::error::{Error, Result};
use alloc::vec::Vec;
use whereat::*;

/// A dynamically typed host value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value.
    None,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Immutable byte string.
    Bytes(Vec<u8>),
    /// Fixed-size tuple.
    Tuple(Vec<Value>),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bytes(_) => "bytes",
            Value::Tuple(_) => "tuple",
        }
    }
}

/// Positional argument cursor.
///
/// Each accessor consumes one argument and checks its type.
pub struct Args<'a> {
    values: &'a [Value],
    pos: usize,
}

impl<'a> Args<'a> {
    /// Start reading `values` from the first position.
    pub fn new(values: &'a [Value]) -> Self {
        Self { values, pos: 0 }
    }

    fn next(&mut self, expected: &str) -> Result<&'a Value> {
        let value = self.values.get(self.pos).ok_or_else(|| {
            at!(Error::InvalidArgument(alloc::format!(
                "missing argument {} (expected {})",
                self.pos,
                expected
            )))
        })?;
        self.pos += 1;
        Ok(value)
    }

    fn mismatch(&self, expected: &str, got: &Value) -> At<Error> {
        at!(Error::InvalidArgument(alloc::format!(
            "argument {} must be {}, got {}",
            self.pos - 1,
            expected,
            got.type_name()
        )))
    }

    /// Borrow a byte-string argument.
    pub fn bytes(&mut self) -> Result<&'a [u8]> {
        match self.next("bytes")? {
            Value::Bytes(data) => Ok(data.as_slice()),
            other => Err(self.mismatch("bytes", other)),
        }
    }

    /// Read an integer argument.
    pub fn int(&mut self) -> Result<i64> {
        match self.next("int")? {
            Value::Int(v) => Ok(*v),
            other => Err(self.mismatch("int", other)),
        }
    }

    /// Read an integer argument that must fit a non-negative `u32`.
    pub fn dimension(&mut self) -> Result<u32> {
        let v = self.int()?;
        u32::try_from(v).map_err(|_| {
            at!(Error::InvalidArgument(alloc::format!(
                "argument {} must be a non-negative 32-bit integer, got {}",
                self.pos - 1,
                v
            )))
        })
    }

    /// Read a float argument; integers are accepted and widened.
    pub fn float(&mut self) -> Result<f64> {
        match self.next("float")? {
            Value::Float(v) => Ok(*v),
            Value::Int(v) => Ok(*v as f64),
            other => Err(self.mismatch("float", other)),
        }
    }

    /// Fail if arguments remain unread.
    pub fn finish(self) -> Result<()> {
        if self.pos != self.values.len() {
            return Err(at!(Error::InvalidArgument(alloc::format!(
                "expected {} arguments, got {}",
                self.pos,
                self.values.len()
            ))));
        }
        Ok(())
    }
}

/// A named host entry point.
#[derive(Clone, Copy)]
pub struct Method {
    /// Name the host registers the method under.
    pub name: &'static str,
    /// One-line description.
    pub doc: &'static str,
    /// Implementation.
    pub call: fn(&[Value]) -> Result<Value>,
}

impl core::fmt::Debug for Method {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .finish()
    }
}

/// Every entry point exposed to the host.
pub static METHODS: &[Method] = &[
    Method {
        name: "WebPGetFeatures",
        doc: "WebPGetFeatures(data: bytes) -> bool (has_alpha)",
        call: get_features,
    },
    Method {
        name: "WebPEncodeRGB",
        doc: "WebPEncodeRGB(rgb: bytes, width, height, stride, quality) -> bytes",
        call: encode_rgb,
    },
    Method {
        name: "WebPEncodeRGBA",
        doc: "WebPEncodeRGBA(rgba: bytes, width, height, stride, quality) -> bytes",
        call: encode_rgba,
    },
    Method {
        name: "WebPDecodeRGB",
        doc: "WebPDecodeRGB(data: bytes) -> (bytes, width, height)",
        call: decode_rgb,
    },
    Method {
        name: "WebPDecodeRGBA",
        doc: "WebPDecodeRGBA(data: bytes) -> (bytes, width, height)",
        call: decode_rgba,
    },
];

/// Look up a method by host name.
pub fn method(name: &str) -> Option<&'static Method> {
    METHODS.iter().find(|m| m.name == name)
}

/// Invoke a method by host name.
pub fn call(name: &str, args: &[Value]) -> Result<Value> {
    let method = method(name).ok_or_else(|| {
        log::debug!("unknown method {:?}", name);
        at!(Error::InvalidArgument(alloc::format!("unknown method {:?}", name)))
    })?;
    (method.call)(args)
}

fn get_features(args: &[Value]) -> Result<Value> {
    let mut args = Args::new(args);
    let data = args.bytes()?;
    args.finish()?;

    let features = crate::probe_features(data)?;
    Ok(Value::Bool(features.has_alpha))
}

fn encode_rgb(args: &[Value]) -> Result<Value> {
    encode_with(args, crate::encode_rgb)
}

fn encode_rgba(args: &[Value]) -> Result<Value> {
    encode_with(args, crate::encode_rgba)
}

fn encode_with(
    args: &[Value],
    encode: fn(&[u8], u32, u32, u32, f32) -> Result<Vec<u8>>,
) -> Result<Value> {
    let mut args = Args::new(args);
    let pixels = args.bytes()?;
    let width = args.dimension()?;
    let height = args.dimension()?;
    let stride = args.dimension()?;
    let quality = args.float()?;
    args.finish()?;

    let webp = encode(pixels, width, height, stride, quality as f32)?;
    Ok(Value::Bytes(webp))
}

fn decode_rgb(args: &[Value]) -> Result<Value> {
    decode_with(args, crate::decode_rgb)
}

fn decode_rgba(args: &[Value]) -> Result<Value> {
    decode_with(args, crate::decode_rgba)
}

fn decode_with(
    args: &[Value],
    decode: fn(&[u8]) -> Result<(Vec<u8>, u32, u32)>,
) -> Result<Value> {
    let mut args = Args::new(args);
    let data = args.bytes()?;
    args.finish()?;

    let (pixels, width, height) = decode(data)?;
    Ok(Value::Tuple(alloc::vec![
        Value::Bytes(pixels),
        Value::Int(i64::from(width)),
        Value::Int(i64::from(height)),
    ]))
}
