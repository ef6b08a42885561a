//! Dtype vocabulary shared by both wire directions.
//!
//! The engine accepts exactly three element types for array creation. Local
//! element types map to their wire dtype at compile time through
//! [`WireElement`]; dynamic tags coming back in replies resolve through
//! [`Dtype::from_str`] and fail with `UnsupportedDtype` for anything outside
//! the set.

use std::fmt;
use std::str::FromStr;

use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::{ArraywireError, Result};

/// Wire tag for the segmented-string byte buffer. Not a creation dtype:
/// byte buffers only ever travel as the second half of a strings transfer.
pub(crate) const BYTES_TAG: &str = "uint8";

/// Element types the engine accepts for array creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    /// One byte per element, 0 or 1 on the wire.
    Bool,
    /// Signed 64-bit integer, big-endian.
    Int64,
    /// IEEE 754 double, big-endian, bit patterns preserved.
    Float64,
}

impl Dtype {
    /// Canonical wire tag, as it appears in command and reply text.
    #[inline]
    pub const fn tag(&self) -> &'static str {
        match self {
            Dtype::Bool => "bool",
            Dtype::Int64 => "int64",
            Dtype::Float64 => "float64",
        }
    }

    /// Fixed element width in bytes.
    #[inline]
    pub const fn width(&self) -> usize {
        match self {
            Dtype::Bool => 1,
            Dtype::Int64 => 8,
            Dtype::Float64 => 8,
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Dtype {
    type Err = ArraywireError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "bool" => Ok(Dtype::Bool),
            "int64" => Ok(Dtype::Int64),
            "float64" => Ok(Dtype::Float64),
            other => Err(ArraywireError::UnsupportedDtype(other.to_string())),
        }
    }
}

/// Element width for any tag this layer knows how to account for,
/// the byte-buffer tag included.
pub(crate) fn tag_width(tag: &str) -> Option<usize> {
    if tag == BYTES_TAG {
        return Some(1);
    }
    tag.parse::<Dtype>().ok().map(|d| d.width())
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for bool {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
}

/// Local element types with a canonical wire dtype.
///
/// Sealed: the dtype set is closed, so the impls here are the whole story.
/// Each element packs to exactly [`Dtype::width`] big-endian bytes with no
/// padding between elements.
pub trait WireElement: sealed::Sealed + Copy + Send + Sync + 'static {
    /// The wire dtype this element type resolves to.
    const DTYPE: Dtype;

    /// Append the big-endian encoding of `self` to `buf`.
    fn put_be(self, buf: &mut BytesMut);

    /// Decode one element from exactly `Self::DTYPE.width()` bytes.
    fn get_be(bytes: &[u8]) -> Result<Self>;
}

impl WireElement for bool {
    const DTYPE: Dtype = Dtype::Bool;

    fn put_be(self, buf: &mut BytesMut) {
        buf.put_u8(self as u8);
    }

    fn get_be(bytes: &[u8]) -> Result<Self> {
        match be_array::<1>(bytes)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ArraywireError::Range(format!(
                "invalid boolean byte {other:#04x}"
            ))),
        }
    }
}

impl WireElement for i64 {
    const DTYPE: Dtype = Dtype::Int64;

    fn put_be(self, buf: &mut BytesMut) {
        buf.put_i64(self);
    }

    fn get_be(bytes: &[u8]) -> Result<Self> {
        Ok(i64::from_be_bytes(be_array(bytes)?))
    }
}

impl WireElement for f64 {
    const DTYPE: Dtype = Dtype::Float64;

    fn put_be(self, buf: &mut BytesMut) {
        // put_f64 goes through to_bits, so NaN payloads survive.
        buf.put_f64(self);
    }

    fn get_be(bytes: &[u8]) -> Result<Self> {
        Ok(f64::from_be_bytes(be_array(bytes)?))
    }
}

fn be_array<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| {
        ArraywireError::MalformedReply(format!(
            "expected {N} bytes for one element, got {}",
            bytes.len()
        ))
    })
}

/// A dynamically typed scalar argument.
///
/// Operations like `randint` take bounds whose wire rendering depends on the
/// caller-chosen target dtype, so the bounds arrive as [`Scalar`] values and
/// the text formatter decides whether the combination is renderable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl Scalar {
    /// The dtype this scalar resolves to on its own.
    #[inline]
    pub fn dtype(&self) -> Dtype {
        match self {
            Scalar::Bool(_) => Dtype::Bool,
            Scalar::Int(_) => Dtype::Int64,
            Scalar::Float(_) => Dtype::Float64,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::Float(v as f64)
    }
}
