//! Binary codec - packed big-endian element bodies.
//!
//! The body of an `array` command is the elements and nothing else: no
//! preamble, no padding, every element exactly its dtype's width. Element
//! count and dtype travel in the command's text header, so the receiver
//! knows the layout before the first body byte.
//!
//! # Example
//!
//! ```
//! use arraywire_client::codec::BinaryCodec;
//!
//! let body = BinaryCodec::pack(&[1i64, -1]);
//! assert_eq!(&body[..], &[0, 0, 0, 0, 0, 0, 0, 1, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
//! ```

use bytes::{Bytes, BytesMut};

use crate::dtype::WireElement;
use crate::error::{ArraywireError, Result};

/// Packed big-endian codec for numeric array bodies.
pub struct BinaryCodec;

impl BinaryCodec {
    /// Pack an element sequence into a contiguous big-endian body.
    pub fn pack<E: WireElement>(values: &[E]) -> Bytes {
        let mut buf = BytesMut::with_capacity(values.len() * E::DTYPE.width());
        for value in values {
            value.put_be(&mut buf);
        }
        buf.freeze()
    }

    /// Unpack a body produced by [`BinaryCodec::pack`].
    ///
    /// # Errors
    ///
    /// `MalformedReply` when the body length is not a whole number of
    /// elements; `Range` when a boolean byte is neither 0 nor 1.
    pub fn unpack<E: WireElement>(body: &[u8]) -> Result<Vec<E>> {
        let width = E::DTYPE.width();
        if body.len() % width != 0 {
            return Err(ArraywireError::MalformedReply(format!(
                "binary body of {} bytes is not a whole number of {} elements ({} bytes each)",
                body.len(),
                E::DTYPE,
                width
            )));
        }
        let mut values = Vec::with_capacity(body.len() / width);
        for (index, chunk) in body.chunks_exact(width).enumerate() {
            values.push(E::get_be(chunk).map_err(|e| at_element(e, index))?);
        }
        Ok(values)
    }
}

/// Attach the element index to a per-element range failure.
fn at_element(err: ArraywireError, index: usize) -> ArraywireError {
    match err {
        ArraywireError::Range(msg) => ArraywireError::Range(format!("{msg} at element {index}")),
        other => other,
    }
}
