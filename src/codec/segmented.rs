//! Segmented codec - the two-buffer layout for string arrays.
//!
//! The engine stores a string array as a pair: a byte buffer holding every
//! string's UTF-8 bytes with a terminator after each, and an offsets array
//! marking where each string starts. Offsets are the exclusive prefix sum of
//! the terminated lengths, so `offsets[0] == 0` and each consecutive
//! difference is that string's byte length plus one.
//!
//! The transfer guard is consulted against the total byte length before any
//! buffer is built, so an over-limit sequence fails without allocating.

use crate::error::Result;
use crate::transfer;

/// Terminator byte appended after every string, empty strings included.
pub const STRING_TERMINATOR: u8 = 0;

/// The materialized two-buffer layout of a string sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedBuffer {
    /// Start position of each string in `bytes`. One entry per string.
    pub offsets: Vec<i64>,
    /// Every string's UTF-8 bytes, each followed by [`STRING_TERMINATOR`].
    pub bytes: Vec<u8>,
}

impl SegmentedBuffer {
    /// Number of strings in the sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// True for the empty sequence.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Total size of the byte buffer.
    #[inline]
    pub fn total_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Encoder for the segmented string layout.
pub struct SegmentedCodec;

impl SegmentedCodec {
    /// Lay out a string sequence as offsets plus a terminated byte buffer.
    ///
    /// An empty sequence yields empty offsets and an empty buffer; callers
    /// transfer both buffers regardless, so zero-length string arrays take
    /// the same path as any other.
    ///
    /// # Errors
    ///
    /// `TransferLimitExceeded` when the total byte length (terminators
    /// included) is over the process-wide limit.
    pub fn encode<S: AsRef<str>>(values: &[S]) -> Result<SegmentedBuffer> {
        let mut total: u64 = 0;
        for value in values {
            total += value.as_ref().len() as u64 + 1;
        }
        transfer::check_transfer_size(total)?;

        let mut offsets = Vec::with_capacity(values.len());
        let mut bytes = Vec::with_capacity(total as usize);
        let mut cursor: i64 = 0;
        for value in values {
            let value = value.as_ref();
            offsets.push(cursor);
            bytes.extend_from_slice(value.as_bytes());
            bytes.push(STRING_TERMINATOR);
            cursor += value.len() as i64 + 1;
        }
        Ok(SegmentedBuffer { offsets, bytes })
    }
}
