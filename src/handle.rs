//! Handles to arrays living on the engine.
//!
//! A handle is pure identity: the server-assigned name plus the dtype tag
//! and element count the engine reported at creation. Handles hold no
//! element data and never perform I/O on their own; dropping one does not
//! free the remote array.

use serde::{Deserialize, Serialize};

use crate::dtype::{tag_width, Dtype};
use crate::protocol::Descriptor;

/// Identity record for one remote array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayHandle {
    name: String,
    dtype: String,
    size: u64,
}

impl ArrayHandle {
    /// Server-assigned name addressing the array in later commands.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw dtype tag as reported by the engine.
    #[inline]
    pub fn dtype_tag(&self) -> &str {
        &self.dtype
    }

    /// The creation dtype, when the tag names one. A strings byte buffer
    /// reports `uint8` and yields `None` here.
    pub fn dtype(&self) -> Option<Dtype> {
        self.dtype.parse().ok()
    }

    /// Element count.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Remote payload size in bytes, when the tag's element width is known
    /// and the product fits in `u64`. The size is engine-reported and
    /// untrusted, so the multiplication is checked.
    pub fn size_bytes(&self) -> Option<u64> {
        tag_width(&self.dtype).and_then(|width| self.size.checked_mul(width as u64))
    }
}

impl From<Descriptor> for ArrayHandle {
    fn from(descriptor: Descriptor) -> Self {
        Self {
            name: descriptor.name,
            dtype: descriptor.dtype,
            size: descriptor.size,
        }
    }
}

/// A string array on the engine: offsets array plus byte buffer.
///
/// Created as a pair and addressed as a pair; the two halves only mean
/// something together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentedString {
    offsets: ArrayHandle,
    bytes: ArrayHandle,
}

impl SegmentedString {
    /// Object-type token identifying string arrays in segmented commands.
    pub const OBJTYPE: &'static str = "str";

    /// Assemble from the two creation handles.
    pub fn new(offsets: ArrayHandle, bytes: ArrayHandle) -> Self {
        Self { offsets, bytes }
    }

    /// Handle of the Int64 offsets array.
    #[inline]
    pub fn offsets(&self) -> &ArrayHandle {
        &self.offsets
    }

    /// Handle of the byte-buffer array.
    #[inline]
    pub fn bytes(&self) -> &ArrayHandle {
        &self.bytes
    }

    /// Number of strings: one offset per string.
    #[inline]
    pub fn len(&self) -> u64 {
        self.offsets.size()
    }

    /// True for a zero-string array.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total size of the remote byte buffer, terminators included.
    #[inline]
    pub fn total_bytes(&self) -> u64 {
        self.bytes.size()
    }
}

/// A suffix-array result: offsets array plus the suffix values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixArray {
    offsets: ArrayHandle,
    values: ArrayHandle,
}

impl SuffixArray {
    /// Assemble from the two creation handles.
    pub fn new(offsets: ArrayHandle, values: ArrayHandle) -> Self {
        Self { offsets, values }
    }

    /// Handle of the offsets array.
    #[inline]
    pub fn offsets(&self) -> &ArrayHandle {
        &self.offsets
    }

    /// Handle of the suffix-values array.
    #[inline]
    pub fn values(&self) -> &ArrayHandle {
        &self.values
    }

    /// Number of source strings.
    #[inline]
    pub fn len(&self) -> u64 {
        self.offsets.size()
    }

    /// True when built from zero strings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
