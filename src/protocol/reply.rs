//! Reply parsing - descriptor text into typed records.
//!
//! The engine answers a creation command with descriptor text: the new
//! array's name, its dtype tag, and its element count, optionally preceded
//! by an acknowledgement keyword and followed by geometry fields this layer
//! does not interpret. Two-buffer objects come back as two descriptors
//! joined by [`PAIR_DELIMITER`].
//!
//! Parsing never talks back to the engine and never infers allocation
//! status; a reply either has the expected shape or the whole text is
//! surfaced in a `MalformedReply` error.

use serde::{Deserialize, Serialize};

use crate::error::{ArraywireError, Result};

/// Delimiter between the two descriptors of a pair reply.
pub const PAIR_DELIMITER: char = '+';

/// Acknowledgement keyword replies may carry before the descriptor fields.
const CREATED_KEYWORD: &str = "created";

/// One array descriptor from a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Server-assigned identifier addressing the array in later commands.
    pub name: String,
    /// Raw dtype tag as reported by the engine. Kept opaque so tags outside
    /// the creation set (the strings byte buffer's `uint8`) survive.
    pub dtype: String,
    /// Element count.
    pub size: u64,
}

impl Descriptor {
    /// Parse one descriptor from reply text.
    ///
    /// # Errors
    ///
    /// `MalformedReply` when the name, dtype tag, or element count is
    /// missing, or the count is not a non-negative decimal integer.
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = text.split_whitespace().peekable();
        if tokens.peek() == Some(&CREATED_KEYWORD) {
            tokens.next();
        }
        let name = tokens
            .next()
            .ok_or_else(|| malformed(text, "missing array name"))?;
        let dtype = tokens
            .next()
            .ok_or_else(|| malformed(text, "missing dtype tag"))?;
        let size = tokens
            .next()
            .ok_or_else(|| malformed(text, "missing element count"))?
            .parse::<u64>()
            .map_err(|_| malformed(text, "element count is not a non-negative integer"))?;
        // Trailing tokens are engine geometry; ignored here.
        Ok(Self {
            name: name.to_string(),
            dtype: dtype.to_string(),
            size,
        })
    }
}

/// Parse a reply expected to carry exactly one descriptor.
pub fn parse_single(reply: &str) -> Result<Descriptor> {
    if reply.contains(PAIR_DELIMITER) {
        return Err(malformed(reply, "expected one descriptor, found a pair"));
    }
    Descriptor::parse(reply)
}

/// Parse a reply expected to carry exactly two descriptors.
///
/// # Errors
///
/// `MalformedReply` unless the reply splits on [`PAIR_DELIMITER`] into
/// exactly two parts, each a well-formed descriptor.
pub fn parse_pair(reply: &str) -> Result<(Descriptor, Descriptor)> {
    let mut parts = reply.split(PAIR_DELIMITER);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) => {
            Ok((Descriptor::parse(first)?, Descriptor::parse(second)?))
        }
        _ => Err(malformed(
            reply,
            "expected exactly two descriptors joined by '+'",
        )),
    }
}

fn malformed(reply: &str, why: &str) -> ArraywireError {
    ArraywireError::MalformedReply(format!("{why} in {reply:?}"))
}
