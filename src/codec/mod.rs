//! Codec module - payload encoding for array transfers.
//!
//! This module turns local element sequences into the engine's wire shapes:
//!
//! - [`BinaryCodec`] - packed big-endian element bodies for numeric arrays
//! - [`SegmentedCodec`] - offsets + terminated byte buffer for string arrays
//! - [`NumericText`] - canonical text tokens for scalar command arguments
//!
//! # Design
//!
//! Codecs are implemented as marker structs with static methods rather than
//! trait objects. Encoding is pure: the transfer-size guard is consulted
//! before buffers are materialized, and nothing here talks to a transport.
//!
//! # Example
//!
//! ```
//! use arraywire_client::codec::{BinaryCodec, NumericText};
//!
//! let body = BinaryCodec::pack(&[1i64, 2, 3]);
//! assert_eq!(body.len(), 24);
//! let back: Vec<i64> = BinaryCodec::unpack(&body).unwrap();
//! assert_eq!(back, vec![1, 2, 3]);
//!
//! assert_eq!(NumericText::int_token(-7), "-7");
//! ```

mod binary;
mod segmented;
mod text;

pub use binary::BinaryCodec;
pub use segmented::{SegmentedBuffer, SegmentedCodec, STRING_TERMINATOR};
pub use text::NumericText;
