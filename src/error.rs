//! Error types for arraywire-client.

use thiserror::Error;

use crate::dtype::Dtype;

/// Main error type for all arraywire operations.
#[derive(Debug, Error)]
pub enum ArraywireError {
    /// I/O error during transport operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Element type or dtype tag outside the supported set.
    #[error("unsupported dtype: {0}")]
    UnsupportedDtype(String),

    /// Value outside the dtype's representable range, or an argument
    /// outside its domain (negative size, inverted bounds, ...).
    #[error("range error: {0}")]
    Range(String),

    /// Zero stride in range generation.
    #[error("division by zero: stride must be non-zero")]
    DivisionByZero,

    /// Payload larger than the process-wide transfer limit.
    #[error("array exceeds transfer limit: {bytes} bytes > {limit} bytes (raise it with set_max_transfer_bytes)")]
    TransferLimitExceeded { bytes: u64, limit: u64 },

    /// Scalar not renderable in the target dtype's canonical text form.
    #[error("cannot format {value} as {dtype}")]
    Format { value: String, dtype: Dtype },

    /// Reply text does not parse as the expected descriptor shape.
    #[error("malformed reply: {0}")]
    MalformedReply(String),

    /// Transport-level failure outside this layer.
    #[error("transport error: {0}")]
    Transport(String),

    /// Connection closed unexpectedly.
    #[error("connection closed")]
    ConnectionClosed,
}

/// Result type alias using ArraywireError.
pub type Result<T> = std::result::Result<T, ArraywireError>;
