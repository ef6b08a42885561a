//! Process-wide transfer-size limit.
//!
//! A client-side ceiling on how many bytes a single array transfer may move,
//! checked before any buffer is materialized or sent. The limit is ordinary
//! mutable configuration: callers may raise or lower it between operations,
//! and concurrent readers may observe either value during an update.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{ArraywireError, Result};

/// Default ceiling on a single array transfer: 1 GiB.
pub const DEFAULT_MAX_TRANSFER_BYTES: u64 = 1_073_741_824;

static MAX_TRANSFER_BYTES: AtomicU64 = AtomicU64::new(DEFAULT_MAX_TRANSFER_BYTES);

/// Current transfer limit in bytes.
#[inline]
pub fn max_transfer_bytes() -> u64 {
    MAX_TRANSFER_BYTES.load(Ordering::Acquire)
}

/// Replace the transfer limit. Takes effect for subsequent checks.
pub fn set_max_transfer_bytes(limit: u64) {
    MAX_TRANSFER_BYTES.store(limit, Ordering::Release);
}

/// Check a payload size against the current limit.
///
/// A payload of exactly the limit passes; one byte more fails with
/// `TransferLimitExceeded` carrying both the payload size and the limit it
/// was checked against.
pub fn check_transfer_size(total_bytes: u64) -> Result<()> {
    check_against(total_bytes, max_transfer_bytes())
}

/// Check an element payload of `count` elements, `width` bytes each.
///
/// The multiplication saturates, so a size that overflows `u64` is reported
/// as exceeding the limit rather than wrapping past it.
pub fn check_array_transfer(count: usize, width: usize) -> Result<()> {
    let bytes = (count as u64).checked_mul(width as u64).unwrap_or(u64::MAX);
    check_transfer_size(bytes)
}

fn check_against(total_bytes: u64, limit: u64) -> Result<()> {
    if total_bytes > limit {
        return Err(ArraywireError::TransferLimitExceeded {
            bytes: total_bytes,
            limit,
        });
    }
    Ok(())
}
