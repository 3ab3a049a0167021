//! Operations Module
//!
//! Stateless read/write/seek procedures over a store and a cursor.
//!
//! ## Rules
//! - Bounds are checked before any byte or the cursor is touched
//! - A failing call leaves both the store and the cursor unchanged
//! - Every boundary violation is the same error: `DeviceError::OutOfRange`
//!
//! Locking is the caller's concern; see [`crate::device::Device`].

mod read;
mod write;
mod seek;

pub use read::{read, read_into};
pub use write::write;
pub use seek::{seek, Whence};

use crate::error::{DeviceError, Result};

/// End of the span `[offset, offset + length)` if it fits in `capacity`
fn checked_span_end(offset: usize, length: usize, capacity: usize) -> Result<usize> {
    match offset.checked_add(length) {
        Some(end) if end <= capacity => Ok(end),
        _ => Err(DeviceError::OutOfRange),
    }
}
