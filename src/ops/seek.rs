//! Seek operation
//!
//! | Whence              | New position             | Valid when                        |
//! |---------------------|--------------------------|-----------------------------------|
//! | `Absolute`          | `offset`                 | `0 <= offset <= capacity - 1`     |
//! | `RelativeToCurrent` | `cursor + offset`        | `0 <= cursor + offset <= cap - 1` |
//! | `RelativeToEnd`     | `(capacity - 1) + offset`| `offset <= 0` and result `>= 0`   |
//!
//! "End" is the last physical slot of the store, not the end of written
//! content: `seek(0, RelativeToEnd)` lands on `capacity - 1` even when the
//! store is empty.

use std::fmt;

use crate::error::{DeviceError, Result};
use crate::store::{BoundedByteStore, PositionCursor};

/// Reference point a seek offset is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Whence {
    /// `SEEK_SET`
    Absolute = 0,
    /// `SEEK_CUR`
    RelativeToCurrent = 1,
    /// `SEEK_END`
    RelativeToEnd = 2,
}

impl Whence {
    /// POSIX whence code
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<i32> for Whence {
    type Error = DeviceError;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            0 => Ok(Whence::Absolute),
            1 => Ok(Whence::RelativeToCurrent),
            2 => Ok(Whence::RelativeToEnd),
            other => Err(DeviceError::InvalidWhence(other)),
        }
    }
}

impl fmt::Display for Whence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Whence::Absolute => "SEEK_SET",
            Whence::RelativeToCurrent => "SEEK_CUR",
            Whence::RelativeToEnd => "SEEK_END",
        };
        f.write_str(name)
    }
}

/// Move the cursor and return its new position
///
/// On failure the cursor keeps its previous position.
pub fn seek(
    store: &BoundedByteStore,
    cursor: &mut PositionCursor,
    offset: i64,
    whence: Whence,
) -> Result<usize> {
    // i128 holds every usize and i64 sum, so none of this can overflow
    let last = store.last_index() as i128;
    let offset = offset as i128;

    let target = match whence {
        Whence::Absolute => offset,
        Whence::RelativeToCurrent => cursor.offset() as i128 + offset,
        Whence::RelativeToEnd => {
            if offset > 0 {
                return Err(DeviceError::OutOfRange);
            }
            last + offset
        }
    };

    if !(0..=last).contains(&target) {
        return Err(DeviceError::OutOfRange);
    }

    let position = target as usize;
    cursor.set(position);
    tracing::trace!("seek {} {} -> {}", whence, offset, position);

    Ok(position)
}
