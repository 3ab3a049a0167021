//! Write operation

use crate::error::Result;
use crate::store::{BoundedByteStore, PositionCursor};

use super::checked_span_end;

/// Copy `data` verbatim into the store at the cursor
///
/// No prefix is written when the span does not fit. Sentinel substitution
/// is read-side only, so a written `0x00` is stored as-is.
pub fn write(
    store: &mut BoundedByteStore,
    cursor: &mut PositionCursor,
    data: &[u8],
) -> Result<usize> {
    let start = cursor.offset();
    let end = checked_span_end(start, data.len(), store.capacity())?;

    store.bytes_mut()[start..end].copy_from_slice(data);

    cursor.advance(data.len());
    tracing::debug!("{} bytes written to device", data.len());

    Ok(data.len())
}
