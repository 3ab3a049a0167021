//! Read operation

use crate::error::Result;
use crate::store::{BoundedByteStore, PositionCursor, HOLE_BYTE, SENTINEL};

use super::checked_span_end;

/// Read `length` bytes at the cursor, rendering holes as spaces
///
/// All or nothing: either exactly `length` bytes come back and the cursor
/// advances by `length`, or the call fails with `OutOfRange`.
pub fn read(
    store: &BoundedByteStore,
    cursor: &mut PositionCursor,
    length: usize,
) -> Result<Vec<u8>> {
    // Check before allocating so a huge bogus length fails cheaply
    checked_span_end(cursor.offset(), length, store.capacity())?;

    let mut buf = vec![0u8; length];
    read_into(store, cursor, &mut buf)?;
    Ok(buf)
}

/// Fill `buf` from the cursor, rendering holes as spaces
///
/// Returns `buf.len()` on success.
pub fn read_into(
    store: &BoundedByteStore,
    cursor: &mut PositionCursor,
    buf: &mut [u8],
) -> Result<usize> {
    let start = cursor.offset();
    let end = checked_span_end(start, buf.len(), store.capacity())?;

    for (out, &byte) in buf.iter_mut().zip(&store.as_bytes()[start..end]) {
        *out = if byte == SENTINEL { HOLE_BYTE } else { byte };
    }

    cursor.advance(buf.len());
    tracing::debug!("{} bytes successfully read from device", buf.len());

    Ok(buf.len())
}
