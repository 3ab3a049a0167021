//! Store Tests
//!
//! Tests verify:
//! - Sentinel fill on initialization
//! - Capacity bookkeeping
//! - Rejection of zero capacity
//! - Cursor construction

use bytedev::error::DeviceError;
use bytedev::store::{BoundedByteStore, PositionCursor, HOLE_BYTE, SENTINEL};

// =============================================================================
// BoundedByteStore Tests
// =============================================================================

#[test]
fn test_initialize_fills_with_sentinel() {
    let store = BoundedByteStore::initialize(1024).unwrap();

    assert_eq!(store.capacity(), 1024);
    assert_eq!(store.as_bytes().len(), 1024);
    assert!(store.as_bytes().iter().all(|&b| b == SENTINEL));
}

#[test]
fn test_last_index() {
    let store = BoundedByteStore::initialize(1024).unwrap();
    assert_eq!(store.last_index(), 1023);

    let tiny = BoundedByteStore::initialize(1).unwrap();
    assert_eq!(tiny.last_index(), 0);
}

#[test]
fn test_zero_capacity_rejected() {
    let result = BoundedByteStore::initialize(0);
    assert!(matches!(result, Err(DeviceError::Config(_))));
}

#[test]
fn test_impossible_capacity_is_allocation_error() {
    // More than isize::MAX bytes can never be reserved
    let result = BoundedByteStore::initialize(usize::MAX);
    assert!(matches!(result, Err(DeviceError::Allocation(_))));
}

#[test]
fn test_teardown_consumes_store() {
    let store = BoundedByteStore::initialize(16).unwrap();
    store.teardown();
}

#[test]
fn test_sentinel_and_hole_byte_values() {
    assert_eq!(SENTINEL, 0x00);
    assert_eq!(HOLE_BYTE, b' ');
}

// =============================================================================
// PositionCursor Tests
// =============================================================================

#[test]
fn test_new_cursor_starts_at_zero() {
    let cursor = PositionCursor::new();
    assert_eq!(cursor.offset(), 0);
    assert_eq!(cursor, PositionCursor::default());
}

#[test]
fn test_cursor_at_offset() {
    let cursor = PositionCursor::at(1020);
    assert_eq!(cursor.offset(), 1020);
}
