//! Bounded byte store
//!
//! Owns the device bytes and the sentinel-fill invariant.

use crate::error::{DeviceError, Result};

use super::SENTINEL;

/// Fixed-size byte array modeling device content
///
/// The length of `bytes` equals `capacity` for the whole lifetime of the
/// store. There is no public mutation API; only the write operation touches
/// the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedByteStore {
    bytes: Vec<u8>,
}

impl BoundedByteStore {
    /// Allocate a store of `capacity` bytes, every slot set to the sentinel
    ///
    /// Fails with `Config` for a zero capacity and with `Allocation` when
    /// the memory cannot be reserved.
    pub fn initialize(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(DeviceError::Config(
                "store capacity must be positive".to_string(),
            ));
        }

        let mut bytes = Vec::new();
        bytes.try_reserve_exact(capacity).map_err(|e| {
            DeviceError::Allocation(format!("{} bytes: {}", capacity, e))
        })?;
        bytes.resize(capacity, SENTINEL);

        Ok(Self { bytes })
    }

    /// Number of byte slots
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Index of the last byte slot, the reference point for `RelativeToEnd`
    pub fn last_index(&self) -> usize {
        self.bytes.len() - 1
    }

    /// Raw contents, sentinels included
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable view for the write operation
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Release the storage
    pub fn teardown(self) {
        drop(self.bytes);
    }
}
