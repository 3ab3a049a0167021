//! Device Module
//!
//! Owns one bounded byte store and hands out access handles to it.
//!
//! ## Responsibilities
//! - Create the store at initialization, release it at teardown
//! - Serialize access to the shared store
//! - Give every opened handle its own cursor
//! - Keep the open/release and byte-transfer counters

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{DeviceError, Result};
use crate::ops::{self, Whence};
use crate::protocol::Command;
use crate::store::{BoundedByteStore, PositionCursor};

/// Byte-addressable access with POSIX-style seek
///
/// Implemented by local handles and by the network client, so callers such
/// as the exerciser work against either.
pub trait ByteDevice {
    /// Read exactly `length` bytes at the cursor
    fn read(&mut self, length: usize) -> Result<Vec<u8>>;

    /// Write all of `data` at the cursor, returning the count written
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Move the cursor, returning the new position
    fn seek(&mut self, offset: i64, whence: Whence) -> Result<usize>;
}

/// Point-in-time device counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStats {
    pub capacity: u64,
    pub open_count: u64,
    pub release_count: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

/// A fixed-capacity byte device
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Writes**: take the store's write guard for the whole copy, so no
///   reader ever observes half of a write
/// - **Reads and seeks**: take a read guard; any number run concurrently
/// - **Cursors**: owned by each `Handle`, never shared, so they need no lock
///
/// Guards are scoped to a single operation and dropped on every return path,
/// including errors.
pub struct Device {
    name: String,
    major: u8,

    store: RwLock<BoundedByteStore>,

    open_count: AtomicU64,
    release_count: AtomicU64,
    bytes_read: AtomicU64,
    bytes_written: AtomicU64,
}

impl Device {
    /// Validate the config, allocate the store and register the device
    pub fn initialize(config: &Config) -> Result<Self> {
        config.validate()?;

        let store = BoundedByteStore::initialize(config.capacity).map_err(|e| {
            tracing::error!(
                "Failed to allocate memory for device with major number: {}",
                config.major
            );
            e
        })?;

        tracing::info!(
            "Registered device {} with major number {} ({} bytes)",
            config.device_name,
            config.major,
            config.capacity
        );

        Ok(Self {
            name: config.device_name.clone(),
            major: config.major,
            store: RwLock::new(store),
            open_count: AtomicU64::new(0),
            release_count: AtomicU64::new(0),
            bytes_read: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
        })
    }

    /// Attach a new handle with its cursor at offset 0
    pub fn open(self: &Arc<Self>) -> Handle {
        let id = self.open_count.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("Device {} has now been opened {} times", self.name, id);

        Handle {
            id,
            device: Arc::clone(self),
            cursor: PositionCursor::new(),
        }
    }

    /// Unregister the device and release its store
    ///
    /// Fails with `Busy` while handles (or anything else) still hold a
    /// reference; nothing is released in that case.
    pub fn teardown(self: Arc<Self>) -> Result<DeviceStats> {
        let device = Arc::try_unwrap(self)
            .map_err(|shared| DeviceError::Busy(Arc::strong_count(&shared) - 1))?;

        let stats = device.stats();
        device.store.into_inner().teardown();

        tracing::info!(
            "Device {} with major number {} unregistered",
            device.name,
            device.major
        );

        Ok(stats)
    }

    // =========================================================================
    // Locked operations
    // =========================================================================

    fn read_at(&self, cursor: &mut PositionCursor, length: usize) -> Result<Vec<u8>> {
        let store = self.store.read();
        let data = ops::read(&store, cursor, length)?;
        self.bytes_read.fetch_add(data.len() as u64, Ordering::Relaxed);
        Ok(data)
    }

    fn read_into_at(&self, cursor: &mut PositionCursor, buf: &mut [u8]) -> Result<usize> {
        let store = self.store.read();
        let count = ops::read_into(&store, cursor, buf)?;
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
        Ok(count)
    }

    fn write_at(&self, cursor: &mut PositionCursor, data: &[u8]) -> Result<usize> {
        let mut store = self.store.write();
        let count = ops::write(&mut store, cursor, data)?;
        self.bytes_written.fetch_add(count as u64, Ordering::Relaxed);
        Ok(count)
    }

    fn seek_from(&self, cursor: &mut PositionCursor, offset: i64, whence: Whence) -> Result<usize> {
        let store = self.store.read();
        ops::seek(&store, cursor, offset, whence)
    }

    fn release(&self, id: u64) {
        let count = self.release_count.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(
            "Device {} has been closed {} times (handle {})",
            self.name,
            count,
            id
        );
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn major(&self) -> u8 {
        self.major
    }

    pub fn capacity(&self) -> usize {
        self.store.read().capacity()
    }

    /// Copy of the raw store, sentinels intact
    pub fn snapshot(&self) -> Vec<u8> {
        self.store.read().as_bytes().to_vec()
    }

    pub fn stats(&self) -> DeviceStats {
        DeviceStats {
            capacity: self.capacity() as u64,
            open_count: self.open_count.load(Ordering::SeqCst),
            release_count: self.release_count.load(Ordering::SeqCst),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
        }
    }
}

// =============================================================================
// Handle
// =============================================================================

/// One open access to a device
///
/// Dropping the handle (or calling [`Handle::close`]) counts as a release.
pub struct Handle {
    id: u64,
    device: Arc<Device>,
    cursor: PositionCursor,
}

impl Handle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        self.cursor.offset()
    }

    pub fn read(&mut self, length: usize) -> Result<Vec<u8>> {
        self.device.read_at(&mut self.cursor, length)
    }

    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.device.read_into_at(&mut self.cursor, buf)
    }

    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.device.write_at(&mut self.cursor, data)
    }

    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<usize> {
        self.device.seek_from(&mut self.cursor, offset, whence)
    }

    /// Execute a wire command against this handle
    ///
    /// Returns the response payload: read data, the written count, the new
    /// position, serialized stats or `PONG`.
    pub fn execute(&mut self, command: Command) -> Result<Option<Vec<u8>>> {
        match command {
            Command::Read { length } => {
                let data = self.read(length as usize)?;
                Ok(Some(data))
            }
            Command::Write { data } => {
                let count = self.write(&data)?;
                Ok(Some((count as u32).to_be_bytes().to_vec()))
            }
            Command::Seek { offset, whence } => {
                let position = self.seek(offset, whence)?;
                Ok(Some((position as u64).to_be_bytes().to_vec()))
            }
            Command::Stats => Ok(Some(bincode::serialize(&self.device.stats())?)),
            Command::Ping => Ok(Some(b"PONG".to_vec())),
        }
    }

    /// Release the handle
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.device.release(self.id);
    }
}

impl ByteDevice for Handle {
    fn read(&mut self, length: usize) -> Result<Vec<u8>> {
        Handle::read(self, length)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        Handle::write(self, data)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<usize> {
        Handle::seek(self, offset, whence)
    }
}

// =============================================================================
// std::io adapters
// =============================================================================

impl io::Read for Handle {
    /// Short read near the end of the device, `Ok(0)` at `capacity`
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.device.capacity().saturating_sub(self.cursor.offset());
        let len = buf.len().min(remaining);
        Ok(self.read_into(&mut buf[..len])?)
    }
}

impl io::Write for Handle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(Handle::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Seek for Handle {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let (offset, whence) = match pos {
            io::SeekFrom::Start(offset) => (
                i64::try_from(offset).map_err(|_| DeviceError::OutOfRange)?,
                Whence::Absolute,
            ),
            io::SeekFrom::Current(offset) => (offset, Whence::RelativeToCurrent),
            io::SeekFrom::End(offset) => (offset, Whence::RelativeToEnd),
        };

        let position = Handle::seek(self, offset, whence)?;
        Ok(position as u64)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.cursor.offset() as u64)
    }
}
