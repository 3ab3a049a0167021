//! # bytedev
//!
//! A fixed-capacity, byte-addressable device emulator with:
//! - POSIX-style read/write/seek over a bounded store
//! - Holes (never-written bytes) rendered as spaces on read
//! - Single-writer/multi-reader access to the shared store
//! - A TCP namespace exposing the device, one cursor per client
//! - An interactive exerciser for poking at it by hand
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │             Exerciser / TCP Server (Clients)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ open / close
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │              Handle (one PositionCursor each)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ read / write / seek
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                Device (RwLock, counters)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │BoundedByteStore│
//!               │ (1024 bytes)  │
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod ops;
pub mod device;
pub mod protocol;
pub mod network;
pub mod exerciser;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DeviceError, Result};
pub use config::{Config, DEFAULT_CAPACITY};
pub use device::{ByteDevice, Device, DeviceStats, Handle};
pub use ops::Whence;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of bytedev
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
