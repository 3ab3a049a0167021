//! Error types for bytedev
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using DeviceError
pub type Result<T> = std::result::Result<T, DeviceError>;

/// Unified error type for bytedev operations
#[derive(Debug, Error)]
pub enum DeviceError {
    // -------------------------------------------------------------------------
    // Boundary Errors
    // -------------------------------------------------------------------------
    /// Any read, write or seek that would leave the device bounds.
    ///
    /// Deliberately carries no detail: running off the front, off the back or
    /// starting from a negative offset are all the same failure.
    #[error("position out of range for device")]
    OutOfRange,

    #[error("unknown whence value: {0}")]
    InvalidWhence(i32),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("failed to allocate device storage: {0}")]
    Allocation(String),

    #[error("device busy: {0} other references still attached")]
    Busy(usize),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for DeviceError {
    fn from(err: bincode::Error) -> Self {
        DeviceError::Serialization(err.to_string())
    }
}

impl From<DeviceError> for std::io::Error {
    fn from(err: DeviceError) -> Self {
        use std::io::ErrorKind;

        match err {
            DeviceError::Io(e) => e,
            DeviceError::OutOfRange | DeviceError::InvalidWhence(_) => {
                std::io::Error::new(ErrorKind::InvalidInput, err)
            }
            other => std::io::Error::new(ErrorKind::Other, other),
        }
    }
}
