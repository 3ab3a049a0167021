//! Configuration for bytedev
//!
//! Centralized configuration with sensible defaults.

use crate::error::{DeviceError, Result};

/// Capacity of the reference device, in bytes
pub const DEFAULT_CAPACITY: usize = 1024;

/// Main configuration for a bytedev instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Device Configuration
    // -------------------------------------------------------------------------
    /// Size of the backing store in bytes. Fixed once the device is initialized.
    pub capacity: usize,

    /// Name the device is registered under
    pub device_name: String,

    /// Major number the device is registered with (240-254 are experimental)
    pub major: u8,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address of the device namespace
    pub listen_addr: String,

    /// Worker threads serving connections; also the max concurrent clients
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            device_name: "PA2Device".to_string(),
            major: 240,
            listen_addr: "127.0.0.1:7240".to_string(),
            max_connections: 16,
            read_timeout_ms: 30_000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the values a device cannot be built from
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(DeviceError::Config(
                "capacity must be positive".to_string(),
            ));
        }

        if self.max_connections == 0 {
            return Err(DeviceError::Config(
                "max_connections must be positive".to_string(),
            ));
        }

        if self.device_name.is_empty() {
            return Err(DeviceError::Config(
                "device_name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the store capacity (in bytes)
    pub fn capacity(mut self, bytes: usize) -> Self {
        self.config.capacity = bytes;
        self
    }

    /// Set the registered device name
    pub fn device_name(mut self, name: impl Into<String>) -> Self {
        self.config.device_name = name.into();
        self
    }

    /// Set the registered major number
    pub fn major(mut self, major: u8) -> Self {
        self.config.major = major;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
