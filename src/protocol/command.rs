//! Command definitions
//!
//! Represents requests a client issues against its handle.

use crate::ops::Whence;

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Read = 0x01,
    Write = 0x02,
    Seek = 0x03,
    Stats = 0x04,
    Ping = 0x05,
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read `length` bytes at the handle's cursor
    Read { length: u32 },

    /// Write bytes at the handle's cursor
    Write { data: Vec<u8> },

    /// Reposition the handle's cursor
    Seek { offset: i64, whence: Whence },

    /// Fetch device counters
    Stats,

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Read { .. } => CommandType::Read,
            Command::Write { .. } => CommandType::Write,
            Command::Seek { .. } => CommandType::Seek,
            Command::Stats => CommandType::Stats,
            Command::Ping => CommandType::Ping,
        }
    }
}
