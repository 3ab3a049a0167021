//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Payload by Command Type
//! - READ:  length (4 bytes)
//! - WRITE: data
//! - SEEK:  offset (8 bytes, two's complement) + whence (1 byte)
//! - STATS: empty
//! - PING:  empty
//!
//! All integers are big-endian.

use std::io::{Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::{Command, Response, Status};
use crate::error::{DeviceError, Result};
use crate::ops::Whence;

/// Header size: 1 byte command/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

const SEEK_PAYLOAD_SIZE: usize = 9;

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: cmd_type (1) + payload_len (4) + payload
pub fn encode_command(command: &Command) -> Bytes {
    let mut payload = BytesMut::new();
    match command {
        Command::Read { length } => payload.put_u32(*length),
        Command::Write { data } => payload.put_slice(data),
        Command::Seek { offset, whence } => {
            payload.put_i64(*offset);
            payload.put_u8(whence.code());
        }
        Command::Stats | Command::Ping => {}
    }

    frame(command.command_type() as u8, &payload)
}

/// Decode a command from bytes
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let (cmd_type, mut payload) = split_frame(bytes, "command")?;

    match cmd_type {
        0x01 => {
            expect_len(payload, 4, "READ")?;
            Ok(Command::Read {
                length: payload.get_u32(),
            })
        }
        0x02 => Ok(Command::Write {
            data: payload.to_vec(),
        }),
        0x03 => {
            expect_len(payload, SEEK_PAYLOAD_SIZE, "SEEK")?;
            let offset = payload.get_i64();
            let whence = Whence::try_from(i32::from(payload.get_u8()))
                .map_err(|e| DeviceError::Protocol(format!("SEEK command: {}", e)))?;
            Ok(Command::Seek { offset, whence })
        }
        0x04 => {
            expect_len(payload, 0, "STATS")?;
            Ok(Command::Stats)
        }
        0x05 => {
            expect_len(payload, 0, "PING")?;
            Ok(Command::Ping)
        }
        _ => Err(DeviceError::Protocol(format!(
            "Unknown command type: 0x{:02x}",
            cmd_type
        ))),
    }
}

fn expect_len(payload: &[u8], expected: usize, name: &str) -> Result<()> {
    if payload.len() != expected {
        return Err(DeviceError::Protocol(format!(
            "{} command: expected {} payload bytes, got {}",
            name,
            expected,
            payload.len()
        )));
    }
    Ok(())
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload
pub fn encode_response(response: &Response) -> Bytes {
    let payload = response.payload.as_deref().unwrap_or(&[]);
    frame(response.status as u8, payload)
}

/// Decode a response from bytes
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let (status_byte, payload) = split_frame(bytes, "response")?;

    let status = match status_byte {
        0x00 => Status::Ok,
        0x01 => Status::OutOfRange,
        0x02 => Status::Error,
        _ => {
            return Err(DeviceError::Protocol(format!(
                "Unknown response status: 0x{:02x}",
                status_byte
            )))
        }
    };

    let payload = if payload.is_empty() {
        None
    } else {
        Some(payload.to_vec())
    };

    Ok(Response { status, payload })
}

// =============================================================================
// Framing
// =============================================================================

fn frame(tag: u8, payload: &[u8]) -> Bytes {
    let mut message = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    message.put_u8(tag);
    message.put_u32(payload.len() as u32);
    message.put_slice(payload);
    message.freeze()
}

/// Split a complete frame into its tag byte and payload
fn split_frame<'a>(bytes: &'a [u8], what: &str) -> Result<(u8, &'a [u8])> {
    if bytes.len() < HEADER_SIZE {
        return Err(DeviceError::Protocol(format!(
            "Incomplete {} header: expected {} bytes, got {}",
            what,
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut header = &bytes[..HEADER_SIZE];
    let tag = header.get_u8();
    let payload_len = checked_payload_len(header.get_u32())?;

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(DeviceError::Protocol(format!(
            "Incomplete {} payload: expected {} bytes, got {}",
            what,
            total_len,
            bytes.len()
        )));
    }

    Ok((tag, &bytes[HEADER_SIZE..total_len]))
}

fn checked_payload_len(len: u32) -> Result<usize> {
    if len > MAX_PAYLOAD_SIZE {
        return Err(DeviceError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            len, MAX_PAYLOAD_SIZE
        )));
    }
    Ok(len as usize)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one complete frame (header + payload) from a stream
fn read_frame<R: Read>(reader: &mut R) -> Result<BytesMut> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len =
        checked_payload_len(u32::from_be_bytes([header[1], header[2], header[3], header[4]]))?;

    let mut message = BytesMut::zeroed(HEADER_SIZE + payload_len);
    message[..HEADER_SIZE].copy_from_slice(&header);
    if payload_len > 0 {
        reader.read_exact(&mut message[HEADER_SIZE..])?;
    }

    Ok(message)
}

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let message = read_frame(reader)?;
    decode_command(&message)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let message = read_frame(reader)?;
    decode_response(&message)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let bytes = encode_response(response);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
