//! TCP Client
//!
//! Remote counterpart of a device handle: one connection, one cursor.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use crate::device::{ByteDevice, DeviceStats};
use crate::error::{DeviceError, Result};
use crate::ops::Whence;
use crate::protocol::{
    read_response, write_command, Command, Response, Status, MAX_PAYLOAD_SIZE,
};

/// Client connection to a device server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server; the server opens a handle for this connection
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Send a command and wait for its response
    pub fn request(&mut self, command: &Command) -> Result<Response> {
        write_command(&mut self.writer, command)?;
        read_response(&mut self.reader)
    }

    pub fn read(&mut self, length: usize) -> Result<Vec<u8>> {
        let length = u32::try_from(length).map_err(|_| DeviceError::OutOfRange)?;
        let payload = self.call(&Command::Read { length })?;
        Ok(payload.unwrap_or_default())
    }

    /// Fails with `Protocol` before sending if `data` cannot fit one frame
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        if data.len() > MAX_PAYLOAD_SIZE as usize {
            return Err(DeviceError::Protocol(format!(
                "write of {} bytes exceeds the {} byte frame limit",
                data.len(),
                MAX_PAYLOAD_SIZE
            )));
        }

        let payload = self.call(&Command::Write {
            data: data.to_vec(),
        })?;
        let count = fixed_payload::<4>(payload, "write count")?;
        Ok(u32::from_be_bytes(count) as usize)
    }

    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<usize> {
        let payload = self.call(&Command::Seek { offset, whence })?;
        let position = fixed_payload::<8>(payload, "seek position")?;
        Ok(u64::from_be_bytes(position) as usize)
    }

    pub fn stats(&mut self) -> Result<DeviceStats> {
        let payload = self
            .call(&Command::Stats)?
            .ok_or_else(|| DeviceError::Protocol("STATS response without payload".to_string()))?;
        Ok(bincode::deserialize(&payload)?)
    }

    pub fn ping(&mut self) -> Result<()> {
        match self.call(&Command::Ping)? {
            Some(ref pong) if pong.as_slice() == b"PONG" => Ok(()),
            other => Err(DeviceError::Protocol(format!(
                "unexpected PING reply: {:?}",
                other
            ))),
        }
    }

    /// Issue a command and turn a non-OK status back into an error
    fn call(&mut self, command: &Command) -> Result<Option<Vec<u8>>> {
        let response = self.request(command)?;
        match response.status {
            Status::Ok => Ok(response.payload),
            Status::OutOfRange => Err(DeviceError::OutOfRange),
            Status::Error => {
                let message = response
                    .payload
                    .map(|p| String::from_utf8_lossy(&p).into_owned())
                    .unwrap_or_default();
                Err(DeviceError::Network(message))
            }
        }
    }
}

fn fixed_payload<const N: usize>(payload: Option<Vec<u8>>, what: &str) -> Result<[u8; N]> {
    payload
        .as_deref()
        .and_then(|p| <[u8; N]>::try_from(p).ok())
        .ok_or_else(|| DeviceError::Protocol(format!("malformed {} in response", what)))
}

impl ByteDevice for Client {
    fn read(&mut self, length: usize) -> Result<Vec<u8>> {
        Client::read(self, length)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        Client::write(self, data)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<usize> {
        Client::seek(self, offset, whence)
    }
}
