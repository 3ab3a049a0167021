//! Exerciser
//!
//! Line-driven interactive test program for a device. Prompts for an option
//! (`r`ead, `w`rite, `s`eek), then for that option's parameters, and reports
//! failures the way a human tester expects to read them.
//!
//! ```text
//! option?
//! w
//! Enter the data you want to write: hello
//! option?
//! s
//! Enter an offset value: 0
//! Enter a value for whence: 0
//! option?
//! r
//! Enter the number of bytes you would like to read: 5
//! hello
//! ```

use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::device::ByteDevice;
use crate::error::Result;
use crate::ops::Whence;

pub const OPTION_PROMPT: &str = "option?";
pub const READ_PROMPT: &str = "Enter the number of bytes you would like to read: ";
pub const WRITE_PROMPT: &str = "Enter the data you want to write: ";
pub const OFFSET_PROMPT: &str = "Enter an offset value: ";
pub const WHENCE_PROMPT: &str = "Enter a value for whence: ";

pub const EXIT_MESSAGE: &str = "Program exiting";
pub const READ_ERROR: &str =
    "ERROR: Read operation failed, attempted to read beyond the contents of the file!";
pub const WRITE_ERROR: &str =
    "ERROR: Write operation failed, attempted to write beyond the end of the file!";
pub const SEEK_ERROR: &str = "ERROR: The combination of offset and whence you entered caused the file pointer to run out of bounds!";

/// Interactive session over an input and an output stream
pub struct Exerciser<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Exerciser<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    /// Run until the input is exhausted
    ///
    /// Device failures are reported to the output and do not end the
    /// session; only I/O errors on the session's own streams are returned.
    pub fn run<D: ByteDevice>(&mut self, device: &mut D) -> Result<()> {
        loop {
            writeln!(self.output, "{}", OPTION_PROMPT)?;
            self.output.flush()?;

            let Some(line) = self.next_line()? else {
                break;
            };

            let finished = match line.chars().next() {
                Some('r') => self.do_read(device)?,
                Some('w') => self.do_write(device)?,
                Some('s') => self.do_seek(device)?,
                _ => false,
            };

            if finished {
                break;
            }
        }

        writeln!(self.output, "{}", EXIT_MESSAGE)?;
        self.output.flush()?;
        Ok(())
    }

    /// Consume the output stream, returning it
    pub fn into_output(self) -> O {
        self.output
    }

    // Each option handler returns `true` when the input ran out mid-command.

    fn do_read<D: ByteDevice>(&mut self, device: &mut D) -> Result<bool> {
        let Some(length) = self.prompt_number::<usize>(READ_PROMPT)? else {
            return Ok(true);
        };

        match device.read(length) {
            Ok(data) if data.len() == length => {
                writeln!(self.output, "{}", String::from_utf8_lossy(&data))?;
            }
            Ok(_) | Err(_) => writeln!(self.output, "{}", READ_ERROR)?,
        }
        Ok(false)
    }

    fn do_write<D: ByteDevice>(&mut self, device: &mut D) -> Result<bool> {
        write!(self.output, "{}", WRITE_PROMPT)?;
        self.output.flush()?;

        let Some(data) = self.next_line()? else {
            return Ok(true);
        };

        if device.write(data.as_bytes()).is_err() {
            writeln!(self.output, "{}", WRITE_ERROR)?;
        }
        Ok(false)
    }

    fn do_seek<D: ByteDevice>(&mut self, device: &mut D) -> Result<bool> {
        let Some(offset) = self.prompt_number::<i64>(OFFSET_PROMPT)? else {
            return Ok(true);
        };
        let Some(whence) = self.prompt_number::<i32>(WHENCE_PROMPT)? else {
            return Ok(true);
        };

        let moved = Whence::try_from(whence).and_then(|whence| device.seek(offset, whence));
        if moved.is_err() {
            writeln!(self.output, "{}", SEEK_ERROR)?;
        }
        Ok(false)
    }

    /// Prompt until a line parses as `T`; `None` on end of input
    fn prompt_number<T: FromStr>(&mut self, prompt: &str) -> Result<Option<T>> {
        loop {
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;

            let Some(line) = self.next_line()? else {
                return Ok(None);
            };

            if let Some(value) = line.split_whitespace().next().and_then(|t| t.parse().ok()) {
                return Ok(Some(value));
            }
        }
    }

    /// Next input line without its line ending; `None` on end of input
    fn next_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}
