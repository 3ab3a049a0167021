//! Store Module
//!
//! The fixed-capacity byte array behind a device, and the per-handle cursor
//! that addresses it.
//!
//! ## Layout
//! ```text
//! ┌───────┬───────┬───────┬───────┬───────┬─────────────┬───────┐
//! │  'a'  │  'b'  │  'c'  │ 0x00  │ 0x00  │     ...     │ 0x00  │
//! └───────┴───────┴───────┴───────┴───────┴─────────────┴───────┘
//!   0       1       2       3       4                     capacity - 1
//!                           └─ hole (never written) ─────────────┘
//! ```
//!
//! Every slot starts as [`SENTINEL`]. Reads render sentinel slots as
//! [`HOLE_BYTE`]; writes store bytes verbatim.
//!
//! ## Known limitation
//! A deliberately written `0x00` is indistinguishable from a slot that was
//! never written, and reads back as a space.

mod buffer;
mod cursor;

pub use buffer::BoundedByteStore;
pub use cursor::PositionCursor;

/// Byte value marking a slot that has never been written
pub const SENTINEL: u8 = 0x00;

/// Byte produced on read in place of a sentinel slot
pub const HOLE_BYTE: u8 = b' ';
