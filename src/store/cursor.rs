//! Position cursor

/// Current byte position of one access handle
///
/// Only the read, write and seek operations move it. Valid positions are
/// `0..=capacity`; `capacity` itself is reachable by reading or writing up
/// to the end, but not by seeking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionCursor {
    offset: usize,
}

impl PositionCursor {
    /// Cursor at the start of the store
    pub fn new() -> Self {
        Self { offset: 0 }
    }

    /// Cursor at an arbitrary offset
    ///
    /// The offset is not checked here; the operations check it against the
    /// store on every call.
    pub fn at(offset: usize) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn set(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub(crate) fn advance(&mut self, count: usize) {
        self.offset += count;
    }
}
