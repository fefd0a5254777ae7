//! The parse cursor
//!
//! A cursor is a single index into the token sequence. Combinators that may
//! fail work on a [`Cursor::fork`] and only [`Cursor::commit`] the caller's
//! cursor once they succeed, so a failed attempt never moves the caller.

/// Position into a token sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor {
    position: usize,
}

impl Cursor {
    pub const fn new(position: usize) -> Self {
        Self { position }
    }

    pub const fn position(&self) -> usize {
        self.position
    }

    /// A private copy for a speculative attempt.
    pub const fn fork(&self) -> Self {
        *self
    }

    /// Adopt the position reached by a successful fork.
    pub fn commit(&mut self, fork: Cursor) {
        self.position = fork.position;
    }

    /// Move past `count` tokens.
    pub fn advance(&mut self, count: usize) {
        self.position += count;
    }
}
