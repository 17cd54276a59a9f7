//! Text positions.
//!
//! Coordinates are **0-indexed**: row 0 is the first line, column 0 the first
//! character. Columns count chars, not bytes, which is also how `ropey`
//! indexes text.
//!
//! Anything shown to the user (status line, `:N` goto) is 1-indexed; that
//! conversion happens at the edges, never here.

use std::fmt;

/// A logical position in the buffer: (row, column).
///
/// Ordered row first, then column.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const ZERO: Self = Self { row: 0, col: 0 };

    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.row, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row + 1, self.col + 1)
    }
}
