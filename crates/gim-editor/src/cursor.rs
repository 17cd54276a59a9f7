//! Cursor: logical position plus the direction of the last vertical move.
//!
//! Movement methods take a `past_end: bool` rather than a mode:
//!
//! - Normal and command-line modes: `past_end = false`, the cursor sits ON
//!   a character, so the column limit is `max(0, len - 1)`.
//! - Insert mode: `past_end = true`, the cursor may sit after the last
//!   character, so the column limit is `len`.
//!
//! Vertical moves keep the column where possible and clamp it to the new
//! line. The clamp is permanent: there is no remembered "desired column".
//!
//! The cursor also records which way it last moved vertically. The viewport
//! uses that when an edit makes the visible window overflow and it has to
//! choose which edge to keep.

use crate::buffer::Buffer;
use crate::position::Position;

/// Direction of the most recent vertical movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VerticalIntent {
    #[default]
    Up,
    Down,
}

/// A cursor in a buffer. Plain value; the buffer is passed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pos: Position,
    intent: VerticalIntent,
}

impl Cursor {
    /// At the origin, intent `Up`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pos: Position::ZERO,
            intent: VerticalIntent::Up,
        }
    }

    /// At `pos`, unclamped. Intended for tests and restoring state.
    #[must_use]
    pub const fn at(pos: Position) -> Self {
        Self {
            pos,
            intent: VerticalIntent::Up,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    #[must_use]
    pub const fn row(&self) -> usize {
        self.pos.row
    }

    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.pos.col
    }

    #[inline]
    #[must_use]
    pub const fn intent(&self) -> VerticalIntent {
        self.intent
    }

    // -- Direct positioning -------------------------------------------------

    /// Jump to `pos`, clamped to the buffer. Intent is left alone.
    pub fn set_position(&mut self, pos: Position, buf: &Buffer, past_end: bool) {
        self.pos = clamp(pos, buf, past_end);
    }

    /// Jump to `row` (clamped), keeping the column where possible. Intent
    /// follows the direction of the jump.
    pub fn goto_row(&mut self, row: usize, buf: &Buffer, past_end: bool) {
        let row = row.min(buf.line_count().saturating_sub(1));
        match row.cmp(&self.pos.row) {
            std::cmp::Ordering::Less => self.intent = VerticalIntent::Up,
            std::cmp::Ordering::Greater => self.intent = VerticalIntent::Down,
            std::cmp::Ordering::Equal => {}
        }
        self.pos = clamp(Position::new(row, self.pos.col), buf, past_end);
    }

    // -- Horizontal movement ------------------------------------------------

    /// One column left; stays at column 0.
    pub fn move_left(&mut self, buf: &Buffer, past_end: bool) {
        let col = self.pos.col.min(max_col_for_line(buf, self.pos.row, past_end));
        self.pos.col = col.saturating_sub(1);
    }

    /// One column right, stopping at the line's limit.
    pub fn move_right(&mut self, buf: &Buffer, past_end: bool) {
        self.pos.col = (self.pos.col + 1).min(max_col_for_line(buf, self.pos.row, past_end));
    }

    /// Column 0.
    pub const fn move_to_line_start(&mut self) {
        self.pos.col = 0;
    }

    /// Last char (`past_end = false`) or just after it (`past_end = true`).
    pub fn move_to_line_end(&mut self, buf: &Buffer, past_end: bool) {
        self.pos.col = max_col_for_line(buf, self.pos.row, past_end);
    }

    // -- Vertical movement --------------------------------------------------

    /// One row up; no-op on the first row except for recording intent.
    pub fn move_up(&mut self, buf: &Buffer, past_end: bool) {
        self.intent = VerticalIntent::Up;
        self.pos.row = self.pos.row.saturating_sub(1);
        self.clamp(buf, past_end);
    }

    /// One row down; no-op on the last row except for recording intent.
    pub fn move_down(&mut self, buf: &Buffer, past_end: bool) {
        self.intent = VerticalIntent::Down;
        if self.pos.row + 1 < buf.line_count() {
            self.pos.row += 1;
        }
        self.clamp(buf, past_end);
    }

    // -- Clamping -----------------------------------------------------------

    /// Pull the cursor back inside the buffer after an edit or mode change.
    pub fn clamp(&mut self, buf: &Buffer, past_end: bool) {
        self.pos = clamp(self.pos, buf, past_end);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Largest valid column on `row`: `len` when `past_end`, else `len - 1`
/// (0 for an empty line).
#[must_use]
pub fn max_col_for_line(buf: &Buffer, row: usize, past_end: bool) -> usize {
    let len = buf.line_len(row);
    if past_end { len } else { len.saturating_sub(1) }
}

fn clamp(pos: Position, buf: &Buffer, past_end: bool) -> Position {
    let row = pos.row.min(buf.line_count().saturating_sub(1));
    Position::new(row, pos.col.min(max_col_for_line(buf, row, past_end)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(lines: &[&str]) -> Buffer {
        Buffer::from_lines(lines)
    }

    // -- Horizontal ---------------------------------------------------------

    #[test]
    fn right_stops_on_last_char_in_normal() {
        let b = buf(&["hello"]);
        let mut c = Cursor::new();
        for _ in 0..5 {
            c.move_right(&b, false);
        }
        assert_eq!(c.col(), 4);
    }

    #[test]
    fn right_reaches_past_end_in_insert() {
        let b = buf(&["hi"]);
        let mut c = Cursor::new();
        for _ in 0..5 {
            c.move_right(&b, true);
        }
        assert_eq!(c.col(), 2);
    }

    #[test]
    fn left_stops_at_zero() {
        let b = buf(&["ab"]);
        let mut c = Cursor::at(Position::new(0, 1));
        c.move_left(&b, false);
        c.move_left(&b, false);
        assert_eq!(c.col(), 0);
    }

    #[test]
    fn left_from_past_end_column_in_normal() {
        let b = buf(&["abc"]);
        let mut c = Cursor::at(Position::new(0, 3));
        c.move_left(&b, false);
        assert_eq!(c.col(), 1);
    }

    #[test]
    fn line_start_and_end() {
        let b = buf(&["abcd"]);
        let mut c = Cursor::at(Position::new(0, 2));
        c.move_to_line_end(&b, false);
        assert_eq!(c.col(), 3);
        c.move_to_line_end(&b, true);
        assert_eq!(c.col(), 4);
        c.move_to_line_start();
        assert_eq!(c.col(), 0);
    }

    #[test]
    fn empty_line_limits_are_zero() {
        let b = buf(&[""]);
        assert_eq!(max_col_for_line(&b, 0, false), 0);
        assert_eq!(max_col_for_line(&b, 0, true), 0);
    }

    // -- Vertical -----------------------------------------------------------

    #[test]
    fn down_clamps_column_permanently() {
        let b = buf(&["long line", "ab", "long line"]);
        let mut c = Cursor::at(Position::new(0, 7));
        c.move_down(&b, false);
        assert_eq!(c.position(), Position::new(1, 1));
        c.move_down(&b, false);
        assert_eq!(c.position(), Position::new(2, 1));
    }

    #[test]
    fn vertical_moves_record_intent() {
        let b = buf(&["a", "b"]);
        let mut c = Cursor::new();
        assert_eq!(c.intent(), VerticalIntent::Up);
        c.move_down(&b, false);
        assert_eq!(c.intent(), VerticalIntent::Down);
        c.move_up(&b, false);
        assert_eq!(c.intent(), VerticalIntent::Up);
    }

    #[test]
    fn vertical_moves_stop_at_edges() {
        let b = buf(&["a", "b"]);
        let mut c = Cursor::new();
        c.move_up(&b, false);
        assert_eq!(c.row(), 0);
        c.move_down(&b, false);
        c.move_down(&b, false);
        assert_eq!(c.row(), 1);
    }

    #[test]
    fn insert_clamp_allows_len() {
        let b = buf(&["abcdef", "abc"]);
        let mut c = Cursor::at(Position::new(0, 6));
        c.move_down(&b, true);
        assert_eq!(c.position(), Position::new(1, 3));
    }

    // -- Jumps --------------------------------------------------------------

    #[test]
    fn goto_row_clamps_and_sets_intent() {
        let b = buf(&["a", "bb", "ccc"]);
        let mut c = Cursor::at(Position::new(1, 1));
        c.goto_row(99, &b, false);
        assert_eq!(c.position(), Position::new(2, 1));
        assert_eq!(c.intent(), VerticalIntent::Down);
        c.goto_row(0, &b, false);
        assert_eq!(c.position(), Position::new(0, 0));
        assert_eq!(c.intent(), VerticalIntent::Up);
    }

    #[test]
    fn clamp_after_buffer_shrinks() {
        let b = buf(&["xy"]);
        let mut c = Cursor::at(Position::new(3, 9));
        c.clamp(&b, false);
        assert_eq!(c.position(), Position::new(0, 1));
    }
}
