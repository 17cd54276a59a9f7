// SPDX-License-Identifier: MIT
//
// FrameBuffer: the grid the editor paints a frame into.
//
// Row-major `Vec<Cell>`, one entry per screen position. The editor
// clears it, writes text rows, the `~` filler and the status line, and
// hands it to the diff renderer. Writes outside the grid are dropped.

use unicode_width::UnicodeWidthChar;

use crate::cell::{Attr, Cell};
use crate::color::CellColor;

/// Glyph painted in place of characters that are not one column wide.
pub const SUBSTITUTE: char = '\u{fffd}';

/// A 2D buffer of terminal cells.
///
/// ```
/// use gim_term::buffer::FrameBuffer;
/// use gim_term::cell::Cell;
///
/// let mut buf = FrameBuffer::new(80, 24);
/// buf.set(5, 3, Cell::new('X'));
/// assert_eq!(buf.get(5, 3).map(|c| c.ch), Some('X'));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a buffer filled with empty cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.in_bounds(x, y).then(|| &self.cells[self.index(x, y)])
    }

    /// One row as a slice, or `None` past the bottom edge.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = self.index(0, y);
        Some(&self.cells[start..start + usize::from(self.width)])
    }

    /// Row contents as a string, trailing blanks trimmed. Used by tests
    /// to assert on what a frame shows.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .map(|cells| cells.iter().map(|c| c.ch).collect::<String>())
            .map(|s| s.trim_end().to_owned())
            .unwrap_or_default()
    }

    /// Reset every cell to [`Cell::EMPTY`].
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Resize and clear.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(usize::from(width) * usize::from(height), Cell::EMPTY);
    }

    /// Bounds-checked write. Returns `true` if the position was in bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    /// Paint a whole row with one style, blank-filled.
    pub fn fill_row(&mut self, y: u16, fg: CellColor, bg: CellColor, attrs: Attr) {
        for x in 0..self.width {
            self.set(x, y, Cell::styled(' ', fg, bg, attrs));
        }
    }

    /// Write `text` left to right starting at `(x, y)`, one char per
    /// column, stopping at the right edge.
    ///
    /// Characters that are not exactly one column wide (controls,
    /// combining marks, CJK) are painted as [`SUBSTITUTE`] so the grid
    /// stays aligned with the editor's one-char-per-column layout.
    ///
    /// Returns the number of columns written.
    pub fn put_str(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: CellColor,
        bg: CellColor,
        attrs: Attr,
    ) -> u16 {
        if y >= self.height {
            return 0;
        }
        let mut col = x;
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            self.set(col, y, Cell::styled(display_char(ch), fg, bg, attrs));
            col += 1;
        }
        col - x
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

/// The glyph a character is shown as in a one-column cell.
#[inline]
#[must_use]
pub fn display_char(ch: char) -> char {
    if ch.width() == Some(1) { ch } else { SUBSTITUTE }
}

// ─── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Construction ─────────────────────────────────────────────────────

    #[test]
    fn new_is_empty() {
        let buf = FrameBuffer::new(4, 2);
        assert_eq!(buf.width(), 4);
        assert_eq!(buf.height(), 2);
        assert_eq!(buf.get(3, 1), Some(&Cell::EMPTY));
        assert_eq!(buf.get(4, 1), None);
    }

    #[test]
    fn zero_sized_buffer() {
        let buf = FrameBuffer::new(0, 0);
        assert_eq!(buf.get(0, 0), None);
        assert_eq!(buf.row(0), None);
    }

    // ── Access ───────────────────────────────────────────────────────────

    #[test]
    fn set_out_of_bounds_is_dropped() {
        let mut buf = FrameBuffer::new(2, 2);
        assert!(!buf.set(2, 0, Cell::new('x')));
        assert!(!buf.set(0, 2, Cell::new('x')));
        assert!(buf.set(1, 1, Cell::new('x')));
        assert_eq!(buf.row_text(1), " x");
    }

    #[test]
    fn resize_clears() {
        let mut buf = FrameBuffer::new(2, 2);
        buf.set(0, 0, Cell::new('x'));
        buf.resize(3, 1);
        assert_eq!(buf.width(), 3);
        assert_eq!(buf.row_text(0), "");
        assert_eq!(buf.row(0).map(<[Cell]>::len), Some(3));
    }

    #[test]
    fn clear_resets_cells() {
        let mut buf = FrameBuffer::new(2, 1);
        buf.put_str(0, 0, "ab", CellColor::Default, CellColor::Default, Attr::BOLD);
        buf.clear();
        assert_eq!(buf.get(0, 0), Some(&Cell::EMPTY));
    }

    // ── Text ─────────────────────────────────────────────────────────────

    #[test]
    fn put_str_clips_at_right_edge() {
        let mut buf = FrameBuffer::new(3, 1);
        let n = buf.put_str(1, 0, "hello", CellColor::Default, CellColor::Default, Attr::empty());
        assert_eq!(n, 2);
        assert_eq!(buf.row_text(0), " he");
    }

    #[test]
    fn put_str_substitutes_wide_and_control() {
        let mut buf = FrameBuffer::new(5, 1);
        buf.put_str(0, 0, "a中\tb", CellColor::Default, CellColor::Default, Attr::empty());
        assert_eq!(buf.row_text(0), "a\u{fffd}\u{fffd}b");
    }

    #[test]
    fn put_str_past_bottom_writes_nothing() {
        let mut buf = FrameBuffer::new(3, 1);
        assert_eq!(buf.put_str(0, 1, "x", CellColor::Default, CellColor::Default, Attr::empty()), 0);
    }

    #[test]
    fn fill_row_styles_every_cell() {
        let mut buf = FrameBuffer::new(3, 2);
        buf.fill_row(1, CellColor::Ansi256(0), CellColor::Ansi256(7), Attr::INVERSE);
        let row = buf.row(1).unwrap_or_default();
        assert!(row.iter().all(|c| c.bg == CellColor::Ansi256(7) && c.attrs == Attr::INVERSE));
        assert_eq!(buf.get(0, 0), Some(&Cell::EMPTY));
    }

    #[test]
    fn display_char_passes_narrow() {
        assert_eq!(display_char('é'), 'é');
        assert_eq!(display_char('~'), '~');
        assert_eq!(display_char('\u{7}'), SUBSTITUTE);
    }
}
