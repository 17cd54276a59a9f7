//! Viewport: maps the buffer onto a fixed character grid with soft wrap.
//!
//! Every logical line occupies `wrap_rows(len)` physical rows: one row per
//! `width` chars, at least one for an empty line, and no extra row when the
//! length is an exact multiple of the width. The last row of the grid is
//! the status row, so text gets `height - 1` rows.
//!
//! ```text
//! width = 10, height = 5
//!
//!   logical                    physical
//!   0  "hello"            ──▶  0  hello
//!   1  "abcdefghijklmno"  ──▶  1  abcdefghij
//!                              2  klmno
//!   2  ""                 ──▶  3
//!                              4  <status>
//! ```
//!
//! The window `[first, last]` is the range of logical lines that fit
//! entirely in the text area. [`Viewport::sync`] keeps it around the cursor;
//! [`render_frame`] and [`cursor_to_screen`] are pure functions of a
//! buffer, a first line and the grid size.

use crate::buffer::Buffer;
use crate::cursor::{Cursor, VerticalIntent};
use crate::position::Position;

/// Glyph drawn at column 0 of rows past the end of the buffer.
pub const FILL_GLYPH: char = '~';

// ---------------------------------------------------------------------------
// Geometry helpers
// ---------------------------------------------------------------------------

/// Physical rows a line of `len` chars takes at `width` columns.
#[inline]
#[must_use]
pub const fn wrap_rows(len: usize, width: usize) -> usize {
    let width = if width == 0 { 1 } else { width };
    let rows = len.div_ceil(width);
    if rows == 0 { 1 } else { rows }
}

/// Text rows available in a grid `height` rows tall.
#[inline]
#[must_use]
pub const fn usable_height(height: usize) -> usize {
    let h = height.saturating_sub(1);
    if h == 0 { 1 } else { h }
}

/// Screen coordinates `(x, y)` of `pos` relative to the top-left of the
/// text area, when the window starts at logical line `first`.
///
/// Not clamped: a cursor below the window yields `y >= usable height`.
#[must_use]
pub fn cursor_to_screen(buf: &Buffer, pos: Position, first: usize, width: usize) -> (usize, usize) {
    let width = width.max(1);
    let above: usize = (first..pos.row)
        .map(|row| wrap_rows(buf.line_len(row), width))
        .sum();
    (pos.col % width, above + pos.col / width)
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// What a frame row shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Wrap segment `segment` (0-based) of logical line `line`.
    Text { line: usize, segment: usize },
    /// Past the end of the buffer.
    Fill,
}

/// One physical row: exactly `width` chars, blank-padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRow {
    kind: RowKind,
    cells: Vec<char>,
}

impl FrameRow {
    #[must_use]
    pub const fn kind(&self) -> RowKind {
        self.kind
    }

    #[must_use]
    pub const fn is_fill(&self) -> bool {
        matches!(self.kind, RowKind::Fill)
    }

    #[must_use]
    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    /// The row as a string, padding included.
    #[must_use]
    pub fn text(&self) -> String {
        self.cells.iter().collect()
    }
}

/// The text area of one redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    rows: Vec<FrameRow>,
    last_drawn: Option<usize>,
}

impl Frame {
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn rows(&self) -> &[FrameRow] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, y: usize) -> Option<&FrameRow> {
        self.rows.get(y)
    }

    /// Last logical line with at least one segment on screen, fully or
    /// partially. `None` when the frame holds only fill rows.
    #[must_use]
    pub const fn last_drawn(&self) -> Option<usize> {
        self.last_drawn
    }

    #[must_use]
    pub fn fill_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.is_fill()).count()
    }
}

/// Lay out the buffer from logical line `first` into `height - 1` rows of
/// `width` chars.
///
/// Lines wrap across as many rows as they need; the last one may be cut
/// off. Rows below the content are fill rows with [`FILL_GLYPH`] at column
/// 0. Width and usable height are treated as at least 1.
#[must_use]
pub fn render_frame(buf: &Buffer, first: usize, width: usize, height: usize) -> Frame {
    let width = width.max(1);
    let usable = usable_height(height);
    let mut rows = Vec::with_capacity(usable);
    let mut last_drawn = None;

    'lines: for line in first..buf.line_count() {
        let Some(slice) = buf.line(line) else { break };
        let chars: Vec<char> = slice.chars().collect();
        for (segment, chunk) in segments(&chars, width).enumerate() {
            if rows.len() == usable {
                break 'lines;
            }
            let mut cells = chunk.to_vec();
            cells.resize(width, ' ');
            rows.push(FrameRow {
                kind: RowKind::Text { line, segment },
                cells,
            });
            last_drawn = Some(line);
        }
    }

    while rows.len() < usable {
        let mut cells = vec![' '; width];
        cells[0] = FILL_GLYPH;
        rows.push(FrameRow {
            kind: RowKind::Fill,
            cells,
        });
    }

    Frame {
        width,
        rows,
        last_drawn,
    }
}

/// `width`-sized chunks of a line; an empty line yields one empty chunk.
fn segments(chars: &[char], width: usize) -> impl Iterator<Item = &[char]> {
    let empty: &[char] = &[];
    let first = chars.is_empty().then_some(empty);
    first.into_iter().chain(chars.chunks(width))
}

// ---------------------------------------------------------------------------
// Window / Viewport
// ---------------------------------------------------------------------------

/// Inclusive range of logical lines that fit in the text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    pub first: usize,
    pub last: usize,
}

/// Scroll state plus grid size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    window: Window,
    width: usize,
    height: usize,
}

impl Viewport {
    /// A viewport over a `width × height` grid (status row included),
    /// scrolled to the top. Call [`sync`](Self::sync) before use.
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            window: Window { first: 0, last: 0 },
            width,
            height,
        }
    }

    #[must_use]
    pub const fn window(&self) -> Window {
        self.window
    }

    #[must_use]
    pub const fn first(&self) -> usize {
        self.window.first
    }

    #[must_use]
    pub const fn last(&self) -> usize {
        self.window.last
    }

    /// Effective width, at least 1.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width.max(1)
    }

    /// Full grid height, status row included.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub const fn usable_height(&self) -> usize {
        usable_height(self.height)
    }

    /// New grid size. The window is left as is; the next sync fixes it.
    pub const fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Render the window. When `cursor` sits just past a line whose length
    /// is a multiple of the width, a blank row is opened under that line for
    /// it and the rows below shift down.
    #[must_use]
    pub fn render(&self, buf: &Buffer, cursor: &Cursor) -> Frame {
        let mut frame = render_frame(buf, self.window.first, self.width, self.height);
        let Position { row, col } = cursor.position();
        let len = buf.line_len(row);
        let width = self.width();
        let own_row = len > 0 && col >= len && len % width == 0;
        if !own_row || row < self.window.first || row > self.window.last {
            return frame;
        }
        let (_, y) = cursor_to_screen(buf, cursor.position(), self.window.first, width);
        if y >= frame.rows.len() {
            return frame;
        }
        frame.rows.insert(
            y,
            FrameRow {
                kind: RowKind::Text {
                    line: row,
                    segment: len / width,
                },
                cells: vec![' '; width],
            },
        );
        frame.rows.pop();
        frame.last_drawn = frame.rows.iter().rev().find_map(|r| match r.kind {
            RowKind::Text { line, .. } => Some(line),
            RowKind::Fill => None,
        });
        frame
    }

    /// Cursor position in the text area, clamped to the grid. After a
    /// [`sync`](Self::sync) and [`col_limit`](Self::col_limit) clamp the
    /// clamping never kicks in.
    #[must_use]
    pub fn cursor_screen(&self, buf: &Buffer, cursor: &Cursor) -> (usize, usize) {
        let (x, y) = cursor_to_screen(buf, cursor.position(), self.window.first, self.width);
        (
            x.min(self.width() - 1),
            y.min(self.usable_height() - 1),
        )
    }

    // -- Sync ---------------------------------------------------------------

    /// Move the window so the cursor's line is inside it.
    ///
    /// - Cursor above the window: it becomes the first line.
    /// - Cursor below the window (or its line no longer fits): it becomes the
    ///   last line and lines are dropped from the top until the range fits.
    /// - Cursor inside a window that an edit made too tall: intent `Down`
    ///   drops lines from the top, intent `Up` from the bottom.
    ///
    /// Afterwards `last` is pushed down as far as whole lines still fit.
    /// A lone line taller than the text area gets the window `[row, row]`.
    pub fn sync(&mut self, buf: &Buffer, cursor: &Cursor) {
        let max_row = buf.line_count().saturating_sub(1);
        let row = cursor.row().min(max_row);
        let at = Position::new(row, cursor.col());
        let Window { mut first, mut last } = self.window;
        first = first.min(max_row);
        last = last.min(max_row);

        if row < first {
            first = row;
            last = row;
        } else if row > last || !self.fits(buf, first, row, at) {
            last = row;
            first = self.top_for_bottom(buf, first, row, at);
        } else if !self.fits(buf, first, last, at) {
            match cursor.intent() {
                VerticalIntent::Down => {
                    while first < row && !self.fits(buf, first, last, at) {
                        first += 1;
                    }
                    while last > row && !self.fits(buf, first, last, at) {
                        last -= 1;
                    }
                }
                VerticalIntent::Up => {
                    while last > row && !self.fits(buf, first, last, at) {
                        last -= 1;
                    }
                }
            }
        }

        while last < max_row && self.fits(buf, first, last + 1, at) {
            last += 1;
        }

        if self.window != (Window { first, last }) {
            tracing::trace!(first, last, row, "viewport scrolled");
        }
        self.window = Window { first, last };
    }

    /// Largest cursor column that can be drawn on `cursor`'s line, or `None`
    /// when every column can. Only a line taller than the text area, alone
    /// in the window, is limited.
    #[must_use]
    pub fn col_limit(&self, buf: &Buffer, cursor: &Cursor) -> Option<usize> {
        let row = cursor.row();
        let budget = self.usable_height();
        let tall = self.window == (Window { first: row, last: row })
            && self.line_rows(buf, row, cursor.position()) > budget;
        tall.then(|| budget * self.width() - 1)
    }

    /// Rows taken by `row`. The cursor's line also counts the cell the
    /// cursor sits on, which in Insert mode can start a row of its own.
    fn line_rows(&self, buf: &Buffer, row: usize, cursor: Position) -> usize {
        let mut len = buf.line_len(row);
        if row == cursor.row {
            len = len.max(cursor.col + 1);
        }
        wrap_rows(len, self.width())
    }

    /// Whether lines `a..=b` fit in the text area. Stops summing as soon as
    /// the budget is exceeded.
    fn fits(&self, buf: &Buffer, a: usize, b: usize, cursor: Position) -> bool {
        let budget = self.usable_height();
        let mut used = 0;
        for row in a..=b {
            used += self.line_rows(buf, row, cursor);
            if used > budget {
                return false;
            }
        }
        true
    }

    /// Smallest first line `>= floor` such that `first..=bottom` fits, or
    /// `bottom` itself when even that line alone is too tall.
    fn top_for_bottom(&self, buf: &Buffer, floor: usize, bottom: usize, cursor: Position) -> usize {
        let budget = self.usable_height();
        let mut used = self.line_rows(buf, bottom, cursor);
        let mut top = bottom;
        while top > floor {
            let above = self.line_rows(buf, top - 1, cursor);
            if used + above > budget {
                break;
            }
            used += above;
            top -= 1;
        }
        top
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn buf(lines: &[&str]) -> Buffer {
        Buffer::from_lines(lines)
    }

    fn texts(frame: &Frame) -> Vec<String> {
        frame.rows().iter().map(FrameRow::text).collect()
    }

    /// Viewport synced after walking the cursor down one line at a time.
    fn walk_down(b: &Buffer, vp: &mut Viewport, cursor: &mut Cursor, steps: usize) {
        vp.sync(b, cursor);
        for _ in 0..steps {
            cursor.move_down(b, false);
            vp.sync(b, cursor);
        }
    }

    // -- wrap_rows ----------------------------------------------------------

    #[test]
    fn wrap_rows_rules() {
        assert_eq!(wrap_rows(0, 10), 1);
        assert_eq!(wrap_rows(1, 10), 1);
        assert_eq!(wrap_rows(10, 10), 1);
        assert_eq!(wrap_rows(11, 10), 2);
        assert_eq!(wrap_rows(25, 10), 3);
        assert_eq!(wrap_rows(5, 0), 5);
    }

    #[test]
    fn usable_height_reserves_status_row() {
        assert_eq!(usable_height(5), 4);
        assert_eq!(usable_height(1), 1);
        assert_eq!(usable_height(0), 1);
    }

    // -- render_frame -------------------------------------------------------

    #[test]
    fn frame_wraps_and_fills() {
        let b = buf(&["hello", "abcdefghijklmno"]);
        let f = render_frame(&b, 0, 10, 6);
        assert_eq!(
            texts(&f),
            vec![
                "hello     ",
                "abcdefghij",
                "klmno     ",
                "~         ",
                "~         ",
            ]
        );
        assert_eq!(f.last_drawn(), Some(1));
        assert_eq!(f.fill_rows(), 2);
        assert_eq!(f.row(2).map(FrameRow::kind), Some(RowKind::Text { line: 1, segment: 1 }));
    }

    #[test]
    fn exact_multiple_takes_no_extra_row() {
        let b = buf(&["abcdefghij", "x"]);
        let f = render_frame(&b, 0, 10, 4);
        assert_eq!(texts(&f), vec!["abcdefghij", "x         ", "~         "]);
    }

    #[test]
    fn empty_line_takes_one_blank_row() {
        let b = buf(&["", "a"]);
        let f = render_frame(&b, 0, 3, 4);
        assert_eq!(texts(&f), vec!["   ", "a  ", "~  "]);
        assert_eq!(f.row(0).map(FrameRow::kind), Some(RowKind::Text { line: 0, segment: 0 }));
    }

    #[test]
    fn twenty_five_chars_fill_three_rows_exactly() {
        let b = buf(&["abcdefghijklmnopqrstuvwxy"]);
        let mut vp = Viewport::new(10, 4);
        vp.sync(&b, &Cursor::new());
        assert_eq!(vp.last(), 0);
        let f = vp.render(&b, &Cursor::new());
        assert_eq!(f.rows().len(), 3);
        assert_eq!(f.fill_rows(), 0);
        assert_eq!(f.last_drawn(), Some(0));
    }

    #[test]
    fn partial_last_line_is_reported() {
        let b = buf(&["a", "0123456789012"]);
        let f = render_frame(&b, 0, 5, 3);
        assert_eq!(texts(&f), vec!["a    ", "01234"]);
        assert_eq!(f.last_drawn(), Some(1));
    }

    #[test]
    fn frame_starts_at_first() {
        let b = buf(&["zero", "one", "two"]);
        let f = render_frame(&b, 2, 4, 3);
        assert_eq!(texts(&f), vec!["two ", "~   "]);
    }

    // -- cursor_to_screen ---------------------------------------------------

    #[test]
    fn cursor_inside_wrapped_line() {
        let b = buf(&["hello", "abcdefghijklmno"]);
        assert_eq!(cursor_to_screen(&b, Position::new(1, 12), 0, 10), (2, 2));
        assert_eq!(cursor_to_screen(&b, Position::new(1, 3), 1, 10), (3, 0));
    }

    #[test]
    fn cursor_counts_wrapped_lines_above() {
        let b = buf(&["0123456789012345678901", "", "x"]);
        assert_eq!(cursor_to_screen(&b, Position::new(2, 0), 0, 10), (0, 4));
    }

    #[test]
    fn cursor_screen_is_clamped_to_grid() {
        let b = buf(&["0123456789012345678901234"]);
        let mut vp = Viewport::new(10, 3);
        let mut c = Cursor::at(Position::new(0, 24));
        c.clamp(&b, false);
        vp.sync(&b, &c);
        assert_eq!(vp.cursor_screen(&b, &c), (4, 1));
    }

    // -- sync ---------------------------------------------------------------

    #[test]
    fn initial_sync_fills_window() {
        let b = buf(&["a", "b", "c", "d", "e"]);
        let mut vp = Viewport::new(10, 4);
        vp.sync(&b, &Cursor::new());
        assert_eq!(vp.window(), Window { first: 0, last: 2 });
    }

    #[test]
    fn moving_down_scrolls_one_line_at_a_time() {
        let b = buf(&["a", "b", "c", "d", "e"]);
        let mut vp = Viewport::new(10, 4);
        let mut c = Cursor::new();
        walk_down(&b, &mut vp, &mut c, 3);
        assert_eq!(vp.window(), Window { first: 1, last: 3 });
        walk_down(&b, &mut vp, &mut c, 1);
        assert_eq!(vp.window(), Window { first: 2, last: 4 });
    }

    #[test]
    fn moving_down_trims_wrapped_lines_from_top() {
        let b = buf(&["0123456789ab", "x", "y", "z"]);
        let mut vp = Viewport::new(10, 5);
        let mut c = Cursor::new();
        walk_down(&b, &mut vp, &mut c, 0);
        assert_eq!(vp.window(), Window { first: 0, last: 2 });
        walk_down(&b, &mut vp, &mut c, 3);
        assert_eq!(vp.window(), Window { first: 1, last: 3 });
    }

    #[test]
    fn moving_up_past_first_scrolls_back() {
        let b = buf(&["a", "b", "c", "d", "e"]);
        let mut vp = Viewport::new(10, 4);
        let mut c = Cursor::new();
        walk_down(&b, &mut vp, &mut c, 4);
        assert_eq!(vp.window(), Window { first: 2, last: 4 });
        for _ in 0..3 {
            c.move_up(&b, false);
            vp.sync(&b, &c);
        }
        assert_eq!(vp.window(), Window { first: 1, last: 3 });
    }

    #[test]
    fn jump_to_end_and_back() {
        let lines: Vec<String> = (0..100).map(|i| i.to_string()).collect();
        let b = Buffer::from_lines(&lines);
        let mut vp = Viewport::new(10, 11);
        let mut c = Cursor::new();
        c.goto_row(99, &b, false);
        vp.sync(&b, &c);
        assert_eq!(vp.window(), Window { first: 90, last: 99 });
        c.goto_row(0, &b, false);
        vp.sync(&b, &c);
        assert_eq!(vp.window(), Window { first: 0, last: 9 });
    }

    #[test]
    fn overlong_line_gets_its_own_window() {
        let long = "x".repeat(50);
        let b = buf(&["a", long.as_str(), "b"]);
        let mut vp = Viewport::new(10, 4);
        let mut c = Cursor::new();
        walk_down(&b, &mut vp, &mut c, 1);
        assert_eq!(vp.window(), Window { first: 1, last: 1 });
    }

    #[test]
    fn edit_overflow_with_intent_up_keeps_top() {
        let mut b = buf(&["a", "b", "c"]);
        let mut vp = Viewport::new(10, 4);
        let c = Cursor::new();
        vp.sync(&b, &c);
        assert_eq!(vp.window(), Window { first: 0, last: 2 });
        for _ in 0..10 {
            b.insert_char(0, 0, 'z');
        }
        vp.sync(&b, &c);
        assert_eq!(vp.window(), Window { first: 0, last: 1 });
    }

    #[test]
    fn edit_overflow_with_intent_down_keeps_bottom() {
        let mut b = buf(&["a", "b", "c", "d"]);
        let mut vp = Viewport::new(10, 4);
        let mut c = Cursor::new();
        walk_down(&b, &mut vp, &mut c, 1);
        assert_eq!(vp.window(), Window { first: 0, last: 2 });
        for _ in 0..10 {
            b.insert_char(2, 0, 'z');
        }
        vp.sync(&b, &c);
        assert_eq!(vp.window(), Window { first: 1, last: 2 });
    }

    #[test]
    fn sync_after_buffer_shrinks() {
        let mut b = buf(&["a", "b", "c", "d", "e"]);
        let mut vp = Viewport::new(10, 4);
        let mut c = Cursor::new();
        walk_down(&b, &mut vp, &mut c, 4);
        for row in (1..5).rev() {
            b.merge_line_with_previous(row);
        }
        c.clamp(&b, false);
        vp.sync(&b, &c);
        assert_eq!(vp.window(), Window { first: 0, last: 0 });
    }

    #[test]
    fn degenerate_geometry() {
        let b = buf(&["abc", "de"]);
        let mut vp = Viewport::new(0, 0);
        vp.sync(&b, &Cursor::new());
        assert_eq!(vp.window(), Window { first: 0, last: 0 });
        let f = vp.render(&b, &Cursor::new());
        assert_eq!(texts(&f), vec!["a"]);
    }

    // -- Cursor past a full last row ------------------------------------------

    #[test]
    fn append_cell_after_exact_multiple_gets_own_row() {
        let b = buf(&["a", "b", "0123456789"]);
        let mut vp = Viewport::new(10, 4);
        let c = Cursor::at(Position::new(2, 10));
        vp.sync(&b, &c);
        assert_eq!(vp.window(), Window { first: 1, last: 2 });
        assert_eq!(vp.cursor_screen(&b, &c), (0, 2));

        let f = vp.render(&b, &c);
        assert_eq!(texts(&f), vec!["b         ", "0123456789", "          "]);
        assert_eq!(f.row(2).map(FrameRow::kind), Some(RowKind::Text { line: 2, segment: 1 }));
    }

    #[test]
    fn append_row_pushes_following_lines_down() {
        let b = buf(&["01234", "x", "y"]);
        let mut vp = Viewport::new(5, 5);
        let c = Cursor::at(Position::new(0, 5));
        vp.sync(&b, &c);
        assert_eq!(vp.window(), Window { first: 0, last: 2 });

        let f = vp.render(&b, &c);
        assert_eq!(texts(&f), vec!["01234", "     ", "x    ", "y    "]);
        assert_eq!(f.last_drawn(), Some(2));
    }

    #[test]
    fn normal_cursor_on_exact_multiple_needs_no_extra_row() {
        let b = buf(&["a", "b", "0123456789"]);
        let mut vp = Viewport::new(10, 4);
        let c = Cursor::at(Position::new(2, 9));
        vp.sync(&b, &c);
        assert_eq!(vp.window(), Window { first: 0, last: 2 });
        assert_eq!(vp.render(&b, &c), render_frame(&b, 0, 10, 4));
    }

    // -- Lines taller than the text area --------------------------------------

    #[test]
    fn col_limit_only_for_tall_lone_line() {
        let b = buf(&["x".repeat(50).as_str(), "short"]);
        let mut vp = Viewport::new(10, 4);
        let c = Cursor::at(Position::new(0, 45));
        vp.sync(&b, &c);
        assert_eq!(vp.window(), Window { first: 0, last: 0 });
        assert_eq!(vp.col_limit(&b, &c), Some(29));

        let c = Cursor::at(Position::new(1, 2));
        vp.sync(&b, &c);
        assert_eq!(vp.col_limit(&b, &c), None);
    }

    #[test]
    fn col_limit_counts_insert_append_cell() {
        let b = buf(&["x".repeat(30).as_str()]);
        let mut vp = Viewport::new(10, 4);
        let normal = Cursor::at(Position::new(0, 29));
        vp.sync(&b, &normal);
        assert_eq!(vp.col_limit(&b, &normal), None);

        let insert = Cursor::at(Position::new(0, 30));
        vp.sync(&b, &insert);
        assert_eq!(vp.col_limit(&b, &insert), Some(29));
    }

    // -- Properties ---------------------------------------------------------

    fn lines_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-z]{0,30}", 1..20)
    }

    proptest! {
        #[test]
        fn frame_dimensions(lines in lines_strategy(), first in 0usize..25, width in 1usize..15, height in 2usize..12) {
            let b = Buffer::from_lines(&lines);
            let f = render_frame(&b, first, width, height);
            prop_assert!(f.rows().len() <= height - 1);
            for row in f.rows() {
                prop_assert_eq!(row.cells().len(), width);
            }
        }

        #[test]
        fn origin_maps_to_origin(lines in lines_strategy(), width in 1usize..15) {
            let b = Buffer::from_lines(&lines);
            prop_assert_eq!(cursor_to_screen(&b, Position::ZERO, 0, width), (0, 0));
        }

        #[test]
        fn sync_keeps_cursor_visible(
            lines in lines_strategy(),
            moves in prop::collection::vec(any::<bool>(), 0..40),
            width in 1usize..15,
            height in 2usize..12,
        ) {
            let b = Buffer::from_lines(&lines);
            let mut vp = Viewport::new(width, height);
            let mut c = Cursor::new();
            vp.sync(&b, &c);
            for down in moves {
                if down { c.move_down(&b, false) } else { c.move_up(&b, false) }
                vp.sync(&b, &c);
                let Window { first, last } = vp.window();
                prop_assert!(first <= c.row() && c.row() <= last);
                prop_assert!(last < b.line_count());
                prop_assert!(first == last || vp.fits(&b, first, last, c.position()));
                let (_, y) = cursor_to_screen(&b, Position::new(c.row(), 0), first, width);
                prop_assert!(y < vp.usable_height());
            }
        }
    }
}
