//! Text buffer: an ordered list of lines backed by a rope.
//!
//! The rope holds the lines joined with `\n` and nothing else: there is no
//! trailing newline and a line never contains one. An empty buffer is one
//! empty line, so `line_count() >= 1` always holds.
//!
//! How lines are separated on disk (and whether the file ended with a
//! newline) is the storage layer's business. See [`crate::storage`].
//!
//! Every edit takes explicit `(row, col)` coordinates and returns whether it
//! did anything. Out-of-range coordinates are a no-op, never a panic, and
//! lines an edit does not address are left untouched.

use ropey::{Rope, RopeSlice};

/// A line-oriented text buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    rope: Rope,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// One empty line.
    #[must_use]
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build from lines. An empty iterator gives one empty line. A `\n`
    /// inside an item starts a new line.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.push_str(line.as_ref());
        }
        Self {
            rope: Rope::from_str(&text),
        }
    }

    // -- Queries ------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Row content without the separator, or `None` past the end.
    #[must_use]
    pub fn line(&self, row: usize) -> Option<RopeSlice<'_>> {
        if row >= self.line_count() {
            return None;
        }
        let start = self.rope.line_to_char(row);
        Some(self.rope.slice(start..start + self.line_len(row)))
    }

    /// Chars in `row`, excluding the separator. 0 for rows past the end.
    #[must_use]
    pub fn line_len(&self, row: usize) -> usize {
        if row >= self.line_count() {
            return 0;
        }
        let line = self.rope.line(row);
        let total = line.len_chars();
        if total > 0 && line.char(total - 1) == '\n' {
            total - 1
        } else {
            total
        }
    }

    #[must_use]
    pub fn line_text(&self, row: usize) -> Option<String> {
        self.line(row).map(String::from)
    }

    /// Owned copy of every line.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count())
            .filter_map(|row| self.line_text(row))
            .collect()
    }

    /// Σ (line length + 1): the character count a file of these lines
    /// would have with one newline after every line.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.rope.len_chars() + 1
    }

    /// Rope char index of `(row, col)`, if `col <= line_len(row)`.
    fn char_idx(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.line_count() && col <= self.line_len(row))
            .then(|| self.rope.line_to_char(row) + col)
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `ch` before column `col` of `row`. Requires
    /// `col <= line_len(row)`. A newline is refused; use
    /// [`split_line`](Self::split_line).
    pub fn insert_char(&mut self, row: usize, col: usize, ch: char) -> bool {
        if ch == '\n' {
            return false;
        }
        let Some(idx) = self.char_idx(row, col) else {
            return false;
        };
        self.rope.insert_char(idx, ch);
        true
    }

    /// Cut `row` at `col`; the tail becomes a new line at `row + 1`.
    /// A column at or past the end leaves `row` whole and adds an empty line.
    pub fn split_line(&mut self, row: usize, col: usize) -> bool {
        if row >= self.line_count() {
            return false;
        }
        let col = col.min(self.line_len(row));
        let idx = self.rope.line_to_char(row) + col;
        self.rope.insert_char(idx, '\n');
        true
    }

    /// Append `row` to `row - 1` and remove `row`. No-op for row 0.
    pub fn merge_line_with_previous(&mut self, row: usize) -> bool {
        if row == 0 || row >= self.line_count() {
            return false;
        }
        // The separator that ends row - 1 sits right before row's first char.
        let boundary = self.rope.line_to_char(row);
        self.rope.remove(boundary - 1..boundary);
        true
    }

    /// Remove the char at `col - 1`. No-op for column 0.
    pub fn delete_char_before(&mut self, row: usize, col: usize) -> bool {
        if col == 0 {
            return false;
        }
        self.delete_char_at(row, col - 1)
    }

    /// Remove the char at `col`. Requires `col < line_len(row)`.
    pub fn delete_char_at(&mut self, row: usize, col: usize) -> bool {
        if col >= self.line_len(row) {
            return false;
        }
        let Some(idx) = self.char_idx(row, col) else {
            return false;
        };
        self.rope.remove(idx..=idx);
        true
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
