// SPDX-License-Identifier: MIT
//
// Output buffering and stateful cell rendering.
//
//   OutputBuffer collects a whole frame's bytes so the frame reaches the
//   terminal in one write.
//
//   CellWriter remembers where the terminal cursor is and which pen
//   (colors + attributes) is active, and emits only the escapes needed
//   to move from that state to the next cell.

use std::io::{self, Write};

use crate::ansi;
use crate::cell::{Attr, Cell};
use crate::color::CellColor;

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// In-memory byte sink flushed once per frame.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append one char as UTF-8.
    pub fn push_char(&mut self, ch: char) {
        let mut enc = [0u8; 4];
        self.buf.extend_from_slice(ch.encode_utf8(&mut enc).as_bytes());
    }

    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write everything to stdout and empty the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        self.flush_to(&mut stdout)
    }

    /// Write everything to `w` and empty the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    // No-op. Use flush_stdout / flush_to.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── CellWriter ──────────────────────────────────────────────────────────────

/// Tracks terminal cursor and pen state across cell writes.
///
/// - A cursor move is skipped when the next cell directly follows the
///   previous one on the same row.
/// - An attribute change resets the pen (SGR 0) first when attributes
///   were active, since SGR has no per-attribute "off" we rely on.
/// - Colors are re-emitted only when they differ from the tracked pen.
#[allow(clippy::struct_field_names)]
pub struct CellWriter {
    last_x: i32,
    last_y: i32,
    last_fg: Option<CellColor>,
    last_bg: Option<CellColor>,
    last_attrs: Attr,
}

impl CellWriter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_x: -1,
            last_y: -1,
            last_fg: None,
            last_bg: None,
            last_attrs: Attr::empty(),
        }
    }

    /// Forget all tracked state. Call after a reset or screen clear.
    pub fn reset_state(&mut self) {
        *self = Self::new();
    }

    /// Write one cell at `(x, y)`.
    pub fn render_cell(&mut self, out: &mut OutputBuffer, x: u16, y: u16, cell: &Cell) {
        let (xi, yi) = (i32::from(x), i32::from(y));
        if yi != self.last_y || xi != self.last_x + 1 {
            ansi::cursor_to(out, x, y).ok();
        }
        self.apply_style(out, cell);
        out.push_char(cell.ch);
        self.last_x = xi;
        self.last_y = yi;
    }

    fn apply_style(&mut self, out: &mut OutputBuffer, cell: &Cell) {
        if cell.attrs != self.last_attrs {
            if !self.last_attrs.is_empty() {
                ansi::reset(out).ok();
                self.last_fg = None;
                self.last_bg = None;
            }
            self.last_attrs = cell.attrs;
            ansi::attrs(out, cell.attrs).ok();
        }
        if self.last_fg != Some(cell.fg) {
            ansi::fg(out, cell.fg).ok();
            self.last_fg = Some(cell.fg);
        }
        if self.last_bg != Some(cell.bg) {
            ansi::bg(out, cell.bg).ok();
            self.last_bg = Some(cell.bg);
        }
    }
}

impl Default for CellWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
