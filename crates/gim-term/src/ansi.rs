// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Stateless writers for every terminal command gim emits. Deciding when
// to emit them is the `CellWriter`'s job.
//
// Positions are 0-indexed here and converted to the terminal's 1-indexed
// form on output.

use std::io::{self, Write};

use crate::cell::Attr;
use crate::color::CellColor;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` (CUP).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y + 1, x + 1)
}

#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// SGR 0. Callers tracking pen state must forget it afterwards.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

/// Begin a synchronized update (DEC mode 2026). Terminals that do not
/// know the mode ignore it.
#[inline]
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

#[inline]
pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

#[inline]
pub fn enable_bracketed_paste(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2004h")
}

#[inline]
pub fn disable_bracketed_paste(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2004l")
}

// ─── Colors ──────────────────────────────────────────────────────────────────

/// Set the foreground color. Palette entries 0-15 use the compact
/// 30-37 / 90-97 codes.
pub fn fg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Default => w.write_all(b"\x1b[39m"),
        CellColor::Ansi256(idx @ 0..=7) => write!(w, "\x1b[{}m", 30 + u16::from(idx)),
        CellColor::Ansi256(idx @ 8..=15) => write!(w, "\x1b[{}m", 82 + u16::from(idx)),
        CellColor::Ansi256(idx) => write!(w, "\x1b[38;5;{idx}m"),
        CellColor::Rgb(r, g, b) => write!(w, "\x1b[38;2;{r};{g};{b}m"),
    }
}

/// Set the background color. Same encoding as [`fg`] with the 40-47 /
/// 100-107 / 48 codes.
pub fn bg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Default => w.write_all(b"\x1b[49m"),
        CellColor::Ansi256(idx @ 0..=7) => write!(w, "\x1b[{}m", 40 + u16::from(idx)),
        CellColor::Ansi256(idx @ 8..=15) => write!(w, "\x1b[{}m", 92 + u16::from(idx)),
        CellColor::Ansi256(idx) => write!(w, "\x1b[48;5;{idx}m"),
        CellColor::Rgb(r, g, b) => write!(w, "\x1b[48;2;{r};{g};{b}m"),
    }
}

/// Emit every set attribute in one CSI sequence (`\x1b[1;4m`). Writes
/// nothing for an empty set.
pub fn attrs(w: &mut impl Write, attr: Attr) -> io::Result<()> {
    let mut codes = attr.sgr_codes();
    let Some(first) = codes.next() else {
        return Ok(());
    };
    write!(w, "\x1b[{first}")?;
    for code in codes {
        write!(w, ";{code}")?;
    }
    w.write_all(b"m")
}

// ─── Cursor Shape ───────────────────────────────────────────────────────────

/// Cursor shape (DECSCUSR). Normal mode shows a block, the text-entry
/// modes show a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    /// Whatever the user's terminal is configured to show.
    #[default]
    Default,
    SteadyBlock,
    SteadyUnderline,
    SteadyBar,
}

#[inline]
pub fn set_cursor_shape(w: &mut impl Write, shape: CursorShape) -> io::Result<()> {
    let n: u8 = match shape {
        CursorShape::Default => 0,
        CursorShape::SteadyBlock => 2,
        CursorShape::SteadyUnderline => 4,
        CursorShape::SteadyBar => 6,
    };
    write!(w, "\x1b[{n} q")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
