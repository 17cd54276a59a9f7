// SPDX-License-Identifier: MIT
//
// Cell: one character position on screen.
//
// A cell holds a single-column character plus its colors and attributes.
// The frame buffer is a grid of these; the diff renderer compares two
// grids cell by cell and emits SGR only where the style changes.
//
// gim lays text out one char per column. Characters that do not occupy
// exactly one terminal column are substituted when painted (see
// `FrameBuffer::put_str`), so a cell never spills into its neighbor.

use crate::color::CellColor;

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes stored as a compact bitfield.
    ///
    /// Each flag maps to one SGR parameter. These are the attributes a
    /// Vim highlight definition can carry.
    ///
    /// ```
    /// use gim_term::cell::Attr;
    ///
    /// let style = Attr::BOLD | Attr::UNDERLINE;
    /// assert!(style.contains(Attr::BOLD));
    /// assert!(!style.contains(Attr::ITALIC));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1
        const BOLD      = 1 << 0;
        /// SGR 2
        const DIM       = 1 << 1;
        /// SGR 3
        const ITALIC    = 1 << 2;
        /// SGR 4
        const UNDERLINE = 1 << 3;
        /// SGR 7, swap foreground and background.
        const INVERSE   = 1 << 4;
    }
}

impl Attr {
    /// SGR parameter codes for every set flag, lowest bit first.
    pub fn sgr_codes(self) -> impl Iterator<Item = u8> {
        const TABLE: [(Attr, u8); 5] = [
            (Attr::BOLD, 1),
            (Attr::DIM, 2),
            (Attr::ITALIC, 3),
            (Attr::UNDERLINE, 4),
            (Attr::INVERSE, 7),
        ];
        TABLE
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, code)| code)
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single terminal cell.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Character to display. Always exactly one column wide.
    pub ch: char,

    /// Foreground (text) color.
    pub fg: CellColor,

    /// Background color.
    pub bg: CellColor,

    /// Text attributes.
    pub attrs: Attr,
}

impl Cell {
    /// An empty cell: space character, default colors, no attributes.
    pub const EMPTY: Self = Self {
        ch: ' ',
        fg: CellColor::Default,
        bg: CellColor::Default,
        attrs: Attr::empty(),
    };

    /// Create a cell with a character and default styling.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self { ch, ..Self::EMPTY }
    }

    /// Create a cell with full styling.
    #[inline]
    #[must_use]
    pub const fn styled(ch: char, fg: CellColor, bg: CellColor, attrs: Attr) -> Self {
        Self { ch, fg, bg, attrs }
    }

    /// Whether two cells share colors and attributes, ignoring the character.
    #[inline]
    #[must_use]
    pub fn same_style(self, other: &Self) -> bool {
        self.fg == other.fg && self.bg == other.bg && self.attrs == other.attrs
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cell({:?}", self.ch)?;
        if !self.fg.is_default() {
            write!(f, ", fg={}", self.fg)?;
        }
        if !self.bg.is_default() {
            write!(f, ", bg={}", self.bg)?;
        }
        if !self.attrs.is_empty() {
            write!(f, ", {:?}", self.attrs)?;
        }
        write!(f, ")")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
