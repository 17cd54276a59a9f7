// SPDX-License-Identifier: MIT
//
// Cell colors.
//
// gim only ever needs colors in the forms a Vim colorscheme can name
// them: a 24-bit hex triple, an index into the 256-color palette, or
// "whatever the terminal uses by default". No color math happens after
// the theme is loaded; the renderer writes these straight into SGR.

use std::fmt;

/// A terminal-ready color for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// 24-bit `TrueColor`.
    Rgb(u8, u8, u8),

    /// ANSI 256-color palette index.
    Ansi256(u8),

    /// Terminal default color (inherits from the user's terminal theme).
    #[default]
    Default,
}

impl CellColor {
    /// True for [`CellColor::Default`].
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }

    /// Parse a `#rrggbb` hex triple. Returns `None` for anything else,
    /// including the short `#rgb` form.
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Ansi256(idx) => write!(f, "{idx}"),
            Self::Default => f.write_str("NONE"),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_default() {
        assert_eq!(CellColor::default(), CellColor::Default);
        assert!(CellColor::Default.is_default());
        assert!(!CellColor::Ansi256(4).is_default());
    }

    #[test]
    fn from_hex_lowercase() {
        assert_eq!(CellColor::from_hex("#1e2030"), Some(CellColor::Rgb(0x1e, 0x20, 0x30)));
    }

    #[test]
    fn from_hex_uppercase() {
        assert_eq!(CellColor::from_hex("#FFAA00"), Some(CellColor::Rgb(255, 170, 0)));
    }

    #[test]
    fn from_hex_rejects_short_form() {
        assert_eq!(CellColor::from_hex("#fff"), None);
    }

    #[test]
    fn from_hex_rejects_missing_hash() {
        assert_eq!(CellColor::from_hex("ffffff"), None);
    }

    #[test]
    fn from_hex_rejects_bad_digits() {
        assert_eq!(CellColor::from_hex("#gg0000"), None);
    }

    #[test]
    fn display_round_trips_hex() {
        let c = CellColor::Rgb(1, 2, 255);
        assert_eq!(c.to_string(), "#0102ff");
        assert_eq!(CellColor::from_hex(&c.to_string()), Some(c));
    }

    #[test]
    fn display_index_and_default() {
        assert_eq!(CellColor::Ansi256(208).to_string(), "208");
        assert_eq!(CellColor::Default.to_string(), "NONE");
    }
}
