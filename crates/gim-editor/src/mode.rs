//! Modal editing state.
//!
//! The session is always in exactly one [`Mode`]:
//!
//! | Mode        | Cursor shape | Cursor limit     | Purpose               |
//! |-------------|--------------|------------------|-----------------------|
//! | Normal      | Block        | `0..len-1`       | Navigation, commands  |
//! | Insert      | Bar          | `0..len`         | Typing text           |
//! | CommandLine | Bar          | (in status row)  | `:` commands          |

use std::fmt;

use gim_term::ansi::CursorShape;

/// The current editing mode. Pure data; key dispatch lives in the session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Keys are commands, not text.
    #[default]
    Normal,
    /// Keys produce characters in the buffer.
    Insert,
    /// Keys edit the `:` command line shown in the status row.
    CommandLine,
}

impl Mode {
    /// Name for the status row. Normal mode shows nothing, matching how the
    /// file summary occupies the row instead.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "",
            Self::Insert => "-- INSERT --",
            Self::CommandLine => ":",
        }
    }

    #[must_use]
    pub const fn cursor_shape(self) -> CursorShape {
        match self {
            Self::Normal => CursorShape::SteadyBlock,
            Self::Insert | Self::CommandLine => CursorShape::SteadyBar,
        }
    }

    /// True if the buffer cursor may sit one past the last char.
    ///
    /// Only Insert. In CommandLine the buffer cursor stays where Normal left
    /// it; the visible cursor is on the command line.
    #[inline]
    #[must_use]
    pub const fn cursor_past_end(self) -> bool {
        matches!(self, Self::Insert)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::CommandLine => "COMMAND",
        })
    }
}
