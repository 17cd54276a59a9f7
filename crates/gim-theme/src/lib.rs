//! # gim-theme: Vim colorscheme loading
//!
//! Reads the subset of Vim colorscheme syntax that real-world schemes use
//! and turns it into named highlight groups the editor can paint with.
//!
//! # Architecture
//!
//! ```text
//! colors/NAME.vim (text)
//!     │
//!     ▼
//! parse.rs:     line-by-line scan, malformed lines skipped
//!     │           hi clear / let g:colors_name / set background=
//!     │           call s:hi(...) / hi Group k=v / hi link / terminal colors
//!     ▼
//! highlight.rs: Theme { name → Direct(style) | Alias(other name) }
//!     │
//!     ▼
//! Theme::resolve("StatusLine") → follows links, cycle-safe
//! ```
//!
//! Colors are stored as terminal-ready `CellColor`s, so the editor writes
//! them straight into cells.

pub mod highlight;
pub mod parse;

pub use highlight::{Background, GroupDef, HighlightGroup, Theme};
pub use parse::parse_colorscheme;
