//! Highlight groups and theme lookup.
//!
//! A `Theme` maps group names to either a concrete style or the name of
//! another group (`hi link`). `resolve` follows the links until it finds
//! a style; a chain that loops or ends at an undefined name has no style.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use gim_term::cell::{Attr, Cell};
use gim_term::color::CellColor;

// ---------------------------------------------------------------------------
// HighlightGroup
// ---------------------------------------------------------------------------

/// A concrete style for one editor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighlightGroup {
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

impl HighlightGroup {
    #[must_use]
    pub const fn new(fg: CellColor, bg: CellColor, attrs: Attr) -> Self {
        Self { fg, bg, attrs }
    }

    /// A cell showing `ch` in this style.
    #[inline]
    #[must_use]
    pub const fn cell(self, ch: char) -> Cell {
        Cell::styled(ch, self.fg, self.bg, self.attrs)
    }
}

// ---------------------------------------------------------------------------
// GroupDef
// ---------------------------------------------------------------------------

/// What a group name is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupDef {
    Direct(HighlightGroup),
    /// `hi link From To`: use whatever `To` resolves to.
    Alias(String),
}

// ---------------------------------------------------------------------------
// Background
// ---------------------------------------------------------------------------

/// The `background` option a scheme (or the rc file) declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Dark,
    Light,
}

impl FromStr for Background {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("unknown background {other:?}")),
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dark => "dark",
            Self::Light => "light",
        })
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// A loaded colorscheme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Theme {
    /// `g:colors_name`, if the scheme sets it.
    pub name: Option<String>,
    pub background: Option<Background>,
    /// `g:terminal_color_0` .. `g:terminal_color_15`.
    pub terminal: [CellColor; 16],
    groups: HashMap<String, GroupDef>,
}

impl Theme {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to a concrete style, replacing any previous binding.
    pub fn define(&mut self, name: impl Into<String>, group: HighlightGroup) {
        self.groups.insert(name.into(), GroupDef::Direct(group));
    }

    /// Bind `from` to whatever `to` resolves to.
    pub fn link(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.groups.insert(from.into(), GroupDef::Alias(to.into()));
    }

    /// Drop every group (`hi clear`). Name, background and terminal colors
    /// are kept.
    pub fn clear_groups(&mut self) {
        self.groups.clear();
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&GroupDef> {
        self.groups.get(name)
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// The style `name` ends up with after following links.
    ///
    /// Each name is visited at most once, so a cycle (`A → B → A`) or a
    /// link to an undefined group yields `None` after at most
    /// `group_count() + 1` steps.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<HighlightGroup> {
        let mut seen = HashSet::new();
        let mut current = name;
        loop {
            if !seen.insert(current) {
                tracing::debug!(group = name, at = current, "highlight link cycle");
                return None;
            }
            match self.groups.get(current)? {
                GroupDef::Direct(group) => return Some(*group),
                GroupDef::Alias(next) => current = next,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
