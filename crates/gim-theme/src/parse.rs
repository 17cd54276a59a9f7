//! Vim colorscheme parser.
//!
//! Recognized statements, one per line:
//!
//! ```vim
//! hi clear
//! let g:colors_name = 'name'
//! set background=dark
//! call s:hi('Group', '#rrggbb', 'NONE', '15', '236', 'bold,italic')
//! hi Group guifg=#rrggbb guibg=NONE ctermfg=15 gui=bold
//! hi! link From To
//! let g:terminal_color_3 = '#d7af5f'
//! ```
//!
//! Everything else (functions, `if` blocks, autocommands) is skipped, as
//! is any recognized statement that fails to parse. Loading never fails.

use gim_term::cell::Attr;
use gim_term::color::CellColor;

use crate::highlight::{Background, HighlightGroup, Theme};

/// Build a theme from colorscheme source.
#[must_use]
pub fn parse_colorscheme(src: &str) -> Theme {
    let mut theme = Theme::new();
    for (idx, raw) in src.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('"') {
            continue;
        }
        if !apply_line(&mut theme, line) {
            tracing::debug!(line = idx + 1, text = line, "colorscheme line skipped");
        }
    }
    theme
}

/// Apply one statement. Returns `false` if the line was not understood.
fn apply_line(theme: &mut Theme, line: &str) -> bool {
    if matches!(line, "hi clear" | "highlight clear") {
        theme.clear_groups();
        return true;
    }
    if line.starts_with("let g:colors_name") {
        return let_value(line).is_some_and(|name| {
            theme.name = Some(name.to_owned());
            true
        });
    }
    if let Some(value) = line
        .strip_prefix("set background=")
        .or_else(|| line.strip_prefix("set bg="))
    {
        return value.parse::<Background>().is_ok_and(|bg| {
            theme.background = Some(bg);
            true
        });
    }
    if line.starts_with("call s:hi(") {
        return parse_call_hi(theme, line);
    }
    if line.starts_with("let g:terminal_color_") {
        return parse_terminal_color(theme, line);
    }
    if let Some(rest) = hi_command_args(line) {
        return parse_hi_args(theme, rest);
    }
    false
}

// ── Statement parsers ───────────────────────────────────────────────────────

/// `call s:hi(group, guifg, guibg, ctermfg, ctermbg, attrs)`.
///
/// The GUI color wins; the cterm index is used when the GUI slot is empty.
fn parse_call_hi(theme: &mut Theme, line: &str) -> bool {
    let (Some(open), Some(close)) = (line.find('('), line.rfind(')')) else {
        return false;
    };
    if close <= open {
        return false;
    }
    let args = split_arguments(&line[open + 1..close]);
    let [group, gui_fg, gui_bg, cterm_fg, cterm_bg, attrs] = args.as_slice() else {
        return false;
    };
    let group = unquote(group);
    if group.is_empty() {
        return false;
    }
    let fg = parse_color(gui_fg).or_else(|| parse_color(cterm_fg));
    let bg = parse_color(gui_bg).or_else(|| parse_color(cterm_bg));
    theme.define(
        group,
        HighlightGroup::new(
            fg.unwrap_or_default(),
            bg.unwrap_or_default(),
            parse_attrs(unquote(attrs)),
        ),
    );
    true
}

/// Arguments after `hi`, `hi!`, `highlight` or `highlight!`.
fn hi_command_args(line: &str) -> Option<&str> {
    let (cmd, rest) = line.split_once(char::is_whitespace)?;
    matches!(cmd, "hi" | "hi!" | "highlight" | "highlight!").then_some(rest.trim())
}

/// `link From To`, or `Group key=value...`.
fn parse_hi_args(theme: &mut Theme, rest: &str) -> bool {
    let mut fields = rest.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some("link"), Some(from), Some(to)) => {
            theme.link(from, to);
            true
        }
        (Some("link"), ..) | (None, ..) => false,
        (Some(group), ..) => parse_hi_keys(theme, group, rest),
    }
}

fn parse_hi_keys(theme: &mut Theme, group: &str, rest: &str) -> bool {
    let mut gui = (None, None);
    let mut cterm = (None, None);
    let mut attrs = None;
    let mut any = false;
    for field in rest.split_whitespace().skip(1) {
        let Some((key, value)) = field.split_once('=') else {
            continue;
        };
        any = true;
        match key {
            "guifg" => gui.0 = parse_color(value),
            "guibg" => gui.1 = parse_color(value),
            "ctermfg" => cterm.0 = parse_color(value),
            "ctermbg" => cterm.1 = parse_color(value),
            "gui" => attrs = Some(parse_attrs(value)),
            "cterm" => attrs = attrs.or_else(|| Some(parse_attrs(value))),
            _ => {}
        }
    }
    if !any {
        return false;
    }
    theme.define(
        group,
        HighlightGroup::new(
            gui.0.or(cterm.0).unwrap_or_default(),
            gui.1.or(cterm.1).unwrap_or_default(),
            attrs.unwrap_or_default(),
        ),
    );
    true
}

/// `let g:terminal_color_N = '#rrggbb'` with `N` in `0..16`.
fn parse_terminal_color(theme: &mut Theme, line: &str) -> bool {
    let Some(rest) = line.strip_prefix("let g:terminal_color_") else {
        return false;
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let Ok(idx) = rest[..digits].parse::<usize>() else {
        return false;
    };
    let (Some(slot), Some(color)) = (
        theme.terminal.get_mut(idx),
        let_value(line).and_then(parse_color),
    ) else {
        return false;
    };
    *slot = color;
    true
}

// ── Values ──────────────────────────────────────────────────────────────────

/// Right-hand side of `let x = 'value'`, unquoted. `None` if empty.
fn let_value(line: &str) -> Option<&str> {
    let (_, rhs) = line.split_once('=')?;
    let value = unquote(rhs);
    (!value.is_empty()).then_some(value)
}

/// Split on commas outside single quotes. Arguments are trimmed.
fn split_arguments(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut in_quote = false;
    let mut start = 0;
    for (i, ch) in s.char_indices() {
        match ch {
            '\'' => in_quote = !in_quote,
            ',' if !in_quote => {
                out.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let tail = s[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}

fn unquote(s: &str) -> &str {
    s.trim().trim_matches('\'').trim_matches('"')
}

/// `#rrggbb` → RGB, integer → palette index. `NONE`, empty, and anything
/// unparseable → `None` (terminal default).
fn parse_color(s: &str) -> Option<CellColor> {
    let v = unquote(s);
    if v.is_empty() || v.eq_ignore_ascii_case("none") {
        return None;
    }
    if v.starts_with('#') {
        return CellColor::from_hex(v);
    }
    v.parse::<u8>().ok().map(CellColor::Ansi256)
}

/// Comma-separated attribute names. Unknown names are ignored.
fn parse_attrs(s: &str) -> Attr {
    s.split(',')
        .map(|part| part.trim().to_ascii_lowercase())
        .fold(Attr::empty(), |acc, part| {
            acc | match part.as_str() {
                "bold" => Attr::BOLD,
                "italic" => Attr::ITALIC,
                "underline" | "undercurl" => Attr::UNDERLINE,
                "reverse" | "inverse" => Attr::INVERSE,
                _ => Attr::empty(),
            }
        })
}

// ── Tests ───────────────────────────────────────────────────────────────────
