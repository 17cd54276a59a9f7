// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key and paste events. Covers what a plain
// xterm-compatible terminal sends in raw mode:
//
// - printable ASCII and multi-byte UTF-8
// - C0 control bytes (Enter, Tab, Backspace, Ctrl+letter)
// - CSI and SS3 cursor/editing keys, with xterm modifier parameters
// - Alt+key as ESC followed by the key
// - bracketed paste between `CSI 200~` and `CSI 201~`
//
// Sequences can straddle reads, so unconsumed bytes stay buffered until
// the next `advance`. A lone ESC stays pending until the caller decides
// no more bytes are coming and calls `flush`.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A parsed input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Text pasted while bracketed paste mode is on.
    Paste(String),
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Unmodified key press.
    #[inline]
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }
}

/// Identity of a key. Printable characters use [`Char`](KeyCode::Char).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Modifier flags, xterm encoding (`param = 1 + bitmask`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

const PASTE_START: &[u8] = b"\x1b[200~";
const PASTE_END: &[u8] = b"\x1b[201~";

/// Incremental byte-to-event parser.
///
/// ```
/// use gim_term::input::{Event, KeyCode, KeyEvent, Parser};
///
/// let mut parser = Parser::new();
/// assert_eq!(
///     parser.advance(b"\x1b[A"),
///     vec![Event::Key(KeyEvent::plain(KeyCode::Up))],
/// );
/// ```
pub struct Parser {
    buf: Vec<u8>,
    in_paste: bool,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
            in_paste: false,
        }
    }

    /// Feed bytes and return every complete event. Incomplete trailing
    /// sequences are kept for the next call.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            let rest = &self.buf[pos..];

            if self.in_paste {
                let Some(end) = find_subsequence(rest, PASTE_END) else {
                    break;
                };
                events.push(Event::Paste(String::from_utf8_lossy(&rest[..end]).into_owned()));
                pos += end + PASTE_END.len();
                self.in_paste = false;
                continue;
            }

            if rest.starts_with(PASTE_START) {
                self.in_paste = true;
                pos += PASTE_START.len();
                continue;
            }
            // A prefix of the paste opener might still become one.
            if rest.len() < PASTE_START.len() && rest.len() > 2 && PASTE_START.starts_with(rest) {
                break;
            }

            match try_parse(rest) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        self.buf.drain(..pos);
        events
    }

    /// Whether bytes are waiting for more input.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty() && !self.in_paste
    }

    /// Resolve pending bytes after a read timeout: ESC becomes Escape, a
    /// stalled `ESC x` becomes Alt+x, everything else is parsed as-is.
    pub fn flush(&mut self) -> Vec<Event> {
        let pending = std::mem::take(&mut self.buf);
        let mut events = Vec::new();
        let mut rest = pending.as_slice();
        while let Some((&first, tail)) = rest.split_first() {
            if first == 0x1B {
                events.push(key(KeyCode::Escape, Modifiers::empty()));
                rest = tail;
                continue;
            }
            match try_parse(rest) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    rest = &rest[consumed..];
                }
                Parsed::Incomplete | Parsed::Skip(_) => rest = tail,
            }
        }
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing ──────────────────────────────────────────────────────

enum Parsed {
    Event(Event, usize),
    Incomplete,
    Skip(usize),
}

fn try_parse(buf: &[u8]) -> Parsed {
    let Some(&lead) = buf.first() else {
        return Parsed::Skip(0);
    };
    match lead {
        0x1B => parse_escape(buf),
        0x08 | 0x7F => Parsed::Event(key(KeyCode::Backspace, Modifiers::empty()), 1),
        0x09 => Parsed::Event(key(KeyCode::Tab, Modifiers::empty()), 1),
        0x0A | 0x0D => Parsed::Event(key(KeyCode::Enter, Modifiers::empty()), 1),
        0x00..=0x1F => Parsed::Event(key(ctrl_char(lead), Modifiers::CTRL), 1),
        0x20..=0x7E => Parsed::Event(key(KeyCode::Char(char::from(lead)), Modifiers::empty()), 1),
        _ => parse_utf8(buf),
    }
}

/// `Ctrl+letter` arrives as the letter's position in the alphabet.
fn ctrl_char(byte: u8) -> KeyCode {
    match byte {
        0x00 => KeyCode::Char('@'),
        0x01..=0x1A => KeyCode::Char(char::from(byte + b'a' - 1)),
        _ => KeyCode::Char(char::from(byte + b'@')),
    }
}

fn parse_escape(buf: &[u8]) -> Parsed {
    let Some(&second) = buf.get(1) else {
        return Parsed::Incomplete;
    };
    match second {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        0x20..=0x7E => Parsed::Event(key(KeyCode::Char(char::from(second)), Modifiers::ALT), 2),
        _ => Parsed::Event(key(KeyCode::Escape, Modifiers::empty()), 1),
    }
}

fn parse_csi(buf: &[u8]) -> Parsed {
    // Parameter bytes 0x30..=0x3F, intermediates 0x20..=0x2F, final 0x40..=0x7E.
    let mut end = 2;
    loop {
        let Some(&b) = buf.get(end) else {
            return Parsed::Incomplete;
        };
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }

    let params = parse_params(&buf[2..end]);
    let modifiers = params.get(1).copied().map_or(Modifiers::empty(), decode_modifiers);
    let consumed = end + 1;

    let code = match buf[end] {
        b'~' => match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            _ => return Parsed::Skip(consumed),
        },
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'Z' => return Parsed::Event(key(KeyCode::Tab, Modifiers::SHIFT), consumed),
        _ => return Parsed::Skip(consumed),
    };
    Parsed::Event(key(code, modifiers), consumed)
}

fn parse_ss3(buf: &[u8]) -> Parsed {
    let Some(&b) = buf.get(2) else {
        return Parsed::Incomplete;
    };
    let code = match b {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => return Parsed::Skip(3),
    };
    Parsed::Event(key(code, Modifiers::empty()), 3)
}

fn parse_utf8(buf: &[u8]) -> Parsed {
    let len = match buf[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Parsed::Skip(1),
    };
    if buf.len() < len {
        return Parsed::Incomplete;
    }
    std::str::from_utf8(&buf[..len])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Parsed::Skip(1), |ch| {
            Parsed::Event(key(KeyCode::Char(ch), Modifiers::empty()), len)
        })
}

// ─── Helpers ────────────────────────────────────────────────────────────────

const fn key(code: KeyCode, modifiers: Modifiers) -> Event {
    Event::Key(KeyEvent { code, modifiers })
}

/// Semicolon-separated decimal parameters. Empty fields read as 0.
fn parse_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, b| acc.saturating_mul(10).saturating_add(u16::from(b - b'0')))
        })
        .collect()
}

/// xterm modifier parameter: `1 + bitmask`; 0 and 1 mean none.
fn decode_modifiers(param: u16) -> Modifiers {
    let bits = u8::try_from(param.saturating_sub(1)).unwrap_or(0);
    Modifiers::from_bits_truncate(bits)
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
