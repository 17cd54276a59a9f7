//! Command-line mode: the `:` prompt on the status row.
//!
//! `:` in Normal mode opens the prompt, Enter runs it, Escape cancels.
//!
//! | Command      | Action                                        |
//! |--------------|-----------------------------------------------|
//! | `:w`         | Save to the current path                      |
//! | `:w <path>`  | Save to `path`, adopting it if none is set    |
//! | `:q`         | Quit, refused while there are unsaved changes |
//! | `:q!`        | Quit unconditionally                          |
//! | `:wq`        | Save, then quit                               |
//! | `:x`         | Save if modified, then quit                   |
//! | `:N`         | Go to line `N` (1-based, clamped)             |
//!
//! Anything else parses to [`Command::Unknown`], which the session ignores.

use std::path::PathBuf;

/// Status text for `:q` with unsaved changes.
pub const E37_NO_WRITE: &str = "E37: No write since last change (add ! to override)";
/// Status text for a write with no file name.
pub const E32_NO_FILE_NAME: &str = "E32: No file name";

/// Status text for a failed write.
#[must_use]
pub fn e212_cant_write(err: &impl std::fmt::Display) -> String {
    format!("E212: Can't open file for writing: {err}")
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A parsed `:` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Write,
    WriteAs(PathBuf),
    Quit,
    ForceQuit,
    WriteQuit,
    /// `:x`: like `:wq`, but only writes a modified buffer.
    ExitSave,
    /// `:N`, 1-based as typed. `0` is allowed and clamps to the first line.
    Goto(usize),
    /// Holds the trimmed input, for logging.
    Unknown(String),
}

/// Parse command text (no leading `:`).
#[must_use]
pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();

    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        // Overlong digit strings saturate; the session clamps anyway.
        return Command::Goto(trimmed.parse().unwrap_or(usize::MAX));
    }

    let (cmd, arg) = trimmed
        .find(char::is_whitespace)
        .map_or((trimmed, ""), |pos| {
            (&trimmed[..pos], trimmed[pos..].trim_start())
        });

    match (cmd, arg) {
        ("w" | "write", "") => Command::Write,
        ("w" | "write", path) => Command::WriteAs(PathBuf::from(path)),
        ("q" | "quit", "") => Command::Quit,
        ("q!" | "quit!", "") => Command::ForceQuit,
        ("wq", "") => Command::WriteQuit,
        ("x" | "xit", "") => Command::ExitSave,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CommandLine
// ---------------------------------------------------------------------------

/// The text typed after `:`, with an edit cursor (char offset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    input: String,
    cursor: usize,
}

impl CommandLine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
        }
    }

    /// The text without the leading `:`.
    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    pub fn insert_char(&mut self, ch: char) {
        let at = self.byte_offset(self.cursor);
        self.input.insert(at, ch);
        self.cursor += 1;
    }

    /// Delete the char before the edit cursor. `false` at the start.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.input.remove(at);
        true
    }

    /// Delete the char under the edit cursor. `false` at the end.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.input.chars().count() {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.input.remove(at);
        true
    }

    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    #[must_use]
    pub fn parse(&self) -> Command {
        parse_command(&self.input)
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map_or(self.input.len(), |(i, _)| i)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> CommandLine {
        let mut cl = CommandLine::new();
        for ch in s.chars() {
            cl.insert_char(ch);
        }
        cl
    }

    // -- Editing ------------------------------------------------------------

    #[test]
    fn typing_appends() {
        let cl = typed("wq");
        assert_eq!(cl.input(), "wq");
        assert_eq!(cl.cursor(), 2);
    }

    #[test]
    fn insert_in_middle() {
        let mut cl = typed("wq");
        cl.move_left();
        cl.insert_char('!');
        assert_eq!(cl.input(), "w!q");
    }

    #[test]
    fn backspace_and_delete() {
        let mut cl = typed("abc");
        assert!(cl.backspace());
        assert_eq!(cl.input(), "ab");
        cl.move_home();
        assert!(!cl.backspace());
        assert!(cl.delete());
        assert_eq!(cl.input(), "b");
        cl.move_end();
        assert!(!cl.delete());
    }

    #[test]
    fn multibyte_editing() {
        let mut cl = typed("wé");
        cl.move_left();
        cl.insert_char('x');
        assert_eq!(cl.input(), "wxé");
        cl.move_right();
        assert!(cl.backspace());
        assert_eq!(cl.input(), "wx");
    }

    #[test]
    fn clear_resets() {
        let mut cl = typed("q!");
        cl.clear();
        assert!(cl.is_empty());
        assert_eq!(cl.cursor(), 0);
    }

    // -- Parsing ------------------------------------------------------------

    #[test]
    fn parse_quit_family() {
        assert_eq!(parse_command("q"), Command::Quit);
        assert_eq!(parse_command("q!"), Command::ForceQuit);
        assert_eq!(parse_command("quit"), Command::Quit);
        assert_eq!(parse_command("wq"), Command::WriteQuit);
        assert_eq!(parse_command("x"), Command::ExitSave);
        assert_eq!(parse_command("  q  "), Command::Quit);
    }

    #[test]
    fn parse_write() {
        assert_eq!(parse_command("w"), Command::Write);
        assert_eq!(
            parse_command("w  notes.txt"),
            Command::WriteAs(PathBuf::from("notes.txt"))
        );
    }

    #[test]
    fn parse_goto() {
        assert_eq!(parse_command("42"), Command::Goto(42));
        assert_eq!(parse_command("0"), Command::Goto(0));
        assert_eq!(
            parse_command("99999999999999999999999999"),
            Command::Goto(usize::MAX)
        );
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(parse_command(""), Command::Unknown(String::new()));
        assert_eq!(parse_command("-3"), Command::Unknown("-3".into()));
        assert_eq!(parse_command("q extra"), Command::Unknown("q extra".into()));
        assert_eq!(parse_command("set nu"), Command::Unknown("set nu".into()));
    }

    #[test]
    fn parse_uses_input() {
        assert_eq!(typed("wq").parse(), Command::WriteQuit);
    }

    #[test]
    fn error_texts() {
        assert_eq!(
            e212_cant_write(&"permission denied"),
            "E212: Can't open file for writing: permission denied"
        );
        assert!(E37_NO_WRITE.starts_with("E37"));
    }
}
