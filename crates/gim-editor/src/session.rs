//! Session: one open file and everything needed to edit it.
//!
//! The session owns the buffer, cursor, mode, viewport and command line,
//! and implements [`App`] so the terminal event loop can drive it. Every
//! key goes through [`Session::handle_key`], which dispatches on the mode,
//! mutates state, and re-syncs the viewport before returning.
//!
//! ```text
//!   Normal ──i/a/A/o──▶ Insert ──Esc──▶ Normal
//!     │                                   ▲
//!     └──────:──────▶ CommandLine ──Enter/Esc──┘
//! ```
//!
//! Storage is a type parameter so tests can run against
//! [`MemoryStorage`](crate::storage::MemoryStorage) and inspect what was
//! written.

use std::path::{Path, PathBuf};

use gim_term::ansi::CursorShape;
use gim_term::buffer::FrameBuffer;
use gim_term::cell::Cell;
use gim_term::event_loop::{Action, App};
use gim_term::input::{Event, KeyCode, KeyEvent, Modifiers};
use gim_term::terminal::Size;
use gim_theme::{HighlightGroup, Theme};

use crate::buffer::Buffer;
use crate::command::{Command, CommandLine, E32_NO_FILE_NAME, E37_NO_WRITE, e212_cant_write};
use crate::cursor::Cursor;
use crate::mode::Mode;
use crate::position::Position;
use crate::storage::{FsStorage, Storage, StorageError};
use crate::viewport::{FILL_GLYPH, RowKind, Viewport};

/// Highlight group for buffer text.
pub const GROUP_NORMAL: &str = "Normal";
/// Highlight group for the status row.
pub const GROUP_STATUS: &str = "StatusLine";
/// Highlight group for the `~` on rows past the end of the buffer.
pub const GROUP_NON_TEXT: &str = "NonText";

/// An editing session over a single buffer.
pub struct Session<S: Storage = FsStorage> {
    buffer: Buffer,
    cursor: Cursor,
    mode: Mode,
    viewport: Viewport,
    cmdline: CommandLine,
    /// Message on the status row outside CommandLine mode.
    status: String,
    dirty: bool,
    path: Option<PathBuf>,
    storage: S,
    theme: Option<Theme>,
}

impl<S: Storage> Session<S> {
    // -- Construction -------------------------------------------------------

    /// An unnamed session with one empty line.
    #[must_use]
    pub fn new(storage: S, size: Size) -> Self {
        Self::with_buffer(Buffer::new(), None, String::new(), storage, size)
    }

    /// Open `path`. A missing file starts empty with a `[New File]` status;
    /// an unreadable one starts empty with `[Unreadable]`. Never fails.
    pub fn open(mut storage: S, path: impl Into<PathBuf>, size: Size) -> Self {
        let path = path.into();
        let shown = path.display().to_string();
        let (buffer, status) = match storage.load_lines(&path) {
            Ok(lines) => {
                let chars: usize = lines.iter().map(|l| l.chars().count() + 1).sum();
                tracing::info!(path = %shown, lines = lines.len(), "opened file");
                let status = format!("\"{shown}\" {}L, {chars}C", lines.len());
                (Buffer::from_lines(&lines), status)
            }
            Err(StorageError::NotFound) => {
                tracing::info!(path = %shown, "new file");
                (Buffer::new(), format!("\"{shown}\" [New File]"))
            }
            Err(StorageError::Io(err)) => {
                tracing::warn!(path = %shown, error = %err, "cannot read file");
                (Buffer::new(), format!("\"{shown}\" [Unreadable]"))
            }
        };
        Self::with_buffer(buffer, Some(path), status, storage, size)
    }

    fn with_buffer(
        buffer: Buffer,
        path: Option<PathBuf>,
        status: String,
        storage: S,
        size: Size,
    ) -> Self {
        let mut session = Self {
            buffer,
            cursor: Cursor::new(),
            mode: Mode::Normal,
            viewport: Viewport::new(usize::from(size.cols), usize::from(size.rows)),
            cmdline: CommandLine::new(),
            status,
            dirty: false,
            path,
            storage,
            theme: None,
        };
        session.sync();
        session
    }

    /// Paint with `theme`'s highlight groups.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    // -- Accessors ----------------------------------------------------------

    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub const fn cmdline(&self) -> &CommandLine {
        &self.cmdline
    }

    /// The message shown outside CommandLine mode.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Exactly what the status row shows right now.
    #[must_use]
    pub fn status_line(&self) -> String {
        match self.mode {
            Mode::CommandLine => format!(":{}", self.cmdline.input()),
            Mode::Normal | Mode::Insert => self.status.clone(),
        }
    }

    /// True if the buffer changed since it was loaded or last written.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub const fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    #[must_use]
    pub const fn theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    // -- Input --------------------------------------------------------------

    /// Dispatch one event. Only [`Action::Quit`] ends the session.
    pub fn handle_event(&mut self, event: &Event) -> Action {
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Paste(text) => {
                self.handle_paste(text);
                Action::Continue
            }
        }
    }

    /// Dispatch one key press on the current mode.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let action = match self.mode {
            Mode::Normal => self.handle_normal(key),
            Mode::Insert => self.handle_insert(key),
            Mode::CommandLine => self.handle_command(key),
        };
        self.sync();
        action
    }

    /// Insert pasted text. Line breaks split the line in Insert mode and
    /// are dropped on the command line; Normal mode ignores pastes.
    pub fn handle_paste(&mut self, text: &str) {
        match self.mode {
            Mode::Insert => {
                let mut chars = text.chars().peekable();
                while let Some(ch) = chars.next() {
                    match ch {
                        '\r' => {
                            if chars.peek() == Some(&'\n') {
                                chars.next();
                            }
                            self.insert_newline();
                        }
                        '\n' => self.insert_newline(),
                        _ => self.insert_char(ch),
                    }
                }
            }
            Mode::CommandLine => {
                for ch in text.chars().filter(|c| !matches!(c, '\r' | '\n')) {
                    self.cmdline.insert_char(ch);
                }
            }
            Mode::Normal => tracing::debug!(len = text.len(), "paste ignored in normal mode"),
        }
        self.sync();
    }

    // -- Normal mode --------------------------------------------------------

    fn handle_normal(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) {
            return Action::Continue;
        }

        match key.code {
            KeyCode::Char('i') | KeyCode::Insert => self.enter_insert(),
            KeyCode::Char('a') => {
                self.cursor
                    .move_right(&self.buffer, Mode::Insert.cursor_past_end());
                self.enter_insert();
            }
            KeyCode::Char('A') => {
                self.cursor
                    .move_to_line_end(&self.buffer, Mode::Insert.cursor_past_end());
                self.enter_insert();
            }
            KeyCode::Char('o') => {
                let row = self.cursor.row();
                self.buffer.split_line(row, self.buffer.line_len(row));
                self.dirty = true;
                self.cursor
                    .goto_row(row + 1, &self.buffer, Mode::Insert.cursor_past_end());
                self.cursor.move_to_line_start();
                self.enter_insert();
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                let Position { row, col } = self.cursor.position();
                if self.buffer.delete_char_at(row, col) {
                    self.dirty = true;
                }
                self.cursor.clamp(&self.buffer, self.mode.cursor_past_end());
            }
            KeyCode::Char(':') => {
                self.cmdline.clear();
                self.set_mode(Mode::CommandLine);
            }
            KeyCode::Char('G') => {
                let last = self.buffer.line_count() - 1;
                self.cursor
                    .goto_row(last, &self.buffer, self.mode.cursor_past_end());
            }
            code => {
                self.move_cursor(code, self.mode.cursor_past_end());
            }
        }
        Action::Continue
    }

    fn enter_insert(&mut self) {
        self.set_mode(Mode::Insert);
        self.status = Mode::Insert.display_name().to_string();
    }

    /// Shared motion keys. Returns whether `code` was a motion.
    fn move_cursor(&mut self, code: KeyCode, past_end: bool) -> bool {
        let buf = &self.buffer;
        let vim_keys = !past_end;
        match code {
            KeyCode::Left => self.cursor.move_left(buf, past_end),
            KeyCode::Right => self.cursor.move_right(buf, past_end),
            KeyCode::Up => self.cursor.move_up(buf, past_end),
            KeyCode::Down => self.cursor.move_down(buf, past_end),
            KeyCode::Home => self.cursor.move_to_line_start(),
            KeyCode::End => self.cursor.move_to_line_end(buf, past_end),
            KeyCode::Char('h') if vim_keys => self.cursor.move_left(buf, past_end),
            KeyCode::Char('l') if vim_keys => self.cursor.move_right(buf, past_end),
            KeyCode::Char('k') if vim_keys => self.cursor.move_up(buf, past_end),
            KeyCode::Char('j') if vim_keys => self.cursor.move_down(buf, past_end),
            KeyCode::Char('0') if vim_keys => self.cursor.move_to_line_start(),
            KeyCode::Char('$') if vim_keys => self.cursor.move_to_line_end(buf, past_end),
            _ => return false,
        }
        true
    }

    // -- Insert mode --------------------------------------------------------

    fn handle_insert(&mut self, key: KeyEvent) -> Action {
        if self.move_cursor(key.code, self.mode.cursor_past_end()) {
            return Action::Continue;
        }

        match key.code {
            KeyCode::Escape => {
                self.set_mode(Mode::Normal);
                self.status.clear();
                self.cursor.clamp(&self.buffer, self.mode.cursor_past_end());
            }
            KeyCode::Char(ch) if !key.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) => {
                self.insert_char(ch);
            }
            KeyCode::Tab => self.insert_char('\t'),
            KeyCode::Enter => self.insert_newline(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => {
                let Position { row, col } = self.cursor.position();
                let edited = if col < self.buffer.line_len(row) {
                    self.buffer.delete_char_at(row, col)
                } else {
                    self.buffer.merge_line_with_previous(row + 1)
                };
                self.dirty |= edited;
            }
            _ => {}
        }
        Action::Continue
    }

    fn insert_char(&mut self, ch: char) {
        let Position { row, col } = self.cursor.position();
        if self.buffer.insert_char(row, col, ch) {
            self.dirty = true;
            self.cursor
                .move_right(&self.buffer, self.mode.cursor_past_end());
        }
    }

    fn insert_newline(&mut self) {
        let Position { row, col } = self.cursor.position();
        if self.buffer.split_line(row, col) {
            self.dirty = true;
            self.cursor
                .goto_row(row + 1, &self.buffer, self.mode.cursor_past_end());
            self.cursor.move_to_line_start();
        }
    }

    fn backspace(&mut self) {
        let past_end = self.mode.cursor_past_end();
        let Position { row, col } = self.cursor.position();
        if col > 0 {
            if self.buffer.delete_char_before(row, col) {
                self.dirty = true;
                self.cursor
                    .set_position(Position::new(row, col - 1), &self.buffer, past_end);
            }
        } else if row > 0 {
            let boundary = self.buffer.line_len(row - 1);
            if self.buffer.merge_line_with_previous(row) {
                self.dirty = true;
                self.cursor.goto_row(row - 1, &self.buffer, past_end);
                self.cursor
                    .set_position(Position::new(row - 1, boundary), &self.buffer, past_end);
            }
        }
    }

    // -- Command-line mode --------------------------------------------------

    fn handle_command(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(Modifiers::CTRL) && key.code == KeyCode::Char('c') {
            self.leave_command_line();
            return Action::Continue;
        }

        match key.code {
            KeyCode::Escape => self.leave_command_line(),
            KeyCode::Enter => {
                let cmd = self.cmdline.parse();
                self.leave_command_line();
                return self.execute(cmd);
            }
            KeyCode::Char(ch) => self.cmdline.insert_char(ch),
            KeyCode::Backspace => {
                if !self.cmdline.backspace() && self.cmdline.is_empty() {
                    self.leave_command_line();
                }
            }
            KeyCode::Delete => {
                self.cmdline.delete();
            }
            KeyCode::Left => self.cmdline.move_left(),
            KeyCode::Right => self.cmdline.move_right(),
            KeyCode::Home => self.cmdline.move_home(),
            KeyCode::End => self.cmdline.move_end(),
            _ => {}
        }
        Action::Continue
    }

    fn leave_command_line(&mut self) {
        self.cmdline.clear();
        self.set_mode(Mode::Normal);
    }

    /// Run a parsed command. Failures go to the status row.
    pub fn execute(&mut self, cmd: Command) -> Action {
        match cmd {
            Command::Write => {
                self.write(None);
                Action::Continue
            }
            Command::WriteAs(path) => {
                self.write(Some(path));
                Action::Continue
            }
            Command::Quit => {
                if self.dirty {
                    tracing::info!("quit refused: unsaved changes");
                    self.status = E37_NO_WRITE.to_string();
                    Action::Continue
                } else {
                    Action::Quit
                }
            }
            Command::ForceQuit => Action::Quit,
            Command::WriteQuit => self.write_then_quit(),
            Command::ExitSave => {
                if self.dirty {
                    self.write_then_quit()
                } else {
                    Action::Quit
                }
            }
            Command::Goto(line) => {
                let target = line.clamp(1, self.buffer.line_count()) - 1;
                self.cursor
                    .goto_row(target, &self.buffer, self.mode.cursor_past_end());
                Action::Continue
            }
            Command::Unknown(text) => {
                tracing::debug!(command = %text, "ignoring unknown command");
                Action::Continue
            }
        }
    }

    fn write_then_quit(&mut self) -> Action {
        if self.write(None) {
            Action::Quit
        } else {
            Action::Continue
        }
    }

    /// Save to `target`, or to the session's path. Adopts `target` as the
    /// session's path when there is none. Returns whether it succeeded.
    fn write(&mut self, target: Option<PathBuf>) -> bool {
        let Some(path) = target.or_else(|| self.path.clone()) else {
            self.status = E32_NO_FILE_NAME.to_string();
            return false;
        };

        let lines = self.buffer.lines();
        match self.storage.save_lines(&path, &lines) {
            Ok(()) => {
                tracing::info!(path = %path.display(), lines = lines.len(), "wrote buffer");
                if self.path.is_none() {
                    self.path = Some(path.clone());
                }
                if self.path.as_deref() == Some(path.as_path()) {
                    self.dirty = false;
                }
                self.status = format!(
                    "\"{}\" {}L, {}C written",
                    path.display(),
                    lines.len(),
                    self.buffer.char_count()
                );
                true
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "write failed");
                self.status = e212_cant_write(&err);
                false
            }
        }
    }

    // -- Helpers ------------------------------------------------------------

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::debug!(from = %self.mode, to = %mode, "mode change");
            self.mode = mode;
        }
    }

    /// Scroll to the cursor. On a line too tall for the text area the
    /// cursor is held to the last drawn cell.
    fn sync(&mut self) {
        self.viewport.sync(&self.buffer, &self.cursor);
        if let Some(limit) = self.viewport.col_limit(&self.buffer, &self.cursor) {
            if self.cursor.col() > limit {
                let pos = Position::new(self.cursor.row(), limit);
                self.cursor
                    .set_position(pos, &self.buffer, self.mode.cursor_past_end());
                self.viewport.sync(&self.buffer, &self.cursor);
            }
        }
    }

    /// Resolved style for `name`, falling back to `fallback`.
    fn group(&self, name: &str, fallback: HighlightGroup) -> HighlightGroup {
        self.theme
            .as_ref()
            .and_then(|t| t.resolve(name))
            .unwrap_or(fallback)
    }
}

impl<S: Storage> App for Session<S> {
    fn on_event(&mut self, event: &Event) -> Action {
        self.handle_event(event)
    }

    fn on_resize(&mut self, size: Size) {
        self.viewport
            .resize(usize::from(size.cols), usize::from(size.rows));
        self.sync();
    }

    fn paint(&mut self, fb: &mut FrameBuffer) {
        let (w, h) = (usize::from(fb.width()), usize::from(fb.height()));
        if (w, h) != (self.viewport.width(), self.viewport.height()) {
            self.viewport.resize(w, h);
            self.sync();
        }

        let normal = self.group(GROUP_NORMAL, HighlightGroup::default());
        let status = self.group(GROUP_STATUS, normal);
        let non_text = self.group(GROUP_NON_TEXT, normal);
        let fill_bg = if non_text.bg.is_default() {
            normal.bg
        } else {
            non_text.bg
        };

        let frame = self.viewport.render(&self.buffer, &self.cursor);
        for (y, row) in frame.rows().iter().enumerate() {
            let Ok(y) = u16::try_from(y) else { break };
            fb.fill_row(y, normal.fg, normal.bg, normal.attrs);
            match row.kind() {
                RowKind::Fill => {
                    fb.set(
                        0,
                        y,
                        Cell::styled(FILL_GLYPH, non_text.fg, fill_bg, non_text.attrs),
                    );
                }
                RowKind::Text { .. } => {
                    fb.put_str(0, y, &row.text(), normal.fg, normal.bg, normal.attrs);
                }
            }
        }

        if fb.height() >= 2 {
            let y = fb.height() - 1;
            fb.fill_row(y, status.fg, status.bg, status.attrs);
            fb.put_str(0, y, &self.status_line(), status.fg, status.bg, status.attrs);
        }
    }

    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        let shape = self.mode.cursor_shape();
        let (x, y) = if self.mode == Mode::CommandLine {
            let x = (self.cmdline.cursor() + 1).min(self.viewport.width() - 1);
            (x, self.viewport.height().saturating_sub(1))
        } else {
            self.viewport.cursor_screen(&self.buffer, &self.cursor)
        };
        Some((u16::try_from(x).ok()?, u16::try_from(y).ok()?, shape))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
