// SPDX-License-Identifier: MIT
//
// Terminal control: raw mode, alternate screen, restore on exit.
//
// termios, ioctl and isatty are only reachable through libc; each unsafe
// block wraps exactly one such call.
#![allow(unsafe_code)]
//
// A panic while the terminal is raw would leave the user's shell without
// echo. The panic hook therefore writes a fixed restore sequence straight
// to fd 1 (the stdout lock may be held by the panicking frame), puts the
// saved termios back, and only then runs the default hook.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

/// Size used when the real one cannot be queried (pipes, tests).
pub const FALLBACK_SIZE: Size = Size { cols: 80, rows: 24 };

/// Query the terminal size with `ioctl(TIOCGWINSZ)` on stdout.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };
    (rc == 0 && ws.ws_col > 0 && ws.ws_row > 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Whether stdin is a TTY.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic Restore ──────────────────────────────────────────────────────────

#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// End sync, paste off, pen reset, default cursor, cursor on, leave the
/// alternate screen. Alt-screen exit comes last so the shell reappears
/// clean.
#[rustfmt::skip]
const EMERGENCY_RESTORE: &[u8] = b"\
    \x1b[?2026l\
    \x1b[?2004l\
    \x1b[0m\
    \x1b[0 q\
    \x1b[?25h\
    \x1b[?1049l";

static PANIC_HOOK: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();
            previous(info);
        }));
    });
}

fn emergency_restore() {
    #[cfg(unix)]
    {
        unsafe {
            let _ = libc::write(
                libc::STDOUT_FILENO,
                EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
                EMERGENCY_RESTORE.len(),
            );
        }
        if let Ok(guard) = SAVED_TERMIOS.lock() {
            if let Some(original) = guard.as_ref() {
                unsafe {
                    let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Terminal handle. [`enter`](Self::enter) switches to full-screen raw
/// mode; [`leave`](Self::leave) or drop restores the previous state.
///
/// ```no_run
/// use gim_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // ... draw ...
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    size: Size,
    active: bool,
}

impl Terminal {
    /// Query the current size; does not touch terminal modes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            size: get_size().unwrap_or(FALLBACK_SIZE),
            active: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-query the size after SIGWINCH. Keeps the cached size if the
    /// query fails.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(s) = get_size() {
            self.size = s;
        }
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Raw mode, alternate screen, hidden cursor, bracketed paste.
    /// No-op when already active.
    ///
    /// # Errors
    ///
    /// Returns an error if termios or terminal output fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        enable_raw_mode()?;

        let mut out = io::stdout().lock();
        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        ansi::enable_bracketed_paste(&mut out)?;
        out.flush()?;

        self.active = true;
        Ok(())
    }

    /// Undo [`enter`](Self::enter). No-op when inactive.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output or termios restore fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        {
            let mut out = io::stdout().lock();
            ansi::end_sync(&mut out)?;
            ansi::disable_bracketed_paste(&mut out)?;
            ansi::reset(&mut out)?;
            ansi::set_cursor_shape(&mut out, ansi::CursorShape::Default)?;
            ansi::cursor_show(&mut out)?;
            ansi::exit_alt_screen(&mut out)?;
            out.flush()?;
        }
        disable_raw_mode()?;
        self.active = false;
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ── Raw Mode ────────────────────────────────────────────────────────

#[cfg(unix)]
fn enable_raw_mode() -> io::Result<()> {
    if !is_tty() {
        return Ok(());
    }
    let mut termios: libc::termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) } != 0 {
        return Err(io::Error::last_os_error());
    }
    if let Ok(mut saved) = SAVED_TERMIOS.lock() {
        *saved = Some(termios);
    }

    let mut raw = termios;
    unsafe { libc::cfmakeraw(&raw mut raw) };
    raw.c_cc[libc::VMIN] = 1;
    raw.c_cc[libc::VTIME] = 0;
    if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const raw) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(unix))]
fn enable_raw_mode() -> io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn disable_raw_mode() -> io::Result<()> {
    let Ok(mut saved) = SAVED_TERMIOS.lock() else {
        return Ok(());
    };
    if let Some(original) = saved.take() {
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const original) } != 0
        {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn disable_raw_mode() -> io::Result<()> {
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_size_does_not_panic() {
        let _ = get_size();
    }

    #[test]
    fn new_has_nonzero_size() {
        let term = Terminal::new();
        assert!(term.size().cols > 0);
        assert!(term.size().rows > 0);
        assert!(!term.is_active());
    }

    #[test]
    fn leave_without_enter_is_noop() {
        let mut term = Terminal::new();
        assert!(term.leave().is_ok());
    }

    #[test]
    fn restore_sequence_leaves_alt_screen_last() {
        assert!(EMERGENCY_RESTORE.ends_with(b"\x1b[?1049l"));
        assert!(std::str::from_utf8(EMERGENCY_RESTORE).is_ok());
    }
}
