// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop: input in, frame out.
//
// Bytes from the stdin reader are parsed into events and handed to the
// application one at a time. After a batch of events (or a resize) the
// application paints a fresh frame and the diff renderer writes only
// what changed.
//
// The loop waits on the reader channel with a short timeout. A timeout
// with bytes still pending in the parser means no continuation arrived,
// so a lone ESC is flushed as the Escape key. Resizes are noticed through
// a flag set by the SIGWINCH handler and checked on every wakeup.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::ansi::{self, CursorShape};
use crate::buffer::FrameBuffer;
use crate::diff::DiffRenderer;
use crate::input::{Event, Parser};
use crate::reader::StdinReader;
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application wants after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// A full-screen application driven by [`EventLoop`].
///
/// Per wakeup the loop calls [`on_event`](App::on_event) for each parsed
/// event, [`on_resize`](App::on_resize) if the window changed, then
/// [`paint`](App::paint) and [`cursor`](App::cursor) when anything
/// happened.
pub trait App {
    /// Handle one input event. Return [`Action::Quit`] to stop the loop.
    fn on_event(&mut self, _event: &Event) -> Action {
        Action::Continue
    }

    /// The terminal changed size. Also called once before the first paint.
    fn on_resize(&mut self, _size: Size) {}

    /// Paint the whole screen. The buffer is cleared and sized to the
    /// terminal before the call.
    fn paint(&mut self, buf: &mut FrameBuffer);

    /// Where to show the hardware cursor after painting, and its shape.
    /// `None` hides it.
    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        None
    }
}

// ─── Loop Config ─────────────────────────────────────────────────────────────

/// Event loop timing.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// How long to wait for more bytes before flushing a lone ESC, in
    /// microseconds.
    pub escape_timeout_us: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            escape_timeout_us: 8333,
        }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Owns the terminal, the input parser and the renderer.
///
/// ```no_run
/// use gim_term::buffer::FrameBuffer;
/// use gim_term::event_loop::{Action, App, EventLoop};
/// use gim_term::input::{Event, KeyCode, KeyEvent};
///
/// struct Quitter;
///
/// impl App for Quitter {
///     fn on_event(&mut self, event: &Event) -> Action {
///         match event {
///             Event::Key(KeyEvent { code: KeyCode::Char('q'), .. }) => Action::Quit,
///             _ => Action::Continue,
///         }
///     }
///
///     fn paint(&mut self, _buf: &mut FrameBuffer) {}
/// }
///
/// EventLoop::new().run(&mut Quitter)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    renderer: DiffRenderer,
    config: LoopConfig,
}

impl EventLoop {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    #[must_use]
    pub fn with_config(config: LoopConfig) -> Self {
        Self {
            terminal: Terminal::new(),
            parser: Parser::new(),
            renderer: DiffRenderer::new(),
            config,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Enter the terminal, run until the app quits or stdin closes, and
    /// restore the terminal on the way out, error or not.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, rendering or teardown fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let result = match StdinReader::spawn() {
            Ok((mut reader, rx)) => {
                let result = self.run_inner(app, &rx);
                reader.stop();
                result
            }
            Err(e) => Err(e),
        };

        self.terminal.leave()?;
        result
    }

    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> io::Result<()> {
        let size = self.terminal.size();
        let mut frame = FrameBuffer::new(size.cols, size.rows);
        app.on_resize(size);
        self.present(app, &mut frame)?;

        let timeout = Duration::from_micros(self.config.escape_timeout_us);
        loop {
            let events = match rx.recv_timeout(timeout) {
                Ok(bytes) => self.parser.advance(&bytes),
                Err(RecvTimeoutError::Timeout) if self.parser.has_pending() => self.parser.flush(),
                Err(RecvTimeoutError::Timeout) => Vec::new(),
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            };
            let mut dirty = !events.is_empty();

            for event in &events {
                if app.on_event(event) == Action::Quit {
                    return Ok(());
                }
            }

            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let size = self.terminal.refresh_size();
                frame.resize(size.cols, size.rows);
                self.renderer.force_redraw();
                app.on_resize(size);
                dirty = true;
            }

            if dirty {
                self.present(app, &mut frame)?;
            }
        }
    }

    fn present(&mut self, app: &mut impl App, frame: &mut FrameBuffer) -> io::Result<()> {
        frame.clear();
        app.paint(frame);
        self.renderer.render(frame);
        self.renderer.flush()?;

        let mut out = io::stdout().lock();
        if let Some((x, y, shape)) = app.cursor() {
            ansi::cursor_to(&mut out, x, y)?;
            ansi::set_cursor_shape(&mut out, shape)?;
            ansi::cursor_show(&mut out)?;
        } else {
            ansi::cursor_hide(&mut out)?;
        }
        out.flush()
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
