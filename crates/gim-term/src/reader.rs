// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Background stdin reader.
//
// stdin reads block, while the event loop needs to wake on a timer to
// resolve a lone ESC and notice resizes. A dedicated thread therefore
// reads raw bytes and sends them over a channel; the loop waits on the
// channel with `recv_timeout`.
//
// The thread polls stdin with a short timeout between reads so it can
// notice the stop flag instead of sitting in `read()` forever.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

const READ_BUF_SIZE: usize = 4096;

/// Stop-flag check interval, milliseconds.
#[cfg(unix)]
const POLL_TIMEOUT_MS: i32 = 50;

/// Handle to the reader thread. Dropping it stops the thread.
pub struct StdinReader {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl StdinReader {
    /// Start reading. Each message is one non-empty chunk of raw bytes;
    /// the channel closes on EOF or after [`stop`](Self::stop).
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn() -> std::io::Result<(Self, Receiver<Vec<u8>>)> {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || read_loop(&tx, &flag))?;
        Ok((
            Self {
                handle: Some(handle),
                stop,
            },
            rx,
        ))
    }

    /// Signal the thread and join it. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(unix)]
fn read_loop(tx: &Sender<Vec<u8>>, stop: &AtomicBool) {
    let mut buf = [0u8; READ_BUF_SIZE];
    while !stop.load(Ordering::Relaxed) {
        let mut pfd = libc::pollfd {
            fd: libc::STDIN_FILENO,
            events: libc::POLLIN,
            revents: 0,
        };
        if unsafe { libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS) } <= 0 {
            continue;
        }
        let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
        let Ok(n) = usize::try_from(n) else { break };
        if n == 0 || tx.send(buf[..n].to_vec()).is_err() {
            break;
        }
    }
}

#[cfg(not(unix))]
fn read_loop(tx: &Sender<Vec<u8>>, stop: &AtomicBool) {
    use std::io::Read;

    let mut buf = [0u8; READ_BUF_SIZE];
    while !stop.load(Ordering::Relaxed) {
        match std::io::stdin().lock().read(&mut buf) {
            Ok(n) if n > 0 => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
            _ => break,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
