// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// Keeps the last frame that reached the terminal and, for each new frame,
// writes only the cells that differ. A keystroke in the editor usually
// touches the edited row and the status line, so a repaint is a handful
// of cells rather than the whole screen.
//
// The frame is wrapped in a synchronized update (DEC 2026) and leaves
// the pen reset so nothing bleeds into the hardware cursor or the shell
// prompt on exit.

use std::io::{self, Write};

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::output::{CellWriter, OutputBuffer};

/// What one render pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub cells_rendered: usize,
    pub cells_skipped: usize,
    pub bytes_written: usize,
}

/// Emits ANSI only for cells that changed since the previous frame.
///
/// ```no_run
/// use gim_term::buffer::FrameBuffer;
/// use gim_term::diff::DiffRenderer;
///
/// let mut renderer = DiffRenderer::new();
/// let frame = FrameBuffer::new(80, 24);
/// renderer.render(&frame);
/// renderer.flush()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct DiffRenderer {
    output: OutputBuffer,
    writer: CellWriter,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    /// A renderer with no previous frame; the first render draws everything.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: OutputBuffer::new(),
            writer: CellWriter::new(),
            previous: None,
        }
    }

    /// Diff `current` against the previous frame into the output buffer.
    pub fn render(&mut self, current: &FrameBuffer) -> RenderStats {
        self.output.clear();
        self.writer.reset_state();

        let (width, height) = (current.width(), current.height());
        let mut stats = RenderStats::default();
        if width == 0 || height == 0 {
            self.previous = Some(current.clone());
            return stats;
        }

        ansi::begin_sync(&mut self.output).ok();

        let previous = self
            .previous
            .take()
            .filter(|prev| prev.width() == width && prev.height() == height);
        if previous.is_none() {
            ansi::clear_screen(&mut self.output).ok();
        }

        for y in 0..height {
            let Some(row) = current.row(y) else { continue };
            let old_row = previous.as_ref().and_then(|p| p.row(y));
            if old_row == Some(row) {
                stats.cells_skipped += row.len();
                continue;
            }
            for (x, cell) in (0..width).zip(row) {
                if old_row.and_then(|r| r.get(usize::from(x))) == Some(cell) {
                    stats.cells_skipped += 1;
                } else {
                    self.writer.render_cell(&mut self.output, x, y, cell);
                    stats.cells_rendered += 1;
                }
            }
        }

        ansi::reset(&mut self.output).ok();
        ansi::end_sync(&mut self.output).ok();
        stats.bytes_written = self.output.len();

        self.previous = Some(current.clone());
        stats
    }

    /// Bytes produced by the last [`render`](Self::render).
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        self.output.as_bytes()
    }

    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush_stdout()
    }

    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        self.output.flush_to(w)
    }

    /// Forget the previous frame so the next render is a full redraw.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
