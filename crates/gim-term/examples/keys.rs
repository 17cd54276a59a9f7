// SPDX-License-Identifier: MIT
//
// Key viewer: shows the last events the parser produced. Useful for
// checking what a terminal actually sends. Ctrl-Q quits.
//
// Usage:
//   cargo run -p gim-term --example keys

use std::collections::VecDeque;

use gim_term::ansi::CursorShape;
use gim_term::buffer::FrameBuffer;
use gim_term::cell::Attr;
use gim_term::color::CellColor;
use gim_term::event_loop::{Action, App, EventLoop};
use gim_term::input::{Event, KeyCode, Modifiers};

const MAX_LOG: usize = 200;

#[derive(Default)]
struct Keys {
    log: VecDeque<String>,
}

impl App for Keys {
    fn on_event(&mut self, event: &Event) -> Action {
        if let Event::Key(key) = event {
            if key.code == KeyCode::Char('q') && key.modifiers.contains(Modifiers::CTRL) {
                return Action::Quit;
            }
        }
        self.log.push_front(format!("{event:?}"));
        self.log.truncate(MAX_LOG);
        Action::Continue
    }

    fn paint(&mut self, buf: &mut FrameBuffer) {
        buf.fill_row(0, CellColor::Default, CellColor::Default, Attr::INVERSE);
        buf.put_str(0, 0, " gim-term keys (Ctrl-Q quits)", CellColor::Default, CellColor::Default, Attr::INVERSE);
        for (y, line) in (1..buf.height()).zip(&self.log) {
            buf.put_str(0, y, line, CellColor::Default, CellColor::Default, Attr::empty());
        }
    }

    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        None
    }
}

fn main() -> std::io::Result<()> {
    EventLoop::new().run(&mut Keys::default())
}
