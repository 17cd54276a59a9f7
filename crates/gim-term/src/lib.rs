// SPDX-License-Identifier: MIT
//
// gim-term: terminal driver for gim.
//
// Owns everything between the editor core and the physical terminal:
// raw mode and the alternate screen, a background stdin reader, a key
// parser for the escape sequences a plain xterm-compatible terminal
// emits, a fixed-size cell grid the editor paints into, and a
// differential renderer that writes only the cells that changed.
//
// The editor core never touches stdin or stdout. It implements the
// `App` trait from `event_loop` and receives one key event at a time.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod diff;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;
