//! # gim-editor: editing core for gim
//!
//! - **[`position`]**: `Position` (row, col), 0-indexed
//! - **[`buffer`]**: `Buffer`, an ordered list of lines on a rope
//! - **[`cursor`]**: `Cursor` motion with the Normal/Insert clamp rules
//! - **[`mode`]**: `Normal`, `Insert`, `CommandLine`
//! - **[`viewport`]**: soft-wrap layout, window sync, cursor mapping
//! - **[`command`]**: the `:` prompt and its commands
//! - **[`storage`]**: loading and saving lines
//! - **[`session`]**: ties it together and implements `gim_term`'s `App`

pub mod buffer;
pub mod command;
pub mod cursor;
pub mod mode;
pub mod position;
pub mod session;
pub mod storage;
pub mod viewport;

pub use session::Session;
