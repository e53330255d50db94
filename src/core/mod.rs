//! Terminal Core Module
//!
//! Platform-independent terminal state. This module contains:
//! - Screen model (primary and alternate screens)
//! - Cell representation with attributes
//! - Cursor state and positioning
//! - Scrollback ring buffer
//! - Mode settings and the kitty keyboard stack
//! - Deterministic snapshot generation
//!
//! Everything here is plain data driven by the executor in
//! [`crate::terminal`]; nothing performs I/O.

mod cell;
mod cursor;
mod keyboard;
mod line;
mod modes;
mod screen;
mod scrollback;
mod snapshot;

pub use cell::{Cell, Color, Style};
pub use cursor::{Cursor, CursorShape, SavedCursor};
pub use keyboard::{KeyboardSetMode, KeyboardStack, MAX_KEYBOARD_STACK_DEPTH};
pub use line::Line;
pub use modes::{Mode, ModeSetting, Modes, RESTORABLE_MODES};
pub use screen::Screen;
pub use scrollback::{Scrollback, DEFAULT_SCROLLBACK_SIZE};
pub use snapshot::{CursorSnapshot, Snapshot};
