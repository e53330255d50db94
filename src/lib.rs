//! vtstate: terminal state preservation
//!
//! Keeps enough of a terminal's state to bring a freshly attached client up
//! to date without replaying the whole output history:
//!
//! - `core`: Screen model, cells, cursor, modes, keyboard stack, scrollback ring
//! - `parser`: VT/xterm escape sequence parser
//! - `terminal`: Executor applying parsed output to the screen model
//! - `render`: Styled text rendering of the visible screen
//! - `dump`: Control-sequence script restoring screen, cursor and input modes
//! - `config`: Dimensions and history size

pub mod config;
pub mod core;
pub mod dump;
pub mod parser;
pub mod render;
pub mod terminal;

pub use crate::config::{Config, ConfigError};
pub use crate::core::{Line, Scrollback, Snapshot};
pub use crate::dump::{state_dump, CursorState, StateSource};
pub use crate::terminal::Terminal;
