//! Terminal escape sequence parser
//!
//! A streaming parser that converts a byte stream into terminal actions.
//! Based on the VT500-series parser model from <https://vt100.net/emu/dec_ansi_parser>
//!
//! Reference: <https://invisible-island.net/xterm/ctlseqs/ctlseqs.html>

mod action;
mod params;
mod state;
mod utf8;

pub use action::{Action, CsiAction, EscAction, OscAction};
pub use params::Params;
pub use state::{Parser, ParserState};
pub use utf8::REPLACEMENT_CHAR;
