//! Parser state machine
//!
//! Implements a state machine parser based on the VT500 series parser model.
//! Reference: https://vt100.net/emu/dec_ansi_parser
//!
//! The parser handles:
//! - C0 control characters
//! - ESC sequences
//! - CSI (Control Sequence Introducer) sequences
//! - OSC (Operating System Command) sequences
//! - DCS, APC, PM and SOS strings (consumed but ignored)
//!
//! Input is a byte stream that may be split at any point; all partial
//! state, including half-decoded UTF-8, survives between calls.

use super::action::{Action, CsiAction, EscAction, OscAction};
use super::params::Params;
use super::utf8::{Utf8Decoder, Utf8Result, REPLACEMENT_CHAR};

/// Maximum length for OSC/DCS data
const MAX_STRING_LEN: usize = 65536;
/// Maximum length for intermediate bytes
const MAX_INTERMEDIATES: usize = 4;

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Normal text processing
    Ground,
    /// After ESC
    Escape,
    /// ESC followed by intermediate bytes
    EscapeIntermediate,
    /// After ESC [
    CsiEntry,
    /// Collecting CSI parameters
    CsiParam,
    /// Collecting CSI intermediate bytes
    CsiIntermediate,
    /// CSI sequence is invalid, consume until final byte
    CsiIgnore,
    /// After ESC ]
    OscString,
    /// After ESC P
    DcsEntry,
    /// Collecting DCS parameters
    DcsParam,
    /// DCS payload
    DcsPassthrough,
    /// After ESC _
    ApcString,
    /// After ESC ^
    PmString,
    /// After ESC X
    SosString,
}

impl ParserState {
    fn is_string(self) -> bool {
        matches!(
            self,
            ParserState::OscString
                | ParserState::DcsPassthrough
                | ParserState::ApcString
                | ParserState::PmString
                | ParserState::SosString
        )
    }
}

/// The terminal parser
#[derive(Debug, Clone)]
pub struct Parser {
    state: ParserState,
    utf8: Utf8Decoder,
    /// CSI parameter bytes
    params_buf: Vec<u8>,
    /// CSI intermediate bytes
    intermediates: Vec<u8>,
    /// CSI marker byte (b'?', b'>', b'<', b'=', or 0 for none)
    marker: u8,
    /// OSC/DCS/APC/PM/SOS payload
    string_data: Vec<u8>,
    /// DCS parameter bytes
    dcs_params: Vec<u8>,
    /// ESC intermediate bytes
    esc_intermediates: Vec<u8>,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Ground,
            utf8: Utf8Decoder::new(),
            params_buf: Vec::with_capacity(64),
            intermediates: Vec::with_capacity(MAX_INTERMEDIATES),
            marker: 0,
            string_data: Vec::with_capacity(256),
            dcs_params: Vec::with_capacity(64),
            esc_intermediates: Vec::with_capacity(MAX_INTERMEDIATES),
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Reset parser to ground state, dropping any partial sequence
    pub fn reset(&mut self) {
        self.state = ParserState::Ground;
        self.utf8.reset();
        self.params_buf.clear();
        self.intermediates.clear();
        self.marker = 0;
        self.string_data.clear();
        self.dcs_params.clear();
        self.esc_intermediates.clear();
    }

    /// Parse a chunk of bytes, calling the callback for each action
    pub fn parse<F>(&mut self, data: &[u8], mut callback: F)
    where
        F: FnMut(Action),
    {
        for &byte in data {
            self.advance(byte, &mut callback);
        }
    }

    /// Parse a chunk and collect actions into a vector
    pub fn parse_collect(&mut self, data: &[u8]) -> Vec<Action> {
        let mut actions = Vec::new();
        self.parse(data, |action| actions.push(action));
        actions
    }

    fn advance<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        if self.state.is_string() {
            self.advance_string(byte, callback);
            return;
        }

        // A truncated UTF-8 sequence interrupted by anything but a
        // continuation byte decodes to a single replacement character
        if self.utf8.is_pending() && byte & 0b1100_0000 != 0b1000_0000 {
            self.utf8.reset();
            callback(Action::Print(REPLACEMENT_CHAR));
        }

        if byte < 0x20 {
            match byte {
                0x1B => self.enter_escape(),
                // CAN, SUB - cancel current sequence
                0x18 | 0x1A => self.state = ParserState::Ground,
                // BEL, BS, HT, LF, VT, FF, CR
                0x07..=0x0D => callback(Action::Control(byte)),
                _ => {}
            }
            return;
        }

        match self.state {
            ParserState::Ground => self.handle_ground(byte, callback),
            ParserState::Escape => self.handle_escape(byte, callback),
            ParserState::EscapeIntermediate => self.handle_escape_intermediate(byte, callback),
            ParserState::CsiEntry => self.handle_csi_entry(byte, callback),
            ParserState::CsiParam => self.handle_csi_param(byte, callback),
            ParserState::CsiIntermediate => self.handle_csi_intermediate(byte, callback),
            ParserState::CsiIgnore => self.handle_csi_ignore(byte),
            ParserState::DcsEntry | ParserState::DcsParam => self.handle_dcs_param(byte),
            ParserState::OscString
            | ParserState::DcsPassthrough
            | ParserState::ApcString
            | ParserState::PmString
            | ParserState::SosString => {}
        }
    }

    /// Inside a string only ESC, BEL (for OSC), CAN and SUB are special
    fn advance_string<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            // Possibly ST (ESC \); the next byte is handled in Escape state
            0x1B => {
                self.finish_string(callback);
                self.enter_escape();
            }
            0x07 if self.state == ParserState::OscString => {
                self.finish_string(callback);
                self.state = ParserState::Ground;
            }
            0x18 | 0x1A => {
                self.string_data.clear();
                self.state = ParserState::Ground;
            }
            _ => {
                if self.string_data.len() < MAX_STRING_LEN {
                    self.string_data.push(byte);
                }
            }
        }
    }

    fn handle_ground<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match self.utf8.feed(byte) {
            Utf8Result::Char('\x7f') | Utf8Result::Pending => {}
            Utf8Result::Char(c) => callback(Action::Print(c)),
            Utf8Result::Invalid => callback(Action::Print(REPLACEMENT_CHAR)),
        }
    }

    fn enter_escape(&mut self) {
        self.state = ParserState::Escape;
        self.esc_intermediates.clear();
    }

    fn handle_escape<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        let action = match byte {
            b'[' => return self.enter_csi(),
            b']' => return self.enter_string(ParserState::OscString),
            b'P' => {
                self.dcs_params.clear();
                return self.enter_string(ParserState::DcsEntry);
            }
            b'_' => return self.enter_string(ParserState::ApcString),
            b'^' => return self.enter_string(ParserState::PmString),
            b'X' => return self.enter_string(ParserState::SosString),
            0x20..=0x2F => {
                self.esc_intermediates.push(byte);
                self.state = ParserState::EscapeIntermediate;
                return;
            }
            // ST outside a string
            b'\\' => None,
            b'7' => Some(EscAction::SaveCursor),
            b'8' => Some(EscAction::RestoreCursor),
            b'D' => Some(EscAction::Index),
            b'M' => Some(EscAction::ReverseIndex),
            b'E' => Some(EscAction::NextLine),
            b'H' => Some(EscAction::HorizontalTabSet),
            b'c' => Some(EscAction::FullReset),
            b'=' => Some(EscAction::ApplicationKeypad),
            b'>' => Some(EscAction::NormalKeypad),
            0x30..=0x7E => Some(EscAction::Unknown(vec![byte])),
            _ => None,
        };

        if let Some(action) = action {
            callback(Action::Esc(action));
        }
        self.state = ParserState::Ground;
    }

    fn handle_escape_intermediate<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            0x20..=0x2F => {
                if self.esc_intermediates.len() < MAX_INTERMEDIATES {
                    self.esc_intermediates.push(byte);
                }
            }
            0x30..=0x7E => {
                let action = match (self.esc_intermediates.as_slice(), byte) {
                    ([b'('], c) => EscAction::DesignateG0(char::from(c)),
                    ([b')'], c) => EscAction::DesignateG1(char::from(c)),
                    ([b'#'], b'8') => EscAction::DecAlignmentTest,
                    (intermediates, c) => {
                        let mut data = intermediates.to_vec();
                        data.push(c);
                        EscAction::Unknown(data)
                    }
                };
                callback(Action::Esc(action));
                self.state = ParserState::Ground;
            }
            _ => self.state = ParserState::Ground,
        }
    }

    fn enter_csi(&mut self) {
        self.state = ParserState::CsiEntry;
        self.params_buf.clear();
        self.intermediates.clear();
        self.marker = 0;
    }

    fn handle_csi_entry<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            b'?' | b'>' | b'<' | b'=' => {
                self.marker = byte;
                self.state = ParserState::CsiParam;
            }
            _ => self.handle_csi_param(byte, callback),
        }
    }

    fn handle_csi_param<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            b'0'..=b'9' | b';' | b':' => {
                self.params_buf.push(byte);
                self.state = ParserState::CsiParam;
            }
            0x20..=0x2F => {
                self.intermediates.push(byte);
                self.state = ParserState::CsiIntermediate;
            }
            0x40..=0x7E => self.dispatch_csi(byte, callback),
            // Marker in the wrong position, DEL, or 8-bit data
            _ => self.state = ParserState::CsiIgnore,
        }
    }

    fn handle_csi_intermediate<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            0x20..=0x2F if self.intermediates.len() < MAX_INTERMEDIATES => {
                self.intermediates.push(byte);
            }
            0x40..=0x7E => self.dispatch_csi(byte, callback),
            _ => self.state = ParserState::CsiIgnore,
        }
    }

    fn handle_csi_ignore(&mut self, byte: u8) {
        if (0x40..=0x7E).contains(&byte) {
            self.state = ParserState::Ground;
        }
    }

    fn dispatch_csi<F>(&mut self, final_byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        callback(Action::Csi(CsiAction {
            params: Params::parse(&self.params_buf),
            intermediates: self.intermediates.clone(),
            final_byte,
            marker: self.marker,
        }));
        self.state = ParserState::Ground;
    }

    fn enter_string(&mut self, state: ParserState) {
        self.state = state;
        self.string_data.clear();
    }

    /// DCS parameters and intermediates run until the final byte, which
    /// starts the payload
    fn handle_dcs_param(&mut self, byte: u8) {
        match byte {
            b'0'..=b'9' | b';' | b':' => self.dcs_params.push(byte),
            0x20..=0x3F => {}
            0x40..=0x7E => self.state = ParserState::DcsPassthrough,
            _ => {}
        }
        if self.state == ParserState::DcsEntry {
            self.state = ParserState::DcsParam;
        }
    }

    fn finish_string<F>(&mut self, callback: &mut F)
    where
        F: FnMut(Action),
    {
        let data = std::mem::take(&mut self.string_data);
        match self.state {
            ParserState::OscString => callback(Action::Osc(parse_osc(&data))),
            ParserState::DcsPassthrough => callback(Action::Dcs {
                params: Params::parse(&self.dcs_params),
                data,
            }),
            ParserState::ApcString => callback(Action::Apc(data)),
            ParserState::PmString => callback(Action::Pm(data)),
            ParserState::SosString => callback(Action::Sos(data)),
            _ => {}
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_osc(data: &[u8]) -> OscAction {
    let data = String::from_utf8_lossy(data);
    let (command, payload) = match data.split_once(';') {
        Some((command, payload)) => (command, payload),
        None => (data.as_ref(), ""),
    };
    let command = command.parse::<u16>().unwrap_or(0);
    let payload = payload.to_string();

    match command {
        0 => OscAction::SetIconAndTitle(payload),
        2 => OscAction::SetTitle(payload),
        _ => OscAction::Other {
            command,
            data: payload,
        },
    }
}
