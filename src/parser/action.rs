//! Terminal actions produced by the parser
//!
//! These represent the semantic meaning of parsed escape sequences.

use super::params::Params;

/// Actions produced by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print a character to the screen
    Print(char),

    /// Execute a C0 control character
    /// BEL (0x07), BS (0x08), HT (0x09), LF (0x0A), VT (0x0B), FF (0x0C), CR (0x0D)
    Control(u8),

    /// ESC sequence (non-CSI)
    Esc(EscAction),

    /// CSI (Control Sequence Introducer) sequence
    Csi(CsiAction),

    /// OSC (Operating System Command) sequence
    Osc(OscAction),

    /// DCS (Device Control String) - consumed and ignored
    Dcs { params: Params, data: Vec<u8> },

    /// APC, PM and SOS strings - consumed and ignored
    Apc(Vec<u8>),
    Pm(Vec<u8>),
    Sos(Vec<u8>),
}

/// ESC sequence actions (non-CSI)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscAction {
    /// ESC 7 - Save cursor (DECSC)
    SaveCursor,
    /// ESC 8 - Restore cursor (DECRC)
    RestoreCursor,
    /// ESC D - Index (IND)
    Index,
    /// ESC M - Reverse Index (RI)
    ReverseIndex,
    /// ESC E - Next Line (NEL)
    NextLine,
    /// ESC H - Horizontal Tab Set (HTS)
    HorizontalTabSet,
    /// ESC c - Full Reset (RIS)
    FullReset,
    /// ESC = - Application Keypad Mode (DECKPAM)
    ApplicationKeypad,
    /// ESC > - Normal Keypad Mode (DECKPNM)
    NormalKeypad,
    /// ESC ( C / ESC ) C - Designate G0 / G1 character set
    DesignateG0(char),
    DesignateG1(char),
    /// ESC # 8 - DEC Screen Alignment Test (DECALN)
    DecAlignmentTest,
    /// Unknown ESC sequence: intermediates followed by the final byte
    Unknown(Vec<u8>),
}

/// CSI sequence actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsiAction {
    /// Parameters (semicolon-separated numbers)
    pub params: Params,
    /// Intermediate bytes (0x20-0x2F)
    pub intermediates: Vec<u8>,
    /// Final byte (0x40-0x7E)
    pub final_byte: u8,
    /// Marker byte right after CSI: b'?', b'>', b'<', b'=', or 0 for none
    pub marker: u8,
}

impl CsiAction {
    /// Get a parameter, substituting `default` when absent or 0
    pub fn param(&self, index: usize, default: u16) -> u16 {
        self.params.get_or(index, default)
    }

    /// Plain sequence: no marker, no intermediates
    pub fn is(&self, final_byte: u8) -> bool {
        self.final_byte == final_byte && self.intermediates.is_empty() && self.marker == 0
    }

    /// DEC private sequence (`CSI ? ...`)
    pub fn is_private(&self, final_byte: u8) -> bool {
        self.final_byte == final_byte && self.intermediates.is_empty() && self.marker == b'?'
    }
}

/// OSC sequence actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OscAction {
    /// OSC 0 - Set icon name and window title
    SetIconAndTitle(String),
    /// OSC 2 - Set window title
    SetTitle(String),
    /// Any other command, with the payload after the first `;`
    Other { command: u16, data: String },
}
