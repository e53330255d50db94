//! Terminal mode settings
//!
//! Every mode the terminal has been told about is recorded with its last
//! setting. Modes that were never touched read as [`ModeSetting::Unknown`],
//! which lets a state dump tell "explicitly reset" apart from "never seen".

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A mode identifier: ANSI modes (`CSI n h`) and DEC private modes
/// (`CSI ? n h`) live in separate number spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mode {
    Ansi(u16),
    Dec(u16),
}

impl Mode {
    /// IRM - insert/replace
    pub const INSERT: Mode = Mode::Ansi(4);
    /// LNM - line feed / new line
    pub const LINEFEED: Mode = Mode::Ansi(20);

    /// DECCKM - application cursor keys
    pub const CURSOR_KEYS: Mode = Mode::Dec(1);
    /// DECOM - origin mode
    pub const ORIGIN: Mode = Mode::Dec(6);
    /// DECAWM - autowrap
    pub const AUTOWRAP: Mode = Mode::Dec(7);
    /// X10 mouse reporting
    pub const MOUSE_X10: Mode = Mode::Dec(9);
    /// Cursor blinking (att610)
    pub const CURSOR_BLINK: Mode = Mode::Dec(12);
    /// DECTCEM - cursor visible
    pub const CURSOR_VISIBLE: Mode = Mode::Dec(25);
    /// DECNKM - application (numeric) keypad
    pub const NUMERIC_KEYPAD: Mode = Mode::Dec(66);
    /// VT200 normal mouse tracking
    pub const MOUSE_NORMAL: Mode = Mode::Dec(1000);
    /// VT200 highlight mouse tracking
    pub const MOUSE_HIGHLIGHT: Mode = Mode::Dec(1001);
    /// Button-event mouse tracking
    pub const MOUSE_BUTTON_EVENT: Mode = Mode::Dec(1002);
    /// Any-event mouse tracking
    pub const MOUSE_ANY_EVENT: Mode = Mode::Dec(1003);
    /// Focus in/out reporting
    pub const FOCUS_EVENT: Mode = Mode::Dec(1004);
    /// SGR extended mouse coordinates
    pub const MOUSE_EXT_SGR: Mode = Mode::Dec(1006);
    /// Bracketed paste
    pub const BRACKETED_PASTE: Mode = Mode::Dec(2004);

    /// Control sequence that puts this mode into `setting`.
    ///
    /// Returns `None` for [`ModeSetting::Unknown`], which has no wire form.
    pub fn sequence(self, setting: ModeSetting) -> Option<String> {
        let suffix = match setting {
            ModeSetting::Set => 'h',
            ModeSetting::Reset => 'l',
            ModeSetting::Unknown => return None,
        };
        Some(match self {
            Mode::Ansi(n) => format!("\x1b[{n}{suffix}"),
            Mode::Dec(n) => format!("\x1b[?{n}{suffix}"),
        })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Ansi(n) => write!(f, "{n}"),
            Mode::Dec(n) => write!(f, "?{n}"),
        }
    }
}

/// Current setting of a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModeSetting {
    /// Never set or reset since the terminal was created or fully reset
    #[default]
    Unknown,
    Set,
    Reset,
}

impl ModeSetting {
    pub fn is_set(self) -> bool {
        self == ModeSetting::Set
    }

    pub fn is_unknown(self) -> bool {
        self == ModeSetting::Unknown
    }
}

impl From<bool> for ModeSetting {
    fn from(enable: bool) -> Self {
        if enable {
            ModeSetting::Set
        } else {
            ModeSetting::Reset
        }
    }
}

/// Modes a reconnecting client terminal must mirror, with their defaults.
///
/// These change how the client encodes input or reports events. Origin
/// mode, margins, cursor visibility and the alternate screen are left out:
/// they are either internal to the emulator or restored another way.
pub const RESTORABLE_MODES: &[(Mode, ModeSetting)] = &[
    (Mode::CURSOR_KEYS, ModeSetting::Reset),
    (Mode::NUMERIC_KEYPAD, ModeSetting::Reset),
    (Mode::MOUSE_X10, ModeSetting::Reset),
    (Mode::MOUSE_NORMAL, ModeSetting::Reset),
    (Mode::MOUSE_HIGHLIGHT, ModeSetting::Reset),
    (Mode::MOUSE_BUTTON_EVENT, ModeSetting::Reset),
    (Mode::MOUSE_ANY_EVENT, ModeSetting::Reset),
    (Mode::MOUSE_EXT_SGR, ModeSetting::Reset),
    (Mode::FOCUS_EVENT, ModeSetting::Reset),
    (Mode::BRACKETED_PASTE, ModeSetting::Reset),
];

/// Recorded mode settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modes {
    settings: BTreeMap<Mode, ModeSetting>,
}

impl Modes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current setting of `mode`; `Unknown` if it was never touched
    pub fn get(&self, mode: Mode) -> ModeSetting {
        self.settings.get(&mode).copied().unwrap_or_default()
    }

    pub fn is_set(&self, mode: Mode) -> bool {
        self.get(mode).is_set()
    }

    /// Record a setting. Recording `Unknown` forgets the mode.
    pub fn set(&mut self, mode: Mode, setting: ModeSetting) {
        if setting.is_unknown() {
            self.settings.remove(&mode);
        } else {
            self.settings.insert(mode, setting);
        }
    }

    /// Forget every recorded mode
    pub fn clear(&mut self) {
        self.settings.clear();
    }

    /// Iterate over recorded modes in identifier order
    pub fn iter(&self) -> impl Iterator<Item = (Mode, ModeSetting)> + '_ {
        self.settings.iter().map(|(&mode, &setting)| (mode, setting))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_mode_is_unknown() {
        let modes = Modes::new();
        assert_eq!(modes.get(Mode::BRACKETED_PASTE), ModeSetting::Unknown);
        assert!(!modes.is_set(Mode::BRACKETED_PASTE));
    }

    #[test]
    fn test_set_and_reset() {
        let mut modes = Modes::new();
        modes.set(Mode::BRACKETED_PASTE, ModeSetting::Set);
        assert!(modes.is_set(Mode::BRACKETED_PASTE));

        modes.set(Mode::BRACKETED_PASTE, ModeSetting::Reset);
        assert_eq!(modes.get(Mode::BRACKETED_PASTE), ModeSetting::Reset);

        modes.set(Mode::BRACKETED_PASTE, ModeSetting::Unknown);
        assert_eq!(modes.get(Mode::BRACKETED_PASTE), ModeSetting::Unknown);
        assert_eq!(modes.iter().count(), 0);
    }

    #[test]
    fn test_ansi_and_dec_are_distinct() {
        let mut modes = Modes::new();
        modes.set(Mode::Dec(4), ModeSetting::Set);
        assert_eq!(modes.get(Mode::Ansi(4)), ModeSetting::Unknown);
    }

    #[test]
    fn test_mode_sequences() {
        assert_eq!(
            Mode::BRACKETED_PASTE.sequence(ModeSetting::Set).as_deref(),
            Some("\x1b[?2004h")
        );
        assert_eq!(
            Mode::CURSOR_KEYS.sequence(ModeSetting::Reset).as_deref(),
            Some("\x1b[?1l")
        );
        assert_eq!(Mode::INSERT.sequence(ModeSetting::Set).as_deref(), Some("\x1b[4h"));
        assert_eq!(Mode::INSERT.sequence(ModeSetting::Unknown), None);
    }

    #[test]
    fn test_restorable_defaults_are_reset() {
        assert!(RESTORABLE_MODES
            .iter()
            .all(|&(_, default)| default == ModeSetting::Reset));
        assert!(!RESTORABLE_MODES
            .iter()
            .any(|&(mode, _)| mode == Mode::ORIGIN || mode == Mode::Dec(1049)));
    }
}
