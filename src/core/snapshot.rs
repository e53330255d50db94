//! Deterministic snapshots
//!
//! A snapshot is a serializable copy of what a client would see: the
//! visible lines, the cursor, restorable modes and keyboard flags. The
//! same byte stream always yields the same snapshot, which is what the
//! golden tests and the `--json` output of the dump runner rely on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::cursor::CursorShape;
use super::keyboard::KeyboardStack;
use super::line::Line;
use super::modes::{ModeSetting, Modes, RESTORABLE_MODES};
use super::screen::Screen;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub cols: usize,
    pub rows: usize,
    /// Visible lines of the active buffer, top to bottom
    pub lines: Vec<Line>,
    pub cursor: CursorSnapshot,
    /// Restorable modes that were set or reset, keyed by their sequence
    /// text (`?2004`)
    pub modes: BTreeMap<String, ModeSetting>,
    pub keyboard_flags: u16,
    pub alternate_screen: bool,
    pub scrollback_lines: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorSnapshot {
    pub col: usize,
    pub row: usize,
    pub visible: bool,
    pub shape: CursorShape,
    pub steady: bool,
}

impl Snapshot {
    /// Capture a screen together with the mode and keyboard state that
    /// accompanies it
    pub fn capture(screen: &Screen, modes: &Modes, keyboard: &KeyboardStack) -> Self {
        let cursor = screen.cursor();
        let modes = RESTORABLE_MODES
            .iter()
            .map(|&(mode, _)| (mode, modes.get(mode)))
            .filter(|(_, setting)| !setting.is_unknown())
            .map(|(mode, setting)| (mode.to_string(), setting))
            .collect();

        Snapshot {
            cols: screen.cols(),
            rows: screen.rows(),
            lines: screen.lines().to_vec(),
            cursor: CursorSnapshot {
                col: cursor.col,
                row: cursor.row,
                visible: cursor.visible,
                shape: cursor.shape,
                steady: cursor.steady,
            },
            modes,
            keyboard_flags: keyboard.flags(),
            alternate_screen: screen.is_alternate(),
            scrollback_lines: screen.scrollback().len(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// One line of text per row, newline terminated. Trailing blanks and
    /// trailing empty rows are dropped.
    pub fn to_text(&self) -> String {
        let mut text: String = self
            .lines
            .iter()
            .map(|line| line.text() + "\n")
            .collect();
        while text.ends_with("\n\n") {
            text.pop();
        }
        text
    }

    /// Compare visible content only
    pub fn content_equals(&self, other: &Snapshot) -> bool {
        self.cols == other.cols && self.rows == other.rows && self.lines == other.lines
    }
}
