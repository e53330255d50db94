//! Terminal state dump
//!
//! Produces a control-sequence script that, written to a freshly reset
//! client terminal, reproduces the emulator's screen, cursor, input modes
//! and keyboard protocol level. This is what a reconnecting client is sent
//! before live output resumes.
//!
//! The script is built from four reads on a [`StateSource`], so any
//! emulator that can render its screen and report its cursor, modes and
//! keyboard flags can be dumped.

use crate::core::{CursorShape, Mode, ModeSetting, RESTORABLE_MODES};

/// Cursor details needed to restore the client cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorState {
    /// Row (0-indexed)
    pub row: usize,
    /// Column (0-indexed)
    pub col: usize,
    pub hidden: bool,
    pub shape: CursorShape,
    /// Steady (non-blinking)
    pub steady: bool,
}

/// Read access to the emulator state a dump is built from
pub trait StateSource {
    /// Styled text of the visible screen, rows separated by `\n`
    fn render(&self) -> String;

    fn cursor_state(&self) -> CursorState;

    /// Current setting of `mode`
    fn mode_setting(&self, mode: Mode) -> ModeSetting;

    /// Effective kitty keyboard flags; 0 when nothing was pushed
    fn keyboard_flags(&self) -> u16;
}

/// Build the restore script for `source`.
///
/// In order: reset the pen, clear the screen and home the cursor; the
/// rendered screen with line feeds turned into CR LF; the cursor position;
/// cursor visibility and shape; every restorable mode that differs from its
/// default; the kitty keyboard flags. Only the effective keyboard flags are
/// pushed, not the whole stack.
pub fn state_dump<S: StateSource + ?Sized>(source: &S) -> String {
    let mut out = String::from("\x1b[0m\x1b[2J\x1b[H");

    // Replay has no output post-processing to turn LF into CR LF
    out.push_str(&source.render().replace('\n', "\r\n"));

    let cursor = source.cursor_state();
    out.push_str(&format!("\x1b[{};{}H", cursor.row + 1, cursor.col + 1));
    if cursor.hidden {
        out.push_str("\x1b[?25l");
    }
    if let Some(n) = cursor.shape.decscusr(cursor.steady) {
        out.push_str(&format!("\x1b[{n} q"));
    }

    for &(mode, default) in RESTORABLE_MODES {
        let current = source.mode_setting(mode);
        if current.is_unknown() || current == default {
            continue;
        }
        if let Some(sequence) = mode.sequence(current) {
            out.push_str(&sequence);
        }
    }

    let flags = source.keyboard_flags();
    if flags > 0 {
        out.push_str(&format!("\x1b[>{flags}u"));
    }

    tracing::debug!(bytes = out.len(), "built terminal state dump");
    out
}
