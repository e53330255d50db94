//! Terminal Executor
//!
//! Ties together the parser and the screen model, applying parsed actions
//! to update the terminal state. Besides the screen it tracks every mode
//! setting it has been sent and the kitty keyboard stack, which is what
//! the state dump needs to bring a reconnecting client up to date.

use crate::config::Config;
use crate::core::{
    Color, CursorShape, KeyboardSetMode, KeyboardStack, Mode, ModeSetting, Modes, Screen,
    Scrollback, Snapshot,
};
use crate::dump::{self, CursorState, StateSource};
use crate::parser::{Action, CsiAction, EscAction, OscAction, Params, Parser};
use crate::render;

/// Terminal executor that processes parsed actions and updates the screen
#[derive(Debug, Clone)]
pub struct Terminal {
    screen: Screen,
    parser: Parser,
    /// Every mode set or reset since creation or the last full reset
    modes: Modes,
    keyboard: KeyboardStack,
    /// Replies to queries, waiting to be written back to the host
    responses: Vec<u8>,
    /// Last printed character, for REP
    last_char: Option<char>,
}

impl Terminal {
    /// Create a new terminal with the given dimensions
    pub fn new(cols: usize, rows: usize, scrollback_capacity: usize) -> Self {
        Self {
            screen: Screen::new(cols, rows, scrollback_capacity),
            parser: Parser::new(),
            modes: Modes::new(),
            keyboard: KeyboardStack::new(),
            responses: Vec::new(),
            last_char: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cols, config.rows, config.scrollback_lines)
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn scrollback(&self) -> &Scrollback {
        self.screen.scrollback()
    }

    pub fn modes(&self) -> &Modes {
        &self.modes
    }

    pub fn keyboard(&self) -> &KeyboardStack {
        &self.keyboard
    }

    /// Drain replies generated by status and keyboard queries
    pub fn take_responses(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.responses)
    }

    /// Control-sequence script restoring this terminal's state on a
    /// freshly reset client
    pub fn state_dump(&self) -> String {
        dump::state_dump(self)
    }

    /// Serializable copy of the visible state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.screen, &self.modes, &self.keyboard)
    }

    /// Process output bytes from the host
    pub fn process(&mut self, data: &[u8]) {
        for action in self.parser.parse_collect(data) {
            self.apply_action(action);
        }
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.screen.resize(cols, rows);
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::Print(c) => {
                self.screen.print_char(c);
                self.last_char = Some(c);
            }
            Action::Control(byte) => self.execute_c0(byte),
            Action::Csi(csi) => self.execute_csi(&csi),
            Action::Esc(esc) => self.execute_esc(esc),
            Action::Osc(osc) => self.execute_osc(osc),
            Action::Dcs { data, .. } => {
                tracing::debug!(len = data.len(), "DCS string ignored");
            }
            Action::Apc(_) | Action::Pm(_) | Action::Sos(_) => {}
        }
    }

    fn execute_c0(&mut self, byte: u8) {
        match byte {
            0x07 => tracing::trace!("bell"),
            0x08 => self.screen.backspace(),
            0x09 => self.screen.tab(),
            // LF, VT, FF
            0x0A..=0x0C => self.screen.linefeed(),
            0x0D => self.screen.carriage_return(),
            _ => {}
        }
    }

    fn execute_csi(&mut self, csi: &CsiAction) {
        match (csi.marker, csi.intermediates.as_slice(), csi.final_byte) {
            (0, [], _) => self.execute_csi_plain(csi),
            (b'?', [], b'h') => self.set_dec_modes(&csi.params, true),
            (b'?', [], b'l') => self.set_dec_modes(&csi.params, false),
            (b'?', [], b'u') => {
                let reply = format!("\x1b[?{}u", self.keyboard.flags());
                self.respond(&reply);
            }
            (b'>', [], b'u') => self.keyboard.push(csi.params.raw(0)),
            (b'<', [], b'u') => self.keyboard.pop(usize::from(csi.param(0, 1))),
            (b'=', [], b'u') => {
                let flags = csi.params.raw(0);
                match KeyboardSetMode::from_param(csi.param(1, 1)) {
                    Some(mode) => self.keyboard.set(flags, mode),
                    None => tracing::debug!(mode = csi.params.raw(1), "bad keyboard set mode"),
                }
            }
            (0, [b' '], b'q') => self.set_cursor_style(csi.params.raw(0)),
            (0, [b'!'], b'p') => self.soft_reset(),
            _ => tracing::debug!(
                marker = %char::from(csi.marker),
                intermediates = ?csi.intermediates,
                final_byte = %char::from(csi.final_byte),
                "unhandled CSI"
            ),
        }
    }

    /// CSI sequences without marker or intermediates
    fn execute_csi_plain(&mut self, csi: &CsiAction) {
        let n = usize::from(csi.param(0, 1));

        match csi.final_byte {
            // Cursor movement
            b'A' => self.screen.move_cursor_up(n),
            // CUD, VPR
            b'B' | b'e' => self.screen.move_cursor_down(n),
            // CUF, HPR
            b'C' | b'a' => self.screen.move_cursor_forward(n),
            b'D' => self.screen.move_cursor_backward(n),
            b'E' => {
                self.screen.move_cursor_down(n);
                self.screen.carriage_return();
            }
            b'F' => {
                self.screen.move_cursor_up(n);
                self.screen.carriage_return();
            }
            // CHA, HPA
            b'G' | b'`' => self.screen.move_cursor_to_col(n - 1),
            // CUP, HVP
            b'H' | b'f' => {
                let col = usize::from(csi.param(1, 1));
                self.screen.move_cursor_to(n - 1, col - 1);
            }
            b'd' => self.screen.move_cursor_to_row(n - 1),
            b'I' => {
                for _ in 0..n {
                    self.screen.tab();
                }
            }
            b'Z' => self.screen.back_tab(n),

            // Erase
            b'J' => self.screen.erase_in_display(csi.params.raw(0)),
            b'K' => self.screen.erase_in_line(csi.params.raw(0)),
            b'X' => self.screen.erase_chars(n),

            // Insert/Delete
            b'L' => self.screen.insert_lines(n),
            b'M' => self.screen.delete_lines(n),
            b'@' => self.screen.insert_chars(n),
            b'P' => self.screen.delete_chars(n),

            // Scroll
            b'S' => self.screen.scroll_up(n),
            b'T' => self.screen.scroll_down(n),
            b'r' => {
                let rows = u16::try_from(self.screen.rows()).unwrap_or(u16::MAX);
                let top = usize::from(csi.param(0, 1)) - 1;
                let bottom = usize::from(csi.param(1, rows)) - 1;
                self.screen.set_scroll_region(top, bottom);
            }

            b'm' => self.execute_sgr(&csi.params),

            // REP
            b'b' => {
                if let Some(c) = self.last_char {
                    for _ in 0..n {
                        self.screen.print_char(c);
                    }
                }
            }

            // TBC
            b'g' => match csi.params.raw(0) {
                0 => self.screen.clear_tab_stop(),
                3 => self.screen.clear_all_tab_stops(),
                _ => {}
            },

            // SCOSC / SCORC
            b's' if csi.params.is_empty() => self.screen.save_cursor(),
            b'u' if csi.params.is_empty() => self.screen.restore_cursor(),

            b'h' => self.set_ansi_modes(&csi.params, true),
            b'l' => self.set_ansi_modes(&csi.params, false),

            // DSR
            b'n' => match csi.params.raw(0) {
                5 => self.respond("\x1b[0n"),
                6 => {
                    let cursor = self.screen.cursor();
                    let top = if cursor.origin_mode {
                        self.screen.scroll_top()
                    } else {
                        0
                    };
                    // DECRC can leave the cursor above a later top margin
                    let row = cursor.row.saturating_sub(top);
                    let reply = format!("\x1b[{};{}R", row + 1, cursor.col + 1);
                    self.respond(&reply);
                }
                other => tracing::debug!(request = other, "unhandled DSR"),
            },

            // DA1: VT220 with ANSI color
            b'c' if csi.params.raw(0) == 0 => self.respond("\x1b[?62;22c"),

            _ => tracing::debug!(
                params = ?csi.params,
                final_byte = %char::from(csi.final_byte),
                "unhandled CSI"
            ),
        }
    }

    fn set_dec_modes(&mut self, params: &Params, enable: bool) {
        for mode in params.iter().filter(|&mode| mode != 0) {
            self.set_dec_mode(mode, enable);
        }
    }

    /// Record a DEC private mode and apply the ones that affect the screen
    fn set_dec_mode(&mut self, mode: u16, enable: bool) {
        self.modes.set(Mode::Dec(mode), ModeSetting::from(enable));

        match mode {
            // DECOM
            6 => {
                self.screen.cursor_mut().origin_mode = enable;
                self.screen.move_cursor_to(0, 0);
            }
            // DECAWM
            7 => {
                let cursor = self.screen.cursor_mut();
                cursor.autowrap = enable;
                if !enable {
                    cursor.pending_wrap = false;
                }
            }
            // DECTCEM
            25 => self.screen.cursor_mut().visible = enable,
            47 | 1047 => {
                if enable {
                    self.screen.enter_alternate_screen();
                } else {
                    self.screen.exit_alternate_screen();
                }
            }
            1048 => {
                if enable {
                    self.screen.save_cursor();
                } else {
                    self.screen.restore_cursor();
                }
            }
            1049 => {
                if enable {
                    self.screen.save_cursor();
                    self.screen.enter_alternate_screen();
                } else {
                    self.screen.exit_alternate_screen();
                    self.screen.restore_cursor();
                }
            }
            // Recorded only
            1 | 5 | 9 | 12 | 66 | 1000..=1006 | 1015 | 2004 => {}
            _ => tracing::debug!(mode, enable, "unhandled DEC private mode"),
        }
    }

    fn set_ansi_modes(&mut self, params: &Params, enable: bool) {
        for mode in params.iter().filter(|&mode| mode != 0) {
            self.modes.set(Mode::Ansi(mode), ModeSetting::from(enable));
            match mode {
                // IRM
                4 => self.screen.cursor_mut().insert_mode = enable,
                // LNM
                20 => self.screen.linefeed_mode = enable,
                _ => tracing::debug!(mode, enable, "unhandled ANSI mode"),
            }
        }
    }

    /// DECSCUSR
    fn set_cursor_style(&mut self, n: u16) {
        match CursorShape::from_decscusr(n) {
            Some((shape, steady)) => {
                let cursor = self.screen.cursor_mut();
                cursor.shape = shape;
                cursor.steady = steady;
            }
            None => tracing::debug!(style = n, "unknown cursor style"),
        }
    }

    /// Execute SGR (Select Graphic Rendition)
    fn execute_sgr(&mut self, params: &Params) {
        if params.is_empty() {
            self.screen.cursor_mut().reset_attributes();
            return;
        }

        let mut i = 0;
        while i < params.len() {
            let cursor = self.screen.cursor_mut();
            match params.raw(i) {
                0 => cursor.reset_attributes(),
                1 => cursor.style.bold = true,
                2 => cursor.style.faint = true,
                3 => cursor.style.italic = true,
                // 4:0 turns underline off
                4 => cursor.style.underline = params.subparams(i).first() != Some(&0),
                5 | 6 => cursor.style.blink = true,
                7 => cursor.style.inverse = true,
                8 => cursor.style.hidden = true,
                9 => cursor.style.strikethrough = true,
                // Double underline
                21 => cursor.style.underline = true,
                22 => {
                    cursor.style.bold = false;
                    cursor.style.faint = false;
                }
                23 => cursor.style.italic = false,
                24 => cursor.style.underline = false,
                25 => cursor.style.blink = false,
                27 => cursor.style.inverse = false,
                28 => cursor.style.hidden = false,
                29 => cursor.style.strikethrough = false,
                n @ 30..=37 => cursor.fg = Color::Indexed((n - 30) as u8),
                38 => {
                    let (color, consumed) = extended_color(params, i);
                    if let Some(color) = color {
                        cursor.fg = color;
                    }
                    i += consumed;
                }
                39 => cursor.fg = Color::Default,
                n @ 40..=47 => cursor.bg = Color::Indexed((n - 40) as u8),
                48 => {
                    let (color, consumed) = extended_color(params, i);
                    if let Some(color) = color {
                        cursor.bg = color;
                    }
                    i += consumed;
                }
                49 => cursor.bg = Color::Default,
                n @ 90..=97 => cursor.fg = Color::Indexed((n - 90 + 8) as u8),
                n @ 100..=107 => cursor.bg = Color::Indexed((n - 100 + 8) as u8),
                n => tracing::debug!(attribute = n, "unhandled SGR attribute"),
            }
            i += 1;
        }
    }

    fn execute_esc(&mut self, esc: EscAction) {
        match esc {
            EscAction::SaveCursor => self.screen.save_cursor(),
            EscAction::RestoreCursor => self.screen.restore_cursor(),
            EscAction::Index => self.screen.index(),
            EscAction::ReverseIndex => self.screen.reverse_index(),
            EscAction::NextLine => self.screen.next_line(),
            EscAction::HorizontalTabSet => self.screen.set_tab_stop(),
            EscAction::FullReset => self.full_reset(),
            EscAction::ApplicationKeypad => self.modes.set(Mode::NUMERIC_KEYPAD, ModeSetting::Set),
            EscAction::NormalKeypad => self.modes.set(Mode::NUMERIC_KEYPAD, ModeSetting::Reset),
            EscAction::DecAlignmentTest => self.screen.alignment_test(),
            EscAction::DesignateG0(charset) | EscAction::DesignateG1(charset) => {
                tracing::debug!(%charset, "character set designation ignored");
            }
            EscAction::Unknown(bytes) => tracing::debug!(?bytes, "unhandled ESC sequence"),
        }
    }

    fn execute_osc(&mut self, osc: OscAction) {
        match osc {
            OscAction::SetIconAndTitle(title) | OscAction::SetTitle(title) => {
                tracing::debug!(%title, "title change ignored");
            }
            OscAction::Other { command, .. } => tracing::debug!(command, "unhandled OSC"),
        }
    }

    /// DECSTR: reset pen, margins and input modes, keep the screen contents
    fn soft_reset(&mut self) {
        let cursor = self.screen.cursor_mut();
        cursor.reset_attributes();
        cursor.visible = true;
        cursor.origin_mode = false;
        cursor.autowrap = true;
        cursor.insert_mode = false;
        self.screen.reset_scroll_region();

        for (mode, setting) in [
            (Mode::CURSOR_VISIBLE, ModeSetting::Set),
            (Mode::ORIGIN, ModeSetting::Reset),
            (Mode::AUTOWRAP, ModeSetting::Set),
            (Mode::INSERT, ModeSetting::Reset),
            (Mode::CURSOR_KEYS, ModeSetting::Reset),
            (Mode::NUMERIC_KEYPAD, ModeSetting::Reset),
            (Mode::BRACKETED_PASTE, ModeSetting::Reset),
        ] {
            self.modes.set(mode, setting);
        }

        tracing::debug!("soft reset performed");
    }

    /// RIS: back to the power-on state, history included
    fn full_reset(&mut self) {
        self.screen.reset();
        self.modes.clear();
        self.keyboard.clear();
        self.last_char = None;
        tracing::debug!("full reset performed");
    }

    fn respond(&mut self, reply: &str) {
        self.responses.extend_from_slice(reply.as_bytes());
    }
}

impl StateSource for Terminal {
    fn render(&self) -> String {
        render::render_styled(&self.screen)
    }

    fn cursor_state(&self) -> CursorState {
        let cursor = self.screen.cursor();
        CursorState {
            row: cursor.row,
            col: cursor.col,
            hidden: !cursor.visible,
            shape: cursor.shape,
            steady: cursor.steady,
        }
    }

    fn mode_setting(&self, mode: Mode) -> ModeSetting {
        self.modes.get(mode)
    }

    fn keyboard_flags(&self) -> u16 {
        self.keyboard.flags()
    }
}

/// Decode the color following SGR 38/48 at `index`.
///
/// Returns the color, if valid, and how many extra semicolon-separated
/// parameters it used. The colon form (`38:2::r:g:b`) uses none.
fn extended_color(params: &Params, index: usize) -> (Option<Color>, usize) {
    let sub = params.subparams(index);
    if !sub.is_empty() {
        let color = match *sub {
            [5, n, ..] => u8::try_from(n).ok().map(Color::Indexed),
            [2, r, g, b] => rgb(r, g, b),
            [2, _, r, g, b, ..] => rgb(r, g, b),
            _ => None,
        };
        return (color, 0);
    }

    match params.raw(index + 1) {
        5 => (u8::try_from(params.raw(index + 2)).ok().map(Color::Indexed), 2),
        2 => (
            rgb(
                params.raw(index + 2),
                params.raw(index + 3),
                params.raw(index + 4),
            ),
            4,
        ),
        _ => (None, 0),
    }
}

fn rgb(r: u16, g: u16, b: u16) -> Option<Color> {
    Some(Color::Rgb(
        u8::try_from(r).ok()?,
        u8::try_from(g).ok()?,
        u8::try_from(b).ok()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(term: &Terminal) -> String {
        term.snapshot().to_text()
    }

    #[test]
    fn test_terminal_print() {
        let mut term = Terminal::new(80, 24, 1000);
        term.process(b"Hello, World!");
        assert_eq!(text(&term), "Hello, World!\n");
    }

    #[test]
    fn test_terminal_cursor_movement() {
        let mut term = Terminal::new(80, 24, 1000);
        term.process(b"\x1b[10;5HX");

        assert_eq!(term.screen().cursor().row, 9);
        assert_eq!(term.screen().cursor().col, 5);

        term.process(b"\x1b[3A\x1b[2D");
        assert_eq!(term.screen().cursor().row, 6);
        assert_eq!(term.screen().cursor().col, 3);

        term.process(b"\x1b[2E");
        assert_eq!(term.screen().cursor().row, 8);
        assert_eq!(term.screen().cursor().col, 0);
    }

    #[test]
    fn test_terminal_colors() {
        let mut term = Terminal::new(80, 24, 1000);
        term.process(b"\x1b[31;44mColored");

        assert_eq!(term.screen().cursor().fg, Color::RED);
        assert_eq!(term.screen().cursor().bg, Color::BLUE);
        assert_eq!(term.screen().cell(0, 0).unwrap().fg, Color::RED);
    }

    #[test]
    fn test_terminal_sgr_reset() {
        let mut term = Terminal::new(80, 24, 1000);
        term.process(b"\x1b[1;31mBold Red\x1b[0mNormal");

        assert_eq!(term.screen().cursor().fg, Color::Default);
        assert!(!term.screen().cursor().style.bold);

        term.process(b"\x1b[1m\x1b[m");
        assert!(!term.screen().cursor().style.bold);
    }

    #[test]
    fn test_terminal_extended_colors() {
        let mut term = Terminal::new(80, 24, 1000);

        term.process(b"\x1b[38;2;255;128;64m");
        assert_eq!(term.screen().cursor().fg, Color::Rgb(255, 128, 64));

        term.process(b"\x1b[48;5;200;1m");
        assert_eq!(term.screen().cursor().bg, Color::Indexed(200));
        assert!(term.screen().cursor().style.bold);

        term.process(b"\x1b[38:2::1:2:3m");
        assert_eq!(term.screen().cursor().fg, Color::Rgb(1, 2, 3));

        term.process(b"\x1b[95;103m");
        assert_eq!(term.screen().cursor().fg, Color::Indexed(13));
        assert_eq!(term.screen().cursor().bg, Color::Indexed(11));

        term.process(b"\x1b[39;49m");
        assert_eq!(term.screen().cursor().fg, Color::Default);
        assert_eq!(term.screen().cursor().bg, Color::Default);
    }

    #[test]
    fn test_terminal_erase() {
        let mut term = Terminal::new(10, 3, 1000);
        term.process(b"XXXXXXXXXX\x1b[1;5H\x1b[K");
        assert_eq!(text(&term), "XXXX\n");
    }

    #[test]
    fn test_terminal_scroll_region() {
        let mut term = Terminal::new(80, 5, 1000);
        term.process(b"\x1b[2;4r");

        assert_eq!(term.screen().scroll_top(), 1);
        assert_eq!(term.screen().scroll_bottom(), 3);

        term.process(b"\x1b[r");
        assert_eq!(term.screen().scroll_bottom(), 4);
    }

    #[test]
    fn test_terminal_partial_region_at_top_keeps_history_clean() {
        let mut term = Terminal::new(10, 5, 100);
        term.process(b"\x1b[1;3rA\r\nB\r\nC\r\nD");

        assert_eq!(text(&term), "B\nC\nD\n");
        assert!(term.scrollback().is_empty());
    }

    #[test]
    fn test_terminal_alternate_screen() {
        let mut term = Terminal::new(80, 24, 1000);

        term.process(b"Primary\x1b[?1049hAlternate");
        assert!(term.screen().is_alternate());
        assert!(text(&term).contains("Alternate"));
        assert!(!text(&term).contains("Primary"));

        term.process(b"\x1b[?1049l");
        assert!(!term.screen().is_alternate());
        assert_eq!(text(&term), "Primary\n");
        assert_eq!(term.screen().cursor().col, 7);
    }

    #[test]
    fn test_terminal_records_modes() {
        let mut term = Terminal::new(80, 24, 1000);
        assert_eq!(term.modes().get(Mode::BRACKETED_PASTE), ModeSetting::Unknown);

        term.process(b"\x1b[?2004h");
        assert_eq!(term.modes().get(Mode::BRACKETED_PASTE), ModeSetting::Set);

        term.process(b"\x1b[?2004l");
        assert_eq!(term.modes().get(Mode::BRACKETED_PASTE), ModeSetting::Reset);

        term.process(b"\x1b[?1;1006h\x1b[4h");
        assert!(term.modes().is_set(Mode::CURSOR_KEYS));
        assert!(term.modes().is_set(Mode::MOUSE_EXT_SGR));
        assert!(term.modes().is_set(Mode::INSERT));
        assert!(term.screen().cursor().insert_mode);
    }

    #[test]
    fn test_terminal_keypad_mode() {
        let mut term = Terminal::new(80, 24, 1000);
        term.process(b"\x1b=");
        assert!(term.modes().is_set(Mode::NUMERIC_KEYPAD));
        term.process(b"\x1b>");
        assert_eq!(term.modes().get(Mode::NUMERIC_KEYPAD), ModeSetting::Reset);
    }

    #[test]
    fn test_terminal_cursor_visibility_and_style() {
        let mut term = Terminal::new(80, 24, 1000);
        term.process(b"\x1b[?25l\x1b[6 q");

        let state = term.cursor_state();
        assert!(state.hidden);
        assert_eq!(state.shape, CursorShape::Bar);
        assert!(state.steady);

        term.process(b"\x1b[9 q");
        assert_eq!(term.cursor_state().shape, CursorShape::Bar);

        term.process(b"\x1b[ q");
        assert_eq!(term.cursor_state().shape, CursorShape::Default);
        assert!(!term.cursor_state().steady);
    }

    #[test]
    fn test_terminal_cursor_blink_mode_is_only_recorded() {
        let mut term = Terminal::new(80, 24, 1000);
        term.process(b"\x1b[2 q\x1b[?12h");
        assert!(term.cursor_state().steady);
        assert!(term.modes().is_set(Mode::CURSOR_BLINK));
    }

    #[test]
    fn test_terminal_kitty_keyboard() {
        let mut term = Terminal::new(80, 24, 1000);
        assert_eq!(term.keyboard_flags(), 0);

        term.process(b"\x1b[>1u\x1b[>3u");
        assert_eq!(term.keyboard_flags(), 3);

        term.process(b"\x1b[<u");
        assert_eq!(term.keyboard_flags(), 1);

        term.process(b"\x1b[=4;2u");
        assert_eq!(term.keyboard_flags(), 5);

        term.process(b"\x1b[?u");
        assert_eq!(term.take_responses(), b"\x1b[?5u");

        term.process(b"\x1b[<5u");
        assert_eq!(term.keyboard_flags(), 0);
        assert!(term.keyboard().is_empty());
    }

    #[test]
    fn test_terminal_kitty_push_without_flags() {
        let mut term = Terminal::new(80, 24, 1000);
        term.process(b"\x1b[>u");
        assert_eq!(term.keyboard().depth(), 1);
        assert_eq!(term.keyboard_flags(), 0);
    }

    #[test]
    fn test_terminal_device_status() {
        let mut term = Terminal::new(80, 24, 1000);
        term.process(b"\x1b[5;10H\x1b[6n\x1b[5n");
        assert_eq!(term.take_responses(), b"\x1b[5;10R\x1b[0n");
        assert!(term.take_responses().is_empty());
    }

    #[test]
    fn test_terminal_device_status_above_origin_top() {
        let mut term = Terminal::new(80, 24, 1000);
        term.process(b"\x1b[?6h\x1b7\x1b[5;10r\x1b8\x1b[6n");
        assert_eq!(term.take_responses(), b"\x1b[1;1R");
    }

    #[test]
    fn test_terminal_soft_reset() {
        let mut term = Terminal::new(80, 24, 1000);
        term.process(b"keep\x1b[?1h\x1b[?25l\x1b[1m\x1b[2;5r\x1b[!p");

        assert_eq!(term.modes().get(Mode::CURSOR_KEYS), ModeSetting::Reset);
        assert!(term.screen().cursor().visible);
        assert!(!term.screen().cursor().style.bold);
        assert_eq!(term.screen().scroll_top(), 0);
        assert_eq!(text(&term), "keep\n");
    }

    #[test]
    fn test_terminal_full_reset() {
        let mut term = Terminal::new(10, 2, 100);
        term.process(b"a\r\nb\r\nc\x1b[?2004h\x1b[>1u\x1b[?25l");
        assert_eq!(term.scrollback().len(), 1);

        term.process(b"\x1bc");

        assert_eq!(term.modes().get(Mode::BRACKETED_PASTE), ModeSetting::Unknown);
        assert_eq!(term.modes().iter().count(), 0);
        assert!(term.keyboard().is_empty());
        assert!(term.scrollback().is_empty());
        assert!(!term.cursor_state().hidden);
        assert_eq!(text(&term), "\n");
    }

    #[test]
    fn test_terminal_scrollback() {
        let mut term = Terminal::new(10, 2, 3);
        for i in 0..6 {
            term.process(format!("L{i}\r\n").as_bytes());
        }

        let history: Vec<String> = term.scrollback().iter().map(|l| l.text()).collect();
        assert_eq!(history, vec!["L2", "L3", "L4"]);
    }

    #[test]
    fn test_terminal_insert_delete_lines() {
        let mut term = Terminal::new(10, 5, 1000);
        term.process(b"Line 1\r\nLine 2\r\nLine 3\r\nLine 4\r\nLine 5");
        term.process(b"\x1b[2;1H\x1b[L");

        assert_eq!(text(&term), "Line 1\n\nLine 2\nLine 3\nLine 4\n");

        term.process(b"\x1b[M");
        assert_eq!(text(&term), "Line 1\nLine 2\nLine 3\nLine 4\n");
    }

    #[test]
    fn test_terminal_repeat_char() {
        let mut term = Terminal::new(10, 1, 0);
        term.process(b"x\x1b[3b");
        assert_eq!(text(&term), "xxxx\n");
    }

    #[test]
    fn test_terminal_resize() {
        let mut term = Terminal::new(10, 5, 100);
        term.process(b"hello\x1b[5;10H");
        term.resize(4, 2);

        assert_eq!(term.screen().cols(), 4);
        assert_eq!(term.screen().rows(), 2);
        assert_eq!(term.cursor_state().row, 1);
        assert_eq!(term.cursor_state().col, 3);
        assert_eq!(text(&term), "hell\n");
    }

    #[test]
    fn test_terminal_from_config() {
        let config = Config {
            cols: 20,
            rows: 4,
            scrollback_lines: 2,
        };
        let term = Terminal::from_config(&config);
        assert_eq!(term.screen().cols(), 20);
        assert_eq!(term.screen().rows(), 4);
        assert_eq!(term.scrollback().capacity(), 2);
    }

    #[test]
    fn test_terminal_alignment_test() {
        let mut term = Terminal::new(3, 2, 0);
        term.process(b"\x1b#8");
        assert_eq!(text(&term), "EEE\nEEE\n");
    }
}
