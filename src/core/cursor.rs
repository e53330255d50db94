//! Cursor state
//!
//! Plain data: position, visibility, shape, the pen for new cells and the
//! per-cursor flags. Movement is clamped by [`super::Screen`], which knows
//! the margins.

use serde::{Deserialize, Serialize};

use super::{Color, Style};

/// Cursor shape as selected by DECSCUSR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorShape {
    /// No shape has been selected; the terminal uses its own default
    #[default]
    Default,
    Block,
    Underline,
    Bar,
}

impl CursorShape {
    /// Decode a DECSCUSR parameter into a shape and steady flag.
    ///
    /// 0 selects the default shape; odd values blink, even values are
    /// steady. Unknown values yield `None`.
    pub fn from_decscusr(n: u16) -> Option<(CursorShape, bool)> {
        match n {
            0 => Some((CursorShape::Default, false)),
            1 | 2 => Some((CursorShape::Block, n == 2)),
            3 | 4 => Some((CursorShape::Underline, n == 4)),
            5 | 6 => Some((CursorShape::Bar, n == 6)),
            _ => None,
        }
    }

    /// DECSCUSR parameter for this shape, or `None` for the default shape.
    ///
    /// block=1, underline=3, bar=5, plus one when steady. 0 is never
    /// produced.
    pub fn decscusr(self, steady: bool) -> Option<u16> {
        let base = match self {
            CursorShape::Default => return None,
            CursorShape::Block => 1,
            CursorShape::Underline => 3,
            CursorShape::Bar => 5,
        };
        Some(base + u16::from(steady))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub col: usize,
    pub row: usize,
    /// DECTCEM
    pub visible: bool,
    pub shape: CursorShape,
    pub steady: bool,
    pub fg: Color,
    pub bg: Color,
    pub style: Style,
    /// DECOM: rows are addressed relative to the top margin
    pub origin_mode: bool,
    /// DECAWM
    pub autowrap: bool,
    /// Set after printing into the last column; the next printable
    /// character wraps first
    pub pending_wrap: bool,
    /// IRM
    pub insert_mode: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            col: 0,
            row: 0,
            visible: true,
            shape: CursorShape::Default,
            steady: false,
            fg: Color::Default,
            bg: Color::Default,
            style: Style::default(),
            origin_mode: false,
            autowrap: true,
            pending_wrap: false,
            insert_mode: false,
        }
    }
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put the cursor at an already clamped position
    pub fn place(&mut self, col: usize, row: usize) {
        self.col = col;
        self.row = row;
        self.pending_wrap = false;
    }

    /// SGR 0
    pub fn reset_attributes(&mut self) {
        self.fg = Color::Default;
        self.bg = Color::Default;
        self.style = Style::default();
    }

    /// DECSC
    pub fn save(&self) -> SavedCursor {
        SavedCursor(self.clone())
    }

    /// DECRC. The saved position is clamped to the current size.
    pub fn restore(&mut self, saved: &SavedCursor, cols: usize, rows: usize) {
        let saved = &saved.0;
        self.place(
            saved.col.min(cols.saturating_sub(1)),
            saved.row.min(rows.saturating_sub(1)),
        );
        self.fg = saved.fg;
        self.bg = saved.bg;
        self.style = saved.style;
        self.origin_mode = saved.origin_mode;
        self.autowrap = saved.autowrap;
    }
}

/// Cursor captured by DECSC. Only position, pen, origin mode and
/// autowrap come back on DECRC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCursor(Cursor);
