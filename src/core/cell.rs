//! Terminal Cell
//!
//! Represents a single cell in the terminal grid, containing a character
//! and its associated styling attributes.

use serde::{Deserialize, Serialize};

/// A single cell in the terminal grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The character(s) in this cell. Empty for erased cells and for
    /// continuation cells of wide characters; may hold combining marks.
    pub content: String,
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Text style attributes
    pub style: Style,
    /// Display width: 0 for a wide-char continuation, 1 normal, 2 wide
    pub width: u8,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            content: String::new(),
            fg: Color::Default,
            bg: Color::Default,
            style: Style::default(),
            width: 1,
        }
    }
}

impl Cell {
    /// Create a new cell with a single character
    pub fn new(c: char) -> Self {
        let width = unicode_width::UnicodeWidthChar::width(c).unwrap_or(1) as u8;
        Self {
            content: c.to_string(),
            width,
            ..Default::default()
        }
    }

    /// Check if this cell is empty (no content)
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Check if this cell is the second half of a double-width character
    pub fn is_wide_continuation(&self) -> bool {
        self.width == 0
    }

    /// True when the cell carries nothing a renderer needs to draw:
    /// no content and the default pen.
    pub fn is_blank(&self) -> bool {
        self.content.is_empty()
            && self.width == 1
            && self.fg == Color::Default
            && self.bg == Color::Default
            && self.style == Style::default()
    }

    /// Append a combining character to this cell
    pub fn append_combining(&mut self, c: char) {
        if !self.content.is_empty() {
            self.content.push(c);
        }
    }

    /// Clear the cell to default state
    pub fn clear(&mut self) {
        self.content.clear();
        self.fg = Color::Default;
        self.bg = Color::Default;
        self.style = Style::default();
        self.width = 1;
    }

    /// Clear the cell but preserve background color (for erase operations)
    pub fn erase(&mut self, bg: Color) {
        self.clear();
        self.bg = bg;
    }
}

/// Color representation supporting indexed and RGB colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Color {
    /// Default terminal color (foreground or background)
    #[default]
    Default,
    /// 256-color palette index
    Indexed(u8),
    /// 24-bit RGB color
    Rgb(u8, u8, u8),
}

impl Color {
    /// Standard ANSI colors (0-7)
    pub const BLACK: Color = Color::Indexed(0);
    pub const RED: Color = Color::Indexed(1);
    pub const GREEN: Color = Color::Indexed(2);
    pub const YELLOW: Color = Color::Indexed(3);
    pub const BLUE: Color = Color::Indexed(4);
    pub const MAGENTA: Color = Color::Indexed(5);
    pub const CYAN: Color = Color::Indexed(6);
    pub const WHITE: Color = Color::Indexed(7);

    /// Append the SGR parameters selecting this color.
    ///
    /// `base` is 30 for foreground and 40 for background. Palette entries
    /// 0-15 use the short forms so a replaying terminal lands on the same
    /// `Indexed` value the source parsed.
    pub(crate) fn write_sgr(&self, base: u16, out: &mut Vec<String>) {
        match *self {
            Color::Default => out.push((base + 9).to_string()),
            Color::Indexed(i) if i < 8 => out.push((base + u16::from(i)).to_string()),
            Color::Indexed(i) if i < 16 => out.push((base + 60 + u16::from(i) - 8).to_string()),
            Color::Indexed(i) => out.push(format!("{};5;{}", base + 8, i)),
            Color::Rgb(r, g, b) => out.push(format!("{};2;{};{};{}", base + 8, r, g, b)),
        }
    }
}

/// Text style attributes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub bold: bool,
    pub faint: bool,
    pub italic: bool,
    pub underline: bool,
    pub blink: bool,
    pub inverse: bool,
    pub hidden: bool,
    pub strikethrough: bool,
}

impl Style {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
