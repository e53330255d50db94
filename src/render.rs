//! Styled text rendering
//!
//! Turns the visible screen into text with embedded SGR sequences. Written
//! to a terminal positioned at the top-left corner, with every `\n` sent as
//! `\r\n`, the output reproduces the characters, colors and attributes of
//! every cell, including erased cells that carry a background color.

use crate::core::{Cell, Color, Screen, Style};

/// Attributes a cell is drawn with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Pen {
    fg: Color,
    bg: Color,
    style: Style,
}

impl Pen {
    fn of(cell: &Cell) -> Self {
        Self {
            fg: cell.fg,
            bg: cell.bg,
            style: cell.style,
        }
    }

    /// Pen that only carries a background, used for erasing
    fn background(bg: Color) -> Self {
        Self {
            bg,
            ..Self::default()
        }
    }

    /// Complete SGR sequence selecting this pen from any previous state
    fn sgr(&self) -> String {
        let mut params = vec!["0".to_string()];
        let flags = [
            (self.style.bold, "1"),
            (self.style.faint, "2"),
            (self.style.italic, "3"),
            (self.style.underline, "4"),
            (self.style.blink, "5"),
            (self.style.inverse, "7"),
            (self.style.hidden, "8"),
            (self.style.strikethrough, "9"),
        ];
        params.extend(
            flags
                .iter()
                .filter(|(on, _)| *on)
                .map(|(_, code)| code.to_string()),
        );
        if self.fg != Color::Default {
            self.fg.write_sgr(30, &mut params);
        }
        if self.bg != Color::Default {
            self.bg.write_sgr(40, &mut params);
        }
        format!("\x1b[{}m", params.join(";"))
    }
}

/// Render the active buffer of `screen` as styled text.
///
/// Rows are separated by `\n`; trailing blank rows and trailing blank
/// cells are omitted. The output never leaves a non-default pen active.
pub fn render_styled(screen: &Screen) -> String {
    let mut pen = Pen::default();
    let mut rows: Vec<String> = screen
        .lines()
        .iter()
        .map(|line| render_row(line.cells(), &mut pen))
        .collect();

    while rows.last().is_some_and(String::is_empty) {
        rows.pop();
    }

    let mut out = rows.join("\n");
    if pen != Pen::default() {
        out.push_str("\x1b[0m");
    }
    out
}

fn render_row(cells: &[Cell], pen: &mut Pen) -> String {
    let mut out = String::new();
    let end = cells
        .iter()
        .rposition(|cell| !cell.is_blank())
        .map_or(0, |i| i + 1);

    let mut col = 0;
    while col < end {
        let cell = &cells[col];

        // Right halves are covered by their lead; one found here has lost it
        if cell.is_wide_continuation() {
            out.push_str("\x1b[1C");
            col += 1;
            continue;
        }

        if cell.is_empty() {
            let bg = cell.bg;
            let run = cells[col..end]
                .iter()
                .take_while(|c| c.is_empty() && !c.is_wide_continuation() && c.bg == bg)
                .count();
            if bg != Color::Default {
                if pen.bg != bg {
                    *pen = Pen::background(bg);
                    out.push_str(&pen.sgr());
                }
                out.push_str(&format!("\x1b[{run}X"));
            }
            out.push_str(&format!("\x1b[{run}C"));
            col += run;
            continue;
        }

        let cell_pen = Pen::of(cell);
        if cell_pen != *pen {
            *pen = cell_pen;
            out.push_str(&pen.sgr());
        }
        out.push_str(&cell.content);
        let covers_next = cell.width == 2
            && cells
                .get(col + 1)
                .is_some_and(Cell::is_wide_continuation);
        col += if covers_next { 2 } else { 1 };
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn print(screen: &mut Screen, text: &str) {
        for c in text.chars() {
            screen.print_char(c);
        }
    }

    #[test]
    fn test_empty_screen_renders_nothing() {
        let screen = Screen::new(10, 3, 0);
        assert_eq!(render_styled(&screen), "");
    }

    #[test]
    fn test_plain_rows() {
        let mut screen = Screen::new(10, 4, 0);
        print(&mut screen, "ab");
        screen.move_cursor_to(1, 0);
        print(&mut screen, "cd");

        assert_eq!(render_styled(&screen), "ab\ncd");
    }

    #[test]
    fn test_blank_rows_between_content_are_kept() {
        let mut screen = Screen::new(10, 4, 0);
        print(&mut screen, "top");
        screen.move_cursor_to(2, 0);
        print(&mut screen, "low");

        assert_eq!(render_styled(&screen), "top\n\nlow");
    }

    #[test]
    fn test_gap_uses_cursor_forward() {
        let mut screen = Screen::new(10, 1, 0);
        print(&mut screen, "a");
        screen.move_cursor_to(0, 5);
        print(&mut screen, "b");

        assert_eq!(render_styled(&screen), "a\x1b[4Cb");
    }

    #[test]
    fn test_pen_changes_emit_full_sgr() {
        let mut screen = Screen::new(10, 1, 0);
        screen.cursor_mut().fg = Color::RED;
        print(&mut screen, "R");
        screen.cursor_mut().reset_attributes();
        print(&mut screen, "x");

        assert_eq!(render_styled(&screen), "\x1b[0;31mR\x1b[0mx");
    }

    #[test]
    fn test_trailing_pen_is_reset() {
        let mut screen = Screen::new(10, 1, 0);
        screen.cursor_mut().style.bold = true;
        screen.cursor_mut().fg = Color::Rgb(1, 2, 3);
        print(&mut screen, "X");

        assert_eq!(render_styled(&screen), "\x1b[0;1;38;2;1;2;3mX\x1b[0m");
    }

    #[test]
    fn test_bright_and_palette_colors() {
        let mut screen = Screen::new(10, 1, 0);
        screen.cursor_mut().fg = Color::Indexed(9);
        screen.cursor_mut().bg = Color::Indexed(200);
        print(&mut screen, "c");

        assert_eq!(render_styled(&screen), "\x1b[0;91;48;5;200mc\x1b[0m");
    }

    #[test]
    fn test_erased_background_is_preserved() {
        let mut screen = Screen::new(4, 1, 0);
        screen.cursor_mut().bg = Color::BLUE;
        screen.erase_in_line(2);

        assert_eq!(
            render_styled(&screen),
            "\x1b[0;44m\x1b[4X\x1b[4C\x1b[0m"
        );
    }

    #[test]
    fn test_wide_characters() {
        let mut screen = Screen::new(10, 1, 0);
        print(&mut screen, "中a");
        assert_eq!(render_styled(&screen), "中a");
    }

    #[test]
    fn test_partly_overwritten_wide_character() {
        let mut screen = Screen::new(10, 1, 0);
        print(&mut screen, "中");
        screen.move_cursor_to(0, 0);
        print(&mut screen, "a");
        screen.move_cursor_to(0, 2);
        print(&mut screen, "b");

        assert_eq!(render_styled(&screen), "a\x1b[1Cb");
    }
}
