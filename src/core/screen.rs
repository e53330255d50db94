//! Screen model implementation
//!
//! The screen is the visible terminal grid plus the state that shapes how
//! text lands on it: scroll region, tab stops and one cursor per buffer.
//! It owns both the primary and the alternate buffer; only lines scrolled
//! off the top of the primary buffer reach the scrollback.

use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::cursor::{Cursor, SavedCursor};
use super::line::Line;
use super::scrollback::Scrollback;

/// The main screen structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screen {
    cols: usize,
    rows: usize,
    primary_grid: Vec<Line>,
    alternate_grid: Vec<Line>,
    /// History for the primary buffer
    scrollback: Scrollback,
    primary_cursor: Cursor,
    alternate_cursor: Cursor,
    /// Saved cursor for primary screen (DECSC/DECRC)
    primary_saved_cursor: SavedCursor,
    /// Saved cursor for alternate screen
    alternate_saved_cursor: SavedCursor,
    /// Scroll region top (0-indexed, inclusive)
    scroll_top: usize,
    /// Scroll region bottom (0-indexed, inclusive)
    scroll_bottom: usize,
    tab_stops: Vec<bool>,
    on_alternate: bool,
    /// LNM: line feed also returns the carriage
    pub linefeed_mode: bool,
}

impl Screen {
    /// Create a new screen. Zero dimensions are raised to 1.
    pub fn new(cols: usize, rows: usize, scrollback_capacity: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);

        Self {
            cols,
            rows,
            primary_grid: blank_grid(cols, rows),
            alternate_grid: blank_grid(cols, rows),
            scrollback: Scrollback::new(scrollback_capacity),
            primary_cursor: Cursor::new(),
            alternate_cursor: Cursor::new(),
            primary_saved_cursor: SavedCursor::default(),
            alternate_saved_cursor: SavedCursor::default(),
            scroll_top: 0,
            scroll_bottom: rows - 1,
            tab_stops: default_tab_stops(cols),
            on_alternate: false,
            linefeed_mode: false,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn grid(&self) -> &Vec<Line> {
        if self.on_alternate {
            &self.alternate_grid
        } else {
            &self.primary_grid
        }
    }

    fn grid_mut(&mut self) -> &mut Vec<Line> {
        if self.on_alternate {
            &mut self.alternate_grid
        } else {
            &mut self.primary_grid
        }
    }

    /// Cursor of the active buffer
    pub fn cursor(&self) -> &Cursor {
        if self.on_alternate {
            &self.alternate_cursor
        } else {
            &self.primary_cursor
        }
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        if self.on_alternate {
            &mut self.alternate_cursor
        } else {
            &mut self.primary_cursor
        }
    }

    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    pub fn scrollback_mut(&mut self) -> &mut Scrollback {
        &mut self.scrollback
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn scroll_bottom(&self) -> usize {
        self.scroll_bottom
    }

    pub fn is_alternate(&self) -> bool {
        self.on_alternate
    }

    /// Get a cell at the given position of the active buffer
    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        self.grid().get(row).and_then(|line| line.cell(col))
    }

    fn cell_mut(&mut self, col: usize, row: usize) -> Option<&mut Cell> {
        self.grid_mut()
            .get_mut(row)
            .and_then(|line| line.cell_mut(col))
    }

    /// Get a line of the active buffer
    pub fn line(&self, row: usize) -> Option<&Line> {
        self.grid().get(row)
    }

    /// All lines of the active buffer, top to bottom
    pub fn lines(&self) -> &[Line] {
        self.grid()
    }

    /// Plain text of the active buffer, rows joined by `\n`
    pub fn text(&self) -> String {
        self.grid()
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Print a character at the current cursor position
    pub fn print_char(&mut self, c: char) {
        let width = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);

        // Zero-width characters attach to the previously printed cell
        if width == 0 {
            self.append_combining(c);
            return;
        }

        if self.cursor().pending_wrap {
            self.wrap_cursor();
        }

        let cols = self.cols;

        // A wide character does not fit in the last column
        if width == 2 && self.cursor().col == cols - 1 {
            if cols < 2 {
                return;
            }
            let (col, row) = (self.cursor().col, self.cursor().row);
            if let Some(line) = self.grid_mut().get_mut(row) {
                line.split_wide_at(col);
                if let Some(cell) = line.cell_mut(col) {
                    cell.clear();
                }
            }
            if !self.cursor().autowrap {
                return;
            }
            self.wrap_cursor();
        }

        let cursor = self.cursor();
        let (col, row) = (cursor.col, cursor.row);
        let (fg, bg, style) = (cursor.fg, cursor.bg, cursor.style);
        let insert_mode = cursor.insert_mode;

        if let Some(line) = self.grid_mut().get_mut(row) {
            if insert_mode {
                line.insert_cells(col, width, bg);
            }
            // Never leave half of an overwritten wide character behind
            for target in col..=col + width {
                line.split_wide_at(target);
            }
        }

        if let Some(cell) = self.cell_mut(col, row) {
            cell.content.clear();
            cell.content.push(c);
            cell.fg = fg;
            cell.bg = bg;
            cell.style = style;
            cell.width = width as u8;
        }

        if width == 2 {
            if let Some(cell) = self.cell_mut(col + 1, row) {
                cell.content.clear();
                cell.fg = fg;
                cell.bg = bg;
                cell.style = style;
                cell.width = 0;
            }
        }

        let next_col = col + width;
        let cursor = self.cursor_mut();
        if next_col >= cols {
            cursor.col = cols - 1;
            cursor.pending_wrap = cursor.autowrap;
        } else {
            cursor.col = next_col;
        }
    }

    fn append_combining(&mut self, c: char) {
        let cursor = self.cursor();
        let row = cursor.row;
        let mut col = if cursor.pending_wrap {
            cursor.col
        } else if cursor.col > 0 {
            cursor.col - 1
        } else {
            return;
        };
        if col > 0 && self.cell(col, row).is_some_and(Cell::is_wide_continuation) {
            col -= 1;
        }
        if let Some(cell) = self.cell_mut(col, row) {
            cell.append_combining(c);
        }
    }

    /// Move to the start of the next line, marking the current one wrapped
    fn wrap_cursor(&mut self) {
        let row = self.cursor().row;
        if let Some(line) = self.grid_mut().get_mut(row) {
            line.set_wrapped(true);
        }

        self.cursor_mut().pending_wrap = false;
        self.cursor_mut().col = 0;
        self.advance_row();
    }

    /// Move down one row, scrolling when the cursor sits on the bottom margin
    fn advance_row(&mut self) {
        let row = self.cursor().row;
        if row == self.scroll_bottom {
            self.scroll_up(1);
        } else if row + 1 < self.rows {
            self.cursor_mut().row += 1;
        }
    }

    /// Handle linefeed (LF, VT, FF)
    pub fn linefeed(&mut self) {
        self.cursor_mut().pending_wrap = false;
        self.advance_row();

        if self.linefeed_mode {
            self.cursor_mut().col = 0;
        }
    }

    /// Handle carriage return (CR)
    pub fn carriage_return(&mut self) {
        let row = self.cursor().row;
        self.place_cursor(0, row);
    }

    /// Handle backspace (BS)
    pub fn backspace(&mut self) {
        self.move_cursor_backward(1);
    }

    /// Move the cursor, clamping to the screen
    fn place_cursor(&mut self, col: usize, row: usize) {
        let (col, row) = (col.min(self.cols - 1), row.min(self.rows - 1));
        self.cursor_mut().place(col, row);
    }

    /// Absolute row for a CUP/VPA row, which is relative to the top margin
    /// in origin mode
    fn addressed_row(&self, row: usize) -> usize {
        if self.cursor().origin_mode {
            self.scroll_top.saturating_add(row).min(self.scroll_bottom)
        } else {
            row
        }
    }

    /// Handle horizontal tab (HT)
    pub fn tab(&mut self) {
        let col = self.cursor().col;
        let next = (col + 1..self.cols)
            .find(|&i| self.tab_stops.get(i).copied().unwrap_or(false))
            .unwrap_or(self.cols - 1);
        let cursor = self.cursor_mut();
        cursor.col = next;
        cursor.pending_wrap = false;
    }

    /// Move back `n` tab stops (CBT)
    pub fn back_tab(&mut self, n: usize) {
        let row = self.cursor().row;
        for _ in 0..n {
            let col = self.cursor().col;
            let prev = (0..col)
                .rev()
                .find(|&i| self.tab_stops.get(i).copied().unwrap_or(false))
                .unwrap_or(0);
            self.place_cursor(prev, row);
        }
    }

    /// Handle index (IND): move down, scrolling at the bottom margin
    pub fn index(&mut self) {
        self.cursor_mut().pending_wrap = false;
        self.advance_row();
    }

    /// Handle reverse index (RI): move up, scrolling at the top margin
    pub fn reverse_index(&mut self) {
        self.cursor_mut().pending_wrap = false;
        let row = self.cursor().row;

        if row == self.scroll_top {
            self.scroll_down(1);
        } else if row > 0 {
            self.cursor_mut().row -= 1;
        }
    }

    /// Handle next line (NEL)
    pub fn next_line(&mut self) {
        self.index();
        self.cursor_mut().col = 0;
    }

    /// Scroll the region up by n lines; new blank lines appear at the bottom.
    ///
    /// Lines leaving the top of the primary buffer move into the scrollback
    /// when the region spans the full height.
    pub fn scroll_up(&mut self, n: usize) {
        let top = self.scroll_top;
        let bottom = self.scroll_bottom;
        let n = n.min(bottom - top + 1);
        if n == 0 {
            return;
        }
        let cols = self.cols;

        if !self.on_alternate && top == 0 && bottom == self.rows - 1 {
            for i in 0..n {
                let line = std::mem::replace(&mut self.primary_grid[i], Line::new(cols));
                self.scrollback.push(line);
            }
        }

        let grid = self.grid_mut();
        grid[top..=bottom].rotate_left(n);
        for line in &mut grid[bottom + 1 - n..=bottom] {
            *line = Line::new(cols);
        }
    }

    /// Scroll the region down by n lines; new blank lines appear at the top
    pub fn scroll_down(&mut self, n: usize) {
        let top = self.scroll_top;
        let bottom = self.scroll_bottom;
        let n = n.min(bottom - top + 1);
        if n == 0 {
            return;
        }
        let cols = self.cols;

        let grid = self.grid_mut();
        grid[top..=bottom].rotate_right(n);
        for line in &mut grid[top..top + n] {
            *line = Line::new(cols);
        }
    }

    /// Set scroll region (DECSTBM), 0-indexed and inclusive.
    ///
    /// An empty or inverted region resets to the full screen. The cursor
    /// moves home either way.
    pub fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        let top = top.min(self.rows - 1);
        let bottom = bottom.min(self.rows - 1);

        if top < bottom {
            self.scroll_top = top;
            self.scroll_bottom = bottom;
        } else {
            self.reset_scroll_region();
        }

        let home = self.addressed_row(0);
        self.place_cursor(0, home);
    }

    pub fn reset_scroll_region(&mut self) {
        self.scroll_top = 0;
        self.scroll_bottom = self.rows - 1;
    }

    /// Set a tab stop at the current column (HTS)
    pub fn set_tab_stop(&mut self) {
        let col = self.cursor().col;
        if let Some(stop) = self.tab_stops.get_mut(col) {
            *stop = true;
        }
    }

    /// Clear the tab stop at the current column (TBC 0)
    pub fn clear_tab_stop(&mut self) {
        let col = self.cursor().col;
        if let Some(stop) = self.tab_stops.get_mut(col) {
            *stop = false;
        }
    }

    /// Clear all tab stops (TBC 3)
    pub fn clear_all_tab_stops(&mut self) {
        self.tab_stops.fill(false);
    }

    /// Erase in display (ED).
    ///
    /// 0: cursor to end, 1: start to cursor, 2: whole screen, 3: the
    /// scrollback only.
    pub fn erase_in_display(&mut self, mode: u16) {
        let cursor = self.cursor();
        let (col, row, bg) = (cursor.col, cursor.row, cursor.bg);
        let grid = self.grid_mut();

        match mode {
            0 => {
                grid[row].clear_from(col, bg);
                for line in &mut grid[row + 1..] {
                    line.clear_with_bg(bg);
                }
            }
            1 => {
                for line in &mut grid[..row] {
                    line.clear_with_bg(bg);
                }
                grid[row].clear_to(col, bg);
            }
            2 => {
                for line in grid.iter_mut() {
                    line.clear_with_bg(bg);
                }
            }
            3 => self.scrollback.reset(),
            _ => {}
        }
    }

    /// Erase in line (EL): 0 cursor to end, 1 start to cursor, 2 whole line
    pub fn erase_in_line(&mut self, mode: u16) {
        let cursor = self.cursor();
        let (col, row, bg) = (cursor.col, cursor.row, cursor.bg);

        if let Some(line) = self.grid_mut().get_mut(row) {
            match mode {
                0 => line.clear_from(col, bg),
                1 => line.clear_to(col, bg),
                2 => line.clear_with_bg(bg),
                _ => {}
            }
        }
    }

    /// Erase characters (ECH)
    pub fn erase_chars(&mut self, n: usize) {
        let cursor = self.cursor();
        let (col, row, bg) = (cursor.col, cursor.row, cursor.bg);

        if let Some(line) = self.grid_mut().get_mut(row) {
            line.erase_chars(col, n.max(1), bg);
        }
    }

    /// Insert lines (IL) at the cursor row; only inside the scroll region
    pub fn insert_lines(&mut self, n: usize) {
        let row = self.cursor().row;
        let bottom = self.scroll_bottom;
        if n == 0 || row < self.scroll_top || row > bottom {
            return;
        }
        let n = n.min(bottom - row + 1);
        let cols = self.cols;

        let grid = self.grid_mut();
        grid[row..=bottom].rotate_right(n);
        for line in &mut grid[row..row + n] {
            *line = Line::new(cols);
        }
        self.place_cursor(0, row);
    }

    /// Delete lines (DL) at the cursor row; only inside the scroll region
    pub fn delete_lines(&mut self, n: usize) {
        let row = self.cursor().row;
        let bottom = self.scroll_bottom;
        if n == 0 || row < self.scroll_top || row > bottom {
            return;
        }
        let n = n.min(bottom - row + 1);
        let cols = self.cols;

        let grid = self.grid_mut();
        grid[row..=bottom].rotate_left(n);
        for line in &mut grid[bottom + 1 - n..=bottom] {
            *line = Line::new(cols);
        }
        self.place_cursor(0, row);
    }

    /// Insert blank characters (ICH)
    pub fn insert_chars(&mut self, n: usize) {
        let cursor = self.cursor();
        let (col, row, bg) = (cursor.col, cursor.row, cursor.bg);

        if let Some(line) = self.grid_mut().get_mut(row) {
            line.insert_cells(col, n, bg);
        }
        self.cursor_mut().pending_wrap = false;
    }

    /// Delete characters (DCH)
    pub fn delete_chars(&mut self, n: usize) {
        let cursor = self.cursor();
        let (col, row, bg) = (cursor.col, cursor.row, cursor.bg);

        if let Some(line) = self.grid_mut().get_mut(row) {
            line.delete_cells(col, n, bg);
        }
        self.cursor_mut().pending_wrap = false;
    }

    /// Move cursor to position (CUP/HVP), 0-indexed
    pub fn move_cursor_to(&mut self, row: usize, col: usize) {
        let row = self.addressed_row(row);
        self.place_cursor(col, row);
    }

    /// Move cursor up (CUU). Stops at the top margin when starting inside
    /// the region.
    pub fn move_cursor_up(&mut self, n: usize) {
        let cursor = self.cursor();
        let floor = if cursor.row >= self.scroll_top {
            self.scroll_top
        } else {
            0
        };
        let (col, row) = (cursor.col, cursor.row.saturating_sub(n).max(floor));
        self.place_cursor(col, row);
    }

    /// Move cursor down (CUD). Stops at the bottom margin when starting
    /// inside the region.
    pub fn move_cursor_down(&mut self, n: usize) {
        let cursor = self.cursor();
        let ceiling = if cursor.row <= self.scroll_bottom {
            self.scroll_bottom
        } else {
            self.rows - 1
        };
        let (col, row) = (cursor.col, cursor.row.saturating_add(n).min(ceiling));
        self.place_cursor(col, row);
    }

    /// Move cursor forward (CUF)
    pub fn move_cursor_forward(&mut self, n: usize) {
        let cursor = self.cursor();
        let (col, row) = (cursor.col.saturating_add(n), cursor.row);
        self.place_cursor(col, row);
    }

    /// Move cursor backward (CUB)
    pub fn move_cursor_backward(&mut self, n: usize) {
        let cursor = self.cursor();
        let (col, row) = (cursor.col.saturating_sub(n), cursor.row);
        self.place_cursor(col, row);
    }

    /// Move cursor to column (CHA/HPA)
    pub fn move_cursor_to_col(&mut self, col: usize) {
        let row = self.cursor().row;
        self.place_cursor(col, row);
    }

    /// Move cursor to row (VPA)
    pub fn move_cursor_to_row(&mut self, row: usize) {
        let (col, row) = (self.cursor().col, self.addressed_row(row));
        self.place_cursor(col, row);
    }

    /// Save cursor state (DECSC)
    pub fn save_cursor(&mut self) {
        let saved = self.cursor().save();
        if self.on_alternate {
            self.alternate_saved_cursor = saved;
        } else {
            self.primary_saved_cursor = saved;
        }
    }

    /// Restore cursor state (DECRC)
    pub fn restore_cursor(&mut self) {
        let (cols, rows) = (self.cols, self.rows);
        if self.on_alternate {
            self.alternate_cursor
                .restore(&self.alternate_saved_cursor, cols, rows);
        } else {
            self.primary_cursor
                .restore(&self.primary_saved_cursor, cols, rows);
        }
    }

    /// Switch to the alternate buffer, cleared, with the current cursor
    pub fn enter_alternate_screen(&mut self) {
        if self.on_alternate {
            return;
        }

        self.alternate_cursor = self.primary_cursor.clone();
        for line in &mut self.alternate_grid {
            *line = Line::new(self.cols);
        }
        self.on_alternate = true;
    }

    /// Switch back to the primary buffer.
    ///
    /// Visibility and shape are terminal-wide, so they carry over.
    pub fn exit_alternate_screen(&mut self) {
        if !self.on_alternate {
            return;
        }

        self.primary_cursor.visible = self.alternate_cursor.visible;
        self.primary_cursor.shape = self.alternate_cursor.shape;
        self.primary_cursor.steady = self.alternate_cursor.steady;
        self.on_alternate = false;
    }

    /// Resize both buffers. Existing content is kept top-left; the
    /// scroll region resets and cursors are clamped.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        let cols = cols.max(1);
        let rows = rows.max(1);
        if cols == self.cols && rows == self.rows {
            return;
        }

        resize_grid(&mut self.primary_grid, cols, rows);
        resize_grid(&mut self.alternate_grid, cols, rows);
        self.cols = cols;
        self.rows = rows;
        self.reset_scroll_region();
        self.tab_stops = default_tab_stops(cols);

        for cursor in [&mut self.primary_cursor, &mut self.alternate_cursor] {
            cursor.col = cursor.col.min(cols - 1);
            cursor.row = cursor.row.min(rows - 1);
            cursor.pending_wrap = false;
        }
    }

    /// Fill the screen with 'E' (DECALN)
    pub fn alignment_test(&mut self) {
        self.reset_scroll_region();
        for line in self.grid_mut() {
            line.set_wrapped(false);
            for cell in line.cells_mut() {
                *cell = Cell::new('E');
            }
        }
        self.move_cursor_to(0, 0);
    }

    /// Reset to the initial state (RIS), including the scrollback
    pub fn reset(&mut self) {
        self.primary_grid = blank_grid(self.cols, self.rows);
        self.alternate_grid = blank_grid(self.cols, self.rows);
        self.primary_cursor = Cursor::new();
        self.alternate_cursor = Cursor::new();
        self.primary_saved_cursor = SavedCursor::default();
        self.alternate_saved_cursor = SavedCursor::default();
        self.reset_scroll_region();
        self.tab_stops = default_tab_stops(self.cols);
        self.on_alternate = false;
        self.linefeed_mode = false;
        self.scrollback.reset();
    }
}

fn blank_grid(cols: usize, rows: usize) -> Vec<Line> {
    (0..rows).map(|_| Line::new(cols)).collect()
}

/// Tab stops every 8 columns
fn default_tab_stops(cols: usize) -> Vec<bool> {
    (0..cols).map(|i| i > 0 && i % 8 == 0).collect()
}

fn resize_grid(grid: &mut Vec<Line>, cols: usize, rows: usize) {
    for line in grid.iter_mut() {
        line.resize(cols);
    }
    grid.resize_with(rows, || Line::new(cols));
}
