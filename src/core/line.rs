//! Terminal line representation
//!
//! A line is one row of cells plus the soft-wrap flag. Lines are plain
//! values: cloning one yields a fully independent copy, which is what lets
//! the scrollback keep history that the live screen later overwrites.

use serde::{Deserialize, Serialize};

use super::cell::{Cell, Color};

/// A row of cells in the terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    cells: Vec<Cell>,
    /// True if the text on this line continues onto the next one
    wrapped: bool,
}

impl Line {
    /// Create a new blank line with the specified number of columns
    pub fn new(cols: usize) -> Self {
        Self {
            cells: vec![Cell::default(); cols],
            wrapped: false,
        }
    }

    /// Build a line from plain text. Wide characters take two cells.
    pub fn from_text(text: &str) -> Self {
        let mut cells: Vec<Cell> = Vec::new();
        for c in text.chars() {
            let cell = Cell::new(c);
            if cell.width == 0 {
                if let Some(base) = cells.iter_mut().rev().find(|cell| !cell.is_wide_continuation()) {
                    base.append_combining(c);
                }
                continue;
            }
            let wide = cell.width == 2;
            cells.push(cell);
            if wide {
                cells.push(Cell {
                    width: 0,
                    ..Cell::default()
                });
            }
        }
        Self {
            cells,
            wrapped: false,
        }
    }

    /// Get the number of columns in this line
    pub fn cols(&self) -> usize {
        self.cells.len()
    }

    /// Get a reference to a cell at the given column
    pub fn cell(&self, col: usize) -> Option<&Cell> {
        self.cells.get(col)
    }

    /// Get a mutable reference to a cell at the given column
    pub fn cell_mut(&mut self, col: usize) -> Option<&mut Cell> {
        self.cells.get_mut(col)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn is_wrapped(&self) -> bool {
        self.wrapped
    }

    pub fn set_wrapped(&mut self, wrapped: bool) {
        self.wrapped = wrapped;
    }

    /// Resize the line; new cells are blank, extra cells are dropped
    pub fn resize(&mut self, cols: usize) {
        self.cells.resize_with(cols, Cell::default);
        self.trim_wide_tail();
    }

    /// If `col` holds the right half of a wide character, erase both
    /// halves so neither is left without the other
    pub fn split_wide_at(&mut self, col: usize) {
        if !self.cells.get(col).is_some_and(Cell::is_wide_continuation) {
            return;
        }
        for cell in &mut self.cells[col.saturating_sub(1)..=col] {
            let bg = cell.bg;
            cell.erase(bg);
        }
    }

    /// Erase a wide character whose right half fell off the end
    fn trim_wide_tail(&mut self) {
        if let Some(last) = self.cells.last_mut() {
            if last.width == 2 {
                let bg = last.bg;
                last.erase(bg);
            }
        }
    }

    /// Erase every cell, keeping the given background
    pub fn clear_with_bg(&mut self, bg: Color) {
        for cell in &mut self.cells {
            cell.erase(bg);
        }
        self.wrapped = false;
    }

    /// Erase cells from `col` to the end of the line
    pub fn clear_from(&mut self, col: usize, bg: Color) {
        self.split_wide_at(col);
        for cell in self.cells.iter_mut().skip(col) {
            cell.erase(bg);
        }
    }

    /// Erase cells from the start of the line through `col` (inclusive)
    pub fn clear_to(&mut self, col: usize, bg: Color) {
        self.split_wide_at(col + 1);
        for cell in self.cells.iter_mut().take(col + 1) {
            cell.erase(bg);
        }
    }

    /// Insert blank cells at `col`, shifting existing cells right.
    /// Cells pushed past the end are lost.
    pub fn insert_cells(&mut self, col: usize, count: usize, bg: Color) {
        let len = self.cells.len();
        if col >= len {
            return;
        }
        let count = count.min(len - col);
        self.split_wide_at(col);
        self.cells[col..].rotate_right(count);
        for cell in &mut self.cells[col..col + count] {
            cell.erase(bg);
        }
        self.trim_wide_tail();
    }

    /// Delete cells at `col`, shifting the rest left and blanking the tail
    pub fn delete_cells(&mut self, col: usize, count: usize, bg: Color) {
        let len = self.cells.len();
        if col >= len {
            return;
        }
        let count = count.min(len - col);
        self.split_wide_at(col);
        self.split_wide_at(col + count);
        self.cells[col..].rotate_left(count);
        for cell in &mut self.cells[len - count..] {
            cell.erase(bg);
        }
    }

    /// Erase `count` characters starting at `col` without shifting
    pub fn erase_chars(&mut self, col: usize, count: usize, bg: Color) {
        self.split_wide_at(col);
        self.split_wide_at(col.saturating_add(count));
        for cell in self.cells.iter_mut().skip(col).take(count) {
            cell.erase(bg);
        }
    }

    /// Plain text of this line with trailing spaces trimmed
    pub fn text(&self) -> String {
        let mut result = String::new();
        for cell in &self.cells {
            if cell.is_wide_continuation() {
                continue;
            }
            if cell.content.is_empty() {
                result.push(' ');
            } else {
                result.push_str(&cell.content);
            }
        }
        result.trim_end().to_string()
    }

    /// Check if every cell is empty
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }
}
