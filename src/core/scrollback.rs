//! Scrollback buffer for terminal history
//!
//! A fixed-capacity ring of lines that have scrolled off the top of the
//! primary screen. Slots are allocated up front; once the ring is full every
//! push overwrites the oldest line in place.

use serde::{Deserialize, Serialize};

use super::line::Line;

/// Default maximum scrollback lines
pub const DEFAULT_SCROLLBACK_SIZE: usize = 10000;

/// Scrollback buffer using a ring buffer implementation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scrollback {
    /// Ring slots; `None` until first written or after a reset
    slots: Vec<Option<Line>>,
    /// Next slot to write
    write: usize,
    /// Number of lines currently stored
    len: usize,
}

impl Scrollback {
    /// Create a scrollback holding at most `capacity` lines.
    ///
    /// A capacity of 0 yields a disabled buffer that discards every push.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            write: 0,
            len: 0,
        }
    }

    /// Maximum number of lines retained
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of lines currently stored
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store a line as the newest entry, evicting the oldest when full.
    ///
    /// The buffer owns the stored value, so later changes to the caller's
    /// copy of the line never reach history.
    pub fn push(&mut self, line: Line) {
        let capacity = self.capacity();
        if capacity == 0 {
            return;
        }

        if self.len == capacity {
            tracing::trace!(slot = self.write, "scrollback full, evicting oldest line");
        }
        self.slots[self.write] = Some(line);
        self.write = (self.write + 1) % capacity;
        if self.len < capacity {
            self.len += 1;
        }
    }

    /// Get a line by age: 0 is the oldest, `len() - 1` the newest.
    /// Returns `None` when `index` is out of range.
    pub fn line(&self, index: usize) -> Option<&Line> {
        if index >= self.len {
            return None;
        }
        self.slots[self.slot(index)].as_ref()
    }

    /// Physical slot of the line with the given age.
    ///
    /// `write - len` may underflow, so the capacity is added before the
    /// subtraction to keep every term non-negative.
    fn slot(&self, index: usize) -> usize {
        let capacity = self.capacity();
        (self.write + capacity - self.len + index) % capacity
    }

    /// Copy of every stored line, oldest first
    pub fn lines(&self) -> Vec<Line> {
        self.iter().cloned().collect()
    }

    /// Iterator over lines from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Line> + '_ {
        (0..self.len).filter_map(move |i| self.line(i))
    }

    /// Drop all stored lines; the capacity is kept
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.write = 0;
        self.len = 0;
    }
}

impl Default for Scrollback {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLLBACK_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(sb: &Scrollback) -> Vec<String> {
        sb.iter().map(Line::text).collect()
    }

    #[test]
    fn test_scrollback_new() {
        let sb = Scrollback::new(100);
        assert_eq!(sb.capacity(), 100);
        assert_eq!(sb.len(), 0);
        assert!(sb.is_empty());
    }

    #[test]
    fn test_scrollback_push() {
        let mut sb = Scrollback::new(5);
        for i in 0..3 {
            sb.push(Line::from_text(&format!("line{i}")));
        }

        assert_eq!(sb.len(), 3);
        assert_eq!(sb.line(0).unwrap().text(), "line0");
        assert_eq!(sb.line(2).unwrap().text(), "line2");
        assert!(sb.line(3).is_none());
    }

    #[test]
    fn test_scrollback_overflow() {
        let mut sb = Scrollback::new(3);
        for i in 0..7 {
            sb.push(Line::from_text(&format!("L{i}")));
        }

        assert_eq!(sb.len(), 3);
        assert_eq!(sb.line(0).unwrap().text(), "L4");
        assert_eq!(sb.line(2).unwrap().text(), "L6");
        assert_eq!(texts(&sb), vec!["L4", "L5", "L6"]);
    }

    #[test]
    fn test_scrollback_zero_capacity() {
        let mut sb = Scrollback::new(0);
        sb.push(Line::from_text("dropped"));
        sb.push(Line::from_text("dropped"));

        assert_eq!(sb.len(), 0);
        assert_eq!(sb.capacity(), 0);
        assert!(sb.line(0).is_none());
        assert!(sb.lines().is_empty());
    }

    #[test]
    fn test_scrollback_reset() {
        let mut sb = Scrollback::new(5);
        sb.push(Line::from_text("hello"));
        sb.reset();

        assert_eq!(sb.len(), 0);
        assert_eq!(sb.capacity(), 5);
        assert!(sb.line(0).is_none());

        // Usable again after a reset
        sb.push(Line::from_text("again"));
        assert_eq!(sb.line(0).unwrap().text(), "again");
    }

    #[test]
    fn test_scrollback_lines_are_copies() {
        let mut sb = Scrollback::new(3);
        for i in 0..5 {
            sb.push(Line::from_text(&format!("line{i}")));
        }

        let mut lines = sb.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text(), "line2");
        assert_eq!(lines[2].text(), "line4");

        lines[0].cell_mut(0).unwrap().content = "X".to_string();
        assert_eq!(sb.line(0).unwrap().text(), "line2");
    }

    #[test]
    fn test_scrollback_push_isolation() {
        let mut sb = Scrollback::new(2);
        let mut line = Line::from_text("orig");
        sb.push(line.clone());

        line.cell_mut(0).unwrap().content = "X".to_string();
        assert_eq!(sb.line(0).unwrap().text(), "orig");
    }

    #[test]
    fn test_scrollback_capacity_one() {
        let mut sb = Scrollback::new(1);
        sb.push(Line::from_text("a"));
        sb.push(Line::from_text("b"));
        assert_eq!(sb.len(), 1);
        assert_eq!(sb.line(0).unwrap().text(), "b");
    }
}
