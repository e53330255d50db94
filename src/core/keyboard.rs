//! Kitty keyboard protocol state
//!
//! Applications enable progressive keyboard enhancements by pushing flag
//! values onto a stack (`CSI > flags u`) and restore the previous state by
//! popping (`CSI < n u`). The top entry is the effective configuration.

use serde::{Deserialize, Serialize};

/// Maximum number of stacked entries; pushing past it drops the bottom one
pub const MAX_KEYBOARD_STACK_DEPTH: usize = 32;

/// How `CSI = flags ; mode u` combines flags with the current top entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardSetMode {
    /// 1: replace all flags
    Replace,
    /// 2: set the given bits
    Union,
    /// 3: clear the given bits
    Difference,
}

impl KeyboardSetMode {
    pub fn from_param(mode: u16) -> Option<Self> {
        match mode {
            1 => Some(Self::Replace),
            2 => Some(Self::Union),
            3 => Some(Self::Difference),
            _ => None,
        }
    }
}

/// Stack of keyboard enhancement flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardStack {
    entries: Vec<u16>,
}

impl KeyboardStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective flags: the top entry, or 0 when the stack is empty
    pub fn flags(&self) -> u16 {
        self.entries.last().copied().unwrap_or(0)
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Push a new top entry
    pub fn push(&mut self, flags: u16) {
        if self.entries.len() == MAX_KEYBOARD_STACK_DEPTH {
            self.entries.remove(0);
        }
        self.entries.push(flags);
    }

    /// Remove the `count` topmost entries; popping past the bottom empties
    /// the stack
    pub fn pop(&mut self, count: usize) {
        let keep = self.entries.len().saturating_sub(count);
        self.entries.truncate(keep);
    }

    /// Rewrite the top entry. With an empty stack the result becomes the
    /// first entry.
    pub fn set(&mut self, flags: u16, mode: KeyboardSetMode) {
        let current = self.flags();
        let updated = match mode {
            KeyboardSetMode::Replace => flags,
            KeyboardSetMode::Union => current | flags,
            KeyboardSetMode::Difference => current & !flags,
        };
        match self.entries.last_mut() {
            Some(top) => *top = updated,
            None => self.entries.push(updated),
        }
    }

    /// Entries from bottom to top
    pub fn entries(&self) -> &[u16] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stack_has_no_flags() {
        let stack = KeyboardStack::new();
        assert_eq!(stack.flags(), 0);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_push_pop() {
        let mut stack = KeyboardStack::new();
        stack.push(1);
        assert_eq!(stack.flags(), 1);
        stack.push(3);
        assert_eq!(stack.flags(), 3);

        stack.pop(1);
        assert_eq!(stack.flags(), 1);
        stack.pop(1);
        assert_eq!(stack.flags(), 0);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_is_a_count() {
        let mut stack = KeyboardStack::new();
        stack.push(1);
        stack.push(3);
        stack.push(5);

        stack.pop(2);
        assert_eq!(stack.entries(), &[1]);

        stack.pop(10);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_push_evicts_bottom_when_full() {
        let mut stack = KeyboardStack::new();
        for flags in 0..MAX_KEYBOARD_STACK_DEPTH as u16 + 2 {
            stack.push(flags);
        }
        assert_eq!(stack.depth(), MAX_KEYBOARD_STACK_DEPTH);
        assert_eq!(stack.entries()[0], 2);
        assert_eq!(stack.flags(), MAX_KEYBOARD_STACK_DEPTH as u16 + 1);
    }

    #[test]
    fn test_set_modes() {
        let mut stack = KeyboardStack::new();
        stack.push(0b0101);

        stack.set(0b0010, KeyboardSetMode::Union);
        assert_eq!(stack.flags(), 0b0111);

        stack.set(0b0100, KeyboardSetMode::Difference);
        assert_eq!(stack.flags(), 0b0011);

        stack.set(0b1000, KeyboardSetMode::Replace);
        assert_eq!(stack.flags(), 0b1000);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_set_on_empty_stack_pushes() {
        let mut stack = KeyboardStack::new();
        stack.set(3, KeyboardSetMode::Replace);
        assert_eq!(stack.entries(), &[3]);
    }
}
