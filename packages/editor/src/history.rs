//! # Undo/Redo History
//!
//! Bounded log of whole-document snapshots addressed by a pointer.
//!
//! ## Design
//!
//! ```text
//!  entries:  [s0] [s1] [s2] [s3]
//!                        ▲
//!                     pointer      undo → s1, redo → s3
//! ```
//!
//! - `add` drops everything after the pointer, appends, and points at the
//!   new entry
//! - When the log outgrows its capacity the oldest entry is evicted and the
//!   pointer keeps addressing the same logical entry
//! - `undo`/`redo` only move the pointer; snapshots are never rebuilt
//!
//! Snapshots share structure (`Arc` element nodes), so keeping fifty of them
//! costs far less than fifty deep copies.

use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
struct HistoryEntry<T> {
    snapshot: T,
    label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct History<T> {
    entries: VecDeque<HistoryEntry<T>>,

    /// Index of the current entry; meaningless while `entries` is empty
    pointer: usize,

    capacity: usize,
}

impl<T> History<T> {
    /// Empty history with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Empty history keeping at most `capacity` entries (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            pointer: 0,
            capacity: capacity.max(1),
        }
    }

    /// History whose first entry is `initial`
    pub fn seeded(initial: T, capacity: usize) -> Self {
        let mut history = Self::with_capacity(capacity);
        history.add(initial);
        history
    }

    pub fn add(&mut self, snapshot: T) {
        self.push(snapshot, None);
    }

    /// Record a snapshot with the label of the edit that produced it
    pub fn add_labeled(&mut self, snapshot: T, label: impl Into<String>) {
        self.push(snapshot, Some(label.into()));
    }

    fn push(&mut self, snapshot: T, label: Option<String>) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.pointer + 1);
        }
        self.entries.push_back(HistoryEntry { snapshot, label });

        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.pointer = self.entries.len() - 1;
    }

    /// Step back; `None` when there is nothing to undo
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.pointer -= 1;
        self.current()
    }

    /// Step forward; `None` when there is nothing to redo
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.pointer += 1;
        self.current()
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.pointer > 0
    }

    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.entries.len()
    }

    pub fn current(&self) -> Option<&T> {
        self.entries.get(self.pointer).map(|e| &e.snapshot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn pointer(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.pointer)
    }

    /// Label of the edit `undo` would revert
    pub fn undo_label(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.entries
            .get(self.pointer)
            .and_then(|e| e.label.as_deref())
    }

    /// Label of the edit `redo` would reapply
    pub fn redo_label(&self) -> Option<&str> {
        self.entries
            .get(self.pointer + 1)
            .and_then(|e| e.label.as_deref())
    }

    /// Forget everything and start again from `initial`
    pub fn reset(&mut self, initial: T) {
        self.entries.clear();
        self.add(initial);
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_creation() {
        let history: History<u32> = History::new();
        assert_eq!(history.len(), 0);
        assert_eq!(history.pointer(), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.current().is_none());
    }

    #[test]
    fn test_undo_and_redo_move_pointer() {
        let mut history = History::seeded(0, DEFAULT_HISTORY_CAPACITY);
        history.add(1);
        history.add(2);

        assert_eq!(history.undo(), Some(&1));
        assert_eq!(history.undo(), Some(&0));
        assert_eq!(history.undo(), None);
        assert_eq!(history.pointer(), Some(0));

        assert_eq!(history.redo(), Some(&1));
        assert_eq!(history.redo(), Some(&2));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_add_after_undo_drops_redo_branch() {
        let mut history = History::seeded("a", DEFAULT_HISTORY_CAPACITY);
        history.add("b");
        history.add("c");
        history.undo();
        history.undo();

        history.add("d");

        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.current(), Some(&"d"));
        assert_eq!(history.undo(), Some(&"a"));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::with_capacity(3);
        for i in 0..5 {
            history.add(i);
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.current(), Some(&4));
        assert_eq!(history.undo(), Some(&3));
        assert_eq!(history.undo(), Some(&2));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_labels() {
        let mut history = History::seeded(0, DEFAULT_HISTORY_CAPACITY);
        assert_eq!(history.undo_label(), None);

        history.add_labeled(1, "Add element");
        history.add_labeled(2, "Delete element");

        assert_eq!(history.undo_label(), Some("Delete element"));
        assert_eq!(history.redo_label(), None);

        history.undo();
        assert_eq!(history.undo_label(), Some("Add element"));
        assert_eq!(history.redo_label(), Some("Delete element"));
    }

    #[test]
    fn test_zero_capacity_keeps_one_entry() {
        let mut history = History::with_capacity(0);
        history.add(1);
        history.add(2);
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.current(), Some(&2));
        assert!(!history.can_undo());
    }
}
