//! Snapshot-based undo/redo history over the point set, selection and
//! prefix registry.

use chrono::{DateTime, Local};

use crate::data::points::{Point, PointId};

/// Default maximum number of retained snapshots.
pub const DEFAULT_CAPACITY: usize = 50;

/// An immutable deep snapshot of the annotated state.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub points: Vec<Point>,
    /// Selection by identity within this snapshot's point set.
    pub selected: Vec<PointId>,
    pub prefixes: Vec<String>,
    /// Human-readable description of the action that produced this state.
    pub action: String,
    pub timestamp: DateTime<Local>,
}

/// Linear, indexable snapshot sequence.
///
/// Invariant: `index < entries.len()` whenever the history is non-empty;
/// `index == entries.len() - 1` means "at head" (no redo available).
#[derive(Clone, Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.index < self.entries.len() - 1
    }

    /// The entry describing the current state, if any.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.index)
    }

    /// New capacity takes effect on the next push (oldest entries are
    /// evicted then), matching how the settings surface applies it.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Push a snapshot. Entries after the current index (a previously
    /// undone branch) are discarded first; when capacity is exceeded the
    /// oldest entries are dropped and the index re-anchored to the tail.
    pub fn push(&mut self, entry: HistoryEntry) {
        if !self.entries.is_empty() && self.index + 1 < self.entries.len() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(entry);
        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
        }
        self.index = self.entries.len() - 1;
    }

    /// Step back one entry and return it for the caller to restore.
    /// No-op at the beginning of history.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    /// Step forward one entry and return it for the caller to restore.
    /// No-op at the head.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }

    /// Empty the stack entirely. Used at non-undoable boundaries (image
    /// load, clear-all); the caller pushes a fresh baseline afterwards.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.index = 0;
    }
}
