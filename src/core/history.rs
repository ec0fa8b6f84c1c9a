// undo stack with a live cursor
use serde::{Deserialize, Serialize};

use crate::core::state::Assignment;
use crate::core::types::{Phase, SeedId};

/// Immutable snapshot taken after each mutating action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub assignment: Assignment,
    /// Seed pinned by a manual override, if any.
    pub pinned: Option<SeedId>,
    pub phase: Phase,
}

impl HistoryEntry {
    pub fn initial() -> Self {
        HistoryEntry {
            assignment: Assignment::default(),
            pinned: None,
            phase: Phase::Selection,
        }
    }
}

/// Position 0 is always the init entry, so the cursor can never point at nothing.
/// Pushing after an undo discards everything beyond the cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    limit: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        History::new(None)
    }
}

impl History {
    /// `limit` caps the number of stored entries (init entry included, minimum 2).
    pub fn new(limit: Option<usize>) -> Self {
        History {
            entries: vec![HistoryEntry::initial()],
            cursor: 0,
            limit: limit.map(|l| l.max(2)),
        }
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(entry);
        self.cursor += 1;

        //oldest non-initial entries go first
        if let Some(limit) = self.limit {
            while self.entries.len() > limit {
                self.entries.remove(1);
                self.cursor -= 1;
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Back to a single init entry.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.entries.push(HistoryEntry::initial());
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
