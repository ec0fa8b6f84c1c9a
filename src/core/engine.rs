// the constraint resolution engine: catalog + history, nothing else is stored
use std::sync::Arc;

use crate::core::catalog::SeedCatalog;
use crate::core::history::{History, HistoryEntry};
use crate::core::state::Assignment;
use crate::core::types::SeedId;

/// One engine per session. The catalog is shared read-only; assignment, pin and
/// phase all live in the current history entry, match sets are recomputed on read.
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: Arc<SeedCatalog>,
    pub(crate) history: History,
}

impl Engine {
    pub fn new(catalog: Arc<SeedCatalog>) -> Self {
        Self::with_history_limit(catalog, None)
    }

    pub fn with_history_limit(catalog: Arc<SeedCatalog>, limit: Option<usize>) -> Self {
        Engine {
            catalog,
            history: History::new(limit),
        }
    }

    pub fn catalog(&self) -> &SeedCatalog {
        &self.catalog
    }

    pub fn assignment(&self) -> &Assignment {
        &self.current().assignment
    }

    pub fn pinned(&self) -> Option<SeedId> {
        self.current().pinned
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub(crate) fn current(&self) -> &HistoryEntry {
        self.history.current()
    }
}
