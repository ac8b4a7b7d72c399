//! In-memory entry store

use attest_model::{EntryDraft, ProductEntry};
use attest_util::EntryId;
use tracing::debug;

/// Ordered sequence of recorded test entries, oldest first.
///
/// Entries are immutable once appended; the only mutations are append,
/// remove-by-id and clear. Contents are scoped to one run and never
/// persisted.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: Vec<ProductEntry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a draft as a new entry: assigns a fresh id, computes
    /// `total_operations`, fills a missing test date with today.
    /// Never fails.
    pub fn append(&mut self, draft: EntryDraft) -> EntryId {
        let id = EntryId::new();
        let entry = ProductEntry::from_draft(id.clone(), draft, attest_util::today());
        debug!(entry_id = %id, serial = %entry.serial_number, "Entry appended");
        self.entries.push(entry);
        id
    }

    /// Remove the entry with the given id. An unknown id is a no-op,
    /// not an error.
    pub fn remove(&mut self, id: &EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.id != id);
        let removed = self.entries.len() < before;
        debug!(entry_id = %id, removed, "Entry remove requested");
        removed
    }

    /// Empty the store. Confirmation is the caller's concern.
    pub fn clear(&mut self) {
        debug!(count = self.entries.len(), "Entry store cleared");
        self.entries.clear();
    }

    /// Current entries, insertion order preserved.
    pub fn list(&self) -> &[ProductEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
