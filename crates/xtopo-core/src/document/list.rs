//! Order-preserving section storage.
//!
//! Configuration sections live in [`SectionList`]s, which keep insertion order
//! (the screen sequence drives adjacency numbering, so order is part of the
//! document's meaning) while letting the reconciliation engine splice, remove,
//! and filter records by position or identifier.
//!
//! Only structural primitives live here; all topology policy stays in the
//! `reconcile` module.

use serde::{Deserialize, Serialize};

/// Implemented by every named configuration section.
pub trait Section {
    /// The section's `Identifier` entry.
    fn identifier(&self) -> &str;
}

/// An owned, order-preserving collection of configuration sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionList<T> {
    records: Vec<T>,
}

impl<T> SectionList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Appends a record at the end of the sequence.
    pub fn push(&mut self, record: T) {
        self.records.push(record);
    }

    /// Splices `record` immediately after position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn insert_after(&mut self, index: usize, record: T) {
        self.records.insert(index + 1, record);
    }

    /// Removes and returns the record at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        self.records.remove(index)
    }

    /// Keeps only the records for which `keep` returns `true`, preserving the
    /// order of the survivors.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, keep: F) {
        self.records.retain(keep);
    }

    /// Shortens the sequence to its first `len` records.
    pub fn truncate(&mut self, len: usize) {
        self.records.truncate(len);
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Returns the record at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.records.get(index)
    }

    /// Mutable access to the record at `index`, if any.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.records.get_mut(index)
    }

    /// Iterates the records in sequence order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    /// Iterates the records mutably in sequence order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.records.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T: Section> SectionList<T> {
    /// Finds the first record whose identifier equals `identifier`.
    pub fn find(&self, identifier: &str) -> Option<&T> {
        self.records.iter().find(|r| r.identifier() == identifier)
    }

    /// Mutable variant of [`SectionList::find`].
    pub fn find_mut(&mut self, identifier: &str) -> Option<&mut T> {
        self.records.iter_mut().find(|r| r.identifier() == identifier)
    }

    /// Returns the position of the first record with the given identifier.
    pub fn position(&self, identifier: &str) -> Option<usize> {
        self.records.iter().position(|r| r.identifier() == identifier)
    }
}

impl<T> Default for SectionList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for SectionList<T> {
    fn from(records: Vec<T>) -> Self {
        Self { records }
    }
}

impl<'a, T> IntoIterator for &'a SectionList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
