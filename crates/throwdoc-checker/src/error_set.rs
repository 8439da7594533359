//! Ordered, deduplicating sets of error kinds.

use crate::pool::Poolable;
use serde::Serialize;
use std::sync::Arc;
use throwdoc_common::Accessor;
use throwdoc_common::limits::{ERROR_SET_INITIAL_CAPACITY, POOLED_SET_MAX_CAPACITY};
use throwdoc_model::{DeclId, Program};

/// One error kind, optionally scoped to an accessor side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ErrorEntry {
    pub ty: DeclId,
    pub accessor: Accessor,
}

impl ErrorEntry {
    #[inline]
    pub const fn new(ty: DeclId, accessor: Accessor) -> Self {
        Self { ty, accessor }
    }

    /// Entry that applies regardless of accessor.
    #[inline]
    pub const fn unqualified(ty: DeclId) -> Self {
        Self::new(ty, Accessor::None)
    }

    #[must_use]
    pub const fn with_accessor(self, accessor: Accessor) -> Self {
        Self::new(self.ty, accessor)
    }

    /// Whether `self` is covered by `general`: same accessor, and the same
    /// type or a class-chain descendant of it.
    pub fn is_subsumed_by(self, general: Self, program: &Program) -> bool {
        self.accessor == general.accessor && program.is_subclass_of(self.ty, general.ty)
    }
}

/// Capacity after growing a full set of `len` entries.
fn grown_capacity(len: usize) -> usize {
    if len == 0 {
        ERROR_SET_INITIAL_CAPACITY
    } else {
        len.checked_mul(2).expect("error set capacity overflow")
    }
}

/// Insertion-ordered set of [`ErrorEntry`] values.
///
/// Growth doubles the capacity starting from a small initial size; a
/// capacity computation that overflows is an internal invariant violation
/// and panics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorKindSet {
    entries: Vec<ErrorEntry>,
}

impl ErrorKindSet {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = ErrorEntry>) -> Self {
        let mut set = Self::new();
        set.extend(entries);
        set
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    #[inline]
    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = ErrorEntry> + '_ {
        self.entries.iter().copied()
    }

    fn grow_for_one(&mut self) {
        let len = self.entries.len();
        if len < self.entries.capacity() {
            return;
        }
        self.entries.reserve_exact(grown_capacity(len) - len);
    }

    /// Add an entry. Returns `false` if an equal entry was already present.
    pub fn add(&mut self, entry: ErrorEntry) -> bool {
        if self.entries.contains(&entry) {
            return false;
        }
        self.grow_for_one();
        self.entries.push(entry);
        true
    }

    pub fn add_type(&mut self, ty: DeclId, accessor: Accessor) -> bool {
        self.add(ErrorEntry::new(ty, accessor))
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = ErrorEntry>) {
        for entry in entries {
            self.add(entry);
        }
    }

    /// Remove the entry equal to `(ty, accessor)`.
    pub fn remove(&mut self, ty: DeclId, accessor: Accessor) -> bool {
        let entry = ErrorEntry::new(ty, accessor);
        match self.entries.iter().position(|e| *e == entry) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn retain(&mut self, keep: impl FnMut(&ErrorEntry) -> bool) {
        self.entries.retain(keep);
    }

    #[inline]
    pub fn contains(&self, entry: ErrorEntry) -> bool {
        self.entries.contains(&entry)
    }

    pub fn contains_type(&self, ty: DeclId) -> bool {
        self.entries.iter().any(|e| e.ty == ty)
    }

    /// Whether some entry of this set subsumes `entry`.
    pub fn covers(&self, entry: ErrorEntry, program: &Program) -> bool {
        self.entries
            .iter()
            .any(|&general| entry.is_subsumed_by(general, program))
    }

    /// Whether every entry of this set is subsumed by an entry of `other`.
    pub fn is_subsumed_by(&self, other: &[ErrorEntry], program: &Program) -> bool {
        self.entries
            .iter()
            .all(|entry| other.iter().any(|&general| entry.is_subsumed_by(general, program)))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop entries added after the set had `len` entries.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// Reverse the entries from `from` to the end.
    pub fn reverse_tail(&mut self, from: usize) {
        if from < self.entries.len() {
            self.entries[from..].reverse();
        }
    }

    /// Immutable copy of the current entries.
    pub fn snapshot(&self) -> Arc<[ErrorEntry]> {
        Arc::from(self.entries.as_slice())
    }
}

impl FromIterator<ErrorEntry> for ErrorKindSet {
    fn from_iter<I: IntoIterator<Item = ErrorEntry>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl<'a> IntoIterator for &'a ErrorKindSet {
    type Item = ErrorEntry;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, ErrorEntry>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().copied()
    }
}

impl Poolable for ErrorKindSet {
    fn reset(&mut self) {
        self.clear();
    }

    fn is_reusable(&self) -> bool {
        self.capacity() <= POOLED_SET_MAX_CAPACITY
    }
}

#[cfg(test)]
#[path = "tests/error_set_tests.rs"]
mod tests;
