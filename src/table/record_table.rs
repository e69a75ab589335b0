//! RecordTable implementation
//!
//! HashMap-based table with RwLock for concurrency.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::record::Record;

/// In-memory table of live records keyed by identity
pub struct RecordTable<T> {
    records: RwLock<HashMap<u64, T>>,
}

impl<T: Record> RecordTable<T> {
    /// Create a new empty table
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Get a copy of the record with this identity
    pub fn get(&self, identity: u64) -> Option<T> {
        self.records.read().get(&identity).cloned()
    }

    /// Whether a record with this identity is live
    pub fn contains(&self, identity: u64) -> bool {
        self.records.read().contains_key(&identity)
    }

    /// Insert or replace a record under its own identity, returning the old one
    pub fn put(&self, record: T) -> Option<T> {
        self.records.write().insert(record.identity(), record)
    }

    /// Remove a record. Returns the removed record and whether the table is
    /// now empty (both observed under the same lock).
    pub fn remove(&self, identity: u64) -> (Option<T>, bool) {
        let mut records = self.records.write();
        let removed = records.remove(&identity);
        (removed, records.is_empty())
    }

    /// Insert many records at once (bulk load)
    pub fn extend(&self, loaded: impl IntoIterator<Item = T>) {
        let mut records = self.records.write();
        for record in loaded {
            records.insert(record.identity(), record);
        }
    }

    /// Snapshot of all records, in no particular order
    pub fn values(&self) -> Vec<T> {
        self.records.read().values().cloned().collect()
    }

    /// Snapshot of all identities, ascending
    pub fn identities(&self) -> Vec<u64> {
        let mut identities: Vec<u64> = self.records.read().keys().copied().collect();
        identities.sort_unstable();
        identities
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if the table holds no records
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl<T: Record> Default for RecordTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
