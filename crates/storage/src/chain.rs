//! Version chains for MVCC
//!
//! Each key maps to a chain of committed versions stored newest-first, so
//! snapshot reads find the most recent version <= snapshot version with a
//! short forward scan. Tombstones stay in the chain; they are what lets
//! history report deletions.

use magnit_core::{KeyModification, VersionedValue};
use std::collections::VecDeque;

use crate::stored_value::StoredValue;

/// Committed versions of one key, newest first
#[derive(Debug, Clone)]
pub struct VersionChain {
    versions: VecDeque<StoredValue>,
}

impl VersionChain {
    /// Create a chain with a single version
    pub fn new(value: StoredValue) -> Self {
        let mut versions = VecDeque::with_capacity(4);
        versions.push_front(value);
        Self { versions }
    }

    /// Add a new version (must be newer than every existing version)
    #[inline]
    pub fn push(&mut self, value: StoredValue) {
        debug_assert!(
            self.versions
                .front()
                .map_or(true, |newest| newest.version() < value.version()),
            "versions must be pushed in commit order"
        );
        self.versions.push_front(value);
    }

    /// Newest entry with version <= max_version, tombstones included
    pub fn get_at_version(&self, max_version: u64) -> Option<&StoredValue> {
        self.versions.iter().find(|sv| sv.version() <= max_version)
    }

    /// Live value visible at max_version; None if absent or deleted
    pub fn live_at(&self, max_version: u64) -> Option<VersionedValue> {
        self.get_at_version(max_version)
            .and_then(StoredValue::to_versioned)
    }

    /// Newest entry
    #[inline]
    pub fn latest(&self) -> Option<&StoredValue> {
        self.versions.front()
    }

    /// Every change with version <= max_version, oldest first
    pub fn history(&self, max_version: u64) -> Vec<KeyModification> {
        self.versions
            .iter()
            .rev()
            .filter(|sv| sv.version() <= max_version)
            .map(StoredValue::to_modification)
            .collect()
    }

    /// Number of versions stored
    pub fn version_count(&self) -> usize {
        self.versions.len()
    }
}
