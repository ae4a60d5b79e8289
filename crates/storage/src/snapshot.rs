//! StoreSnapshot: version-bounded view over live storage
//!
//! A snapshot does not copy data. It holds the store and the version it was
//! taken at, and filters every read to versions <= that version. Writes that
//! commit after the snapshot was taken are invisible through it.

use std::sync::Arc;

use magnit_core::{Key, KeyModification, MagnitResult, Partition, SnapshotView, Storage, VersionedValue};

use crate::store::VersionedStore;

/// Lazy point-in-time view of a [`VersionedStore`]
///
/// # Example
///
/// ```ignore
/// let snapshot = store.snapshot();
/// store.put(key.clone(), value, ts, tx_id);
/// assert!(snapshot.get(&key)?.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    store: Arc<VersionedStore>,
    version: u64,
}

impl StoreSnapshot {
    /// View of `store` frozen at `version`
    pub fn new(store: Arc<VersionedStore>, version: u64) -> Self {
        Self { store, version }
    }
}

impl SnapshotView for StoreSnapshot {
    fn get(&self, key: &Key) -> MagnitResult<Option<VersionedValue>> {
        self.store.get_versioned(key, self.version)
    }

    fn scan_range(
        &self,
        partition: &Partition,
        start: &str,
        end: &str,
    ) -> MagnitResult<Vec<(Key, VersionedValue)>> {
        self.store.scan_range(partition, start, end, self.version)
    }

    fn history(&self, key: &Key) -> MagnitResult<Vec<KeyModification>> {
        self.store.history(key, self.version)
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magnit_core::{Timestamp, TxId};

    #[test]
    fn test_snapshot_isolation() {
        let store = Arc::new(VersionedStore::new());
        let key = Key::shared("Agreement1");
        store.put(key.clone(), b"v1".to_vec(), Timestamp::from_secs(1), TxId::new());

        let snapshot = store.snapshot();
        store.put(key.clone(), b"v2".to_vec(), Timestamp::from_secs(2), TxId::new());
        store.put(Key::shared("Agreement2"), b"x".to_vec(), Timestamp::from_secs(3), TxId::new());

        assert_eq!(snapshot.version(), 1);
        assert_eq!(snapshot.get(&key).unwrap().unwrap().value, b"v1");
        assert_eq!(snapshot.scan_range(&Partition::Shared, "", "").unwrap().len(), 1);
        assert_eq!(snapshot.history(&key).unwrap().len(), 1);
    }

    #[test]
    fn test_snapshot_does_not_see_later_delete() {
        let store = Arc::new(VersionedStore::new());
        let key = Key::shared("Model1");
        store.put(key.clone(), b"m".to_vec(), Timestamp::from_secs(1), TxId::new());
        let snapshot = store.snapshot();
        store.delete(&key, Timestamp::from_secs(2), TxId::new());
        assert!(snapshot.get(&key).unwrap().is_some());
        assert!(store.get(&key).unwrap().is_none());
    }
}
