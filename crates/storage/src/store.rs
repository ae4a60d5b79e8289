//! VersionedStore: ordered multi-version storage backend
//!
//! This module implements the Storage trait using:
//! - `BTreeMap<Key, VersionChain>` so each partition is a contiguous key range
//! - `parking_lot::RwLock` for thread-safe access
//! - `AtomicU64` for the highest committed version
//!
//! # Design Notes
//!
//! - **Full history**: every committed version is kept, tombstones included
//! - **Batch application**: a commit's writes and deletes land under one
//!   write lock, so readers never observe half a transaction
//! - **Versions come from the caller**: the transaction manager allocates
//!   commit versions; the store only records them

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use magnit_core::{
    CommitBatch, Key, KeyModification, MagnitResult, Partition, Storage, Timestamp, TxId,
    VersionedValue,
};

use crate::chain::VersionChain;
use crate::snapshot::StoreSnapshot;
use crate::stored_value::StoredValue;

/// Multi-version ordered store
#[derive(Debug, Default)]
pub struct VersionedStore {
    /// Key → committed versions, newest first
    data: RwLock<BTreeMap<Key, VersionChain>>,
    /// Highest committed version
    version: AtomicU64,
}

impl VersionedStore {
    /// Create a new empty store at version 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a version-bounded view at the current version
    pub fn snapshot(self: &Arc<Self>) -> StoreSnapshot {
        StoreSnapshot::new(Arc::clone(self), self.current_version())
    }

    /// Number of keys ever written (deleted keys included)
    pub fn key_count(&self) -> usize {
        self.data.read().len()
    }

    /// Write a single key outside any transaction
    ///
    /// Allocates the next version itself. Intended for seeding and tests;
    /// transactional writers go through [`Storage::apply_batch`].
    pub fn put(&self, key: Key, value: Vec<u8>, timestamp: Timestamp, tx_id: TxId) -> u64 {
        let mut data = self.data.write();
        let version = self.version.load(Ordering::Acquire) + 1;
        Self::push_live(&mut data, key, value, version, timestamp, tx_id);
        self.version.store(version, Ordering::Release);
        version
    }

    /// Delete a single key outside any transaction
    pub fn delete(&self, key: &Key, timestamp: Timestamp, tx_id: TxId) -> u64 {
        let mut data = self.data.write();
        let version = self.version.load(Ordering::Acquire) + 1;
        Self::push_tombstone(&mut data, key, version, timestamp, tx_id);
        self.version.store(version, Ordering::Release);
        version
    }

    fn push_live(
        data: &mut BTreeMap<Key, VersionChain>,
        key: Key,
        value: Vec<u8>,
        version: u64,
        timestamp: Timestamp,
        tx_id: TxId,
    ) {
        let sv = StoredValue::live(value, version, timestamp, tx_id);
        match data.get_mut(&key) {
            Some(chain) => chain.push(sv),
            None => {
                data.insert(key, VersionChain::new(sv));
            }
        }
    }

    /// Tombstones are only recorded for keys that have a chain
    fn push_tombstone(
        data: &mut BTreeMap<Key, VersionChain>,
        key: &Key,
        version: u64,
        timestamp: Timestamp,
        tx_id: TxId,
    ) {
        if let Some(chain) = data.get_mut(key) {
            chain.push(StoredValue::tombstone(version, timestamp, tx_id));
        }
    }
}

impl Storage for VersionedStore {
    fn get(&self, key: &Key) -> MagnitResult<Option<VersionedValue>> {
        let data = self.data.read();
        Ok(data
            .get(key)
            .and_then(|chain| chain.latest())
            .and_then(StoredValue::to_versioned))
    }

    fn get_versioned(&self, key: &Key, max_version: u64) -> MagnitResult<Option<VersionedValue>> {
        let data = self.data.read();
        Ok(data.get(key).and_then(|chain| chain.live_at(max_version)))
    }

    fn scan_range(
        &self,
        partition: &Partition,
        start: &str,
        end: &str,
        max_version: u64,
    ) -> MagnitResult<Vec<(Key, VersionedValue)>> {
        let data = self.data.read();
        let lower = Key::new(partition.clone(), start);
        let results = data
            .range(lower..)
            .take_while(|(key, _)| {
                &key.partition == partition && (end.is_empty() || key.user_key.as_str() < end)
            })
            .filter_map(|(key, chain)| chain.live_at(max_version).map(|vv| (key.clone(), vv)))
            .collect();
        Ok(results)
    }

    fn history(&self, key: &Key, max_version: u64) -> MagnitResult<Vec<KeyModification>> {
        let data = self.data.read();
        Ok(data
            .get(key)
            .map(|chain| chain.history(max_version))
            .unwrap_or_default())
    }

    fn current_version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    fn apply_batch(&self, batch: CommitBatch) -> MagnitResult<()> {
        let CommitBatch {
            writes,
            deletes,
            version,
            timestamp,
            tx_id,
        } = batch;

        let mut data = self.data.write();
        debug_assert!(
            version > self.version.load(Ordering::Acquire),
            "commit versions must increase"
        );
        let (n_writes, n_deletes) = (writes.len(), deletes.len());
        for (key, value) in writes {
            Self::push_live(&mut data, key, value, version, timestamp, tx_id);
        }
        for key in &deletes {
            Self::push_tombstone(&mut data, key, version, timestamp, tx_id);
        }
        self.version.fetch_max(version, Ordering::AcqRel);

        trace!(
            target: "magnit::storage",
            version,
            %tx_id,
            writes = n_writes,
            deletes = n_deletes,
            "Applied commit batch"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: u64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    fn batch(version: u64, writes: Vec<(Key, &str)>, deletes: Vec<Key>) -> CommitBatch {
        CommitBatch {
            writes: writes
                .into_iter()
                .map(|(k, v)| (k, v.as_bytes().to_vec()))
                .collect(),
            deletes,
            version,
            timestamp: ts(version),
            tx_id: TxId::new(),
        }
    }

    #[test]
    fn test_store_creation() {
        let store = VersionedStore::new();
        assert_eq!(store.current_version(), 0);
        assert_eq!(store.key_count(), 0);
    }

    #[test]
    fn test_put_and_get() {
        let store = VersionedStore::new();
        let key = Key::shared("Model1");
        let v = store.put(key.clone(), b"{}".to_vec(), ts(1), TxId::new());
        assert_eq!(v, 1);
        let got = store.get(&key).unwrap().unwrap();
        assert_eq!(got.value, b"{}");
        assert_eq!(got.version, 1);
    }

    #[test]
    fn test_apply_batch_is_atomic_and_versioned() {
        let store = VersionedStore::new();
        store
            .apply_batch(batch(
                1,
                vec![(Key::shared("a"), "1"), (Key::shared("b"), "2")],
                vec![],
            ))
            .unwrap();
        assert_eq!(store.current_version(), 1);
        assert_eq!(store.get(&Key::shared("a")).unwrap().unwrap().version, 1);
        assert_eq!(store.get(&Key::shared("b")).unwrap().unwrap().version, 1);
    }

    #[test]
    fn test_delete_leaves_history() {
        let store = VersionedStore::new();
        let key = Key::shared("Agreement1");
        store.put(key.clone(), b"v1".to_vec(), ts(1), TxId::new());
        store.put(key.clone(), b"v2".to_vec(), ts(2), TxId::new());
        store.delete(&key, ts(3), TxId::new());

        assert!(store.get(&key).unwrap().is_none());
        let history = store.history(&key, u64::MAX).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].value.as_deref(), Some(&b"v1"[..]));
        assert_eq!(history[1].value.as_deref(), Some(&b"v2"[..]));
        assert!(history[2].is_delete);
        assert_eq!(history[2].timestamp, ts(3));
    }

    #[test]
    fn test_delete_of_unknown_key_records_nothing() {
        let store = VersionedStore::new();
        let key = Key::shared("ghost");
        store.delete(&key, ts(1), TxId::new());
        assert!(store.history(&key, u64::MAX).unwrap().is_empty());
    }

    #[test]
    fn test_get_versioned_sees_past() {
        let store = VersionedStore::new();
        let key = Key::shared("k");
        store.put(key.clone(), b"old".to_vec(), ts(1), TxId::new());
        store.put(key.clone(), b"new".to_vec(), ts(2), TxId::new());
        assert_eq!(store.get_versioned(&key, 1).unwrap().unwrap().value, b"old");
        assert_eq!(store.get_versioned(&key, 2).unwrap().unwrap().value, b"new");
    }

    #[test]
    fn test_scan_range_bounds_and_order() {
        let store = VersionedStore::new();
        for k in ["Agreement2", "Agreement1", "Model1", "AgreementCounterNO"] {
            store.put(Key::shared(k), k.as_bytes().to_vec(), ts(1), TxId::new());
        }
        let all = store.scan_range(&Partition::Shared, "", "", u64::MAX).unwrap();
        let keys: Vec<&str> = all.iter().map(|(k, _)| k.user_key()).collect();
        assert_eq!(
            keys,
            vec!["Agreement1", "Agreement2", "AgreementCounterNO", "Model1"]
        );

        let bounded = store
            .scan_range(&Partition::Shared, "Agreement2", "Model1", u64::MAX)
            .unwrap();
        let keys: Vec<&str> = bounded.iter().map(|(k, _)| k.user_key()).collect();
        assert_eq!(keys, vec!["Agreement2", "AgreementCounterNO"]);
    }

    #[test]
    fn test_scan_range_stays_in_partition() {
        let store = VersionedStore::new();
        store.put(Key::shared("a"), b"1".to_vec(), ts(1), TxId::new());
        store.put(
            Key::restricted("collectionModel", "Model1"),
            b"2".to_vec(),
            ts(1),
            TxId::new(),
        );
        let shared = store.scan_range(&Partition::Shared, "", "", u64::MAX).unwrap();
        assert_eq!(shared.len(), 1);
        let restricted = store
            .scan_range(&Partition::restricted("collectionModel"), "", "", u64::MAX)
            .unwrap();
        assert_eq!(restricted.len(), 1);
        assert_eq!(restricted[0].0.user_key(), "Model1");
    }

    #[test]
    fn test_scan_range_skips_deleted_and_future() {
        let store = VersionedStore::new();
        store.put(Key::shared("a"), b"1".to_vec(), ts(1), TxId::new());
        store.put(Key::shared("b"), b"2".to_vec(), ts(2), TxId::new());
        store.delete(&Key::shared("a"), ts(3), TxId::new());

        let now = store.scan_range(&Partition::Shared, "", "", u64::MAX).unwrap();
        assert_eq!(now.len(), 1);
        let at_v1 = store.scan_range(&Partition::Shared, "", "", 1).unwrap();
        assert_eq!(at_v1.len(), 1);
        assert_eq!(at_v1[0].0.user_key(), "a");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use std::collections::BTreeMap as Model;

        fn op() -> impl Strategy<Value = (bool, u8, u8)> {
            (any::<bool>(), 0u8..6, any::<u8>())
        }

        proptest! {
            /// A full scan always equals a plain map fed the same operations
            #[test]
            fn scan_matches_last_write(ops in prop::collection::vec(op(), 0..40)) {
                let store = VersionedStore::new();
                let mut model = Model::new();
                for (i, (is_put, k, v)) in ops.into_iter().enumerate() {
                    let key = format!("k{}", k);
                    let t = ts(i as u64 + 1);
                    if is_put {
                        store.put(Key::shared(&key), vec![v], t, TxId::new());
                        model.insert(key, vec![v]);
                    } else {
                        store.delete(&Key::shared(&key), t, TxId::new());
                        model.remove(&key);
                    }
                }
                let scanned: Vec<(String, Vec<u8>)> = store
                    .scan_range(&Partition::Shared, "", "", u64::MAX)
                    .unwrap()
                    .into_iter()
                    .map(|(k, v)| (k.user_key().to_string(), v.value))
                    .collect();
                let expected: Vec<(String, Vec<u8>)> = model.into_iter().collect();
                prop_assert_eq!(scanned, expected);
            }
        }
    }

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VersionedStore>();
    }
}
