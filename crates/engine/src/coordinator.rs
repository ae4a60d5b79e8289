//! Transaction coordinator for managing transaction lifecycle
//!
//! The TransactionCoordinator wraps TransactionManager and adds:
//! - Snapshot acquisition and transaction start
//! - Transaction metrics (started, committed, aborted)
//! - Commit/abort logging

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use magnit_concurrency::{CommitOutcome, TransactionContext, TransactionManager};
use magnit_core::{LedgerEvent, MagnitError, MagnitResult, SnapshotView, Timestamp, TxId};
use magnit_storage::VersionedStore;
use tracing::{debug, info, warn};

/// Transaction coordinator for the database
///
/// # Memory Ordering
///
/// The metric counters use Relaxed ordering: they are observational only and
/// synchronize nothing else.
pub struct TransactionCoordinator {
    /// Version allocation and commit protocol
    manager: TransactionManager,
    /// Active transaction count
    active_count: AtomicU64,
    /// Total transactions started
    total_started: AtomicU64,
    /// Total transactions committed
    total_committed: AtomicU64,
    /// Total transactions aborted
    total_aborted: AtomicU64,
}

impl TransactionCoordinator {
    /// Create a coordinator whose next commit version follows `initial_version`
    pub fn new(initial_version: u64) -> Self {
        Self {
            manager: TransactionManager::new(initial_version),
            active_count: AtomicU64::new(0),
            total_started: AtomicU64::new(0),
            total_committed: AtomicU64::new(0),
            total_aborted: AtomicU64::new(0),
        }
    }

    /// Start a transaction on a fresh snapshot of `storage`
    pub fn start_transaction(
        &self,
        storage: &Arc<VersionedStore>,
        timestamp: Timestamp,
    ) -> TransactionContext {
        let snapshot = storage.snapshot();
        let tx_id = TxId::new();

        self.active_count.fetch_add(1, Ordering::Relaxed);
        self.total_started.fetch_add(1, Ordering::Relaxed);

        debug!(
            target: "magnit::txn",
            %tx_id,
            snapshot_version = snapshot.version(),
            "Transaction started"
        );

        TransactionContext::new(tx_id, timestamp, Box::new(snapshot))
    }

    /// Commit a transaction through the concurrency layer
    ///
    /// Records metrics and converts commit failures into [`MagnitError`]:
    /// validation failures become retryable `TransactionAborted`.
    pub fn commit(
        &self,
        txn: &mut TransactionContext,
        store: &VersionedStore,
    ) -> MagnitResult<CommitOutcome> {
        self.commit_then(txn, store, |_| {})
    }

    /// [`TransactionCoordinator::commit`], delivering events under the
    /// commit lock
    pub fn commit_then<F>(
        &self,
        txn: &mut TransactionContext,
        store: &VersionedStore,
        deliver: F,
    ) -> MagnitResult<CommitOutcome>
    where
        F: FnOnce(&[LedgerEvent]),
    {
        match self.manager.commit_then(txn, store, deliver) {
            Ok(outcome) => {
                self.record_commit();
                info!(
                    target: "magnit::txn",
                    tx_id = %txn.tx_id,
                    version = outcome.version,
                    writes = txn.write_count(),
                    deletes = txn.delete_count(),
                    events = outcome.events.len(),
                    "Transaction committed"
                );
                Ok(outcome)
            }
            Err(e) => {
                self.record_abort();
                warn!(target: "magnit::txn", tx_id = %txn.tx_id, error = %e, "Transaction aborted");
                Err(MagnitError::from(e))
            }
        }
    }

    /// Abort a transaction whose body failed
    pub fn abort(&self, txn: &mut TransactionContext, reason: &MagnitError) {
        let _ = self.manager.abort(txn, reason.to_string());
        self.record_abort();
        debug!(target: "magnit::txn", tx_id = %txn.tx_id, error = %reason, "Transaction rolled back");
    }

    fn record_commit(&self) {
        let _ = self
            .active_count
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |x| {
                Some(x.saturating_sub(1))
            });
        self.total_committed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_abort(&self) {
        let _ = self
            .active_count
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |x| {
                Some(x.saturating_sub(1))
            });
        self.total_aborted.fetch_add(1, Ordering::Relaxed);
    }

    /// Highest allocated commit version
    pub fn current_version(&self) -> u64 {
        self.manager.current_version()
    }

    /// Snapshot of transaction statistics
    pub fn metrics(&self) -> TransactionMetrics {
        let started = self.total_started.load(Ordering::Relaxed);
        let committed = self.total_committed.load(Ordering::Relaxed);

        TransactionMetrics {
            active_count: self.active_count.load(Ordering::Relaxed),
            total_started: started,
            total_committed: committed,
            total_aborted: self.total_aborted.load(Ordering::Relaxed),
            commit_rate: if started > 0 {
                committed as f64 / started as f64
            } else {
                0.0
            },
        }
    }
}

/// Transaction metrics
#[derive(Debug, Clone)]
pub struct TransactionMetrics {
    /// Number of currently active transactions
    pub active_count: u64,
    /// Total number of transactions started
    pub total_started: u64,
    /// Total number of transactions committed
    pub total_committed: u64,
    /// Total number of transactions aborted
    pub total_aborted: u64,
    /// Commit success rate (committed / started)
    pub commit_rate: f64,
}

impl TransactionMetrics {
    /// Total transactions that completed (committed + aborted)
    pub fn total_completed(&self) -> u64 {
        self.total_committed + self.total_aborted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magnit_core::Key;

    #[test]
    fn test_coordinator_new() {
        let coordinator = TransactionCoordinator::new(0);
        assert_eq!(coordinator.current_version(), 0);
        let metrics = coordinator.metrics();
        assert_eq!(metrics.total_started, 0);
        assert_eq!(metrics.commit_rate, 0.0);
    }

    #[test]
    fn test_metrics_track_commit_and_abort() {
        let storage = Arc::new(VersionedStore::new());
        let coordinator = TransactionCoordinator::new(0);

        let mut t1 = coordinator.start_transaction(&storage, Timestamp::EPOCH);
        t1.put(Key::shared("a"), b"1".to_vec()).unwrap();
        coordinator.commit(&mut t1, &storage).unwrap();

        let mut t2 = coordinator.start_transaction(&storage, Timestamp::EPOCH);
        coordinator.abort(&mut t2, &MagnitError::not_found("Agreement9"));

        let metrics = coordinator.metrics();
        assert_eq!(metrics.total_started, 2);
        assert_eq!(metrics.total_committed, 1);
        assert_eq!(metrics.total_aborted, 1);
        assert_eq!(metrics.active_count, 0);
        assert_eq!(metrics.total_completed(), 2);
        assert!(t2.is_aborted());
    }

    #[test]
    fn test_conflict_becomes_retryable_error() {
        let storage = Arc::new(VersionedStore::new());
        let coordinator = TransactionCoordinator::new(0);
        let key = Key::shared("ModelCounterNO");

        let mut t1 = coordinator.start_transaction(&storage, Timestamp::EPOCH);
        let mut t2 = coordinator.start_transaction(&storage, Timestamp::EPOCH);
        for txn in [&mut t1, &mut t2] {
            txn.get(&key).unwrap();
            txn.put(key.clone(), b"1".to_vec()).unwrap();
        }
        coordinator.commit(&mut t1, &storage).unwrap();
        let err = coordinator.commit(&mut t2, &storage).unwrap_err();
        assert!(err.is_retryable());
    }
}
