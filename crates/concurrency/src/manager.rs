//! Transaction manager for coordinating commit operations
//!
//! ## Commit Sequence
//!
//! ```text
//! 1. take commit lock
//! 2. txn.commit()       - Active → Validating → Committed, or Aborted
//! 3. allocate version   - skipped for read-only transactions
//! 4. apply_writes()     - batch lands in storage atomically
//! 5. deliver(events)    - only through `commit_then`
//! 6. release lock, return version and staged events
//! ```
//!
//! Holding one lock from validation through application means no other
//! transaction can commit between the two, so a validated read set is still
//! current when its writes become visible.

use crate::{CommitError, TransactionContext, TransactionStatus};
use magnit_core::{LedgerEvent, MagnitResult, Storage};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::error;

/// Outcome of a successful commit
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    /// Version the writes were applied at; the unchanged current version for
    /// read-only transactions
    pub version: u64,
    /// Events the transaction staged, ready for delivery
    pub events: Vec<LedgerEvent>,
}

/// Manages version allocation and atomic commits
pub struct TransactionManager {
    /// Global version counter
    ///
    /// Monotonically increasing. Each committing writer increments by 1.
    version: AtomicU64,

    /// Serializes validate-and-apply
    commit_lock: Mutex<()>,
}

impl TransactionManager {
    /// Create a manager starting at `initial_version`
    pub fn new(initial_version: u64) -> Self {
        TransactionManager {
            version: AtomicU64::new(initial_version),
            commit_lock: Mutex::new(()),
        }
    }

    /// Highest allocated version
    pub fn current_version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Allocate the next commit version
    pub fn allocate_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Validate and apply a transaction
    ///
    /// On success the transaction is Committed and its staged events are
    /// returned. On validation failure it is Aborted and nothing was written.
    pub fn commit<S: Storage>(
        &self,
        txn: &mut TransactionContext,
        store: &S,
    ) -> Result<CommitOutcome, CommitError> {
        self.commit_then(txn, store, |_| {})
    }

    /// Validate and apply a transaction, then hand its events to `deliver`
    /// before the commit lock is released
    ///
    /// `deliver` runs only for a successful commit. Because it runs under the
    /// lock, successive callers observe events in commit-version order.
    pub fn commit_then<S, F>(
        &self,
        txn: &mut TransactionContext,
        store: &S,
        deliver: F,
    ) -> Result<CommitOutcome, CommitError>
    where
        S: Storage,
        F: FnOnce(&[LedgerEvent]),
    {
        let _guard = self.commit_lock.lock();

        txn.commit(store)?;

        if txn.write_count() == 0 && txn.delete_count() == 0 {
            let events = txn.take_events();
            deliver(&events);
            return Ok(CommitOutcome {
                version: self.current_version(),
                events,
            });
        }

        let commit_version = self.allocate_version();
        if let Err(e) = txn.apply_writes(store, commit_version) {
            error!(
                target: "magnit::txn",
                tx_id = %txn.tx_id,
                commit_version,
                error = %e,
                "Storage rejected validated commit batch"
            );
            txn.status = TransactionStatus::Aborted {
                reason: format!("storage apply failed: {}", e),
            };
            return Err(CommitError::Storage(e.to_string()));
        }

        let events = txn.take_events();
        deliver(&events);
        Ok(CommitOutcome {
            version: commit_version,
            events,
        })
    }

    /// Explicitly abort a transaction
    pub fn abort(&self, txn: &mut TransactionContext, reason: impl Into<String>) -> MagnitResult<()> {
        txn.mark_aborted(reason)
    }
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new(0)
    }
}
