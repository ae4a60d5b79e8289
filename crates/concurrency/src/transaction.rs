//! Transaction context for OCC
//!
//! TransactionContext tracks every read, range scan, write, delete and
//! staged event of one transaction, so the manager can validate it and apply
//! it atomically at commit time.
//!
//! Reads go to a snapshot taken at transaction start, overlaid with the
//! transaction's own buffered writes (read-your-writes). Nothing reaches
//! storage until commit.

use crate::validation::{validate_transaction, ValidationResult};
use magnit_core::{
    CommitBatch, Key, KeyModification, LedgerEvent, MagnitError, MagnitResult, Partition,
    SnapshotView, Storage, Timestamp, TxId,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Error type for commit failures
///
/// A transaction either commits entirely or aborts entirely.
#[derive(Debug, Clone, Error)]
pub enum CommitError {
    /// Read set or a scanned range went stale
    #[error("commit failed: {} conflict(s)", .0.conflict_count())]
    ValidationFailed(ValidationResult),

    /// Transaction was not in the right state to commit
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Storage rejected the batch
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<CommitError> for MagnitError {
    fn from(e: CommitError) -> Self {
        match e {
            CommitError::ValidationFailed(result) => {
                MagnitError::transaction_aborted(format!("validation failed: {}", result.summary()))
            }
            CommitError::InvalidState(state) => MagnitError::TransactionNotActive { state },
            CommitError::Storage(message) => MagnitError::storage(message),
        }
    }
}

/// Result of applying a transaction's writes to storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    /// Version assigned to every change in the transaction
    pub commit_version: u64,
    /// Number of writes applied
    pub puts_applied: usize,
    /// Number of deletes applied
    pub deletes_applied: usize,
}

/// Lifecycle of a transaction
///
/// Active → Validating → Committed, or Active/Validating → Aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Accepting reads and writes
    Active,
    /// Commit in progress
    Validating,
    /// Writes applied
    Committed,
    /// Discarded
    Aborted {
        /// Why the transaction aborted
        reason: String,
    },
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Active => write!(f, "active"),
            TransactionStatus::Validating => write!(f, "validating"),
            TransactionStatus::Committed => write!(f, "committed"),
            TransactionStatus::Aborted { reason } => write!(f, "aborted ({})", reason),
        }
    }
}

/// A range scan performed through the snapshot
///
/// `observed` holds the live keys and versions the snapshot returned, before
/// the transaction's own writes were overlaid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRead {
    /// Partition scanned
    pub partition: Partition,
    /// Inclusive lower bound ("" = open)
    pub start: String,
    /// Exclusive upper bound ("" = open)
    pub end: String,
    /// Keys and versions seen
    pub observed: Vec<(Key, u64)>,
}

/// State of one in-flight transaction
pub struct TransactionContext {
    /// Ledger-visible identifier
    pub tx_id: TxId,
    /// Snapshot version reads are served from
    pub start_version: u64,
    /// Deterministic transaction time
    pub timestamp: Timestamp,
    /// Keys read and the version seen (0 = absent)
    pub read_set: HashMap<Key, u64>,
    /// Range scans performed
    pub range_reads: Vec<RangeRead>,
    /// Buffered writes
    pub write_set: BTreeMap<Key, Vec<u8>>,
    /// Buffered deletes
    pub delete_set: HashSet<Key>,
    /// Events staged for delivery after commit
    pub events: Vec<LedgerEvent>,
    /// Current lifecycle state
    pub status: TransactionStatus,
    snapshot: Box<dyn SnapshotView>,
    start_time: Instant,
}

impl std::fmt::Debug for TransactionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionContext")
            .field("tx_id", &self.tx_id)
            .field("start_version", &self.start_version)
            .field("status", &self.status)
            .field("reads", &self.read_set.len())
            .field("writes", &self.write_set.len())
            .field("deletes", &self.delete_set.len())
            .finish()
    }
}

impl TransactionContext {
    /// Start a transaction reading from `snapshot` at time `timestamp`
    pub fn new(tx_id: TxId, timestamp: Timestamp, snapshot: Box<dyn SnapshotView>) -> Self {
        Self {
            tx_id,
            start_version: snapshot.version(),
            timestamp,
            read_set: HashMap::new(),
            range_reads: Vec::new(),
            write_set: BTreeMap::new(),
            delete_set: HashSet::new(),
            events: Vec::new(),
            status: TransactionStatus::Active,
            snapshot,
            start_time: Instant::now(),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Read a key, observing this transaction's own writes
    ///
    /// Snapshot reads are recorded in the read set for validation.
    pub fn get(&mut self, key: &Key) -> MagnitResult<Option<Vec<u8>>> {
        self.ensure_active()?;

        if self.delete_set.contains(key) {
            return Ok(None);
        }
        if let Some(value) = self.write_set.get(key) {
            return Ok(Some(value.clone()));
        }

        let versioned = self.snapshot.get(key)?;
        let version = versioned.as_ref().map(|vv| vv.version).unwrap_or(0);
        self.read_set.entry(key.clone()).or_insert(version);
        Ok(versioned.map(|vv| vv.value))
    }

    /// Live entries of a partition with `start <= user_key < end`
    ///
    /// Results are in key order and include this transaction's own writes.
    pub fn scan_range(
        &mut self,
        partition: &Partition,
        start: &str,
        end: &str,
    ) -> MagnitResult<Vec<(String, Vec<u8>)>> {
        self.ensure_active()?;

        let snapshot_entries = self.snapshot.scan_range(partition, start, end)?;
        self.range_reads.push(RangeRead {
            partition: partition.clone(),
            start: start.to_string(),
            end: end.to_string(),
            observed: snapshot_entries
                .iter()
                .map(|(key, vv)| (key.clone(), vv.version))
                .collect(),
        });

        let mut merged: BTreeMap<String, Vec<u8>> = snapshot_entries
            .into_iter()
            .map(|(key, vv)| (key.user_key, vv.value))
            .collect();

        let in_range = |key: &Key| {
            &key.partition == partition
                && key.user_key.as_str() >= start
                && (end.is_empty() || key.user_key.as_str() < end)
        };
        for (key, value) in self.write_set.iter().filter(|(k, _)| in_range(k)) {
            merged.insert(key.user_key.clone(), value.clone());
        }
        for key in self.delete_set.iter().filter(|k| in_range(k)) {
            merged.remove(&key.user_key);
        }

        Ok(merged.into_iter().collect())
    }

    /// Committed history of a key as of the snapshot, oldest first
    pub fn history(&self, key: &Key) -> MagnitResult<Vec<KeyModification>> {
        self.ensure_active()?;
        self.snapshot.history(key)
    }

    /// Version recorded for a key in the read set
    pub fn get_read_version(&self, key: &Key) -> Option<u64> {
        self.read_set.get(key).copied()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Buffer a write
    pub fn put(&mut self, key: Key, value: Vec<u8>) -> MagnitResult<()> {
        self.ensure_active()?;
        self.delete_set.remove(&key);
        self.write_set.insert(key, value);
        Ok(())
    }

    /// Buffer a delete
    pub fn delete(&mut self, key: Key) -> MagnitResult<()> {
        self.ensure_active()?;
        self.write_set.remove(&key);
        self.delete_set.insert(key);
        Ok(())
    }

    /// Stage an event for delivery after commit
    pub fn emit_event(&mut self, name: &str, payload: Vec<u8>) -> MagnitResult<()> {
        self.ensure_active()?;
        if name.is_empty() {
            return Err(MagnitError::invalid_argument("event name must not be empty"));
        }
        self.events.push(LedgerEvent {
            name: name.to_string(),
            payload,
            tx_id: self.tx_id,
            timestamp: self.timestamp,
        });
        Ok(())
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Whether the transaction accepts operations
    pub fn is_active(&self) -> bool {
        self.status == TransactionStatus::Active
    }

    /// Whether the transaction committed
    pub fn is_committed(&self) -> bool {
        self.status == TransactionStatus::Committed
    }

    /// Whether the transaction aborted
    pub fn is_aborted(&self) -> bool {
        matches!(self.status, TransactionStatus::Aborted { .. })
    }

    /// Abort reason, if aborted
    pub fn abort_reason(&self) -> Option<&str> {
        match &self.status {
            TransactionStatus::Aborted { reason } => Some(reason),
            _ => None,
        }
    }

    /// Error unless Active
    pub fn ensure_active(&self) -> MagnitResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(MagnitError::TransactionNotActive {
                state: self.status.to_string(),
            })
        }
    }

    /// Discard the transaction
    ///
    /// Buffered writes and staged events are dropped. Aborting a committed
    /// transaction is an error; aborting twice is not.
    pub fn mark_aborted(&mut self, reason: impl Into<String>) -> MagnitResult<()> {
        match self.status {
            TransactionStatus::Committed => Err(MagnitError::TransactionNotActive {
                state: self.status.to_string(),
            }),
            TransactionStatus::Aborted { .. } => Ok(()),
            _ => {
                self.write_set.clear();
                self.delete_set.clear();
                self.events.clear();
                self.status = TransactionStatus::Aborted {
                    reason: reason.into(),
                };
                Ok(())
            }
        }
    }

    /// Whether nothing would be written or published on commit
    pub fn is_read_only(&self) -> bool {
        self.write_set.is_empty() && self.delete_set.is_empty() && self.events.is_empty()
    }

    /// Time since the transaction started
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Number of keys read
    pub fn read_count(&self) -> usize {
        self.read_set.len()
    }

    /// Number of buffered writes
    pub fn write_count(&self) -> usize {
        self.write_set.len()
    }

    /// Number of buffered deletes
    pub fn delete_count(&self) -> usize {
        self.delete_set.len()
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Validate against current storage and mark committed
    ///
    /// Active → Validating → Committed on success, Aborted on conflict.
    /// Read-only transactions skip validation. The caller must hold the
    /// commit lock until [`TransactionContext::apply_writes`] returns.
    pub fn commit<S: Storage>(&mut self, store: &S) -> Result<(), CommitError> {
        if !self.is_active() {
            return Err(CommitError::InvalidState(self.status.to_string()));
        }
        self.status = TransactionStatus::Validating;

        if !self.is_read_only() {
            let result = match validate_transaction(self, store) {
                Ok(result) => result,
                Err(e) => {
                    self.status = TransactionStatus::Aborted {
                        reason: e.to_string(),
                    };
                    return Err(CommitError::Storage(e.to_string()));
                }
            };
            if !result.is_valid() {
                self.status = TransactionStatus::Aborted {
                    reason: result.summary(),
                };
                return Err(CommitError::ValidationFailed(result));
            }
        }

        self.status = TransactionStatus::Committed;
        Ok(())
    }

    /// Apply buffered writes and deletes at `commit_version`
    pub fn apply_writes<S: Storage>(
        &self,
        store: &S,
        commit_version: u64,
    ) -> MagnitResult<ApplyResult> {
        if !self.is_committed() {
            return Err(MagnitError::TransactionNotActive {
                state: self.status.to_string(),
            });
        }
        let batch = CommitBatch {
            writes: self
                .write_set
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            deletes: self.delete_set.iter().cloned().collect(),
            version: commit_version,
            timestamp: self.timestamp,
            tx_id: self.tx_id,
        };
        let result = ApplyResult {
            commit_version,
            puts_applied: batch.writes.len(),
            deletes_applied: batch.deletes.len(),
        };
        store.apply_batch(batch)?;
        Ok(result)
    }

    /// Take the staged events, leaving none behind
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }
}
