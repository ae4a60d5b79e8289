//! Core traits for storage, snapshots and the ledger primitive interface
//!
//! `Storage` and `SnapshotView` describe the versioned store the reference
//! ledger runs on. `LedgerStub` is the narrow interface the licensing logic
//! consumes: everything it knows about the ledger goes through these calls.

use crate::contract::{KeyModification, Timestamp, VersionedValue};
use crate::error::MagnitResult;
use crate::types::{Key, Partition, TxId};

/// Writes and deletes produced by one committed transaction
///
/// Applied atomically: readers see all of the batch or none of it.
#[derive(Debug, Clone)]
pub struct CommitBatch {
    /// Keys written with their new values
    pub writes: Vec<(Key, Vec<u8>)>,
    /// Keys removed
    pub deletes: Vec<Key>,
    /// Commit version assigned to every change in the batch
    pub version: u64,
    /// Transaction time of the writer
    pub timestamp: Timestamp,
    /// Transaction that produced the batch
    pub tx_id: TxId,
}

impl CommitBatch {
    /// Whether the batch changes nothing
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.deletes.is_empty()
    }
}

/// Versioned key-value store
///
/// Thread safety: all methods must be safe to call concurrently.
pub trait Storage: Send + Sync {
    /// Latest live value for key; None if absent or deleted
    fn get(&self, key: &Key) -> MagnitResult<Option<VersionedValue>>;

    /// Latest live value with version <= max_version
    fn get_versioned(&self, key: &Key, max_version: u64) -> MagnitResult<Option<VersionedValue>>;

    /// Live entries of one partition with `start <= user_key < end`
    ///
    /// An empty bound is unbounded on that side. Results are in key order.
    fn scan_range(
        &self,
        partition: &Partition,
        start: &str,
        end: &str,
        max_version: u64,
    ) -> MagnitResult<Vec<(Key, VersionedValue)>>;

    /// Every committed change to key with version <= max_version, oldest first
    fn history(&self, key: &Key, max_version: u64) -> MagnitResult<Vec<KeyModification>>;

    /// Highest committed version
    fn current_version(&self) -> u64;

    /// Apply a committed batch atomically
    fn apply_batch(&self, batch: CommitBatch) -> MagnitResult<()>;
}

/// Read-only view of the store frozen at one version
pub trait SnapshotView: Send + Sync {
    /// Live value for key as of this snapshot
    fn get(&self, key: &Key) -> MagnitResult<Option<VersionedValue>>;

    /// Range scan as of this snapshot (see [`Storage::scan_range`])
    fn scan_range(
        &self,
        partition: &Partition,
        start: &str,
        end: &str,
    ) -> MagnitResult<Vec<(Key, VersionedValue)>>;

    /// Key history as of this snapshot, oldest first
    fn history(&self, key: &Key) -> MagnitResult<Vec<KeyModification>>;

    /// Version this snapshot is frozen at
    fn version(&self) -> u64;
}

/// One entry yielded by a range scan or selector query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryEntry {
    /// Shared-partition key
    pub key: String,
    /// Record bytes
    pub value: Vec<u8>,
}

/// One-shot sequence of query results
pub type StateIterator = Box<dyn Iterator<Item = MagnitResult<QueryEntry>> + Send>;

/// One-shot sequence of key modifications, oldest first
pub type HistoryIterator = Box<dyn Iterator<Item = MagnitResult<KeyModification>> + Send>;

/// Primitive interface to the ledger inside one transaction
///
/// Shared-partition calls take bare keys; restricted calls name the
/// collection. Reads observe the transaction's own uncommitted writes.
/// Any error returned here should be propagated so the transaction aborts.
pub trait LedgerStub {
    /// Read a shared record
    fn get_state(&mut self, key: &str) -> MagnitResult<Option<Vec<u8>>>;

    /// Stage a shared write
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> MagnitResult<()>;

    /// Stage a shared delete
    fn del_state(&mut self, key: &str) -> MagnitResult<()>;

    /// Read a record from a restricted collection
    fn get_private_data(&mut self, collection: &str, key: &str) -> MagnitResult<Option<Vec<u8>>>;

    /// Stage a write into a restricted collection
    fn put_private_data(&mut self, collection: &str, key: &str, value: Vec<u8>)
        -> MagnitResult<()>;

    /// Stage a delete from a restricted collection
    fn del_private_data(&mut self, collection: &str, key: &str) -> MagnitResult<()>;

    /// Shared records with `start <= key < end`; empty bounds are open
    fn get_state_by_range(&mut self, start: &str, end: &str) -> MagnitResult<StateIterator>;

    /// Shared records matching a JSON selector query
    fn get_query_result(&mut self, query: &str) -> MagnitResult<StateIterator>;

    /// Committed history of one shared key, oldest first
    fn get_history_for_key(&mut self, key: &str) -> MagnitResult<HistoryIterator>;

    /// Attach a named event, delivered only if the transaction commits
    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> MagnitResult<()>;

    /// Deterministic time of the current transaction
    fn tx_timestamp(&self) -> Timestamp;

    /// Identifier of the current transaction
    fn tx_id(&self) -> TxId;
}
