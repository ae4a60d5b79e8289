//! Concurrency layer for Magnit
//!
//! This crate implements optimistic concurrency control (OCC) with:
//! - TransactionContext: read/write/delete set tracking with read-your-writes
//! - Snapshot isolation through a version-bounded SnapshotView
//! - Read-set and range validation at commit time (first committer wins)
//! - TransactionManager: commit lock, version allocation, atomic apply
//! - LedgerStub implementation so licensing logic runs inside a transaction

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod manager;
pub mod stub;
pub mod transaction;
pub mod validation;

pub use manager::{CommitOutcome, TransactionManager};
pub use transaction::{ApplyResult, CommitError, RangeRead, TransactionContext, TransactionStatus};
pub use validation::{
    validate_range_reads, validate_read_set, validate_transaction, ConflictType, ValidationResult,
};
