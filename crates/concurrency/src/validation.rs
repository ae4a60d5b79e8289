//! Transaction validation for OCC
//!
//! Rules:
//! - First-committer-wins based on the READ-SET, not the write-set
//! - Blind writes (write without read) do not conflict
//! - A range scan conflicts if the set of live keys in the range, or any of
//!   their versions, changed since the scan (phantom protection)
//! - Validation must run under the manager's commit lock so nothing commits
//!   between validation and application

use crate::transaction::{RangeRead, TransactionContext};
use magnit_core::{Key, MagnitResult, Partition, Storage};
use std::collections::HashMap;

/// Conflicts detectable at commit time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictType {
    /// Key was read at one version but storage now holds another
    ReadWriteConflict {
        /// The key that has a conflict
        key: Key,
        /// Version recorded when read (0 = absent)
        read_version: u64,
        /// Current version in storage (0 = absent)
        current_version: u64,
    },

    /// A scanned range gained, lost, or changed a key
    PhantomRead {
        /// Partition scanned
        partition: Partition,
        /// Inclusive lower bound ("" = open)
        start: String,
        /// Exclusive upper bound ("" = open)
        end: String,
    },
}

impl ConflictType {
    /// Short description for logs and abort reasons
    pub fn describe(&self) -> String {
        match self {
            ConflictType::ReadWriteConflict {
                key,
                read_version,
                current_version,
            } => format!(
                "key {} changed (read v{}, now v{})",
                key, read_version, current_version
            ),
            ConflictType::PhantomRead {
                partition,
                start,
                end,
            } => format!("range [{:?}, {:?}) of {} changed", start, end, partition),
        }
    }
}

/// Outcome of validating a transaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Every conflict found
    pub conflicts: Vec<ConflictType>,
}

impl ValidationResult {
    /// A result with no conflicts
    pub fn ok() -> Self {
        Self::default()
    }

    /// Whether validation passed
    pub fn is_valid(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Number of conflicts found
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }

    /// Append another result's conflicts
    pub fn merge(&mut self, other: ValidationResult) {
        self.conflicts.extend(other.conflicts);
    }

    /// Conflicts joined into one line
    pub fn summary(&self) -> String {
        self.conflicts
            .iter()
            .map(ConflictType::describe)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Check every read against the current committed version
pub fn validate_read_set<S: Storage>(
    read_set: &HashMap<Key, u64>,
    store: &S,
) -> MagnitResult<ValidationResult> {
    let mut result = ValidationResult::ok();

    for (key, read_version) in read_set {
        let current_version = store.get(key)?.map(|vv| vv.version).unwrap_or(0);
        if current_version != *read_version {
            result.conflicts.push(ConflictType::ReadWriteConflict {
                key: key.clone(),
                read_version: *read_version,
                current_version,
            });
        }
    }

    Ok(result)
}

/// Re-run every recorded range scan and compare keys and versions
pub fn validate_range_reads<S: Storage>(
    range_reads: &[RangeRead],
    store: &S,
) -> MagnitResult<ValidationResult> {
    let mut result = ValidationResult::ok();
    let current = store.current_version();

    for range in range_reads {
        let now: Vec<(Key, u64)> = store
            .scan_range(&range.partition, &range.start, &range.end, current)?
            .into_iter()
            .map(|(key, vv)| (key, vv.version))
            .collect();
        if now != range.observed {
            result.conflicts.push(ConflictType::PhantomRead {
                partition: range.partition.clone(),
                start: range.start.clone(),
                end: range.end.clone(),
            });
        }
    }

    Ok(result)
}

/// Validate a transaction against current storage
pub fn validate_transaction<S: Storage>(
    txn: &TransactionContext,
    store: &S,
) -> MagnitResult<ValidationResult> {
    let mut result = validate_read_set(&txn.read_set, store)?;
    result.merge(validate_range_reads(&txn.range_reads, store)?);
    Ok(result)
}
