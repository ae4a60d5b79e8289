//! Storage-layer version entry
//!
//! The contract type `VersionedValue` only describes live values. The store
//! also has to remember deletions so history can report them, so each entry
//! in a version chain is a `StoredValue` whose value may be a tombstone.

use magnit_core::{KeyModification, Timestamp, TxId, VersionedValue};

/// One committed version of a key, possibly a deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredValue {
    /// Record bytes, or None for a tombstone
    value: Option<Vec<u8>>,
    /// Commit version
    version: u64,
    /// Transaction time of the writer
    timestamp: Timestamp,
    /// Writer
    tx_id: TxId,
}

impl StoredValue {
    /// A live value
    pub fn live(value: Vec<u8>, version: u64, timestamp: Timestamp, tx_id: TxId) -> Self {
        Self {
            value: Some(value),
            version,
            timestamp,
            tx_id,
        }
    }

    /// A deletion marker
    pub fn tombstone(version: u64, timestamp: Timestamp, tx_id: TxId) -> Self {
        Self {
            value: None,
            version,
            timestamp,
            tx_id,
        }
    }

    /// Commit version
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether this entry records a deletion
    #[inline]
    pub fn is_tombstone(&self) -> bool {
        self.value.is_none()
    }

    /// Contract view of a live entry; None for a tombstone
    pub fn to_versioned(&self) -> Option<VersionedValue> {
        self.value
            .as_ref()
            .map(|v| VersionedValue::new(v.clone(), self.version, self.timestamp, self.tx_id))
    }

    /// History view of this entry
    pub fn to_modification(&self) -> KeyModification {
        match &self.value {
            Some(v) => KeyModification::write(self.tx_id, v.clone(), self.timestamp),
            None => KeyModification::delete(self.tx_id, self.timestamp),
        }
    }
}
