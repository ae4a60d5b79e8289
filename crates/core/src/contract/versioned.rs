//! Committed values and their history
//!
//! Every write produces a new committed version of a key. Reads return the
//! newest version visible to the reader as a [`VersionedValue`]; history
//! queries return every version, deletions included, as [`KeyModification`]s.

use super::Timestamp;
use crate::types::TxId;
use serde::{Deserialize, Serialize};

/// A live value with its commit metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedValue {
    /// Record bytes (JSON)
    pub value: Vec<u8>,
    /// Global commit version that wrote this value
    pub version: u64,
    /// Transaction time of the writer
    pub timestamp: Timestamp,
    /// Transaction that wrote this value
    pub tx_id: TxId,
}

impl VersionedValue {
    /// Create a versioned value
    pub fn new(value: Vec<u8>, version: u64, timestamp: Timestamp, tx_id: TxId) -> Self {
        Self {
            value,
            version,
            timestamp,
            tx_id,
        }
    }
}

/// One committed change to a key
///
/// `value` is `None` exactly when `is_delete` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyModification {
    /// Transaction that made the change
    pub tx_id: TxId,
    /// Value written, or None for a deletion
    pub value: Option<Vec<u8>>,
    /// Transaction time of the change
    pub timestamp: Timestamp,
    /// Whether the change removed the key
    pub is_delete: bool,
}

impl KeyModification {
    /// A write of `value`
    pub fn write(tx_id: TxId, value: Vec<u8>, timestamp: Timestamp) -> Self {
        Self {
            tx_id,
            value: Some(value),
            timestamp,
            is_delete: false,
        }
    }

    /// A deletion
    pub fn delete(tx_id: TxId, timestamp: Timestamp) -> Self {
        Self {
            tx_id,
            value: None,
            timestamp,
            is_delete: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_has_no_value() {
        let m = KeyModification::delete(TxId::new(), Timestamp::from_secs(1));
        assert!(m.is_delete);
        assert!(m.value.is_none());
    }

    #[test]
    fn test_write_carries_value() {
        let m = KeyModification::write(TxId::new(), b"{}".to_vec(), Timestamp::from_secs(1));
        assert!(!m.is_delete);
        assert_eq!(m.value.as_deref(), Some(&b"{}"[..]));
    }
}
