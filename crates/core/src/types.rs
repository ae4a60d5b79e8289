//! Core types for the Magnit ledger
//!
//! This module defines the foundational addressing types:
//! - Partition: visibility class of a record (shared or restricted collection)
//! - Key: composite storage key (partition + user key)
//! - TxId: ledger-visible transaction identifier

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Visibility class of a stored record
///
/// Shared records are visible to every participant and are what range scans,
/// selector queries and history walk over. Restricted records live in a named
/// collection visible only to the collection's members.
///
/// Ordering: Shared < Restricted, restricted collections ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Partition {
    /// World state visible to all participants
    Shared,
    /// Named private collection
    Restricted(String),
}

impl Partition {
    /// Restricted partition for a named collection
    pub fn restricted(collection: impl Into<String>) -> Self {
        Partition::Restricted(collection.into())
    }

    /// Whether this is the shared partition
    pub fn is_shared(&self) -> bool {
        matches!(self, Partition::Shared)
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partition::Shared => write!(f, "shared"),
            Partition::Restricted(name) => write!(f, "restricted:{}", name),
        }
    }
}

/// Composite storage key
///
/// Keys order by partition first, then by user key, so every partition is a
/// contiguous range of the store and range scans never cross partitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key {
    /// Partition the record belongs to
    pub partition: Partition,
    /// Caller-visible key string (e.g. "Model1", "AgreementCounterNO")
    pub user_key: String,
}

impl Key {
    /// Create a key in an explicit partition
    pub fn new(partition: Partition, user_key: impl Into<String>) -> Self {
        Self {
            partition,
            user_key: user_key.into(),
        }
    }

    /// Create a key in the shared partition
    pub fn shared(user_key: impl Into<String>) -> Self {
        Self::new(Partition::Shared, user_key)
    }

    /// Create a key in a restricted collection
    pub fn restricted(collection: impl Into<String>, user_key: impl Into<String>) -> Self {
        Self::new(Partition::restricted(collection), user_key)
    }

    /// The user-visible key string
    pub fn user_key(&self) -> &str {
        &self.user_key
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.partition {
            Partition::Shared => write!(f, "{}", self.user_key),
            Partition::Restricted(name) => write!(f, "{}/{}", name, self.user_key),
        }
    }
}

/// Ledger-visible transaction identifier
///
/// Rendered as 32 lowercase hex characters. Recorded on every committed
/// version so history entries can name the transaction that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(Uuid);

impl TxId {
    /// Create a new random TxId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a TxId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Get the raw bytes of this TxId
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for TxId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_sorts_before_restricted() {
        let shared = Key::shared("zzz");
        let restricted = Key::restricted("collectionModel", "aaa");
        assert!(shared < restricted);
    }

    #[test]
    fn test_keys_within_partition_sort_by_user_key() {
        let a = Key::shared("Agreement1");
        let b = Key::shared("Agreement2");
        let m = Key::shared("Model1");
        assert!(a < b);
        assert!(b < m);
    }

    #[test]
    fn test_lexicographic_not_numeric_order() {
        assert!(Key::shared("Agreement10") < Key::shared("Agreement2"));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::shared("Model1").to_string(), "Model1");
        assert_eq!(
            Key::restricted("collectionModel", "Model1").to_string(),
            "collectionModel/Model1"
        );
    }

    #[test]
    fn test_txid_display_is_hex() {
        let id = TxId::from_bytes([0xab; 16]);
        let s = id.to_string();
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c == 'a' || c == 'b'));
    }

    #[test]
    fn test_txids_are_unique() {
        assert_ne!(TxId::new(), TxId::new());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn key() -> impl Strategy<Value = Key> {
            (prop::option::of("[ab]"), "[A-Za-z0-9]{0,6}").prop_map(|(coll, k)| match coll {
                Some(c) => Key::restricted(c, k),
                None => Key::shared(k),
            })
        }

        proptest! {
            /// Sorting keeps every partition contiguous and ordered by user key
            #[test]
            fn partitions_stay_contiguous(mut keys in prop::collection::vec(key(), 0..30)) {
                keys.sort();
                let mut seen: Vec<&Partition> = Vec::new();
                for pair in keys.windows(2) {
                    if pair[0].partition == pair[1].partition {
                        prop_assert!(pair[0].user_key <= pair[1].user_key);
                    }
                }
                for k in &keys {
                    if seen.last() != Some(&&k.partition) {
                        prop_assert!(!seen.contains(&&k.partition));
                        seen.push(&k.partition);
                    }
                }
            }
        }
    }
}
