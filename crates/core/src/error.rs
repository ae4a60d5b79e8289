//! Error types for the Magnit ledger
//!
//! Every failure in the system is one of a small set of kinds. Domain
//! failures (bad arguments, missing records, occupied identifiers, exhausted
//! quota) come from the licensing logic; infrastructure failures (storage,
//! serialization, optimistic-concurrency aborts) come from the ledger below it.
//!
//! Any error returned from inside a transaction aborts that transaction. No
//! partial writes survive an error.

use crate::types::Key;
use thiserror::Error;

/// Result type alias for Magnit operations
pub type MagnitResult<T> = std::result::Result<T, MagnitError>;

/// Coarse classification of a [`MagnitError`]
///
/// This is the vocabulary callers match on. Infrastructure variants fold into
/// `StorageFailure` except for retryable transaction conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong arity, empty required field, malformed number or selector
    InvalidArgument,
    /// Referenced record does not exist
    NotFound,
    /// Identifier already occupied
    Conflict,
    /// Usage count reached the agreement's quota limit
    QuotaExceeded,
    /// Read, write or decode failure in the underlying ledger
    StorageFailure,
    /// Optimistic validation failed; the transaction may be retried
    TransactionConflict,
}

/// Errors produced by the ledger core and the reference ledger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MagnitError {
    /// Caller supplied an unusable argument
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong
        reason: String,
    },

    /// A record lookup found nothing
    #[error("{entity} not found")]
    NotFound {
        /// Human-readable description of the missing record
        entity: String,
    },

    /// A freshly allocated identifier is already in use
    #[error("conflict: {reason}")]
    Conflict {
        /// Which identifier collided
        reason: String,
    },

    /// Agreement has no remaining uses
    #[error("quota exceeded for {agreement_id}: {usage} of {limit} uses consumed")]
    QuotaExceeded {
        /// Agreement whose quota is exhausted
        agreement_id: String,
        /// Usage count observed
        usage: u64,
        /// Quota limit observed
        limit: u64,
    },

    /// Underlying ledger failed to read or write
    #[error("storage failure: {message}")]
    Storage {
        /// Failure detail
        message: String,
    },

    /// Stored bytes could not be encoded or decoded
    #[error("serialization error: {message}")]
    Serialization {
        /// Failure detail
        message: String,
    },

    /// Read set went stale before commit
    #[error("transaction aborted: {reason}")]
    TransactionAborted {
        /// Validation detail
        reason: String,
    },

    /// Operation attempted on a transaction that is no longer active
    #[error("transaction not active (state: {state})")]
    TransactionNotActive {
        /// State the transaction was in
        state: String,
    },
}

impl MagnitError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create an InvalidArgument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        MagnitError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(entity: impl Into<String>) -> Self {
        MagnitError::NotFound {
            entity: entity.into(),
        }
    }

    /// Create a NotFound error naming a storage key
    pub fn key_not_found(key: &Key) -> Self {
        MagnitError::NotFound {
            entity: format!("record {}", key),
        }
    }

    /// Create a Conflict error
    pub fn conflict(reason: impl Into<String>) -> Self {
        MagnitError::Conflict {
            reason: reason.into(),
        }
    }

    /// Create a QuotaExceeded error
    pub fn quota_exceeded(agreement_id: impl Into<String>, usage: u64, limit: u64) -> Self {
        MagnitError::QuotaExceeded {
            agreement_id: agreement_id.into(),
            usage,
            limit,
        }
    }

    /// Create a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        MagnitError::Storage {
            message: message.into(),
        }
    }

    /// Create a Serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        MagnitError::Serialization {
            message: message.into(),
        }
    }

    /// Create a TransactionAborted error
    pub fn transaction_aborted(reason: impl Into<String>) -> Self {
        MagnitError::TransactionAborted {
            reason: reason.into(),
        }
    }

    // =========================================================================
    // Classification
    // =========================================================================

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MagnitError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            MagnitError::NotFound { .. } => ErrorKind::NotFound,
            MagnitError::Conflict { .. } => ErrorKind::Conflict,
            MagnitError::QuotaExceeded { .. } => ErrorKind::QuotaExceeded,
            MagnitError::Storage { .. }
            | MagnitError::Serialization { .. }
            | MagnitError::TransactionNotActive { .. } => ErrorKind::StorageFailure,
            MagnitError::TransactionAborted { .. } => ErrorKind::TransactionConflict,
        }
    }

    /// Whether the failed transaction can be retried as-is
    ///
    /// Only optimistic-concurrency aborts qualify. Domain errors are
    /// deterministic and would fail again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MagnitError::TransactionAborted { .. })
    }

    /// Whether this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, MagnitError::NotFound { .. })
    }
}

impl From<serde_json::Error> for MagnitError {
    fn from(e: serde_json::Error) -> Self {
        MagnitError::Serialization {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quota_exceeded() {
        let err = MagnitError::quota_exceeded("Agreement1", 5, 5);
        let msg = err.to_string();
        assert!(msg.contains("Agreement1"));
        assert!(msg.contains("5 of 5"));
    }

    #[test]
    fn test_display_key_not_found() {
        let err = MagnitError::key_not_found(&Key::shared("Agreement9"));
        assert_eq!(err.to_string(), "record Agreement9 not found");
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            MagnitError::invalid_argument("x").kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(MagnitError::not_found("x").kind(), ErrorKind::NotFound);
        assert_eq!(MagnitError::conflict("x").kind(), ErrorKind::Conflict);
        assert_eq!(
            MagnitError::quota_exceeded("a", 1, 1).kind(),
            ErrorKind::QuotaExceeded
        );
        assert_eq!(MagnitError::storage("x").kind(), ErrorKind::StorageFailure);
        assert_eq!(
            MagnitError::serialization("x").kind(),
            ErrorKind::StorageFailure
        );
        assert_eq!(
            MagnitError::transaction_aborted("x").kind(),
            ErrorKind::TransactionConflict
        );
    }

    #[test]
    fn test_only_aborts_are_retryable() {
        assert!(MagnitError::transaction_aborted("stale read").is_retryable());
        assert!(!MagnitError::quota_exceeded("a", 3, 3).is_retryable());
        assert!(!MagnitError::conflict("Model1").is_retryable());
        assert!(!MagnitError::storage("disk").is_retryable());
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: MagnitError = parse_err.into();
        assert!(matches!(err, MagnitError::Serialization { .. }));
    }
}
