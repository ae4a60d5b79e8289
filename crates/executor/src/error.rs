//! Error types for command execution.
//!
//! All errors from command execution are represented by the [`Error`] enum.
//! Each variant carries typed fields so callers can react without parsing
//! messages, and the enum serializes for transport to remote callers.

use magnit_core::ErrorKind;
use serde::{Deserialize, Serialize};

/// Command execution errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Validation | `InvalidInput`, `UnknownOperation` | Bad invocation |
/// | Not Found | `NotFound` | Model, agreement or key absent |
/// | State | `Conflict`, `QuotaExceeded` | Ledger state forbids the change |
/// | Transaction | `TransactionConflict`, `TransactionNotActive` | Commit failures |
/// | System | `Storage`, `Serialization` | Infrastructure errors |
///
/// # Example
///
/// ```ignore
/// match executor.invoke("consumeAgreement", &["Agreement1".into()]) {
///     Ok(output) => { /* model returned */ }
///     Err(Error::QuotaExceeded { agreement_id, .. }) => {
///         println!("{} is used up", agreement_id);
///     }
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Validation ====================
    /// Wrong arity, empty required argument, malformed value
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Function name matches no operation
    #[error("unknown operation: {name}")]
    UnknownOperation { name: String },

    // ==================== Not Found ====================
    /// Referenced record is absent
    #[error("not found: {entity}")]
    NotFound { entity: String },

    // ==================== State ====================
    /// Identifier already occupied
    #[error("conflict: {reason}")]
    Conflict { reason: String },

    /// Agreement usage has reached its limit
    #[error("quota exceeded for {agreement_id}: {usage} of {limit} used")]
    QuotaExceeded {
        agreement_id: String,
        usage: u64,
        limit: u64,
    },

    // ==================== Transaction ====================
    /// Concurrent commit won; retries exhausted
    #[error("transaction conflict: {reason}")]
    TransactionConflict { reason: String },

    /// Transaction was no longer active
    #[error("transaction not active: {state}")]
    TransactionNotActive { state: String },

    // ==================== System ====================
    /// Underlying storage failed
    #[error("storage error: {reason}")]
    Storage { reason: String },

    /// Stored bytes could not be decoded
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl Error {
    /// Classification shared with the core error type
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput { .. } | Error::UnknownOperation { .. } => {
                ErrorKind::InvalidArgument
            }
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Conflict { .. } => ErrorKind::Conflict,
            Error::QuotaExceeded { .. } => ErrorKind::QuotaExceeded,
            Error::TransactionConflict { .. } => ErrorKind::TransactionConflict,
            Error::TransactionNotActive { .. }
            | Error::Storage { .. }
            | Error::Serialization { .. } => ErrorKind::StorageFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::QuotaExceeded {
            agreement_id: "Agreement1".into(),
            usage: 5,
            limit: 5,
        };
        assert_eq!(err.to_string(), "quota exceeded for Agreement1: 5 of 5 used");
    }

    #[test]
    fn test_json_shape() {
        let err = Error::NotFound {
            entity: "model Model9".into(),
        };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"NotFound":{"entity":"model Model9"}}"#);
        let back: Error = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            Error::UnknownOperation { name: "x".into() }.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            Error::Serialization { reason: "x".into() }.kind(),
            ErrorKind::StorageFailure
        );
    }
}
