//! Error conversion from the core error type.

use crate::Error;
use magnit_core::{MagnitError, MagnitResult};

/// Convert a MagnitError to an executor Error.
///
/// Every detail is preserved; only the transaction abort is renamed to the
/// caller-facing conflict variant.
impl From<MagnitError> for Error {
    fn from(err: MagnitError) -> Self {
        match err {
            MagnitError::InvalidArgument { reason } => Error::InvalidInput { reason },
            MagnitError::NotFound { entity } => Error::NotFound { entity },
            MagnitError::Conflict { reason } => Error::Conflict { reason },
            MagnitError::QuotaExceeded {
                agreement_id,
                usage,
                limit,
            } => Error::QuotaExceeded {
                agreement_id,
                usage,
                limit,
            },
            MagnitError::Storage { message } => Error::Storage { reason: message },
            MagnitError::Serialization { message } => Error::Serialization { reason: message },
            MagnitError::TransactionAborted { reason } => Error::TransactionConflict { reason },
            MagnitError::TransactionNotActive { state } => Error::TransactionNotActive { state },
        }
    }
}

/// Convert a MagnitResult to an executor Result.
pub fn convert_result<T>(result: MagnitResult<T>) -> crate::Result<T> {
    result.map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_exceeded_keeps_numbers() {
        let converted: Error = MagnitError::quota_exceeded("Agreement1", 5, 5).into();
        match converted {
            Error::QuotaExceeded {
                agreement_id,
                usage,
                limit,
            } => {
                assert_eq!(agreement_id, "Agreement1");
                assert_eq!((usage, limit), (5, 5));
            }
            other => panic!("Expected QuotaExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_abort_becomes_transaction_conflict() {
        let converted: Error = MagnitError::transaction_aborted("read set stale").into();
        assert!(matches!(converted, Error::TransactionConflict { .. }));
    }

    #[test]
    fn test_kind_is_preserved() {
        let cases = vec![
            MagnitError::invalid_argument("x"),
            MagnitError::not_found("x"),
            MagnitError::conflict("x"),
            MagnitError::quota_exceeded("x", 1, 1),
            MagnitError::storage("x"),
            MagnitError::serialization("x"),
            MagnitError::transaction_aborted("x"),
        ];
        for err in cases {
            let kind = err.kind();
            assert_eq!(Error::from(err).kind(), kind);
        }
    }
}
