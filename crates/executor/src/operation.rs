//! Closed set of invocable operations
//!
//! An invocation arrives as a function name plus positional string
//! arguments. The name is resolved to an [`Operation`] once, and everything
//! after that is an exhaustive match. Both the canonical names and the names
//! used by earlier deployments of the ledger are accepted.

use std::fmt;
use std::str::FromStr;

use magnit_core::NewAgreement;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Every operation the executor can dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Create missing counters
    Init,
    /// Register a model
    CreateModel,
    /// Read a model
    GetModel,
    /// Issue an agreement
    CreateAgreement,
    /// Read an agreement
    GetAgreement,
    /// Consume one use of an agreement and return its model
    ConsumeAgreement,
    /// Change an agreement's status
    ApproveAgreement,
    /// Delete a record by key
    DeleteRecord,
    /// List every shared record
    ListAll,
    /// List shared records in a key range
    ListRange,
    /// List every agreement
    ListAgreements,
    /// History of one key
    History,
    /// Read a counter
    PeekCounter,
    /// Overwrite a counter
    SetCounter,
}

impl Operation {
    /// Every operation
    pub const ALL: [Operation; 14] = [
        Operation::Init,
        Operation::CreateModel,
        Operation::GetModel,
        Operation::CreateAgreement,
        Operation::GetAgreement,
        Operation::ConsumeAgreement,
        Operation::ApproveAgreement,
        Operation::DeleteRecord,
        Operation::ListAll,
        Operation::ListRange,
        Operation::ListAgreements,
        Operation::History,
        Operation::PeekCounter,
        Operation::SetCounter,
    ];

    /// Canonical invocation name
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Init => "init",
            Operation::CreateModel => "createModel",
            Operation::GetModel => "getModel",
            Operation::CreateAgreement => "createAgreement",
            Operation::GetAgreement => "getAgreement",
            Operation::ConsumeAgreement => "consumeAgreement",
            Operation::ApproveAgreement => "approveAgreement",
            Operation::DeleteRecord => "deleteRecord",
            Operation::ListAll => "listAll",
            Operation::ListRange => "listRange",
            Operation::ListAgreements => "listAgreements",
            Operation::History => "history",
            Operation::PeekCounter => "peekCounter",
            Operation::SetCounter => "setCounter",
        }
    }

    /// Name accepted for compatibility with earlier deployments, if any
    pub fn legacy_name(&self) -> Option<&'static str> {
        match self {
            Operation::Init => Some("Init"),
            Operation::CreateModel => Some("initmodel"),
            Operation::GetModel => Some("queryByModelId"),
            Operation::CreateAgreement => Some("insertAgreementinfo"),
            Operation::GetAgreement => Some("queryByAgreementID"),
            Operation::ConsumeAgreement => Some("queryModelByAgreementID"),
            Operation::DeleteRecord => Some("del"),
            Operation::ListAll => Some("queryAllAsset"),
            Operation::ListAgreements => Some("queryAllAgreements"),
            Operation::History => Some("getHistoryForRecord"),
            Operation::ApproveAgreement
            | Operation::ListRange
            | Operation::PeekCounter
            | Operation::SetCounter => None,
        }
    }

    /// Number of positional arguments
    pub fn arity(&self) -> usize {
        match self {
            Operation::Init | Operation::ListAll | Operation::ListAgreements => 0,
            Operation::GetModel
            | Operation::GetAgreement
            | Operation::ConsumeAgreement
            | Operation::DeleteRecord
            | Operation::History
            | Operation::PeekCounter => 1,
            Operation::CreateModel
            | Operation::ApproveAgreement
            | Operation::ListRange
            | Operation::SetCounter => 2,
            Operation::CreateAgreement => NewAgreement::ARITY,
        }
    }

    /// Whether the operation writes to the ledger
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Operation::Init
                | Operation::CreateModel
                | Operation::CreateAgreement
                | Operation::ConsumeAgreement
                | Operation::ApproveAgreement
                | Operation::DeleteRecord
                | Operation::SetCounter
        )
    }

    /// Reject an argument list of the wrong length
    pub fn check_arity(&self, args: &[String]) -> Result<(), Error> {
        let expected = self.arity();
        if args.len() != expected {
            return Err(Error::InvalidInput {
                reason: format!(
                    "incorrect number of arguments for {}: expected {}, got {}",
                    self.name(),
                    expected,
                    args.len()
                ),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.name() == s || op.legacy_name() == Some(s))
            .ok_or_else(|| Error::UnknownOperation {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_resolve() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
            if let Some(legacy) = op.legacy_name() {
                assert_eq!(legacy.parse::<Operation>().unwrap(), op);
            }
        }
    }

    #[test]
    fn test_legacy_names() {
        assert_eq!(
            "queryModelByAgreementID".parse::<Operation>().unwrap(),
            Operation::ConsumeAgreement
        );
        assert_eq!("del".parse::<Operation>().unwrap(), Operation::DeleteRecord);
        assert_eq!("Init".parse::<Operation>().unwrap(), Operation::Init);
    }

    #[test]
    fn test_unknown_name() {
        let err = "transferAgreement".parse::<Operation>().unwrap_err();
        assert!(matches!(err, Error::UnknownOperation { name } if name == "transferAgreement"));
        // Names are case-sensitive
        assert!("CREATEMODEL".parse::<Operation>().is_err());
    }

    #[test]
    fn test_arity_check() {
        let args = vec!["a".to_string()];
        assert!(Operation::GetModel.check_arity(&args).is_ok());
        assert!(Operation::CreateModel.check_arity(&args).is_err());
        assert_eq!(Operation::CreateAgreement.arity(), 9);
    }

    #[test]
    fn test_write_classification() {
        assert!(Operation::ConsumeAgreement.is_write());
        assert!(!Operation::History.is_write());
    }
}
