//! Command enum defining all licensing operations.
//!
//! A command is the typed form of an invocation: the operation plus its
//! arguments, already split into named fields. Commands are plain data,
//! serializable for callers that prefer JSON over positional strings.

use magnit_core::{CounterCategory, NewAgreement};
use serde::{Deserialize, Serialize};

use crate::bridge;
use crate::{Error, Operation, Result};

/// A self-contained, serializable licensing operation.
///
/// # Example
///
/// ```ignore
/// use magnit_executor::Command;
///
/// let cmd = Command::CreateModel {
///     name: "resnet".into(),
///     upload_org: "Org1".into(),
/// };
///
/// // Same command from a positional invocation
/// let parsed = Command::from_invocation("initmodel", &["resnet".into(), "Org1".into()])?;
/// assert_eq!(cmd, parsed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    // ==================== Counters ====================
    /// Create missing counters.
    /// Returns: `Output::Counters`
    Init,

    /// Read a counter.
    /// Returns: `Output::Counter`
    PeekCounter { category: CounterCategory },

    /// Overwrite a counter.
    /// Returns: `Output::Counter`
    SetCounter { category: CounterCategory, value: u64 },

    // ==================== Models ====================
    /// Register a model.
    /// Returns: `Output::ModelId`
    CreateModel { name: String, upload_org: String },

    /// Read a model.
    /// Returns: `Output::Model`
    GetModel { model_id: String },

    // ==================== Agreements ====================
    /// Issue an agreement.
    /// Returns: `Output::AgreementId`
    CreateAgreement { agreement: NewAgreement },

    /// Read an agreement.
    /// Returns: `Output::Agreement`
    GetAgreement { agreement_id: String },

    /// Consume one use of an agreement.
    /// Returns: `Output::Model`
    ConsumeAgreement { agreement_id: String },

    /// Change an agreement's status.
    /// Returns: `Output::Agreement`
    ApproveAgreement { agreement_id: String, status: String },

    /// Delete a record by key.
    /// Returns: `Output::Unit`
    DeleteRecord { key: String },

    // ==================== Queries ====================
    /// Every shared record.
    /// Returns: `Output::Records`
    ListAll,

    /// Shared records with `start <= key < end`.
    /// Returns: `Output::Records`
    ListRange { start: String, end: String },

    /// Every agreement.
    /// Returns: `Output::Agreements`
    ListAgreements,

    /// Committed history of one key.
    /// Returns: `Output::History`
    History { key: String },
}

impl Command {
    /// Operation this command performs
    pub fn operation(&self) -> Operation {
        match self {
            Command::Init => Operation::Init,
            Command::PeekCounter { .. } => Operation::PeekCounter,
            Command::SetCounter { .. } => Operation::SetCounter,
            Command::CreateModel { .. } => Operation::CreateModel,
            Command::GetModel { .. } => Operation::GetModel,
            Command::CreateAgreement { .. } => Operation::CreateAgreement,
            Command::GetAgreement { .. } => Operation::GetAgreement,
            Command::ConsumeAgreement { .. } => Operation::ConsumeAgreement,
            Command::ApproveAgreement { .. } => Operation::ApproveAgreement,
            Command::DeleteRecord { .. } => Operation::DeleteRecord,
            Command::ListAll => Operation::ListAll,
            Command::ListRange { .. } => Operation::ListRange,
            Command::ListAgreements => Operation::ListAgreements,
            Command::History { .. } => Operation::History,
        }
    }

    /// Parse a positional invocation
    ///
    /// # Errors
    ///
    /// - `UnknownOperation` if `function` names no operation
    /// - `InvalidInput` on wrong arity or an unparseable argument
    pub fn from_invocation(function: &str, args: &[String]) -> Result<Command> {
        let operation: Operation = function.parse()?;
        Self::from_operation(operation, args)
    }

    /// Build a command for a resolved operation
    pub fn from_operation(operation: Operation, args: &[String]) -> Result<Command> {
        operation.check_arity(args)?;
        let arg = |i: usize| args[i].clone();

        let cmd = match operation {
            Operation::Init => Command::Init,
            Operation::PeekCounter => Command::PeekCounter {
                category: bridge::parse_category(&args[0])?,
            },
            Operation::SetCounter => Command::SetCounter {
                category: bridge::parse_category(&args[0])?,
                value: bridge::parse_counter_value(&args[1])?,
            },
            Operation::CreateModel => Command::CreateModel {
                name: arg(0),
                upload_org: arg(1),
            },
            Operation::GetModel => Command::GetModel { model_id: arg(0) },
            Operation::CreateAgreement => Command::CreateAgreement {
                agreement: NewAgreement::from_args(args).ok_or_else(|| Error::InvalidInput {
                    reason: format!("expected {} agreement fields", NewAgreement::ARITY),
                })?,
            },
            Operation::GetAgreement => Command::GetAgreement {
                agreement_id: arg(0),
            },
            Operation::ConsumeAgreement => Command::ConsumeAgreement {
                agreement_id: arg(0),
            },
            Operation::ApproveAgreement => Command::ApproveAgreement {
                agreement_id: arg(0),
                status: arg(1),
            },
            Operation::DeleteRecord => Command::DeleteRecord { key: arg(0) },
            Operation::ListAll => Command::ListAll,
            Operation::ListRange => Command::ListRange {
                start: arg(0),
                end: arg(1),
            },
            Operation::ListAgreements => Command::ListAgreements,
            Operation::History => Command::History { key: arg(0) },
        };
        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_create_model() {
        let cmd = Command::from_invocation("initmodel", &args(&["resnet", "Org1"])).unwrap();
        assert_eq!(
            cmd,
            Command::CreateModel {
                name: "resnet".into(),
                upload_org: "Org1".into()
            }
        );
        assert_eq!(cmd.operation(), Operation::CreateModel);
    }

    #[test]
    fn test_parse_create_agreement_positional() {
        let cmd = Command::from_invocation(
            "createAgreement",
            &args(&["n", "Model1", "5", "Org1", "Org2", "r", "u", "ISSUED", "h"]),
        )
        .unwrap();
        match cmd {
            Command::CreateAgreement { agreement } => {
                assert_eq!(agreement.model_id, "Model1");
                assert_eq!(agreement.quota_limit, "5");
                assert_eq!(agreement.content_hash, "h");
            }
            other => panic!("Expected CreateAgreement, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_arity_rejected() {
        let err = Command::from_invocation("createAgreement", &args(&["n", "Model1"])).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
        let err = Command::from_invocation("listAll", &args(&["extra"])).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn test_set_counter_rejects_sentinel() {
        let err = Command::from_invocation("setCounter", &args(&["model", "-1"])).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
        let cmd = Command::from_invocation("setCounter", &args(&["AgreementCounterNO", "12"]))
            .unwrap();
        assert_eq!(
            cmd,
            Command::SetCounter {
                category: CounterCategory::Agreement,
                value: 12
            }
        );
    }

    #[test]
    fn test_json_form() {
        let cmd = Command::ConsumeAgreement {
            agreement_id: "Agreement1".into(),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"ConsumeAgreement":{"agreement_id":"Agreement1"}}"#);
        assert!(serde_json::from_str::<Command>(
            r#"{"ConsumeAgreement":{"agreement_id":"Agreement1","extra":1}}"#
        )
        .is_err());
    }
}
