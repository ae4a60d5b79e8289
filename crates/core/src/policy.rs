//! Ledger policies selected by configuration
//!
//! - [`NumericParsing`]: how decimal count fields stored as strings are read
//! - [`StatusPolicy`]: whether agreement status is a free label or a lifecycle
//! - [`AgreementStatus`]: the lifecycle states and their allowed transitions

use crate::error::{MagnitError, MagnitResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parsing mode for `quotaLimit` and `usageCount`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericParsing {
    /// Unparseable values are rejected with InvalidArgument
    #[default]
    Strict,
    /// Unparseable values are logged and read as zero
    Lenient,
}

/// Validation mode for agreement status labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Any non-empty label, any transition
    #[default]
    FreeForm,
    /// Labels restricted to [`AgreementStatus`] with checked transitions
    Lifecycle,
}

/// Agreement lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgreementStatus {
    /// Created, awaiting confirmation
    Issued,
    /// Confirmed by the participant
    Approved,
    /// Declined by the participant
    Rejected,
    /// Withdrawn after approval
    Revoked,
}

impl AgreementStatus {
    /// Canonical upper-case label
    pub fn as_str(&self) -> &'static str {
        match self {
            AgreementStatus::Issued => "ISSUED",
            AgreementStatus::Approved => "APPROVED",
            AgreementStatus::Rejected => "REJECTED",
            AgreementStatus::Revoked => "REVOKED",
        }
    }

    /// Whether `self -> next` is an allowed transition
    pub fn can_transition_to(&self, next: AgreementStatus) -> bool {
        matches!(
            (self, next),
            (AgreementStatus::Issued, AgreementStatus::Approved)
                | (AgreementStatus::Issued, AgreementStatus::Rejected)
                | (AgreementStatus::Approved, AgreementStatus::Revoked)
        )
    }

    /// Whether no transition leaves this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgreementStatus::Rejected | AgreementStatus::Revoked)
    }
}

impl fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgreementStatus {
    type Err = MagnitError;

    /// Case-insensitive parse
    fn from_str(s: &str) -> MagnitResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ISSUED" => Ok(AgreementStatus::Issued),
            "APPROVED" => Ok(AgreementStatus::Approved),
            "REJECTED" => Ok(AgreementStatus::Rejected),
            "REVOKED" => Ok(AgreementStatus::Revoked),
            _ => Err(MagnitError::invalid_argument(format!(
                "unknown agreement status '{}'",
                s
            ))),
        }
    }
}

impl StatusPolicy {
    /// Validate and normalize the status given at agreement creation
    pub fn initial_status(&self, requested: &str) -> MagnitResult<String> {
        match self {
            StatusPolicy::FreeForm => Ok(requested.to_string()),
            StatusPolicy::Lifecycle => {
                let status: AgreementStatus = requested.parse()?;
                if status != AgreementStatus::Issued {
                    return Err(MagnitError::invalid_argument(format!(
                        "agreements must be created as {}, got {}",
                        AgreementStatus::Issued,
                        status
                    )));
                }
                Ok(status.as_str().to_string())
            }
        }
    }

    /// Validate and normalize a status change
    pub fn transition(&self, current: &str, requested: &str) -> MagnitResult<String> {
        match self {
            StatusPolicy::FreeForm => Ok(requested.to_string()),
            StatusPolicy::Lifecycle => {
                let from: AgreementStatus = current.parse()?;
                let to: AgreementStatus = requested.parse()?;
                if !from.can_transition_to(to) {
                    return Err(MagnitError::invalid_argument(format!(
                        "status transition {} -> {} is not allowed",
                        from, to
                    )));
                }
                Ok(to.as_str().to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(NumericParsing::default(), NumericParsing::Strict);
        assert_eq!(StatusPolicy::default(), StatusPolicy::FreeForm);
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(
            "approved".parse::<AgreementStatus>().unwrap(),
            AgreementStatus::Approved
        );
        assert_eq!(
            " Issued ".parse::<AgreementStatus>().unwrap(),
            AgreementStatus::Issued
        );
        assert!("pending".parse::<AgreementStatus>().is_err());
    }

    #[test]
    fn test_transition_table() {
        use AgreementStatus::*;
        assert!(Issued.can_transition_to(Approved));
        assert!(Issued.can_transition_to(Rejected));
        assert!(Approved.can_transition_to(Revoked));
        assert!(!Approved.can_transition_to(Issued));
        assert!(!Rejected.can_transition_to(Approved));
        assert!(!Issued.can_transition_to(Issued));
        assert!(Revoked.is_terminal());
        assert!(!Approved.is_terminal());
    }

    #[test]
    fn test_free_form_accepts_anything() {
        let p = StatusPolicy::FreeForm;
        assert_eq!(p.initial_status("whatever").unwrap(), "whatever");
        assert_eq!(p.transition("whatever", "confirmed").unwrap(), "confirmed");
    }

    #[test]
    fn test_lifecycle_normalizes_and_checks() {
        let p = StatusPolicy::Lifecycle;
        assert_eq!(p.initial_status("issued").unwrap(), "ISSUED");
        assert!(p.initial_status("APPROVED").is_err());
        assert_eq!(p.transition("ISSUED", "approved").unwrap(), "APPROVED");
        assert!(p.transition("REVOKED", "APPROVED").is_err());
    }

    #[test]
    fn test_policy_serde_names() {
        let json = serde_json::to_string(&StatusPolicy::FreeForm).unwrap();
        assert_eq!(json, "\"free_form\"");
        let p: NumericParsing = serde_json::from_str("\"lenient\"").unwrap();
        assert_eq!(p, NumericParsing::Lenient);
    }
}
