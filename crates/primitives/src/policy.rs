//! Policy bundle threaded through the licensing operations

use magnit_core::{MagnitError, MagnitResult, NumericParsing, StatusPolicy};
use magnit_engine::MagnitConfig;
use tracing::warn;

/// Configuration the licensing operations consult
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerPolicy {
    /// Restricted collection holding model records
    pub model_collection: String,
    /// Parsing of stored count strings
    pub numeric: NumericParsing,
    /// Status label handling
    pub status: StatusPolicy,
}

impl LedgerPolicy {
    /// Extract the policy from a ledger configuration
    pub fn from_config(config: &MagnitConfig) -> Self {
        Self {
            model_collection: config.model_collection.clone(),
            numeric: config.numeric_parsing,
            status: config.status_policy,
        }
    }

    /// Parse a stored count field of `agreement_id`
    ///
    /// Strict mode rejects anything but a plain non-negative decimal. Lenient
    /// mode logs the bad value and reads it as 0.
    pub fn parse_count(&self, agreement_id: &str, field: &str, raw: &str) -> MagnitResult<u64> {
        match raw.parse::<u64>() {
            Ok(n) => Ok(n),
            Err(e) => match self.numeric {
                NumericParsing::Strict => Err(MagnitError::invalid_argument(format!(
                    "{} of {} is not a non-negative integer: '{}'",
                    field, agreement_id, raw
                ))),
                NumericParsing::Lenient => {
                    warn!(
                        target: "magnit::agreement",
                        agreement_id,
                        field,
                        value = raw,
                        error = %e,
                        "Unparseable count read as 0"
                    );
                    Ok(0)
                }
            },
        }
    }
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self::from_config(&MagnitConfig::default())
    }
}
