//! Identifier counters
//!
//! One counter per record category. Each is itself a ledger record stored in
//! the shared partition, so allocating an identifier is an ordinary
//! read-modify-write inside the creating transaction.

use super::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of records that draw identifiers from a counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterCategory {
    /// Model identifiers ("Model1", "Model2", ...)
    Model,
    /// Agreement identifiers ("Agreement1", ...)
    Agreement,
}

impl CounterCategory {
    /// Every category, in initialization order
    pub const ALL: [CounterCategory; 2] = [CounterCategory::Model, CounterCategory::Agreement];

    /// Shared-partition key holding this counter
    pub fn storage_key(&self) -> &'static str {
        match self {
            CounterCategory::Model => "ModelCounterNO",
            CounterCategory::Agreement => "AgreementCounterNO",
        }
    }

    /// Prefix of identifiers minted from this counter
    pub fn id_prefix(&self) -> &'static str {
        match self {
            CounterCategory::Model => "Model",
            CounterCategory::Agreement => "Agreement",
        }
    }

    /// Identifier for counter value `n`
    pub fn format_id(&self, n: u64) -> String {
        format!("{}{}", self.id_prefix(), n)
    }
}

impl fmt::Display for CounterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id_prefix())
    }
}

/// Stored form of a counter: `{"counter": n}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CounterRecord {
    /// Last value handed out (0 = none yet)
    pub counter: u64,
}

impl Record for CounterRecord {}
