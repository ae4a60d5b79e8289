//! Bridge module: primitive handles and argument parsing.
//!
//! - [`Primitives`]: one handle per licensing primitive over a shared database
//! - [`parse_category`]: counter names as accepted on the invocation surface
//! - [`parse_counter_value`]: counter values, rejecting the `-1` sentinel

use std::sync::Arc;

use magnit_core::CounterCategory;
use magnit_engine::Database;
use magnit_primitives::{AgreementLedger, Counters, ModelRegistry, RecordQuery};

use crate::{Error, Result};

// =============================================================================
// Primitives
// =============================================================================

/// Direct access to the licensing primitives.
#[derive(Clone)]
pub struct Primitives {
    /// The underlying database
    pub db: Arc<Database>,
    /// Identifier counters
    pub counters: Counters,
    /// Model registry
    pub models: ModelRegistry,
    /// Agreement ledger
    pub agreements: AgreementLedger,
    /// Read-only queries
    pub query: RecordQuery,
}

impl Primitives {
    /// Create primitives from a database instance.
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            counters: Counters::new(db.clone()),
            models: ModelRegistry::new(db.clone()),
            agreements: AgreementLedger::new(db.clone()),
            query: RecordQuery::new(db.clone()),
            db,
        }
    }
}

// =============================================================================
// Argument parsing
// =============================================================================

/// Resolve a counter name
///
/// Accepts the category name in any case or the counter's storage key.
pub fn parse_category(s: &str) -> Result<CounterCategory> {
    CounterCategory::ALL
        .iter()
        .copied()
        .find(|c| c.id_prefix().eq_ignore_ascii_case(s) || c.storage_key() == s)
        .ok_or_else(|| Error::InvalidInput {
            reason: format!("unknown counter '{}'", s),
        })
}

/// Parse a counter value
pub fn parse_counter_value(s: &str) -> Result<u64> {
    s.parse::<u64>().map_err(|_| Error::InvalidInput {
        reason: format!("counter value must be a non-negative integer, got '{}'", s),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("model").unwrap(), CounterCategory::Model);
        assert_eq!(parse_category("Agreement").unwrap(), CounterCategory::Agreement);
        assert_eq!(
            parse_category("ModelCounterNO").unwrap(),
            CounterCategory::Model
        );
        assert!(parse_category("license").is_err());
    }

    #[test]
    fn test_parse_counter_value() {
        assert_eq!(parse_counter_value("0").unwrap(), 0);
        assert!(parse_counter_value("-1").is_err());
        assert!(parse_counter_value("ten").is_err());
    }
}
