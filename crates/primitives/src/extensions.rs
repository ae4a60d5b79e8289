//! Transaction extension traits for the licensing primitives
//!
//! Each trait is implemented for every [`LedgerStub`], so several primitives
//! can take part in one transaction:
//!
//! ```rust,ignore
//! use magnit_primitives::extensions::*;
//!
//! db.execute(|txn| {
//!     let n = txn.counter_allocate(CounterCategory::Agreement)?;
//!     let model = txn.model_get(&policy.model_collection, "Model1")?;
//!     txn.notify_agreement_issued(&CounterCategory::Agreement.format_id(n))?;
//!     Ok(model)
//! })?;
//! ```
//!
//! Bodies run once per attempt and may be retried after a conflict, so the
//! implementations do no logging or other side effects outside the stub.
//!
//! [`LedgerStub`]: magnit_core::LedgerStub

use magnit_core::{Agreement, CounterCategory, MagnitResult, Model, NewAgreement};

use crate::policy::LedgerPolicy;
use crate::query::{HistoryEntry, ListEntry};

/// Identifier counters within a transaction
///
/// Implemented in `counter.rs`
pub trait CounterExt {
    /// Current value, 0 if the counter was never written
    fn counter_peek(&mut self, category: CounterCategory) -> MagnitResult<u64>;

    /// Advance by one and return the new value
    fn counter_allocate(&mut self, category: CounterCategory) -> MagnitResult<u64>;

    /// Overwrite unconditionally and return the new value
    fn counter_set(&mut self, category: CounterCategory, value: u64) -> MagnitResult<u64>;

    /// Create missing counters at 0 and return every counter's value
    fn counter_init(&mut self) -> MagnitResult<Vec<(CounterCategory, u64)>>;
}

/// Model registry within a transaction
///
/// Implemented in `model_registry.rs`
pub trait ModelRegistryExt {
    /// Create a model in `collection` under a freshly allocated ID
    fn model_create(&mut self, collection: &str, name: &str, upload_org: &str)
        -> MagnitResult<Model>;

    /// Load a model from `collection`
    fn model_get(&mut self, collection: &str, model_id: &str) -> MagnitResult<Model>;
}

/// Agreement ledger within a transaction
///
/// Implemented in `agreement_ledger.rs`
pub trait AgreementLedgerExt {
    /// Issue an agreement against an existing model
    fn agreement_create(
        &mut self,
        policy: &LedgerPolicy,
        new: NewAgreement,
    ) -> MagnitResult<Agreement>;

    /// Load an agreement
    fn agreement_get(&mut self, agreement_id: &str) -> MagnitResult<Agreement>;

    /// Consume one use and return the licensed model
    fn agreement_consume(&mut self, policy: &LedgerPolicy, agreement_id: &str)
        -> MagnitResult<Model>;

    /// Change an agreement's status
    fn agreement_approve(
        &mut self,
        policy: &LedgerPolicy,
        agreement_id: &str,
        new_status: &str,
    ) -> MagnitResult<Agreement>;

    /// Remove whatever record lives at `key`
    fn record_delete(&mut self, policy: &LedgerPolicy, key: &str) -> MagnitResult<()>;
}

/// Read-only queries within a transaction
///
/// Implemented in `query.rs`
pub trait QueryExt {
    /// Every shared record with `start <= key < end` (empty = open)
    fn query_range(&mut self, start: &str, end: &str) -> MagnitResult<Vec<ListEntry>>;

    /// Every agreement record
    fn query_agreements(&mut self) -> MagnitResult<Vec<Agreement>>;

    /// Committed history of one shared key, oldest first
    fn query_history(&mut self, key: &str) -> MagnitResult<Vec<HistoryEntry>>;
}

/// Lifecycle notifications within a transaction
///
/// Implemented in `notification.rs`
pub trait NotificationExt {
    /// Announce a newly issued agreement
    fn notify_agreement_issued(&mut self, agreement_id: &str) -> MagnitResult<()>;

    /// Announce that an agreement was consumed
    fn notify_agreement_consumed(&mut self, agreement_id: &str) -> MagnitResult<()>;
}
