//! Licensing primitives for Magnit
//!
//! This crate implements the licensing operations on top of the engine's
//! transactions:
//! - **Counters**: gap-free identifier allocation per record category
//! - **ModelRegistry**: models in a restricted collection
//! - **AgreementLedger**: agreements with quota enforcement and status changes
//! - **RecordQuery**: range scans, agreement listing and key history
//! - **Notifications**: events staged for delivery after commit
//!
//! ## Design Principles
//!
//! 1. **Stub-generic**: every operation is an extension trait implemented for
//!    any `LedgerStub`, so the logic does not depend on the ledger behind it.
//! 2. **One transaction per call**: the facades run each operation through
//!    `Database::execute`, which retries on commit conflicts.
//! 3. **Composable**: extension traits let a caller combine several
//!    operations in one transaction.
//!
//! ## Example
//!
//! ```rust,ignore
//! use magnit_primitives::{AgreementLedger, ModelRegistry};
//!
//! let db = Database::ephemeral();
//! let model = ModelRegistry::new(db.clone()).create("resnet", "Org1")?;
//! let ledger = AgreementLedger::new(db.clone());
//! let agreement = ledger.create(new_agreement)?;
//! let licensed = ledger.consume(&agreement.agreement_id)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod agreement_ledger;
pub mod counter;
pub mod extensions;
pub mod model_registry;
pub mod notification;
pub mod policy;
pub mod query;

pub use agreement_ledger::AgreementLedger;
pub use counter::Counters;
pub use extensions::{
    AgreementLedgerExt, CounterExt, ModelRegistryExt, NotificationExt, QueryExt,
};
pub use model_registry::ModelRegistry;
pub use notification::{AGREEMENT_CONSUMED_EVENT, AGREEMENT_ISSUED_EVENT};
pub use policy::LedgerPolicy;
pub use query::{render_json, HistoryEntry, ListEntry, RecordQuery};
