//! # Magnit Executor
//!
//! The invocation surface of the Magnit licensing ledger.
//!
//! - [`Executor`] - runs commands against a database, one transaction each
//! - [`Command`] / [`Operation`] - the closed set of operations
//! - [`Output`] / [`Error`] - typed results and failures
//!
//! ## Quick Start
//!
//! ```text
//! use magnit_executor::{Executor, Database};
//!
//! let executor = Executor::new(Database::ephemeral());
//! executor.invoke("createModel", &["resnet".into(), "Org1".into()])?;
//! executor.invoke("createAgreement", &[
//!     "license".into(), "Model1".into(), "5".into(), "Org1".into(), "Org2".into(),
//!     "".into(), "".into(), "ISSUED".into(), "hash".into(),
//! ])?;
//! let model = executor.invoke("consumeAgreement", &["Agreement1".into()])?;
//! ```
//!
//! ## Operations
//!
//! | Operation | Arguments | Output |
//! |-----------|-----------|--------|
//! | `init` | - | `Counters` |
//! | `createModel` | name, uploadOrg | `ModelId` |
//! | `getModel` | modelID | `Model` |
//! | `createAgreement` | 9 agreement fields | `AgreementId` |
//! | `getAgreement` | agreementID | `Agreement` |
//! | `consumeAgreement` | agreementID | `Model` |
//! | `approveAgreement` | agreementID, status | `Agreement` |
//! | `deleteRecord` | key | `Unit` |
//! | `listAll` | - | `Records` |
//! | `listRange` | start, end | `Records` |
//! | `listAgreements` | - | `Agreements` |
//! | `history` | key | `History` |
//! | `peekCounter` | category | `Counter` |
//! | `setCounter` | category, value | `Counter` |

#![warn(missing_docs)]

pub(crate) mod bridge;
mod command;
mod convert;
mod error;
mod executor;
mod handlers;
mod operation;
mod output;

#[cfg(test)]
mod tests;

// =============================================================================
// Public API
// =============================================================================

pub use command::Command;
pub use error::Error;
pub use executor::Executor;
pub use operation::Operation;
pub use output::{CounterValue, Output};

// Record types returned in outputs
pub use magnit_core::{Agreement, CounterCategory, ErrorKind, Model, NewAgreement};
pub use magnit_primitives::{
    HistoryEntry, ListEntry, AGREEMENT_CONSUMED_EVENT, AGREEMENT_ISSUED_EVENT,
};

// Engine types so users don't need magnit-engine directly
pub use magnit_engine::{init_logging, Database, MagnitConfig, RetryConfig};

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
