//! Core types and traits for Magnit
//!
//! This crate defines the foundational types used throughout the system:
//! - Key / Partition: composite storage keys split by visibility
//! - TxId / Timestamp: transaction identity and time
//! - MagnitError: error type hierarchy
//! - Records: Model, Agreement, counters, events (one canonical schema)
//! - Selector: JSON selector queries
//! - Policies: numeric parsing and status lifecycle modes
//! - Traits: Storage, SnapshotView, and the LedgerStub primitive interface

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod error;
pub mod policy;
pub mod primitives;
pub mod selector;
pub mod traits;
pub mod types;

pub use contract::{KeyModification, Timestamp, VersionedValue};
pub use error::{ErrorKind, MagnitError, MagnitResult};
pub use policy::{AgreementStatus, NumericParsing, StatusPolicy};
pub use primitives::{
    Agreement, CounterCategory, CounterRecord, LedgerEvent, Model, NewAgreement, Record,
};
pub use selector::Selector;
pub use traits::{
    CommitBatch, HistoryIterator, LedgerStub, QueryEntry, SnapshotView, StateIterator, Storage,
};
pub use types::{Key, Partition, TxId};
