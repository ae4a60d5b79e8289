//! Ledger engine for Magnit
//!
//! This crate orchestrates the lower layers into the reference ledger the
//! licensing core runs on:
//! - Database: transaction closure API with conflict retry
//! - TransactionCoordinator: snapshots, commit, metrics
//! - Clock: deterministic transaction time
//! - EventBus: post-commit event delivery
//! - MagnitConfig: `magnit.toml` policies and retry settings
//! - logging: tracing subscriber installation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod coordinator;
pub mod database;
pub mod events;
pub mod logging;

pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::{TransactionCoordinator, TransactionMetrics};
pub use database::{Database, MagnitConfig, RetryConfig, CONFIG_FILE_NAME, DEFAULT_MODEL_COLLECTION};
pub use events::EventBus;
pub use logging::init_logging;

// Transactions are handed to closures; re-export the type they receive.
pub use magnit_concurrency::TransactionContext;
