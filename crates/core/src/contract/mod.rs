//! Contract types shared between the ledger and the licensing core
//!
//! - `timestamp`: microsecond timestamps with RFC 3339 rendering
//! - `versioned`: committed values and per-key modification history

pub mod timestamp;
pub mod versioned;

// Re-exports
pub use timestamp::Timestamp;
pub use versioned::{KeyModification, VersionedValue};
