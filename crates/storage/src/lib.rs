//! Storage layer for Magnit
//!
//! This crate implements the reference world-state store:
//! - VersionedStore: BTreeMap of version chains behind a RwLock
//! - VersionChain: newest-first MVCC chain with tombstones
//! - StoreSnapshot: lazy version-bounded SnapshotView
//!
//! Keys order by partition then user key, so range scans over the shared
//! partition are contiguous and never see restricted records.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod snapshot;
pub mod store;
pub mod stored_value;

pub use chain::VersionChain;
pub use snapshot::StoreSnapshot;
pub use store::VersionedStore;
pub use stored_value::StoredValue;
