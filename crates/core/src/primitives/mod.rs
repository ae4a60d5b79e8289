//! Record types stored on the ledger
//!
//! These types define the canonical JSON schema of every record the
//! licensing core writes. They are shared by the `primitives` crate, which
//! implements the operations, and the `executor` crate, which returns them.
//!
//! There is exactly one schema version. Field names on the wire are the
//! camelCase names in each type's serde attributes.

pub mod agreement;
pub mod counter;
pub mod event;
pub mod model;

pub use agreement::{Agreement, NewAgreement};
pub use counter::{CounterCategory, CounterRecord};
pub use event::LedgerEvent;
pub use model::Model;

use crate::error::MagnitResult;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record with a JSON representation on the ledger
pub trait Record: Serialize + DeserializeOwned {
    /// Encode as JSON bytes
    fn to_json_bytes(&self) -> MagnitResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode from JSON bytes
    fn from_json_bytes(bytes: &[u8]) -> MagnitResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
