//! Events attached to transactions
//!
//! An event is staged inside a transaction and delivered to subscribers only
//! after that transaction commits.

use crate::contract::Timestamp;
use crate::types::TxId;
use serde::{Deserialize, Serialize};

/// A named notification produced by a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Event name (e.g. "newAgreementEvent")
    pub name: String,
    /// Opaque payload bytes
    pub payload: Vec<u8>,
    /// Transaction that emitted the event
    pub tx_id: TxId,
    /// Transaction time of the emitter
    pub timestamp: Timestamp,
}

impl LedgerEvent {
    /// Payload as UTF-8 text, if it is valid UTF-8
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}
