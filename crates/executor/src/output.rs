//! Output enum for command execution results.
//!
//! Every command produces exactly one output variant. [`Output::to_payload`]
//! renders the bytes a positional invocation returns to its caller.

use magnit_core::{Agreement, CounterCategory, Model};
use magnit_primitives::{render_json, HistoryEntry, ListEntry};
use serde::{Deserialize, Serialize};

use crate::convert::convert_result;
use crate::Result;

/// Value of one counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterValue {
    /// Which counter
    pub category: CounterCategory,
    /// Its value
    pub value: u64,
}

/// Successful command execution results.
///
/// # Example
///
/// ```text
/// match executor.execute(Command::ConsumeAgreement { agreement_id })? {
///     Output::Model(model) => println!("licensed: {}", model.model_id),
///     _ => unreachable!("ConsumeAgreement always returns Model"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// No return value (delete)
    Unit,

    // ==================== Counters ====================
    /// One counter value
    Counter(u64),

    /// Every counter value
    Counters(Vec<CounterValue>),

    // ==================== Records ====================
    /// Identifier of a newly registered model
    ModelId(String),

    /// A model record
    Model(Model),

    /// Identifier of a newly issued agreement
    AgreementId(String),

    /// An agreement record
    Agreement(Agreement),

    // ==================== Queries ====================
    /// Range scan rows
    Records(Vec<ListEntry>),

    /// Agreement records
    Agreements(Vec<Agreement>),

    /// Key history, oldest first
    History(Vec<HistoryEntry>),
}

impl Output {
    /// Bytes returned to a positional invocation
    ///
    /// Records and lists are JSON; identifiers and counters are plain text;
    /// `Unit` is empty.
    pub fn to_payload(&self) -> Result<Vec<u8>> {
        let bytes = match self {
            Output::Unit => Vec::new(),
            Output::Counter(n) => n.to_string().into_bytes(),
            Output::Counters(values) => serde_json::to_vec(values).map_err(json_error)?,
            Output::ModelId(id) | Output::AgreementId(id) => id.clone().into_bytes(),
            Output::Model(model) => serde_json::to_vec(model).map_err(json_error)?,
            Output::Agreement(agreement) => serde_json::to_vec(agreement).map_err(json_error)?,
            Output::Records(rows) => convert_result(render_json(rows))?.into_bytes(),
            Output::Agreements(rows) => convert_result(render_json(rows))?.into_bytes(),
            Output::History(rows) => convert_result(render_json(rows))?.into_bytes(),
        };
        Ok(bytes)
    }
}

fn json_error(e: serde_json::Error) -> crate::Error {
    crate::Error::Serialization {
        reason: e.to_string(),
    }
}
