//! Read-only queries over the shared partition
//!
//! - `list_all` / `list_range`: key-ordered range scans, records wrapped as
//!   `{"Key": ..., "Record": ...}`
//! - `list_agreements`: selector query on `docType == "Agreement"`
//! - `history`: every committed modification of one key, oldest first
//!
//! Queries run inside a transaction and see its snapshot. Restricted
//! collections are never scanned, so model records do not appear here.

use std::sync::Arc;

use magnit_core::{
    Agreement, KeyModification, LedgerStub, MagnitResult, QueryEntry, Record, Selector,
};
use magnit_engine::Database;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::extensions::QueryExt;

/// One row of a range scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    /// Record key
    #[serde(rename = "Key")]
    pub key: String,
    /// Stored record; non-JSON values appear as a string
    #[serde(rename = "Record")]
    pub record: Value,
}

impl From<QueryEntry> for ListEntry {
    fn from(entry: QueryEntry) -> Self {
        let record = serde_json::from_slice(&entry.value)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&entry.value).into_owned()));
        Self {
            key: entry.key,
            record,
        }
    }
}

/// One committed modification of a key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Transaction that made the change
    #[serde(rename = "TxId")]
    pub tx_id: String,
    /// Value written, `null` for a deletion
    #[serde(rename = "Value")]
    pub value: Value,
    /// Transaction time (RFC 3339)
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    /// Whether the change was a deletion
    #[serde(rename = "IsDelete")]
    pub is_delete: bool,
}

impl From<KeyModification> for HistoryEntry {
    fn from(m: KeyModification) -> Self {
        let value = match m.value {
            Some(bytes) if !m.is_delete => serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned())),
            _ => Value::Null,
        };
        Self {
            tx_id: m.tx_id.to_string(),
            value,
            timestamp: m.timestamp.to_rfc3339(),
            is_delete: m.is_delete,
        }
    }
}

/// Render query results as a JSON array
pub fn render_json<T: Serialize>(rows: &[T]) -> MagnitResult<String> {
    Ok(serde_json::to_string(rows)?)
}

impl<S: LedgerStub + ?Sized> QueryExt for S {
    fn query_range(&mut self, start: &str, end: &str) -> MagnitResult<Vec<ListEntry>> {
        self.get_state_by_range(start, end)?
            .map(|entry| entry.map(ListEntry::from))
            .collect()
    }

    fn query_agreements(&mut self) -> MagnitResult<Vec<Agreement>> {
        let query = Selector::field_equals("docType", Agreement::DOC_TYPE).to_query_string();
        self.get_query_result(&query)?
            .map(|entry| entry.and_then(|e| Agreement::from_json_bytes(&e.value)))
            .collect()
    }

    fn query_history(&mut self, key: &str) -> MagnitResult<Vec<HistoryEntry>> {
        self.get_history_for_key(key)?
            .map(|m| m.map(HistoryEntry::from))
            .collect()
    }
}

/// Query operations as standalone read-only transactions
#[derive(Clone)]
pub struct RecordQuery {
    db: Arc<Database>,
}

impl RecordQuery {
    /// Create a query handle
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every shared record, key order
    pub fn list_all(&self) -> MagnitResult<Vec<ListEntry>> {
        self.list_range("", "")
    }

    /// Shared records with `start <= key < end`; empty bounds are open
    pub fn list_range(&self, start: &str, end: &str) -> MagnitResult<Vec<ListEntry>> {
        let rows = self.db.execute(|txn| txn.query_range(start, end))?;
        debug!(target: "magnit::query", start, end, rows = rows.len(), "Range scan");
        Ok(rows)
    }

    /// Every agreement record
    pub fn list_agreements(&self) -> MagnitResult<Vec<Agreement>> {
        let rows = self.db.execute(|txn| txn.query_agreements())?;
        debug!(target: "magnit::query", rows = rows.len(), "Agreement query");
        Ok(rows)
    }

    /// Committed history of a shared key, oldest first
    ///
    /// A key that was never written has an empty history.
    pub fn history(&self, key: &str) -> MagnitResult<Vec<HistoryEntry>> {
        let entries = self.db.execute(|txn| txn.query_history(key))?;
        debug!(target: "magnit::query", key, entries = entries.len(), "History");
        Ok(entries)
    }
}
