//! LedgerStub implementation for TransactionContext
//!
//! This is the bridge between the licensing logic and the reference ledger:
//! shared calls map to `Partition::Shared`, private-data calls to the named
//! restricted collection, and rich queries are evaluated here against a
//! shared-partition scan.

use crate::TransactionContext;
use magnit_core::{
    HistoryIterator, Key, LedgerStub, MagnitResult, Partition, QueryEntry, Selector,
    StateIterator, Timestamp, TxId,
};

fn collection_key(collection: &str, key: &str) -> MagnitResult<Key> {
    if collection.is_empty() {
        return Err(magnit_core::MagnitError::invalid_argument(
            "collection name must not be empty",
        ));
    }
    Ok(Key::restricted(collection, key))
}

fn into_state_iter(entries: Vec<(String, Vec<u8>)>) -> StateIterator {
    Box::new(
        entries
            .into_iter()
            .map(|(key, value)| Ok(QueryEntry { key, value })),
    )
}

impl LedgerStub for TransactionContext {
    fn get_state(&mut self, key: &str) -> MagnitResult<Option<Vec<u8>>> {
        self.get(&Key::shared(key))
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> MagnitResult<()> {
        self.put(Key::shared(key), value)
    }

    fn del_state(&mut self, key: &str) -> MagnitResult<()> {
        self.delete(Key::shared(key))
    }

    fn get_private_data(&mut self, collection: &str, key: &str) -> MagnitResult<Option<Vec<u8>>> {
        let key = collection_key(collection, key)?;
        self.get(&key)
    }

    fn put_private_data(
        &mut self,
        collection: &str,
        key: &str,
        value: Vec<u8>,
    ) -> MagnitResult<()> {
        let key = collection_key(collection, key)?;
        self.put(key, value)
    }

    fn del_private_data(&mut self, collection: &str, key: &str) -> MagnitResult<()> {
        let key = collection_key(collection, key)?;
        self.delete(key)
    }

    fn get_state_by_range(&mut self, start: &str, end: &str) -> MagnitResult<StateIterator> {
        let entries = self.scan_range(&Partition::Shared, start, end)?;
        Ok(into_state_iter(entries))
    }

    fn get_query_result(&mut self, query: &str) -> MagnitResult<StateIterator> {
        let selector = Selector::parse(query)?;
        let entries = self
            .scan_range(&Partition::Shared, "", "")?
            .into_iter()
            .filter(|(_, value)| selector.matches_bytes(value))
            .collect();
        Ok(into_state_iter(entries))
    }

    fn get_history_for_key(&mut self, key: &str) -> MagnitResult<HistoryIterator> {
        let history = self.history(&Key::shared(key))?;
        Ok(Box::new(history.into_iter().map(Ok)))
    }

    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> MagnitResult<()> {
        self.emit_event(name, payload)
    }

    fn tx_timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn tx_id(&self) -> TxId {
        self.tx_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magnit_storage::VersionedStore;
    use std::sync::Arc;

    fn begin(store: &Arc<VersionedStore>) -> TransactionContext {
        TransactionContext::new(TxId::new(), Timestamp::from_secs(9), Box::new(store.snapshot()))
    }

    #[test]
    fn test_private_data_is_not_in_shared_scan() {
        let store = Arc::new(VersionedStore::new());
        let mut txn = begin(&store);
        txn.put_private_data("collectionModel", "Model1", b"{}".to_vec())
            .unwrap();
        txn.put_state("Agreement1", b"{}".to_vec()).unwrap();

        assert!(txn.get_state("Model1").unwrap().is_none());
        assert!(txn
            .get_private_data("collectionModel", "Model1")
            .unwrap()
            .is_some());
        let keys: Vec<String> = txn
            .get_state_by_range("", "")
            .unwrap()
            .map(|e| e.unwrap().key)
            .collect();
        assert_eq!(keys, vec!["Agreement1"]);
    }

    #[test]
    fn test_empty_collection_rejected() {
        let store = Arc::new(VersionedStore::new());
        let mut txn = begin(&store);
        assert!(txn.get_private_data("", "Model1").is_err());
    }

    #[test]
    fn test_selector_query_filters_by_doc_type() {
        let store = Arc::new(VersionedStore::new());
        let mut txn = begin(&store);
        txn.put_state("Agreement1", br#"{"docType":"Agreement"}"#.to_vec())
            .unwrap();
        txn.put_state("AgreementCounterNO", br#"{"counter":1}"#.to_vec())
            .unwrap();
        let hits: Vec<QueryEntry> = txn
            .get_query_result(r#"{"selector":{"docType":"Agreement"}}"#)
            .unwrap()
            .collect::<MagnitResult<_>>()
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].key, "Agreement1");
    }

    #[test]
    fn test_history_reads_committed_versions_only() {
        let store = Arc::new(VersionedStore::new());
        store.put(Key::shared("Agreement1"), b"v1".to_vec(), Timestamp::from_secs(1), TxId::new());
        let mut txn = begin(&store);
        txn.put_state("Agreement1", b"uncommitted".to_vec()).unwrap();
        let history: Vec<_> = txn.get_history_for_key("Agreement1").unwrap().collect();
        assert_eq!(history.len(), 1);
    }
}
