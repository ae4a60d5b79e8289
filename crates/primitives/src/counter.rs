//! Identifier counters
//!
//! Two counters, one per [`CounterCategory`], live in the shared partition
//! as `{"counter": n}` records. Allocation is a read-modify-write inside the
//! calling transaction: two transactions allocating from the same counter
//! both read its key, so at most one of them commits and the other retries
//! against the advanced value. Committed allocations are therefore unique
//! and gap-free.

use std::sync::Arc;

use magnit_core::{CounterCategory, CounterRecord, LedgerStub, MagnitError, MagnitResult, Record};
use magnit_engine::Database;
use tracing::info;

use crate::extensions::CounterExt;

fn read_counter<S: LedgerStub + ?Sized>(
    stub: &mut S,
    category: CounterCategory,
) -> MagnitResult<Option<u64>> {
    match stub.get_state(category.storage_key())? {
        Some(bytes) => Ok(Some(CounterRecord::from_json_bytes(&bytes)?.counter)),
        None => Ok(None),
    }
}

fn write_counter<S: LedgerStub + ?Sized>(
    stub: &mut S,
    category: CounterCategory,
    value: u64,
) -> MagnitResult<()> {
    let bytes = CounterRecord { counter: value }.to_json_bytes()?;
    stub.put_state(category.storage_key(), bytes)
}

impl<S: LedgerStub + ?Sized> CounterExt for S {
    fn counter_peek(&mut self, category: CounterCategory) -> MagnitResult<u64> {
        Ok(read_counter(self, category)?.unwrap_or(0))
    }

    fn counter_allocate(&mut self, category: CounterCategory) -> MagnitResult<u64> {
        let current = self.counter_peek(category)?;
        let next = current
            .checked_add(1)
            .ok_or_else(|| MagnitError::storage(format!("{} counter overflow", category)))?;
        write_counter(self, category, next)?;
        Ok(next)
    }

    fn counter_set(&mut self, category: CounterCategory, value: u64) -> MagnitResult<u64> {
        write_counter(self, category, value)?;
        Ok(value)
    }

    fn counter_init(&mut self) -> MagnitResult<Vec<(CounterCategory, u64)>> {
        let mut values = Vec::with_capacity(CounterCategory::ALL.len());
        for category in CounterCategory::ALL {
            let value = match read_counter(self, category)? {
                Some(v) => v,
                None => {
                    write_counter(self, category, 0)?;
                    0
                }
            };
            values.push((category, value));
        }
        Ok(values)
    }
}

/// Counter operations as standalone transactions
#[derive(Clone)]
pub struct Counters {
    db: Arc<Database>,
}

impl Counters {
    /// Create a counters handle
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Current value of a counter
    pub fn peek(&self, category: CounterCategory) -> MagnitResult<u64> {
        self.db.execute(|txn| txn.counter_peek(category))
    }

    /// Allocate the next value of a counter
    pub fn allocate(&self, category: CounterCategory) -> MagnitResult<u64> {
        self.db.execute(|txn| txn.counter_allocate(category))
    }

    /// Overwrite a counter
    ///
    /// Values are unsigned, so the "no change" sentinel some callers pass
    /// is rejected before it reaches this type.
    pub fn set_to(&self, category: CounterCategory, value: u64) -> MagnitResult<u64> {
        let value = self.db.execute(|txn| txn.counter_set(category, value))?;
        info!(target: "magnit::counter", %category, value, "Counter overwritten");
        Ok(value)
    }

    /// Create both counters at 0 if they are missing
    pub fn init(&self) -> MagnitResult<Vec<(CounterCategory, u64)>> {
        let values = self.db.execute(|txn| txn.counter_init())?;
        info!(target: "magnit::counter", ?values, "Counters initialized");
        Ok(values)
    }
}
