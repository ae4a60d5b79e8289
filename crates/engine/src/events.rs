//! Delivery of committed events
//!
//! Events staged by a transaction reach subscribers only after that
//! transaction commits. `Database` publishes while it still holds the commit
//! lock, so delivery follows commit order. Subscribers are plain channels;
//! a dropped receiver is pruned on the next publish.

use magnit_core::LedgerEvent;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use tracing::debug;

/// Fan-out of committed events
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<Sender<LedgerEvent>>>,
    published: AtomicU64,
}

impl EventBus {
    /// Create a bus with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every event committed from now on
    pub fn subscribe(&self) -> Receiver<LedgerEvent> {
        let (tx, rx) = channel();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Deliver events from one committed transaction
    ///
    /// The subscriber lock is held across the whole batch so each
    /// transaction's events stay contiguous for every subscriber.
    pub fn publish(&self, events: &[LedgerEvent]) {
        if events.is_empty() {
            return;
        }
        let mut subscribers = self.subscribers.lock();
        for event in events {
            debug!(
                target: "magnit::event",
                name = %event.name,
                tx_id = %event.tx_id,
                subscribers = subscribers.len(),
                "Publishing event"
            );
            subscribers.retain(|tx| tx.send(event.clone()).is_ok());
            self.published.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Number of events published so far
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Number of live subscribers as of the last publish
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}
