//! Lifecycle notifications
//!
//! Events are staged on the transaction and delivered by the database only
//! after the transaction commits. An aborted transaction delivers nothing.

use magnit_core::{LedgerStub, MagnitResult};

use crate::extensions::NotificationExt;

/// Event name emitted when an agreement is issued
pub const AGREEMENT_ISSUED_EVENT: &str = "newAgreementEvent";

/// Event name emitted when an agreement is consumed
pub const AGREEMENT_CONSUMED_EVENT: &str = "queryEvent";

/// Payload of [`AGREEMENT_ISSUED_EVENT`]
pub fn issued_payload(agreement_id: &str) -> String {
    format!(
        "Agreement with ID {} was issued and ready to confirm",
        agreement_id
    )
}

/// Payload of [`AGREEMENT_CONSUMED_EVENT`]
pub fn consumed_payload(agreement_id: &str) -> String {
    format!("Agreement with ID {} was selected", agreement_id)
}

impl<S: LedgerStub + ?Sized> NotificationExt for S {
    fn notify_agreement_issued(&mut self, agreement_id: &str) -> MagnitResult<()> {
        self.set_event(
            AGREEMENT_ISSUED_EVENT,
            issued_payload(agreement_id).into_bytes(),
        )
    }

    fn notify_agreement_consumed(&mut self, agreement_id: &str) -> MagnitResult<()> {
        self.set_event(
            AGREEMENT_CONSUMED_EVENT,
            consumed_payload(agreement_id).into_bytes(),
        )
    }
}
