//! Agreement ledger
//!
//! Agreements live in the shared partition under `Agreement<n>`. Each one
//! licenses a model for at most `quotaLimit` uses; every successful consume
//! increments `usageCount` by one and hands back the model record.
//!
//! ## Quota
//!
//! Consume reads the agreement before writing it, so two concurrent consumes
//! of one agreement conflict at commit and the loser re-runs against the
//! winner's count. Committed consumes of an agreement therefore never exceed
//! its limit.
//!
//! ## Parsing and status
//!
//! Count parsing and status validation follow the [`LedgerPolicy`] given to
//! each call. See `magnit_core::policy` for the available modes.

use std::sync::Arc;

use magnit_core::{
    Agreement, CounterCategory, LedgerStub, MagnitError, MagnitResult, Model, NewAgreement,
    NumericParsing, Record,
};
use magnit_engine::Database;
use tracing::{info, warn};

use crate::extensions::{AgreementLedgerExt, CounterExt, ModelRegistryExt, NotificationExt};
use crate::policy::LedgerPolicy;

impl<S: LedgerStub + ?Sized> AgreementLedgerExt for S {
    fn agreement_create(
        &mut self,
        policy: &LedgerPolicy,
        mut new: NewAgreement,
    ) -> MagnitResult<Agreement> {
        if policy.numeric == NumericParsing::Strict {
            policy.parse_count("new agreement", "quotaLimit", &new.quota_limit)?;
        }
        new.status = policy.status.initial_status(&new.status)?;

        // The model must exist where models are stored
        self.model_get(&policy.model_collection, &new.model_id)?;

        let n = self.counter_allocate(CounterCategory::Agreement)?;
        let agreement_id = CounterCategory::Agreement.format_id(n);
        if self.get_state(&agreement_id)?.is_some() {
            return Err(MagnitError::conflict(format!(
                "agreement {} already exists",
                agreement_id
            )));
        }

        let agreement = Agreement::issue(agreement_id, new, self.tx_timestamp());
        self.put_state(&agreement.agreement_id, agreement.to_json_bytes()?)?;
        self.notify_agreement_issued(&agreement.agreement_id)?;
        Ok(agreement)
    }

    fn agreement_get(&mut self, agreement_id: &str) -> MagnitResult<Agreement> {
        match self.get_state(agreement_id)? {
            Some(bytes) => Agreement::from_json_bytes(&bytes),
            None => Err(MagnitError::not_found(format!("agreement {}", agreement_id))),
        }
    }

    fn agreement_consume(
        &mut self,
        policy: &LedgerPolicy,
        agreement_id: &str,
    ) -> MagnitResult<Model> {
        let mut agreement = self.agreement_get(agreement_id)?;
        let limit = policy.parse_count(agreement_id, "quotaLimit", &agreement.quota_limit)?;
        let usage = policy.parse_count(agreement_id, "usageCount", &agreement.usage_count)?;
        if usage >= limit {
            return Err(MagnitError::quota_exceeded(agreement_id, usage, limit));
        }

        self.notify_agreement_consumed(agreement_id)?;

        agreement.usage_count = (usage + 1).to_string();
        agreement.touch(self.tx_timestamp());
        self.put_state(agreement_id, agreement.to_json_bytes()?)?;

        self.model_get(&policy.model_collection, &agreement.model_id)
    }

    fn agreement_approve(
        &mut self,
        policy: &LedgerPolicy,
        agreement_id: &str,
        new_status: &str,
    ) -> MagnitResult<Agreement> {
        if agreement_id.is_empty() {
            return Err(MagnitError::invalid_argument("agreement ID must not be empty"));
        }
        if new_status.is_empty() {
            return Err(MagnitError::invalid_argument("status must not be empty"));
        }

        let mut agreement = self.agreement_get(agreement_id)?;
        agreement.status = policy.status.transition(&agreement.status, new_status)?;
        agreement.touch(self.tx_timestamp());
        self.put_state(agreement_id, agreement.to_json_bytes()?)?;
        Ok(agreement)
    }

    fn record_delete(&mut self, policy: &LedgerPolicy, key: &str) -> MagnitResult<()> {
        if key.is_empty() {
            return Err(MagnitError::invalid_argument("key must not be empty"));
        }
        self.del_state(key)?;
        if self
            .get_private_data(&policy.model_collection, key)?
            .is_some()
        {
            self.del_private_data(&policy.model_collection, key)?;
        }
        Ok(())
    }
}

/// Agreement operations as standalone transactions
#[derive(Clone)]
pub struct AgreementLedger {
    db: Arc<Database>,
    policy: LedgerPolicy,
}

impl AgreementLedger {
    /// Create a ledger handle using the database's configured policies
    pub fn new(db: Arc<Database>) -> Self {
        let policy = LedgerPolicy::from_config(db.config());
        Self { db, policy }
    }

    /// Create a ledger handle with explicit policies
    pub fn with_policy(db: Arc<Database>, policy: LedgerPolicy) -> Self {
        Self { db, policy }
    }

    /// Policies in effect
    pub fn policy(&self) -> &LedgerPolicy {
        &self.policy
    }

    /// Issue an agreement for an existing model
    ///
    /// # Errors
    ///
    /// - NotFound if the model is not registered
    /// - InvalidArgument if the quota or status is rejected by the policy
    pub fn create(&self, new: NewAgreement) -> MagnitResult<Agreement> {
        let agreement = self
            .db
            .execute(|txn| txn.agreement_create(&self.policy, new.clone()))?;
        info!(
            target: "magnit::agreement",
            agreement_id = %agreement.agreement_id,
            model_id = %agreement.model_id,
            quota_limit = %agreement.quota_limit,
            "Agreement issued"
        );
        Ok(agreement)
    }

    /// Load an agreement
    pub fn get(&self, agreement_id: &str) -> MagnitResult<Agreement> {
        self.db.execute(|txn| txn.agreement_get(agreement_id))
    }

    /// Consume one use of an agreement and return its model
    ///
    /// # Errors
    ///
    /// - NotFound if the agreement or its model is missing
    /// - QuotaExceeded once usage has reached the limit
    pub fn consume(&self, agreement_id: &str) -> MagnitResult<Model> {
        match self
            .db
            .execute(|txn| txn.agreement_consume(&self.policy, agreement_id))
        {
            Ok(model) => {
                info!(
                    target: "magnit::agreement",
                    agreement_id,
                    model_id = %model.model_id,
                    "Agreement consumed"
                );
                Ok(model)
            }
            Err(e @ MagnitError::QuotaExceeded { .. }) => {
                warn!(target: "magnit::agreement", agreement_id, error = %e, "Consume refused");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Change an agreement's status
    pub fn approve(&self, agreement_id: &str, new_status: &str) -> MagnitResult<Agreement> {
        let agreement = self
            .db
            .execute(|txn| txn.agreement_approve(&self.policy, agreement_id, new_status))?;
        info!(
            target: "magnit::agreement",
            agreement_id,
            status = %agreement.status,
            "Agreement status changed"
        );
        Ok(agreement)
    }

    /// Delete the shared record at `key` and any model stored under it
    ///
    /// Deleting a key that holds nothing succeeds.
    pub fn delete_record(&self, key: &str) -> MagnitResult<()> {
        self.db.execute(|txn| txn.record_delete(&self.policy, key))?;
        info!(target: "magnit::agreement", key, "Record deleted");
        Ok(())
    }
}
