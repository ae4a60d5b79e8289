//! Model registry
//!
//! Models live in a restricted collection (by default `collectionModel`).
//! Their contents are never visible to shared-partition range scans or
//! selector queries; only [`ModelRegistryExt::model_get`] and the agreement
//! consume path read them.

use std::sync::Arc;

use magnit_core::{CounterCategory, LedgerStub, MagnitError, MagnitResult, Model, Record};
use magnit_engine::Database;
use tracing::info;

use crate::extensions::{CounterExt, ModelRegistryExt};
use crate::policy::LedgerPolicy;

impl<S: LedgerStub + ?Sized> ModelRegistryExt for S {
    fn model_create(
        &mut self,
        collection: &str,
        name: &str,
        upload_org: &str,
    ) -> MagnitResult<Model> {
        if name.is_empty() {
            return Err(MagnitError::invalid_argument("model name must not be empty"));
        }
        if upload_org.is_empty() {
            return Err(MagnitError::invalid_argument(
                "upload organization must not be empty",
            ));
        }

        let n = self.counter_allocate(CounterCategory::Model)?;
        let model_id = CounterCategory::Model.format_id(n);
        if self.get_private_data(collection, &model_id)?.is_some() {
            return Err(MagnitError::conflict(format!(
                "model {} already exists",
                model_id
            )));
        }

        let model = Model::new(model_id, name, upload_org);
        self.put_private_data(collection, &model.model_id, model.to_json_bytes()?)?;
        Ok(model)
    }

    fn model_get(&mut self, collection: &str, model_id: &str) -> MagnitResult<Model> {
        match self.get_private_data(collection, model_id)? {
            Some(bytes) => Model::from_json_bytes(&bytes),
            None => Err(MagnitError::not_found(format!("model {}", model_id))),
        }
    }
}

/// Model registry as standalone transactions
#[derive(Clone)]
pub struct ModelRegistry {
    db: Arc<Database>,
    policy: LedgerPolicy,
}

impl ModelRegistry {
    /// Create a registry over the database's configured collection
    pub fn new(db: Arc<Database>) -> Self {
        let policy = LedgerPolicy::from_config(db.config());
        Self { db, policy }
    }

    /// Restricted collection models are stored in
    pub fn collection(&self) -> &str {
        &self.policy.model_collection
    }

    /// Register a model under the next model identifier
    pub fn create(&self, name: &str, upload_org: &str) -> MagnitResult<Model> {
        let model = self
            .db
            .execute(|txn| txn.model_create(&self.policy.model_collection, name, upload_org))?;
        info!(
            target: "magnit::model",
            model_id = %model.model_id,
            upload_org = %model.upload_org,
            "Model registered"
        );
        Ok(model)
    }

    /// Load a model
    pub fn get(&self, model_id: &str) -> MagnitResult<Model> {
        self.db
            .execute(|txn| txn.model_get(&self.policy.model_collection, model_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::Counters;

    #[test]
    fn test_create_assigns_sequential_ids() {
        let registry = ModelRegistry::new(Database::ephemeral());
        let m1 = registry.create("resnet", "Org1").unwrap();
        let m2 = registry.create("bert", "Org2").unwrap();
        assert_eq!(m1.model_id, "Model1");
        assert_eq!(m2.model_id, "Model2");
        assert_eq!(m1.doc_type, "model");
        assert_eq!(registry.get("Model2").unwrap(), m2);
    }

    #[test]
    fn test_models_stay_out_of_shared_partition() {
        let db = Database::ephemeral();
        let registry = ModelRegistry::new(db.clone());
        registry.create("resnet", "Org1").unwrap();
        assert!(db.transaction(|txn| txn.get_state("Model1")).unwrap().is_none());
        let raw = db
            .transaction(|txn| txn.get_private_data("collectionModel", "Model1"))
            .unwrap()
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(json["modelName"], "resnet");
        assert_eq!(json["uploadOrg"], "Org1");
    }

    #[test]
    fn test_empty_fields_rejected_without_allocation() {
        let db = Database::ephemeral();
        let registry = ModelRegistry::new(db.clone());
        let err = registry.create("", "Org1").unwrap_err();
        assert!(matches!(err, MagnitError::InvalidArgument { .. }));
        let err = registry.create("resnet", "").unwrap_err();
        assert!(matches!(err, MagnitError::InvalidArgument { .. }));
        assert_eq!(Counters::new(db).peek(CounterCategory::Model).unwrap(), 0);
    }

    #[test]
    fn test_id_collision_is_conflict_and_counter_unchanged() {
        let db = Database::ephemeral();
        db.transaction(|txn| {
            txn.put_private_data("collectionModel", "Model1", b"{}".to_vec())
        })
        .unwrap();
        let registry = ModelRegistry::new(db.clone());
        let err = registry.create("resnet", "Org1").unwrap_err();
        assert!(matches!(err, MagnitError::Conflict { .. }));
        assert_eq!(Counters::new(db).peek(CounterCategory::Model).unwrap(), 0);
    }

    #[test]
    fn test_missing_model_not_found() {
        let registry = ModelRegistry::new(Database::ephemeral());
        assert!(registry.get("Model9").unwrap_err().is_not_found());
    }
}
