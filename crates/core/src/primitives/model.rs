//! Model records
//!
//! A model is the licensed asset. Model records live in a restricted
//! collection and are only handed out through a quota-checked agreement.

use super::Record;
use serde::{Deserialize, Serialize};

/// A licensed model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Discriminator, always [`Model::DOC_TYPE`]
    #[serde(rename = "docType")]
    pub doc_type: String,
    /// "Model" followed by the allocated counter value
    #[serde(rename = "modelID")]
    pub model_id: String,
    /// Display name
    #[serde(rename = "modelName")]
    pub name: String,
    /// Organization that uploaded the model
    #[serde(rename = "uploadOrg")]
    pub upload_org: String,
}

impl Model {
    /// Discriminator value for model records
    pub const DOC_TYPE: &'static str = "model";

    /// Create a model record
    pub fn new(
        model_id: impl Into<String>,
        name: impl Into<String>,
        upload_org: impl Into<String>,
    ) -> Self {
        Self {
            doc_type: Self::DOC_TYPE.to_string(),
            model_id: model_id.into(),
            name: name.into(),
            upload_org: upload_org.into(),
        }
    }
}

impl Record for Model {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_field_names() {
        let model = Model::new("Model1", "resnet", "OrgA");
        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(
            value,
            json!({
                "docType": "model",
                "modelID": "Model1",
                "modelName": "resnet",
                "uploadOrg": "OrgA"
            })
        );
    }

    #[test]
    fn test_decode_from_bytes() {
        let bytes = Model::new("Model2", "bert", "OrgB").to_json_bytes().unwrap();
        let model = Model::from_json_bytes(&bytes).unwrap();
        assert_eq!(model.model_id, "Model2");
        assert_eq!(model.doc_type, Model::DOC_TYPE);
    }
}
