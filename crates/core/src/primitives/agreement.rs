//! Agreement records
//!
//! An agreement grants a participant organization a bounded number of uses
//! of one model. `quota_limit` and `usage_count` are decimal strings on the
//! ledger; they are parsed every time they are read.

use super::Record;
use crate::contract::Timestamp;
use serde::{Deserialize, Serialize};

/// A licensing agreement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    /// Discriminator, always [`Agreement::DOC_TYPE`]
    #[serde(rename = "docType")]
    pub doc_type: String,
    /// "Agreement" followed by the allocated counter value
    #[serde(rename = "agreementID")]
    pub agreement_id: String,
    /// Display name
    pub name: String,
    /// Back-reference to the licensed model, checked only at creation
    #[serde(rename = "modelID")]
    pub model_id: String,
    /// Maximum number of uses (decimal string)
    #[serde(rename = "quotaLimit")]
    pub quota_limit: String,
    /// Uses consumed so far (decimal string)
    #[serde(rename = "usageCount")]
    pub usage_count: String,
    /// Issuing organization
    #[serde(rename = "issuerOrg")]
    pub issuer_org: String,
    /// Licensee organization
    #[serde(rename = "participantOrg")]
    pub participant_org: String,
    /// Transaction time of creation (RFC 3339)
    #[serde(rename = "createdAt")]
    pub created_at: String,
    /// Transaction time of the last change (RFC 3339)
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    /// Free-text remark
    pub remark: String,
    /// Image reference
    #[serde(rename = "imageURL")]
    pub image_url: String,
    /// Status label
    pub status: String,
    /// Hash of the agreement content
    #[serde(rename = "contentHash")]
    pub content_hash: String,
}

impl Agreement {
    /// Discriminator value for agreement records
    pub const DOC_TYPE: &'static str = "Agreement";

    /// Build a fresh agreement with zero usage
    pub fn issue(agreement_id: impl Into<String>, new: NewAgreement, now: Timestamp) -> Self {
        let stamp = now.to_rfc3339();
        Self {
            doc_type: Self::DOC_TYPE.to_string(),
            agreement_id: agreement_id.into(),
            name: new.name,
            model_id: new.model_id,
            quota_limit: new.quota_limit,
            usage_count: "0".to_string(),
            issuer_org: new.issuer_org,
            participant_org: new.participant_org,
            created_at: stamp.clone(),
            updated_at: stamp,
            remark: new.remark,
            image_url: new.image_url,
            status: new.status,
            content_hash: new.content_hash,
        }
    }

    /// Record a modification at transaction time `now`
    pub fn touch(&mut self, now: Timestamp) {
        self.updated_at = now.to_rfc3339();
    }
}

impl Record for Agreement {}

/// Caller-supplied fields of a new agreement
///
/// Field order matches the positional invocation arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewAgreement {
    /// Display name
    pub name: String,
    /// Model to license
    pub model_id: String,
    /// Maximum number of uses (decimal string)
    pub quota_limit: String,
    /// Issuing organization
    pub issuer_org: String,
    /// Licensee organization
    pub participant_org: String,
    /// Free-text remark
    pub remark: String,
    /// Image reference
    pub image_url: String,
    /// Initial status label
    pub status: String,
    /// Hash of the agreement content
    pub content_hash: String,
}

impl NewAgreement {
    /// Number of positional fields
    pub const ARITY: usize = 9;

    /// Build from positional arguments, `None` on wrong arity
    pub fn from_args(args: &[String]) -> Option<Self> {
        match args {
            [name, model_id, quota_limit, issuer_org, participant_org, remark, image_url, status, content_hash] => {
                Some(Self {
                    name: name.clone(),
                    model_id: model_id.clone(),
                    quota_limit: quota_limit.clone(),
                    issuer_org: issuer_org.clone(),
                    participant_org: participant_org.clone(),
                    remark: remark.clone(),
                    image_url: image_url.clone(),
                    status: status.clone(),
                    content_hash: content_hash.clone(),
                })
            }
            _ => None,
        }
    }
}
