use crate::models::BrdStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

/// Whether a BRD describes a new onboarding or an update to an existing one
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum BrdTypeTag {
    #[default]
    New,
    Update,
}

/// File kinds uploaded against a BRD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadFlags {
    #[serde(default)]
    pub pdf: bool,

    #[serde(default)]
    pub docx: bool,
}

/// Point-in-time view of a BRD form as returned by the form services.
///
/// Several snapshots may share one `logical_key`; they describe the same BRD.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct EntitySnapshot {
    /// Logical key (BRD form id)
    #[validate(length(min = 1))]
    pub logical_key: String,

    /// Current lifecycle status
    pub status: BrdStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// User that created the BRD
    pub creator_id: String,

    /// New vs update classification
    #[serde(default)]
    pub type_tag: BrdTypeTag,

    /// Industry vertical of the onboarding client
    #[serde(default)]
    pub industry_vertical: Option<String>,

    /// Share of fields prefilled by the assistant, in percent
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub ai_prefill_rate: Option<f64>,

    /// Uploaded file kinds
    #[serde(default)]
    pub uploads: UploadFlags,
}

impl EntitySnapshot {
    /// Create a snapshot with no optional attributes set
    pub fn new(
        logical_key: impl Into<String>,
        status: BrdStatus,
        created_at: DateTime<Utc>,
        creator_id: impl Into<String>,
    ) -> Self {
        Self {
            logical_key: logical_key.into(),
            status,
            created_at,
            updated_at: created_at,
            creator_id: creator_id.into(),
            type_tag: BrdTypeTag::New,
            industry_vertical: None,
            ai_prefill_rate: None,
            uploads: UploadFlags::default(),
        }
    }

    pub fn with_type_tag(mut self, type_tag: BrdTypeTag) -> Self {
        self.type_tag = type_tag;
        self
    }

    pub fn with_industry_vertical(mut self, vertical: impl Into<String>) -> Self {
        self.industry_vertical = Some(vertical.into());
        self
    }

    pub fn with_ai_prefill_rate(mut self, rate: f64) -> Self {
        self.ai_prefill_rate = Some(rate);
        self
    }

    pub fn with_uploads(mut self, pdf: bool, docx: bool) -> Self {
        self.uploads = UploadFlags { pdf, docx };
        self
    }
}
