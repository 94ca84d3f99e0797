use crate::models::BrdStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

/// Entity type under which BRD audit events are recorded
pub const BRD_ENTITY_TYPE: &str = "BRD";

/// Kind of change recorded by an audit event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum AuditAction {
    Create,
    StatusUpdate,
    Update,
    Delete,
}

/// Immutable audit fact produced by the BRD lifecycle services
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEvent {
    /// Logical key of the audited entity
    pub entity_key: String,

    /// Entity type, e.g. `BRD`
    #[serde(default = "default_entity_type")]
    pub entity_type: String,

    /// Recorded action
    pub action: AuditAction,

    /// When the change happened
    pub timestamp: DateTime<Utc>,

    /// Free-form change payload
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl AuditEvent {
    /// Create a BRD audit event carrying a status value
    pub fn status_change(
        entity_key: impl Into<String>,
        action: AuditAction,
        timestamp: DateTime<Utc>,
        status: BrdStatus,
    ) -> Self {
        Self {
            entity_key: entity_key.into(),
            entity_type: default_entity_type(),
            action,
            timestamp,
            payload: serde_json::json!({ "status": status.to_string() }),
        }
    }

    /// Status carried by the payload.
    ///
    /// Both create and status-update events embed the status the same way;
    /// the action is not consulted. `None` for absent, null, non-string or
    /// unrecognized values.
    pub fn status_value(&self) -> Option<BrdStatus> {
        self.payload
            .get("status")
            .and_then(serde_json::Value::as_str)
            .and_then(|raw| BrdStatus::from_str(raw.trim()).ok())
    }
}

fn default_entity_type() -> String {
    BRD_ENTITY_TYPE.to_string()
}
