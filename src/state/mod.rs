pub mod factory;
pub mod store;

pub use factory::create_store;
pub use store::{FixtureData, InMemoryBrdStore};

use crate::models::{AuditEvent, EntitySnapshot};
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;

/// Result type for read-contract operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures raised by the snapshot and audit read contracts
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backing service could not be reached or failed mid-stream
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed store data: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record parsed but breaks a field constraint
    #[error("invalid record {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Read-only access to BRD snapshots and their audit trail
pub trait BrdReadStore: Send + Sync {
    /// Audit events of one entity type whose timestamp is in `[from, to)`
    fn fetch_audit_events(
        &self,
        criteria: AuditCriteria,
    ) -> BoxStream<'static, StoreResult<AuditEvent>>;

    /// Snapshots matching the scope and status family
    fn fetch_snapshots(
        &self,
        criteria: SnapshotCriteria,
    ) -> BoxStream<'static, StoreResult<EntitySnapshot>>;
}

/// Filter for audit-event queries
#[derive(Debug, Clone, PartialEq)]
pub struct AuditCriteria {
    pub entity_type: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Whose snapshots to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOwner {
    /// Snapshots created by one user
    Creator(String),
    /// Every snapshot visible system-wide
    Anyone,
}

/// Which statuses to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFamily {
    Open,
    All,
}

/// Filter for snapshot queries
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotCriteria {
    pub owner: SnapshotOwner,
    pub family: StatusFamily,
}

impl SnapshotCriteria {
    pub fn new(owner: SnapshotOwner, family: StatusFamily) -> Self {
        Self { owner, family }
    }

    pub fn matches(&self, snapshot: &EntitySnapshot) -> bool {
        let owner_match = match &self.owner {
            SnapshotOwner::Creator(user) => snapshot.creator_id == *user,
            SnapshotOwner::Anyone => true,
        };
        let family_match = match self.family {
            StatusFamily::Open => snapshot.status.is_open(),
            StatusFamily::All => true,
        };
        owner_match && family_match
    }
}

impl AuditCriteria {
    pub fn matches(&self, event: &AuditEvent) -> bool {
        event.entity_type.eq_ignore_ascii_case(&self.entity_type)
            && event.timestamp >= self.from
            && event.timestamp < self.to
    }
}
