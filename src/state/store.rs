use crate::models::{AuditEvent, EntitySnapshot};
use crate::state::{AuditCriteria, BrdReadStore, SnapshotCriteria, StoreError, StoreResult};
use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use validator::Validate;

/// Seed data for the in-memory store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureData {
    #[serde(default)]
    pub snapshots: Vec<EntitySnapshot>,

    #[serde(default)]
    pub audit_events: Vec<AuditEvent>,
}

/// In-memory snapshot and audit store (for local runs and testing).
///
/// Snapshots are kept as a list, so the same logical key may be present
/// more than once, as it can be in the real form services.
#[derive(Clone, Default)]
pub struct InMemoryBrdStore {
    snapshots: Arc<RwLock<Vec<EntitySnapshot>>>,
    audit_events: Arc<RwLock<Vec<AuditEvent>>>,
}

impl InMemoryBrdStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: FixtureData) -> Self {
        Self {
            snapshots: Arc::new(RwLock::new(fixture.snapshots)),
            audit_events: Arc::new(RwLock::new(fixture.audit_events)),
        }
    }

    /// Load a JSON fixture file.
    ///
    /// Every snapshot must pass its field constraints; the first violation
    /// rejects the whole file.
    pub fn from_fixture_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let fixture: FixtureData = serde_json::from_str(&raw)?;

        for snapshot in &fixture.snapshots {
            snapshot.validate().map_err(|e| StoreError::Invalid {
                key: snapshot.logical_key.clone(),
                reason: e.to_string(),
            })?;
        }

        tracing::info!(
            path = %path.as_ref().display(),
            snapshots = fixture.snapshots.len(),
            audit_events = fixture.audit_events.len(),
            "Loaded store fixture"
        );

        Ok(Self::from_fixture(fixture))
    }

    pub fn insert_snapshot(&self, snapshot: EntitySnapshot) {
        tracing::debug!(logical_key = %snapshot.logical_key, "Snapshot saved");
        self.snapshots.write().push(snapshot);
    }

    pub fn insert_audit_event(&self, event: AuditEvent) {
        self.audit_events.write().push(event);
    }

    pub fn extend_audit_events(&self, events: impl IntoIterator<Item = AuditEvent>) {
        self.audit_events.write().extend(events);
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.read().len()
    }

    pub fn audit_event_count(&self) -> usize {
        self.audit_events.read().len()
    }
}

impl BrdReadStore for InMemoryBrdStore {
    fn fetch_audit_events(
        &self,
        criteria: AuditCriteria,
    ) -> BoxStream<'static, StoreResult<AuditEvent>> {
        let matching: Vec<AuditEvent> = self
            .audit_events
            .read()
            .iter()
            .filter(|event| criteria.matches(event))
            .cloned()
            .collect();

        stream::iter(matching.into_iter().map(Ok)).boxed()
    }

    fn fetch_snapshots(
        &self,
        criteria: SnapshotCriteria,
    ) -> BoxStream<'static, StoreResult<EntitySnapshot>> {
        let matching: Vec<EntitySnapshot> = self
            .snapshots
            .read()
            .iter()
            .filter(|snapshot| criteria.matches(snapshot))
            .cloned()
            .collect();

        stream::iter(matching.into_iter().map(Ok)).boxed()
    }
}
