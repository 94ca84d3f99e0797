//! Shared fixtures for the dashboard integration tests

#![allow(dead_code)]

use brd_dashboard::analytics::{AnalyticsConfig, FixedClock, MetricsFacade};
use brd_dashboard::models::{AuditAction, AuditEvent, BrdStatus, EntitySnapshot};
use brd_dashboard::state::{
    AuditCriteria, BrdReadStore, InMemoryBrdStore, SnapshotCriteria, StoreError, StoreResult,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;

pub const USER: &str = "alice";
pub const OTHER_USER: &str = "bob";

/// Friday of ISO week 42, 2026
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
}

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap()
}

pub fn days(value: f64) -> Duration {
    Duration::seconds((value * 86_400.0).round() as i64)
}

pub fn facade(store: InMemoryBrdStore) -> MetricsFacade {
    MetricsFacade::new(
        AnalyticsConfig::default(),
        Arc::new(store),
        Arc::new(FixedClock::new(now())),
    )
}

/// Audit events walking one BRD along the chain, one hop per gap
pub fn walk(key: &str, start: DateTime<Utc>, statuses: &[BrdStatus], gaps: &[f64]) -> Vec<AuditEvent> {
    let mut events = Vec::with_capacity(statuses.len());
    let mut ts = start;

    for (i, status) in statuses.iter().enumerate() {
        if i > 0 {
            ts += days(gaps[i - 1]);
        }
        let action = if i == 0 {
            AuditAction::Create
        } else {
            AuditAction::StatusUpdate
        };
        events.push(AuditEvent::status_change(key, action, ts, *status));
    }

    events
}

/// Two BRDs moving Draft -> In Progress -> Edit Complete in October 2026
pub fn worked_fixture() -> InMemoryBrdStore {
    let store = InMemoryBrdStore::new();
    let chain = [BrdStatus::Draft, BrdStatus::InProgress, BrdStatus::EditComplete];

    store.insert_snapshot(EntitySnapshot::new("BRD-A", BrdStatus::EditComplete, at(2026, 10, 2), USER));
    store.insert_snapshot(EntitySnapshot::new("BRD-B", BrdStatus::EditComplete, at(2026, 10, 3), USER));
    store.extend_audit_events(walk("BRD-A", at(2026, 10, 2), &chain, &[2.17, 3.79]));
    store.extend_audit_events(walk("BRD-B", at(2026, 10, 3), &chain, &[3.21, 2.75]));

    store
}

/// Store whose every fetch fails mid-stream
pub struct FailingStore;

impl BrdReadStore for FailingStore {
    fn fetch_audit_events(&self, _criteria: AuditCriteria) -> BoxStream<'static, StoreResult<AuditEvent>> {
        stream::iter(vec![Err(StoreError::Unavailable("audit log offline".to_string()))]).boxed()
    }

    fn fetch_snapshots(&self, _criteria: SnapshotCriteria) -> BoxStream<'static, StoreResult<EntitySnapshot>> {
        stream::iter(vec![Err(StoreError::Unavailable("snapshot store offline".to_string()))]).boxed()
    }
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} within {} of {}",
        actual,
        tolerance,
        expected
    );
}
