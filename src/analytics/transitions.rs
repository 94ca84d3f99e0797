//! Rebuilding status-transition timelines from audit events

use crate::models::{AuditEvent, BrdStatus, TransitionType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Elapsed time of one measured transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionSample {
    pub entity_key: String,
    pub transition: TransitionType,
    /// Fractional days between entering `from` and entering `to`, never negative
    pub elapsed_days: f64,
    /// When the target status was entered
    pub completed_at: DateTime<Utc>,
}

impl TransitionSample {
    pub fn from_status(&self) -> BrdStatus {
        self.transition.from_status()
    }

    pub fn to_status(&self) -> BrdStatus {
        self.transition.to_status()
    }
}

/// Samples produced from a batch of audit events
#[derive(Debug, Clone, Default)]
pub struct Reconstruction {
    pub samples: Vec<TransitionSample>,
    /// Events without a usable status value
    pub skipped_events: usize,
}

/// Converts audit events into transition samples
pub struct TransitionReconstructor;

impl TransitionReconstructor {
    /// Samples for a single entity.
    ///
    /// Events may arrive in any order. Repeated statuses collapse to the
    /// first time the status was entered, and only adjacent moves along the
    /// status chain produce a sample; skips and backward moves are ignored.
    pub fn reconstruct_entity(events: &[AuditEvent]) -> Reconstruction {
        let mut ordered: Vec<&AuditEvent> = events.iter().collect();
        ordered.sort_by_key(|event| event.timestamp);

        let mut skipped_events = 0;
        let mut timeline: Vec<(BrdStatus, DateTime<Utc>)> = Vec::with_capacity(ordered.len());

        for event in ordered {
            let Some(status) = event.status_value() else {
                skipped_events += 1;
                tracing::debug!(
                    entity_key = %event.entity_key,
                    action = %event.action,
                    timestamp = %event.timestamp,
                    "Skipping audit event without a usable status"
                );
                continue;
            };

            match timeline.last() {
                Some((previous, _)) if *previous == status => {}
                _ => timeline.push((status, event.timestamp)),
            }
        }

        let samples = timeline
            .windows(2)
            .filter_map(|pair| {
                let (from, entered_from) = pair[0];
                let (to, entered_to) = pair[1];
                let transition = TransitionType::between(from, to)?;
                let elapsed_ms = entered_to
                    .signed_duration_since(entered_from)
                    .num_milliseconds()
                    .max(0);

                Some(TransitionSample {
                    entity_key: events
                        .first()
                        .map(|event| event.entity_key.clone())
                        .unwrap_or_default(),
                    transition,
                    elapsed_days: elapsed_ms as f64 / MILLIS_PER_DAY,
                    completed_at: entered_to,
                })
            })
            .collect();

        Reconstruction {
            samples,
            skipped_events,
        }
    }

    /// Samples for every entity in `events`.
    ///
    /// When `entity_keys` is given, events for other entities are ignored.
    /// Entities are processed in key order so output is deterministic.
    pub fn reconstruct_all(
        events: Vec<AuditEvent>,
        entity_keys: Option<&HashSet<String>>,
    ) -> Reconstruction {
        let mut by_entity: BTreeMap<String, Vec<AuditEvent>> = BTreeMap::new();
        for event in events {
            if entity_keys.is_some_and(|keys| !keys.contains(&event.entity_key)) {
                continue;
            }
            by_entity
                .entry(event.entity_key.clone())
                .or_default()
                .push(event);
        }

        let mut result = Reconstruction::default();
        for (entity_key, entity_events) in &by_entity {
            let entity = Self::reconstruct_entity(entity_events);
            if entity.samples.is_empty() {
                tracing::trace!(entity_key = %entity_key, "Entity contributed no transitions");
            }
            result.skipped_events += entity.skipped_events;
            result.samples.extend(entity.samples);
        }

        result
    }
}
