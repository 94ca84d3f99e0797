//! Collapsing snapshots that describe the same BRD

use crate::models::EntitySnapshot;
use std::collections::HashSet;

/// Keeps one snapshot per logical key, first occurrence wins.
///
/// A BRD may show up in both the scoped and the system-wide snapshot query;
/// later copies are dropped without error.
#[derive(Debug, Default)]
pub struct EntityDeduplicator {
    seen: HashSet<String>,
    dropped: usize,
}

impl EntityDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the snapshot if its key has not been seen before
    pub fn admit(&mut self, snapshot: EntitySnapshot) -> Option<EntitySnapshot> {
        if self.seen.insert(snapshot.logical_key.clone()) {
            Some(snapshot)
        } else {
            self.dropped += 1;
            tracing::debug!(logical_key = %snapshot.logical_key, "Dropping duplicate snapshot");
            None
        }
    }

    /// Number of duplicates dropped so far
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Deduplicate a whole batch, preserving arrival order
    pub fn dedupe<I>(snapshots: I) -> Vec<EntitySnapshot>
    where
        I: IntoIterator<Item = EntitySnapshot>,
    {
        let mut dedup = Self::new();
        let unique: Vec<_> = snapshots
            .into_iter()
            .filter_map(|snapshot| dedup.admit(snapshot))
            .collect();

        if dedup.dropped() > 0 {
            tracing::debug!(
                unique = unique.len(),
                dropped = dedup.dropped(),
                "Collapsed duplicate snapshots"
            );
        }

        unique
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BrdStatus;
    use chrono::{Duration, Utc};

    #[test]
    fn test_first_occurrence_wins() {
        let now = Utc::now();
        let first = EntitySnapshot::new("brd-1", BrdStatus::Draft, now, "u1");
        let later = EntitySnapshot::new("brd-1", BrdStatus::Reviewed, now + Duration::days(3), "u1");
        let other = EntitySnapshot::new("brd-2", BrdStatus::Draft, now, "u2");

        let unique = EntityDeduplicator::dedupe(vec![first.clone(), other.clone(), later]);

        assert_eq!(unique, vec![first, other]);
    }

    #[test]
    fn test_dropped_counter() {
        let now = Utc::now();
        let mut dedup = EntityDeduplicator::new();

        assert!(dedup.admit(EntitySnapshot::new("a", BrdStatus::Draft, now, "u")).is_some());
        assert!(dedup.admit(EntitySnapshot::new("a", BrdStatus::Draft, now, "u")).is_none());
        assert!(dedup.admit(EntitySnapshot::new("a", BrdStatus::Draft, now, "u")).is_none());
        assert_eq!(dedup.dropped(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(EntityDeduplicator::dedupe(Vec::new()).is_empty());
    }
}
