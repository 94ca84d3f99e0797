//! Fixed 52-week upload volume grid

use crate::models::EntitySnapshot;
use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of weeks in the grid
pub const WEEKS_IN_GRID: usize = 52;

/// Upload counts per week, index 0 is the most recent complete ISO week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyCounts {
    pub new_total: Vec<u32>,
    pub new_pdf: Vec<u32>,
    pub new_docx: Vec<u32>,
    pub update_total: Vec<u32>,
    pub update_pdf: Vec<u32>,
    pub update_docx: Vec<u32>,
}

impl Default for WeeklyCounts {
    fn default() -> Self {
        Self {
            new_total: vec![0; WEEKS_IN_GRID],
            new_pdf: vec![0; WEEKS_IN_GRID],
            new_docx: vec![0; WEEKS_IN_GRID],
            update_total: vec![0; WEEKS_IN_GRID],
            update_pdf: vec![0; WEEKS_IN_GRID],
            update_docx: vec![0; WEEKS_IN_GRID],
        }
    }
}

/// Category a snapshot is counted under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadCategory {
    New,
    Update,
}

type WeekKey = (i32, u32);

fn week_key(timestamp: DateTime<Utc>) -> WeekKey {
    let week = timestamp.iso_week();
    (week.year(), week.week())
}

/// Maps creation timestamps onto the backward-looking week grid
pub struct WeeklyGridComputer {
    index: HashMap<WeekKey, usize>,
}

impl WeeklyGridComputer {
    /// Grid covering the 52 complete ISO weeks before the week containing `now`
    pub fn new(now: DateTime<Utc>) -> Self {
        let index = (0..WEEKS_IN_GRID)
            .map(|slot| (week_key(now - Duration::weeks(slot as i64 + 1)), slot))
            .collect();
        Self { index }
    }

    /// Slot for a timestamp, `None` outside the grid
    pub fn slot(&self, timestamp: DateTime<Utc>) -> Option<usize> {
        self.index.get(&week_key(timestamp)).copied()
    }

    /// Category used for counting.
    ///
    /// Every snapshot is currently counted as new, whatever its type tag.
    pub fn classify(_snapshot: &EntitySnapshot) -> UploadCategory {
        UploadCategory::New
    }

    pub fn compute(&self, snapshots: &[EntitySnapshot]) -> WeeklyCounts {
        let mut counts = WeeklyCounts::default();
        let mut excluded = 0usize;

        for snapshot in snapshots {
            let Some(slot) = self.slot(snapshot.created_at) else {
                excluded += 1;
                continue;
            };

            let (total, pdf, docx) = match Self::classify(snapshot) {
                UploadCategory::New => {
                    (&mut counts.new_total, &mut counts.new_pdf, &mut counts.new_docx)
                }
                UploadCategory::Update => (
                    &mut counts.update_total,
                    &mut counts.update_pdf,
                    &mut counts.update_docx,
                ),
            };

            total[slot] += 1;
            if snapshot.uploads.pdf {
                pdf[slot] += 1;
            }
            if snapshot.uploads.docx {
                docx[slot] += 1;
            }
        }

        if excluded > 0 {
            tracing::debug!(excluded, "Snapshots outside the 52-week grid");
        }

        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BrdStatus, BrdTypeTag};
    use chrono::TimeZone;

    // Friday
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn created(at: DateTime<Utc>) -> EntitySnapshot {
        EntitySnapshot::new(format!("brd-{}", at.timestamp()), BrdStatus::Draft, at, "u1")
    }

    #[test]
    fn test_grid_has_fifty_two_distinct_weeks() {
        let grid = WeeklyGridComputer::new(now());
        assert_eq!(grid.index.len(), WEEKS_IN_GRID);
        let mut slots: Vec<_> = grid.index.values().copied().collect();
        slots.sort_unstable();
        assert_eq!(slots, (0..WEEKS_IN_GRID).collect::<Vec<_>>());
    }

    #[test]
    fn test_most_recent_complete_week_is_slot_zero() {
        let grid = WeeklyGridComputer::new(now());
        // Monday of the previous ISO week
        let last_week = Utc.with_ymd_and_hms(2026, 10, 5, 9, 0, 0).unwrap();
        assert_eq!(grid.slot(last_week), Some(0));
        // Sunday closing the previous ISO week
        let sunday = Utc.with_ymd_and_hms(2026, 10, 11, 23, 59, 0).unwrap();
        assert_eq!(grid.slot(sunday), Some(0));
        // current week is not part of the grid
        assert_eq!(grid.slot(now()), None);
    }

    #[test]
    fn test_old_snapshots_are_excluded() {
        let grid = WeeklyGridComputer::new(now());
        assert_eq!(grid.slot(now() - Duration::weeks(52)), Some(51));
        assert_eq!(grid.slot(now() - Duration::weeks(53)), None);
    }

    #[test]
    fn test_counts_and_sub_types() {
        let grid = WeeklyGridComputer::new(now());
        let last_week = now() - Duration::weeks(1);
        let snapshots = vec![
            created(last_week).with_uploads(true, false),
            created(last_week - Duration::hours(1)).with_uploads(true, true),
            created(now() - Duration::weeks(3)).with_uploads(false, true),
            created(now() - Duration::weeks(60)).with_uploads(true, true),
        ];

        let counts = grid.compute(&snapshots);

        assert_eq!(counts.new_total[0], 2);
        assert_eq!(counts.new_pdf[0], 2);
        assert_eq!(counts.new_docx[0], 1);
        assert_eq!(counts.new_total[2], 1);
        assert_eq!(counts.new_docx[2], 1);
        assert_eq!(counts.new_total.iter().sum::<u32>(), 3);
    }

    #[test]
    fn test_update_tag_is_counted_as_new() {
        let grid = WeeklyGridComputer::new(now());
        let snapshot = created(now() - Duration::weeks(1))
            .with_type_tag(BrdTypeTag::Update)
            .with_uploads(true, false);

        let counts = grid.compute(&[snapshot]);

        assert_eq!(counts.new_total[0], 1);
        assert_eq!(counts.new_pdf[0], 1);
        assert!(counts.update_total.iter().all(|c| *c == 0));
    }

    #[test]
    fn test_all_arrays_have_fixed_length() {
        let counts = WeeklyGridComputer::new(now()).compute(&[]);
        for array in [
            &counts.new_total,
            &counts.new_pdf,
            &counts.new_docx,
            &counts.update_total,
            &counts.update_pdf,
            &counts.update_docx,
        ] {
            assert_eq!(array.len(), WEEKS_IN_GRID);
        }
    }
}
