//! BRD counts for the dashboard header

use crate::models::{BrdStatus, EntitySnapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// Label used when a BRD has no industry vertical
pub const UNSPECIFIED_VERTICAL: &str = "Unspecified";

/// Totals over a deduplicated snapshot set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrdOverview {
    pub total: usize,
    /// Every status is present, zero when unused
    pub by_status: BTreeMap<BrdStatus, usize>,
    pub by_industry_vertical: BTreeMap<String, usize>,
}

impl BrdOverview {
    pub fn from_snapshots(snapshots: &[EntitySnapshot]) -> Self {
        let mut by_status: BTreeMap<BrdStatus, usize> =
            BrdStatus::iter().map(|status| (status, 0)).collect();
        let mut by_industry_vertical = BTreeMap::new();

        for snapshot in snapshots {
            *by_status.entry(snapshot.status).or_insert(0) += 1;

            let vertical = snapshot
                .industry_vertical
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(UNSPECIFIED_VERTICAL);
            *by_industry_vertical.entry(vertical.to_string()).or_insert(0) += 1;
        }

        Self {
            total: snapshots.len(),
            by_status,
            by_industry_vertical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use strum::EnumCount;

    #[test]
    fn test_empty_overview_lists_every_status() {
        let overview = BrdOverview::from_snapshots(&[]);
        assert_eq!(overview.total, 0);
        assert_eq!(overview.by_status.len(), BrdStatus::COUNT);
        assert!(overview.by_industry_vertical.is_empty());
    }

    #[test]
    fn test_counts() {
        let now = Utc::now();
        let snapshots = vec![
            EntitySnapshot::new("a", BrdStatus::Draft, now, "u").with_industry_vertical("Retail"),
            EntitySnapshot::new("b", BrdStatus::Draft, now, "u").with_industry_vertical("Retail"),
            EntitySnapshot::new("c", BrdStatus::Submitted, now, "u"),
            EntitySnapshot::new("d", BrdStatus::Reviewed, now, "u").with_industry_vertical("  "),
        ];

        let overview = BrdOverview::from_snapshots(&snapshots);

        assert_eq!(overview.total, 4);
        assert_eq!(overview.by_status[&BrdStatus::Draft], 2);
        assert_eq!(overview.by_status[&BrdStatus::Submitted], 1);
        assert_eq!(overview.by_status[&BrdStatus::InProgress], 0);
        assert_eq!(overview.by_industry_vertical["Retail"], 2);
        assert_eq!(overview.by_industry_vertical[UNSPECIFIED_VERTICAL], 2);
    }
}
