//! Assistant prefill-rate trend

use crate::analytics::segments::{locate_segment, TimeSegment};
use crate::analytics::trend::mean;
use crate::models::EntitySnapshot;
use serde::{Deserialize, Serialize};

/// Mean prefill rate of the BRDs created in one segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefillPoint {
    pub label: String,
    /// Mean rate in percent; `None` when no BRD in the segment carries a rate
    pub average_rate: Option<f64>,
    /// BRDs that contributed a rate
    pub brd_count: usize,
}

pub struct PrefillTrend;

impl PrefillTrend {
    pub fn compute(snapshots: &[EntitySnapshot], segments: &[TimeSegment]) -> Vec<PrefillPoint> {
        let mut rates: Vec<Vec<f64>> = vec![Vec::new(); segments.len()];

        for snapshot in snapshots {
            let Some(rate) = snapshot.ai_prefill_rate else {
                continue;
            };
            if let Some(idx) = locate_segment(segments, snapshot.created_at) {
                rates[idx].push(rate);
            }
        }

        segments
            .iter()
            .zip(rates)
            .map(|(segment, values)| PrefillPoint {
                label: segment.label.clone(),
                brd_count: values.len(),
                average_rate: mean(values.into_iter()),
            })
            .collect()
    }
}
