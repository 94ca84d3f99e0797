//! Per-segment transition averages

use crate::analytics::segments::{locate_segment, TimeSegment};
use crate::analytics::transitions::TransitionSample;
use crate::models::TransitionType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{EnumCount, IntoEnumIterator};

/// Average elapsed days per transition type within one segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodMetrics {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Always holds every transition type; `0.0` means no samples
    pub average_by_transition: BTreeMap<TransitionType, f64>,
    /// Number of samples that fell into the segment
    pub sample_count: usize,
}

impl PeriodMetrics {
    /// Averages that come from at least one sample
    pub fn non_zero_averages(&self) -> impl Iterator<Item = f64> + '_ {
        self.average_by_transition
            .values()
            .copied()
            .filter(|average| *average != 0.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    sums: [f64; TransitionType::COUNT],
    counts: [u32; TransitionType::COUNT],
}

impl Bucket {
    fn record(&mut self, sample: &TransitionSample) {
        let idx = sample.transition.index();
        self.sums[idx] += sample.elapsed_days;
        self.counts[idx] += 1;
    }

    fn average(&self, transition: TransitionType) -> f64 {
        let idx = transition.index();
        match self.counts[idx] {
            0 => 0.0,
            count => self.sums[idx] / f64::from(count),
        }
    }

    fn total(&self) -> usize {
        self.counts.iter().map(|count| *count as usize).sum()
    }
}

/// Assigns samples to segments and averages them per transition type
pub struct PeriodAggregator;

impl PeriodAggregator {
    /// One `PeriodMetrics` per segment, in segment order.
    ///
    /// A sample belongs to the segment containing its `completed_at`;
    /// samples outside every segment are ignored.
    pub fn aggregate(samples: &[TransitionSample], segments: &[TimeSegment]) -> Vec<PeriodMetrics> {
        let mut buckets = vec![Bucket::default(); segments.len()];
        let mut outside = 0usize;

        for sample in samples {
            match locate_segment(segments, sample.completed_at) {
                Some(idx) => buckets[idx].record(sample),
                None => outside += 1,
            }
        }

        if outside > 0 {
            tracing::debug!(outside, "Transition samples outside the reporting window");
        }

        segments
            .iter()
            .zip(buckets.iter())
            .map(|(segment, bucket)| PeriodMetrics {
                label: segment.label.clone(),
                start: segment.start,
                end: segment.end,
                average_by_transition: TransitionType::iter()
                    .map(|transition| (transition, bucket.average(transition)))
                    .collect(),
                sample_count: bucket.total(),
            })
            .collect()
    }
}
