//! Blended per-segment trend values

use crate::analytics::aggregation::PeriodMetrics;
use serde::{Deserialize, Serialize};

/// One point of the blended transition trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    /// Mean of the non-zero transition averages; `None` when the segment had
    /// no transitions at all
    pub blended_average: Option<f64>,
}

/// Reduces per-transition averages to one value per segment.
///
/// A zero average means "no samples of that transition type" and is left
/// out of the mean. A segment with only zeros has no activity and blends to
/// `None`, which is distinct from a real average.
pub struct TrendBlender;

impl TrendBlender {
    pub fn blend(periods: &[PeriodMetrics]) -> Vec<TrendPoint> {
        periods
            .iter()
            .map(|period| TrendPoint {
                label: period.label.clone(),
                blended_average: mean(period.non_zero_averages()),
            })
            .collect()
    }
}

pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}
