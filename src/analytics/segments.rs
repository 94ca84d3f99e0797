//! Calendar-aligned reporting segments

use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

/// Reporting period requested by the dashboard
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Period {
    Month,
    #[default]
    Quarter,
    Year,
}

impl Period {
    /// Parse a period, falling back to `quarter` for missing or unknown values
    pub fn parse_or_default(raw: Option<&str>) -> Period {
        match raw.map(|value| Period::from_str(value.trim())) {
            Some(Ok(period)) => period,
            Some(Err(_)) => {
                tracing::debug!(period = ?raw, "Unknown period, using quarter");
                Period::default()
            }
            None => Period::default(),
        }
    }

    /// Parse a period that the caller must supply
    pub fn parse_required(raw: Option<&str>) -> AnalyticsResult<Period> {
        let value = raw
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                AnalyticsError::Validation("period is required when brdScope=all".to_string())
            })?;

        Period::from_str(value).map_err(|_| {
            AnalyticsError::Validation(format!(
                "unsupported period '{}', expected month, quarter or year",
                value
            ))
        })
    }
}

/// Bucket size used when the period is `year`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearBuckets {
    /// Four calendar quarters
    Quarterly,
    /// Twelve calendar months
    Monthly,
}

/// One reporting bucket, `[start, end)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSegment {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: String,
}

impl TimeSegment {
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp < self.end
    }
}

/// Builds ordered, contiguous segments for a period relative to "now"
pub struct TimeSegmentBuilder;

impl TimeSegmentBuilder {
    /// Segments covering `period`, oldest first.
    ///
    /// `month` yields the calendar month containing `now`, `quarter` the three
    /// months ending with it, and `year` either the four quarters or the
    /// twelve months ending with the current one.
    pub fn build(
        period: Period,
        now: DateTime<Utc>,
        year_buckets: YearBuckets,
    ) -> AnalyticsResult<Vec<TimeSegment>> {
        let current_month = month_ordinal(now);

        match (period, year_buckets) {
            (Period::Month, _) => monthly_segments(current_month, 1),
            (Period::Quarter, _) => monthly_segments(current_month, 3),
            (Period::Year, YearBuckets::Monthly) => monthly_segments(current_month, 12),
            (Period::Year, YearBuckets::Quarterly) => {
                let current_quarter = current_month - current_month.rem_euclid(3);
                quarterly_segments(current_quarter, 4)
            }
        }
    }
}

/// Index of the segment containing `timestamp`, if any.
///
/// Segments must be ordered and non-overlapping.
pub fn locate_segment(segments: &[TimeSegment], timestamp: DateTime<Utc>) -> Option<usize> {
    let idx = segments.partition_point(|segment| segment.end <= timestamp);
    segments
        .get(idx)
        .filter(|segment| segment.contains(timestamp))
        .map(|_| idx)
}

/// Outer bounds of an ordered segment list
pub fn window_bounds(segments: &[TimeSegment]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    Some((segments.first()?.start, segments.last()?.end))
}

// Months are handled as ordinals (year * 12 + zero-based month) so that
// stepping backwards across year boundaries is plain integer arithmetic.
fn month_ordinal(timestamp: DateTime<Utc>) -> i32 {
    timestamp.year() * 12 + timestamp.month0() as i32
}

fn month_start(ordinal: i32) -> AnalyticsResult<DateTime<Utc>> {
    let year = ordinal.div_euclid(12);
    let month = ordinal.rem_euclid(12) as u32 + 1;

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| {
            AnalyticsError::Validation(format!("reference time out of range ({year}-{month})"))
        })
}

fn monthly_segments(last_month: i32, count: i32) -> AnalyticsResult<Vec<TimeSegment>> {
    (0..count)
        .rev()
        .map(|offset| -> AnalyticsResult<TimeSegment> {
            let ordinal = last_month - offset;
            let start = month_start(ordinal)?;
            Ok(TimeSegment {
                start,
                end: month_start(ordinal + 1)?,
                label: start.format("%b %Y").to_string(),
            })
        })
        .collect()
}

fn quarterly_segments(last_quarter: i32, count: i32) -> AnalyticsResult<Vec<TimeSegment>> {
    (0..count)
        .rev()
        .map(|offset| -> AnalyticsResult<TimeSegment> {
            let ordinal = last_quarter - offset * 3;
            let start = month_start(ordinal)?;
            Ok(TimeSegment {
                start,
                end: month_start(ordinal + 3)?,
                label: format!("Q{} {}", start.month0() / 3 + 1, start.year()),
            })
        })
        .collect()
}
