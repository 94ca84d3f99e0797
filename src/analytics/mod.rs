//! Dashboard metrics aggregation engine
//!
//! Turns BRD snapshots and their audit trail into the figures shown on the
//! onboarding dashboards.
//!
//! # Pipeline
//!
//! - **Segments**: calendar-aligned month/quarter buckets for the requested period
//! - **Deduplication**: one snapshot per logical key, first seen wins
//! - **Transitions**: status timelines rebuilt from unordered audit events,
//!   measured only along the fixed status chain
//! - **Period averages**: mean elapsed days per transition type and segment
//! - **Trend**: blended mean of the non-zero averages, `null` for idle segments
//! - **Weekly grid**: 52-week upload counts anchored to "now"
//!
//! Every derived value lives for one request only.
//!
//! # Example
//!
//! ```no_run
//! use brd_dashboard::analytics::{
//!     AnalyticsConfig, MetricFamily, MetricsFacade, MetricsRequest, Scope, SystemClock,
//! };
//! use brd_dashboard::state::InMemoryBrdStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let facade = MetricsFacade::new(
//!         AnalyticsConfig::default(),
//!         Arc::new(InMemoryBrdStore::new()),
//!         Arc::new(SystemClock),
//!     );
//!
//!     let request = MetricsRequest::new(MetricFamily::Transitions, "user-1")
//!         .with_scope(Scope::Team)
//!         .with_period("year");
//!
//!     let aggregate = facade.aggregate(&request).await?;
//!     println!("{} segments", aggregate.segments.len());
//!
//!     Ok(())
//! }
//! ```

mod aggregation;
mod clock;
mod dedup;
mod engine;
mod error;
mod overview;
mod prefill;
mod segments;
mod transitions;
mod trend;
mod weekly;

pub use aggregation::{PeriodAggregator, PeriodMetrics};
pub use clock::{Clock, FixedClock, SystemClock};
pub use dedup::EntityDeduplicator;
pub use engine::{
    AnalyticsConfig, BrdScope, MetricFamily, MetricsAggregate, MetricsFacade, MetricsRequest,
    Scope, MAX_LOOKBACK_DAYS,
};
pub use error::{AnalyticsError, AnalyticsResult};
pub use overview::{BrdOverview, UNSPECIFIED_VERTICAL};
pub use prefill::{PrefillPoint, PrefillTrend};
pub use segments::{
    locate_segment, window_bounds, Period, TimeSegment, TimeSegmentBuilder, YearBuckets,
};
pub use transitions::{Reconstruction, TransitionReconstructor, TransitionSample};
pub use trend::{TrendBlender, TrendPoint};
pub use weekly::{UploadCategory, WeeklyCounts, WeeklyGridComputer, WEEKS_IN_GRID};
