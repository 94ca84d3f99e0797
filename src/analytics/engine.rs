//! Request orchestration for the dashboard metrics

use crate::analytics::aggregation::{PeriodAggregator, PeriodMetrics};
use crate::analytics::clock::Clock;
use crate::analytics::dedup::EntityDeduplicator;
use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::analytics::overview::BrdOverview;
use crate::analytics::prefill::{PrefillPoint, PrefillTrend};
use crate::analytics::segments::{window_bounds, Period, TimeSegment, TimeSegmentBuilder, YearBuckets};
use crate::analytics::transitions::TransitionReconstructor;
use crate::analytics::trend::{TrendBlender, TrendPoint};
use crate::analytics::weekly::{WeeklyCounts, WeeklyGridComputer};
use crate::metrics;
use crate::models::{EntitySnapshot, BRD_ENTITY_TYPE};
use crate::state::{AuditCriteria, BrdReadStore, SnapshotCriteria, SnapshotOwner, StatusFamily};
use chrono::{DateTime, Duration, Utc};
use futures::{StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use strum::{Display, EnumString};
use validator::Validate;

/// Configuration for the metrics facade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// How far before the reporting window audit events are read, so that a
    /// transition completing inside the window can pair with its start
    #[serde(default = "default_lookback_days")]
    pub transition_lookback_days: i64,

    /// Entity type of BRD audit events
    #[serde(default = "default_entity_type")]
    pub entity_type: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            transition_lookback_days: default_lookback_days(),
            entity_type: default_entity_type(),
        }
    }
}

/// Largest accepted audit lookback, roughly a century
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

fn default_lookback_days() -> i64 {
    365
}

fn default_entity_type() -> String {
    BRD_ENTITY_TYPE.to_string()
}

/// Dashboard metric family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MetricFamily {
    /// Average days per status transition
    Transitions,
    /// Assistant prefill rate of new BRDs
    AiPrefill,
    /// Weekly upload volume
    Uploads,
    /// BRD counts by status and vertical
    Overview,
}

impl MetricFamily {
    fn year_buckets(&self) -> YearBuckets {
        match self {
            MetricFamily::Transitions => YearBuckets::Quarterly,
            _ => YearBuckets::Monthly,
        }
    }
}

/// Whose BRDs are measured
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Scope {
    #[default]
    Me,
    Team,
}

/// Which BRD statuses are measured
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BrdScope {
    #[default]
    Open,
    All,
}

impl From<BrdScope> for StatusFamily {
    fn from(scope: BrdScope) -> Self {
        match scope {
            BrdScope::Open => StatusFamily::Open,
            BrdScope::All => StatusFamily::All,
        }
    }
}

/// One dashboard metrics request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MetricsRequest {
    pub family: MetricFamily,
    pub scope: Scope,
    pub brd_scope: BrdScope,
    /// Raw period value; required when `brd_scope` is `all`
    pub period: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub user_id: String,
}

impl MetricsRequest {
    pub fn new(family: MetricFamily, user_id: impl Into<String>) -> Self {
        Self {
            family,
            scope: Scope::default(),
            brd_scope: BrdScope::default(),
            period: None,
            user_id: user_id.into(),
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_brd_scope(mut self, brd_scope: BrdScope) -> Self {
        self.brd_scope = brd_scope;
        self
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    /// Resolve the period according to the status scope.
    ///
    /// `brdScope=all` needs an explicit, known period; otherwise missing or
    /// unknown values fall back to `quarter`.
    pub fn resolve_period(&self) -> AnalyticsResult<Period> {
        match self.brd_scope {
            BrdScope::All => Period::parse_required(self.period.as_deref()),
            BrdScope::Open => Ok(Period::parse_or_default(self.period.as_deref())),
        }
    }
}

/// Assembled dashboard response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsAggregate {
    pub family: MetricFamily,
    pub period: Period,
    pub generated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<PeriodMetrics>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trend: Vec<TrendPoint>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefill: Vec<PrefillPoint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_grid: Option<WeeklyCounts>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<BrdOverview>,
}

impl MetricsAggregate {
    fn empty(family: MetricFamily, period: Period, generated_at: DateTime<Utc>) -> Self {
        Self {
            family,
            period,
            generated_at,
            segments: Vec::new(),
            trend: Vec::new(),
            prefill: Vec::new(),
            weekly_grid: None,
            overview: None,
        }
    }
}

/// Runs the aggregation pipeline for incoming dashboard requests.
///
/// Holds no per-request state; every call owns its accumulators.
pub struct MetricsFacade {
    config: AnalyticsConfig,
    store: Arc<dyn BrdReadStore>,
    clock: Arc<dyn Clock>,
}

impl MetricsFacade {
    pub fn new(config: AnalyticsConfig, store: Arc<dyn BrdReadStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            store,
            clock,
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Validate the request, fetch its records and build the aggregate.
    ///
    /// Any fetch failure aborts the whole request.
    #[tracing::instrument(
        skip(self, request),
        fields(
            family = %request.family,
            scope = %request.scope,
            brd_scope = %request.brd_scope,
        )
    )]
    pub async fn aggregate(&self, request: &MetricsRequest) -> AnalyticsResult<MetricsAggregate> {
        let started = Instant::now();
        let result = self.run(request).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(AnalyticsError::Validation(_)) => "rejected",
            Err(_) => "error",
        };
        metrics::record_aggregation(&request.family.to_string(), outcome, started.elapsed());

        match &result {
            Ok(aggregate) => tracing::debug!(
                period = %aggregate.period,
                segments = aggregate.segments.len(),
                "Aggregation complete"
            ),
            Err(e) => tracing::warn!(error = %e, "Aggregation failed"),
        }

        result
    }

    async fn run(&self, request: &MetricsRequest) -> AnalyticsResult<MetricsAggregate> {
        request
            .validate()
            .map_err(|e| AnalyticsError::Validation(e.to_string()))?;
        let period = request.resolve_period()?;
        let now = self.clock.now();

        match request.family {
            MetricFamily::Transitions => self.transitions(request, period, now).await,
            MetricFamily::AiPrefill => self.ai_prefill(request, period, now).await,
            MetricFamily::Uploads => self.uploads(request, period, now).await,
            MetricFamily::Overview => self.overview(request, period, now).await,
        }
    }

    async fn transitions(
        &self,
        request: &MetricsRequest,
        period: Period,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<MetricsAggregate> {
        let segments = self.segments(request.family, period, now)?;
        let (window_start, window_end) = bounds(&segments)?;

        let lookback = self.config.transition_lookback_days.max(0);
        let from = Duration::try_days(lookback)
            .and_then(|span| window_start.checked_sub_signed(span))
            .ok_or_else(|| {
                AnalyticsError::InvalidConfiguration(format!(
                    "transition lookback of {} days is out of range",
                    lookback
                ))
            })?;

        let criteria = AuditCriteria {
            entity_type: self.config.entity_type.clone(),
            from,
            to: window_end,
        };

        let (snapshots, events) = futures::try_join!(
            self.fetch_snapshots(request),
            self.store
                .fetch_audit_events(criteria)
                .map_err(AnalyticsError::from)
                .try_collect::<Vec<_>>(),
        )?;

        let keys: HashSet<String> = snapshots
            .iter()
            .map(|snapshot| snapshot.logical_key.clone())
            .collect();
        let reconstruction = TransitionReconstructor::reconstruct_all(events, Some(&keys));

        if reconstruction.skipped_events > 0 {
            tracing::info!(
                skipped = reconstruction.skipped_events,
                "Audit events without a usable status were skipped"
            );
            metrics::record_skipped_events(reconstruction.skipped_events);
        }

        let periods = PeriodAggregator::aggregate(&reconstruction.samples, &segments);
        let trend = TrendBlender::blend(&periods);

        let mut aggregate = MetricsAggregate::empty(request.family, period, now);
        aggregate.segments = periods;
        aggregate.trend = trend;
        Ok(aggregate)
    }

    async fn ai_prefill(
        &self,
        request: &MetricsRequest,
        period: Period,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<MetricsAggregate> {
        let segments = self.segments(request.family, period, now)?;
        let snapshots = self.fetch_snapshots(request).await?;

        let mut aggregate = MetricsAggregate::empty(request.family, period, now);
        aggregate.prefill = PrefillTrend::compute(&snapshots, &segments);
        Ok(aggregate)
    }

    async fn uploads(
        &self,
        request: &MetricsRequest,
        period: Period,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<MetricsAggregate> {
        let snapshots = self.fetch_snapshots(request).await?;

        let mut aggregate = MetricsAggregate::empty(request.family, period, now);
        aggregate.weekly_grid = Some(WeeklyGridComputer::new(now).compute(&snapshots));
        Ok(aggregate)
    }

    async fn overview(
        &self,
        request: &MetricsRequest,
        period: Period,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<MetricsAggregate> {
        let mut snapshots = self.fetch_snapshots(request).await?;

        if request.brd_scope == BrdScope::All {
            let segments = self.segments(request.family, period, now)?;
            let (window_start, window_end) = bounds(&segments)?;
            snapshots.retain(|s| s.created_at >= window_start && s.created_at < window_end);
        }

        let mut aggregate = MetricsAggregate::empty(request.family, period, now);
        aggregate.overview = Some(BrdOverview::from_snapshots(&snapshots));
        Ok(aggregate)
    }

    fn segments(
        &self,
        family: MetricFamily,
        period: Period,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<Vec<TimeSegment>> {
        TimeSegmentBuilder::build(period, now, family.year_buckets())
    }

    /// Deduplicated snapshots for the request scope.
    ///
    /// `team` reads the user's own snapshots followed by the system-wide
    /// query; the overlap collapses to the first copy.
    async fn fetch_snapshots(&self, request: &MetricsRequest) -> AnalyticsResult<Vec<EntitySnapshot>> {
        let family = StatusFamily::from(request.brd_scope);
        let own = self.store.fetch_snapshots(SnapshotCriteria::new(
            SnapshotOwner::Creator(request.user_id.clone()),
            family,
        ));

        let stream = match request.scope {
            Scope::Me => own,
            Scope::Team => own
                .chain(
                    self.store
                        .fetch_snapshots(SnapshotCriteria::new(SnapshotOwner::Anyone, family)),
                )
                .boxed(),
        };

        let raw: Vec<EntitySnapshot> = stream.try_collect().await?;
        Ok(EntityDeduplicator::dedupe(raw))
    }
}

fn bounds(segments: &[TimeSegment]) -> AnalyticsResult<(DateTime<Utc>, DateTime<Utc>)> {
    window_bounds(segments)
        .ok_or_else(|| AnalyticsError::InvalidConfiguration("empty reporting window".to_string()))
}
