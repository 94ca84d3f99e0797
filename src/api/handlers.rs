use crate::analytics::{BrdScope, MetricFamily, MetricsAggregate, MetricsRequest, Scope};
use crate::api::AppState;
use crate::error::{AppError, Result};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Header carrying the authenticated caller
pub const USER_ID_HEADER: &str = "x-user-id";

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Prometheus scrape endpoint
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::gather_metrics(),
    )
}

/// Query string shared by the dashboard endpoints
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub scope: Option<String>,
    #[serde(rename = "brdScope")]
    pub brd_scope: Option<String>,
    pub period: Option<String>,
}

/// Average days per status transition
pub async fn transitions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<MetricsAggregate>> {
    aggregate(&state, MetricFamily::Transitions, &headers, query).await
}

/// Assistant prefill trend
pub async fn ai_prefill(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<MetricsAggregate>> {
    aggregate(&state, MetricFamily::AiPrefill, &headers, query).await
}

/// 52-week upload grid
pub async fn uploads(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<MetricsAggregate>> {
    aggregate(&state, MetricFamily::Uploads, &headers, query).await
}

/// Counts by status and industry vertical
pub async fn overview(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<MetricsAggregate>> {
    aggregate(&state, MetricFamily::Overview, &headers, query).await
}

async fn aggregate(
    state: &AppState,
    family: MetricFamily,
    headers: &HeaderMap,
    query: DashboardQuery,
) -> Result<Json<MetricsAggregate>> {
    let request = build_request(family, headers, query)?;
    let aggregate = state.facade.aggregate(&request).await?;
    Ok(Json(aggregate))
}

/// Translate the raw HTTP inputs into a facade request
pub fn build_request(
    family: MetricFamily,
    headers: &HeaderMap,
    query: DashboardQuery,
) -> Result<MetricsRequest> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Validation(format!("missing {} header", USER_ID_HEADER)))?;

    let mut request = MetricsRequest::new(family, user_id);

    if let Some(scope) = query.scope.as_deref() {
        request = request.with_scope(parse_param::<Scope>("scope", scope)?);
    }
    if let Some(brd_scope) = query.brd_scope.as_deref() {
        request = request.with_brd_scope(parse_param::<BrdScope>("brdScope", brd_scope)?);
    }
    if let Some(period) = query.period {
        request = request.with_period(period);
    }

    Ok(request)
}

fn parse_param<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    T::from_str(raw.trim())
        .map_err(|_| AppError::Validation(format!("unknown {} value: {}", name, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_for(user: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_str(user).unwrap());
        headers
    }

    #[test]
    fn test_build_request_defaults() {
        let request = build_request(
            MetricFamily::Transitions,
            &headers_for("user-1"),
            DashboardQuery::default(),
        )
        .unwrap();

        assert_eq!(request.user_id, "user-1");
        assert_eq!(request.scope, Scope::Me);
        assert_eq!(request.brd_scope, BrdScope::Open);
        assert!(request.period.is_none());
    }

    #[test]
    fn test_build_request_parses_query() {
        let query = DashboardQuery {
            scope: Some("TEAM".to_string()),
            brd_scope: Some("all".to_string()),
            period: Some("year".to_string()),
        };
        let request =
            build_request(MetricFamily::Overview, &headers_for("user-2"), query).unwrap();

        assert_eq!(request.scope, Scope::Team);
        assert_eq!(request.brd_scope, BrdScope::All);
        assert_eq!(request.period.as_deref(), Some("year"));
    }

    #[test]
    fn test_missing_user_header_is_validation_error() {
        let err = build_request(
            MetricFamily::Uploads,
            &HeaderMap::new(),
            DashboardQuery::default(),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_unknown_scope_is_validation_error() {
        let query = DashboardQuery {
            scope: Some("everyone".to_string()),
            ..Default::default()
        };
        let err = build_request(MetricFamily::Transitions, &headers_for("u"), query).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
