//! HTTP surface tests driven through the router without a socket

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use brd_dashboard::analytics::{AnalyticsConfig, FixedClock, MetricsFacade};
use brd_dashboard::api::{build_router, AppState};
use common::*;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    build_router(AppState::new(Arc::new(facade(worked_fixture()))))
}

async fn get(app: Router, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }

    let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = get(app(), "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_transitions_endpoint() {
    let (status, body) = get(app(), "/v1/dashboard/transitions?period=month", Some(USER)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["family"], "transitions");
    assert_eq!(body["period"], "month");
    assert_eq!(body["segments"].as_array().unwrap().len(), 1);

    let averages = &body["segments"][0]["average_by_transition"];
    assert_eq!(averages.as_object().unwrap().len(), 7);
    assert_close(averages["Draft -> In Progress"].as_f64().unwrap(), 2.7, 0.1);
    assert_close(body["trend"][0]["blended_average"].as_f64().unwrap(), 3.0, 0.1);
}

#[tokio::test]
async fn test_query_parameters_are_forwarded() {
    let (status, body) = get(
        app(),
        "/v1/dashboard/overview?scope=team&brdScope=all&period=Year",
        Some(OTHER_USER),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["period"], "year");
    assert_eq!(body["overview"]["total"], 2);
}

#[tokio::test]
async fn test_uploads_and_prefill_endpoints() {
    let (status, body) = get(app(), "/v1/dashboard/uploads", Some(USER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["weekly_grid"]["new_total"].as_array().unwrap().len(), 52);

    let (status, body) = get(app(), "/v1/dashboard/ai-prefill?period=quarter", Some(USER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prefill"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_missing_user_header_is_bad_request() {
    let (status, body) = get(app(), "/v1/dashboard/transitions", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_all_scope_without_period_is_bad_request() {
    let (status, body) = get(app(), "/v1/dashboard/transitions?brdScope=all", Some(USER)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let facade = MetricsFacade::new(
        AnalyticsConfig::default(),
        Arc::new(FailingStore),
        Arc::new(FixedClock::new(now())),
    );
    let app = build_router(AppState::new(Arc::new(facade)));

    let (status, body) = get(app, "/v1/dashboard/overview", Some(USER)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let _ = brd_dashboard::metrics::init_metrics();
    let _ = get(app(), "/v1/dashboard/transitions?period=month", Some(USER)).await;

    let response = app()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("brd_dashboard_aggregations_total"));
}
