//! Prometheus metrics
//!
//! This module provides:
//! - Recorder installation at startup
//! - Middleware counting requests and timing them per route template
//! - The `/metrics` endpoint
//! - Goal lifecycle counters

use crate::state::AppState;
use anyhow::Result;
use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const GOALS_CREATED_TOTAL: &str = "goals_created_total";
pub const GOAL_CONFLICTS_TOTAL: &str = "goal_conflicts_total";
pub const GOALS_COMPLETED_TOTAL: &str = "goals_completed_total";

/// Install the global Prometheus recorder; call once at startup
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    describe_counter!(HTTP_REQUESTS_TOTAL, "Total number of HTTP requests received");
    describe_histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "HTTP request duration in seconds"
    );
    describe_counter!(GOALS_CREATED_TOTAL, "Goals stored through the API");
    describe_counter!(
        GOAL_CONFLICTS_TOTAL,
        "Goal writes refused because an active goal with the same title exists"
    );
    describe_counter!(
        GOALS_COMPLETED_TOTAL,
        "Goals completed by a progress update reaching the target"
    );

    Ok(handle)
}

/// GET /metrics
pub async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.as_ref() {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Metrics not initialized".to_string(),
        ),
    }
}

/// Records `http_requests_total` and `http_request_duration_seconds`,
/// labelled with the route template rather than the concrete path
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();

    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let method = request.method().to_string();

    let response = next.run(request).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(HTTP_REQUESTS_TOTAL, "method" => method.clone(), "path" => path.clone(), "status" => status).increment(1);
    histogram!(HTTP_REQUEST_DURATION_SECONDS, "method" => method, "path" => path).record(duration);

    response
}

pub fn record_goal_created() {
    counter!(GOALS_CREATED_TOTAL).increment(1);
}

pub fn record_goal_conflict() {
    counter!(GOAL_CONFLICTS_TOTAL).increment(1);
}

pub fn record_goal_completed() {
    counter!(GOALS_COMPLETED_TOTAL).increment(1);
}
