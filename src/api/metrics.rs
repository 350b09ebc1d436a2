//! Prometheus metrics endpoint and HTTP request tracking middleware.

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::time::Instant;

use crate::db::DashboardStats;
use crate::AppState;

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const HTTP_RATE_LIMITED_TOTAL: &str = "http_rate_limited_total";
pub const CONTACT_MESSAGES_RECEIVED_TOTAL: &str = "contact_messages_received_total";
pub const UPLOADS_TOTAL: &str = "uploads_total";
pub const CONTACT_MESSAGES_UNREAD: &str = "contact_messages_unread";
pub const BLOG_POSTS_PUBLISHED: &str = "blog_posts_published";

/// Install the global Prometheus recorder. Call once at startup.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(HTTP_REQUESTS_TOTAL, "Total number of HTTP requests received");
    describe_histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "HTTP request duration in seconds"
    );
    describe_counter!(
        HTTP_RATE_LIMITED_TOTAL,
        "Requests rejected by the rate limiter"
    );
    describe_counter!(
        CONTACT_MESSAGES_RECEIVED_TOTAL,
        "Contact form submissions stored"
    );
    describe_counter!(UPLOADS_TOTAL, "Media files uploaded by kind");
    describe_gauge!(CONTACT_MESSAGES_UNREAD, "Contact messages not yet read");
    describe_gauge!(BLOG_POSTS_PUBLISHED, "Published blog posts");

    Ok(handle)
}

/// GET /metrics - Prometheus text format, no authentication.
pub async fn metrics_endpoint(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if let Ok(stats) = DashboardStats::collect(&state.db).await {
        gauge!(CONTACT_MESSAGES_UNREAD).set(stats.unread_messages as f64);
        gauge!(BLOG_POSTS_PUBLISHED).set(stats.published_posts as f64);
    }

    match state.metrics_handle.as_ref() {
        Some(h) => (StatusCode::OK, h.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Metrics not initialized".to_string(),
        ),
    }
}

/// Records `http_requests_total` and `http_request_duration_seconds`,
/// labelled by the matched route pattern rather than the raw path.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();

    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let method = request.method().to_string();

    let response = next.run(request).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(HTTP_REQUESTS_TOTAL, "method" => method.clone(), "path" => path.clone(), "status" => status).increment(1);
    histogram!(HTTP_REQUEST_DURATION_SECONDS, "method" => method, "path" => path).record(duration);

    response
}

pub fn record_contact_message() {
    counter!(CONTACT_MESSAGES_RECEIVED_TOTAL).increment(1);
}

pub fn record_upload(kind: &'static str) {
    counter!(UPLOADS_TOTAL, "kind" => kind).increment(1);
}
