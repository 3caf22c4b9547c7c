use std::sync::Arc;
use std::time::Instant;
use warp::http::StatusCode;
use warp::reject::Rejection;
use warp::reply::Reply;
use warp::Filter;

use crate::metrics::MetricsCollector;

/// Middleware for logging HTTP requests and responses
pub fn with_request_logging<F, T>(
    filter: F,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone
where
    F: Filter<Extract = (T,), Error = Rejection> + Clone + Send + Sync + 'static,
    T: Reply,
{
    warp::any()
        .and(warp::path::full())
        .and(warp::method())
        .map(|path: warp::path::FullPath, method: warp::http::Method| {
            let start = Instant::now();
            tracing::info!(
                path = %path.as_str(),
                method = %method,
                "incoming request"
            );
            start
        })
        .and(filter)
        .map(|start: Instant, reply: T| {
            let duration = start.elapsed();
            tracing::info!(duration_ms = duration.as_millis(), "request completed");
            reply
        })
}

/// Like [`with_request_logging`], but also records request counts and latency
/// into the shared [`MetricsCollector`]. Responses with a 5xx status count as
/// failures; everything else (including 4xx client mistakes) counts as success.
pub fn with_request_metrics<F, T>(
    metrics: Arc<MetricsCollector>,
    filter: F,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone
where
    F: Filter<Extract = (T,), Error = Rejection> + Clone + Send + Sync + 'static,
    T: Reply,
{
    warp::any()
        .map(move || (Arc::clone(&metrics), Instant::now()))
        .and(filter)
        .map(|(metrics, start): (Arc<MetricsCollector>, Instant), reply: T| {
            let response = reply.into_response();
            let elapsed = start.elapsed().as_millis() as u64;
            if response.status().is_server_error() {
                metrics.record_request_failure(elapsed);
            } else {
                metrics.record_request_success(elapsed);
            }
            response
        })
}

/// Log a completed response at a level matching its status class.
pub fn log_response(status: StatusCode, path: &str, method: &str, duration_ms: u128) {
    if status.is_client_error() {
        tracing::warn!(
            status = %status.as_u16(),
            path = %path,
            method = %method,
            duration_ms = duration_ms,
            "client error"
        );
    } else if status.is_server_error() {
        tracing::error!(
            status = %status.as_u16(),
            path = %path,
            method = %method,
            duration_ms = duration_ms,
            "server error"
        );
    } else {
        tracing::info!(
            status = %status.as_u16(),
            path = %path,
            method = %method,
            duration_ms = duration_ms,
            "response sent"
        );
    }
}
