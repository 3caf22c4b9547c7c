use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Performance metrics collector for the web server
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
    total_response_time_ms: AtomicU64,
    active_sessions: AtomicU64,
    total_events_broadcast: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful HTTP request
    pub fn record_request_success(&self, duration_ms: u64) {
        self.inner.total_requests.fetch_add(1, Ordering::Relaxed);
        self.inner
            .successful_requests
            .fetch_add(1, Ordering::Relaxed);
        self.inner
            .total_response_time_ms
            .fetch_add(duration_ms, Ordering::Relaxed);
    }

    /// Record a failed HTTP request
    pub fn record_request_failure(&self, duration_ms: u64) {
        self.inner.total_requests.fetch_add(1, Ordering::Relaxed);
        self.inner.failed_requests.fetch_add(1, Ordering::Relaxed);
        self.inner
            .total_response_time_ms
            .fetch_add(duration_ms, Ordering::Relaxed);
    }

    pub fn increment_active_sessions(&self) {
        let count = self.inner.active_sessions.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(active_sessions = count, "session count increased");
    }

    pub fn decrement_active_sessions(&self) {
        let mut current = self.inner.active_sessions.load(Ordering::Relaxed);
        loop {
            if current == 0 {
                tracing::warn!("attempted to decrement active_sessions below zero");
                return;
            }

            match self.inner.active_sessions.compare_exchange(
                current,
                current - 1,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    pub fn record_event_broadcast(&self) {
        self.inner
            .total_events_broadcast
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of current metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.inner.total_requests.load(Ordering::Relaxed),
            successful_requests: self.inner.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.inner.failed_requests.load(Ordering::Relaxed),
            total_response_time_ms: self.inner.total_response_time_ms.load(Ordering::Relaxed),
            active_sessions: self.inner.active_sessions.load(Ordering::Relaxed),
            total_events_broadcast: self.inner.total_events_broadcast.load(Ordering::Relaxed),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        let avg_response_time = if snapshot.total_requests > 0 {
            snapshot.total_response_time_ms / snapshot.total_requests
        } else {
            0
        };

        tracing::info!(
            total_requests = snapshot.total_requests,
            successful_requests = snapshot.successful_requests,
            failed_requests = snapshot.failed_requests,
            avg_response_time_ms = avg_response_time,
            active_sessions = snapshot.active_sessions,
            total_events_broadcast = snapshot.total_events_broadcast,
            "performance metrics"
        );
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub total_response_time_ms: u64,
    pub active_sessions: u64,
    pub total_events_broadcast: u64,
}

/// Timer for measuring a single request's duration
#[derive(Debug)]
pub struct RequestTimer {
    start: Instant,
    metrics: MetricsCollector,
}

impl RequestTimer {
    pub fn start(metrics: MetricsCollector) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    pub fn finish_success(self) {
        let elapsed = self.start.elapsed().as_millis() as u64;
        self.metrics.record_request_success(elapsed);
    }

    pub fn finish_failure(self) {
        let elapsed = self.start.elapsed().as_millis() as u64;
        self.metrics.record_request_failure(elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_counters_accumulate() {
        let metrics = MetricsCollector::new();
        metrics.record_request_success(10);
        metrics.record_request_success(20);
        metrics.record_request_failure(5);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 3);
        assert_eq!(snapshot.successful_requests, 2);
        assert_eq!(snapshot.failed_requests, 1);
        assert_eq!(snapshot.total_response_time_ms, 35);
    }

    #[test]
    fn session_gauge_never_goes_negative() {
        let metrics = MetricsCollector::new();
        metrics.decrement_active_sessions();
        assert_eq!(metrics.snapshot().active_sessions, 0);

        metrics.increment_active_sessions();
        metrics.increment_active_sessions();
        metrics.decrement_active_sessions();
        assert_eq!(metrics.snapshot().active_sessions, 1);
    }

    #[test]
    fn timer_records_on_finish() {
        let metrics = MetricsCollector::new();
        let timer = RequestTimer::start(metrics.clone());
        timer.finish_success();
        assert_eq!(metrics.snapshot().successful_requests, 1);
    }
}
