//! Web front end for the blackjack basic strategy trainer.
//!
//! Exposes the training engine over a small JSON API plus a server-sent
//! events stream, and serves the bundled static frontend.

pub mod errors;
pub mod events;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod session;
pub mod static_handler;

pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use events::{EventBus, RulesInfo, TrainingEvent};
pub use logging::{LogEntry, TestLogSubscriber, init_logging, init_test_logging};
pub use metrics::{MetricsCollector, MetricsSnapshot, RequestTimer};
pub use middleware::{log_response, with_request_logging, with_request_metrics};
pub use server::{AppContext, ServerConfig, ServerError, ServerHandle, WebServer};
pub use session::{
    AnswerView, HandView, SessionConfig, SessionError, SessionId, SessionManager,
    SessionStateResponse, TrainingSession,
};
pub use static_handler::{StaticError, StaticHandler};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_provides_shared_components() {
        let ctx = AppContext::new_for_tests();

        let event_bus = ctx.event_bus();
        let sessions = ctx.sessions();

        assert_eq!(event_bus.subscriber_count(), 0);
        assert!(sessions.active_sessions().is_empty());
    }

    #[test]
    fn test_config_points_at_shipped_strategy_data() {
        let config = ServerConfig::for_tests();
        assert!(config.data_dir().join("single-deck.csv").exists());
        assert!(config.data_dir().join("multi-deck.csv").exists());
    }
}
