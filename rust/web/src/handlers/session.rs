use crate::session::{SessionConfig, SessionError, SessionId, SessionManager};
use bjtrain_engine::strategy::Action;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::{self, StatusCode};
use warp::reply::{self, Response};
use warp::Reply;

/// Body for POST /api/sessions. All fields optional.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub num_decks: Option<usize>,
    pub dealer_hits_soft_17: Option<bool>,
    pub level: Option<u8>,
    pub seed: Option<u64>,
}

impl CreateSessionRequest {
    fn into_config(self) -> SessionConfig {
        let mut config = SessionConfig::default();
        if let Some(num_decks) = self.num_decks {
            config.num_decks = num_decks;
        }
        if let Some(h17) = self.dealer_hits_soft_17 {
            config.dealer_hits_soft_17 = h17;
        }
        if let Some(level) = self.level {
            config.level = level;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config
    }
}

/// Body for POST /api/sessions/{id}/answer.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub action: String,
}

/// Creates a new training session.
///
/// - **Method**: POST
/// - **Path**: `/api/sessions`
///
/// Accepts an optional JSON body with `num_decks` (1 or 6),
/// `dealer_hits_soft_17`, `level` (0-4), and an RNG `seed` for
/// reproducible sessions. Responds 201 with the new session's state.
///
/// Error cases: `invalid_rules` (400), `session_limit_reached` (429),
/// `engine_error` (500, strategy data failed to load).
pub async fn create_session(
    sessions: Arc<SessionManager>,
    request: CreateSessionRequest,
) -> Response {
    let config = request.into_config();
    match sessions.create_session(config) {
        Ok(session_id) => match sessions.state(&session_id) {
            Ok(state) => success_response(StatusCode::CREATED, state),
            Err(err) => session_error(err),
        },
        Err(err) => session_error(err),
    }
}

/// Retrieves session state: rules, running statistics, and the current
/// hand if one is waiting for an answer.
///
/// - **Method**: GET
/// - **Path**: `/api/sessions/{session_id}`
///
/// Error cases: `session_not_found` (404), `session_expired` (410).
pub async fn get_session(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    match sessions.state(&session_id) {
        Ok(state) => success_response(StatusCode::OK, state),
        Err(err) => session_error(err),
    }
}

/// Deals the next training hand.
///
/// - **Method**: POST
/// - **Path**: `/api/sessions/{session_id}/deal`
///
/// Responds 200 with the dealt hand (cards, value, strategy key, dealer
/// upcard) and broadcasts a `hand_dealt` event to SSE subscribers.
pub async fn deal_hand(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    match sessions.deal(&session_id) {
        Ok(hand) => success_response(StatusCode::OK, hand),
        Err(err) => session_error(err),
    }
}

/// Grades an answer for the current hand.
///
/// - **Method**: POST
/// - **Path**: `/api/sessions/{session_id}/answer`
///
/// The body names the action by its table code: S, H, D, P, or R
/// (case-insensitive). Responds 200 with the grading result and the
/// updated session statistics.
///
/// Error cases: `invalid_action` (400, unknown code or no active hand),
/// `session_not_found` (404), `session_expired` (410).
pub async fn submit_answer(
    sessions: Arc<SessionManager>,
    session_id: SessionId,
    request: AnswerRequest,
) -> Response {
    let code = request.action.trim().to_ascii_uppercase();
    let Some(action) = Action::parse(&code) else {
        return session_error(SessionError::InvalidAction(format!(
            "unknown action '{}', expected one of S H D P R",
            request.action
        )));
    };

    match sessions.answer(&session_id, action) {
        Ok(result) => success_response(StatusCode::OK, result),
        Err(err) => session_error(err),
    }
}

/// Deletes a session and broadcasts a `session_ended` event.
///
/// - **Method**: DELETE
/// - **Path**: `/api/sessions/{session_id}`
///
/// Responds 204 on success, 404 when the session does not exist.
pub async fn delete_session(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    match sessions.delete_session(&session_id) {
        Ok(()) => empty_response(StatusCode::NO_CONTENT),
        Err(err) => session_error(err),
    }
}

fn success_response<T>(status: StatusCode, body: T) -> Response
where
    T: Serialize,
{
    reply::with_status(reply::json(&body), status).into_response()
}

fn empty_response(status: StatusCode) -> Response {
    http::Response::builder()
        .status(status)
        .body(warp::hyper::Body::empty())
        .expect("build empty response")
}

fn session_error(err: SessionError) -> Response {
    use crate::errors::IntoErrorResponse;
    err.into_http_response()
}
