use crate::events::{EventBus, RulesInfo, TrainingEvent};
use bjtrain_engine::levels;
use bjtrain_engine::rules::Rules;
use bjtrain_engine::strategy::Action;
use bjtrain_engine::trainer::{Trainer, TrainingStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

pub type SessionId = String;

const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);
const DEFAULT_MAX_SESSIONS: usize = 1000;

/// Rules requested for a new training session. Everything is optional;
/// omitted fields fall back to a single deck, H17, level 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    pub num_decks: usize,
    pub dealer_hits_soft_17: bool,
    pub level: u8,
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            num_decks: 1,
            dealer_hits_soft_17: true,
            level: 0,
            seed: None,
        }
    }
}

impl SessionConfig {
    fn validate(&self) -> Result<(), SessionError> {
        if self.num_decks != 1 && self.num_decks != 6 {
            return Err(SessionError::InvalidRules(format!(
                "num_decks must be 1 or 6, got {}",
                self.num_decks
            )));
        }
        if self.level > levels::MAX_LEVEL {
            return Err(SessionError::InvalidRules(format!(
                "level must be 0-{}, got {}",
                levels::MAX_LEVEL,
                self.level
            )));
        }
        Ok(())
    }

    fn to_rules(&self) -> Rules {
        Rules {
            num_decks: self.num_decks,
            dealer_hits_soft_17: self.dealer_hits_soft_17,
            level: self.level,
        }
    }

    pub fn rules_info(&self) -> RulesInfo {
        RulesInfo {
            num_decks: self.num_decks,
            dealer_hits_soft_17: self.dealer_hits_soft_17,
            level: self.level,
        }
    }
}

/// The player's current hand as reported to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandView {
    pub cards: Vec<String>,
    pub value: u32,
    pub is_soft: bool,
    pub is_pair: bool,
    pub strategy_key: String,
    pub dealer_card: String,
}

/// Outcome of grading one answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerView {
    pub player_action: String,
    pub correct_action: String,
    pub correct_action_name: String,
    pub is_correct: bool,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
    pub stats: TrainingStats,
}

/// Full session state for GET responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStateResponse {
    pub session_id: SessionId,
    pub rules: RulesInfo,
    pub created_at: String,
    pub stats: TrainingStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_hand: Option<HandView>,
}

/// One learner's training session. The trainer is single-threaded, so
/// every operation takes the inner lock.
#[derive(Debug)]
pub struct TrainingSession {
    id: SessionId,
    config: SessionConfig,
    created_at: DateTime<Utc>,
    trainer: Mutex<Trainer>,
    last_activity: Mutex<Instant>,
}

impl TrainingSession {
    fn new(id: SessionId, config: SessionConfig, data_dir: &PathBuf) -> Result<Self, SessionError> {
        let rules = config.to_rules();
        let trainer = match config.seed {
            Some(seed) => Trainer::with_seed(rules, data_dir, seed),
            None => Trainer::new(rules, data_dir),
        }
        .map_err(|e| SessionError::EngineError(e.to_string()))?;

        Ok(Self {
            id,
            config,
            created_at: Utc::now(),
            trainer: Mutex::new(trainer),
            last_activity: Mutex::new(Instant::now()),
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn config(&self) -> SessionConfig {
        self.config.clone()
    }

    pub fn deal(&self) -> Result<HandView, SessionError> {
        let mut trainer = self
            .trainer
            .lock()
            .map_err(|_| SessionError::StoragePoisoned)?;
        let (hand, dealer) = trainer
            .deal_hand()
            .map_err(|e| SessionError::EngineError(e.to_string()))?;
        Ok(hand_view(&hand, dealer))
    }

    pub fn answer(&self, action: Action) -> Result<AnswerView, SessionError> {
        let mut trainer = self
            .trainer
            .lock()
            .map_err(|_| SessionError::StoragePoisoned)?;
        let result = trainer.check_answer(action).map_err(|e| match e {
            bjtrain_engine::errors::TrainerError::NoActiveHand => {
                SessionError::InvalidAction("no active hand; deal first".to_string())
            }
            other => SessionError::EngineError(other.to_string()),
        })?;
        let stats = *trainer.stats();
        Ok(AnswerView {
            player_action: result.player_action.code().to_string(),
            correct_action: result.correct_action.code().to_string(),
            correct_action_name: result.correct_action.name().to_string(),
            is_correct: result.is_correct,
            feedback: result.feedback(),
            exception: result.exception_description,
            stats,
        })
    }

    pub fn state(&self) -> Result<SessionStateResponse, SessionError> {
        let trainer = self
            .trainer
            .lock()
            .map_err(|_| SessionError::StoragePoisoned)?;
        let current_hand = trainer
            .current_hand()
            .map(|(hand, dealer)| hand_view(hand, dealer));
        Ok(SessionStateResponse {
            session_id: self.id.clone(),
            rules: self.config.rules_info(),
            created_at: self.created_at.to_rfc3339(),
            stats: *trainer.stats(),
            current_hand,
        })
    }

    pub fn stats(&self) -> Result<TrainingStats, SessionError> {
        let trainer = self
            .trainer
            .lock()
            .map_err(|_| SessionError::StoragePoisoned)?;
        Ok(*trainer.stats())
    }

    pub fn touch(&self) {
        if let Ok(mut last) = self.last_activity.lock() {
            *last = Instant::now();
        }
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        match self.last_activity.lock() {
            Ok(last) => last.elapsed() > ttl,
            Err(_) => true,
        }
    }
}

fn hand_view(hand: &bjtrain_engine::hand::Hand, dealer: bjtrain_engine::cards::Card) -> HandView {
    HandView {
        cards: hand.cards().iter().map(|c| c.to_string()).collect(),
        value: hand.value(),
        is_soft: hand.is_soft(),
        is_pair: hand.is_pair(),
        strategy_key: hand.strategy_key(),
        dealer_card: dealer.to_string(),
    }
}

/// Shared registry of live training sessions.
#[derive(Debug)]
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<TrainingSession>>>,
    event_bus: Arc<EventBus>,
    data_dir: PathBuf,
    session_ttl: Duration,
    max_sessions: usize,
}

impl SessionManager {
    pub fn new(event_bus: Arc<EventBus>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            event_bus,
            data_dir: data_dir.into(),
            session_ttl: DEFAULT_SESSION_TTL,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    pub fn with_ttl(event_bus: Arc<EventBus>, data_dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            session_ttl: ttl,
            ..Self::new(event_bus, data_dir)
        }
    }

    pub fn create_session(&self, config: SessionConfig) -> Result<SessionId, SessionError> {
        config.validate()?;

        {
            let guard = self
                .sessions
                .read()
                .map_err(|_| SessionError::StoragePoisoned)?;
            if guard.len() >= self.max_sessions {
                return Err(SessionError::LimitReached(self.max_sessions));
            }
        }

        let id = Uuid::new_v4().to_string();

        tracing::info!(
            session_id = %id,
            num_decks = config.num_decks,
            dealer_hits_soft_17 = config.dealer_hits_soft_17,
            level = config.level,
            "creating new training session"
        );

        let session = Arc::new(TrainingSession::new(id.clone(), config.clone(), &self.data_dir)?);

        {
            let mut guard = self
                .sessions
                .write()
                .map_err(|_| SessionError::StoragePoisoned)?;
            if guard.len() >= self.max_sessions {
                return Err(SessionError::LimitReached(self.max_sessions));
            }
            guard.insert(id.clone(), Arc::clone(&session));
        }

        self.event_bus.broadcast(
            &id,
            TrainingEvent::SessionStarted {
                session_id: id.clone(),
                rules: config.rules_info(),
            },
        );

        Ok(id)
    }

    pub fn get_session(&self, id: &SessionId) -> Result<Arc<TrainingSession>, SessionError> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    pub fn state(&self, session_id: &SessionId) -> Result<SessionStateResponse, SessionError> {
        let session = self.live_session(session_id)?;
        session.touch();
        session.state()
    }

    pub fn deal(&self, session_id: &SessionId) -> Result<HandView, SessionError> {
        let session = self.live_session(session_id)?;
        session.touch();
        let view = session.deal()?;

        self.event_bus.broadcast(
            session_id,
            TrainingEvent::HandDealt {
                session_id: session_id.clone(),
                hand: view.cards.clone(),
                hand_value: view.value,
                dealer_card: view.dealer_card.clone(),
            },
        );

        Ok(view)
    }

    pub fn answer(&self, session_id: &SessionId, action: Action) -> Result<AnswerView, SessionError> {
        let session = self.live_session(session_id)?;
        session.touch();
        let view = session.answer(action)?;

        self.event_bus.broadcast(
            session_id,
            TrainingEvent::AnswerChecked {
                session_id: session_id.clone(),
                player_action: view.player_action.clone(),
                correct_action: view.correct_action.clone(),
                is_correct: view.is_correct,
                exception: view.exception.clone(),
                stats: view.stats,
            },
        );

        Ok(view)
    }

    pub fn delete_session(&self, session_id: &SessionId) -> Result<(), SessionError> {
        match self.remove_session(session_id)? {
            Some(session) => {
                let stats = session.stats().ok();
                self.event_bus.broadcast(
                    session_id,
                    TrainingEvent::SessionEnded {
                        session_id: session_id.clone(),
                        reason: "terminated_by_request".into(),
                        stats,
                    },
                );
                self.event_bus.drop_session(session_id);
                Ok(())
            }
            None => Err(SessionError::NotFound(session_id.clone())),
        }
    }

    pub fn cleanup_expired_sessions(&self) {
        let mut expired = Vec::new();
        {
            let mut guard = match self.sessions.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.retain(|id, session| {
                if session.is_expired(self.session_ttl) {
                    expired.push(id.clone());
                    false
                } else {
                    true
                }
            });
        }

        for id in expired {
            self.event_bus.broadcast(
                &id,
                TrainingEvent::SessionEnded {
                    session_id: id.clone(),
                    reason: "expired".into(),
                    stats: None,
                },
            );
            self.event_bus.drop_session(&id);
        }
    }

    pub fn active_sessions(&self) -> Vec<SessionId> {
        match self.sessions.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    fn live_session(&self, session_id: &SessionId) -> Result<Arc<TrainingSession>, SessionError> {
        let session = self.get_session(session_id)?;
        if session.is_expired(self.session_ttl) {
            self.expire_session(session_id, "expired due to inactivity")?;
            return Err(SessionError::Expired(session_id.clone()));
        }
        Ok(session)
    }

    fn expire_session(&self, session_id: &SessionId, reason: &str) -> Result<(), SessionError> {
        if self.remove_session(session_id)?.is_some() {
            self.event_bus.broadcast(
                session_id,
                TrainingEvent::SessionEnded {
                    session_id: session_id.clone(),
                    reason: reason.to_string(),
                    stats: None,
                },
            );
            self.event_bus.drop_session(session_id);
        }
        Ok(())
    }

    fn remove_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<Arc<TrainingSession>>, SessionError> {
        match self.sessions.write() {
            Ok(mut guard) => Ok(guard.remove(session_id)),
            Err(_) => Err(SessionError::StoragePoisoned),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),
    #[error("Session expired: {0}")]
    Expired(SessionId),
    #[error("Invalid rules: {0}")]
    InvalidRules(String),
    #[error("Invalid action: {0}")]
    InvalidAction(String),
    #[error("Session limit reached ({0} active sessions)")]
    LimitReached(usize),
    #[error("Training engine error: {0}")]
    EngineError(String),
    #[error("Session storage poisoned")]
    StoragePoisoned,
}

impl crate::errors::IntoErrorResponse for SessionError {
    fn status_code(&self) -> warp::http::StatusCode {
        use warp::http::StatusCode;
        match self {
            SessionError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionError::Expired(_) => StatusCode::GONE,
            SessionError::InvalidRules(_) => StatusCode::BAD_REQUEST,
            SessionError::InvalidAction(_) => StatusCode::BAD_REQUEST,
            SessionError::LimitReached(_) => StatusCode::TOO_MANY_REQUESTS,
            SessionError::EngineError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SessionError::StoragePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SessionError::NotFound(_) => "session_not_found",
            SessionError::Expired(_) => "session_expired",
            SessionError::InvalidRules(_) => "invalid_rules",
            SessionError::InvalidAction(_) => "invalid_action",
            SessionError::LimitReached(_) => "session_limit_reached",
            SessionError::EngineError(_) => "engine_error",
            SessionError::StoragePoisoned => "session_storage_error",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            SessionError::NotFound(id) | SessionError::Expired(id) => {
                Some(serde_json::json!({ "session_id": id }))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
    }

    fn manager() -> SessionManager {
        SessionManager::new(Arc::new(EventBus::new()), data_dir())
    }

    fn seeded_config() -> SessionConfig {
        SessionConfig {
            seed: Some(42),
            ..SessionConfig::default()
        }
    }

    #[test]
    fn create_deal_answer_roundtrip() {
        let mgr = manager();
        let id = mgr.create_session(seeded_config()).expect("create");

        let hand = mgr.deal(&id).expect("deal");
        assert_eq!(hand.cards.len(), 2);
        assert!(!hand.strategy_key.is_empty());

        let answer = mgr.answer(&id, Action::Stand).expect("answer");
        assert_eq!(answer.stats.total, 1);
        assert_eq!(answer.is_correct, answer.correct_action == "S");
    }

    #[test]
    fn answer_without_deal_is_invalid_action() {
        let mgr = manager();
        let id = mgr.create_session(seeded_config()).expect("create");
        let err = mgr.answer(&id, Action::Hit).unwrap_err();
        assert!(matches!(err, SessionError::InvalidAction(_)));
    }

    #[test]
    fn unknown_session_is_not_found() {
        let mgr = manager();
        let err = mgr.state(&"missing".to_string()).unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
    }

    #[test]
    fn invalid_deck_count_is_rejected() {
        let mgr = manager();
        let config = SessionConfig {
            num_decks: 4,
            ..SessionConfig::default()
        };
        let err = mgr.create_session(config).unwrap_err();
        assert!(matches!(err, SessionError::InvalidRules(_)));
    }

    #[test]
    fn invalid_level_is_rejected() {
        let mgr = manager();
        let config = SessionConfig {
            level: 9,
            ..SessionConfig::default()
        };
        let err = mgr.create_session(config).unwrap_err();
        assert!(matches!(err, SessionError::InvalidRules(_)));
    }

    #[test]
    fn delete_removes_session() {
        let mgr = manager();
        let id = mgr.create_session(seeded_config()).expect("create");
        mgr.delete_session(&id).expect("delete");
        assert!(matches!(
            mgr.state(&id).unwrap_err(),
            SessionError::NotFound(_)
        ));
        assert!(matches!(
            mgr.delete_session(&id).unwrap_err(),
            SessionError::NotFound(_)
        ));
    }

    #[test]
    fn expired_session_reports_gone_then_not_found() {
        let mgr = SessionManager::with_ttl(
            Arc::new(EventBus::new()),
            data_dir(),
            Duration::from_millis(0),
        );
        let id = mgr.create_session(seeded_config()).expect("create");
        std::thread::sleep(Duration::from_millis(5));

        assert!(matches!(
            mgr.state(&id).unwrap_err(),
            SessionError::Expired(_)
        ));
        assert!(matches!(
            mgr.state(&id).unwrap_err(),
            SessionError::NotFound(_)
        ));
    }

    #[test]
    fn cleanup_drops_expired_sessions() {
        let mgr = SessionManager::with_ttl(
            Arc::new(EventBus::new()),
            data_dir(),
            Duration::from_millis(0),
        );
        let id = mgr.create_session(seeded_config()).expect("create");
        std::thread::sleep(Duration::from_millis(5));
        mgr.cleanup_expired_sessions();
        assert!(!mgr.active_sessions().contains(&id));
    }

    #[test]
    fn state_reflects_current_hand() {
        let mgr = manager();
        let id = mgr.create_session(seeded_config()).expect("create");

        let state = mgr.state(&id).expect("state");
        assert!(state.current_hand.is_none());

        let dealt = mgr.deal(&id).expect("deal");
        let state = mgr.state(&id).expect("state");
        assert_eq!(state.current_hand, Some(dealt));
    }

    #[test]
    fn session_events_reach_subscribers() {
        let bus = Arc::new(EventBus::new());
        let mgr = SessionManager::new(Arc::clone(&bus), data_dir());
        let id = mgr.create_session(seeded_config()).expect("create");

        let mut sub = bus.subscribe(id.clone());
        mgr.deal(&id).expect("deal");
        mgr.answer(&id, Action::Hit).expect("answer");

        let first = sub.receiver.try_recv().expect("hand dealt event");
        assert!(matches!(first, TrainingEvent::HandDealt { .. }));
        let second = sub.receiver.try_recv().expect("answer event");
        assert!(matches!(second, TrainingEvent::AnswerChecked { .. }));
    }

    #[test]
    fn level_filtered_session_deals_only_level_keys() {
        let mgr = manager();
        let config = SessionConfig {
            level: 4,
            seed: Some(7),
            ..SessionConfig::default()
        };
        let id = mgr.create_session(config).expect("create");
        for _ in 0..20 {
            let hand = mgr.deal(&id).expect("deal");
            assert!(matches!(hand.strategy_key.as_str(), "A6" | "A7" | "99"));
        }
    }
}
