use crate::session::SessionId;
use bjtrain_engine::trainer::TrainingStats;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

// Use bounded channel with reasonable buffer size to prevent memory exhaustion
// If all subscribers are slow, events will be dropped (backpressure)
const EVENT_CHANNEL_BUFFER: usize = 1000;

pub type EventSender = mpsc::Sender<TrainingEvent>;
pub type EventReceiver = mpsc::Receiver<TrainingEvent>;

pub struct EventSubscription {
    bus: EventBus,
    session_id: SessionId,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl EventSubscription {
    pub fn receiver(&mut self) -> &mut EventReceiver {
        &mut self.receiver
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.session_id, self.subscriber_id);
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<HashMap<SessionId, Vec<(usize, EventSender)>>>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, session_id: SessionId) -> EventSubscription {
        let (subscriber_id, receiver) = self.subscribe_raw(session_id.clone());
        EventSubscription {
            bus: self.clone(),
            session_id,
            subscriber_id,
            receiver,
        }
    }

    fn subscribe_raw(&self, session_id: SessionId) -> (usize, EventReceiver) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        let mut guard = self
            .inner
            .subscribers
            .write()
            .expect("subscriber lock poisoned");
        guard.entry(session_id.clone()).or_default().push((id, tx));

        tracing::info!(
            session_id = %session_id,
            subscriber_id = id,
            "client subscribed to training events"
        );

        (id, rx)
    }

    pub fn broadcast(&self, session_id: &SessionId, event: TrainingEvent) {
        tracing::debug!(
            session_id = %session_id,
            event_type = ?event,
            "broadcasting training event"
        );

        let subscribers = {
            let guard = self
                .inner
                .subscribers
                .read()
                .expect("subscriber lock poisoned");
            guard.get(session_id).cloned()
        };

        if let Some(list) = subscribers {
            let mut failed = Vec::new();
            for (id, sender) in list {
                // try_send implements backpressure: slow subscribers drop events
                if let Err(e) = sender.try_send(event.clone()) {
                    tracing::warn!(
                        session_id = %session_id,
                        subscriber_id = id,
                        error = ?e,
                        "failed to send event to subscriber"
                    );
                    failed.push(id);
                }
            }
            if !failed.is_empty() {
                self.remove_subscribers(session_id, &failed);
            }
        } else {
            tracing::debug!(
                session_id = %session_id,
                "no subscribers for session"
            );
        }
    }

    pub fn unsubscribe(&self, session_id: &SessionId, subscriber_id: usize) {
        self.remove_subscribers(session_id, &[subscriber_id]);
    }

    pub fn drop_session(&self, session_id: &SessionId) {
        let mut guard = self
            .inner
            .subscribers
            .write()
            .expect("subscriber lock poisoned");
        guard.remove(session_id);
    }

    pub fn subscriber_count(&self) -> usize {
        let guard = self
            .inner
            .subscribers
            .read()
            .expect("subscriber lock poisoned");
        guard.values().map(|list| list.len()).sum()
    }

    fn remove_subscribers(&self, session_id: &SessionId, ids: &[usize]) {
        let mut guard = self
            .inner
            .subscribers
            .write()
            .expect("subscriber lock poisoned");
        if let Some(list) = guard.get_mut(session_id) {
            list.retain(|(id, _)| !ids.contains(id));
            if list.is_empty() {
                guard.remove(session_id);
            }
        }
    }
}

/// Events pushed to SSE subscribers over the course of a training session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrainingEvent {
    SessionStarted {
        session_id: SessionId,
        rules: RulesInfo,
    },
    HandDealt {
        session_id: SessionId,
        hand: Vec<String>,
        hand_value: u32,
        dealer_card: String,
    },
    AnswerChecked {
        session_id: SessionId,
        player_action: String,
        correct_action: String,
        is_correct: bool,
        exception: Option<String>,
        stats: TrainingStats,
    },
    SessionEnded {
        session_id: SessionId,
        reason: String,
        stats: Option<TrainingStats>,
    },
    Error {
        session_id: SessionId,
        message: String,
    },
}

/// Table rules as reported to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesInfo {
    pub num_decks: usize,
    pub dealer_hits_soft_17: bool,
    pub level: u8,
}
