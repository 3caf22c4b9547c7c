use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::hand::Hand;

/// Hand classification reported with each answer. Pairs win over soft
/// hands when both apply (AA is a pair).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HandType {
    Hard,
    Soft,
    Pair,
}

impl HandType {
    pub fn of(hand: &Hand) -> Self {
        if hand.is_pair() {
            HandType::Pair
        } else if hand.is_soft() {
            HandType::Soft
        } else {
            HandType::Hard
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HandType::Hard => "hard",
            HandType::Soft => "soft",
            HandType::Pair => "pair",
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    cards_dealt: AtomicU64,
    shoe_shuffles: AtomicU64,
    hands_dealt: AtomicU64,
    answers_correct: AtomicU64,
    answers_wrong: AtomicU64,
    hard_answers: AtomicU64,
    soft_answers: AtomicU64,
    pair_answers: AtomicU64,
    sessions_ended: AtomicU64,
    // Streak gauges mirror the session stats after the latest answer.
    current_streak: AtomicU64,
    best_streak: AtomicU64,
    wrong_by_hand: Mutex<HashMap<String, u64>>,
    answers_by_dealer: Mutex<HashMap<String, u64>>,
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub cards_dealt: u64,
    pub shoe_shuffles: u64,
    pub hands_dealt: u64,
    pub answers_correct: u64,
    pub answers_wrong: u64,
    pub hard_answers: u64,
    pub soft_answers: u64,
    pub pair_answers: u64,
    pub sessions_ended: u64,
    pub current_streak: u64,
    pub best_streak: u64,
    /// Wrong answers tallied per strategy row key ("16", "A7", "88").
    pub wrong_by_hand: HashMap<String, u64>,
    /// Answers tallied per dealer column ("2"-"10", "A").
    pub answers_by_dealer: HashMap<String, u64>,
}

impl MetricsSnapshot {
    /// Fraction of answers that were correct; 0.0 before any answer.
    pub fn accuracy(&self) -> f64 {
        let total = self.answers_correct + self.answers_wrong;
        if total == 0 {
            return 0.0;
        }
        self.answers_correct as f64 / total as f64
    }
}

/// Shared counters for training activity. Handles are cheap clones over
/// the same atomics, so the trainer increments and any observer can
/// snapshot without coordination.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    counters: Arc<Counters>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards_dealt(&self, n: u64) {
        self.counters.cards_dealt.fetch_add(n, Ordering::Relaxed);
    }

    pub fn shoe_shuffled(&self) {
        self.counters.shoe_shuffles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hand_dealt(&self) {
        self.counters.hands_dealt.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one answered round. `row_key` and `dealer_key` are the
    /// lookup dimensions the answer resolved through; the streaks are the
    /// session values after this answer was scored.
    pub fn answer(
        &self,
        is_correct: bool,
        hand_type: HandType,
        row_key: &str,
        dealer_key: &str,
        current_streak: u32,
        best_streak: u32,
    ) {
        if is_correct {
            self.counters.answers_correct.fetch_add(1, Ordering::Relaxed);
        } else {
            self.counters.answers_wrong.fetch_add(1, Ordering::Relaxed);
            let mut wrong = self
                .counters
                .wrong_by_hand
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *wrong.entry(row_key.to_string()).or_insert(0) += 1;
        }
        let by_type = match hand_type {
            HandType::Hard => &self.counters.hard_answers,
            HandType::Soft => &self.counters.soft_answers,
            HandType::Pair => &self.counters.pair_answers,
        };
        by_type.fetch_add(1, Ordering::Relaxed);

        let mut by_dealer = self
            .counters
            .answers_by_dealer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *by_dealer.entry(dealer_key.to_string()).or_insert(0) += 1;
        drop(by_dealer);

        self.counters
            .current_streak
            .store(u64::from(current_streak), Ordering::Relaxed);
        self.counters
            .best_streak
            .store(u64::from(best_streak), Ordering::Relaxed);
    }

    pub fn end_session(&self) {
        self.counters.sessions_ended.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cards_dealt: self.counters.cards_dealt.load(Ordering::Relaxed),
            shoe_shuffles: self.counters.shoe_shuffles.load(Ordering::Relaxed),
            hands_dealt: self.counters.hands_dealt.load(Ordering::Relaxed),
            answers_correct: self.counters.answers_correct.load(Ordering::Relaxed),
            answers_wrong: self.counters.answers_wrong.load(Ordering::Relaxed),
            hard_answers: self.counters.hard_answers.load(Ordering::Relaxed),
            soft_answers: self.counters.soft_answers.load(Ordering::Relaxed),
            pair_answers: self.counters.pair_answers.load(Ordering::Relaxed),
            sessions_ended: self.counters.sessions_ended.load(Ordering::Relaxed),
            current_streak: self.counters.current_streak.load(Ordering::Relaxed),
            best_streak: self.counters.best_streak.load(Ordering::Relaxed),
            wrong_by_hand: self
                .counters
                .wrong_by_hand
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            answers_by_dealer: self
                .counters
                .answers_by_dealer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }
}
