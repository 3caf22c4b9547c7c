use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::TrainerError;
use crate::hand::Hand;
use crate::levels;
use crate::logger::{RoundLogger, RoundRecord};
use crate::metrics::{HandType, MetricsCollector};
use crate::rules::Rules;
use crate::shoe::Shoe;
use crate::strategy::{Action, StrategyTable};

/// Upper bound on the deal-retry loop. Hitting it means the level filter
/// rejects everything the shoe can produce, which is a configuration
/// problem, not bad luck.
pub const MAX_DEAL_ATTEMPTS: usize = 1000;

/// Result of checking a player's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingResult {
    pub player_hand: Hand,
    pub dealer_card: Card,
    pub player_action: Action,
    pub correct_action: Action,
    pub is_correct: bool,
    pub exception_description: Option<String>,
}

impl TrainingResult {
    /// Player-facing feedback line.
    pub fn feedback(&self) -> String {
        if self.is_correct {
            "Correct!".to_string()
        } else {
            format!("Wrong. Correct action: {}", self.correct_action.name())
        }
    }
}

/// Running session statistics: accuracy and answer streaks.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    pub correct: u32,
    pub total: u32,
    pub current_streak: u32,
    pub best_streak: u32,
}

impl TrainingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, is_correct: bool) {
        self.total += 1;
        if is_correct {
            self.correct += 1;
            self.current_streak += 1;
            if self.current_streak > self.best_streak {
                self.best_streak = self.current_streak;
            }
        } else {
            self.current_streak = 0;
        }
    }

    /// Accuracy in percent; 0.0 before any answer.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(self.total) * 100.0
    }
}

impl fmt::Display for TrainingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} correct ({:.0}%)",
            self.correct,
            self.total,
            self.percentage()
        )
    }
}

/// Orchestrates one learner's training session: deals level-filtered
/// hands from the shoe, resolves answers against the strategy table, and
/// accumulates statistics. One instance serves one learner; it is not
/// meant to be shared across sessions.
#[derive(Debug)]
pub struct Trainer {
    rules: Rules,
    shoe: Shoe,
    strategy: StrategyTable,
    stats: TrainingStats,
    metrics: MetricsCollector,
    logger: Option<RoundLogger>,
    current_hand: Option<Hand>,
    current_dealer_card: Option<Card>,
    allowed_keys: Option<HashSet<&'static str>>,
}

impl Trainer {
    /// Create a trainer for `rules`, loading the strategy table from
    /// `data_dir`.
    ///
    /// # Errors
    ///
    /// Fails if the strategy data cannot be loaded or `rules.level` is out
    /// of range.
    pub fn new(rules: Rules, data_dir: &Path) -> Result<Self, TrainerError> {
        let shoe = Shoe::new(rules.num_decks);
        Self::build(rules, data_dir, shoe)
    }

    /// Like [`new`](Self::new) but with a seeded shoe, for reproducible
    /// sessions.
    pub fn with_seed(rules: Rules, data_dir: &Path, seed: u64) -> Result<Self, TrainerError> {
        let shoe = Shoe::with_seed(rules.num_decks, seed);
        Self::build(rules, data_dir, shoe)
    }

    fn build(rules: Rules, data_dir: &Path, shoe: Shoe) -> Result<Self, TrainerError> {
        let strategy = StrategyTable::load(&data_dir.join(rules.strategy_file()))?;
        let allowed_keys = if rules.level > 0 {
            Some(levels::keys_for_level(rules.level)?)
        } else {
            None
        };
        Ok(Self {
            rules,
            shoe,
            strategy,
            stats: TrainingStats::new(),
            metrics: MetricsCollector::new(),
            logger: None,
            current_hand: None,
            current_dealer_card: None,
            allowed_keys,
        })
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    pub fn strategy(&self) -> &StrategyTable {
        &self.strategy
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    /// Shared handle to the session's metrics counters.
    pub fn metrics(&self) -> MetricsCollector {
        self.metrics.clone()
    }

    /// Log every answered round to `logger` as JSONL.
    pub fn attach_logger(&mut self, logger: RoundLogger) {
        self.logger = Some(logger);
    }

    /// The hand currently awaiting an answer, if any.
    pub fn current_hand(&self) -> Option<(&Hand, Card)> {
        match (&self.current_hand, self.current_dealer_card) {
            (Some(hand), Some(dealer)) => Some((hand, dealer)),
            _ => None,
        }
    }

    /// Replace the active hand directly, e.g. to drill a specific
    /// scenario instead of a random deal.
    pub fn set_hand(&mut self, hand: Hand, dealer_card: Card) {
        self.current_hand = Some(hand);
        self.current_dealer_card = Some(dealer_card);
    }

    /// Deal a new training hand: two player cards and a dealer up-card.
    ///
    /// Naturals are skipped (there is no decision to teach), as are hands
    /// whose strategy key falls outside the active level. The shoe is
    /// reshuffled first whenever it has run low.
    ///
    /// # Errors
    ///
    /// [`TrainerError::DealRetriesExhausted`] after [`MAX_DEAL_ATTEMPTS`]
    /// rejected deals in a row.
    pub fn deal_hand(&mut self) -> Result<(Hand, Card), TrainerError> {
        for _ in 0..MAX_DEAL_ATTEMPTS {
            if self.shoe.needs_shuffle() {
                self.shoe.shuffle();
                self.metrics.shoe_shuffled();
            }

            let mut hand = Hand::new();
            hand.add_card(self.shoe.deal());
            hand.add_card(self.shoe.deal());
            let dealer_card = self.shoe.deal();
            self.metrics.cards_dealt(3);

            if hand.is_blackjack() {
                continue;
            }
            if let Some(allowed) = &self.allowed_keys {
                if !allowed.contains(hand.strategy_key().as_str()) {
                    continue;
                }
            }

            self.metrics.hand_dealt();
            self.current_hand = Some(hand.clone());
            self.current_dealer_card = Some(dealer_card);
            return Ok((hand, dealer_card));
        }
        Err(TrainerError::DealRetriesExhausted {
            attempts: MAX_DEAL_ATTEMPTS,
            level: self.rules.level,
        })
    }

    /// Check the player's answer for the current hand.
    ///
    /// The dealer's 10-valued cards collapse to the "10" column, the full
    /// hand and rules are passed through so composition- and
    /// rule-dependent exceptions can fire, and the outcome is recorded in
    /// the session statistics.
    ///
    /// # Errors
    ///
    /// [`TrainerError::NoActiveHand`] if nothing has been dealt yet.
    pub fn check_answer(&mut self, action: Action) -> Result<TrainingResult, TrainerError> {
        let hand = self.current_hand.clone().ok_or(TrainerError::NoActiveHand)?;
        let dealer_card = self
            .current_dealer_card
            .ok_or(TrainerError::NoActiveHand)?;

        let row_key = hand.strategy_key();
        let mut dealer_key = dealer_card.lookup_symbol();
        if dealer_key == "T" {
            dealer_key = "10";
        }

        let check =
            self.strategy
                .check_action(action, &row_key, dealer_key, Some(&hand), Some(&self.rules))?;

        self.stats.record(check.is_correct);
        self.metrics.answer(
            check.is_correct,
            HandType::of(&hand),
            &row_key,
            dealer_key,
            self.stats.current_streak,
            self.stats.best_streak,
        );

        let result = TrainingResult {
            player_hand: hand,
            dealer_card,
            player_action: action,
            correct_action: check.correct_action,
            is_correct: check.is_correct,
            exception_description: check.exception.map(|exc| exc.description),
        };

        if let Some(logger) = &mut self.logger {
            let record = RoundRecord {
                hand: result.player_hand.to_string(),
                hand_key: row_key,
                dealer: dealer_key.to_string(),
                player_action: result.player_action.code().to_string(),
                correct_action: result.correct_action.code().to_string(),
                is_correct: result.is_correct,
                exception: result.exception_description.clone(),
                correct: self.stats.correct,
                total: self.stats.total,
                ts: None,
            };
            logger.write(&record).map_err(TrainerError::Log)?;
        }

        Ok(result)
    }

    /// Flush session-level metrics. Call once when the learner quits.
    pub fn end_session(&self) {
        self.metrics.end_session();
    }
}
