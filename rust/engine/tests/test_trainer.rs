use std::collections::HashSet;
use std::path::PathBuf;

use bjtrain_engine::cards::{Card, Rank as R, Suit as S};
use bjtrain_engine::errors::TrainerError;
use bjtrain_engine::hand::Hand;
use bjtrain_engine::levels::keys_for_level;
use bjtrain_engine::rules::Rules;
use bjtrain_engine::strategy::Action;
use bjtrain_engine::trainer::{Trainer, TrainingStats};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

fn trainer(rules: Rules, seed: u64) -> Trainer {
    Trainer::with_seed(rules, &data_dir(), seed).expect("build trainer")
}

fn two_cards(a: R, b: R) -> Hand {
    Hand::from_cards(vec![Card::new(a, S::Hearts), Card::new(b, S::Clubs)])
}

#[test]
fn check_before_deal_is_a_sequencing_error() {
    let mut t = trainer(Rules::default(), 42);
    let err = t.check_answer(Action::Hit).unwrap_err();
    assert!(matches!(err, TrainerError::NoActiveHand));
}

#[test]
fn deal_hand_returns_two_player_cards_and_one_dealer_card() {
    let mut t = trainer(Rules::default(), 42);
    let (hand, _dealer) = t.deal_hand().unwrap();
    assert_eq!(hand.len(), 2);
    let (active, _) = t.current_hand().expect("hand should be active");
    assert_eq!(active, &hand);
}

#[test]
fn dealt_hands_are_never_naturals() {
    let mut t = trainer(Rules::default(), 7);
    for _ in 0..200 {
        let (hand, _) = t.deal_hand().unwrap();
        assert!(!hand.is_blackjack());
    }
}

#[test]
fn level_filter_restricts_dealt_keys() {
    // property: across many deals, every key stays inside the level's set
    let rules = Rules {
        num_decks: 1,
        dealer_hits_soft_17: true,
        level: 4,
    };
    let allowed: HashSet<&str> = keys_for_level(4).unwrap();
    let mut t = trainer(rules, 99);
    for _ in 0..500 {
        let (hand, _) = t.deal_hand().unwrap();
        let key = hand.strategy_key();
        assert!(allowed.contains(key.as_str()), "key {key} outside level 4");
    }
}

#[test]
fn level_zero_deals_without_filtering() {
    let rules = Rules {
        num_decks: 1,
        dealer_hits_soft_17: true,
        level: 0,
    };
    let union: HashSet<&str> = keys_for_level(0).unwrap();
    let mut t = trainer(rules, 3);
    for _ in 0..200 {
        let (hand, _) = t.deal_hand().unwrap();
        assert!(union.contains(hand.strategy_key().as_str()));
    }
}

#[test]
fn out_of_range_level_fails_at_construction() {
    let rules = Rules {
        num_decks: 1,
        dealer_hits_soft_17: true,
        level: 9,
    };
    let err = Trainer::with_seed(rules, &data_dir(), 42).unwrap_err();
    assert!(matches!(err, TrainerError::InvalidLevel { level: 9, max: 4 }));
}

#[test]
fn correct_answer_reports_success() {
    let mut t = trainer(Rules::default(), 42);
    t.set_hand(two_cards(R::Ten, R::Six), Card::new(R::Five, S::Spades));
    let result = t.check_answer(Action::Stand).unwrap();
    assert!(result.is_correct);
    assert_eq!(result.correct_action, Action::Stand);
    assert!(result.exception_description.is_none());
    assert_eq!(result.feedback(), "Correct!");
}

#[test]
fn wrong_answer_names_the_correct_action() {
    let mut t = trainer(Rules::default(), 42);
    t.set_hand(two_cards(R::Ten, R::Six), Card::new(R::Five, S::Spades));
    let result = t.check_answer(Action::Hit).unwrap();
    assert!(!result.is_correct);
    assert_eq!(result.correct_action, Action::Stand);
    assert_eq!(result.feedback(), "Wrong. Correct action: Stand");
}

#[test]
fn dealer_face_cards_use_the_ten_column() {
    let mut t = trainer(Rules::default(), 42);
    // 16 vs K must resolve through the "10" column: single deck says surrender
    t.set_hand(two_cards(R::Ten, R::Six), Card::new(R::King, S::Spades));
    let result = t.check_answer(Action::Surrender).unwrap();
    assert!(result.is_correct);
}

#[test]
fn composition_exception_fires_through_the_trainer() {
    let mut t = trainer(Rules::default(), 42);
    t.set_hand(two_cards(R::Six, R::Two), Card::new(R::Five, S::Spades));
    let result = t.check_answer(Action::Hit).unwrap();
    assert!(result.is_correct);
    let desc = result.exception_description.expect("exception expected");
    assert!(desc.contains("6-2"));
}

#[test]
fn h17_rule_gates_the_a7_exception() {
    let h17 = Rules {
        num_decks: 1,
        dealer_hits_soft_17: true,
        level: 0,
    };
    let mut t = trainer(h17, 42);
    t.set_hand(two_cards(R::Ace, R::Seven), Card::new(R::Ace, S::Spades));
    assert!(t.check_answer(Action::Hit).unwrap().is_correct);

    let s17 = Rules {
        dealer_hits_soft_17: false,
        ..h17
    };
    let mut t = trainer(s17, 42);
    t.set_hand(two_cards(R::Ace, R::Seven), Card::new(R::Ace, S::Spades));
    assert!(t.check_answer(Action::Stand).unwrap().is_correct);
}

#[test]
fn stats_track_totals_and_streaks() {
    let mut stats = TrainingStats::new();
    for outcome in [true, true, false, true] {
        stats.record(outcome);
    }
    assert_eq!(stats.total, 4);
    assert_eq!(stats.correct, 3);
    assert_eq!(stats.current_streak, 1);
    assert_eq!(stats.best_streak, 2);
}

#[test]
fn stats_percentage_is_zero_before_any_answer() {
    let stats = TrainingStats::new();
    assert_eq!(stats.percentage(), 0.0);
}

#[test]
fn stats_display_shows_score_and_percentage() {
    let mut stats = TrainingStats::new();
    stats.record(true);
    stats.record(false);
    assert_eq!(stats.to_string(), "1/2 correct (50%)");
}

#[test]
fn trainer_accumulates_stats_across_answers() {
    let mut t = trainer(Rules::default(), 42);
    t.set_hand(two_cards(R::Ten, R::Six), Card::new(R::Five, S::Spades));
    t.check_answer(Action::Stand).unwrap();
    t.set_hand(two_cards(R::Ten, R::Six), Card::new(R::Five, S::Spades));
    t.check_answer(Action::Hit).unwrap();
    assert_eq!(t.stats().total, 2);
    assert_eq!(t.stats().correct, 1);
}

#[test]
fn metrics_count_answers_by_hand_type() {
    let mut t = trainer(Rules::default(), 42);
    t.set_hand(two_cards(R::Ten, R::Six), Card::new(R::Five, S::Spades));
    t.check_answer(Action::Stand).unwrap();
    t.set_hand(two_cards(R::Ace, R::Seven), Card::new(R::Nine, S::Spades));
    t.check_answer(Action::Hit).unwrap();
    t.set_hand(two_cards(R::Eight, R::Eight), Card::new(R::Five, S::Spades));
    t.check_answer(Action::Split).unwrap();

    let snapshot = t.metrics().snapshot();
    assert_eq!(snapshot.hard_answers, 1);
    assert_eq!(snapshot.soft_answers, 1);
    assert_eq!(snapshot.pair_answers, 1);
    assert_eq!(snapshot.answers_correct + snapshot.answers_wrong, 3);
}

#[test]
fn metrics_track_wrong_hands_dealers_and_streaks() {
    let mut t = trainer(Rules::default(), 42);

    // Correct: 16 vs 5 stands.
    t.set_hand(two_cards(R::Ten, R::Six), Card::new(R::Five, S::Spades));
    t.check_answer(Action::Stand).unwrap();
    // Wrong twice on A7, once against a king (the "10" column).
    t.set_hand(two_cards(R::Ace, R::Seven), Card::new(R::King, S::Spades));
    t.check_answer(Action::Split).unwrap();
    t.set_hand(two_cards(R::Ace, R::Seven), Card::new(R::Nine, S::Spades));
    t.check_answer(Action::Split).unwrap();
    // Correct: 88 vs 5 splits.
    t.set_hand(two_cards(R::Eight, R::Eight), Card::new(R::Five, S::Spades));
    t.check_answer(Action::Split).unwrap();

    let snapshot = t.metrics().snapshot();
    assert_eq!(snapshot.wrong_by_hand.get("A7"), Some(&2));
    assert_eq!(snapshot.wrong_by_hand.get("16"), None);
    assert_eq!(snapshot.answers_by_dealer.get("5"), Some(&2));
    assert_eq!(snapshot.answers_by_dealer.get("10"), Some(&1));
    assert_eq!(snapshot.answers_by_dealer.get("9"), Some(&1));
    assert_eq!(snapshot.current_streak, 1);
    assert_eq!(snapshot.best_streak, 1);
}

#[test]
fn seeded_trainers_deal_identically() {
    let mut a = trainer(Rules::default(), 1234);
    let mut b = trainer(Rules::default(), 1234);
    for _ in 0..20 {
        assert_eq!(a.deal_hand().unwrap(), b.deal_hand().unwrap());
    }
}
