use bjtrain_engine::cards::{Card, Rank as R, Suit as S};
use bjtrain_engine::hand::Hand;

fn hand(cards: &[(R, S)]) -> Hand {
    Hand::from_cards(cards.iter().map(|&(r, s)| Card::new(r, s)).collect())
}

#[test]
fn value_sums_simple_cards() {
    let h = hand(&[(R::Ten, S::Hearts), (R::Six, S::Clubs)]);
    assert_eq!(h.value(), 16);
}

#[test]
fn value_counts_ace_high_when_possible() {
    let h = hand(&[(R::Ace, S::Hearts), (R::Seven, S::Clubs)]);
    assert_eq!(h.value(), 18);
}

#[test]
fn value_reduces_ace_to_avoid_bust() {
    let h = hand(&[(R::Ace, S::Hearts), (R::Seven, S::Clubs), (R::Nine, S::Spades)]);
    assert_eq!(h.value(), 17);
}

#[test]
fn value_reduces_aces_one_at_a_time() {
    // A + A + 9 = 11 + 1 + 9 = 21
    let h = hand(&[(R::Ace, S::Hearts), (R::Ace, S::Clubs), (R::Nine, S::Spades)]);
    assert_eq!(h.value(), 21);
}

#[test]
fn four_aces_value_is_fourteen() {
    let h = hand(&[
        (R::Ace, S::Hearts),
        (R::Ace, S::Clubs),
        (R::Ace, S::Diamonds),
        (R::Ace, S::Spades),
    ]);
    assert_eq!(h.value(), 14);
}

#[test]
fn value_is_order_independent() {
    let a = hand(&[(R::Ace, S::Hearts), (R::Nine, S::Clubs), (R::Five, S::Spades)]);
    let b = hand(&[(R::Five, S::Spades), (R::Ace, S::Hearts), (R::Nine, S::Clubs)]);
    assert_eq!(a.value(), b.value());
    assert_eq!(a.strategy_key(), b.strategy_key());
}

#[test]
fn soft_hand_with_ace_as_eleven() {
    let h = hand(&[(R::Ace, S::Hearts), (R::Six, S::Clubs)]);
    assert!(h.is_soft());
    assert_eq!(h.value(), 17);
}

#[test]
fn forced_down_ace_is_not_soft() {
    // A + 9 + 9 = 19 with the ace at 1; no ace can go back to 11
    let h = hand(&[(R::Ace, S::Hearts), (R::Nine, S::Clubs), (R::Nine, S::Spades)]);
    assert!(!h.is_soft());
    assert_eq!(h.value(), 19);
}

#[test]
fn soft_tracks_value_with_ace_at_eleven() {
    // value() keeps an ace at 11 exactly when is_soft() is true
    let soft = hand(&[(R::Ace, S::Hearts), (R::Three, S::Clubs), (R::Five, S::Spades)]);
    assert!(soft.is_soft());
    assert_eq!(soft.value(), 19);

    let hard = hand(&[(R::Ace, S::Hearts), (R::Three, S::Clubs), (R::Ten, S::Spades)]);
    assert!(!hard.is_soft());
    assert_eq!(hard.value(), 14);
}

#[test]
fn no_ace_is_never_soft() {
    let h = hand(&[(R::Five, S::Hearts), (R::Six, S::Clubs)]);
    assert!(!h.is_soft());
}

#[test]
fn equal_ranks_are_a_pair_regardless_of_suit() {
    let h = hand(&[(R::Eight, S::Hearts), (R::Eight, S::Spades)]);
    assert!(h.is_pair());
}

#[test]
fn king_and_queen_are_not_a_pair() {
    // Equal point value, different rank
    let h = hand(&[(R::King, S::Hearts), (R::Queen, S::Spades)]);
    assert!(!h.is_pair());
    assert_eq!(h.strategy_key(), "20");
}

#[test]
fn three_cards_are_never_a_pair() {
    let h = hand(&[(R::Eight, S::Hearts), (R::Eight, S::Spades), (R::Eight, S::Clubs)]);
    assert!(!h.is_pair());
    assert_eq!(h.strategy_key(), "24");
}

#[test]
fn two_card_21_is_blackjack() {
    let h = hand(&[(R::Ace, S::Hearts), (R::King, S::Spades)]);
    assert!(h.is_blackjack());
}

#[test]
fn three_card_21_is_not_blackjack() {
    let h = hand(&[(R::Seven, S::Hearts), (R::Seven, S::Spades), (R::Seven, S::Clubs)]);
    assert_eq!(h.value(), 21);
    assert!(!h.is_blackjack());
}

#[test]
fn strategy_key_for_known_compositions() {
    assert_eq!(hand(&[(R::Ace, S::Hearts), (R::Seven, S::Clubs)]).strategy_key(), "A7");
    assert_eq!(hand(&[(R::Ace, S::Hearts), (R::Ace, S::Clubs)]).strategy_key(), "AA");
    assert_eq!(hand(&[(R::Ten, S::Hearts), (R::Six, S::Clubs)]).strategy_key(), "16");
    assert_eq!(hand(&[(R::King, S::Hearts), (R::King, S::Clubs)]).strategy_key(), "TT");
}

#[test]
fn ten_valued_pairs_all_collapse_to_tt() {
    assert_eq!(hand(&[(R::Ten, S::Hearts), (R::Ten, S::Clubs)]).strategy_key(), "TT");
    assert_eq!(hand(&[(R::Jack, S::Hearts), (R::Jack, S::Clubs)]).strategy_key(), "TT");
    assert_eq!(hand(&[(R::Queen, S::Hearts), (R::Queen, S::Clubs)]).strategy_key(), "TT");
}

#[test]
fn soft_key_counts_extra_aces_as_one() {
    // A + A + 5: non-ace total 5 plus one extra ace -> A6
    let h = hand(&[(R::Ace, S::Hearts), (R::Ace, S::Clubs), (R::Five, S::Spades)]);
    assert!(h.is_soft());
    assert_eq!(h.strategy_key(), "A6");
}

#[test]
fn hard_key_is_decimal_value() {
    let h = hand(&[(R::Nine, S::Hearts), (R::Four, S::Clubs)]);
    assert_eq!(h.strategy_key(), "13");
}

#[test]
fn single_card_accessors_do_not_panic() {
    let h = hand(&[(R::Ace, S::Hearts)]);
    assert_eq!(h.value(), 11);
    assert!(h.is_soft());
    assert!(!h.is_pair());
    assert!(!h.is_blackjack());
    assert_eq!(h.strategy_key(), "A0");
}

#[test]
fn display_shows_cards_and_total() {
    let h = hand(&[(R::Ace, S::Hearts), (R::Seven, S::Clubs)]);
    assert_eq!(h.to_string(), "A♥ 7♣ (18)");
}
