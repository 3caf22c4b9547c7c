use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// A blackjack hand. Value, softness, and the strategy lookup key are all
/// recomputed from the card sequence on every access, so the hand itself
/// carries no derived state that could go stale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Best blackjack value: Aces start at 11 and drop to 1 one at a time
    /// while the total is over 21. Yields the highest total not exceeding
    /// 21, or the minimum total if the hand is bust either way.
    pub fn value(&self) -> u32 {
        let mut total: u32 = self.cards.iter().map(|c| u32::from(c.value())).sum();
        let mut aces = self.cards.iter().filter(|c| c.is_ace()).count();
        while total > 21 && aces > 0 {
            total -= 10;
            aces -= 1;
        }
        total
    }

    /// True when an Ace is currently counted as 11. A lone Ace forced down
    /// to 1 by the bust rule does not make the hand soft.
    pub fn is_soft(&self) -> bool {
        if !self.cards.iter().any(|c| c.is_ace()) {
            return false;
        }
        // total with every ace at 1; soft iff one ace can go back to 11
        let hard_total: u32 = self
            .cards
            .iter()
            .map(|c| if c.is_ace() { 1 } else { u32::from(c.value()) })
            .sum();
        hard_total + 10 <= 21
    }

    /// True for exactly two cards of the same rank. King and Queen share a
    /// point value but are not a pair.
    pub fn is_pair(&self) -> bool {
        if self.cards.len() != 2 {
            return false;
        }
        self.cards[0].rank == self.cards[1].rank
    }

    /// A natural: two cards totalling 21.
    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.value() == 21
    }

    /// Row key for strategy-table lookup.
    ///
    /// - Pairs: the lookup symbol doubled ("AA", "TT", "88", ...)
    /// - Soft hands: "A" plus the total of the other cards, with any aces
    ///   beyond the first counted as 1 ("A2".."A9")
    /// - Hard hands: the decimal value ("5".."20")
    pub fn strategy_key(&self) -> String {
        if self.is_pair() {
            let symbol = self.cards[0].lookup_symbol();
            return format!("{symbol}{symbol}");
        }

        if self.is_soft() {
            let non_ace_total: u32 = self
                .cards
                .iter()
                .filter(|c| !c.is_ace())
                .map(|c| u32::from(c.value()))
                .sum();
            let ace_count = self.cards.iter().filter(|c| c.is_ace()).count() as u32;
            // extra aces count as 1 each; the first is the "A" prefix
            return format!("A{}", non_ace_total + ace_count - 1);
        }

        self.value().to_string()
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
        }
        write!(f, " ({})", self.value())
    }
}
