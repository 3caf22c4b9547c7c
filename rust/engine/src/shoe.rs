use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};

/// Fraction of the shoe below which the next round triggers a reshuffle.
pub const RESHUFFLE_THRESHOLD: f64 = 0.25;

/// A multi-deck shoe that deals cards and rebuilds itself when depleted.
#[derive(Debug)]
pub struct Shoe {
    cards: Vec<Card>,
    position: usize,
    num_decks: usize,
    rng: ChaCha20Rng,
}

impl Shoe {
    pub fn new(num_decks: usize) -> Self {
        Self::from_rng(num_decks, ChaCha20Rng::from_os_rng())
    }

    /// Seeded shoe for reproducible deals.
    pub fn with_seed(num_decks: usize, seed: u64) -> Self {
        Self::from_rng(num_decks, ChaCha20Rng::seed_from_u64(seed))
    }

    fn from_rng(num_decks: usize, rng: ChaCha20Rng) -> Self {
        // a shoe always holds at least one deck
        let mut shoe = Self {
            cards: Vec::new(),
            position: 0,
            num_decks: num_decks.max(1),
            rng,
        };
        shoe.shuffle();
        shoe
    }

    /// Rebuild the full shoe and shuffle all cards back in.
    pub fn shuffle(&mut self) {
        self.cards.clear();
        for _ in 0..self.num_decks {
            self.cards.extend(full_deck());
        }
        self.cards.shuffle(&mut self.rng);
        self.position = 0;
    }

    /// Deal one card. An exhausted shoe reshuffles itself first, so this
    /// never fails.
    pub fn deal(&mut self) -> Card {
        if self.position >= self.cards.len() {
            self.shuffle();
        }
        let card = self.cards[self.position];
        self.position += 1;
        card
    }

    /// True once fewer than [`RESHUFFLE_THRESHOLD`] of the cards remain.
    pub fn needs_shuffle(&self) -> bool {
        (self.remaining() as f64) < (self.size() as f64) * RESHUFFLE_THRESHOLD
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.position
    }

    /// Total cards when full.
    pub fn size(&self) -> usize {
        self.num_decks * 52
    }

    pub fn num_decks(&self) -> usize {
        self.num_decks
    }
}
