//! # bjtrain-engine: Blackjack Basic Strategy Decision Engine
//!
//! The core of the blackjack basic strategy trainer: hand modelling,
//! strategy-table resolution with conditional exceptions, level-gated
//! dealing, and session statistics. All I/O beyond loading the strategy
//! data files lives in the CLI and web crates.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and deck construction
//! - [`shoe`] - Multi-deck shoe with automatic reshuffling and seeded RNG
//! - [`hand`] - Hand values, softness, pairs, and strategy key derivation
//! - [`strategy`] - Base action table plus the exception overlay
//! - [`levels`] - Skill-level partition of the 34 strategy keys
//! - [`rules`] - Session rule configuration (decks, H17, level)
//! - [`trainer`] - Session orchestration: dealing, checking, statistics
//! - [`logger`] - JSONL round logging
//! - [`metrics`] - Shared training counters
//! - [`errors`] - Error types for data and sequencing failures
//!
//! ## Quick Start
//!
//! ```rust
//! use bjtrain_engine::cards::{Card, Rank, Suit};
//! use bjtrain_engine::hand::Hand;
//!
//! let mut hand = Hand::new();
//! hand.add_card(Card::new(Rank::Ace, Suit::Hearts));
//! hand.add_card(Card::new(Rank::Seven, Suit::Clubs));
//!
//! assert_eq!(hand.value(), 18);
//! assert!(hand.is_soft());
//! assert_eq!(hand.strategy_key(), "A7");
//! ```
//!
//! ## Deterministic Dealing
//!
//! Shoes can be seeded so a training session replays identically:
//!
//! ```rust
//! use bjtrain_engine::shoe::Shoe;
//!
//! let mut a = Shoe::with_seed(6, 42);
//! let mut b = Shoe::with_seed(6, 42);
//! assert_eq!(a.deal(), b.deal());
//! ```

pub mod cards;
pub mod errors;
pub mod hand;
pub mod levels;
pub mod logger;
pub mod metrics;
pub mod rules;
pub mod shoe;
pub mod strategy;
pub mod trainer;
