//! Deal command: print sample training hands without checking answers.
//!
//! Useful for building drill sheets and for eyeballing what a skill
//! level actually deals. Supports optional seeding for deterministic
//! output and a JSON mode for scripting.

use crate::error::CliError;
use crate::formatters::{format_card, format_hand};
use bjtrain_engine::rules::Rules;
use bjtrain_engine::trainer::Trainer;
use std::io::Write;
use std::path::Path;

/// Deal `count` hands under the given rules and print each one with the
/// dealer upcard and the correct action.
#[allow(clippy::too_many_arguments)]
pub fn handle_deal_command(
    count: u32,
    level: Option<u8>,
    decks: usize,
    seed: Option<u64>,
    json: bool,
    data_dir: &Path,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if count == 0 {
        return Err(CliError::InvalidInput("count must be >= 1".to_string()));
    }

    let rules = Rules {
        num_decks: decks,
        level: level.unwrap_or(0),
        ..Rules::default()
    };
    let seed = seed.unwrap_or_else(rand::random);
    let mut trainer = Trainer::with_seed(rules, data_dir, seed)?;

    for _ in 0..count {
        let (hand, dealer) = trainer.deal_hand()?;
        let mut dealer_key = dealer.lookup_symbol();
        if dealer_key == "T" {
            dealer_key = "10";
        }
        let correct = trainer
            .strategy()
            .correct_action(
                &hand.strategy_key(),
                dealer_key,
                Some(&hand),
                Some(trainer.rules()),
            )
            .map_err(|e| CliError::Engine(e.to_string()))?;
        if json {
            let record = serde_json::json!({
                "hand": hand.cards().iter().map(|c| c.to_string()).collect::<Vec<_>>(),
                "value": hand.value(),
                "key": hand.strategy_key(),
                "dealer": format_card(dealer),
                "correct_action": correct.code(),
            });
            writeln!(out, "{}", record)?;
        } else {
            writeln!(
                out,
                "Hand: {}  Dealer: {}  ->  {}",
                format_hand(&hand),
                format_card(dealer),
                correct.name()
            )?;
        }
    }
    Ok(())
}
