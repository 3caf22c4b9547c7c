//! Input parsing and validation for interactive training sessions.

use bjtrain_engine::strategy::Action;

/// Outcome of parsing a line of player input during a training round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseResult {
    Action(Action),
    Quit,
    Invalid(String),
}

/// Parse a player's action input. Accepts single letters (S/H/D/P/R),
/// full action words, or Q/quit to end the session. Case-insensitive.
pub fn parse_action_input(input: &str) -> ParseResult {
    let trimmed = input.trim();
    match trimmed.to_ascii_uppercase().as_str() {
        "S" | "STAND" => ParseResult::Action(Action::Stand),
        "H" | "HIT" => ParseResult::Action(Action::Hit),
        "D" | "DOUBLE" => ParseResult::Action(Action::Double),
        "P" | "SPLIT" => ParseResult::Action(Action::Split),
        "R" | "SURRENDER" => ParseResult::Action(Action::Surrender),
        "Q" | "QUIT" => ParseResult::Quit,
        _ => ParseResult::Invalid(format!("unrecognized action '{}'", trimmed)),
    }
}

/// Parse a deck-count answer from the setup prompt. Only 1 and 6 are
/// playable table configurations. An empty answer takes the default.
pub fn parse_decks(input: &str, default: u8) -> Result<u8, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    match trimmed.parse::<u8>() {
        Ok(1) => Ok(1),
        Ok(6) => Ok(6),
        _ => Err(format!("deck count must be 1 or 6, got '{}'", trimmed)),
    }
}

/// Parse a yes/no answer. An empty answer takes the default.
pub fn parse_yes_no(input: &str, default: bool) -> Result<bool, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        _ => Err(format!("expected y or n, got '{}'", trimmed)),
    }
}

/// Parse a skill level answer (0-4). An empty answer takes the default.
pub fn parse_level(input: &str, default: u8) -> Result<u8, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    match trimmed.parse::<u8>() {
        Ok(level) if level <= bjtrain_engine::levels::MAX_LEVEL => Ok(level),
        _ => Err(format!(
            "level must be between 0 and {}, got '{}'",
            bjtrain_engine::levels::MAX_LEVEL,
            trimmed
        )),
    }
}
