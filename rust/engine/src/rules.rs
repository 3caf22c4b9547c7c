use std::fmt;

use serde::{Deserialize, Serialize};

/// Table rules for a training session. Immutable once the session starts;
/// the deck count selects which strategy file loads, and the H17 flag
/// gates rule-dependent exceptions.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Number of decks in the shoe (1 or 6 at real tables)
    pub num_decks: usize,
    /// Whether the dealer hits soft 17 (H17) or stands (S17)
    pub dealer_hits_soft_17: bool,
    /// Skill level restricting which hands are dealt (0 = all)
    pub level: u8,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            num_decks: 1,
            dealer_hits_soft_17: true,
            level: 0,
        }
    }
}

impl Rules {
    /// Strategy table filename for this deck count.
    pub fn strategy_file(&self) -> &'static str {
        if self.num_decks == 1 {
            "single-deck.csv"
        } else {
            "multi-deck.csv"
        }
    }
}

impl fmt::Display for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.num_decks == 1 {
            write!(f, "1 deck")?;
        } else {
            write!(f, "{} decks", self.num_decks)?;
        }
        let h17 = if self.dealer_hits_soft_17 {
            "H17"
        } else {
            "S17"
        };
        write!(f, ", {h17}")
    }
}
