use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::StrategyError;
use crate::hand::Hand;
use crate::rules::Rules;

/// A basic strategy action.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "S")]
    Stand,
    #[serde(rename = "H")]
    Hit,
    #[serde(rename = "D")]
    Double,
    #[serde(rename = "P")]
    Split,
    #[serde(rename = "R")]
    Surrender,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Stand,
        Action::Hit,
        Action::Double,
        Action::Split,
        Action::Surrender,
    ];

    /// Parse a one-letter action code, case-insensitively.
    pub fn parse(symbol: &str) -> Option<Action> {
        match symbol.trim().to_ascii_uppercase().as_str() {
            "S" => Some(Action::Stand),
            "H" => Some(Action::Hit),
            "D" => Some(Action::Double),
            "P" => Some(Action::Split),
            "R" => Some(Action::Surrender),
            _ => None,
        }
    }

    /// One-letter code used in the data files and on the wire.
    pub fn code(self) -> &'static str {
        match self {
            Action::Stand => "S",
            Action::Hit => "H",
            Action::Double => "D",
            Action::Split => "P",
            Action::Surrender => "R",
        }
    }

    /// Full player-facing name.
    pub fn name(self) -> &'static str {
        match self {
            Action::Stand => "Stand",
            Action::Hit => "Hit",
            Action::Double => "Double",
            Action::Split => "Split",
            Action::Surrender => "Surrender",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A single "when" clause of a strategy exception. Condition keys the
/// loader does not recognize become [`Condition::Unsupported`], which never
/// matches, so unknown data degrades to "no override" instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The hand's raw point values must equal this multiset.
    Composition(Vec<u8>),
    /// The H17 rule flag must have this value.
    DealerHitsSoft17(bool),
    /// Unrecognized condition key; never matches.
    Unsupported(String),
}

impl Condition {
    fn matches(&self, hand: Option<&Hand>, rules: Option<&Rules>) -> bool {
        match self {
            Condition::Composition(required) => {
                let Some(hand) = hand else { return false };
                let mut values: Vec<u8> = hand.cards().iter().map(|c| c.value()).collect();
                values.sort_unstable();
                let mut want = required.clone();
                want.sort_unstable();
                values == want
            }
            Condition::DealerHitsSoft17(expected) => {
                let Some(rules) = rules else { return false };
                rules.dealer_hits_soft_17 == *expected
            }
            Condition::Unsupported(_) => false,
        }
    }
}

/// A context-dependent override to the base strategy table. Exceptions are
/// kept in file order and the first full match wins; the base table is
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyException {
    pub description: String,
    pub row_key: String,
    pub dealer: Vec<String>,
    pub action: Action,
    pub conditions: Vec<Condition>,
}

impl StrategyException {
    fn applies(
        &self,
        row_key: &str,
        dealer_card: &str,
        hand: Option<&Hand>,
        rules: Option<&Rules>,
    ) -> bool {
        self.row_key == row_key
            && self.dealer.iter().any(|d| d == dealer_card)
            && self.conditions.iter().all(|c| c.matches(hand, rules))
    }
}

/// On-disk shape of one exception record.
#[derive(Debug, Deserialize)]
struct RawException {
    description: String,
    row_key: String,
    dealer: Vec<String>,
    action: Action,
    #[serde(default)]
    when: serde_json::Map<String, serde_json::Value>,
}

impl RawException {
    fn into_exception(self) -> StrategyException {
        let conditions = self
            .when
            .iter()
            .map(|(key, value)| match key.as_str() {
                "composition" => value
                    .as_array()
                    .and_then(|items| {
                        items
                            .iter()
                            .map(|v| v.as_u64().map(|n| n as u8))
                            .collect::<Option<Vec<u8>>>()
                    })
                    .map(Condition::Composition)
                    .unwrap_or_else(|| Condition::Unsupported(key.clone())),
                "dealer_hits_soft_17" => value
                    .as_bool()
                    .map(Condition::DealerHitsSoft17)
                    .unwrap_or_else(|| Condition::Unsupported(key.clone())),
                _ => Condition::Unsupported(key.clone()),
            })
            .collect();
        StrategyException {
            description: self.description,
            row_key: self.row_key,
            dealer: self.dealer,
            action: self.action,
            conditions,
        }
    }
}

/// Outcome of checking a player's answer against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerCheck {
    pub is_correct: bool,
    pub correct_action: Action,
    pub exception: Option<StrategyException>,
}

/// Basic strategy table loaded from a CSV file, plus the optional exception
/// overlay from its companion JSON file.
#[derive(Debug, Clone)]
pub struct StrategyTable {
    table: HashMap<String, HashMap<String, Action>>,
    row_order: Vec<String>,
    exceptions: Vec<StrategyException>,
}

impl StrategyTable {
    /// Dealer up-card columns, in display order.
    pub const DEALER_CARDS: [&'static str; 10] =
        ["2", "3", "4", "5", "6", "7", "8", "9", "10", "A"];

    /// Load a table from `csv_path`. A companion exceptions file is looked
    /// up next to it by convention (`single-deck.csv` →
    /// `single-deck-exceptions.json`); if the companion is absent the table
    /// simply has zero exceptions.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError`] if either file cannot be read, the CSV
    /// contains an unknown action code, or the exceptions JSON is
    /// malformed.
    pub fn load(csv_path: &Path) -> Result<Self, StrategyError> {
        let text = fs::read_to_string(csv_path).map_err(|source| StrategyError::Read {
            path: csv_path.to_path_buf(),
            source,
        })?;

        let mut lines = text.lines();
        let header = lines.next().ok_or_else(|| StrategyError::MalformedTable {
            path: csv_path.to_path_buf(),
            detail: "missing header row".to_string(),
        })?;
        let columns: Vec<String> = header
            .split(',')
            .skip(1)
            .map(|c| c.trim().to_string())
            .collect();

        let mut table = HashMap::new();
        let mut row_order = Vec::new();
        for line in lines {
            let cells: Vec<&str> = line.split(',').collect();
            if cells.is_empty() || cells[0].trim().is_empty() {
                continue;
            }
            let row_key = cells[0].trim().to_string();
            let mut row = HashMap::new();
            for (i, dealer_card) in columns.iter().enumerate() {
                // short rows simply omit columns; lookups on them fail later
                let Some(cell) = cells.get(i + 1) else { break };
                let action =
                    Action::parse(cell).ok_or_else(|| StrategyError::MalformedTable {
                        path: csv_path.to_path_buf(),
                        detail: format!(
                            "invalid action {:?} for {} vs {}",
                            cell.trim(),
                            row_key,
                            dealer_card
                        ),
                    })?;
                row.insert(dealer_card.clone(), action);
            }
            row_order.push(row_key.clone());
            table.insert(row_key, row);
        }

        let exceptions = Self::load_exceptions(csv_path)?;
        Ok(Self {
            table,
            row_order,
            exceptions,
        })
    }

    fn load_exceptions(csv_path: &Path) -> Result<Vec<StrategyException>, StrategyError> {
        let json_path = exceptions_path(csv_path);
        if !json_path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&json_path).map_err(|source| StrategyError::Read {
            path: json_path.clone(),
            source,
        })?;
        let raw: Vec<RawException> =
            serde_json::from_str(&text).map_err(|e| StrategyError::MalformedExceptions {
                path: json_path.clone(),
                detail: e.to_string(),
            })?;
        Ok(raw.into_iter().map(RawException::into_exception).collect())
    }

    fn base_action(&self, row_key: &str, dealer_card: &str) -> Result<Action, StrategyError> {
        let row = self
            .table
            .get(row_key)
            .ok_or_else(|| StrategyError::UnknownHand {
                key: row_key.to_string(),
            })?;
        row.get(dealer_card)
            .copied()
            .ok_or_else(|| StrategyError::UnknownDealerCard {
                symbol: dealer_card.to_string(),
            })
    }

    fn find_exception(
        &self,
        row_key: &str,
        dealer_card: &str,
        hand: Option<&Hand>,
        rules: Option<&Rules>,
    ) -> Option<&StrategyException> {
        self.exceptions
            .iter()
            .find(|exc| exc.applies(row_key, dealer_card, hand, rules))
    }

    /// Resolve the correct action for a hand key and dealer up-card.
    ///
    /// The base table answer is overridden by the first matching exception.
    /// Conditions that need the hand or the rules fail closed when the
    /// corresponding argument is `None`, leaving the base action in force.
    ///
    /// # Errors
    ///
    /// [`StrategyError::UnknownHand`] if `row_key` has no table row,
    /// [`StrategyError::UnknownDealerCard`] if that row has no
    /// `dealer_card` column.
    pub fn correct_action(
        &self,
        row_key: &str,
        dealer_card: &str,
        hand: Option<&Hand>,
        rules: Option<&Rules>,
    ) -> Result<Action, StrategyError> {
        let base = self.base_action(row_key, dealer_card)?;
        Ok(self
            .find_exception(row_key, dealer_card, hand, rules)
            .map(|exc| exc.action)
            .unwrap_or(base))
    }

    /// Check a player's answer. Resolution works exactly as in
    /// [`correct_action`](Self::correct_action); the matched exception, if
    /// any, is returned so callers can surface its description.
    pub fn check_action(
        &self,
        player_action: Action,
        row_key: &str,
        dealer_card: &str,
        hand: Option<&Hand>,
        rules: Option<&Rules>,
    ) -> Result<AnswerCheck, StrategyError> {
        let base = self.base_action(row_key, dealer_card)?;
        let exception = self.find_exception(row_key, dealer_card, hand, rules);
        let correct_action = exception.map(|exc| exc.action).unwrap_or(base);
        Ok(AnswerCheck {
            is_correct: player_action == correct_action,
            correct_action,
            exception: exception.cloned(),
        })
    }

    /// Row keys in file order, for chart rendering.
    pub fn row_keys(&self) -> &[String] {
        &self.row_order
    }

    /// Base-table cell without exception handling, for chart rendering and
    /// data validation. `None` when the row or column is absent.
    pub fn action(&self, row_key: &str, dealer_card: &str) -> Option<Action> {
        self.table.get(row_key)?.get(dealer_card).copied()
    }

    pub fn exceptions(&self) -> &[StrategyException] {
        &self.exceptions
    }
}

/// `single-deck.csv` → `single-deck-exceptions.json`, next to the table.
fn exceptions_path(csv_path: &Path) -> PathBuf {
    let stem = csv_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    csv_path.with_file_name(format!("{stem}-exceptions.json"))
}
