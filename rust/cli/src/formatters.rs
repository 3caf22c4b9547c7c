//! Output formatting for strategy charts, hands, and session summaries.

use std::collections::{HashMap, HashSet};

use bjtrain_engine::cards::Card;
use bjtrain_engine::hand::Hand;
use bjtrain_engine::strategy::StrategyTable;
use bjtrain_engine::trainer::TrainingStats;

const RESET: &str = "\x1b[0m";
const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";

/// Colors assigned to the rarest actions in a chart, rarest first.
/// Highlighting the uncommon cells is what makes the chart scannable;
/// the dominant action stays uncolored.
const TIER_COLORS: [&str; 3] = ["\x1b[1;95m", "\x1b[93m", "\x1b[96m"];

pub fn format_card(card: Card) -> String {
    card.to_string()
}

pub fn format_hand(hand: &Hand) -> String {
    hand.to_string()
}

pub fn format_feedback(is_correct: bool, feedback: &str, color: bool) -> String {
    if !color {
        return feedback.to_string();
    }
    let tint = if is_correct { GREEN } else { RED };
    format!("{}{}{}", tint, feedback, RESET)
}

/// Render a strategy table as an aligned chart. Each action code is
/// colored by how rarely it appears, so exceptions to the dominant
/// pattern stand out. Colors are suppressed when `color` is false.
/// With a `filter`, only the listed row keys are rendered.
pub fn format_chart(
    table: &StrategyTable,
    filter: Option<&HashSet<&str>>,
    color: bool,
) -> String {
    let rows: Vec<&String> = table
        .row_keys()
        .iter()
        .filter(|key| filter.is_none_or(|set| set.contains(key.as_str())))
        .collect();

    let mut freq: HashMap<&str, usize> = HashMap::new();
    for row_key in &rows {
        for dealer in StrategyTable::DEALER_CARDS {
            if let Some(action) = table.action(row_key.as_str(), dealer) {
                *freq.entry(action.code()).or_insert(0) += 1;
            }
        }
    }

    // Rank actions by ascending frequency; the rarest get the
    // strongest colors.
    let mut ranked: Vec<(&str, usize)> = freq.into_iter().collect();
    ranked.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(b.0)));
    let mut colors: HashMap<&str, &str> = HashMap::new();
    for (i, (code, _)) in ranked.iter().enumerate() {
        if i < TIER_COLORS.len() {
            colors.insert(code, TIER_COLORS[i]);
        }
    }

    let mut out = String::new();
    out.push_str(&format!("{:>4}", "Hand"));
    for dealer in StrategyTable::DEALER_CARDS {
        out.push_str(&format!("{:>5}", dealer));
    }
    out.push('\n');

    for row_key in rows {
        out.push_str(&format!("{:>4}", row_key));
        for dealer in StrategyTable::DEALER_CARDS {
            let code = table
                .action(row_key, dealer)
                .map(|a| a.code())
                .unwrap_or("?");
            match colors.get(code) {
                Some(tint) if color => {
                    // Pad before coloring so escape bytes don't skew
                    // the column width.
                    out.push_str(&format!("{}{:>5}{}", tint, code, RESET));
                }
                _ => out.push_str(&format!("{:>5}", code)),
            }
        }
        out.push('\n');
    }
    out
}

/// End-of-session summary with a praise line keyed to accuracy.
pub fn format_session_summary(stats: &TrainingStats) -> String {
    let mut out = String::new();
    out.push_str("Session complete!\n");
    out.push_str(&format!("Final score: {}\n", stats));
    out.push_str(&format!("Best streak: {}\n", stats.best_streak));
    if stats.total > 0 {
        let pct = stats.percentage();
        if pct >= 90.0 {
            out.push_str("Excellent! You've mastered basic strategy!\n");
        } else if pct >= 70.0 {
            out.push_str("Good job! Keep practicing to improve.\n");
        } else {
            out.push_str("Keep studying the strategy charts.\n");
        }
    }
    out
}
