//! Table command: print a strategy chart for a deck count.

use crate::error::CliError;
use crate::formatters::format_chart;
use bjtrain_engine::levels;
use bjtrain_engine::rules::Rules;
use bjtrain_engine::strategy::StrategyTable;
use std::io::Write;
use std::path::Path;

/// Print the strategy chart for the given deck count, optionally
/// restricted to the rows of one skill level.
pub fn handle_table_command(
    decks: usize,
    level: Option<u8>,
    data_dir: &Path,
    color: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let rules = Rules {
        num_decks: decks,
        ..Rules::default()
    };
    let path = data_dir.join(rules.strategy_file());
    let table = StrategyTable::load(&path)?;

    let filter = match level {
        Some(0) | None => None,
        Some(lvl) => {
            Some(levels::keys_for_level(lvl).map_err(|e| CliError::InvalidInput(e.to_string()))?)
        }
    };

    let deck_label = if decks == 1 { "Single deck" } else { "Multi deck" };
    writeln!(out, "{} basic strategy", deck_label)?;
    if let Some(lvl) = level.filter(|l| *l > 0) {
        let name = levels::level_name(lvl).map_err(|e| CliError::InvalidInput(e.to_string()))?;
        writeln!(out, "Level {}: {}", lvl, name)?;
    }
    write!(out, "{}", format_chart(&table, filter.as_ref(), color))?;
    writeln!(
        out,
        "S=Stand H=Hit D=Double P=Split R=Surrender ({} exceptions apply)",
        table.exceptions().len()
    )?;
    Ok(())
}
