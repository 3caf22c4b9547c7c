//! Levels command: list the skill levels and the hands each one drills.

use crate::error::CliError;
use bjtrain_engine::levels::{self, MAX_LEVEL};
use std::io::Write;

/// Print every skill level with its name and the row keys it covers.
/// Level 0 has no list of its own, so it reports the combined count.
pub fn handle_levels_command(out: &mut dyn Write) -> Result<(), CliError> {
    let all = levels::keys_for_level(0).map_err(|e| CliError::Engine(e.to_string()))?;
    let name = levels::level_name(0).map_err(|e| CliError::Engine(e.to_string()))?;
    writeln!(out, "Level 0: {} ({} hands)", name, all.len())?;
    writeln!(out, "  every hand from levels 1-{}", MAX_LEVEL)?;

    for level in 1..=MAX_LEVEL {
        let name = levels::level_name(level).map_err(|e| CliError::Engine(e.to_string()))?;
        let keys = levels::level_keys(level).map_err(|e| CliError::Engine(e.to_string()))?;
        writeln!(out, "Level {}: {} ({} hands)", level, name, keys.len())?;
        writeln!(out, "  {}", keys.join(" "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_all_five_levels() {
        let mut out = Vec::new();
        handle_levels_command(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        for level in 0..=4 {
            assert!(text.contains(&format!("Level {}:", level)));
        }
    }

    #[test]
    fn level_zero_covers_full_chart() {
        let mut out = Vec::new();
        handle_levels_command(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Level 0: All Hands (34 hands)"));
    }

    #[test]
    fn level_four_lists_expert_keys() {
        let mut out = Vec::new();
        handle_levels_command(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("A6 A7 99"));
    }
}
