//! Doctor command: validate the strategy data files.
//!
//! Loads both strategy tables and reports PASS/FAIL lines for each
//! check. The command fails when any check fails, so it can gate a
//! deployment or a data edit in CI.

use crate::error::CliError;
use bjtrain_engine::levels;
use bjtrain_engine::strategy::{Condition, StrategyTable};
use std::io::Write;
use std::path::Path;

const STRATEGY_FILES: [&str; 2] = ["single-deck.csv", "multi-deck.csv"];

struct DoctorCheck {
    name: String,
    ok: bool,
    detail: String,
}

impl DoctorCheck {
    fn ok(name: impl Into<String>, detail: impl Into<String>) -> Self {
        DoctorCheck {
            name: name.into(),
            ok: true,
            detail: detail.into(),
        }
    }

    fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        DoctorCheck {
            name: name.into(),
            ok: false,
            detail: detail.into(),
        }
    }
}

/// Run every data check against `data_dir` and print one PASS/FAIL line
/// per check. Returns an error when any check failed.
pub fn handle_doctor_command(data_dir: &Path, out: &mut dyn Write) -> Result<(), CliError> {
    let mut checks = Vec::new();
    for file in STRATEGY_FILES {
        run_file_checks(&data_dir.join(file), file, &mut checks);
    }

    let mut failures = 0usize;
    for check in &checks {
        let status = if check.ok { "PASS" } else { "FAIL" };
        writeln!(out, "{} {}: {}", status, check.name, check.detail)?;
        if !check.ok {
            failures += 1;
        }
    }
    writeln!(out, "{} checks, {} failed", checks.len(), failures)?;

    if failures > 0 {
        return Err(CliError::Config(format!(
            "doctor found {} problem(s)",
            failures
        )));
    }
    Ok(())
}

fn run_file_checks(path: &Path, file: &str, checks: &mut Vec<DoctorCheck>) {
    let load = format!("{} load", file);
    let table = match StrategyTable::load(path) {
        Ok(table) => {
            checks.push(DoctorCheck::ok(&load, format!("parsed {}", path.display())));
            table
        }
        Err(e) => {
            checks.push(DoctorCheck::fail(&load, e.to_string()));
            return;
        }
    };

    // Every canonical key, exactly once, with a full row each.
    let expected = levels::keys_for_level(0).unwrap_or_default();
    let name = format!("{} rows", file);
    let missing: Vec<&str> = expected
        .iter()
        .filter(|key| !table.row_keys().iter().any(|row| row == *key))
        .copied()
        .collect();
    let extra: Vec<&String> = table
        .row_keys()
        .iter()
        .filter(|row| !expected.contains(row.as_str()))
        .collect();
    if missing.is_empty() && extra.is_empty() {
        checks.push(DoctorCheck::ok(
            &name,
            format!("{} strategy keys present", table.row_keys().len()),
        ));
    } else {
        checks.push(DoctorCheck::fail(
            &name,
            format!("missing {:?}, unexpected {:?}", missing, extra),
        ));
    }

    let name = format!("{} cells", file);
    let mut holes = Vec::new();
    for row in table.row_keys() {
        for dealer in StrategyTable::DEALER_CARDS {
            if table.action(row, dealer).is_none() {
                holes.push(format!("{}v{}", row, dealer));
            }
        }
    }
    if holes.is_empty() {
        checks.push(DoctorCheck::ok(
            &name,
            format!("{} complete rows", table.row_keys().len()),
        ));
    } else {
        checks.push(DoctorCheck::fail(
            &name,
            format!("empty cells: {}", holes.join(" ")),
        ));
    }

    let name = format!("{} exceptions", file);
    let mut problems = Vec::new();
    for exc in table.exceptions() {
        if !table.row_keys().iter().any(|row| *row == exc.row_key) {
            problems.push(format!(
                "'{}' names unknown row key {}",
                exc.description, exc.row_key
            ));
        }
        for dealer in &exc.dealer {
            if !StrategyTable::DEALER_CARDS.contains(&dealer.as_str()) {
                problems.push(format!(
                    "'{}' names unknown dealer card {}",
                    exc.description, dealer
                ));
            }
        }
        for condition in &exc.conditions {
            if let Condition::Unsupported(key) = condition {
                problems.push(format!(
                    "'{}' has unsupported condition '{}'",
                    exc.description, key
                ));
            }
        }
    }
    if problems.is_empty() {
        checks.push(DoctorCheck::ok(
            &name,
            format!("{} exceptions reference known cells", table.exceptions().len()),
        ));
    } else {
        checks.push(DoctorCheck::fail(&name, problems.join("; ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
    }

    #[test]
    fn shipped_data_passes() {
        let mut out = Vec::new();
        handle_doctor_command(&data_dir(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("PASS single-deck.csv load"));
        assert!(text.contains("PASS multi-deck.csv load"));
        assert!(text.contains("0 failed"));
        assert!(!text.contains("FAIL"));
    }

    #[test]
    fn missing_directory_fails_load_checks() {
        let mut out = Vec::new();
        let result = handle_doctor_command(Path::new("/nonexistent"), &mut out);
        assert!(result.is_err());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("FAIL single-deck.csv load"));
        assert!(text.contains("FAIL multi-deck.csv load"));
    }

    #[test]
    fn incomplete_table_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut csv = String::from("Hand,2,3,4,5,6,7,8,9,10,A\n");
        csv.push_str("16,S,S,S,S,S,H,H,H,R,R\n");
        fs::write(dir.path().join("single-deck.csv"), &csv).unwrap();
        fs::write(dir.path().join("multi-deck.csv"), &csv).unwrap();

        let mut out = Vec::new();
        let result = handle_doctor_command(dir.path(), &mut out);
        assert!(result.is_err());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("FAIL single-deck.csv rows"));
        assert!(text.contains("missing"));
    }

    #[test]
    fn bad_exception_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        for file in STRATEGY_FILES {
            fs::copy(data_dir().join(file), dir.path().join(file)).unwrap();
        }
        let bad = r#"[{"description":"bogus","row_key":"99","dealer":["Z"],"action":"H","when":{}}]"#;
        fs::write(dir.path().join("single-deck-exceptions.json"), bad).unwrap();

        let mut out = Vec::new();
        let result = handle_doctor_command(dir.path(), &mut out);
        assert!(result.is_err());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("FAIL single-deck.csv exceptions"));
        assert!(text.contains("unknown dealer card Z"));
    }
}
