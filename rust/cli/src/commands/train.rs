//! Train command: interactive basic strategy drilling.
//!
//! Prompts for the table rules (unless flags already pinned them),
//! then loops dealing hands and grading the player's answers until the
//! player quits, input ends, or the requested hand count is reached.

use crate::error::CliError;
use crate::formatters::{format_card, format_feedback, format_hand, format_session_summary};
use crate::ui;
use crate::validation::{self, ParseResult};
use bjtrain_engine::levels;
use bjtrain_engine::logger::RoundLogger;
use bjtrain_engine::rules::Rules;
use bjtrain_engine::trainer::Trainer;
use std::io::{BufRead, Write};
use std::path::PathBuf;

const ACTION_MENU: &str = "[S]tand  [H]it  [D]ouble  s[P]lit  su[R]render  [Q]uit";

/// Resolved settings for a training session. Flags that were given on
/// the command line suppress the matching interactive prompt.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub decks: Option<usize>,
    pub dealer_hits_soft_17: Option<bool>,
    pub level: Option<u8>,
    pub data_dir: PathBuf,
    pub seed: Option<u64>,
    pub hands: Option<u32>,
    pub log_file: Option<PathBuf>,
    pub color: bool,
}

/// Run an interactive training session.
pub fn handle_train_command(
    opts: TrainOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out, "BLACKJACK BASIC STRATEGY TRAINER")?;
    writeln!(out, "{}", "=".repeat(50))?;

    let Some(rules) = resolve_rules(&opts, out, err, stdin)? else {
        return Ok(());
    };

    let level_name =
        levels::level_name(rules.level).map_err(|e| CliError::InvalidInput(e.to_string()))?;
    writeln!(out)?;
    writeln!(out, "Rules: {}", rules)?;
    writeln!(out, "Training level {}: {}", rules.level, level_name)?;
    writeln!(out, "Enter an action for each hand. {} ", ACTION_MENU)?;

    let mut trainer = match opts.seed {
        Some(seed) => Trainer::with_seed(rules, &opts.data_dir, seed)?,
        None => Trainer::new(rules, &opts.data_dir)?,
    };
    if let Some(path) = &opts.log_file {
        trainer.attach_logger(RoundLogger::create(path)?);
    }

    run_session(&mut trainer, &opts, out, err, stdin)?;

    write!(out, "\n{}", format_session_summary(trainer.stats()))?;
    trainer.end_session();
    Ok(())
}

/// Ask for each rule the flags did not pin. Returns `None` when input
/// ends before setup completes.
fn resolve_rules(
    opts: &TrainOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<Option<Rules>, CliError> {
    let num_decks = match opts.decks {
        Some(decks) => {
            if decks != 1 && decks != 6 {
                return Err(CliError::InvalidInput(format!(
                    "deck count must be 1 or 6, got {}",
                    decks
                )));
            }
            decks
        }
        None => {
            let Some(decks) =
                prompt_until_valid(out, err, stdin, "Number of decks (1/6) [1]: ", |line| {
                    validation::parse_decks(line, 1).map(|d| d as usize)
                })?
            else {
                return Ok(None);
            };
            decks
        }
    };

    let dealer_hits_soft_17 = match opts.dealer_hits_soft_17 {
        Some(h17) => h17,
        None => {
            let Some(h17) = prompt_until_valid(
                out,
                err,
                stdin,
                "Dealer hits soft 17? (y/n) [y]: ",
                |line| validation::parse_yes_no(line, true),
            )?
            else {
                return Ok(None);
            };
            h17
        }
    };

    let level = match opts.level {
        Some(level) => {
            levels::level_name(level).map_err(|e| CliError::InvalidInput(e.to_string()))?;
            level
        }
        None => {
            let Some(level) =
                prompt_until_valid(out, err, stdin, "Skill level (0-4) [0]: ", |line| {
                    validation::parse_level(line, 0)
                })?
            else {
                return Ok(None);
            };
            level
        }
    };

    Ok(Some(Rules {
        num_decks,
        dealer_hits_soft_17,
        level,
    }))
}

/// Re-prompt until `parse` accepts the answer. `None` means EOF.
fn prompt_until_valid<T>(
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
    prompt: &str,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Result<Option<T>, CliError> {
    loop {
        let Some(line) = ui::prompt_line(out, stdin, prompt)? else {
            return Ok(None);
        };
        match parse(&line) {
            Ok(value) => return Ok(Some(value)),
            Err(msg) => ui::write_error(err, &msg)?,
        }
    }
}

fn run_session(
    trainer: &mut Trainer,
    opts: &TrainOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let mut answered = 0u32;
    loop {
        if let Some(limit) = opts.hands
            && answered >= limit
        {
            break;
        }

        let (hand, dealer) = trainer.deal_hand()?;
        writeln!(out)?;
        writeln!(out, "Your hand: {}", format_hand(&hand))?;
        writeln!(out, "Dealer shows: {}", format_card(dealer))?;

        let action = loop {
            writeln!(out, "{}", ACTION_MENU)?;
            let Some(line) = ui::prompt_line(out, stdin, "Your action: ")? else {
                return Ok(());
            };
            match validation::parse_action_input(&line) {
                ParseResult::Action(action) => break Some(action),
                ParseResult::Quit => break None,
                ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
            }
        };
        let Some(action) = action else {
            return Ok(());
        };

        let result = trainer.check_answer(action)?;
        writeln!(
            out,
            "{}",
            format_feedback(result.is_correct, &result.feedback(), opts.color)
        )?;
        if let Some(description) = &result.exception_description {
            writeln!(out, "Note: {}", description)?;
        }
        writeln!(out, "Session: {}", trainer.stats())?;
        answered += 1;
    }
    Ok(())
}
