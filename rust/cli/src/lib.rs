//! # bjtrain CLI Library
//!
//! Command-line interface for the blackjack basic strategy trainer. It
//! exposes subcommands for drilling hands interactively, printing strategy
//! charts, and validating the strategy data files.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses
//! command-line arguments and executes the appropriate subcommand.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["bjtrain", "levels"];
//! let code = bjtrain_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `train`: Run an interactive training session
//! - `table`: Print a strategy chart
//! - `levels`: List the skill levels and the hands each one drills
//! - `deal`: Deal sample training hands without checking answers
//! - `doctor`: Validate the strategy data files

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

#[macro_use]
mod macros;

pub mod cli;
mod commands;
mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod ui;
pub mod validation;

use cli::{BjtrainCli, ColorChoice, Commands};
use commands::train::TrainOptions;
use commands::{
    handle_deal_command, handle_doctor_command, handle_levels_command, handle_table_command,
    handle_train_command,
};
use config::{ConfigResolved, ValueSource};

pub use error::CliError;

/// Main entry point for the CLI application.
///
/// Parses command-line arguments and dispatches to the appropriate
/// subcommand handler.
///
/// # Arguments
///
/// * `args` - Iterator over command-line arguments (typically `std::env::args()`)
/// * `out` - Output stream for normal output (typically `stdout`)
/// * `err` - Output stream for error messages (typically `stderr`)
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors, `130` for interruptions
///
/// # Example
///
/// ```
/// use std::io;
/// let args = vec!["bjtrain", "levels"];
/// let code = bjtrain_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    const COMMANDS: &[&str] = &["train", "table", "levels", "deal", "doctor"];
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let parsed = BjtrainCli::try_parse_from(&argv);
    match parsed {
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version should print to stdout and exit 0
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::SUCCESS
                }
                _ => {
                    if writeln!(err, "{}", e).is_err()
                        || writeln!(err).is_err()
                        || writeln!(err, "Blackjack Basic Strategy Trainer").is_err()
                        || writeln!(err, "Usage: bjtrain <command> [options]\n").is_err()
                        || writeln!(err, "Commands:").is_err()
                    {
                        return exit_code::ERROR;
                    }
                    for c in COMMANDS {
                        write_or_exit!(err, "  {}", c);
                    }
                    write_or_exit!(err, "\nFor full help, run: bjtrain --help");
                    exit_code::ERROR
                }
            }
        }
        Ok(cli) => {
            let resolved = match config::load_with_sources() {
                Ok(resolved) => resolved,
                Err(e) => {
                    write_or_exit!(err, "Error: {}", e);
                    return exit_code::ERROR;
                }
            };

            match cli.cmd {
                Commands::Train {
                    decks,
                    h17,
                    s17,
                    level,
                    data_dir,
                    seed,
                    hands,
                    log_file,
                } => {
                    let dealer_hits_soft_17 = match (h17, s17) {
                        (true, _) => Some(true),
                        (_, true) => Some(false),
                        _ => None,
                    };
                    let opts = TrainOptions {
                        decks,
                        dealer_hits_soft_17,
                        level: level.or(configured_level(&resolved)),
                        data_dir: resolve_data_dir(data_dir, &resolved),
                        seed: seed.or(configured_seed(&resolved)),
                        hands,
                        log_file,
                        color: color_enabled(ColorChoice::Auto, &resolved),
                    };
                    let stdin = std::io::stdin();
                    let mut stdin_lock = stdin.lock();
                    match handle_train_command(opts, out, err, &mut stdin_lock) {
                        Ok(()) => exit_code::SUCCESS,
                        Err(CliError::Interrupted(_)) => exit_code::INTERRUPTED,
                        Err(e) => {
                            write_or_exit!(err, "Error: {}", e);
                            exit_code::ERROR
                        }
                    }
                }
                Commands::Table {
                    decks,
                    level,
                    data_dir,
                    color,
                } => {
                    let data_dir = resolve_data_dir(data_dir, &resolved);
                    let color = color_enabled(color, &resolved);
                    match handle_table_command(decks, level, &data_dir, color, out) {
                        Ok(()) => exit_code::SUCCESS,
                        Err(e) => {
                            write_or_exit!(err, "Error: {}", e);
                            exit_code::ERROR
                        }
                    }
                }
                Commands::Levels => match handle_levels_command(out) {
                    Ok(()) => exit_code::SUCCESS,
                    Err(e) => {
                        write_or_exit!(err, "Error: {}", e);
                        exit_code::ERROR
                    }
                },
                Commands::Deal {
                    count,
                    level,
                    decks,
                    seed,
                    json,
                    data_dir,
                } => {
                    let data_dir = resolve_data_dir(data_dir, &resolved);
                    let seed = seed.or(configured_seed(&resolved));
                    match handle_deal_command(count, level, decks, seed, json, &data_dir, out) {
                        Ok(()) => exit_code::SUCCESS,
                        Err(e) => {
                            write_or_exit!(err, "Error: {}", e);
                            exit_code::ERROR
                        }
                    }
                }
                Commands::Doctor { data_dir } => {
                    let data_dir = resolve_data_dir(data_dir, &resolved);
                    match handle_doctor_command(&data_dir, out) {
                        Ok(()) => exit_code::SUCCESS,
                        Err(e) => {
                            write_or_exit!(err, "Error: {}", e);
                            exit_code::ERROR
                        }
                    }
                }
            }
        }
    }
}

/// Flag value wins, then the config file / environment, then `data/`.
fn resolve_data_dir(flag: Option<PathBuf>, resolved: &ConfigResolved) -> PathBuf {
    flag.unwrap_or_else(|| resolved.config.data_dir.clone())
}

/// A level only counts as configured when a file or env var set it.
fn configured_level(resolved: &ConfigResolved) -> Option<u8> {
    match resolved.sources.level {
        ValueSource::Default => None,
        _ => Some(resolved.config.level),
    }
}

fn configured_seed(resolved: &ConfigResolved) -> Option<u64> {
    match resolved.sources.seed {
        ValueSource::Default => None,
        _ => resolved.config.seed,
    }
}

/// Resolve a color choice against NO_COLOR and the loaded config.
fn color_enabled(choice: ColorChoice, resolved: &ConfigResolved) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
                return false;
            }
            resolved.config.color
        }
    }
}
