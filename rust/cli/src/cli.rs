//! Command-line argument definitions for the `bjtrain` binary.
//!
//! All subcommands and their flags live here so that `run` can stay a pure
//! dispatcher and tests can parse argument vectors directly.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Top-level CLI parser for the blackjack strategy trainer.
#[derive(Debug, Parser)]
#[command(
    name = "bjtrain",
    version,
    about = "Blackjack basic strategy trainer",
    disable_help_subcommand = true
)]
pub struct BjtrainCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

/// When chart output should use ANSI colors.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color unless NO_COLOR / BJTRAIN_NO_COLOR is set
    Auto,
    /// Always emit ANSI color codes
    Always,
    /// Never emit ANSI color codes
    Never,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run an interactive training session
    Train {
        /// Number of decks in the shoe (skips the interactive prompt)
        #[arg(long)]
        decks: Option<usize>,
        /// Dealer hits soft 17 (skips the interactive prompt)
        #[arg(long, conflicts_with = "s17")]
        h17: bool,
        /// Dealer stands on soft 17 (skips the interactive prompt)
        #[arg(long)]
        s17: bool,
        /// Skill level 0-4 (skips the interactive prompt)
        #[arg(long)]
        level: Option<u8>,
        /// Directory holding the strategy data files
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// RNG seed for reproducible deals
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many answered hands
        #[arg(long)]
        hands: Option<u32>,
        /// Append answered rounds to this JSONL file
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Print a strategy chart
    Table {
        /// Number of decks the chart is for
        #[arg(long, default_value_t = 1)]
        decks: usize,
        /// Filter rows to one skill level
        #[arg(long)]
        level: Option<u8>,
        /// Directory holding the strategy data files
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Color the chart cells by action
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },
    /// List the skill levels and the hands each one drills
    Levels,
    /// Deal sample training hands without checking answers
    Deal {
        /// How many hands to deal
        #[arg(long, default_value_t = 5)]
        count: u32,
        /// Restrict deals to one skill level
        #[arg(long)]
        level: Option<u8>,
        /// Number of decks in the shoe
        #[arg(long, default_value_t = 1)]
        decks: usize,
        /// RNG seed for reproducible deals
        #[arg(long)]
        seed: Option<u64>,
        /// Emit one JSON object per hand instead of text
        #[arg(long)]
        json: bool,
        /// Directory holding the strategy data files
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Validate the strategy data files
    Doctor {
        /// Directory holding the strategy data files
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}
