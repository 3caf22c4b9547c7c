use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading strategy data or resolving an action.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Unknown hand: {key}")]
    UnknownHand { key: String },
    #[error("Unknown dealer card: {symbol}")]
    UnknownDealerCard { symbol: String },
    #[error("Malformed strategy table {}: {detail}", path.display())]
    MalformedTable { path: PathBuf, detail: String },
    #[error("Malformed exceptions file {}: {detail}", path.display())]
    MalformedExceptions { path: PathBuf, detail: String },
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors raised by the training session itself.
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("No hand has been dealt")]
    NoActiveHand,
    #[error("Gave up dealing after {attempts} attempts; level {level} keys may be missing from the table")]
    DealRetriesExhausted { attempts: usize, level: u8 },
    #[error("Invalid level: {level}. Must be 0-{max}")]
    InvalidLevel { level: u8, max: u8 },
    #[error(transparent)]
    Strategy(#[from] StrategyError),
    #[error("Failed to write round log: {0}")]
    Log(std::io::Error),
}
