//! Error types for the CLI application.
//!
//! `CliError` covers everything a command handler can fail with, so every
//! handler propagates through the `?` operator and `run` maps the result to
//! an exit code in one place.

use std::fmt;

use bjtrain_engine::errors::{StrategyError, TrainerError};

/// Custom error type for CLI operations.
#[derive(Debug)]
pub enum CliError {
    /// I/O error (file operations, stdout/stderr writes, etc.)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// Engine-related error (strategy data, trainer state)
    Engine(String),

    /// Operation was interrupted (e.g., by user with Ctrl+C)
    Interrupted(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(msg) => write!(f, "Engine error: {}", msg),
            CliError::Interrupted(msg) => write!(f, "Interrupted: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<TrainerError> for CliError {
    fn from(error: TrainerError) -> Self {
        CliError::Engine(error.to_string())
    }
}

impl From<StrategyError> for CliError {
    fn from(error: StrategyError) -> Self {
        CliError::Engine(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_the_category() {
        let err = CliError::InvalidInput("level must be 0-4".to_string());
        assert_eq!(err.to_string(), "Invalid input: level must be 0-4");
    }

    #[test]
    fn trainer_errors_convert_to_engine_errors() {
        let err: CliError = TrainerError::NoActiveHand.into();
        assert!(matches!(err, CliError::Engine(_)));
        assert!(err.to_string().contains("No hand has been dealt"));
    }
}
