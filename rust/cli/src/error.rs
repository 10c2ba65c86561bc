//! Error type for the arena front end.

use std::fmt;

use tessera_ai::PlayerSpecError;
use tessera_engine::errors::ArenaError;

use crate::config::ConfigError;

/// Everything that can stop `tessera-arena` before a report is printed.
#[derive(Debug)]
pub enum CliError {
    /// I/O error (stdout/stderr writes, config file reads)
    Io(std::io::Error),

    /// Unknown player identifier or malformed parameter
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// Engine refused to start the arena
    Engine(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(msg) => write!(f, "Engine error: {}", msg),
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

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error.to_string())
    }
}

impl From<PlayerSpecError> for CliError {
    fn from(error: PlayerSpecError) -> Self {
        CliError::InvalidInput(error.to_string())
    }
}

impl From<ArenaError> for CliError {
    fn from(error: ArenaError) -> Self {
        CliError::Engine(error.to_string())
    }
}
