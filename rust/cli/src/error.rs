//! Error types for the CLI application.
//!
//! ## Batch Validation Errors
//!
//! `BatchValidationError<T>` pairs a problem with the item it was found in.
//! `verify` uses it to report every inconsistency of a replay file at once.

use std::fmt;

use liar_ai::table::TableError;
use liar_engine::errors::GameError;
use liar_engine::replay::ReplayError;

/// Custom error type for CLI operations.
///
/// Every variant maps to exit code 2 in [`crate::run`].
#[derive(Debug)]
pub enum CliError {
    /// I/O error (file operations, stdout/stderr writes, etc.)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// Engine, table driver or replay error
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

impl From<String> for CliError {
    fn from(error: String) -> Self {
        CliError::Engine(error)
    }
}

impl From<&str> for CliError {
    fn from(error: &str) -> Self {
        CliError::Engine(error.to_string())
    }
}

impl From<GameError> for CliError {
    fn from(error: GameError) -> Self {
        CliError::Engine(error.to_string())
    }
}

impl From<TableError> for CliError {
    fn from(error: TableError) -> Self {
        CliError::Engine(error.to_string())
    }
}

impl From<ReplayError> for CliError {
    fn from(error: ReplayError) -> Self {
        CliError::Engine(error.to_string())
    }
}

/// Generic error type for batch validation operations.
///
/// # Examples
///
/// ```rust
/// use liar_cli::BatchValidationError;
///
/// let error = BatchValidationError {
///     item_context: "game.json".to_string(),
///     message: "initial deal has 51 cards, expected 52".to_string(),
/// };
/// assert_eq!(error.to_string(), "game.json: initial deal has 51 cards, expected 52");
/// ```
#[derive(Debug)]
pub struct BatchValidationError<T> {
    /// Context identifying the item that failed validation
    pub item_context: T,
    /// Descriptive error message
    pub message: String,
}

impl<T: fmt::Display> fmt::Display for BatchValidationError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.item_context, self.message)
    }
}

impl<T: fmt::Display + fmt::Debug> std::error::Error for BatchValidationError<T> {}
