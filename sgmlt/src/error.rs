//! Error handling module for the sgmlt CLI.
//!
//! Errors that stop a command. Problems found in the input text itself are
//! diagnostics and are reported, not returned.

use sgmlx_lex::SyntaxError;
use thiserror::Error;

/// Main error type for the sgmlt CLI application.
#[derive(Error, Debug)]
pub enum SgmltError {
    /// Error when the configuration file is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error when file operations fail.
    #[error("File operation failed: {0}")]
    FileOperation(String),

    /// Error when command-line input is invalid.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error when a command finishes with failures.
    #[error("Command execution failed: {0}")]
    CommandExecution(String),

    /// Error when a syntax description cannot be loaded or compiled.
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// Error when IO operations fail.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using SgmltError.
pub type Result<T> = std::result::Result<T, SgmltError>;
