//! Error types for the fmodeler CLI.

use fmodeler_core::types::PricingError;
use thiserror::Error;

use crate::config::ConfigError;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pricing or volatility model error
    #[error("Model error: {0}")]
    Pricing(#[from] PricingError),

    /// Input file not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Malformed price file
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid command-line argument or input value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialisation error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// One or more self-check scenarios failed
    #[error("{failed} of {total} self-check scenarios failed")]
    CheckFailed {
        /// Failed scenarios
        failed: usize,
        /// Scenarios run
        total: usize,
    },
}

impl CliError {
    /// Create an invalid-argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
