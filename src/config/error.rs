//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Provider base URL must start with http:// or https://")]
    InvalidProviderUrl,

    #[error("Provider page count must be between 1 and 20")]
    InvalidPageCount,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("History limit must be at least 1")]
    InvalidHistoryLimit,
}
