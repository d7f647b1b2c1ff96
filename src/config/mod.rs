//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `STAYFINDER_` prefix and nested values use `__` as separator.
//!
//! # Example
//!
//! ```no_run
//! use stayfinder::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod flow;
mod provider;

pub use error::{ConfigError, ValidationError};
pub use flow::FlowConfig;
pub use provider::ProviderConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Search provider configuration (RapidAPI)
    pub provider: ProviderConfig,

    /// Conversation flow tunables
    #[serde(default)]
    pub flow: FlowConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads variables with the
    /// `STAYFINDER` prefix, e.g.:
    ///
    /// - `STAYFINDER__PROVIDER__API_KEY=...` -> `provider.api_key`
    /// - `STAYFINDER__FLOW__HISTORY_LIMIT=5` -> `flow.history_limit`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("STAYFINDER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.provider.validate()?;
        self.flow.validate()?;
        Ok(())
    }
}
