//! Search provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// RapidAPI search provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// RapidAPI key
    pub api_key: String,

    /// Base URL of the search API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Result pages fetched per search
    #[serde(default = "default_page_count")]
    pub page_count: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PROVIDER__API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidProviderUrl);
        }
        if self.page_count == 0 || self.page_count > 20 {
            return Err(ValidationError::InvalidPageCount);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "https://airbnb13.p.rapidapi.com".to_string()
}

fn default_page_count() -> u32 {
    8
}

fn default_timeout() -> u64 {
    30
}
