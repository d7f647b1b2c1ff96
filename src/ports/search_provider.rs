//! Search Provider port: the external lodging-search API.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::search::{Listing, SearchCriteria};

/// Errors from the lodging-search provider.
///
/// `Api` carries the provider's own message, which is shown to the user;
/// the other variants are reported generically.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("{message}")]
    Api { message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("could not parse provider response: {0}")]
    Parse(String),
}

impl ProviderError {
    pub fn api(message: impl Into<String>) -> Self {
        ProviderError::Api {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        ProviderError::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        ProviderError::Parse(message.into())
    }
}

/// Port for the external lodging-search service.
///
/// One search per completed criteria set; concurrent independent calls
/// are assumed safe. The call may take a while, so implementations must
/// not hold engine locks.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Runs a search and returns the provider's listings in its
    /// original order.
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Listing>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_provider_message_verbatim() {
        let err = ProviderError::api("location not found");
        assert_eq!(err.to_string(), "location not found");
    }

    #[test]
    fn network_error_is_prefixed() {
        let err = ProviderError::network("connection refused");
        assert_eq!(err.to_string(), "network error: connection refused");
    }
}
