//! RapidAPI lodging-search provider.
//!
//! Talks to the Airbnb search API on RapidAPI. The API paginates, so one
//! logical search fans out into a fixed page range fetched concurrently
//! and flattened in page order.
//!
//! # Configuration
//!
//! ```ignore
//! let config = RapidApiConfig::new(api_key)
//!     .with_base_url("https://airbnb13.p.rapidapi.com")
//!     .with_page_count(8);
//!
//! let provider = RapidApiProvider::new(config);
//! ```

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::search::{Listing, Price, SearchCriteria};
use crate::ports::{ProviderError, SearchProvider};

/// Configuration for the RapidAPI provider.
#[derive(Debug, Clone)]
pub struct RapidApiConfig {
    /// API key for the `X-RapidAPI-Key` header.
    api_key: Secret<String>,
    /// Base URL of the API (default: https://airbnb13.p.rapidapi.com).
    pub base_url: String,
    /// Result pages fetched per search.
    pub page_count: u32,
    /// Request timeout.
    pub timeout: Duration,
}

impl RapidApiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://airbnb13.p.rapidapi.com".to_string(),
            page_count: 8,
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets how many result pages each search fetches.
    pub fn with_page_count(mut self, page_count: u32) -> Self {
        self.page_count = page_count.max(1);
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Host header value, derived from the base URL.
    fn host(&self) -> String {
        self.base_url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
            .to_string()
    }
}

/// RapidAPI search provider implementation.
pub struct RapidApiProvider {
    config: RapidApiConfig,
    client: Client,
}

impl RapidApiProvider {
    /// Creates a new provider with the given configuration.
    pub fn new(config: RapidApiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn search_url(&self) -> String {
        format!(
            "{}/search-location",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Fetches one result page.
    async fn fetch_page(
        &self,
        criteria: &SearchCriteria,
        page: u32,
    ) -> Result<Vec<Listing>, ProviderError> {
        let response = self
            .client
            .get(self.search_url())
            .header("X-RapidAPI-Key", self.config.api_key())
            .header("X-RapidAPI-Host", self.config.host())
            .query(&[
                ("location", criteria.city().to_string()),
                ("checkin", criteria.enter_date().to_string()),
                ("checkout", criteria.exit_date().to_string()),
                ("adults", criteria.adult_count().to_string()),
                ("children", criteria.child_count().to_string()),
                ("infants", criteria.infant_count().to_string()),
                ("pets", criteria.pet_count().to_string()),
                ("currency", criteria.currency().as_str().to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::network("request timed out")
                } else if e.is_connect() {
                    ProviderError::network(format!("connection failed: {e}"))
                } else {
                    ProviderError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::api(format!(
                "provider returned {status}: {body}"
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::parse(e.to_string()))?;

        if parsed.error {
            return Err(ProviderError::api(error_message(parsed.message)));
        }

        Ok(parsed.results.into_iter().map(Listing::from).collect())
    }
}

#[async_trait]
impl SearchProvider for RapidApiProvider {
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Listing>, ProviderError> {
        let pages = (1..=self.config.page_count).map(|page| self.fetch_page(criteria, page));
        let fetched = try_join_all(pages).await?;
        Ok(fetched.into_iter().flatten().collect())
    }
}

/// The API reports errors as a string or a list of strings.
fn error_message(message: Option<serde_json::Value>) -> String {
    match message {
        Some(serde_json::Value::String(text)) => text,
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .collect::<Vec<_>>()
            .join("; "),
        Some(other) => other.to_string(),
        None => "provider reported an error".to_string(),
    }
}

// ----- RapidAPI types -----

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    results: Vec<ListingDto>,
}

#[derive(Debug, Deserialize)]
struct ListingDto {
    #[serde(default)]
    name: String,
    #[serde(default)]
    beds: u32,
    #[serde(default)]
    address: String,
    #[serde(default)]
    price: PriceDto,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    deeplink: String,
}

#[derive(Debug, Default, Deserialize)]
struct PriceDto {
    #[serde(default)]
    total: f64,
    #[serde(default)]
    currency: String,
}

impl From<ListingDto> for Listing {
    fn from(dto: ListingDto) -> Self {
        Listing {
            name: dto.name,
            bed_count: dto.beds,
            address: dto.address,
            price: Price::new(dto.price.total, dto.price.currency),
            rating: dto.rating,
            image_links: dto.images,
            detail_link: dto.deeplink,
        }
    }
}
