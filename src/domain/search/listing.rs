//! Listing records returned by the search provider.

use serde::{Deserialize, Serialize};

/// Price of a listing for the whole stay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Total amount in `currency` units.
    pub amount: f64,
    /// Currency code as reported by the provider.
    pub currency: String,
}

impl Price {
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

/// One lodging option from the provider, kept opaque beyond the fields
/// the delivery pipeline renders and the ranking rules inspect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub name: String,
    pub bed_count: u32,
    pub address: String,
    pub price: Price,
    /// Absent for unrated listings; ranking treats absent as 0.
    pub rating: Option<f64>,
    /// Ordered photo links; delivery shows at most the first three.
    pub image_links: Vec<String>,
    pub detail_link: String,
}

impl Listing {
    /// Rating with the absent-means-zero rule applied.
    pub fn rating_or_default(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}
