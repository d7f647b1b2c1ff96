//! Command-specific ordering and filtering of raw provider results.

use super::{CommandKind, Listing};

/// Applies the ranking rule for `kind` to `listings`.
///
/// All sorts are stable: equal keys keep their provider-reported relative
/// order, so identical inputs always produce identical output.
///
/// - `LowPrice`: ascending by price amount
/// - `HighPrice`: descending by price amount
/// - `BestDeals`: descending by rating, absent rating ranks as 0
/// - `Custom`: keep only listings priced at or below `max_price`, in
///   original order (no re-sort); `max_price` is ignored for other kinds
pub fn rank(mut listings: Vec<Listing>, kind: CommandKind, max_price: Option<u32>) -> Vec<Listing> {
    match kind {
        CommandKind::LowPrice => {
            listings.sort_by(|a, b| a.price.amount.total_cmp(&b.price.amount));
        }
        CommandKind::HighPrice => {
            listings.sort_by(|a, b| b.price.amount.total_cmp(&a.price.amount));
        }
        CommandKind::BestDeals => {
            listings.sort_by(|a, b| b.rating_or_default().total_cmp(&a.rating_or_default()));
        }
        CommandKind::Custom => {
            if let Some(ceiling) = max_price {
                listings.retain(|listing| listing.price.amount <= f64::from(ceiling));
            }
        }
    }
    listings
}
