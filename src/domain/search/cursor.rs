//! Resumable position marker into a ranked result sequence.

use serde::{Deserialize, Serialize};

use super::{CommandKind, Listing};

/// Cursor over an already ranked/filtered result list.
///
/// Owned by the active session while delivery is in progress and
/// discarded once the list is exhausted or the session is cleared.
/// `next_batch` is pure list slicing, so the cursor stays trivially
/// serializable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultCursor {
    listings: Vec<Listing>,
    /// 0-based index of the next unseen listing.
    position: usize,
    command_kind: CommandKind,
    max_price: Option<u32>,
}

impl ResultCursor {
    /// Creates a cursor at the start of a ranked list.
    pub fn new(listings: Vec<Listing>, command_kind: CommandKind, max_price: Option<u32>) -> Self {
        Self {
            listings,
            position: 0,
            command_kind,
            max_price,
        }
    }

    /// Emits up to `n` listings from the current position and advances
    /// by the number emitted.
    pub fn next_batch(&mut self, n: usize) -> Vec<Listing> {
        let end = (self.position + n).min(self.listings.len());
        let batch = self.listings[self.position..end].to_vec();
        self.position = end;
        batch
    }

    /// Number of listings not yet emitted.
    pub fn remaining(&self) -> usize {
        self.listings.len() - self.position
    }

    /// True once every listing has been emitted.
    pub fn is_exhausted(&self) -> bool {
        self.position == self.listings.len()
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn command_kind(&self) -> CommandKind {
        self.command_kind
    }

    pub fn max_price(&self) -> Option<u32> {
        self.max_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::Price;

    fn listings(n: usize) -> Vec<Listing> {
        (0..n)
            .map(|i| Listing {
                name: format!("listing-{i}"),
                bed_count: 1,
                address: "addr".to_string(),
                price: Price::new(100.0 + i as f64, "USD"),
                rating: None,
                image_links: vec![],
                detail_link: format!("https://example.com/{i}"),
            })
            .collect()
    }

    #[test]
    fn seven_listings_yield_batches_of_three_three_one() {
        let mut cursor = ResultCursor::new(listings(7), CommandKind::LowPrice, None);

        let first = cursor.next_batch(3);
        assert_eq!(first.len(), 3);
        assert_eq!(cursor.remaining(), 4);
        assert!(!cursor.is_exhausted());

        let second = cursor.next_batch(3);
        assert_eq!(second.len(), 3);
        assert_eq!(cursor.remaining(), 1);
        assert!(!cursor.is_exhausted());

        let third = cursor.next_batch(3);
        assert_eq!(third.len(), 1);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn batches_start_at_the_first_listing_and_preserve_order() {
        let mut cursor = ResultCursor::new(listings(4), CommandKind::LowPrice, None);
        let batch = cursor.next_batch(3);
        let names: Vec<_> = batch.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["listing-0", "listing-1", "listing-2"]);
    }

    #[test]
    fn short_list_is_exhausted_by_single_batch() {
        let mut cursor = ResultCursor::new(listings(2), CommandKind::HighPrice, None);
        let batch = cursor.next_batch(3);
        assert_eq!(batch.len(), 2);
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn exhausted_cursor_emits_empty_batches() {
        let mut cursor = ResultCursor::new(listings(1), CommandKind::LowPrice, None);
        cursor.next_batch(3);
        assert!(cursor.next_batch(3).is_empty());
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn empty_list_is_exhausted_from_the_start() {
        let cursor = ResultCursor::new(vec![], CommandKind::Custom, Some(100));
        assert!(cursor.is_empty());
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn cursor_round_trips_through_serde() {
        let mut cursor = ResultCursor::new(listings(5), CommandKind::Custom, Some(300));
        cursor.next_batch(3);

        let json = serde_json::to_string(&cursor).unwrap();
        let restored: ResultCursor = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.position(), 3);
        assert_eq!(restored.remaining(), 2);
        assert_eq!(restored.max_price(), Some(300));
    }
}
