//! Durable log entries of completed searches, replayable later.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{HistoryId, Timestamp, UserId, ValidationError};
use crate::domain::search::{Currency, SearchCriteria};

/// One completed search, recorded at confirm time.
///
/// Immutable once created. The optional fields are only present for
/// custom-filter searches, mirroring what was actually collected.
/// Replay rebuilds [`SearchCriteria`] from the record; the price ceiling
/// is deliberately not stored, so a replayed search shows everything the
/// provider returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: HistoryId,
    pub user_id: UserId,
    pub searched_at: Timestamp,
    pub city: String,
    pub enter_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub adult_count: u32,
    pub child_count: Option<u32>,
    pub infant_count: Option<u32>,
    pub pet_count: Option<u32>,
    pub currency: Option<Currency>,
}

impl HistoryRecord {
    /// Records a completed search for `user_id` at `searched_at`.
    ///
    /// Simple flows leave the optional fields empty; custom flows store
    /// the collected counts and currency.
    pub fn from_criteria(
        user_id: UserId,
        criteria: &SearchCriteria,
        searched_at: Timestamp,
    ) -> Self {
        let custom = criteria.max_price().is_some();
        Self {
            id: HistoryId::new(),
            user_id,
            searched_at,
            city: criteria.city().to_string(),
            enter_date: criteria.enter_date(),
            exit_date: criteria.exit_date(),
            adult_count: criteria.adult_count(),
            child_count: custom.then_some(criteria.child_count()),
            infant_count: custom.then_some(criteria.infant_count()),
            pet_count: custom.then_some(criteria.pet_count()),
            currency: custom.then_some(criteria.currency()),
        }
    }

    /// Reconstructs search criteria for replay.
    ///
    /// # Errors
    ///
    /// Invariant failures from [`SearchCriteria::new`]; cannot happen for
    /// records produced by [`HistoryRecord::from_criteria`].
    pub fn to_criteria(&self) -> Result<SearchCriteria, ValidationError> {
        Ok(SearchCriteria::new(
            self.city.clone(),
            self.enter_date,
            self.exit_date,
            self.adult_count,
        )?
        .with_counts(
            self.child_count.unwrap_or(0),
            self.infant_count.unwrap_or(0),
            self.pet_count.unwrap_or(0),
        )
        .with_currency(self.currency.unwrap_or_default()))
    }
}
