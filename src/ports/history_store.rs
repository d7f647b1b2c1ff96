//! History Store port: persistence for completed searches.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, HistoryId, UserId};
use crate::domain::history::HistoryRecord;

/// Records returned per history query unless the caller asks otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Port for durable search-history storage.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persists a record. Records are immutable once saved.
    async fn save(&self, record: &HistoryRecord) -> Result<(), DomainError>;

    /// Returns up to `limit` of the user's records, oldest first.
    async fn query_recent(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<HistoryRecord>, DomainError>;

    /// Looks a record up by id, for replay.
    async fn get_by_id(&self, id: &HistoryId) -> Result<Option<HistoryRecord>, DomainError>;
}
