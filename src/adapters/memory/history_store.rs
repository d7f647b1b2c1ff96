//! In-memory history store.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, HistoryId, UserId};
use crate::domain::history::HistoryRecord;
use crate::ports::HistoryStore;

/// Append-only record list; insertion order is chronological.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    records: Mutex<Vec<HistoryRecord>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<HistoryRecord>>, DomainError> {
        self.records
            .lock()
            .map_err(|_| DomainError::new(ErrorCode::StoreError, "history store lock poisoned"))
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn save(&self, record: &HistoryRecord) -> Result<(), DomainError> {
        let mut records = self.lock()?;
        records.push(record.clone());
        Ok(())
    }

    async fn query_recent(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<HistoryRecord>, DomainError> {
        let records = self.lock()?;
        let mine: Vec<HistoryRecord> = records
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        // The most recent `limit` records, still oldest first.
        let skip = mine.len().saturating_sub(limit);
        Ok(mine.into_iter().skip(skip).collect())
    }

    async fn get_by_id(&self, id: &HistoryId) -> Result<Option<HistoryRecord>, DomainError> {
        let records = self.lock()?;
        Ok(records.iter().find(|record| &record.id == id).cloned())
    }
}
