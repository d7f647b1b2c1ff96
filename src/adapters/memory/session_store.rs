//! In-memory session store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::session::Session;
use crate::ports::SessionStore;

#[derive(Debug, Default)]
struct Entry {
    session: Option<Session>,
    generation: u64,
}

/// Per-user sessions behind one mutex.
///
/// All methods lock, mutate, and release synchronously, so no guard
/// ever lives across an await.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: Mutex<HashMap<UserId, Entry>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<UserId, Entry>>, DomainError> {
        self.inner
            .lock()
            .map_err(|_| DomainError::new(ErrorCode::StoreError, "session store lock poisoned"))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, user_id: UserId) -> Result<Option<Session>, DomainError> {
        let map = self.lock()?;
        Ok(map.get(&user_id).and_then(|entry| entry.session.clone()))
    }

    async fn put(&self, session: Session) -> Result<(), DomainError> {
        let mut map = self.lock()?;
        let user_id = session.user_id();
        map.entry(user_id).or_default().session = Some(session);
        Ok(())
    }

    async fn clear(&self, user_id: UserId) -> Result<(), DomainError> {
        let mut map = self.lock()?;
        let entry = map.entry(user_id).or_default();
        entry.session = None;
        entry.generation += 1;
        Ok(())
    }

    async fn generation(&self, user_id: UserId) -> Result<u64, DomainError> {
        let map = self.lock()?;
        Ok(map.get(&user_id).map(|entry| entry.generation).unwrap_or(0))
    }
}
