//! Session Store port: keyed, per-user session state.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::session::Session;

/// Port for per-user session storage.
///
/// All operations are keyed by user id with no cross-user visibility.
/// Implementations must serialize mutation per user and must not hold
/// internal locks across await points, so a cancel can always land
/// while a provider call for the same user is in flight.
///
/// Each user also has a monotonically increasing *generation* counter,
/// bumped by every `clear`. The engine snapshots it before a provider
/// call and re-checks it when the response arrives; a changed value
/// means the flow was cancelled and the response must be discarded.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the user's active session, if any.
    async fn get(&self, user_id: UserId) -> Result<Option<Session>, DomainError>;

    /// Stores (or replaces) the user's session.
    async fn put(&self, session: Session) -> Result<(), DomainError>;

    /// Discards the user's session and bumps their generation counter.
    ///
    /// Clearing a user without a session still bumps the counter.
    async fn clear(&self, user_id: UserId) -> Result<(), DomainError>;

    /// Current generation counter for the user (0 if never seen).
    async fn generation(&self, user_id: UserId) -> Result<u64, DomainError>;
}
