//! History replay: re-running a saved search from its stored criteria.
//!
//! Replay skips collection and confirmation entirely. It re-queries the
//! provider with the recorded criteria, ranks the results by ascending
//! price, and drops the user straight into delivery. No new history
//! record is written.

use std::sync::Arc;

use crate::domain::foundation::{HistoryId, UserId};
use crate::domain::search::{rank, CommandKind, ResultCursor};
use crate::domain::session::Session;
use crate::ports::{HistoryStore, MessagingChannel, SearchProvider, SessionStore};

use super::render;
use super::{Deliverer, EngineError};

/// Replays saved searches selected from the `/history` prompt.
pub struct HistoryReplay {
    sessions: Arc<dyn SessionStore>,
    history: Arc<dyn HistoryStore>,
    provider: Arc<dyn SearchProvider>,
    channel: Arc<dyn MessagingChannel>,
    deliverer: Deliverer,
}

impl HistoryReplay {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        history: Arc<dyn HistoryStore>,
        provider: Arc<dyn SearchProvider>,
        channel: Arc<dyn MessagingChannel>,
        deliverer: Deliverer,
    ) -> Self {
        Self {
            sessions,
            history,
            provider,
            channel,
            deliverer,
        }
    }

    /// Replays the record behind a `history:<id>` selection payload.
    ///
    /// Only allowed while the user has no active flow. A record that
    /// does not exist, does not parse, or belongs to another user gets
    /// the same "gone" answer.
    pub async fn replay(&self, user_id: UserId, raw_id: &str) -> Result<(), EngineError> {
        if self.sessions.get(user_id).await?.is_some() {
            self.channel
                .send_text(user_id, render::MSG_FLOW_IN_PROGRESS)
                .await?;
            return Ok(());
        }
        let Ok(id) = raw_id.parse::<HistoryId>() else {
            self.channel
                .send_text(user_id, render::MSG_HISTORY_GONE)
                .await?;
            return Ok(());
        };
        let record = match self.history.get_by_id(&id).await? {
            Some(record) if record.user_id == user_id => record,
            _ => {
                self.channel
                    .send_text(user_id, render::MSG_HISTORY_GONE)
                    .await?;
                return Ok(());
            }
        };
        let criteria = match record.to_criteria() {
            Ok(criteria) => criteria,
            Err(err) => {
                tracing::error!(user_id = %user_id, %id, %err, "stored record no longer valid");
                self.channel
                    .send_text(user_id, render::MSG_HISTORY_GONE)
                    .await?;
                return Ok(());
            }
        };

        // Same cancellation protocol as a live search: snapshot the
        // generation before the call, discard the response if it moved.
        let generation = self.sessions.generation(user_id).await?;
        tracing::info!(user_id = %user_id, %id, city = criteria.city(), "replaying search");
        let outcome = self.provider.search(&criteria).await;

        if self.sessions.generation(user_id).await? != generation {
            tracing::debug!(user_id = %user_id, "replay cancelled, discarding provider response");
            return Ok(());
        }
        if self.sessions.get(user_id).await?.is_some() {
            // A new flow started while the provider was working; it wins.
            return Ok(());
        }

        let listings = match outcome {
            Err(err) => {
                tracing::warn!(user_id = %user_id, %err, "replay search failed");
                self.channel
                    .send_text(user_id, &format!("Error: {err}\nSend a new command"))
                    .await?;
                self.channel.send_text(user_id, render::help_text()).await?;
                return Ok(());
            }
            Ok(listings) => listings,
        };

        // Replayed results are always shown cheapest first; the original
        // command kind and any price ceiling are not part of the record.
        let ranked = rank(listings, CommandKind::LowPrice, None);
        if ranked.is_empty() {
            self.channel
                .send_text(user_id, render::MSG_NOTHING_FOUND)
                .await?;
            return Ok(());
        }

        let cursor = ResultCursor::new(ranked, CommandKind::LowPrice, None);
        let session = Session::delivering(user_id, CommandKind::LowPrice, cursor);
        self.sessions.put(session).await?;
        self.deliverer.deliver_next(user_id).await
    }
}
