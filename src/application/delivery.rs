//! Paginated result delivery.
//!
//! Results are handed out in fixed-size batches from the session's
//! cursor. After a partial hand-out the user gets a continuation
//! prompt; after the last batch the flow ends and the session is
//! cleared.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::session::FlowState;
use crate::ports::{MessagingChannel, PromptOption, SessionStore};

use super::render;
use super::EngineError;

/// Listings sent per "show more" step.
pub const BATCH_SIZE: usize = 3;

/// Sends result batches and keeps the session's cursor in step.
#[derive(Clone)]
pub struct Deliverer {
    sessions: Arc<dyn SessionStore>,
    channel: Arc<dyn MessagingChannel>,
}

impl Deliverer {
    pub fn new(sessions: Arc<dyn SessionStore>, channel: Arc<dyn MessagingChannel>) -> Self {
        Self { sessions, channel }
    }

    /// Delivers the next batch from the user's cursor.
    ///
    /// On exhaustion sends the end-of-list notice and clears the
    /// session; otherwise stores the advanced cursor back and prompts
    /// with the remaining count and a continuation button.
    pub async fn deliver_next(&self, user_id: UserId) -> Result<(), EngineError> {
        let Some(mut session) = self.sessions.get(user_id).await? else {
            self.channel
                .send_text(user_id, render::MSG_NO_ACTIVE_FLOW)
                .await?;
            return Ok(());
        };
        if session.state() != FlowState::Delivering {
            self.channel
                .send_text(user_id, render::MSG_WRONG_STATE)
                .await?;
            return Ok(());
        }
        let Some(mut cursor) = session.take_cursor() else {
            // Delivering without a cursor means the session is corrupt.
            tracing::warn!(user_id = %user_id, "delivering session had no cursor");
            self.sessions.clear(user_id).await?;
            self.channel
                .send_text(user_id, render::MSG_END_OF_LIST)
                .await?;
            return Ok(());
        };

        let batch = cursor.next_batch(BATCH_SIZE);
        let items = batch.iter().map(render::media_item).collect();
        self.channel.send_media_batch(user_id, items).await?;

        if cursor.is_exhausted() {
            self.sessions.clear(user_id).await?;
            self.channel
                .send_text(user_id, render::MSG_END_OF_LIST)
                .await?;
        } else {
            let remaining = cursor.remaining();
            session.store_cursor(cursor);
            self.sessions.put(session).await?;
            self.channel
                .send_prompt(
                    user_id,
                    &render::more_results_text(remaining),
                    vec![PromptOption::new(
                        render::LABEL_SHOW_MORE,
                        render::PAYLOAD_MORE_RESULTS,
                    )],
                )
                .await?;
        }
        Ok(())
    }
}
