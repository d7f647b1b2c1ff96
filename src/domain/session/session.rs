//! Session aggregate: one user's in-progress conversation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, StateMachine, Timestamp, UserId};
use crate::domain::search::{CommandKind, CriteriaDraft, ResultCursor};

use super::FlowState;

/// One user's active flow: current state, the accumulated criteria
/// draft, and, while delivering, the result cursor.
///
/// # Invariants
///
/// - At most one session exists per user at a time; creating a new one
///   replaces any prior session (and its cursor).
/// - `cursor` is only present in the `Delivering` state.
/// - State only changes along [`FlowState`]'s transition table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    user_id: UserId,
    command_kind: CommandKind,
    state: FlowState,
    draft: CriteriaDraft,
    cursor: Option<ResultCursor>,
    started_at: Timestamp,
}

impl Session {
    /// Starts a fresh flow for `kind`, waiting for the city.
    pub fn new(user_id: UserId, kind: CommandKind) -> Self {
        Self {
            user_id,
            command_kind: kind,
            state: FlowState::AwaitingCity,
            draft: CriteriaDraft::default(),
            cursor: None,
            started_at: Timestamp::now(),
        }
    }

    /// Starts a session already in delivery, carrying ranked results.
    ///
    /// Used by history replay, which skips collection and confirmation.
    pub fn delivering(user_id: UserId, kind: CommandKind, cursor: ResultCursor) -> Self {
        Self {
            user_id,
            command_kind: kind,
            state: FlowState::Delivering,
            draft: CriteriaDraft::default(),
            cursor: Some(cursor),
            started_at: Timestamp::now(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn command_kind(&self) -> CommandKind {
        self.command_kind
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn draft(&self) -> &CriteriaDraft {
        &self.draft
    }

    /// Mutable access to the draft; merges only, never resets.
    pub fn draft_mut(&mut self) -> &mut CriteriaDraft {
        &mut self.draft
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    /// Moves to the next collecting state on this session's path.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the current state is not a
    ///   non-terminal step of the collection path
    pub fn advance(&mut self) -> Result<FlowState, DomainError> {
        let next = self
            .state
            .next_on_path(self.command_kind)
            .ok_or_else(|| {
                DomainError::new(
                    crate::domain::foundation::ErrorCode::InvalidStateTransition,
                    format!("No collection step follows {:?}", self.state),
                )
            })?;
        self.state = self.state.transition_to(next)?;
        Ok(self.state)
    }

    /// Moves to an explicit target state, validated against the table.
    pub fn advance_to(&mut self, target: FlowState) -> Result<FlowState, DomainError> {
        self.state = self.state.transition_to(target)?;
        Ok(self.state)
    }

    /// Attaches a cursor for delivery.
    pub fn store_cursor(&mut self, cursor: ResultCursor) {
        self.cursor = Some(cursor);
    }

    /// Detaches the cursor, if any.
    pub fn take_cursor(&mut self) -> Option<ResultCursor> {
        self.cursor.take()
    }

    pub fn cursor(&self) -> Option<&ResultCursor> {
        self.cursor.as_ref()
    }
}
