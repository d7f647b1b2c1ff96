//! The conversation engine.
//!
//! One entry point, [`ConversationEngine::handle_event`], routes every
//! input event by its kind and the user's current flow state. All side
//! effects go through the ports; the engine itself holds no locks, so
//! a `/cancel` can land while a provider call is in flight.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::history::HistoryRecord;
use crate::domain::search::{rank, CommandKind, Currency, ResultCursor};
use crate::domain::session::{FlowState, Session};
use crate::domain::validation::{validate_field, DateContext, FieldKind, FieldValue};
use crate::ports::{
    BotCommand, HistoryStore, InputEvent, InputKind, MessagingChannel, PromptOption,
    SearchProvider, SessionStore, DEFAULT_HISTORY_LIMIT,
};

use super::render;
use super::{Deliverer, EngineError, HistoryReplay};

/// Engine tunables, filled from configuration.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Days in the past a check-in may still start.
    pub date_grace_days: u64,
    /// History entries offered by `/history`.
    pub history_limit: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            date_grace_days: 1,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Drives one conversation step per inbound event.
pub struct ConversationEngine {
    sessions: Arc<dyn SessionStore>,
    history: Arc<dyn HistoryStore>,
    provider: Arc<dyn SearchProvider>,
    channel: Arc<dyn MessagingChannel>,
    deliverer: Deliverer,
    replay: HistoryReplay,
    options: EngineOptions,
}

impl ConversationEngine {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        history: Arc<dyn HistoryStore>,
        provider: Arc<dyn SearchProvider>,
        channel: Arc<dyn MessagingChannel>,
        options: EngineOptions,
    ) -> Self {
        let deliverer = Deliverer::new(Arc::clone(&sessions), Arc::clone(&channel));
        let replay = HistoryReplay::new(
            Arc::clone(&sessions),
            Arc::clone(&history),
            Arc::clone(&provider),
            Arc::clone(&channel),
            deliverer.clone(),
        );
        Self {
            sessions,
            history,
            provider,
            channel,
            deliverer,
            replay,
            options,
        }
    }

    /// Handles one inbound event to completion, including any provider
    /// call it triggers.
    pub async fn handle_event(&self, event: InputEvent) -> Result<(), EngineError> {
        match event.kind {
            InputKind::Command(command) => self.handle_command(event.user_id, command).await,
            InputKind::Text(text) => self.handle_text(event.user_id, &text).await,
            InputKind::Selection(payload) => self.handle_selection(event.user_id, &payload).await,
        }
    }

    async fn handle_command(
        &self,
        user_id: UserId,
        command: BotCommand,
    ) -> Result<(), EngineError> {
        tracing::info!(user_id = %user_id, ?command, "handling command");
        if let Some(kind) = command.search_kind() {
            return self.start_flow(user_id, kind).await;
        }
        match command {
            BotCommand::Start => {
                self.channel
                    .send_text(user_id, render::MSG_GREETING)
                    .await?;
            }
            BotCommand::Help => {
                self.channel.send_text(user_id, render::help_text()).await?;
            }
            BotCommand::Cancel => {
                // Always bumps the generation, so an in-flight search for
                // this user gets discarded on arrival.
                self.sessions.clear(user_id).await?;
                self.channel
                    .send_text(user_id, render::MSG_CANCELLED)
                    .await?;
                self.channel.send_text(user_id, render::help_text()).await?;
            }
            BotCommand::History => {
                self.show_history(user_id).await?;
            }
            // Search commands were dispatched above.
            BotCommand::LowPrice
            | BotCommand::HighPrice
            | BotCommand::BestDeals
            | BotCommand::Custom => {}
        }
        Ok(())
    }

    async fn start_flow(&self, user_id: UserId, kind: CommandKind) -> Result<(), EngineError> {
        if self.sessions.get(user_id).await?.is_some() {
            self.channel
                .send_text(user_id, render::MSG_FLOW_IN_PROGRESS)
                .await?;
            return Ok(());
        }
        let session = Session::new(user_id, kind);
        self.sessions.put(session).await?;
        self.prompt_for(user_id, FlowState::AwaitingCity).await
    }

    async fn show_history(&self, user_id: UserId) -> Result<(), EngineError> {
        if self.sessions.get(user_id).await?.is_some() {
            self.channel
                .send_text(user_id, render::MSG_FLOW_IN_PROGRESS)
                .await?;
            return Ok(());
        }
        let records = self
            .history
            .query_recent(user_id, self.options.history_limit)
            .await?;
        if records.is_empty() {
            self.channel
                .send_text(user_id, render::MSG_NO_HISTORY)
                .await?;
            return Ok(());
        }
        let options = records
            .iter()
            .map(|record| {
                PromptOption::new(
                    render::history_label(record),
                    format!("{}{}", render::PAYLOAD_HISTORY_PREFIX, record.id),
                )
            })
            .collect();
        self.channel
            .send_prompt(user_id, &render::history_text(&records), options)
            .await?;
        Ok(())
    }

    async fn handle_text(&self, user_id: UserId, text: &str) -> Result<(), EngineError> {
        let Some(session) = self.sessions.get(user_id).await? else {
            self.channel
                .send_text(user_id, render::MSG_NO_ACTIVE_FLOW)
                .await?;
            return Ok(());
        };
        if let Some(field) = session.state().expected_field() {
            // Calendar and currency input arrive as selections only.
            return match field {
                FieldKind::EnterDate | FieldKind::ExitDate => {
                    self.channel.send_text(user_id, render::MSG_PICK_DATE).await?;
                    Ok(())
                }
                FieldKind::Currency => {
                    self.channel
                        .send_text(user_id, render::MSG_CHOOSE_CURRENCY)
                        .await?;
                    Ok(())
                }
                _ => self.collect_field(session, field, text).await,
            };
        }
        match session.state() {
            FlowState::AwaitingConfirm if text.trim() == render::CONFIRM_TEXT => {
                self.run_search(session).await
            }
            _ => {
                self.channel
                    .send_text(user_id, render::MSG_WRONG_STATE)
                    .await?;
                Ok(())
            }
        }
    }

    async fn handle_selection(&self, user_id: UserId, payload: &str) -> Result<(), EngineError> {
        if let Some(raw_id) = payload.strip_prefix(render::PAYLOAD_HISTORY_PREFIX) {
            return self.replay.replay(user_id, raw_id).await;
        }
        let Some(session) = self.sessions.get(user_id).await? else {
            self.channel
                .send_text(user_id, render::MSG_NO_ACTIVE_FLOW)
                .await?;
            return Ok(());
        };
        match session.state() {
            state
                if matches!(
                    state.expected_field(),
                    Some(FieldKind::EnterDate | FieldKind::ExitDate | FieldKind::Currency)
                ) =>
            {
                // expected_field is Some by the guard above.
                let field = match state.expected_field() {
                    Some(field) => field,
                    None => return Ok(()),
                };
                self.collect_field(session, field, payload).await
            }
            FlowState::AwaitingConfirm if payload == render::CONFIRM_TEXT => {
                self.run_search(session).await
            }
            FlowState::Delivering if payload == render::PAYLOAD_MORE_RESULTS => {
                self.deliverer.deliver_next(user_id).await
            }
            _ => {
                self.channel
                    .send_text(user_id, render::MSG_WRONG_STATE)
                    .await?;
                Ok(())
            }
        }
    }

    /// Validates one field, merges it into the draft, and advances.
    ///
    /// On rejection the state stays put and the error message doubles as
    /// the re-prompt.
    async fn collect_field(
        &self,
        mut session: Session,
        field: FieldKind,
        raw: &str,
    ) -> Result<(), EngineError> {
        let user_id = session.user_id();
        let ctx = DateContext {
            today: Utc::now().date_naive(),
            grace_days: self.options.date_grace_days,
            enter_date: session.draft().enter_date,
        };
        match validate_field(field, raw, &ctx) {
            Err(err) => {
                tracing::debug!(user_id = %user_id, ?field, %err, "rejected input");
                self.channel.send_text(user_id, &err.to_string()).await?;
            }
            Ok(value) => {
                apply_field(&mut session, field, value);
                let next = session.advance()?;
                self.sessions.put(session).await?;
                self.prompt_for(user_id, next).await?;
            }
        }
        Ok(())
    }

    async fn prompt_for(&self, user_id: UserId, state: FlowState) -> Result<(), EngineError> {
        match state {
            FlowState::AwaitingCity => {
                self.channel.send_text(user_id, render::PROMPT_CITY).await?;
            }
            FlowState::AwaitingEnterDate => {
                self.channel
                    .send_prompt(user_id, render::PROMPT_ENTER_DATE, vec![])
                    .await?;
            }
            FlowState::AwaitingExitDate => {
                self.channel
                    .send_prompt(user_id, render::PROMPT_EXIT_DATE, vec![])
                    .await?;
            }
            FlowState::AwaitingAdults => {
                self.channel
                    .send_text(user_id, render::PROMPT_ADULTS)
                    .await?;
            }
            FlowState::AwaitingChildren => {
                self.channel
                    .send_text(user_id, render::PROMPT_CHILDREN)
                    .await?;
            }
            FlowState::AwaitingInfants => {
                self.channel
                    .send_text(user_id, render::PROMPT_INFANTS)
                    .await?;
            }
            FlowState::AwaitingPets => {
                self.channel.send_text(user_id, render::PROMPT_PETS).await?;
            }
            FlowState::AwaitingCurrency => {
                let options = Currency::ALL
                    .iter()
                    .map(|currency| PromptOption::new(currency.as_str(), currency.as_str()))
                    .collect();
                self.channel
                    .send_prompt(user_id, render::PROMPT_CURRENCY, options)
                    .await?;
            }
            FlowState::AwaitingMaxPrice => {
                self.channel
                    .send_text(user_id, render::PROMPT_MAX_PRICE)
                    .await?;
            }
            FlowState::AwaitingConfirm => {
                self.channel
                    .send_prompt(
                        user_id,
                        render::PROMPT_CONFIRM,
                        vec![PromptOption::new(render::CONFIRM_TEXT, render::CONFIRM_TEXT)],
                    )
                    .await?;
            }
            FlowState::Idle | FlowState::Searching | FlowState::Delivering => {}
        }
        Ok(())
    }

    /// Finalizes the draft, records it to history, and runs the search.
    ///
    /// The generation counter is snapshotted before the provider call and
    /// re-checked when the response arrives, so a `/cancel` issued in the
    /// meantime wins and the response is discarded.
    async fn run_search(&self, mut session: Session) -> Result<(), EngineError> {
        let user_id = session.user_id();
        let kind = session.command_kind();
        let criteria = match session.draft().complete(kind) {
            Ok(criteria) => criteria,
            Err(err) => {
                tracing::error!(user_id = %user_id, %err, "confirmed draft was incomplete");
                self.sessions.clear(user_id).await?;
                self.channel
                    .send_text(user_id, &format!("Error: {err}"))
                    .await?;
                self.channel.send_text(user_id, render::help_text()).await?;
                return Ok(());
            }
        };

        let record = HistoryRecord::from_criteria(user_id, &criteria, Timestamp::now());
        self.history.save(&record).await?;

        session.advance_to(FlowState::Searching)?;
        self.sessions.put(session).await?;
        let generation = self.sessions.generation(user_id).await?;

        tracing::info!(user_id = %user_id, city = criteria.city(), ?kind, "searching");
        let outcome = self.provider.search(&criteria).await;
        self.apply_search_outcome(user_id, generation, kind, criteria.max_price(), outcome)
            .await
    }

    async fn apply_search_outcome(
        &self,
        user_id: UserId,
        generation: u64,
        kind: CommandKind,
        max_price: Option<u32>,
        outcome: Result<Vec<crate::domain::search::Listing>, crate::ports::ProviderError>,
    ) -> Result<(), EngineError> {
        if self.sessions.generation(user_id).await? != generation {
            tracing::debug!(user_id = %user_id, "flow cancelled, discarding provider response");
            return Ok(());
        }
        let Some(mut session) = self.sessions.get(user_id).await? else {
            return Ok(());
        };
        if session.state() != FlowState::Searching {
            return Ok(());
        }

        let listings = match outcome {
            Err(err) => {
                tracing::warn!(user_id = %user_id, %err, "provider search failed");
                self.sessions.clear(user_id).await?;
                self.channel
                    .send_text(user_id, &format!("Error: {err}\nSend a new command"))
                    .await?;
                self.channel.send_text(user_id, render::help_text()).await?;
                return Ok(());
            }
            Ok(listings) => listings,
        };

        let ranked = rank(listings, kind, max_price);
        if ranked.is_empty() {
            self.sessions.clear(user_id).await?;
            self.channel
                .send_text(user_id, render::MSG_NOTHING_FOUND)
                .await?;
            return Ok(());
        }

        session.store_cursor(ResultCursor::new(ranked, kind, max_price));
        session.advance_to(FlowState::Delivering)?;
        self.sessions.put(session).await?;
        self.deliverer.deliver_next(user_id).await
    }
}

/// Merges a validated value into the session draft.
fn apply_field(session: &mut Session, field: FieldKind, value: FieldValue) {
    let draft = session.draft_mut();
    match (field, value) {
        (FieldKind::City, FieldValue::City(city)) => draft.city = Some(city),
        (FieldKind::EnterDate, FieldValue::Date(date)) => draft.enter_date = Some(date),
        (FieldKind::ExitDate, FieldValue::Date(date)) => draft.exit_date = Some(date),
        (FieldKind::Adults, FieldValue::Count(count)) => draft.adult_count = Some(count),
        (FieldKind::Children, FieldValue::Count(count)) => draft.child_count = Some(count),
        (FieldKind::Infants, FieldValue::Count(count)) => draft.infant_count = Some(count),
        (FieldKind::Pets, FieldValue::Count(count)) => draft.pet_count = Some(count),
        (FieldKind::Currency, FieldValue::Currency(currency)) => draft.currency = Some(currency),
        (FieldKind::MaxPrice, FieldValue::Count(count)) => draft.max_price = Some(count),
        // Validators only produce the matching value shape.
        _ => {}
    }
}
