//! End-to-end conversation tests against in-memory adapters and test
//! doubles for the channel and the provider.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Days, Utc};
use tokio::sync::Notify;

use stayfinder::adapters::memory::{InMemoryHistoryStore, InMemorySessionStore};
use stayfinder::application::{render, ConversationEngine, EngineOptions};
use stayfinder::domain::foundation::UserId;
use stayfinder::domain::search::{Listing, Price};
use stayfinder::domain::session::FlowState;
use stayfinder::ports::{
    BotCommand, ChannelError, HistoryStore, InputEvent, MediaItem, MessagingChannel, PromptOption,
    ProviderError, SearchProvider, SessionStore,
};

// ----- Test doubles -----

#[derive(Debug, Clone, PartialEq)]
enum Sent {
    Text(String),
    Media(Vec<String>),
    Prompt(String, Vec<String>),
}

#[derive(Debug, Default)]
struct RecordingChannel {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingChannel {
    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    fn media_batches(&self) -> Vec<Vec<String>> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Media(captions) => Some(captions),
                _ => None,
            })
            .collect()
    }

    fn prompts(&self) -> Vec<(String, Vec<String>)> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Prompt(text, payloads) => Some((text, payloads)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl MessagingChannel for RecordingChannel {
    async fn send_text(&self, _user_id: UserId, text: &str) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(Sent::Text(text.to_string()));
        Ok(())
    }

    async fn send_media_batch(
        &self,
        _user_id: UserId,
        items: Vec<MediaItem>,
    ) -> Result<(), ChannelError> {
        let captions = items.into_iter().map(|item| item.caption).collect();
        self.sent.lock().unwrap().push(Sent::Media(captions));
        Ok(())
    }

    async fn send_prompt(
        &self,
        _user_id: UserId,
        text: &str,
        options: Vec<PromptOption>,
    ) -> Result<(), ChannelError> {
        let payloads = options.into_iter().map(|option| option.payload).collect();
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Prompt(text.to_string(), payloads));
        Ok(())
    }
}

struct FixedProvider {
    listings: Vec<Listing>,
}

#[async_trait]
impl SearchProvider for FixedProvider {
    async fn search(
        &self,
        _criteria: &stayfinder::domain::search::SearchCriteria,
    ) -> Result<Vec<Listing>, ProviderError> {
        Ok(self.listings.clone())
    }
}

/// Provider that blocks until the test releases it, so a cancel can be
/// issued while the search is in flight.
struct BlockingProvider {
    listings: Vec<Listing>,
    started: Notify,
    release: Notify,
}

impl BlockingProvider {
    fn new(listings: Vec<Listing>) -> Self {
        Self {
            listings,
            started: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl SearchProvider for BlockingProvider {
    async fn search(
        &self,
        _criteria: &stayfinder::domain::search::SearchCriteria,
    ) -> Result<Vec<Listing>, ProviderError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(self.listings.clone())
    }
}

fn listing(name: &str, price: f64, rating: Option<f64>) -> Listing {
    Listing {
        name: name.to_string(),
        bed_count: 2,
        address: "Somewhere 1".to_string(),
        price: Price::new(price, "USD"),
        rating,
        image_links: vec![format!("https://img/{name}.jpg")],
        detail_link: format!("https://example.com/{name}"),
    }
}

fn priced(prices: &[f64]) -> Vec<Listing> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| listing(&format!("stay-{i}"), price, Some(4.0)))
        .collect()
}

// ----- Harness -----

struct Harness {
    engine: Arc<ConversationEngine>,
    sessions: Arc<InMemorySessionStore>,
    history: Arc<InMemoryHistoryStore>,
    channel: Arc<RecordingChannel>,
}

fn harness(provider: Arc<dyn SearchProvider>) -> Harness {
    let sessions = Arc::new(InMemorySessionStore::new());
    let history = Arc::new(InMemoryHistoryStore::new());
    let channel = Arc::new(RecordingChannel::default());
    let engine = Arc::new(ConversationEngine::new(
        sessions.clone(),
        history.clone(),
        provider,
        channel.clone(),
        EngineOptions::default(),
    ));
    Harness {
        engine,
        sessions,
        history,
        channel,
    }
}

impl Harness {
    async fn cmd(&self, user: UserId, command: BotCommand) {
        self.engine
            .handle_event(InputEvent::command(user, command))
            .await
            .unwrap();
    }

    async fn text(&self, user: UserId, text: &str) {
        self.engine
            .handle_event(InputEvent::text(user, text))
            .await
            .unwrap();
    }

    async fn sel(&self, user: UserId, payload: impl Into<String>) {
        self.engine
            .handle_event(InputEvent::selection(user, payload.into()))
            .await
            .unwrap();
    }

    /// Walks a simple (non-custom) flow up to the confirmation prompt.
    async fn collect_simple(&self, user: UserId, command: BotCommand, city: &str) {
        let enter = Utc::now().date_naive() + Days::new(10);
        let exit = enter + Days::new(2);
        self.cmd(user, command).await;
        self.text(user, city).await;
        self.sel(user, enter.to_string()).await;
        self.sel(user, exit.to_string()).await;
        self.text(user, "2").await;
    }

    async fn confirm(&self, user: UserId) {
        self.sel(user, render::CONFIRM_TEXT).await;
    }
}

// ----- Tests -----

#[tokio::test]
async fn lowprice_flow_delivers_cheapest_first() {
    let h = harness(Arc::new(FixedProvider {
        listings: priced(&[300.0, 100.0, 500.0, 200.0, 400.0]),
    }));
    let user = UserId::new(1);

    h.collect_simple(user, BotCommand::LowPrice, "Berlin").await;
    h.confirm(user).await;

    let batches = h.channel.media_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 3);
    assert!(batches[0][0].contains("Price: 100"));
    assert!(batches[0][1].contains("Price: 200"));
    assert!(batches[0][2].contains("Price: 300"));

    // 5 results, 3 delivered, 2 remaining.
    let continuation = h
        .channel
        .prompts()
        .into_iter()
        .find(|(_, payloads)| payloads.contains(&render::PAYLOAD_MORE_RESULTS.to_string()))
        .expect("continuation prompt");
    assert!(continuation.0.starts_with("2 more results"));
}

#[tokio::test]
async fn highprice_flow_delivers_most_expensive_first() {
    let h = harness(Arc::new(FixedProvider {
        listings: priced(&[300.0, 100.0, 500.0]),
    }));
    let user = UserId::new(1);

    h.collect_simple(user, BotCommand::HighPrice, "Berlin").await;
    h.confirm(user).await;

    let batches = h.channel.media_batches();
    assert!(batches[0][0].contains("Price: 500"));
    assert!(batches[0][2].contains("Price: 100"));
}

#[tokio::test]
async fn seven_results_paginate_three_three_one() {
    let h = harness(Arc::new(FixedProvider {
        listings: priced(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0]),
    }));
    let user = UserId::new(1);

    h.collect_simple(user, BotCommand::LowPrice, "Oslo").await;
    h.confirm(user).await;
    h.sel(user, render::PAYLOAD_MORE_RESULTS).await;
    h.sel(user, render::PAYLOAD_MORE_RESULTS).await;

    let batches = h.channel.media_batches();
    assert_eq!(
        batches.iter().map(Vec::len).collect::<Vec<_>>(),
        vec![3, 3, 1]
    );
    assert!(batches[2][0].contains("Price: 70"));

    // Exhaustion ends the flow and clears the session.
    assert!(h.channel.texts().contains(&render::MSG_END_OF_LIST.to_string()));
    assert!(h.sessions.get(user).await.unwrap().is_none());
}

#[tokio::test]
async fn cancel_during_search_discards_the_response() {
    let provider = Arc::new(BlockingProvider::new(priced(&[100.0, 200.0])));
    let h = harness(provider.clone());
    let user = UserId::new(1);

    h.collect_simple(user, BotCommand::LowPrice, "Rome").await;

    let engine = h.engine.clone();
    let confirm = tokio::spawn(async move {
        engine
            .handle_event(InputEvent::selection(user, render::CONFIRM_TEXT))
            .await
            .unwrap();
    });

    provider.started.notified().await;
    h.cmd(user, BotCommand::Cancel).await;
    provider.release.notify_one();
    confirm.await.unwrap();

    // The stale response must never reach the user.
    assert!(h.channel.media_batches().is_empty());
    assert!(h.channel.texts().contains(&render::MSG_CANCELLED.to_string()));
    assert!(h.sessions.get(user).await.unwrap().is_none());
}

#[tokio::test]
async fn sessions_are_isolated_between_users() {
    let h = harness(Arc::new(FixedProvider { listings: vec![] }));
    let alice = UserId::new(1);
    let bob = UserId::new(2);

    h.cmd(alice, BotCommand::LowPrice).await;
    h.text(alice, "Lisbon").await;
    h.cmd(bob, BotCommand::Custom).await;

    let alice_session = h.sessions.get(alice).await.unwrap().unwrap();
    let bob_session = h.sessions.get(bob).await.unwrap().unwrap();
    assert_eq!(alice_session.state(), FlowState::AwaitingEnterDate);
    assert_eq!(alice_session.draft().city.as_deref(), Some("Lisbon"));
    assert_eq!(bob_session.state(), FlowState::AwaitingCity);
    assert_eq!(bob_session.draft().city, None);
}

#[tokio::test]
async fn invalid_input_reprompts_without_advancing() {
    let h = harness(Arc::new(FixedProvider { listings: vec![] }));
    let user = UserId::new(1);

    h.cmd(user, BotCommand::LowPrice).await;
    h.text(user, "Berlin").await;
    let enter = Utc::now().date_naive() + Days::new(5);
    h.sel(user, enter.to_string()).await;
    h.sel(user, (enter + Days::new(2)).to_string()).await;

    h.text(user, "0").await;
    let session = h.sessions.get(user).await.unwrap().unwrap();
    assert_eq!(session.state(), FlowState::AwaitingAdults);
    assert!(h
        .channel
        .texts()
        .iter()
        .any(|text| text.contains("at least 1")));

    h.text(user, "2").await;
    let session = h.sessions.get(user).await.unwrap().unwrap();
    assert_eq!(session.state(), FlowState::AwaitingConfirm);
}

#[tokio::test]
async fn custom_flow_filters_by_price_ceiling() {
    let h = harness(Arc::new(FixedProvider {
        listings: priced(&[80.0, 150.0, 200.0, 120.0]),
    }));
    let user = UserId::new(1);
    let enter = Utc::now().date_naive() + Days::new(10);

    h.cmd(user, BotCommand::Custom).await;
    h.text(user, "Madrid").await;
    h.sel(user, enter.to_string()).await;
    h.sel(user, (enter + Days::new(3)).to_string()).await;
    h.text(user, "2").await; // adults
    h.text(user, "1").await; // children
    h.text(user, "0").await; // infants
    h.text(user, "0").await; // pets
    h.sel(user, "USD").await;
    h.text(user, "150").await; // price ceiling, inclusive
    h.confirm(user).await;

    // The ceiling is inclusive and the provider order is preserved.
    let batches = h.channel.media_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 3);
    assert!(batches[0][0].contains("Price: 80"));
    assert!(batches[0][1].contains("Price: 150"));
    assert!(batches[0][2].contains("Price: 120"));
}

#[tokio::test]
async fn empty_results_end_the_flow() {
    let h = harness(Arc::new(FixedProvider { listings: vec![] }));
    let user = UserId::new(1);

    h.collect_simple(user, BotCommand::BestDeals, "Nowhere").await;
    h.confirm(user).await;

    assert!(h
        .channel
        .texts()
        .contains(&render::MSG_NOTHING_FOUND.to_string()));
    assert!(h.sessions.get(user).await.unwrap().is_none());
}

#[tokio::test]
async fn history_records_and_replays_a_search() {
    let h = harness(Arc::new(FixedProvider {
        listings: priced(&[200.0, 100.0]),
    }));
    let user = UserId::new(1);

    h.collect_simple(user, BotCommand::HighPrice, "Paris").await;
    h.confirm(user).await;
    // Two results fit one batch, so the flow already ended.
    assert!(h.sessions.get(user).await.unwrap().is_none());

    let records = h.history.query_recent(user, 10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].city, "Paris");

    h.cmd(user, BotCommand::History).await;
    let history_prompt = h.channel.prompts().pop().expect("history prompt");
    let payload = history_prompt.1[0].clone();
    assert!(payload.starts_with(render::PAYLOAD_HISTORY_PREFIX));

    h.sel(user, payload).await;

    // The replay delivers again, cheapest first, without a new record.
    let batches = h.channel.media_batches();
    assert_eq!(batches.len(), 2);
    assert!(batches[1][0].contains("Price: 100"));
    assert!(batches[1][1].contains("Price: 200"));
    assert_eq!(h.history.query_recent(user, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn replay_is_refused_mid_flow() {
    let h = harness(Arc::new(FixedProvider {
        listings: priced(&[100.0]),
    }));
    let user = UserId::new(1);

    h.collect_simple(user, BotCommand::LowPrice, "Kyiv").await;
    h.confirm(user).await;
    let record = h.history.query_recent(user, 10).await.unwrap().remove(0);

    h.cmd(user, BotCommand::Custom).await;
    h.sel(
        user,
        format!("{}{}", render::PAYLOAD_HISTORY_PREFIX, record.id),
    )
    .await;

    assert!(h
        .channel
        .texts()
        .contains(&render::MSG_FLOW_IN_PROGRESS.to_string()));
    // The mid-flow session is untouched.
    let session = h.sessions.get(user).await.unwrap().unwrap();
    assert_eq!(session.state(), FlowState::AwaitingCity);
}

#[tokio::test]
async fn second_search_command_is_refused_mid_flow() {
    let h = harness(Arc::new(FixedProvider { listings: vec![] }));
    let user = UserId::new(1);

    h.cmd(user, BotCommand::LowPrice).await;
    h.text(user, "Berlin").await;
    h.cmd(user, BotCommand::HighPrice).await;

    assert!(h
        .channel
        .texts()
        .contains(&render::MSG_FLOW_IN_PROGRESS.to_string()));
    let session = h.sessions.get(user).await.unwrap().unwrap();
    assert_eq!(session.draft().city.as_deref(), Some("Berlin"));
}

#[tokio::test]
async fn provider_error_message_reaches_the_user() {
    struct FailingProvider;

    #[async_trait]
    impl SearchProvider for FailingProvider {
        async fn search(
            &self,
            _criteria: &stayfinder::domain::search::SearchCriteria,
        ) -> Result<Vec<Listing>, ProviderError> {
            Err(ProviderError::api("location not found"))
        }
    }

    let h = harness(Arc::new(FailingProvider));
    let user = UserId::new(1);

    h.collect_simple(user, BotCommand::LowPrice, "Atlantis").await;
    h.confirm(user).await;

    assert!(h
        .channel
        .texts()
        .iter()
        .any(|text| text.contains("location not found")));
    assert!(h.sessions.get(user).await.unwrap().is_none());
}

#[tokio::test]
async fn free_text_without_a_flow_gets_a_hint() {
    let h = harness(Arc::new(FixedProvider { listings: vec![] }));
    let user = UserId::new(1);

    h.text(user, "hello?").await;
    assert_eq!(
        h.channel.texts(),
        vec![render::MSG_NO_ACTIVE_FLOW.to_string()]
    );
}
