//! Console entry point: wires the engine to the in-memory stores, the
//! RapidAPI provider, and a stdin/stdout channel.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use stayfinder::adapters::console::ConsoleChannel;
use stayfinder::adapters::memory::{InMemoryHistoryStore, InMemorySessionStore};
use stayfinder::adapters::rapidapi::{RapidApiConfig, RapidApiProvider};
use stayfinder::application::{ConversationEngine, EngineOptions};
use stayfinder::config::AppConfig;
use stayfinder::domain::foundation::UserId;

/// The console is single-user.
const CONSOLE_USER: UserId = UserId::new(0);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let provider_config = RapidApiConfig::new(config.provider.api_key.clone())
        .with_base_url(config.provider.base_url.clone())
        .with_page_count(config.provider.page_count)
        .with_timeout(config.provider.timeout());

    let channel = Arc::new(ConsoleChannel::new());
    let engine = ConversationEngine::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(InMemoryHistoryStore::new()),
        Arc::new(RapidApiProvider::new(provider_config)),
        channel.clone(),
        EngineOptions {
            date_grace_days: config.flow.date_grace_days,
            history_limit: config.flow.history_limit,
        },
    );

    tracing::info!("stayfinder ready, type /help to begin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let event = channel.classify(CONSOLE_USER, &line);
        if let Err(err) = engine.handle_event(event).await {
            tracing::error!(%err, "failed to handle input");
        }
    }

    Ok(())
}
