//! Console messaging channel, for local single-user runs.
//!
//! Outbound messages go to stdout. Inbound lines are classified against
//! the most recent prompt: a line matching an offered option's payload
//! or label becomes a selection, a date literal answers a calendar
//! prompt, slash commands parse as commands, and everything else is
//! free text.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::foundation::UserId;
use crate::ports::{
    BotCommand, ChannelError, InputEvent, MediaItem, MessagingChannel, PromptOption,
};

#[derive(Debug, Default)]
struct PromptState {
    options: Vec<PromptOption>,
    /// The last prompt carried no options, i.e. asked for a widget
    /// input (calendar). Date literals then count as selections.
    widget: bool,
}

/// Messaging channel backed by stdin/stdout.
#[derive(Debug, Default)]
pub struct ConsoleChannel {
    prompt: Mutex<PromptState>,
}

impl ConsoleChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies one input line into an [`InputEvent`].
    pub fn classify(&self, user_id: UserId, line: &str) -> InputEvent {
        let trimmed = line.trim();
        if let Some(command) = BotCommand::parse(trimmed) {
            return InputEvent::command(user_id, command);
        }
        if let Ok(state) = self.prompt.lock() {
            if let Some(option) = state
                .options
                .iter()
                .find(|option| option.payload == trimmed || option.label == trimmed)
            {
                return InputEvent::selection(user_id, option.payload.clone());
            }
            if state.widget && NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok() {
                return InputEvent::selection(user_id, trimmed);
            }
        }
        InputEvent::text(user_id, trimmed)
    }

    fn remember_prompt(&self, options: &[PromptOption]) -> Result<(), ChannelError> {
        let mut state = self
            .prompt
            .lock()
            .map_err(|_| ChannelError::SendFailed("console state lock poisoned".to_string()))?;
        state.widget = options.is_empty();
        state.options = options.to_vec();
        Ok(())
    }
}

#[async_trait]
impl MessagingChannel for ConsoleChannel {
    async fn send_text(&self, _user_id: UserId, text: &str) -> Result<(), ChannelError> {
        println!("{text}");
        Ok(())
    }

    async fn send_media_batch(
        &self,
        _user_id: UserId,
        items: Vec<MediaItem>,
    ) -> Result<(), ChannelError> {
        for item in items {
            println!("{}", item.caption);
            for link in &item.image_links {
                println!("  photo: {link}");
            }
            println!();
        }
        Ok(())
    }

    async fn send_prompt(
        &self,
        _user_id: UserId,
        text: &str,
        options: Vec<PromptOption>,
    ) -> Result<(), ChannelError> {
        self.remember_prompt(&options)?;
        println!("{text}");
        if options.is_empty() {
            println!("  (enter a date as YYYY-MM-DD)");
        } else {
            for option in &options {
                println!("  [{}]", option.label);
            }
        }
        Ok(())
    }
}
