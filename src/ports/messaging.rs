//! Messaging Channel port: inbound input events and outbound sends.
//!
//! The transport (chat platform, console, test double) implements
//! [`MessagingChannel`] and translates its native updates into
//! [`InputEvent`]s. The engine never sees transport details; calendar
//! widgets, keyboards, and media rendering are the channel's concern.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::UserId;
use crate::domain::search::CommandKind;

/// A discrete user input delivered by the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub user_id: UserId,
    pub kind: InputKind,
}

impl InputEvent {
    pub fn text(user_id: UserId, text: impl Into<String>) -> Self {
        Self {
            user_id,
            kind: InputKind::Text(text.into()),
        }
    }

    pub fn selection(user_id: UserId, payload: impl Into<String>) -> Self {
        Self {
            user_id,
            kind: InputKind::Selection(payload.into()),
        }
    }

    pub fn command(user_id: UserId, command: BotCommand) -> Self {
        Self {
            user_id,
            kind: InputKind::Command(command),
        }
    }
}

/// The three input shapes the engine distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// Free text typed by the user.
    Text(String),
    /// Payload of a button/calendar selection.
    Selection(String),
    /// A recognized slash command.
    Command(BotCommand),
}

/// The user-visible command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    LowPrice,
    HighPrice,
    BestDeals,
    History,
    Custom,
    Cancel,
}

impl BotCommand {
    /// Parses a slash command, e.g. `/lowprice`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "/start" => Some(BotCommand::Start),
            "/help" => Some(BotCommand::Help),
            "/lowprice" => Some(BotCommand::LowPrice),
            "/highprice" => Some(BotCommand::HighPrice),
            "/bestdeals" => Some(BotCommand::BestDeals),
            "/history" => Some(BotCommand::History),
            "/custom" => Some(BotCommand::Custom),
            "/cancel" => Some(BotCommand::Cancel),
            _ => None,
        }
    }

    /// The search mode this command starts, if it starts one.
    pub fn search_kind(&self) -> Option<CommandKind> {
        match self {
            BotCommand::LowPrice => Some(CommandKind::LowPrice),
            BotCommand::HighPrice => Some(CommandKind::HighPrice),
            BotCommand::BestDeals => Some(CommandKind::BestDeals),
            BotCommand::Custom => Some(CommandKind::Custom),
            _ => None,
        }
    }
}

/// One listing rendered as a media-plus-description unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// At most the first three photo links of the listing.
    pub image_links: Vec<String>,
    pub caption: String,
}

/// A selectable option attached to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOption {
    /// Text shown on the button.
    pub label: String,
    /// Payload delivered back as [`InputKind::Selection`].
    pub payload: String,
}

impl PromptOption {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

/// Errors surfaced by the channel on outbound sends.
#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    #[error("failed to send message: {0}")]
    SendFailed(String),
}

/// Outbound side of the messaging transport.
#[async_trait]
pub trait MessagingChannel: Send + Sync {
    /// Sends a plain text message.
    async fn send_text(&self, user_id: UserId, text: &str) -> Result<(), ChannelError>;

    /// Sends a batch of media+description units, in order.
    async fn send_media_batch(
        &self,
        user_id: UserId,
        items: Vec<MediaItem>,
    ) -> Result<(), ChannelError>;

    /// Sends a prompt, optionally with selectable options.
    ///
    /// An empty `options` list tells the channel to render its own input
    /// aid for the prompt (e.g. a calendar for date prompts).
    async fn send_prompt(
        &self,
        user_id: UserId,
        text: &str,
        options: Vec<PromptOption>,
    ) -> Result<(), ChannelError>;
}
