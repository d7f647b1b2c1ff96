//! Ports: abstract interfaces to external collaborators.
//!
//! The conversation engine depends only on these traits; adapters
//! provide the concrete transport, storage, and provider integrations.

mod history_store;
mod messaging;
mod search_provider;
mod session_store;

pub use history_store::{HistoryStore, DEFAULT_HISTORY_LIMIT};
pub use messaging::{
    BotCommand, ChannelError, InputEvent, InputKind, MediaItem, MessagingChannel, PromptOption,
};
pub use search_provider::{ProviderError, SearchProvider};
pub use session_store::SessionStore;
