//! Application layer: the conversation engine and its supporting
//! delivery, replay, and rendering services.

mod delivery;
mod engine;
pub mod render;
mod replay;

use thiserror::Error;

use crate::domain::foundation::DomainError;
use crate::ports::ChannelError;

pub use delivery::{Deliverer, BATCH_SIZE};
pub use engine::{ConversationEngine, EngineOptions};
pub use replay::HistoryReplay;

/// Failures the engine cannot handle by messaging the user.
///
/// Provider errors and validation rejections are absorbed into the
/// conversation (reported, re-prompted); only channel and store
/// breakage escapes to the caller.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Store(#[from] DomainError),
}
