//! Per-user conversation session: flow states and the session aggregate.

mod session;
mod state;

pub use session::Session;
pub use state::{collection_path, FlowState};
