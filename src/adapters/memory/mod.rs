//! In-memory adapters for the store ports.
//!
//! Process-local and lock-based; suitable for a single-instance
//! deployment and for tests. Guards are never held across await points.

mod history_store;
mod session_store;

pub use history_store::InMemoryHistoryStore;
pub use session_store::InMemorySessionStore;
