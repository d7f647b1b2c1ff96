//! Domain layer: pure business types and rules, no I/O.

pub mod foundation;
pub mod history;
pub mod search;
pub mod session;
pub mod validation;
