//! Adapters: concrete implementations of the ports.

pub mod console;
pub mod memory;
pub mod rapidapi;
