//! Stayfinder: a conversational lodging-search assistant.
//!
//! A multi-step conversation collects trip criteria (city, dates,
//! travellers, optionally currency and a price ceiling), runs a search
//! against an external provider, and delivers ranked results in small
//! batches with a "show more" continuation. Completed searches are
//! recorded and can be replayed from history.
//!
//! # Architecture
//!
//! - [`domain`]: pure types and rules, no I/O
//! - [`ports`]: async traits the engine depends on
//! - [`application`]: the conversation engine and its services
//! - [`adapters`]: in-memory stores, the RapidAPI provider, a console
//!   channel
//! - [`config`]: environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
