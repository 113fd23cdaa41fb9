//! Release update notifier
//!
//! Polls the latest GitHub release of every tracked repository, compares it
//! with the last version seen, and posts the changes to a Discord webhook.
//!
//! # Modules
//!
//! - [`app`]: one complete run, wiring the pieces below
//! - [`config`]: settings from flags and environment
//! - [`logging`]: tracing subscriber setup
//! - [`notify`]: message batching and the Discord channel
//! - [`services`]: tracked repository list
//! - [`version`]: release lookup, version store and update detection

pub mod app;
pub mod config;
pub mod logging;
pub mod notify;
pub mod services;
pub mod version;
