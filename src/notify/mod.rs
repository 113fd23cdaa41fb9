//! Notification layer
//!
//! - [`channel`]: Channel trait and message types
//! - [`composer`]: Splits update events into messages within the field cap
//! - [`discord`]: Discord webhook implementation of the channel

pub mod channel;
pub mod composer;
pub mod discord;
