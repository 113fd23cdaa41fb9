//! Outbound notification channel

#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Per-message field cap of the receiving side (Discord embeds allow 25)
pub const MAX_FIELDS: usize = 25;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Webhook rejected message: {status} {body}")]
    Rejected { status: u16, body: String },

    #[error("Too many fields: {0} (max {max})", max = MAX_FIELDS)]
    TooManyFields(usize),
}

/// One name/value pair of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
}

/// A single outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub fields: Vec<Field>,
    /// Mention directive placed before the message body, e.g. `<@&123>`
    pub mention: Option<String>,
}

/// Trait for delivering messages to a chat receiver
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Deliver one message. Fails with `TooManyFields` above [`MAX_FIELDS`].
    async fn send(&self, message: &Message) -> Result<(), NotifyError>;
}
