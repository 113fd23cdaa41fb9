//! Discord webhook channel

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::notify::channel::{MAX_FIELDS, Message, NotificationChannel, NotifyError};

const EMBED_DESCRIPTION: &str = "### New updates\nThe following services have new updates:";
const EMBED_COLOR: u32 = 0x03b2f8;
const PROJECT_URL: &str = "https://github.com/gylfirst/UpdateNotifier";
const FOOTER_TEXT: &str = "by Matthieu Tourrette - Gylfirst";
const FOOTER_ICON_URL: &str = "https://avatars.githubusercontent.com/u/30391973?v=4";

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: String,
    embeds: [Embed<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Embed<'a> {
    title: &'a str,
    description: &'static str,
    url: &'static str,
    color: u32,
    fields: Vec<EmbedField<'a>>,
    footer: EmbedFooter,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct EmbedField<'a> {
    name: &'a str,
    value: &'a str,
    inline: bool,
}

#[derive(Debug, Serialize)]
struct EmbedFooter {
    text: &'static str,
    icon_url: &'static str,
}

/// Posts each message as a single embed to a Discord webhook
pub struct DiscordWebhook {
    client: reqwest::Client,
    url: String,
}

impl DiscordWebhook {
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            url: url.to_string(),
        }
    }

    fn payload<'a>(message: &'a Message) -> WebhookPayload<'a> {
        WebhookPayload {
            content: message
                .mention
                .as_ref()
                .map(|m| format!("{}\n", m))
                .unwrap_or_default(),
            embeds: [Embed {
                title: &message.title,
                description: EMBED_DESCRIPTION,
                url: PROJECT_URL,
                color: EMBED_COLOR,
                fields: message
                    .fields
                    .iter()
                    .map(|f| EmbedField {
                        name: &f.name,
                        value: &f.value,
                        inline: false,
                    })
                    .collect(),
                footer: EmbedFooter {
                    text: FOOTER_TEXT,
                    icon_url: FOOTER_ICON_URL,
                },
                timestamp: Utc::now().to_rfc3339(),
            }],
        }
    }
}

#[async_trait::async_trait]
impl NotificationChannel for DiscordWebhook {
    async fn send(&self, message: &Message) -> Result<(), NotifyError> {
        if message.fields.len() > MAX_FIELDS {
            return Err(NotifyError::TooManyFields(message.fields.len()));
        }

        let response = self
            .client
            .post(&self.url)
            .json(&Self::payload(message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Discord accepted message with {} fields", message.fields.len());
        Ok(())
    }
}
