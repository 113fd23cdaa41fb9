//! Renders update events into bounded messages and delivers them

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::notify::channel::{Field, MAX_FIELDS, Message, NotificationChannel};
use crate::version::types::UpdateEvent;

pub const MESSAGE_TITLE: &str = "UpdateNotifier";

/// Outcome of one [`NotificationComposer::compose_and_send`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub failed: usize,
}

pub struct NotificationComposer {
    channel: Arc<dyn NotificationChannel>,
    /// Rendered mention token, present only when pinging is allowed and a role is set
    mention: Option<String>,
}

impl NotificationComposer {
    pub fn new(channel: Arc<dyn NotificationChannel>, role_id: Option<&str>, allow_ping: bool) -> Self {
        let mention = match (allow_ping, role_id.map(str::trim)) {
            (false, _) => {
                debug!("Ping is disabled");
                None
            }
            (true, Some(id)) if !id.is_empty() => Some(format!("<@&{}>", id)),
            (true, _) => {
                debug!("No role ID is set");
                None
            }
        };

        Self { channel, mention }
    }

    /// Build the message for one batch of events.
    pub fn render(&self, batch: &[UpdateEvent], should_mention: bool) -> Message {
        Message {
            title: MESSAGE_TITLE.to_string(),
            fields: batch.iter().map(render_field).collect(),
            mention: self.mention.clone().filter(|_| should_mention),
        }
    }

    /// Send `events` in consecutive batches of at most [`MAX_FIELDS`].
    ///
    /// Nothing is sent for an empty slice. A failed batch is logged and the
    /// remaining batches are still sent.
    pub async fn compose_and_send(
        &self,
        events: &[UpdateEvent],
        should_mention: bool,
    ) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        if events.is_empty() {
            return report;
        }
        if should_mention && self.mention.is_some() {
            debug!("Pinging Discord role");
        }

        for batch in events.chunks(MAX_FIELDS) {
            info!("Sending Discord notification with {} services", batch.len());
            let message = self.render(batch, should_mention);

            match self.channel.send(&message).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    error!("Failed to send Discord notification: {}", e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}

fn render_field(event: &UpdateEvent) -> Field {
    Field {
        name: format!("**{}**", event.name),
        value: format!("**Version:** {}\n**URL:** <{}>", event.version, event.url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::channel::{MockNotificationChannel, NotifyError};
    use mockall::Sequence;
    use rstest::rstest;

    fn events(count: usize) -> Vec<UpdateEvent> {
        (0..count)
            .map(|i| UpdateEvent {
                name: format!("owner/repo{i}"),
                version: format!("v{i}.0.0"),
                url: format!("https://github.com/owner/repo{i}/releases/tag/v{i}.0.0"),
                is_new: false,
                is_major: false,
            })
            .collect()
    }

    #[tokio::test]
    async fn compose_and_send_sends_nothing_for_empty_events() {
        let mut channel = MockNotificationChannel::new();
        channel.expect_send().times(0);
        let composer = NotificationComposer::new(Arc::new(channel), Some("1"), true);

        let report = composer.compose_and_send(&[], true).await;

        assert_eq!(report, DeliveryReport::default());
    }

    #[tokio::test]
    async fn compose_and_send_splits_into_batches_in_order() {
        let mut seq = Sequence::new();
        let mut channel = MockNotificationChannel::new();
        channel
            .expect_send()
            .withf(|m| {
                m.fields.len() == 25
                    && m.fields[0].name == "**owner/repo0**"
                    && m.fields[24].name == "**owner/repo24**"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        channel
            .expect_send()
            .withf(|m| m.fields.len() == 5 && m.fields[0].name == "**owner/repo25**")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        let composer = NotificationComposer::new(Arc::new(channel), None, true);

        let report = composer.compose_and_send(&events(30), false).await;

        assert_eq!(report, DeliveryReport { sent: 2, failed: 0 });
    }

    #[tokio::test]
    async fn compose_and_send_repeats_mention_on_every_batch() {
        let mut channel = MockNotificationChannel::new();
        channel
            .expect_send()
            .withf(|m| m.mention.as_deref() == Some("<@&123>"))
            .times(3)
            .returning(|_| Ok(()));
        let composer = NotificationComposer::new(Arc::new(channel), Some("123"), true);

        let report = composer.compose_and_send(&events(51), true).await;

        assert_eq!(report.sent, 3);
    }

    #[tokio::test]
    async fn compose_and_send_continues_after_failed_batch() {
        let mut seq = Sequence::new();
        let mut channel = MockNotificationChannel::new();
        channel
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(NotifyError::Rejected {
                    status: 500,
                    body: String::new(),
                })
            });
        channel
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        let composer = NotificationComposer::new(Arc::new(channel), None, false);

        let report = composer.compose_and_send(&events(26), false).await;

        assert_eq!(report, DeliveryReport { sent: 1, failed: 1 });
    }

    #[rstest]
    #[case(Some("123"), true, true, Some("<@&123>"))]
    #[case(Some("123"), true, false, None)] // nothing worth a ping
    #[case(Some("123"), false, true, None)] // pinging disabled
    #[case(Some(""), true, true, None)] // no role configured
    #[case(None, true, true, None)]
    fn render_attaches_mention_only_when_allowed(
        #[case] role_id: Option<&str>,
        #[case] allow_ping: bool,
        #[case] should_mention: bool,
        #[case] expected: Option<&str>,
    ) {
        let composer = NotificationComposer::new(
            Arc::new(MockNotificationChannel::new()),
            role_id,
            allow_ping,
        );

        let message = composer.render(&events(1), should_mention);

        assert_eq!(message.mention.as_deref(), expected);
    }

    #[test]
    fn render_formats_name_version_and_url() {
        let composer =
            NotificationComposer::new(Arc::new(MockNotificationChannel::new()), None, true);

        let message = composer.render(&events(1), false);

        assert_eq!(message.title, "UpdateNotifier");
        assert_eq!(
            message.fields,
            vec![Field {
                name: "**owner/repo0**".to_string(),
                value: "**Version:** v0.0.0\n**URL:** <https://github.com/owner/repo0/releases/tag/v0.0.0>"
                    .to_string(),
            }]
        );
    }
}
