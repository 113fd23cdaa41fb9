//! One complete notifier run

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};

use crate::config::{Config, ensure_dir};
use crate::notify::channel::NotificationChannel;
use crate::notify::composer::{DeliveryReport, NotificationComposer};
use crate::notify::discord::DiscordWebhook;
use crate::services::{ensure_services_file, load_tracked_services};
use crate::version::detector::UpdateDetector;
use crate::version::registries::github::GitHubRegistry;
use crate::version::registry::Registry;
use crate::version::store::{JsonVersionStore, VersionStore};
use crate::version::types::VersionRecord;

/// What a run did, for the final log line and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub tracked: usize,
    pub updates: usize,
    pub delivery: DeliveryReport,
}

/// Check the data directory, then run against GitHub and Discord.
pub async fn run(config: &Config) -> anyhow::Result<RunSummary> {
    let store = prepare(config)?;
    let registry: Arc<dyn Registry> = Arc::new(GitHubRegistry::new(
        &config.api_base_url,
        config.github_token.as_deref(),
    ));
    let channel: Arc<dyn NotificationChannel> = Arc::new(DiscordWebhook::new(&config.webhook_url));

    run_with(config, registry, store, channel).await
}

/// Validate files on disk before any network traffic.
///
/// Creates the data directory and an empty version store when needed. A
/// missing or empty service list is fatal.
pub fn prepare(config: &Config) -> anyhow::Result<JsonVersionStore> {
    ensure_dir(&config.data_dir)?;
    ensure_services_file(&config.services_path())?;

    let store = JsonVersionStore::new(config.versions_path());
    let initialized = store
        .ensure_exists()
        .with_context(|| format!("Failed to initialize {:?}", store.path()))?;
    if initialized {
        warn!("No current versions found in {:?}", store.path());
        info!("Added an empty JSON object. This will deploy notifications for all services.");
    }

    Ok(store)
}

/// Run with explicit collaborators
pub async fn run_with<S: VersionStore>(
    config: &Config,
    registry: Arc<dyn Registry>,
    store: S,
    channel: Arc<dyn NotificationChannel>,
) -> anyhow::Result<RunSummary> {
    let tracked = load_tracked_services(&config.services_path())?;

    let mut stored = store.load_all().unwrap_or_else(|e| {
        error!("Error reading stored versions: {}", e);
        VersionRecord::new()
    });

    let detector = UpdateDetector::new(
        registry,
        store,
        config.allow_all_releases_ping,
        config.concurrency,
    );
    let detection = detector.detect(&tracked, &mut stored).await;

    let composer = NotificationComposer::new(channel, config.role_id(), config.allow_ping);
    let delivery = composer
        .compose_and_send(&detection.events, detection.should_mention)
        .await;

    if detection.is_empty() {
        info!("No new updates found");
    } else {
        info!(
            "{} new updates found, {} notifications sent, {} failed",
            detection.events.len(),
            delivery.sent,
            delivery.failed
        );
    }

    Ok(RunSummary {
        tracked: tracked.len(),
        updates: detection.events.len(),
        delivery,
    })
}
