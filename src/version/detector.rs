//! Update detection against the stored baseline

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info};

use crate::version::classifier::classify;
use crate::version::registry::Registry;
use crate::version::store::VersionStore;
use crate::version::types::{Detection, Release, UpdateEvent, VersionRecord};

/// Fetch the latest release of every tracked repository.
///
/// At most `concurrency` lookups are in flight at once. Results keep the
/// order of `tracked`; failed lookups are logged and left out.
pub async fn fetch_all_releases(
    registry: &dyn Registry,
    tracked: &[String],
    concurrency: usize,
) -> Vec<Release> {
    let results: Vec<_> = stream::iter(tracked)
        .map(|name| async move { (name, registry.fetch_latest_release(name).await) })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    results
        .into_iter()
        .filter_map(|(name, result)| {
            result
                .inspect_err(|e| error!("Failed to fetch latest version for {}: {}", name, e))
                .ok()
        })
        .collect()
}

/// Compares freshly fetched releases with the stored baseline
pub struct UpdateDetector<S: VersionStore> {
    registry: Arc<dyn Registry>,
    store: S,
    always_mention: bool,
    concurrency: usize,
}

impl<S: VersionStore> UpdateDetector<S> {
    pub fn new(
        registry: Arc<dyn Registry>,
        store: S,
        always_mention: bool,
        concurrency: usize,
    ) -> Self {
        Self {
            registry,
            store,
            always_mention,
            concurrency,
        }
    }

    /// Fetch every tracked repository and classify the changes.
    ///
    /// `stored` is updated in place and each change is written to the store
    /// before the next repository is looked at. A failed write is logged and
    /// the run goes on with the in-memory value.
    pub async fn detect(&self, tracked: &[String], stored: &mut VersionRecord) -> Detection {
        info!("Starting to fetch latest versions");
        let releases = fetch_all_releases(self.registry.as_ref(), tracked, self.concurrency).await;
        debug!(
            "Fetched {} of {} tracked services",
            releases.len(),
            tracked.len()
        );

        let mut detection = Detection {
            events: Vec::new(),
            should_mention: self.always_mention,
        };

        for release in &releases {
            let mut event = None;

            if !stored.contains_key(&release.name) {
                info!(
                    "New service found: {}, writing the latest version: {}",
                    release.name, release.version
                );
                self.persist(stored, release);
                event = Some(UpdateEvent::from_release(release, true, false));
                debug!("As a new service was found, all releases will be pinged");
                detection.should_mention = true;
            }

            // A service stored just above compares equal here and falls through.
            let previous = stored
                .get(&release.name)
                .cloned()
                .unwrap_or_default();
            if previous != release.version {
                let kind = classify(&previous, &release.version);
                debug!(
                    "{} update found for {}: {} -> {}",
                    kind.as_str(),
                    release.name,
                    previous,
                    release.version
                );
                if kind.is_major() {
                    detection.should_mention = true;
                }
                self.persist(stored, release);
                match event.as_mut() {
                    Some(existing) => existing.is_major = kind.is_major(),
                    None => {
                        event = Some(UpdateEvent::from_release(release, false, kind.is_major()))
                    }
                }
            }

            detection.events.extend(event);
        }

        detection
    }

    fn persist(&self, stored: &mut VersionRecord, release: &Release) {
        stored.insert(release.name.clone(), release.version.clone());
        if let Err(e) = self.store.write(&release.name, &release.version) {
            error!(
                "Failed to store version {} for {}: {}",
                release.version, release.name, e
            );
        }
    }
}
