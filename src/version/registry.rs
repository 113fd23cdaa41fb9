//! Registry trait for looking up the latest release of a repository

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;
use crate::version::types::Release;

/// Per-repository lookup outcome. Failures stay inside this value and never
/// abort the lookups of other repositories.
pub type FetchResult = Result<Release, RegistryError>;

/// Trait for fetching the latest release from a release host
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Fetches the latest release for a tracked repository
    ///
    /// # Arguments
    /// * `name` - The tracked identifier (e.g., "rust-lang/rust")
    ///
    /// # Returns
    /// * `Ok(Release)` - Tag and web URL of the latest release
    /// * `Err(RegistryError)` - If the lookup fails
    async fn fetch_latest_release(&self, name: &str) -> FetchResult;
}
