//! GitHub Releases API registry implementation

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::version::error::RegistryError;
use crate::version::registry::{FetchResult, Registry};
use crate::version::types::Release;

/// Default base URL for GitHub API
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Response from the GitHub "latest release" endpoint
#[derive(Debug, Deserialize)]
struct LatestRelease {
    tag_name: String,
    html_url: String,
}

/// Registry implementation for GitHub Releases API
///
/// One client is shared by every lookup, so connections are pooled and the
/// auth header is set once.
pub struct GitHubRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubRegistry {
    /// Creates a new GitHubRegistry against `base_url`, authenticated when a token is given
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        match token.map(|t| HeaderValue::from_str(&format!("token {}", t))) {
            Some(Ok(mut value)) => {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            Some(Err(e)) => {
                warn!("Ignoring GITHUB_TOKEN, not a valid header value: {}", e);
            }
            None => {
                info!(
                    "GITHUB_TOKEN is not set. Requests will be made without authentication and may be rate limited."
                );
            }
        }

        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("update-notifier/", env!("CARGO_PKG_VERSION")))
                .default_headers(headers)
                .timeout(std::time::Duration::from_millis(
                    crate::config::FETCH_TIMEOUT_MS,
                ))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for GitHubRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, None)
    }
}

/// Seconds to wait before retrying, from `retry-after` or `x-ratelimit-reset`
fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
    };

    header("retry-after").or_else(|| {
        let reset = header("x-ratelimit-reset")?;
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        Some(reset.saturating_sub(now))
    })
}

#[async_trait::async_trait]
impl Registry for GitHubRegistry {
    async fn fetch_latest_release(&self, name: &str) -> FetchResult {
        let url = format!("{}/repos/{}/releases/latest", self.base_url, name);
        info!("Fetching latest version for {}", name);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(name.to_string()));
        }

        let exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .is_some_and(|v| v == "0");
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || (status == reqwest::StatusCode::FORBIDDEN && exhausted)
        {
            return Err(RegistryError::RateLimited {
                retry_after_secs: retry_after_secs(response.headers()),
            });
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let release: LatestRelease = response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub release response for {}: {}", name, e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        debug!("Processing service: {} ({})", name, release.tag_name);
        Ok(Release::new(name, release.tag_name, release.html_url))
    }
}
