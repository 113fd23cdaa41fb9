use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, ValueEnum};
use thiserror::Error;

use crate::version::registries::github::DEFAULT_BASE_URL;

// =============================================================================
// Constants
// =============================================================================

/// Timeout for a single release lookup in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Default number of release lookups in flight at once
pub const DEFAULT_CONCURRENCY: usize = 16;

pub const SERVICES_FILE_NAME: &str = "services.txt";
pub const VERSIONS_FILE_NAME: &str = "versions.json";
pub const LOG_FILE_NAME: &str = "app.log";

/// Daily log files kept on disk, older ones are deleted on rotation
pub const MAX_LOG_FILES: usize = 4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please set the `{0}` environment variable")]
    MissingSetting(&'static str),

    #[error("Please add services to the {0:?} file")]
    NoTrackedServices(PathBuf),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Output format of the log file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Accepts `true`, `1` or `yes` (any case) as true and everything else as false
fn parse_flag(value: &str) -> Result<bool, String> {
    Ok(matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    ))
}

/// Raw settings, each taken from a flag, then the environment, then a default
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Discord webhook receiving the notifications
    #[arg(long, env = "DISCORD_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// Discord role mentioned on major updates (may be empty)
    #[arg(long, env = "DISCORD_ROLE_ID")]
    pub role_id: Option<String>,

    /// GitHub token used to avoid anonymous rate limits
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Allow mentioning the role at all
    #[arg(long, env = "ALLOW_PING", default_value = "true", value_parser = parse_flag, action = ArgAction::Set)]
    pub allow_ping: bool,

    /// Mention the role for every release, not only major ones
    #[arg(long, env = "ALLOW_ALL_RELEASES_PING", default_value = "false", value_parser = parse_flag, action = ArgAction::Set)]
    pub allow_all_releases_ping: bool,

    /// Log level or filter directive (overridden by RUST_LOG)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log file format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Directory holding services.txt and versions.json
    #[arg(long, env = "UPDATE_NOTIFIER_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory for the rolling log file
    #[arg(long, env = "UPDATE_NOTIFIER_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_base_url: String,

    /// Maximum number of release lookups in flight
    #[arg(long, env = "UPDATE_NOTIFIER_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,
}

/// Validated configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub webhook_url: String,
    /// Empty when no role should be mentioned
    pub role_id: String,
    pub github_token: Option<String>,
    pub allow_ping: bool,
    pub allow_all_releases_ping: bool,
    pub data_dir: PathBuf,
    pub api_base_url: String,
    pub concurrency: usize,
}

impl Config {
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let webhook_url = settings
            .webhook_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingSetting("DISCORD_WEBHOOK_URL"))?;
        let role_id = settings
            .role_id
            .clone()
            .ok_or(ConfigError::MissingSetting("DISCORD_ROLE_ID"))?;

        Ok(Self {
            webhook_url,
            role_id: role_id.trim().to_string(),
            github_token: settings
                .github_token
                .clone()
                .filter(|token| !token.trim().is_empty()),
            allow_ping: settings.allow_ping,
            allow_all_releases_ping: settings.allow_all_releases_ping,
            data_dir: settings.data_dir.clone(),
            api_base_url: settings.api_base_url.clone(),
            concurrency: settings.concurrency.max(1),
        })
    }

    pub fn services_path(&self) -> PathBuf {
        self.data_dir.join(SERVICES_FILE_NAME)
    }

    pub fn versions_path(&self) -> PathBuf {
        self.data_dir.join(VERSIONS_FILE_NAME)
    }

    pub fn role_id(&self) -> Option<&str> {
        Some(self.role_id.as_str()).filter(|id| !id.is_empty())
    }
}

/// Create `dir` (and parents) if missing
pub fn ensure_dir(dir: &Path) -> Result<(), ConfigError> {
    std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })
}
