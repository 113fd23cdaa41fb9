//! Logging to stderr and a daily rolling file

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::{LOG_FILE_NAME, LogFormat, MAX_LOG_FILES};

/// Build the filter: `RUST_LOG` wins, otherwise `level` with HTTP internals kept quiet.
fn build_filter(level: &str) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    Ok(EnvFilter::try_new(level)?
        .add_directive("hyper=warn".parse()?)
        .add_directive("hyper_util=warn".parse()?)
        .add_directive("reqwest=warn".parse()?))
}

/// Daily rolling `app.log.<date>` files in `log_dir`, keeping at most [`MAX_LOG_FILES`]
fn file_appender(log_dir: &Path) -> anyhow::Result<RollingFileAppender> {
    Ok(RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_NAME)
        .max_log_files(MAX_LOG_FILES)
        .build(log_dir)?)
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held until exit.
pub fn init(level: &str, format: LogFormat, log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender(log_dir)?);

    let file_layer = match format {
        LogFormat::Text => fmt::layer()
            .with_ansi(false)
            .with_writer(file_writer)
            .boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(file_writer).boxed(),
    };

    tracing_subscriber::registry()
        .with(build_filter(level)?)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn build_filter_accepts_uppercase_levels() {
        // RUST_LOG may be set in the test environment; either way this must parse
        assert!(build_filter("INFO").is_ok());
        assert!(build_filter("update_notifier=debug").is_ok());
    }

    #[test]
    fn file_appender_writes_dated_file_in_log_dir() {
        let temp_dir = TempDir::new().unwrap();

        let mut appender = file_appender(temp_dir.path()).unwrap();
        appender.write_all(b"hello\n").unwrap();
        appender.flush().unwrap();

        let names: Vec<String> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("app.log."), "{}", names[0]);
    }
}
