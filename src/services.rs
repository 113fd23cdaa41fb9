//! Tracked-service list: one repository identifier per line

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::config::ConfigError;

/// Split file content into identifiers, stripping whitespace and skipping blank lines
pub fn parse_tracked_services(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Make sure the service list exists and has content.
///
/// A missing file is created empty so it can be filled in; both a missing and
/// an empty file abort the run.
pub fn ensure_services_file(path: &Path) -> Result<(), ConfigError> {
    let io_err = |source: std::io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    match fs::metadata(path) {
        Ok(meta) if meta.len() > 0 => Ok(()),
        Ok(_) => Err(ConfigError::NoTrackedServices(path.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            fs::write(path, "").map_err(io_err)?;
            Err(ConfigError::NoTrackedServices(path.to_path_buf()))
        }
        Err(e) => Err(io_err(e)),
    }
}

/// Read the tracked identifiers in file order
pub fn load_tracked_services(path: &Path) -> Result<Vec<String>, ConfigError> {
    debug!("Reading services from {:?}", path);
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let services = parse_tracked_services(&content);
    if services.is_empty() {
        return Err(ConfigError::NoTrackedServices(path.to_path_buf()));
    }
    Ok(services)
}
