//! Durable "last seen version" baseline
//!
//! The JSON file is rewritten as a whole on every change, one repository at
//! a time, so an interrupted run leaves exactly the changes processed so far.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, error, warn};

use crate::version::error::StoreError;
use crate::version::types::VersionRecord;

/// Trait for reading and writing the version baseline
#[cfg_attr(test, automock)]
pub trait VersionStore: Send + Sync {
    /// Read every stored entry
    fn load_all(&self) -> Result<VersionRecord, StoreError>;

    /// Persist a single entry, keeping every other entry intact
    fn write(&self, name: &str, version: &str) -> Result<(), StoreError>;
}

/// Version store backed by a flat JSON object on disk
#[derive(Debug)]
pub struct JsonVersionStore {
    path: PathBuf,
}

impl JsonVersionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with an empty object when it is missing or empty.
    ///
    /// Returns `true` when the file had to be initialized.
    pub fn ensure_exists(&self) -> Result<bool, StoreError> {
        let needs_init = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };

        if needs_init {
            fs::write(&self.path, "{}")?;
        }
        Ok(needs_init)
    }

    /// Read the record, treating a missing file as empty.
    ///
    /// A file that is not valid JSON is logged and treated as empty too, so a
    /// corrupted baseline resets to "everything is new" instead of aborting.
    fn read_record(&self) -> Result<VersionRecord, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Version store {:?} does not exist yet", self.path);
                return Ok(VersionRecord::new());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(record) => Ok(record),
            Err(e) => {
                error!("Error decoding JSON from {:?}: {}", self.path, e);
                Ok(VersionRecord::new())
            }
        }
    }

    fn write_record(&self, record: &VersionRecord) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        record.serialize(&mut serializer)?;
        fs::write(&self.path, buf)?;
        Ok(())
    }
}

impl VersionStore for JsonVersionStore {
    fn load_all(&self) -> Result<VersionRecord, StoreError> {
        let record = self.read_record()?;
        if record.is_empty() {
            warn!("Version store {:?} is empty, every service will be reported as new", self.path);
        }
        Ok(record)
    }

    fn write(&self, name: &str, version: &str) -> Result<(), StoreError> {
        let mut record = self.read_record()?;
        record.insert(name.to_string(), version.to_string());
        self.write_record(&record)?;
        debug!("Stored {} = {} in {:?}", name, version, self.path);
        Ok(())
    }
}
