use indexmap::IndexMap;

/// Last observed version per tracked repository, in file order
pub type VersionRecord = IndexMap<String, String>;

/// Latest release of a tracked repository as reported upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Tracked identifier, e.g. "owner/repo"
    pub name: String,
    /// Release tag
    pub version: String,
    /// Web page of the release
    pub url: String,
}

impl Release {
    pub fn new(name: impl Into<String>, version: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            url: url.into(),
        }
    }
}

/// A release that differs from the stored baseline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEvent {
    pub name: String,
    pub version: String,
    pub url: String,
    /// No baseline existed before this run
    pub is_new: bool,
    pub is_major: bool,
}

impl UpdateEvent {
    pub fn from_release(release: &Release, is_new: bool, is_major: bool) -> Self {
        Self {
            name: release.name.clone(),
            version: release.version.clone(),
            url: release.url.clone(),
            is_new,
            is_major,
        }
    }
}

/// Outcome of one detection pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    pub events: Vec<UpdateEvent>,
    pub should_mention: bool,
}

impl Detection {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
