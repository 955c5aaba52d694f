use std::path::{Path, PathBuf};

/// A save-state marker: an optional display name and a mandatory location.
///
/// Markers are read-only records; nothing in the crate mutates one after
/// construction.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SaveMarker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    location: PathBuf,
}

impl SaveMarker {
    /// A marker with a location and no display name.
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            display_name: None,
            location: location.into(),
        }
    }

    /// Attach a display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn location(&self) -> &Path {
        &self.location
    }
}
