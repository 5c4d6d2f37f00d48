//! URI-based identifiers for files and directories.
//!
//! A [`Location`] is the only way the rest of the workspace refers to a
//! resource. It wraps a [`Url`] whose path has been normalized so that two
//! locations naming the same resource compare equal by their string form.

use std::fmt;
use std::str::FromStr;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use url::Url;

use crate::path::clean_utf8_path;

#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Invalid location URI '{input}'")]
    Parse {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Location '{0}' has no hierarchical path")]
    NotHierarchical(String),
    #[error("Path '{0}' is not absolute")]
    RelativePath(Utf8PathBuf),
    #[error("Path '{0}' cannot be represented as a file URI")]
    InvalidPath(Utf8PathBuf),
}

/// Hierarchical, immutable identifier for a file-system resource.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location(Url);

impl Location {
    /// Parse a URI string into a [`Location`].
    ///
    /// URIs that cannot carry a hierarchical path (e.g. `mailto:`) are rejected.
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        let url = Url::parse(input).map_err(|source| LocationError::Parse {
            input: input.to_string(),
            source,
        })?;
        Self::from_url(url)
    }

    /// Wrap an existing [`Url`], normalizing away a trailing slash.
    pub fn from_url(mut url: Url) -> Result<Self, LocationError> {
        if url.cannot_be_a_base() {
            return Err(LocationError::NotHierarchical(url.to_string()));
        }
        if url.path() != "/" && url.path().ends_with('/') {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty();
            }
        }
        Ok(Self(url))
    }

    /// Build a `file://` location from an absolute path.
    ///
    /// `.` and `..` components are resolved lexically; the file system is
    /// never consulted.
    pub fn from_path(path: &Utf8Path) -> Result<Self, LocationError> {
        if !path.is_absolute() {
            return Err(LocationError::RelativePath(path.to_path_buf()));
        }
        let cleaned = clean_utf8_path(path);
        let url = Url::from_file_path(cleaned.as_std_path())
            .map_err(|()| LocationError::InvalidPath(cleaned.clone()))?;
        Self::from_url(url)
    }

    /// Convert a `file://` location back into a path.
    ///
    /// Returns `None` for any other scheme or if the decoded path is not UTF-8.
    #[must_use]
    pub fn to_path(&self) -> Option<Utf8PathBuf> {
        if self.0.scheme() != "file" {
            return None;
        }

        let path = percent_encoding::percent_decode_str(self.0.path())
            .decode_utf8()
            .ok()?
            .into_owned();

        // Remove leading '/' for paths like /C:/...
        #[cfg(windows)]
        let path = path.strip_prefix('/').map(str::to_string).unwrap_or(path);

        Some(Utf8PathBuf::from(path))
    }

    /// Resolve a child `name` against this location.
    ///
    /// The name is treated as a single path segment and percent-encoded as needed.
    #[must_use]
    pub fn join(&self, name: &str) -> Self {
        let mut url = self.0.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(name);
        }
        Self(url)
    }

    /// The final path segment, percent-decoded. `None` for a root location.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        let last = self.0.path_segments()?.next_back()?;
        if last.is_empty() {
            return None;
        }
        Some(
            percent_encoding::percent_decode_str(last)
                .decode_utf8_lossy()
                .into_owned(),
        )
    }

    /// The containing location. `None` for a root location.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.name()?;
        let mut url = self.0.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().pop();
        }
        Some(Self(url))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location({})", self.as_str())
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Url> for Location {
    type Error = LocationError;

    fn try_from(url: Url) -> Result<Self, Self::Error> {
        Self::from_url(url)
    }
}
