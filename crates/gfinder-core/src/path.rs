//! Remote path model.
//!
//! # Path Convention
//!
//! - Root of the store: empty string `""`
//! - Directory in root: `"docs"`
//! - Nested directory: `"docs/reports"`
//! - No leading or trailing slashes on the wire

use std::fmt;

/// Strip leading and trailing separators.
///
/// Idempotent: a path without outer separators is returned unchanged.
#[inline]
pub fn normalize_path(path: &str) -> &str {
    path.trim_matches('/')
}

/// Directory location in the remote store, as a sequence of segments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RemotePath {
    segments: Vec<String>,
}

impl RemotePath {
    /// The store root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a `/`-separated path, dropping empty segments.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Is this the store root?
    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path segments from the root down.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Last segment, `None` at the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Child path. `name` may itself contain separators.
    pub fn join(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(
            name.split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
        Self { segments }
    }

    /// Parent directory, `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Wire form: segments joined with `/`, empty for the root.
    pub fn as_query(&self) -> String {
        self.segments.join("/")
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

impl From<&str> for RemotePath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<String> for RemotePath {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

impl From<&String> for RemotePath {
    fn from(path: &String) -> Self {
        Self::parse(path)
    }
}

impl From<&RemotePath> for RemotePath {
    fn from(path: &RemotePath) -> Self {
        path.clone()
    }
}
