//! Download flow: raw fetch, filename negotiation and local save.
//!
//! ```text
//! Idle -> Requesting -> BodyReceived -> FilenameResolved -> BlobCreated -> SaveTriggered -> Cleaned
//!             \______________\_________________\________________\______________\-> Failed
//! ```
//!
//! The JSON interceptor is bypassed because success is a byte stream. The
//! object URL created for the save is released exactly once, after the save
//! was triggered, on every path that created one.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, error, trace};

use crate::classify::error_message;
use crate::config::endpoints;
use crate::error::{ApiError, FailureKind, Result, messages};
use crate::http::HttpClient;
use crate::models::{SavedFile, require};
use crate::path::normalize_path;
use crate::transport::Transport;

// =============================================================================
// Save Target
// =============================================================================

/// Failures reported by a [`SaveTarget`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SaveError {
    /// The environment cannot save files (no window, no document).
    #[error("save target unavailable: {0}")]
    Unavailable(String),
    /// The payload could not be turned into an object URL.
    #[error("could not create blob: {0}")]
    Blob(String),
    /// The save could not be started.
    #[error("could not start download: {0}")]
    Trigger(String),
}

impl From<SaveError> for ApiError {
    fn from(err: SaveError) -> Self {
        ApiError::new(FailureKind::SaveFailed, err.to_string())
    }
}

/// Capability to hand bytes to the user's local environment.
///
/// In a browser this is a `Blob`, an object URL and a synthetic anchor
/// click. Implementations never see HTTP.
pub trait SaveTarget {
    /// Handle to the materialized payload.
    type ObjectUrl;

    /// Materialize `bytes` and return a handle the save can point at.
    fn create_object_url(
        &self,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> std::result::Result<Self::ObjectUrl, SaveError>;

    /// Start saving the payload under `filename`.
    fn trigger_save(
        &self,
        url: &Self::ObjectUrl,
        filename: &str,
    ) -> std::result::Result<(), SaveError>;

    /// Release the handle. Called exactly once per created handle.
    fn revoke_object_url(&self, url: Self::ObjectUrl);

    /// Materialize, trigger and release in one call.
    fn save_bytes(
        &self,
        filename: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> std::result::Result<(), SaveError> {
        let url = ObjectUrlGuard::new(self, self.create_object_url(bytes, content_type)?);
        url.trigger(filename)
    }
}

/// Revokes its object URL when dropped.
struct ObjectUrlGuard<'a, S: SaveTarget + ?Sized> {
    target: &'a S,
    url: Option<S::ObjectUrl>,
}

impl<'a, S: SaveTarget + ?Sized> ObjectUrlGuard<'a, S> {
    fn new(target: &'a S, url: S::ObjectUrl) -> Self {
        Self {
            target,
            url: Some(url),
        }
    }

    fn trigger(&self, filename: &str) -> std::result::Result<(), SaveError> {
        match &self.url {
            Some(url) => self.target.trigger_save(url, filename),
            None => Err(SaveError::Trigger("object URL already released".into())),
        }
    }
}

impl<S: SaveTarget + ?Sized> Drop for ObjectUrlGuard<'_, S> {
    fn drop(&mut self) {
        if let Some(url) = self.url.take() {
            self.target.revoke_object_url(url);
        }
    }
}

// =============================================================================
// Content-Disposition
// =============================================================================

static QUOTED_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"filename="(.+?)""#).expect("static regex"));

static EXTENDED_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"filename\*\s*=\s*(?i:utf-8)''([^;\s]+)"#).expect("static regex")
});

/// Filename announced by a `Content-Disposition` header.
///
/// Prefers the RFC 5987 `filename*=UTF-8''...` form when it decodes, then
/// the first `filename="..."`. Directory components are dropped.
pub fn disposition_filename(header: &str) -> Option<String> {
    let extended = EXTENDED_FILENAME
        .captures(header)
        .and_then(|caps| urlencoding::decode(caps.get(1)?.as_str()).ok().map(Cow::into_owned));

    let name = extended
        .and_then(|name| base_name(&name))
        .or_else(|| {
            QUOTED_FILENAME
                .captures(header)
                .and_then(|caps| base_name(&caps[1]))
        })?;

    Some(name)
}

fn base_name(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next()?.trim();
    (!base.is_empty()).then(|| base.to_string())
}

/// Server filename if the header carries one, else the caller's.
pub fn resolve_filename(header: Option<&str>, requested: &str) -> String {
    header
        .and_then(disposition_filename)
        .unwrap_or_else(|| requested.to_string())
}

// =============================================================================
// Download
// =============================================================================

/// Where a download currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DownloadState {
    Idle,
    Requesting,
    BodyReceived,
    FilenameResolved,
    BlobCreated,
    SaveTriggered,
    Cleaned,
    Failed,
}

impl DownloadState {
    /// `Cleaned` and `Failed` end the flow.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cleaned | Self::Failed)
    }

    /// Legal transitions: one step forward, or to `Failed` from any
    /// non-terminal state.
    pub fn can_advance_to(self, next: Self) -> bool {
        use DownloadState::*;
        match (self, next) {
            (from, Failed) => !from.is_terminal(),
            (Idle, Requesting)
            | (Requesting, BodyReceived)
            | (BodyReceived, FilenameResolved)
            | (FilenameResolved, BlobCreated)
            | (BlobCreated, SaveTriggered)
            | (SaveTriggered, Cleaned) => true,
            _ => false,
        }
    }
}

/// A single download. Not reusable once terminal.
#[derive(Debug)]
pub struct Download {
    path: String,
    filename: String,
    state: DownloadState,
}

impl Download {
    /// Prepare a download of `filename` in directory `path`.
    pub fn new(path: &str, filename: impl Into<String>) -> Self {
        Self {
            path: normalize_path(path).to_string(),
            filename: filename.into(),
            state: DownloadState::Idle,
        }
    }

    /// Normalized directory path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Current state.
    pub fn state(&self) -> DownloadState {
        self.state
    }

    /// Fetch and save. Failures are logged, then returned.
    pub async fn run<T, S>(&mut self, http: &HttpClient<T>, target: &S) -> Result<SavedFile>
    where
        T: Transport,
        S: SaveTarget + ?Sized,
    {
        if self.state != DownloadState::Idle {
            return Err(ApiError::new(
                FailureKind::InvalidInput,
                "download already started",
            ));
        }

        match self.execute(http, target).await {
            Ok(saved) => Ok(saved),
            Err(err) => {
                self.advance(DownloadState::Failed);
                error!(
                    path = %self.path,
                    filename = %self.filename,
                    kind = ?err.kind(),
                    "download failed: {}",
                    err
                );
                Err(err)
            }
        }
    }

    async fn execute<T, S>(&mut self, http: &HttpClient<T>, target: &S) -> Result<SavedFile>
    where
        T: Transport,
        S: SaveTarget + ?Sized,
    {
        require("filename", &self.filename)?;

        self.advance(DownloadState::Requesting);
        let response = http
            .fetch_raw(
                endpoints::DOWNLOAD,
                &[("path", self.path.as_str()), ("filename", self.filename.as_str())],
            )
            .await?;

        if !response.is_success() {
            return Err(match error_message(&response.body) {
                Some(msg) => ApiError::new(FailureKind::Reported(response.status), msg),
                None => ApiError::new(
                    FailureKind::DownloadParseFailure,
                    format!("{} ({})", messages::DOWNLOAD_FAILED, response.status),
                ),
            });
        }
        self.advance(DownloadState::BodyReceived);

        let filename = resolve_filename(response.header("content-disposition"), &self.filename);
        let content_type = response.header("content-type").map(str::to_string);
        self.advance(DownloadState::FilenameResolved);
        debug!(requested = %self.filename, resolved = %filename, "filename resolved");

        let url = ObjectUrlGuard::new(
            target,
            target.create_object_url(&response.body, content_type.as_deref())?,
        );
        self.advance(DownloadState::BlobCreated);

        url.trigger(&filename)?;
        self.advance(DownloadState::SaveTriggered);

        drop(url);
        self.advance(DownloadState::Cleaned);

        Ok(SavedFile {
            filename,
            size: response.body.len(),
            content_type,
        })
    }

    fn advance(&mut self, next: DownloadState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal download transition {:?} -> {:?}",
            self.state,
            next
        );
        trace!(from = ?self.state, to = ?next, "download state");
        self.state = next;
    }
}
