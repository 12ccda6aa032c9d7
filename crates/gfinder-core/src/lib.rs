//! # gfinder-core
//!
//! Platform-independent client for a remote hierarchical file store.
//!
//! - [`FileClient`] - one method per file-system verb (list, mkdir, rename,
//!   delete, create, preview, save, move, copy, upload, download)
//! - [`HttpClient`] - configured transport with response interception:
//!   exactly 200 succeeds, everything else becomes an [`ApiError`]
//! - [`Download`] - raw fetch, `Content-Disposition` filename recovery and
//!   hand-off to a [`SaveTarget`]
//! - [`Transport`] - the seam an HTTP implementation plugs into
//!
//! Every failure, whatever its origin, reaches the caller as an [`ApiError`]
//! carrying a single human-readable message.

pub mod classify;
mod client;
pub mod config;
pub mod download;
pub mod error;
mod http;
pub mod models;
pub mod path;
pub mod transport;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use client::FileClient;
pub use config::{ClientConfig, ConfigError};
pub use download::{Download, DownloadState, SaveError, SaveTarget};
pub use error::{ApiError, FailureKind, Result};
pub use http::HttpClient;
pub use models::{
    DirEntry, DirectoryListing, EntryKind, FilePreview, ItemSummary, Operation, OperationAck,
    OperationKind, PreviewKind, SavedFile, SystemInfo, UploadAck, UploadFile,
};
pub use path::{RemotePath, normalize_path};
pub use transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
