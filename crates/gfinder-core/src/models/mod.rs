//! Wire types for the file-store API.
//!
//! Contains:
//! - [`DirectoryListing`], [`DirEntry`], [`SystemInfo`] - Read-side responses
//! - [`Operation`], [`SaveRequest`], [`RelocateRequest`] - Mutation request bodies
//! - [`OperationAck`], [`UploadAck`] - Mutation acknowledgements
//! - [`FilePreview`], [`UploadFile`], [`SavedFile`] - File content and transfer descriptors

mod listing;
mod operation;
mod transfer;

pub use listing::{DirEntry, DirectoryListing, EntryKind, SystemInfo};
pub(crate) use operation::require;
pub use operation::{
    ItemSummary, Operation, OperationAck, OperationKind, RelocateRequest, SaveRequest,
};
pub use transfer::{FilePreview, PreviewKind, SavedFile, UploadAck, UploadFile};
