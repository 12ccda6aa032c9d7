use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

// =============================================================================
// Operation Envelope
// =============================================================================

/// Body for the generic `/api/operation` endpoint.
///
/// Serializes as `{"operation": "<kind>", ...fields}`; each variant carries
/// only the fields its kind needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Operation {
    CreateDirectory {
        path: String,
        name: String,
    },
    Rename {
        path: String,
        old_name: String,
        new_name: String,
    },
    Delete {
        path: String,
        name: String,
    },
    CreateFile {
        path: String,
        name: String,
        content: String,
    },
}

/// Operation kinds accepted by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    CreateDirectory,
    Rename,
    Delete,
    CreateFile,
}

impl OperationKind {
    /// Wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateDirectory => "create_directory",
            Self::Rename => "rename",
            Self::Delete => "delete",
            Self::CreateFile => "create_file",
        }
    }
}

impl Operation {
    /// The envelope's kind.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::CreateDirectory { .. } => OperationKind::CreateDirectory,
            Self::Rename { .. } => OperationKind::Rename,
            Self::Delete { .. } => OperationKind::Delete,
            Self::CreateFile { .. } => OperationKind::CreateFile,
        }
    }

    /// Reject empty names before anything goes on the wire.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::CreateDirectory { name, .. }
            | Self::Delete { name, .. }
            | Self::CreateFile { name, .. } => require("name", name),
            Self::Rename {
                old_name, new_name, ..
            } => {
                require("old_name", old_name)?;
                require("new_name", new_name)
            }
        }
    }
}

/// Fail with [`FailureKind::InvalidInput`](crate::FailureKind) on an empty value.
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        Err(ApiError::empty_field(field))
    } else {
        Ok(())
    }
}

// =============================================================================
// Other Request Bodies
// =============================================================================

/// Body for `/api/save`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SaveRequest {
    pub path: String,
    pub filename: String,
    pub content: String,
}

/// Body for `/api/move` and `/api/copy`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RelocateRequest {
    pub source_path: String,
    pub source_name: String,
    pub target_path: String,
}

// =============================================================================
// Acknowledgements
// =============================================================================

/// Item echoed back by a mutation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ItemSummary {
    pub name: String,
    #[serde(default)]
    pub is_dir: Option<bool>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Acknowledgement for operation, save, move and copy calls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct OperationAck {
    #[serde(default)]
    pub success: bool,
    /// Absent for move and copy
    #[serde(default)]
    pub result: Option<ItemSummary>,
}
