use serde::Deserialize;

// =============================================================================
// Preview
// =============================================================================

/// How the server classified a previewed file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    Text,
    Image,
    Pdf,
    #[serde(other)]
    Unknown,
}

/// Result of `/api/preview`.
///
/// Only text previews carry content; images and PDFs are fetched separately
/// through the download endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FilePreview {
    #[serde(rename = "type")]
    pub kind: PreviewKind,
    #[serde(default)]
    pub content: Option<String>,
}

impl FilePreview {
    /// Text content, if this is a text preview.
    pub fn text(&self) -> Option<&str> {
        match self.kind {
            PreviewKind::Text => self.content.as_deref(),
            _ => None,
        }
    }
}

// =============================================================================
// Upload
// =============================================================================

/// A file to upload: bytes plus the name it should get on the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// MIME type, if known
    pub content_type: Option<String>,
}

impl UploadFile {
    /// Create an upload descriptor without a MIME type.
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
            content_type: None,
        }
    }

    /// Attach a MIME type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Acknowledgement from `/api/upload`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UploadAck {
    #[serde(default)]
    pub success: bool,
    /// Name the server stored the file under
    #[serde(default)]
    pub filename: Option<String>,
}

// =============================================================================
// Download
// =============================================================================

/// What a completed download delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedFile {
    /// Name the file was saved under (after header negotiation)
    pub filename: String,
    /// Payload size in bytes
    pub size: usize,
    /// Response `Content-Type`, if any
    pub content_type: Option<String>,
}
