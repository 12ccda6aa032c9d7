use serde::{Deserialize, Serialize};

// =============================================================================
// System Info
// =============================================================================

/// Server metadata from `/api/system-info`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemInfo {
    /// Server operating system name
    pub os: String,
    /// Absolute root of the store on the server
    pub root_dir: String,
}

// =============================================================================
// Directory Listing
// =============================================================================

/// File vs directory discriminator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    File,
    Directory,
}

/// One entry of a directory listing.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "WireEntry")]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
    /// Size in bytes (0 or absent for directories)
    pub size: Option<u64>,
    /// Server-formatted modification time
    pub modified: Option<String>,
    /// Guessed MIME type, files only
    pub mimetype: Option<String>,
}

impl DirEntry {
    /// Check if this entry is a directory.
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Entry as it appears on the wire.
///
/// The server reports `is_dir`; other deployments send `type`. Either one
/// decides the kind, `is_dir: true` winning if both are present.
#[derive(Deserialize)]
struct WireEntry {
    name: String,
    #[serde(default)]
    is_dir: Option<bool>,
    #[serde(default, rename = "type")]
    kind: Option<EntryKind>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    modified: Option<String>,
    #[serde(default)]
    mimetype: Option<String>,
}

impl From<WireEntry> for DirEntry {
    fn from(wire: WireEntry) -> Self {
        let kind = match (wire.is_dir, wire.kind) {
            (Some(true), _) => EntryKind::Directory,
            (Some(false), _) => EntryKind::File,
            (None, Some(kind)) => kind,
            (None, None) => EntryKind::File,
        };
        Self {
            name: wire.name,
            kind,
            size: wire.size,
            modified: wire.modified,
            mimetype: wire.mimetype,
        }
    }
}

/// Result of `/api/list`, in server order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct DirectoryListing {
    #[serde(alias = "entries", default)]
    pub items: Vec<DirEntry>,
}

impl DirectoryListing {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over entries in server order.
    pub fn iter(&self) -> impl Iterator<Item = &DirEntry> {
        self.items.iter()
    }

    /// Look up an entry by exact name.
    pub fn get(&self, name: &str) -> Option<&DirEntry> {
        self.items.iter().find(|e| e.name == name)
    }
}

impl IntoIterator for DirectoryListing {
    type Item = DirEntry;
    type IntoIter = std::vec::IntoIter<DirEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
