use serde::{Deserialize, Serialize};

use super::annotator::AnnotatorDescriptor;

/// Archive entry holding the [`StorageManifest`]
pub const MANIFEST_ENTRY: &str = "Storage";

/// Current manifest version
pub const FORMAT_VERSION: u32 = 1;

/// Top-level table of contents of a storage archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageManifest {
    /// Manifest version
    #[serde(default = "default_version")]
    pub format_version: u32,
    /// Creation time (RFC 3339)
    #[serde(default)]
    pub created: String,
    /// One entry per database, in save order
    pub databases: Vec<ManifestEntry>,
}

fn default_version() -> u32 {
    FORMAT_VERSION
}

/// Manifest line of one database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Database id
    pub id: String,
    /// Database family, see [`DataBase::KIND`](super::DataBase::KIND)
    pub kind: String,
    /// Ids of the bound annotators, in order
    pub annotators: Vec<String>,
}

/// Content of the `<Kind>/<Id>` entry: what a database holds without its
/// references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataBaseSummary {
    /// Database id
    pub id: String,
    /// Database family
    pub kind: String,
    /// Number of references
    pub references: usize,
    /// Bound annotators
    pub annotators: Vec<AnnotatorDescriptor>,
}
