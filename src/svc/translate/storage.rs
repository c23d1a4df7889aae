//! # Storage translation
//!
//! This module provide the storage profile blocks and their translation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::svc::{
    deadline::model::{FileSystemLocation, StorageProfileOperatingSystemFamily},
    translate::Error,
};

// -----------------------------------------------------------------------------
// FileSystemLocationBlock structure

#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct FileSystemLocationBlock {
    #[serde(rename = "name")]
    pub name: String,
    #[serde(rename = "path")]
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

// -----------------------------------------------------------------------------
// Resolve functions

/// `linux` and `macos` select their family, any other value selects windows
pub fn resolve_os_family(value: Option<&str>) -> StorageProfileOperatingSystemFamily {
    match value {
        Some("linux") => StorageProfileOperatingSystemFamily::Linux,
        Some("macos") => StorageProfileOperatingSystemFamily::Macos,
        _ => StorageProfileOperatingSystemFamily::Windows,
    }
}

// -----------------------------------------------------------------------------
// Translation

/// at least one location is required, each location type must be `local` or
/// `shared`
#[cfg_attr(feature = "trace", tracing::instrument)]
pub fn file_system_locations(
    blocks: &[FileSystemLocationBlock],
) -> Result<Vec<FileSystemLocation>, Error> {
    if blocks.is_empty() {
        return Err(Error::missing(
            "file_system_locations",
            "storage profile, at least one location is required",
        ));
    }

    blocks
        .iter()
        .map(|block| {
            Ok(FileSystemLocation {
                name: block.name.to_owned(),
                path: block.path.to_owned(),
                kind: block.kind.parse().map_err(Error::invalid("type"))?,
            })
        })
        .collect()
}
