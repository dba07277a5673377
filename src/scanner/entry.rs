use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};

/// A stale cache directory found by the scanner.
///
/// Serializes to `{"type", "path", "size", "last_modified"}`; these field
/// names are the JSON output format and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    /// Kind of project the directory belongs to (e.g. "Node.js")
    #[serde(rename = "type")]
    pub kind: String,

    /// Absolute path of the cache directory. Non-UTF-8 bytes are written
    /// as U+FFFD in JSON.
    #[serde(serialize_with = "serialize_path")]
    pub path: PathBuf,

    /// Apparent size in bytes (sum of file sizes)
    pub size: u64,

    /// Timestamp the staleness decision was based on
    #[serde(rename = "last_modified", serialize_with = "serialize_timestamp")]
    pub modified: SystemTime,
}

impl ScanResult {
    /// Reference time in the local timezone.
    pub fn modified_local(&self) -> DateTime<Local> {
        DateTime::<Local>::from(self.modified)
    }
}

fn serialize_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

fn serialize_timestamp<S: Serializer>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&DateTime::<Local>::from(*time).to_rfc3339())
}
