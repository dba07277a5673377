use std::path::Path;

use humansize::BINARY;
use walkdir::WalkDir;

/// Apparent size of everything under `path`: the sum of the lengths of all
/// regular files. Unreadable entries count as zero.
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::trace!(error = %err, "Skipping unreadable entry while sizing");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Format size in human-readable binary units
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, BINARY)
}
