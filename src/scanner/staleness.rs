//! Staleness decisions for matched cache directories.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use super::matcher::ProjectMatcher;

/// Which timestamp decides whether a cache is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Use the sibling anchor file's mtime; no anchor means no match.
    #[default]
    Anchor,
    /// Use the matched directory's own mtime; anchors are ignored.
    Deep,
}

/// Outcome of evaluating one directory against one matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The matcher does not apply (anchor file missing). Try the next one.
    NoMatch,
    /// The matcher applies but its timestamp could not be read.
    Unknown,
    /// Matched and recently touched.
    Fresh(SystemTime),
    /// Matched and older than the threshold.
    Stale(SystemTime),
}

impl Verdict {
    /// Whether a matcher committed to this directory. Decided directories
    /// are never descended into, stale or not.
    pub fn is_decision(&self) -> bool {
        !matches!(self, Verdict::NoMatch)
    }

    /// Reference time of a stale verdict.
    pub fn stale_since(&self) -> Option<SystemTime> {
        match self {
            Verdict::Stale(reference) => Some(*reference),
            _ => None,
        }
    }
}

/// `true` when `reference` lies strictly more than `threshold` before `now`.
/// Timestamps in the future are never stale.
pub fn is_stale(reference: SystemTime, threshold: Duration, now: SystemTime) -> bool {
    now.duration_since(reference)
        .map(|age| age > threshold)
        .unwrap_or(false)
}

/// Evaluate `dir` (a directory named `matcher.target_dir`) under `mode`.
pub fn evaluate(
    dir: &Path,
    matcher: &ProjectMatcher,
    mode: ScanMode,
    threshold: Duration,
    now: SystemTime,
) -> Verdict {
    let reference = match mode {
        ScanMode::Anchor => {
            let Some(parent) = dir.parent() else {
                return Verdict::NoMatch;
            };
            let anchor = parent.join(&matcher.anchor_file);
            match fs::metadata(&anchor) {
                Ok(meta) => meta.modified(),
                Err(_) => return Verdict::NoMatch,
            }
        }
        ScanMode::Deep => fs::metadata(dir).and_then(|meta| meta.modified()),
    };

    match reference {
        Ok(reference) if is_stale(reference, threshold, now) => Verdict::Stale(reference),
        Ok(reference) => Verdict::Fresh(reference),
        Err(err) => {
            tracing::debug!(path = %dir.display(), error = %err, "Cannot read reference time");
            Verdict::Unknown
        }
    }
}
