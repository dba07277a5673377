//! Executor for deleting selected cache directories.

use crate::scanner::{is_safe, Blocklist, CancelToken, MatcherTable, ScanResult};
use std::fs;
use std::io;

/// Result of deleting one target.
#[derive(Debug, Clone)]
pub enum CleanResult {
    /// Deletion succeeded.
    Success {
        target: ScanResult,
        freed_bytes: u64,
    },
    /// Deletion failed.
    Failed { target: ScanResult, error: String },
    /// Deletion was skipped.
    Skipped { target: ScanResult, reason: String },
}

impl CleanResult {
    pub fn target(&self) -> &ScanResult {
        match self {
            CleanResult::Success { target, .. }
            | CleanResult::Failed { target, .. }
            | CleanResult::Skipped { target, .. } => target,
        }
    }
}

/// Options for the clean executor.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// If true, don't actually delete anything.
    pub dry_run: bool,
    /// Number of deletions running at once.
    pub jobs: usize,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            jobs: 4,
        }
    }
}

/// Summary of cleaning results.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanSummary {
    /// Number of successfully deleted directories.
    pub success_count: usize,
    /// Number of failed deletions.
    pub failed_count: usize,
    /// Number of skipped directories.
    pub skipped_count: usize,
    /// Total bytes freed.
    pub total_freed: u64,
}

/// Deletes scan results, each one independently of the others.
///
/// Every target is re-checked against the safety guard right before removal,
/// since the tree may have changed since the scan.
pub struct CleanExecutor {
    options: CleanOptions,
    blocklist: Blocklist,
    matchers: MatcherTable,
    cancel: CancelToken,
}

impl CleanExecutor {
    pub fn new(options: CleanOptions, blocklist: Blocklist, matchers: MatcherTable) -> Self {
        Self {
            options,
            blocklist,
            matchers,
            cancel: CancelToken::new(),
        }
    }

    /// Skip remaining targets once `cancel` fires.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Delete one target.
    pub fn clean(&self, target: &ScanResult) -> CleanResult {
        if self.cancel.is_cancelled() {
            return CleanResult::Skipped {
                target: target.clone(),
                reason: "interrupted".to_string(),
            };
        }

        if !is_safe(&target.path, &self.blocklist, &self.matchers) {
            return CleanResult::Skipped {
                target: target.clone(),
                reason: "path is inside a protected directory".to_string(),
            };
        }

        match fs::symlink_metadata(&target.path) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return CleanResult::Skipped {
                    target: target.clone(),
                    reason: "not a directory".to_string(),
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return CleanResult::Skipped {
                    target: target.clone(),
                    reason: "already removed".to_string(),
                }
            }
            Err(e) => {
                return CleanResult::Failed {
                    target: target.clone(),
                    error: e.to_string(),
                }
            }
        }

        if self.options.dry_run {
            return CleanResult::Success {
                target: target.clone(),
                freed_bytes: target.size,
            };
        }

        match fs::remove_dir_all(&target.path) {
            Ok(()) => {
                tracing::info!(path = %target.path.display(), "Deleted");
                CleanResult::Success {
                    target: target.clone(),
                    freed_bytes: target.size,
                }
            }
            Err(e) => {
                tracing::warn!(path = %target.path.display(), error = %e, "Failed to delete");
                CleanResult::Failed {
                    target: target.clone(),
                    error: e.to_string(),
                }
            }
        }
    }

    /// Delete all targets on a pool of `jobs` threads.
    ///
    /// Results come back in the order of `targets`. A failure on one target
    /// never stops the others.
    pub fn clean_all(&self, targets: &[ScanResult]) -> Vec<CleanResult> {
        use rayon::prelude::*;

        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.jobs.max(1))
            .build()
        {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot start deletion pool, deleting sequentially");
                return targets.iter().map(|t| self.clean(t)).collect();
            }
        };

        pool.install(|| targets.par_iter().map(|t| self.clean(t)).collect())
    }

    /// Get summary statistics from results.
    pub fn summarize(results: &[CleanResult]) -> CleanSummary {
        let mut summary = CleanSummary::default();

        for result in results {
            match result {
                CleanResult::Success { freed_bytes, .. } => {
                    summary.success_count += 1;
                    summary.total_freed += freed_bytes;
                }
                CleanResult::Failed { .. } => {
                    summary.failed_count += 1;
                }
                CleanResult::Skipped { .. } => {
                    summary.skipped_count += 1;
                }
            }
        }

        summary
    }
}
