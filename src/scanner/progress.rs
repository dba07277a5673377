use std::sync::atomic::{AtomicU64, Ordering};

/// Live scan counters shared between walkers and whoever displays progress.
#[derive(Debug, Default)]
pub struct ScanProgress {
    dirs_scanned: AtomicU64,
}

impl ScanProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one visited directory.
    pub fn record_dir(&self) {
        self.dirs_scanned.fetch_add(1, Ordering::Relaxed);
    }

    /// Start counting again from zero.
    pub fn reset(&self) {
        self.dirs_scanned.store(0, Ordering::Relaxed);
    }

    /// Directories visited so far.
    pub fn dirs_scanned(&self) -> u64 {
        self.dirs_scanned.load(Ordering::Relaxed)
    }
}
