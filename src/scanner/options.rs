use std::time::Duration;

use super::staleness::ScanMode;

/// Default capacity of the result channel between walkers and the consumer.
pub const DEFAULT_RESULT_BUFFER: usize = 100;

/// Default age threshold: 30 days.
pub const DEFAULT_THRESHOLD: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Configuration options for stale cache scanning.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Which timestamp decides staleness
    pub mode: ScanMode,

    /// Caches untouched for longer than this are stale
    pub threshold: Duration,

    /// Number of concurrent subtree walkers (0 = twice the CPU count)
    pub threads: usize,

    /// Capacity of the result channel
    pub buffer: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            mode: ScanMode::Anchor,
            threshold: DEFAULT_THRESHOLD,
            threads: 0,
            buffer: DEFAULT_RESULT_BUFFER,
        }
    }
}

impl ScanOptions {
    /// Create a new ScanOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for switching between anchor and deep mode
    pub fn with_deep(self, deep: bool) -> Self {
        self.with_mode(if deep { ScanMode::Deep } else { ScanMode::Anchor })
    }

    pub fn with_threshold(mut self, threshold: Duration) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the threshold in whole days
    pub fn with_days(self, days: u32) -> Self {
        self.with_threshold(Duration::from_secs(u64::from(days) * 24 * 60 * 60))
    }

    /// Set number of parallel walkers
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer;
        self
    }

    /// Walker count actually used: `threads`, or twice the CPU count when unset.
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get().saturating_mul(2).max(1)
        } else {
            self.threads
        }
    }
}
