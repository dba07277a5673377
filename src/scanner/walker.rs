use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

use crossbeam_channel::{bounded, Receiver, Sender};
use walkdir::WalkDir;

use crate::error::{Result, TidyError};

use super::cancel::CancelToken;
use super::entry::ScanResult;
use super::guard::{Blocklist, SafetyGuard};
use super::matcher::MatcherTable;
use super::options::ScanOptions;
use super::progress::ScanProgress;
use super::size::dir_size;
use super::staleness::{evaluate, ScanMode, Verdict};

/// Directory that is always pruned, whatever the blocklist says.
const VCS_DIR: &str = ".git";

/// Finds stale cache directories under a root, walking top-level subtrees
/// in parallel.
pub struct Scanner {
    matchers: MatcherTable,
    guard: SafetyGuard,
    options: ScanOptions,
    progress: Arc<ScanProgress>,
    cancel: CancelToken,
}

impl Scanner {
    pub fn new(matchers: MatcherTable, blocklist: Blocklist, options: ScanOptions) -> Self {
        let guard = SafetyGuard::new(&blocklist, &matchers);
        Self {
            matchers,
            guard,
            options,
            progress: Arc::new(ScanProgress::new()),
            cancel: CancelToken::new(),
        }
    }

    /// Stop walking as soon as `cancel` fires.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Counter of directories visited by the current scan. Each call to
    /// [`Scanner::scan`] starts it again from zero.
    pub fn progress(&self) -> Arc<ScanProgress> {
        Arc::clone(&self.progress)
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Start scanning `root` and return the stream of stale directories.
    ///
    /// Errors reaching the root itself are returned here; everything below
    /// the root is best effort. Each safe child directory of the root becomes
    /// one walk task on a pool of [`ScanOptions::effective_threads`] workers.
    /// The stream ends once every task has finished. Dropping the stream
    /// early stops the walkers at their next directory.
    pub fn scan(&self, root: &Path) -> Result<ScanStream> {
        let root = root.canonicalize().map_err(|e| TidyError::io(root, e))?;
        let metadata = fs::metadata(&root).map_err(|e| TidyError::io(&root, e))?;
        if !metadata.is_dir() {
            return Err(TidyError::NotADirectory(root));
        }

        let read_dir = fs::read_dir(&root).map_err(|e| TidyError::io(&root, e))?;
        let subtrees: Vec<PathBuf> = read_dir
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::debug!(error = %err, "Skipping unreadable root entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|entry| entry.path())
            .filter(|path| {
                let safe = self.guard.is_safe(path);
                if !safe {
                    tracing::debug!(path = %path.display(), "Pruning protected directory");
                }
                safe
            })
            .collect();

        let threads = self.options.effective_threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|idx| format!("tidyup-walk-{}", idx))
            .build()
            .map_err(|e| TidyError::ThreadPool(e.to_string()))?;

        self.progress.reset();
        let stop = CancelToken::new();

        tracing::info!(
            root = %root.display(),
            subtrees = subtrees.len(),
            threads,
            mode = ?self.options.mode,
            "Starting scan"
        );

        let walker = SubtreeWalker {
            matchers: self.matchers.clone(),
            guard: self.guard.clone(),
            mode: self.options.mode,
            threshold: self.options.threshold,
            now: SystemTime::now(),
            progress: Arc::clone(&self.progress),
            cancel: self.cancel.clone(),
            stop: stop.clone(),
        };

        let (tx, rx) = bounded(self.options.buffer);
        // One sender per task: the stream closes when the last task returns.
        let tasks: Vec<(PathBuf, Sender<ScanResult>)> = subtrees
            .into_iter()
            .map(|subtree| (subtree, tx.clone()))
            .collect();
        drop(tx);

        let coordinator = thread::Builder::new()
            .name("tidyup-scan".to_string())
            .spawn(move || {
                let walker = &walker;
                pool.scope(|scope| {
                    for (subtree, tx) in tasks {
                        scope.spawn(move |_| walker.walk(&subtree, &tx));
                    }
                });
                tracing::debug!(
                    dirs = walker.progress.dirs_scanned(),
                    "All subtree walkers finished"
                );
            })
            .map_err(|e| TidyError::ThreadPool(e.to_string()))?;

        Ok(ScanStream {
            receiver: rx,
            coordinator: Some(coordinator),
            progress: Arc::clone(&self.progress),
            stop,
        })
    }
}

/// Stale directories as walkers find them.
///
/// Arrival order across subtrees is not deterministic. Within one subtree,
/// results follow a pre-order walk.
pub struct ScanStream {
    receiver: Receiver<ScanResult>,
    coordinator: Option<JoinHandle<()>>,
    progress: Arc<ScanProgress>,
    stop: CancelToken,
}

impl ScanStream {
    pub fn progress(&self) -> &Arc<ScanProgress> {
        &self.progress
    }

    fn join(&mut self) {
        if let Some(handle) = self.coordinator.take() {
            if handle.join().is_err() {
                tracing::error!("Scan worker panicked; results may be incomplete");
            }
        }
    }
}

/// Walkers may be far from their next send; tell them directly that nobody
/// is listening. Joining here could block on a long walk, so the coordinator
/// is left to wind down on its own.
impl Drop for ScanStream {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}

impl Iterator for ScanStream {
    type Item = ScanResult;

    fn next(&mut self) -> Option<ScanResult> {
        match self.receiver.recv() {
            Ok(result) => Some(result),
            Err(_) => {
                self.join();
                None
            }
        }
    }
}

/// What to do with a directory the walk just reached.
enum Visit {
    Descend,
    Prune,
    Report(ScanResult),
}

/// Per-scan state shared (read-only) by all walk tasks.
struct SubtreeWalker {
    matchers: MatcherTable,
    guard: SafetyGuard,
    mode: ScanMode,
    threshold: Duration,
    now: SystemTime,
    progress: Arc<ScanProgress>,
    /// Caller-driven cancellation (signals)
    cancel: CancelToken,
    /// Fired when the stream is dropped
    stop: CancelToken,
}

impl SubtreeWalker {
    fn should_stop(&self) -> bool {
        self.cancel.is_cancelled() || self.stop.is_cancelled()
    }

    fn walk(&self, subtree: &Path, tx: &Sender<ScanResult>) {
        let mut entries = WalkDir::new(subtree).into_iter();

        while let Some(entry) = entries.next() {
            if self.should_stop() {
                tracing::debug!(subtree = %subtree.display(), "Scan stopped");
                return;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(error = %err, "Skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }
            self.progress.record_dir();

            match self.visit(&entry) {
                Visit::Descend => {}
                Visit::Prune => entries.skip_current_dir(),
                Visit::Report(result) => {
                    entries.skip_current_dir();
                    if tx.send(result).is_err() {
                        tracing::debug!("Result consumer hung up, stopping walk");
                        return;
                    }
                }
            }
        }
    }

    fn visit(&self, entry: &walkdir::DirEntry) -> Visit {
        let path = entry.path();

        if !self.guard.is_safe(path) {
            tracing::debug!(path = %path.display(), "Pruning protected directory");
            return Visit::Prune;
        }

        let Some(name) = entry.file_name().to_str() else {
            return Visit::Descend;
        };

        if name == VCS_DIR {
            return Visit::Prune;
        }

        for matcher in self.matchers.candidates(name) {
            match evaluate(path, matcher, self.mode, self.threshold, self.now) {
                Verdict::NoMatch => continue,
                Verdict::Stale(modified) => {
                    let size = dir_size(path);
                    tracing::debug!(
                        path = %path.display(),
                        kind = %matcher.name,
                        size,
                        "Found stale directory"
                    );
                    return Visit::Report(ScanResult {
                        kind: matcher.name.clone(),
                        path: path.to_path_buf(),
                        size,
                        modified,
                    });
                }
                Verdict::Fresh(_) | Verdict::Unknown => {
                    tracing::trace!(path = %path.display(), kind = %matcher.name, "Skipping recent directory");
                    return Visit::Prune;
                }
            }
        }

        Visit::Descend
    }
}
