//! Stale cache discovery.
//!
//! This module provides:
//! - The matcher table of known cache directories and their anchor files
//! - The safety guard that keeps the walk out of protected directories
//! - Staleness evaluation (anchor or deep mode) and size calculation
//! - The parallel scanner and the aggregator that drains its results

mod aggregate;
mod cancel;
mod entry;
mod formatter;
mod guard;
mod matcher;
mod options;
mod progress;
mod size;
mod staleness;
mod walker;

pub use aggregate::{aggregate, ResultSink, ScanSummary};
pub use cancel::{install_interrupt_handler, CancelToken};
pub use entry::ScanResult;
pub use formatter::{format_line, format_summary, JsonReporter, TextReporter};
pub use guard::{is_safe, Blocklist, SafetyGuard};
pub use matcher::{MatcherTable, ProjectMatcher};
pub use options::{ScanOptions, DEFAULT_RESULT_BUFFER, DEFAULT_THRESHOLD};
pub use progress::ScanProgress;
pub use size::{dir_size, format_size};
pub use staleness::{evaluate, is_stale, ScanMode, Verdict};
pub use walker::{ScanStream, Scanner};
