//! Subcommand implementations.

pub mod clean;
pub mod scan;

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::ScanTargetArgs;
use crate::config::Config;
use crate::scanner::{aggregate, ResultSink, ScanOptions, ScanResult, ScanSummary, Scanner};

const TICK: Duration = Duration::from_millis(100);

/// Scan options from the config file, overridden by command-line flags.
pub fn scan_options(config: &Config, args: &ScanTargetArgs) -> ScanOptions {
    let mut options = config.scan_options();
    if let Some(days) = args.days {
        options = options.with_days(days);
    }
    if args.deep {
        options = options.with_deep(true);
    }
    if let Some(jobs) = args.jobs {
        options = options.with_threads(jobs);
    }
    options
}

/// Threshold in days as shown to the user.
pub fn threshold_days(config: &Config, args: &ScanTargetArgs) -> u32 {
    args.days.unwrap_or(config.scan.days)
}

pub fn build_scanner(config: &Config, args: &ScanTargetArgs) -> Scanner {
    Scanner::new(
        config.matcher_table(),
        config.blocklist(),
        scan_options(config, args),
    )
}

/// Run a scan into `sink`, optionally with a "Scanned: N directories"
/// spinner on stderr fed by the scanner's progress counter.
pub fn run_scan<S: ResultSink>(
    scanner: &Scanner,
    root: &Path,
    sink: &mut S,
    show_progress: bool,
) -> crate::Result<ScanSummary> {
    let stream = scanner.scan(root)?;
    if !show_progress {
        return aggregate(stream, sink);
    }

    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(TICK);

    let progress = scanner.progress();
    let done = AtomicBool::new(false);

    let summary = thread::scope(|scope| {
        scope.spawn(|| {
            while !done.load(Ordering::Relaxed) {
                bar.set_message(format!(
                    "Scanned: {} directories...",
                    progress.dirs_scanned()
                ));
                thread::sleep(TICK);
            }
        });

        let mut sink = SpinnerSink {
            inner: &mut *sink,
            bar: &bar,
        };
        let summary = aggregate(stream, &mut sink);
        done.store(true, Ordering::Relaxed);
        summary
    });

    bar.finish_and_clear();
    summary
}

/// Keeps result lines from tearing the spinner.
struct SpinnerSink<'a, S> {
    inner: S,
    bar: &'a ProgressBar,
}

impl<S: ResultSink> ResultSink for SpinnerSink<'_, S> {
    fn accept(&mut self, result: ScanResult) -> io::Result<()> {
        let inner = &mut self.inner;
        self.bar.suspend(|| inner.accept(result))
    }

    fn finish(&mut self, summary: &ScanSummary) -> io::Result<()> {
        self.bar.finish_and_clear();
        self.inner.finish(summary)
    }
}
