//! Scan command implementation

use super::{build_scanner, run_scan, threshold_days};
use crate::cli::ScanArgs;
use crate::config::Config;
use crate::scanner::{install_interrupt_handler, CancelToken, JsonReporter, ScanMode, TextReporter};
use anyhow::Result;
use std::io;

/// Run the scan command
pub fn run(args: ScanArgs, config: &Config) -> Result<()> {
    let cancel = CancelToken::new();
    install_interrupt_handler(&cancel)?;

    let scanner = build_scanner(config, &args.target).with_cancel(cancel);
    let path = &args.target.path;

    tracing::info!(path = %path.display(), mode = ?scanner.options().mode, "Scanning directory");

    let stdout = io::stdout();
    if args.json {
        // Machine-readable output: no banner, no spinner.
        let mut reporter = JsonReporter::new(stdout.lock());
        run_scan(&scanner, path, &mut reporter, false)?;
        return Ok(());
    }

    if scanner.options().mode == ScanMode::Deep {
        println!("DEEP SCAN ENABLED: ignoring anchor files, using folder timestamps.");
    }
    println!(
        "TidyUp Scanning: {} (Older than {} days)",
        path.display(),
        threshold_days(config, &args.target)
    );

    let mut reporter = TextReporter::new(stdout.lock());
    run_scan(&scanner, path, &mut reporter, true)?;

    Ok(())
}
