//! Clean command implementation.

use super::{build_scanner, run_scan, threshold_days};
use crate::cleaner::{parse_selection, CleanExecutor, CleanOptions, CleanResult};
use crate::cli::CleanArgs;
use crate::config::Config;
use crate::scanner::{format_size, install_interrupt_handler, CancelToken, ScanResult};
use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Run the clean command.
pub fn run(args: CleanArgs, config: &Config) -> Result<()> {
    let cancel = CancelToken::new();
    install_interrupt_handler(&cancel)?;

    let scanner = build_scanner(config, &args.target).with_cancel(cancel.clone());
    let path = &args.target.path;

    println!(
        "TidyUp is looking for targets in: {} (Older than {} days)",
        path.display(),
        threshold_days(config, &args.target)
    );

    let mut targets: Vec<ScanResult> = Vec::new();
    let summary = run_scan(&scanner, path, &mut targets, true)?;

    if cancel.is_cancelled() {
        println!("Interrupted.");
        return Ok(());
    }

    if targets.is_empty() {
        println!("No stale folders found. Your machine is already tidy!");
        return Ok(());
    }

    // Scan order depends on thread timing; number the list predictably.
    targets.sort_by(|a, b| a.path.cmp(&b.path));
    print_targets(&targets);
    println!(
        "\nTotal: {} in {} folder{}",
        format_size(summary.total_size),
        targets.len(),
        if targets.len() == 1 { "" } else { "s" }
    );

    let selected: Vec<ScanResult> = if args.force || args.dry_run {
        targets
    } else {
        let stdin = io::stdin();
        match prompt_selection(targets.len(), stdin.lock(), io::stdout(), &cancel)? {
            Some(indices) => indices.into_iter().map(|i| targets[i].clone()).collect(),
            None => {
                println!("Interrupted.");
                return Ok(());
            }
        }
    };

    if selected.is_empty() {
        println!("Aborted.");
        return Ok(());
    }

    let executor = CleanExecutor::new(
        CleanOptions {
            dry_run: args.dry_run,
            jobs: config.clean.jobs,
        },
        config.blocklist(),
        config.matcher_table(),
    )
    .with_cancel(cancel);

    if args.dry_run {
        println!("\n[DRY RUN] Would delete:");
    } else {
        println!("\nDeleting...");
    }

    let results = executor.clean_all(&selected);
    for result in &results {
        print_result(result, args.dry_run);
    }

    let summary = CleanExecutor::summarize(&results);
    println!("\nResults:");
    println!(
        "  Deleted: {} folder{}",
        summary.success_count,
        if summary.success_count == 1 { "" } else { "s" }
    );
    if summary.failed_count > 0 {
        println!(
            "  Failed:  {} folder{}",
            summary.failed_count,
            if summary.failed_count == 1 { "" } else { "s" }
        );
    }
    if summary.skipped_count > 0 {
        println!(
            "  Skipped: {} folder{}",
            summary.skipped_count,
            if summary.skipped_count == 1 { "" } else { "s" }
        );
    }
    println!("  Freed:   {}", format_size(summary.total_freed));

    if summary.failed_count > 0 {
        std::process::exit(5); // Partial failure
    }

    Ok(())
}

fn print_targets(targets: &[ScanResult]) {
    println!("\n  {:>4}  {:<10} {:>10}  {}", "#", "TYPE", "SIZE", "PATH");
    println!("  {}", "-".repeat(72));

    for (i, target) in targets.iter().enumerate() {
        println!(
            "  {:>4}  {:<10} {:>10}  {}",
            i + 1,
            target.kind,
            format_size(target.size),
            target.path.display(),
        );
    }
}

fn print_result(result: &CleanResult, dry_run: bool) {
    match result {
        CleanResult::Success { target, .. } if dry_run => {
            println!("  {}", target.path.display());
        }
        CleanResult::Success { target, freed_bytes } => {
            println!(
                "  Deleted {} ({})",
                target.path.display(),
                format_size(*freed_bytes)
            );
        }
        CleanResult::Failed { target, error } => {
            eprintln!("  Error deleting {}: {}", target.path.display(), error);
        }
        CleanResult::Skipped { target, reason } => {
            println!("  Skipped {}: {}", target.path.display(), reason);
        }
    }
}

/// Ask which of `count` listed folders to delete.
///
/// Re-prompts on malformed input. Blank input or end of input selects
/// nothing. Returns `None` when `cancel` fired while waiting for input;
/// the read itself is not interrupted, so the typed line is discarded.
fn prompt_selection<R: BufRead, W: Write>(
    count: usize,
    mut input: R,
    mut output: W,
    cancel: &CancelToken,
) -> io::Result<Option<Vec<usize>>> {
    loop {
        write!(
            output,
            "\nSelect folders to delete (e.g. 1,3-5 or 'all', empty to abort): "
        )?;
        output.flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line)?;
        if cancel.is_cancelled() {
            return Ok(None);
        }
        if read == 0 {
            return Ok(Some(Vec::new()));
        }

        match parse_selection(&line, count) {
            Ok(indices) => return Ok(Some(indices)),
            Err(e) => writeln!(output, "Invalid selection: {}", e)?,
        }
    }
}
