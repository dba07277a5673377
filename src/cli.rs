use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// TidyUp - find and remove stale dependency folders like node_modules or target
#[derive(Parser, Debug)]
#[command(name = "tidyup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan for stale project dependencies
    Scan(ScanArgs),

    /// Find and delete stale dependency folders
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Options shared by every command that scans.
#[derive(Args, Debug, Clone)]
pub struct ScanTargetArgs {
    /// Path to scan
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    /// Age threshold in days [default: 30]
    #[arg(short, long, value_name = "DAYS")]
    pub days: Option<u32>,

    /// Perform deep scan (ignore anchor files, use folder timestamps)
    #[arg(long)]
    pub deep: bool,

    /// Parallel scan threads [default: twice the CPU count]
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub target: ScanTargetArgs,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    #[command(flatten)]
    pub target: ScanTargetArgs,

    /// Delete everything found without asking
    #[arg(short, long)]
    pub force: bool,

    /// Show what would be deleted without doing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}
