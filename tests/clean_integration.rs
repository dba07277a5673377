//! Integration tests for the clean command.

use assert_cmd::Command;
use filetime::FileTime;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use tidyup::cleaner::{CleanExecutor, CleanOptions, CleanResult};
use tidyup::scanner::{Blocklist, MatcherTable, ScanOptions, ScanResult, Scanner};

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

fn tidyup() -> Command {
    Command::cargo_bin("tidyup").unwrap()
}

fn age(path: &Path, days: u32) {
    let when = SystemTime::now() - DAY * days;
    filetime::set_file_mtime(path, FileTime::from_system_time(when)).unwrap();
}

struct Workspace {
    tmp: TempDir,
    rust_target: PathBuf,
    node_modules: PathBuf,
    gradle_build: PathBuf,
    fresh_target: PathBuf,
}

/// A tree with three stale caches, one fresh one and some plain folders.
fn create_test_workspace() -> Workspace {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    // Rust/Cargo project
    let rust_proj = root.join("rust-app");
    fs::create_dir_all(rust_proj.join("src")).unwrap();
    fs::write(rust_proj.join("Cargo.toml"), "[package]\nname = \"rust-app\"").unwrap();
    fs::write(rust_proj.join("src/main.rs"), "fn main() {}").unwrap();
    fs::create_dir_all(rust_proj.join("target/debug")).unwrap();
    fs::write(rust_proj.join("target/debug/rust-app"), "x".repeat(50000)).unwrap();
    age(&rust_proj.join("Cargo.toml"), 60);

    // Node.js/npm project
    let node_proj = root.join("web-app");
    fs::create_dir_all(node_proj.join("node_modules/lodash")).unwrap();
    fs::write(node_proj.join("package.json"), r#"{"name": "web-app"}"#).unwrap();
    fs::write(
        node_proj.join("node_modules/lodash/index.js"),
        "x".repeat(20000),
    )
    .unwrap();
    age(&node_proj.join("package.json"), 60);

    // Nested Gradle project
    let gradle_proj = root.join("projects/mobile/android-app");
    fs::create_dir_all(gradle_proj.join("build/outputs")).unwrap();
    fs::write(gradle_proj.join("build.gradle"), "apply plugin: 'android'").unwrap();
    fs::write(gradle_proj.join("build/outputs/app.apk"), "x".repeat(100000)).unwrap();
    age(&gradle_proj.join("build.gradle"), 60);

    // Recently edited project, kept
    let fresh = root.join("active");
    fs::create_dir_all(fresh.join("target")).unwrap();
    fs::write(fresh.join("Cargo.toml"), "[package]\nname = \"active\"").unwrap();

    // Regular directory (not a project)
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::write(root.join("docs/readme.md"), "# Documentation").unwrap();

    Workspace {
        rust_target: rust_proj.join("target"),
        node_modules: node_proj.join("node_modules"),
        gradle_build: gradle_proj.join("build"),
        fresh_target: fresh.join("target"),
        tmp,
    }
}

fn scan(root: &Path) -> Vec<ScanResult> {
    let scanner = Scanner::new(
        MatcherTable::defaults(),
        Blocklist::defaults(),
        ScanOptions::new(),
    );
    let mut results: Vec<ScanResult> = scanner.scan(root).unwrap().collect();
    results.sort_by(|a, b| a.path.cmp(&b.path));
    results
}

#[test]
fn test_scan_then_clean_all() {
    let ws = create_test_workspace();

    let targets = scan(ws.tmp.path());
    assert_eq!(targets.len(), 3);

    let executor = CleanExecutor::new(
        CleanOptions::default(),
        Blocklist::defaults(),
        MatcherTable::defaults(),
    );
    let results = executor.clean_all(&targets);
    let summary = CleanExecutor::summarize(&results);

    assert_eq!(summary.success_count, 3);
    assert_eq!(summary.total_freed, 50000 + 20000 + 100000);
    assert!(!ws.rust_target.exists());
    assert!(!ws.node_modules.exists());
    assert!(!ws.gradle_build.exists());
    assert!(ws.fresh_target.exists());
    // Anchors and sources stay
    assert!(ws.tmp.path().join("rust-app/Cargo.toml").exists());
    assert!(ws.tmp.path().join("rust-app/src/main.rs").exists());

    assert!(scan(ws.tmp.path()).is_empty());
}

#[test]
fn test_clean_skips_target_that_vanished() {
    let ws = create_test_workspace();
    let targets = scan(ws.tmp.path());
    fs::remove_dir_all(&ws.node_modules).unwrap();

    let executor = CleanExecutor::new(
        CleanOptions::default(),
        Blocklist::defaults(),
        MatcherTable::defaults(),
    );
    let results = executor.clean_all(&targets);

    let skipped: Vec<_> = results
        .iter()
        .filter(|r| matches!(r, CleanResult::Skipped { .. }))
        .collect();
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0].target().path.ends_with("web-app/node_modules"));
    assert!(!ws.rust_target.exists());
}

#[test]
fn test_cli_clean_dry_run_keeps_everything() {
    let ws = create_test_workspace();

    tidyup()
        .args(["clean", "--dry-run", "--path"])
        .arg(ws.tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN]"))
        .stdout(predicate::str::contains("Total:"));

    assert!(ws.rust_target.exists());
    assert!(ws.node_modules.exists());
    assert!(ws.gradle_build.exists());
}

#[test]
fn test_cli_clean_force_deletes_stale_only() {
    let ws = create_test_workspace();

    tidyup()
        .args(["clean", "--force", "--path"])
        .arg(ws.tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted: 3 folders"));

    assert!(!ws.rust_target.exists());
    assert!(!ws.node_modules.exists());
    assert!(!ws.gradle_build.exists());
    assert!(ws.fresh_target.exists());
    assert!(ws.tmp.path().join("docs/readme.md").exists());
}

#[test]
fn test_cli_clean_prompt_selection() {
    let ws = create_test_workspace();

    // Sorted by path: projects/.../build, rust-app/target, web-app/node_modules
    tidyup()
        .args(["clean", "--path"])
        .arg(ws.tmp.path())
        .write_stdin("2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted: 1 folder"));

    assert!(ws.gradle_build.exists());
    assert!(!ws.rust_target.exists());
    assert!(ws.node_modules.exists());
}

#[test]
fn test_cli_clean_empty_selection_aborts() {
    let ws = create_test_workspace();

    tidyup()
        .args(["clean", "--path"])
        .arg(ws.tmp.path())
        .write_stdin("\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aborted."));

    assert!(ws.rust_target.exists());
    assert!(ws.node_modules.exists());
    assert!(ws.gradle_build.exists());
}

#[test]
fn test_cli_clean_nothing_found() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("docs")).unwrap();

    tidyup()
        .args(["clean", "--force", "--path"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No stale folders found"));
}
