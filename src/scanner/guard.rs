//! Protection against walking into system and tool directories.

use std::collections::HashSet;
use std::path::{Component, Path};

use super::matcher::MatcherTable;

/// Directory names that must never be entered.
///
/// Comparison is case-insensitive, so `Library` also blocks `library`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocklist {
    /// Entries as configured
    names: Vec<String>,
    /// Lowercased entries used for comparison
    folded: HashSet<String>,
}

impl Blocklist {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let folded = names.iter().map(|n| n.to_lowercase()).collect();
        Self { names, folded }
    }

    /// The built-in blocklist: OS, IDE and toolchain homes.
    pub fn defaults() -> Self {
        Self::new([
            "AppData",
            "Library",
            ".vscode",
            ".antigravity",
            ".rustup",
            ".cargo",
            "Program Files",
            "Windows",
            "System32",
            "node_modules",
        ])
    }

    /// Whether `segment` equals an entry, ignoring case.
    pub fn contains(&self, segment: &str) -> bool {
        !self.folded.is_empty() && self.folded.contains(&segment.to_lowercase())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for Blocklist {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Decides whether a path may be traversed or reported.
///
/// A path is unsafe when any of its segments is blocklisted, unless that
/// exact segment is also a cache directory name from the matcher table.
#[derive(Debug, Clone)]
pub struct SafetyGuard {
    blocklist: Blocklist,
    target_dirs: HashSet<String>,
}

impl SafetyGuard {
    pub fn new(blocklist: &Blocklist, matchers: &MatcherTable) -> Self {
        Self {
            blocklist: blocklist.clone(),
            target_dirs: matchers.iter().map(|m| m.target_dir.clone()).collect(),
        }
    }

    pub fn is_safe(&self, path: &Path) -> bool {
        if self.blocklist.is_empty() {
            return true;
        }

        path.components().all(|component| match component {
            Component::Normal(name) => {
                let name = name.to_string_lossy();
                !self.blocklist.contains(&name) || self.target_dirs.contains(&*name)
            }
            _ => true,
        })
    }
}

/// Standalone form of [`SafetyGuard::is_safe`] for one-off checks.
pub fn is_safe(path: &Path, blocklist: &Blocklist, matchers: &MatcherTable) -> bool {
    SafetyGuard::new(blocklist, matchers).is_safe(path)
}
