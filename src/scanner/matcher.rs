//! Table of known dependency/build cache directories.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Describes one kind of cache directory and the file that anchors it.
///
/// `target_dir` is compared against a directory's own name. `anchor_file`
/// is looked up next to that directory, in the same parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMatcher {
    /// Kind reported for matches (e.g. "Node.js").
    pub name: String,
    /// Directory name to match (e.g. "node_modules").
    pub target_dir: String,
    /// Sibling file whose mtime marks the project as last worked on.
    pub anchor_file: String,
}

impl ProjectMatcher {
    pub fn new(
        name: impl Into<String>,
        target_dir: impl Into<String>,
        anchor_file: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target_dir: target_dir.into(),
            anchor_file: anchor_file.into(),
        }
    }
}

/// Ordered, read-only list of matchers consulted during a scan.
///
/// Order matters: when several matchers share a `target_dir`, they are
/// tried in table order and the first one whose anchor exists wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherTable {
    matchers: Vec<ProjectMatcher>,
}

impl MatcherTable {
    /// Create a table from an explicit list of matchers.
    pub fn new(matchers: Vec<ProjectMatcher>) -> Self {
        Self { matchers }
    }

    /// The built-in table.
    ///
    /// # Example
    /// ```
    /// use tidyup::scanner::MatcherTable;
    ///
    /// let table = MatcherTable::defaults();
    /// assert!(table.is_target_dir("node_modules"));
    /// assert_eq!(table.candidates("target").count(), 2);
    /// ```
    pub fn defaults() -> Self {
        Self::new(vec![
            ProjectMatcher::new("Node.js", "node_modules", "package.json"),
            ProjectMatcher::new("Rust", "target", "Cargo.toml"),
            ProjectMatcher::new("Python", "venv", "requirements.txt"),
            ProjectMatcher::new("Python", ".venv", "pyproject.toml"),
            ProjectMatcher::new("Maven", "target", "pom.xml"),
            ProjectMatcher::new("Gradle", "build", "build.gradle"),
        ])
    }

    /// Matchers whose `target_dir` equals `dir_name` exactly, in table order.
    pub fn candidates<'a>(&'a self, dir_name: &'a str) -> impl Iterator<Item = &'a ProjectMatcher> {
        self.matchers.iter().filter(move |m| m.target_dir == dir_name)
    }

    /// Whether any matcher targets a directory called `dir_name`.
    pub fn is_target_dir(&self, dir_name: &str) -> bool {
        self.matchers.iter().any(|m| m.target_dir == dir_name)
    }

    /// Distinct kind names, in table order.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = Vec::new();
        for matcher in &self.matchers {
            if !kinds.contains(&matcher.name.as_str()) {
                kinds.push(&matcher.name);
            }
        }
        kinds
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectMatcher> {
        self.matchers.iter()
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Reject entries that could never match a single directory entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (idx, matcher) in self.matchers.iter().enumerate() {
            if matcher.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "matcher #{} has an empty name",
                    idx + 1
                )));
            }
            for (field, value) in [
                ("target_dir", &matcher.target_dir),
                ("anchor_file", &matcher.anchor_file),
            ] {
                if value.is_empty() || value.contains(['/', '\\']) || value == "." || value == ".."
                {
                    return Err(ConfigError::Invalid(format!(
                        "matcher '{}' has an invalid {}: {:?}",
                        matcher.name, field, value
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for MatcherTable {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_contain_common_caches() {
        let table = MatcherTable::defaults();

        assert_eq!(table.len(), 6);
        for dir in ["node_modules", "target", "venv", ".venv", "build"] {
            assert!(table.is_target_dir(dir), "missing {}", dir);
        }
        assert!(!table.is_target_dir("src"));
    }

    #[test]
    fn test_candidates_preserve_table_order() {
        let table = MatcherTable::defaults();
        let kinds: Vec<&str> = table.candidates("target").map(|m| m.name.as_str()).collect();

        assert_eq!(kinds, vec!["Rust", "Maven"]);
    }

    #[test]
    fn test_candidates_are_case_sensitive() {
        let table = MatcherTable::defaults();

        assert_eq!(table.candidates("Target").count(), 0);
        assert_eq!(table.candidates("NODE_MODULES").count(), 0);
    }

    #[test]
    fn test_kinds_are_distinct() {
        let table = MatcherTable::defaults();

        assert_eq!(
            table.kinds(),
            vec!["Node.js", "Rust", "Python", "Maven", "Gradle"]
        );
    }

    #[test]
    fn test_empty_table() {
        let table = MatcherTable::new(vec![]);

        assert!(table.is_empty());
        assert!(!table.is_target_dir("target"));
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_paths_in_target() {
        let table = MatcherTable::new(vec![ProjectMatcher::new("Bad", "a/b", "x.json")]);
        let err = table.validate().unwrap_err();

        assert!(err.to_string().contains("target_dir"));
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let no_name = MatcherTable::new(vec![ProjectMatcher::new(" ", "dist", "package.json")]);
        let no_anchor = MatcherTable::new(vec![ProjectMatcher::new("Web", "dist", "")]);

        assert!(no_name.validate().is_err());
        assert!(no_anchor.validate().is_err());
        assert!(MatcherTable::defaults().validate().is_ok());
    }
}
