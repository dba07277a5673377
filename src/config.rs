use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::scanner::{Blocklist, MatcherTable, ProjectMatcher, ScanOptions, DEFAULT_RESULT_BUFFER};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Protected directory names (None = built-in list)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocklist: Option<Vec<String>>,
    pub scan: ScanConfig,
    pub clean: CleanConfig,
    /// Cache directory table (None = built-in table)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matchers: Option<Vec<ProjectMatcher>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Age threshold in days
    pub days: u32,
    /// Use directory mtimes instead of anchor files
    pub deep: bool,
    /// Parallel subtree walkers (0 = twice the CPU count)
    pub threads: usize,
    /// Result channel capacity
    pub buffer: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Parallel deletion jobs
    pub jobs: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            days: 30,
            deep: false,
            threads: 0,
            buffer: DEFAULT_RESULT_BUFFER,
        }
    }
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self { jobs: 4 }
    }
}

impl Config {
    /// Default config file location (`~/.config/tidyup/config.toml` on Linux)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tidyup").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used when present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.is_file() => path,
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;

        let config = Self::parse(&content, &path)?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Parse and validate TOML content; `path` is only used in errors.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.scan.buffer == 0 {
            return Err(ConfigError::Invalid(
                "scan.buffer must be greater than 0".into(),
            ));
        }
        if self.clean.jobs == 0 {
            return Err(ConfigError::Invalid("clean.jobs must be greater than 0".into()));
        }
        self.matcher_table().validate()
    }

    /// Matcher table to scan with
    pub fn matcher_table(&self) -> MatcherTable {
        match &self.matchers {
            Some(matchers) => MatcherTable::new(matchers.clone()),
            None => MatcherTable::defaults(),
        }
    }

    /// Blocklist to scan with
    pub fn blocklist(&self) -> Blocklist {
        match &self.blocklist {
            Some(names) => Blocklist::new(names.iter().cloned()),
            None => Blocklist::defaults(),
        }
    }

    /// Scan options from the `[scan]` section
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::new()
            .with_deep(self.scan.deep)
            .with_days(self.scan.days)
            .with_threads(self.scan.threads)
            .with_buffer(self.scan.buffer)
    }
}
