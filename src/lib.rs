//! TidyUp - Find and remove stale developer dependency caches
//!
//! This crate provides functionality for:
//! - Scanning a directory tree in parallel for cache directories
//!   (`node_modules`, `target`, `venv`, ...) that have gone stale
//! - Reporting them as text or JSON
//! - Deleting a selection of them

pub mod cleaner;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod scanner;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, TidyError};
