//! Deletion of selected cache directories.
//!
//! This module provides:
//! - Parsing of the interactive selection
//! - Independent, parallel deletion of each selected directory

mod executor;
mod selection;

pub use executor::{CleanExecutor, CleanOptions, CleanResult, CleanSummary};
pub use selection::{parse_selection, SelectionError};
