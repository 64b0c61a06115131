//! Report output.
//!
//! This module handles:
//! - The report-exists marker for a log date
//! - Template loading and `$table_json` substitution
//! - Atomic report writes

pub mod html;

// Re-export main functions
pub use html::{load_template, render_report, report_exists, report_path, write_report};

use crate::utils::error::OutputError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
