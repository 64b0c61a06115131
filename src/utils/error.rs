//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config line {line_no}: {line:?} (expected `KEY: value`)")]
    MalformedLine { line_no: usize, line: String },

    #[error("Invalid REPORT_SIZE {0:?}: must be a positive integer")]
    InvalidReportSize(String),

    #[error("Invalid LOG_LEVEL {0:?}")]
    InvalidLogLevel(String),

    #[error("Cannot open log file {path}: {source}")]
    LogFileUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while locating or reading log input
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Log directory does not exist: {0}")]
    LogDirMissing(PathBuf),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while extracting a request from a log line
#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("Line {line_no}: request duration {token:?} is not a valid number")]
    InvalidDuration { line_no: usize, token: String },

    #[error("Line {line_no}: request method is not followed by a URL")]
    MissingUrl { line_no: usize },
}

/// Errors that can occur during one aggregation pass
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to read log line: {0}")]
    Read(#[from] std::io::Error),

    #[error("Interrupted by operator")]
    Interrupted,
}

/// Errors that can occur during report output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Cannot read report template {path}: {source}")]
    TemplateUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Report template {0} has no $table_json placeholder")]
    MissingPlaceholder(PathBuf),

    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
