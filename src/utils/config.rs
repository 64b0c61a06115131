//! Configuration and constants for the analyzer.
//!
//! Settings start from built-in defaults and are overridden by an optional
//! `KEY: value` file. The result is an immutable [`Config`] passed by reference.

use super::error::ConfigError;
use log::LevelFilter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Request methods the extractor recognizes
pub const REQUEST_METHODS: &[&str] = &["GET", "POST", "PUT"];

/// Placeholder in the report template replaced by the JSON table
pub const TABLE_PLACEHOLDER: &str = "$table_json";

/// Fractional digits kept when truncating derived report values
pub const TRUNCATE_FRACTIONAL_DIGITS: usize = 3;

pub const DEFAULT_REPORT_SIZE: usize = 1000;
pub const DEFAULT_REPORT_DIR: &str = "./reports";
pub const DEFAULT_LOG_DIR: &str = "./log";
pub const DEFAULT_REPORT_TEMPLATE: &str = "./templates/report.html";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Effective settings for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// Maximum number of rows in the rendered report
    pub report_size: usize,

    /// Directory reports are written to
    pub report_dir: PathBuf,

    /// Directory scanned for access logs
    pub log_dir: PathBuf,

    /// HTML template containing the table placeholder
    pub report_template: PathBuf,

    /// Diagnostic log file (stderr when unset)
    pub log_file: Option<PathBuf>,

    /// Diagnostic log verbosity, normalized to a `log` level name
    pub log_level: String,

    /// Keys present in the config file that the analyzer does not know
    #[serde(skip)]
    pub ignored_keys: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_size: DEFAULT_REPORT_SIZE,
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            report_template: PathBuf::from(DEFAULT_REPORT_TEMPLATE),
            log_file: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            ignored_keys: Vec::new(),
        }
    }
}

impl Config {
    /// Build the configuration for a run
    ///
    /// **Public** - main entry point for configuration
    ///
    /// # Arguments
    /// * `path` - Optional config file; `None` yields the defaults
    ///
    /// # Errors
    /// * `ConfigError::Unreadable` - The file was given but cannot be read
    /// * Any error from [`Config::with_overrides`]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        Self::default().with_overrides(&text)
    }

    /// Apply `KEY: value` overrides on top of `self`
    ///
    /// Lines split on the first `:`. Blank lines and `#` comments are skipped.
    pub fn with_overrides(mut self, text: &str) -> Result<Self, ConfigError> {
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line.split_once(':').ok_or_else(|| ConfigError::MalformedLine {
                line_no: idx + 1,
                line: raw.to_string(),
            })?;
            let key = key.trim().to_ascii_uppercase();
            let value = value.trim();

            match key.as_str() {
                "REPORT_SIZE" => self.report_size = parse_report_size(value)?,
                "REPORT_DIR" => self.report_dir = PathBuf::from(value),
                "LOG_DIR" => self.log_dir = PathBuf::from(value),
                "REPORT_TEMPLATE" => self.report_template = PathBuf::from(value),
                "LOG_FILE" => {
                    self.log_file = if value.is_empty() {
                        None
                    } else {
                        Some(PathBuf::from(value))
                    }
                }
                "LOG_LEVEL" => self.log_level = normalize_log_level(value)?,
                _ => self.ignored_keys.push(key),
            }
        }

        Ok(self)
    }

    /// Verbosity as a `log` filter
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}

fn parse_report_size(value: &str) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidReportSize(value.to_string())),
    }
}

/// Accepts `log` level names plus the `WARNING`/`CRITICAL` spellings
fn normalize_log_level(value: &str) -> Result<String, ConfigError> {
    let lowered = value.to_ascii_lowercase();
    let name = match lowered.as_str() {
        "warning" => "warn",
        "critical" | "fatal" => "error",
        other => other,
    };

    LevelFilter::from_str(name)
        .map(|level| level.as_str().to_ascii_lowercase())
        .map_err(|_| ConfigError::InvalidLogLevel(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.report_size, 1000);
        assert_eq!(config.report_dir, PathBuf::from("./reports"));
        assert_eq!(config.log_dir, PathBuf::from("./log"));
        assert_eq!(config.log_file, None);
        assert_eq!(config.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let text = "REPORT_SIZE: 25\nLOG_DIR: /var/log/nginx\n\n# comment\nLOG_LEVEL: DEBUG\n";
        let config = Config::default().with_overrides(text).unwrap();

        assert_eq!(config.report_size, 25);
        assert_eq!(config.log_dir, PathBuf::from("/var/log/nginx"));
        assert_eq!(config.report_dir, PathBuf::from(DEFAULT_REPORT_DIR));
        assert_eq!(config.level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_value_keeps_later_colons() {
        let config = Config::default()
            .with_overrides("REPORT_DIR: C:\\reports")
            .unwrap();
        assert_eq!(config.report_dir, PathBuf::from("C:\\reports"));
    }

    #[test]
    fn test_unknown_keys_are_collected() {
        let config = Config::default().with_overrides("COLOR: blue").unwrap();
        assert_eq!(config.ignored_keys, vec!["COLOR".to_string()]);
    }

    #[test]
    fn test_malformed_line() {
        let err = Config::default().with_overrides("REPORT_SIZE 10").unwrap_err();
        assert!(matches!(err, ConfigError::MalformedLine { line_no: 1, .. }));
    }

    #[test]
    fn test_invalid_report_size() {
        assert!(Config::default().with_overrides("REPORT_SIZE: ten").is_err());
        assert!(Config::default().with_overrides("REPORT_SIZE: 0").is_err());
    }

    #[test]
    fn test_warning_and_critical_level_names() {
        let config = Config::default().with_overrides("LOG_LEVEL: WARNING").unwrap();
        assert_eq!(config.level_filter(), LevelFilter::Warn);

        let config = Config::default().with_overrides("LOG_LEVEL: CRITICAL").unwrap();
        assert_eq!(config.level_filter(), LevelFilter::Error);

        assert!(Config::default().with_overrides("LOG_LEVEL: loud").is_err());
    }

    #[test]
    fn test_load_without_path_is_default() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Some(Path::new("/definitely/not/here.conf")));
        assert!(matches!(result, Err(ConfigError::Unreadable { .. })));
    }
}
