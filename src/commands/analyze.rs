//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Locates the newest dated log
//! 2. Skips the run if that date already has a report
//! 3. Loads the report template
//! 4. Streams and aggregates the log
//! 5. Compiles, renders and writes the report

use crate::aggregator::{aggregate_lines, calculate_distribution, compile_report};
use crate::input::{find_latest_log, open_log, LogFile};
use crate::output::{load_template, render_report, report_exists, report_path, write_report};
use crate::utils::config::Config;
use crate::utils::error::{AnalyzeError, InputError};
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

/// How a run ended, when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Log directory missing or holding no dated log
    NoLogFound,

    /// The newest log already has a report
    AlreadyReported { report: PathBuf },

    /// A new report was written
    Reported {
        report: PathBuf,
        rows: usize,
        lines_read: usize,
    },
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `config` - Effective settings
/// * `interrupted` - Set by the Ctrl-C handler; checked between log lines
///
/// # Returns
/// The run outcome; input absence is an outcome, not an error
///
/// # Errors
/// * Template missing or unusable
/// * Log read or parse failures (no report is written)
/// * Report write failures
pub fn execute_analyze(config: &Config, interrupted: &AtomicBool) -> Result<RunOutcome> {
    let start_time = Instant::now();

    info!("Step 1/5: Locating latest log in {}", config.log_dir.display());
    let Some(log_file) = locate_log(config)? else {
        return Ok(RunOutcome::NoLogFound);
    };
    info!("Selected log file: {}", log_file.path.display());

    info!("Step 2/5: Checking for an existing report...");
    let report = report_path(&config.report_dir, log_file.date);
    if report_exists(&config.report_dir, log_file.date) {
        info!(
            "Log file {} already parsed. Report file - {}",
            log_file.path.display(),
            report.display()
        );
        return Ok(RunOutcome::AlreadyReported { report });
    }

    info!("Step 3/5: Loading report template...");
    let template = load_template(&config.report_template)
        .context("Failed to load report template")?;

    info!("Step 4/5: Aggregating requests...");
    let lines = open_log(&log_file.path).context("Failed to open log file")?;
    let aggregation = aggregate_lines(lines, interrupted)
        .with_context(|| format!("Failed to aggregate {}", log_file.path.display()))?;

    info!("Processed lines: {}", aggregation.lines_read);
    let distribution = calculate_distribution(&aggregation.state);
    info!("Latency distribution: {}", distribution.summary());

    info!("Step 5/5: Compiling top {} URLs...", config.report_size);
    let rows = compile_report(&aggregation.state, config.report_size);
    if rows.is_empty() {
        warn!("No requests matched in {}; writing an empty report", log_file.path.display());
    }

    for (i, row) in rows.iter().take(3).enumerate() {
        debug!(
            "  {}. {}s total ({}%): {}",
            i + 1,
            row.time_sum,
            row.time_perc,
            row.url
        );
    }

    let html = render_report(&template, &rows).context("Failed to render report")?;
    write_report(&html, &report).context("Failed to write report")?;

    info!("✓ Report written to: {}", report.display());
    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(RunOutcome::Reported {
        report,
        rows: rows.len(),
        lines_read: aggregation.lines_read,
    })
}

/// Whether a failed run was stopped by the interrupt flag
///
/// **Public** - used by the binary to pick the exit status
pub fn is_interrupted(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<AnalyzeError>(),
            Some(AnalyzeError::Interrupted)
        )
    })
}

/// Find the log for this run, logging input absence
///
/// **Private** - internal helper for execute_analyze
fn locate_log(config: &Config) -> Result<Option<LogFile>> {
    match find_latest_log(&config.log_dir) {
        Ok(Some(log_file)) => Ok(Some(log_file)),
        Ok(None) => {
            error!("No dated log files found in {}", config.log_dir.display());
            Ok(None)
        }
        Err(InputError::LogDirMissing(dir)) => {
            error!("Logs dir: {} does not exist", dir.display());
            Ok(None)
        }
        Err(e) => Err(e).context("Failed to scan log directory"),
    }
}

/// Validate settings before a run
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_config(config: &Config) -> Result<()> {
    if config.report_size == 0 {
        anyhow::bail!("REPORT_SIZE must be greater than 0");
    }

    if config.log_dir.as_os_str().is_empty() {
        anyhow::bail!("LOG_DIR cannot be empty");
    }

    if config.report_dir.as_os_str().is_empty() {
        anyhow::bail!("REPORT_DIR cannot be empty");
    }

    if config.report_dir.is_file() {
        anyhow::bail!(
            "REPORT_DIR {} is a file, not a directory",
            config.report_dir.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config_defaults() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_config_zero_report_size() {
        let config = Config {
            report_size: 0,
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_empty_log_dir() {
        let config = Config {
            log_dir: PathBuf::new(),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_report_dir_is_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = Config {
            report_dir: file.path().to_path_buf(),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
