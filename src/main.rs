//! nginx log analyzer CLI
//!
//! Scheduled batch job: turns the newest nginx access log into an HTML report
//! of the slowest URLs. Failures go to the diagnostic log and the exit code.

use anyhow::Result;
use clap::Parser;
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nginx_log_analyzer::commands::{execute_analyze, is_interrupted, validate_config, RunOutcome};
use nginx_log_analyzer::utils::{init_logging, Config};

/// Exit status after an operator interrupt (128 + SIGINT)
const EXIT_INTERRUPTED: u8 = 130;

/// nginx log analyzer - per-URL latency reports from access logs
#[derive(Parser, Debug)]
#[command(name = "log-analyzer")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file with `KEY: value` overrides
    #[arg(short, long, env = "LOG_ANALYZER_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Build settings, then logging on top of them
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let _ = init_logging(&Config::default(), cli.verbose);
            error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config, cli.verbose) {
        let _ = init_logging(&Config::default(), cli.verbose);
        error!("{e}");
        return ExitCode::FAILURE;
    }

    for key in &config.ignored_keys {
        warn!("Ignoring unknown config key: {key}");
    }
    debug!(
        "Script settings: {}",
        serde_json::to_string_pretty(&config).unwrap_or_default()
    );

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        warn!("Cannot install interrupt handler: {e}");
    }

    match run(&config, &interrupted) {
        Ok(outcome) => {
            debug!("Run outcome: {outcome:?}");
            ExitCode::SUCCESS
        }
        Err(e) if is_interrupted(&e) => {
            error!("The execution was interrupted by the user; no report written");
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(e) => {
            error!("Analysis failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, interrupted: &AtomicBool) -> Result<RunOutcome> {
    validate_config(config)?;

    let outcome = execute_analyze(config, interrupted)?;
    if let RunOutcome::Reported { rows, .. } = &outcome {
        info!("Report contains {rows} URLs");
    }

    Ok(outcome)
}
