//! nginx log analyzer
//!
//! Batch analysis of nginx access logs: picks the newest log, aggregates
//! per-URL request latency and renders the slowest URLs into an HTML report.
//!
//! The pipeline is one forward pass:
//! [`input`] lines → [`parser`] requests → [`aggregator`] stats → [`output`] report.
//!
//! ```bash
//! log-analyzer --config ./log_analyzer.conf
//! ```

pub mod aggregator;
pub mod commands;
pub mod input;
pub mod output;
pub mod parser;
pub mod utils;
