//! Aggregation of request lines into per-URL statistics and report rows.
//!
//! This module transforms extracted requests into:
//! - Running per-URL counters (one streaming pass)
//! - Ranked report rows with derived percentages, average and median
//! - Latency distribution statistics

pub mod metrics;
pub mod url_stats;

// Re-export main types and functions
pub use metrics::{
    calculate_distribution, compile_report, truncate_decimal, LatencyDistribution, ReportRow,
};
pub use url_stats::{aggregate_lines, AggregateState, Aggregation, UrlStats};
