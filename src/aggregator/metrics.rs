//! Derive report rows and summary metrics from the finished aggregate.
//!
//! Report rows rank URLs by total time spent serving them.
//! These are the primary targets for optimization.

use super::url_stats::{AggregateState, UrlStats};
use crate::utils::config::TRUNCATE_FRACTIONAL_DIGITS;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// One URL's line in the rendered report
///
/// Every float is truncated to [`TRUNCATE_FRACTIONAL_DIGITS`] fractional digits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub url: String,

    /// Requests for this URL
    pub count: u64,

    /// Share of all requests, in percent
    pub count_perc: f64,

    /// Total time spent on this URL
    pub time_sum: f64,

    /// Share of all request time, in percent
    pub time_perc: f64,

    pub time_max: f64,
    pub time_avg: f64,
    pub time_med: f64,
}

/// Compile the ranked report
///
/// **Public** - main entry point for report compilation
///
/// # Arguments
/// * `state` - Finished aggregate (read only)
/// * `report_size` - Maximum number of rows to return
///
/// # Returns
/// Rows sorted by descending `time_sum`, ties by URL; empty when the
/// aggregate has no requests or no time
pub fn compile_report(state: &AggregateState, report_size: usize) -> Vec<ReportRow> {
    if state.total_count == 0 || state.total_time == 0.0 {
        warn!(
            "Nothing to report: {} requests, {} total time",
            state.total_count, state.total_time
        );
        return Vec::new();
    }

    debug!(
        "Compiling top {} of {} URLs",
        report_size,
        state.url_count()
    );

    let mut ranked: Vec<(&String, &UrlStats)> = state.per_url.iter().collect();
    ranked.sort_by(|(a_url, a), (b_url, b)| {
        b.time_sum
            .total_cmp(&a.time_sum)
            .then_with(|| a_url.cmp(b_url))
    });

    ranked
        .into_iter()
        .take(report_size)
        .map(|(url, stats)| create_report_row(url, stats, state.total_count, state.total_time))
        .collect()
}

/// Build one row from a URL's stats
///
/// **Public** - exposed for tests and callers holding a single entry
pub fn create_report_row(url: &str, stats: &UrlStats, total_count: u64, total_time: f64) -> ReportRow {
    let truncate = |value: f64| truncate_float(value, TRUNCATE_FRACTIONAL_DIGITS);

    let mut sorted = stats.durations.clone();
    sorted.sort_by(f64::total_cmp);
    let time_med = sorted
        .get(median_index(sorted.len()))
        .copied()
        .unwrap_or_default();

    ReportRow {
        url: url.to_string(),
        count: stats.count,
        count_perc: truncate(100.0 * stats.count as f64 / total_count as f64),
        time_sum: truncate(stats.time_sum),
        time_perc: truncate(100.0 * stats.time_sum / total_time),
        time_max: truncate(stats.time_max),
        time_avg: truncate(stats.time_sum / stats.count as f64),
        time_med: truncate(time_med),
    }
}

/// Index of the reported median in a sorted list of `len` samples
///
/// Uses `len / 2 - 1`, the lower neighbour of the upper-middle element, clamped
/// to 0 so one sample reports itself.
pub fn median_index(len: usize) -> usize {
    (len / 2).saturating_sub(1)
}

/// Truncate the decimal representation of `value`
///
/// Keeps at most `fractional_digits` digits after the point; never rounds.
/// `truncate_decimal(10.5555, 3)` is `"10.555"` and `truncate_decimal(0.9999, 2)`
/// is `"0.99"`.
pub fn truncate_decimal(value: f64, fractional_digits: usize) -> String {
    let repr = value.to_string();

    match repr.find('.') {
        Some(dot) if fractional_digits == 0 => repr[..dot].to_string(),
        Some(dot) => {
            let end = (dot + 1 + fractional_digits).min(repr.len());
            repr[..end].to_string()
        }
        None => repr,
    }
}

/// [`truncate_decimal`] read back as a number
pub fn truncate_float(value: f64, fractional_digits: usize) -> f64 {
    truncate_decimal(value, fractional_digits)
        .parse()
        .unwrap_or(value)
}

/// Summary of request time spread across URLs
#[derive(Debug, Clone, Default)]
pub struct LatencyDistribution {
    pub total_requests: u64,
    pub total_time: f64,
    pub url_count: usize,

    /// Mean request duration over all URLs
    pub mean_request_time: f64,

    /// Time share of the slowest 10% of URLs
    pub top_10_percent_percentage: f64,
}

impl LatencyDistribution {
    /// Get human-readable summary
    ///
    /// **Public** - for logging
    pub fn summary(&self) -> String {
        format!(
            "Requests: {} | URLs: {} | Total time: {:.3}s | Mean: {:.3}s | Top 10% URLs: {:.1}% of time",
            self.total_requests,
            self.url_count,
            self.total_time,
            self.mean_request_time,
            self.top_10_percent_percentage
        )
    }
}

/// Calculate the latency distribution of an aggregate
pub fn calculate_distribution(state: &AggregateState) -> LatencyDistribution {
    if state.is_empty() {
        return LatencyDistribution::default();
    }

    let mut sums: Vec<f64> = state.per_url.values().map(|s| s.time_sum).collect();
    sums.sort_by(|a, b| b.total_cmp(a));

    let top_count = (sums.len() as f64 * 0.1).ceil() as usize;
    let top_time: f64 = sums.iter().take(top_count).sum();

    LatencyDistribution {
        total_requests: state.total_count,
        total_time: state.total_time,
        url_count: state.url_count(),
        mean_request_time: state.total_time / state.total_count as f64,
        top_10_percent_percentage: if state.total_time > 0.0 {
            top_time * 100.0 / state.total_time
        } else {
            0.0
        },
    }
}
