//! Streaming per-URL accumulation of request durations.
//!
//! One pass over the log feeds every [`ParsedRequest`] into a single
//! [`AggregateState`]. After every ingest the global totals equal the sums of
//! the per-URL counters.

use crate::parser::{extract_request, ParsedRequest};
use crate::utils::error::AnalyzeError;
use log::{debug, info};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

/// Running statistics for one URL
#[derive(Debug, Clone, PartialEq)]
pub struct UrlStats {
    /// Number of requests seen
    pub count: u64,

    /// Sum of durations
    pub time_sum: f64,

    /// Slowest request
    pub time_max: f64,

    /// Every duration in arrival order
    pub durations: Vec<f64>,
}

impl UrlStats {
    /// Stats for the first sighting of a URL
    pub fn new(duration: f64) -> Self {
        Self {
            count: 1,
            time_sum: duration,
            time_max: duration,
            durations: vec![duration],
        }
    }

    /// Fold another request into the stats
    pub fn record(&mut self, duration: f64) {
        self.count += 1;
        self.time_sum += duration;
        self.time_max = self.time_max.max(duration);
        self.durations.push(duration);
    }
}

/// In-memory totals and per-URL statistics for one run
#[derive(Debug, Clone, Default)]
pub struct AggregateState {
    /// Requests ingested
    pub total_count: u64,

    /// Sum of all request durations
    pub total_time: f64,

    /// Statistics keyed by URL
    pub per_url: HashMap<String, UrlStats>,
}

impl AggregateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one request to the running totals
    ///
    /// **Public** - the single mutation point of the aggregate
    pub fn ingest(&mut self, request: ParsedRequest) {
        let ParsedRequest { url, duration } = request;

        self.total_count += 1;
        self.total_time += duration;

        self.per_url
            .entry(url)
            .and_modify(|stats| stats.record(duration))
            .or_insert_with(|| UrlStats::new(duration));
    }

    /// Number of distinct URLs
    pub fn url_count(&self) -> usize {
        self.per_url.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

/// Result of one aggregation pass
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub state: AggregateState,

    /// Raw lines consumed, matching or not
    pub lines_read: usize,
}

/// Fold a sequence of raw lines into a fresh aggregate
///
/// **Public** - main entry point for aggregation
///
/// # Arguments
/// * `lines` - Raw lines, e.g. from [`crate::input::open_log`]
/// * `interrupted` - Polled before each line; once set the pass stops
///
/// # Errors
/// * `AnalyzeError::Read` - The line source failed
/// * `AnalyzeError::Parse` - A matching line had a bad duration or no URL
/// * `AnalyzeError::Interrupted` - `interrupted` was set
///
/// Any error discards the partial aggregate.
pub fn aggregate_lines<I>(lines: I, interrupted: &AtomicBool) -> Result<Aggregation, AnalyzeError>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    info!("Starts reading file...");

    let mut state = AggregateState::new();
    let mut lines_read = 0;

    for line in lines {
        if interrupted.load(Ordering::Relaxed) {
            return Err(AnalyzeError::Interrupted);
        }

        let line = line?;
        lines_read += 1;

        if let Some(request) = extract_request(&line, lines_read)? {
            state.ingest(request);
        }
    }

    debug!(
        "Read {} lines, {} requests across {} URLs",
        lines_read,
        state.total_count,
        state.url_count()
    );

    Ok(Aggregation { state, lines_read })
}
