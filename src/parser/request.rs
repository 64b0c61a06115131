//! Request extraction from a single access-log line.
//!
//! The expected line shape is nginx `ui_short`:
//!
//! ```text
//! $remote_addr $remote_user $http_x_real_ip [$time_local] "$request" $status
//! $body_bytes_sent "$http_referer" "$http_user_agent" ... $request_time
//! ```
//!
//! Only three fields matter: the method inside `$request`, the URL right after
//! it, and `$request_time`, which is always the last token on the line.

use crate::utils::config::REQUEST_METHODS;
use crate::utils::error::ParseError;

/// One request pulled out of a log line
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequest {
    /// Request target as written in the log
    pub url: String,

    /// `$request_time` in seconds
    pub duration: f64,
}

/// Extract the request from one raw log line
///
/// **Public** - main entry point for line parsing
///
/// The method is matched as a plain substring, so a method name appearing in
/// any field (a user agent containing `COMPUTER` matches `PUT`) still triggers
/// extraction. The earliest match on the line wins.
///
/// # Arguments
/// * `line` - Raw line without its terminator
/// * `line_no` - 1-based line number, used in error messages
///
/// # Returns
/// `Ok(None)` when the line has no recognized method
///
/// # Errors
/// * `ParseError::InvalidDuration` - Last token is not a finite, non-negative number
/// * `ParseError::MissingUrl` - Nothing follows the matched method
pub fn extract_request(line: &str, line_no: usize) -> Result<Option<ParsedRequest>, ParseError> {
    let Some(url_start) = find_method_end(line) else {
        return Ok(None);
    };

    let url = line[url_start..]
        .split_whitespace()
        .next()
        .ok_or(ParseError::MissingUrl { line_no })?;

    let token = line.split_whitespace().next_back().unwrap_or_default();
    let duration = parse_duration(token).ok_or_else(|| ParseError::InvalidDuration {
        line_no,
        token: token.to_string(),
    })?;

    Ok(Some(ParsedRequest {
        url: url.to_string(),
        duration,
    }))
}

/// Byte offset just past the earliest recognized method, if any
fn find_method_end(line: &str) -> Option<usize> {
    REQUEST_METHODS
        .iter()
        .filter_map(|method| line.find(method).map(|pos| (pos, method.len())))
        .min_by_key(|(pos, _)| *pos)
        .map(|(pos, len)| pos + len)
}

fn parse_duration(token: &str) -> Option<f64> {
    token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}
