//! Access-log line parsing.
//!
//! This module handles:
//! - Locating the request method in a raw line
//! - Extracting the URL and request duration

pub mod request;

// Re-export main types
pub use request::{extract_request, ParsedRequest};
