//! Log input: choosing the file and streaming its lines.

pub mod select;
pub mod source;

pub use select::{find_latest_log, parse_log_date, select_latest_log, LogFile};
pub use source::{open_log, LogLines};
