//! Utility modules for configuration, error handling, and logging.

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::{AnalyzeError, ConfigError, InputError, OutputError, ParseError};
pub use logging::init_logging;
