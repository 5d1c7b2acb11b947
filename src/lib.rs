// Library interface for tcxrs: Training Center XML decoding and activity metrics

pub mod config;
pub mod error;
pub mod import;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod summary;

// Re-export commonly used types for convenience
pub use models::*;
pub use error::{DecodeError, Result, TcxError};
pub use import::tcx::{parse, parse_file, parse_str};
pub use import::TcxImporter;
pub use metrics::{Pace, METERS_TO_MILES};
pub use summary::{ActivitySummary, Units};
pub use logging::{LogConfig, LogFormat, LogLevel};
