//! Constants for the download module.

/// Default pause between download attempts, in seconds.
pub const DEFAULT_INTERVAL_SECS: f64 = 1.0;

/// Output directory used when none is configured (the working directory).
pub const DEFAULT_OUTPUT_DIR: &str = ".";
