//! Application-wide constants and configuration values
//!
//! This module centralizes sentinel strings, defaults and environment variable
//! names so the pipeline and the binary agree on them.

/// Literal the upstream API uses for "no value". Matched exactly, case-sensitive.
pub const NULL_SENTINEL: &str = "NULL";

/// Default separator joining nested path segments when flattening
pub const DEFAULT_FLATTEN_SEPARATOR: &str = ".";

/// Separator used inside declared aliases to denote a nested path
pub const ALIAS_PATH_SEPARATOR: char = '.';

/// Application directory name under the platform config dir
pub const APP_DIR_NAME: &str = "cbbd_normalizer";

/// Default log file name
pub const DEFAULT_LOG_FILE_NAME: &str = "cbbd_normalizer.log";

/// Default tracing directive for the binary
pub const DEFAULT_LOG_DIRECTIVE: &str = "cbbd_normalizer=info";

/// Environment variables overriding config file values
pub mod env_vars {
    /// Override log file path
    pub const LOG_FILE: &str = "CBBD_LOG_FILE";

    /// Override the flatten separator
    pub const FLATTEN_SEPARATOR: &str = "CBBD_FLATTEN_SEPARATOR";

    /// Override sequence expansion ("true"/"false")
    pub const EXPAND_SEQUENCES: &str = "CBBD_EXPAND_SEQUENCES";

    /// Override the flatten depth limit
    pub const DEPTH_LIMIT: &str = "CBBD_DEPTH_LIMIT";
}

/// Game clock constants used by play-event calculations
pub mod game_clock {
    /// Length of one half in seconds (college basketball plays two 20 minute halves)
    pub const PERIOD_LENGTH_SECONDS: i64 = 20 * 60;

    /// Number of regulation periods before overtime
    pub const REGULATION_PERIODS: i64 = 2;

    /// Length of one overtime period in seconds
    pub const OVERTIME_LENGTH_SECONDS: i64 = 5 * 60;
}
