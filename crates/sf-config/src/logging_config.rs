use crate::LogLevel;

use serde::Deserialize;

const DEFAULT_COLORED: bool = true;

/// Logging configuration for hosts embedding the auth subsystem.
///
/// The library crates only use the `log` facade; a host binary decides how
/// to sink it (and whether to honor `file`/`colored`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub colored: bool,
    /// Optional log file path. None = stdout
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            colored: DEFAULT_COLORED,
            file: None,
        }
    }
}
