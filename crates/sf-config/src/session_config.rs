use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Session reconciliation constraints
pub const MIN_PROFILE_FETCH_ATTEMPTS: u32 = 1;
pub const MAX_PROFILE_FETCH_ATTEMPTS: u32 = 10;
pub const DEFAULT_PROFILE_FETCH_ATTEMPTS: u32 = 3;

pub const MIN_PROFILE_RETRY_DELAY_MS: u64 = 10;
pub const MAX_PROFILE_RETRY_DELAY_MS: u64 = 10000;
pub const DEFAULT_PROFILE_RETRY_DELAY_MS: u64 = 500;

pub const MIN_FETCH_TIMEOUT_SECS: u64 = 1;
pub const MAX_FETCH_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Session reconciliation tuning.
///
/// Profile fetches retry on a fixed delay; the attempt cap bounds how long
/// bootstrap can hold the initial loading state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Total profile fetch attempts per resolution (attempts, not retries)
    pub profile_fetch_attempts: u32,
    /// Fixed delay between profile fetch attempts in milliseconds
    pub profile_retry_delay_ms: u64,
    /// Bound on any single provider or profile-store call in seconds
    pub fetch_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            profile_fetch_attempts: DEFAULT_PROFILE_FETCH_ATTEMPTS,
            profile_retry_delay_ms: DEFAULT_PROFILE_RETRY_DELAY_MS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.profile_fetch_attempts < MIN_PROFILE_FETCH_ATTEMPTS
            || self.profile_fetch_attempts > MAX_PROFILE_FETCH_ATTEMPTS
        {
            return Err(ConfigError::session(format!(
                "session.profile_fetch_attempts must be {}-{}, got {}",
                MIN_PROFILE_FETCH_ATTEMPTS, MAX_PROFILE_FETCH_ATTEMPTS, self.profile_fetch_attempts
            )));
        }

        if self.profile_retry_delay_ms < MIN_PROFILE_RETRY_DELAY_MS
            || self.profile_retry_delay_ms > MAX_PROFILE_RETRY_DELAY_MS
        {
            return Err(ConfigError::session(format!(
                "session.profile_retry_delay_ms must be {}-{}, got {}",
                MIN_PROFILE_RETRY_DELAY_MS, MAX_PROFILE_RETRY_DELAY_MS, self.profile_retry_delay_ms
            )));
        }

        if self.fetch_timeout_secs < MIN_FETCH_TIMEOUT_SECS
            || self.fetch_timeout_secs > MAX_FETCH_TIMEOUT_SECS
        {
            return Err(ConfigError::session(format!(
                "session.fetch_timeout_secs must be {}-{}, got {}",
                MIN_FETCH_TIMEOUT_SECS, MAX_FETCH_TIMEOUT_SECS, self.fetch_timeout_secs
            )));
        }

        Ok(())
    }
}
