use crate::{ConfigError, ConfigErrorResult};

use std::ops::RangeInclusive;

use serde::Deserialize;

pub const MAX_ATTEMPTS_RANGE: RangeInclusive<u32> = 1..=10;
pub const INITIAL_DELAY_MS_RANGE: RangeInclusive<u64> = 10..=10_000;
pub const MAX_DELAY_SECS_RANGE: RangeInclusive<u64> = 1..=60;
pub const BACKOFF_MULTIPLIER_RANGE: RangeInclusive<f64> = 1.0..=10.0;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 100;
pub const DEFAULT_MAX_DELAY_SECS: u64 = 5;
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_JITTER: bool = true;

/// Backoff tuning for bulk data fetches.
///
/// A transient network failure is retried with exponentially growing delays
/// (`initial * multiplier^n`, capped at `max_delay_secs`), with optional
/// jitter so recovering clients do not stampede. Profile fetches do not use
/// this section; their fixed-delay knobs live in
/// [`SessionConfig`](crate::SessionConfig).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, the initial one included
    pub max_attempts: u32,
    /// Delay before the first retry in milliseconds
    pub initial_delay_ms: u64,
    /// Ceiling on any single delay in seconds
    pub max_delay_secs: u64,
    /// Growth factor applied per retry
    pub backoff_multiplier: f64,
    /// Randomize each delay within ±50%
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            max_delay_secs: DEFAULT_MAX_DELAY_SECS,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            jitter: DEFAULT_JITTER,
        }
    }
}

impl RetryConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        Self::check("retry.max_attempts", self.max_attempts, MAX_ATTEMPTS_RANGE)?;
        Self::check(
            "retry.initial_delay_ms",
            self.initial_delay_ms,
            INITIAL_DELAY_MS_RANGE,
        )?;
        Self::check(
            "retry.max_delay_secs",
            self.max_delay_secs,
            MAX_DELAY_SECS_RANGE,
        )?;
        Self::check(
            "retry.backoff_multiplier",
            self.backoff_multiplier,
            BACKOFF_MULTIPLIER_RANGE,
        )?;

        Ok(())
    }

    fn check<T: PartialOrd + std::fmt::Display>(
        name: &str,
        value: T,
        range: RangeInclusive<T>,
    ) -> ConfigErrorResult<()> {
        if !range.contains(&value) {
            return Err(ConfigError::retry(format!(
                "{} must be within {}..={}, got {}",
                name,
                range.start(),
                range.end(),
                value
            )));
        }
        Ok(())
    }
}
