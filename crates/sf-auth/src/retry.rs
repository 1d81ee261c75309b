use std::time::Duration;

use sf_config::RetryConfig;
use tokio::time::sleep;

const NO_BACKOFF_MULTIPLIER: f64 = 1.0;

/// Shared retry helper for the two retrying call sites: profile fetches
/// (fixed delay, small attempt cap) and bulk data fetches elsewhere in the
/// app (exponential backoff with jitter).
///
/// Retry semantics are driven by a classification predicate so they stay
/// unit-testable without any network mocking.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
    backoff_multiplier: f64,
    jitter: bool,
}

impl RetryPolicy {
    /// Fixed inter-attempt delay, no jitter. Used for profile fetches.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay: delay,
            max_delay: delay,
            backoff_multiplier: NO_BACKOFF_MULTIPLIER,
            jitter: false,
        }
    }

    /// Exponential backoff per the retry configuration. Used for bulk data
    /// fetches where transient network failures are expected.
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_secs(config.max_delay_secs),
            backoff_multiplier: config.backoff_multiplier,
            jitter: config.jitter,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay that follows the given 1-based attempt, before jitter.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(63) as i32;
        let delay = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()))
    }

    /// Run `operation` until it succeeds, the classification predicate
    /// rejects the error, or `max_attempts` total attempts are spent
    /// (attempts, not retries). Returns the first success or the last error.
    pub async fn execute<F, Fut, T, E>(
        &self,
        operation_name: &str,
        classify: impl Fn(&E) -> bool,
        mut operation: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match operation().await {
                Ok(result) => {
                    if attempts > 1 {
                        log::info!("{} succeeded after {} attempts", operation_name, attempts);
                    }
                    return Ok(result);
                }
                Err(e) => {
                    if !classify(&e) || attempts >= self.max_attempts {
                        log::warn!(
                            "{} failed after {} attempts: {}",
                            operation_name,
                            attempts,
                            e
                        );
                        return Err(e);
                    }

                    let delay = self.jittered(self.delay_for_attempt(attempts));

                    log::debug!(
                        "{} attempt {} failed: {}. Retrying in {:?}",
                        operation_name,
                        attempts,
                        e,
                        delay
                    );

                    sleep(delay).await;
                }
            }
        }
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if self.jitter {
            let factor = 0.5 + rand::random::<f64>(); // 0.5 to 1.5
            Duration::from_secs_f64(delay.as_secs_f64() * factor)
        } else {
            delay
        }
    }
}
