//! Delay policy between delivery attempts for one recipient

use std::time::Duration;

use rand::Rng;

/// Retry delay configuration
///
/// The defaults describe a fixed delay: every retry waits `initial_delay`.
/// A `multiplier` above 1.0 turns it into exponential backoff capped at
/// `max_delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffConfig {
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any delay
    pub max_delay: Duration,
    /// Growth factor applied after each retry
    pub multiplier: f64,
    /// Jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
            multiplier: 1.0,
            jitter_factor: 0.0,
        }
    }
}

impl BackoffConfig {
    /// Fixed delay between every attempt.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            initial_delay: delay,
            max_delay: delay.max(BackoffConfig::default().max_delay),
            ..Self::default()
        }
    }
}

/// Backoff calculator, one per recipient
pub struct RetryBackoff {
    config: BackoffConfig,
    attempt: u32,
}

impl RetryBackoff {
    pub fn new(config: BackoffConfig) -> Self {
        Self { config, attempt: 0 }
    }

    /// Get the delay before the next retry
    pub fn next_delay(&mut self) -> Duration {
        let exponent = self.attempt.min(i32::MAX as u32) as i32;
        self.attempt += 1;

        let base = self.config.initial_delay.as_secs_f64() * self.config.multiplier.powi(exponent);
        let capped = base.min(self.config.max_delay.as_secs_f64());

        let delay = if self.config.jitter_factor > 0.0 && capped > 0.0 {
            let jitter_range = capped * self.config.jitter_factor;
            let jitter = rand::rng().random_range(-jitter_range..jitter_range);
            (capped + jitter).max(0.0)
        } else {
            capped
        };

        Duration::try_from_secs_f64(delay).unwrap_or(self.config.max_delay)
    }
}
