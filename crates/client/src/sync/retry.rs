//! Retry policy for mirror calls.

use std::time::Duration;

use backon::ExponentialBuilder;

/// Exponential backoff applied to each queued operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub min_delay: Duration,

    /// Multiplier applied to the delay after every retry.
    pub factor: f32,

    /// Upper bound on any single delay.
    pub max_delay: Duration,

    /// Attempts per operation, the first call included.
    pub max_attempts: usize,

    /// Randomise delays so clients do not retry in lockstep.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(200),
            factor: 2.0,
            max_delay: Duration::from_secs(10),
            max_attempts: 5,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that retries without waiting.
    #[must_use]
    pub const fn immediate(max_attempts: usize) -> Self {
        Self {
            min_delay: Duration::ZERO,
            factor: 1.0,
            max_delay: Duration::ZERO,
            max_attempts,
            jitter: false,
        }
    }

    /// The policy as a backon builder.
    #[must_use]
    pub fn backoff(&self) -> ExponentialBuilder {
        let builder = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_factor(self.factor)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_attempts.saturating_sub(1));

        if self.jitter {
            builder.with_jitter()
        } else {
            builder
        }
    }
}
