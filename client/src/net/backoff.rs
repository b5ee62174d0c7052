use crate::config::ReconnectConfig;
use std::time::Duration;

/// Exponential backoff state for the reconnect loop.
///
/// Transport drops are transient; the reconnect cadence here is the only
/// timing the client owns. Reset after every successful connection.
#[derive(Debug)]
pub struct Backoff {
    policy: ReconnectConfig,
    attempts: u32,
    delay: Duration,
}

impl Backoff {
    pub fn new(policy: ReconnectConfig) -> Self {
        let delay = policy.initial_delay;
        Self {
            policy,
            attempts: 0,
            delay,
        }
    }

    pub fn reset(&mut self) {
        self.attempts = 0;
        self.delay = self.policy.initial_delay;
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.policy.max_attempts
    }

    /// Advance to the next attempt.
    ///
    /// Returns the delay to wait *before* performing this attempt, or `None`
    /// once the attempt budget is spent.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.is_exhausted() {
            return None;
        }

        let current = self.delay;
        self.attempts += 1;
        let next_ms = (self.delay.as_millis() as f64) * self.policy.multiplier;
        self.delay = Duration::from_millis(
            (next_ms as u64).min(self.policy.max_delay.as_millis() as u64),
        );
        Some(current)
    }
}
