//! Tunable durations for the circulation protocol
//!
//! Defaults match the reference deployment: 30 second lock TTL, 30 day loan
//! period. Tests shrink the TTL to tens of milliseconds to exercise expiry
//! without waiting.

use std::time::Duration;

/// Protocol-level durations, injected into the coordinator at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CirculationConfig {
    /// How long an unconverted lock row lives before the store expires it.
    /// Bounds the time a crashed holder can block others.
    pub lock_ttl: Duration,

    /// Checkout period; renew extends the current due date by the same span.
    pub loan_period_days: i64,
}

impl CirculationConfig {
    /// Reference defaults: 30 s TTL, 30 day loans.
    pub fn new() -> Self {
        Self {
            lock_ttl: Duration::from_secs(30),
            loan_period_days: 30,
        }
    }

    /// Override the lock TTL (test harnesses use short TTLs).
    pub fn with_lock_ttl(mut self, ttl: Duration) -> Self {
        self.lock_ttl = ttl;
        self
    }

    /// Override the loan period.
    pub fn with_loan_period_days(mut self, days: i64) -> Self {
        self.loan_period_days = days;
        self
    }

    /// The loan period as a chrono duration, for due-date arithmetic.
    pub fn loan_period(&self) -> chrono::Duration {
        chrono::Duration::days(self.loan_period_days)
    }
}

impl Default for CirculationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded exponential backoff for retryable store failures.
///
/// Lives at the gateway layer only; the coordinator never retries on its
/// own. Delay doubles per attempt starting from `base_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (must be >= 1).
    pub max_attempts: u32,

    /// Delay before the second attempt; doubles each attempt after.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Reference defaults: 4 attempts, 50 ms base delay.
    pub fn new() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(50),
        }
    }

    /// A policy that never retries (single attempt).
    pub fn no_retries() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Delay to sleep before attempt `attempt` (1-based; attempt 1 has no
    /// delay).
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        // base * 2^(attempt - 2), saturating
        let shift = (attempt - 2).min(16);
        self.base_delay.saturating_mul(1u32 << shift)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
