//! Bounded retry with capped exponential backoff for page fetches.

use std::time::Duration;

use scout_core::AppConfig;

/// How many times to try a fetch and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (default: 3)
    pub max_attempts: u32,
    /// Backoff unit (default: 1s)
    pub base_delay: Duration,
    /// Upper bound on a single wait (default: 10s)
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, base_delay: Duration::from_millis(1000), max_delay: Duration::from_millis(10_000) }
    }
}

impl From<&AppConfig> for RetryPolicy {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_attempts: config.fetch_attempts,
            base_delay: Duration::from_millis(config.retry_base_ms),
            max_delay: Duration::from_millis(config.retry_max_ms),
        }
    }
}

impl RetryPolicy {
    /// Wait after the 1-based `attempt` failed: `min(2^attempt × base, max)`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        backoff_delay(attempt, self.base_delay, self.max_delay)
    }

    /// Whether another attempt is allowed after `attempt` failed.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

/// `min(2^attempt × base, max)`, saturating instead of overflowing.
pub fn backoff_delay(attempt: u32, base: Duration, max: Duration) -> Duration {
    let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
    base.checked_mul(factor).unwrap_or(max).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_delays() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(2));
        assert_eq!(policy.delay_after(2), Duration::from_secs(4));
        assert_eq!(policy.delay_after(3), Duration::from_secs(8));
        assert_eq!(policy.delay_after(4), Duration::from_secs(10));
    }

    #[test]
    fn test_delays_non_decreasing_and_capped() {
        let policy = RetryPolicy::default();
        let delays: Vec<Duration> = (0..40).map(|a| policy.delay_after(a)).collect();

        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
        assert!(delays.iter().all(|d| *d <= Duration::from_secs(10)));
    }

    #[test]
    fn test_huge_attempt_saturates() {
        let delay = backoff_delay(u32::MAX, Duration::from_secs(1), Duration::from_secs(10));
        assert_eq!(delay, Duration::from_secs(10));
    }

    #[test]
    fn test_should_retry() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }

    #[test]
    fn test_from_app_config() {
        let config = AppConfig { fetch_attempts: 5, retry_base_ms: 10, retry_max_ms: 50, ..Default::default() };
        let policy = RetryPolicy::from(&config);

        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay_after(1), Duration::from_millis(20));
        assert_eq!(policy.delay_after(3), Duration::from_millis(50));
    }
}
