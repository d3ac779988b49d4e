//! In-process keyed token bucket.

use super::service::RateLimiter;
use async_trait::async_trait;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter as KeyedLimiter};
use std::num::NonZeroU32;
use tracing::debug;

/// Token-bucket limiter keeping one bucket per key in memory.
///
/// Used when Redis is not configured. Limits are per process, so a
/// multi-instance deployment effectively multiplies the quota.
pub struct GovernorRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
}

impl GovernorRateLimiter {
    /// Creates a limiter replenishing `per_minute` units per minute with
    /// at most `burst` units available at once.
    pub fn new(per_minute: u32, burst: u32) -> Self {
        let per_minute = NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);
        debug!(per_minute, burst, "Using in-process rate limiter");

        Self {
            limiter: KeyedLimiter::keyed(Quota::per_minute(per_minute).allow_burst(burst)),
        }
    }

    /// Drops buckets that are back to full capacity.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }
}

#[async_trait]
impl RateLimiter for GovernorRateLimiter {
    async fn allow(&self, key: &str) -> bool {
        self.limiter.check_key(&key.to_string()).is_ok()
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allows_up_to_burst() {
        let limiter = GovernorRateLimiter::new(1, 3);

        assert!(limiter.allow("user:a").await);
        assert!(limiter.allow("user:a").await);
        assert!(limiter.allow("user:a").await);
        assert!(!limiter.allow("user:a").await);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = GovernorRateLimiter::new(1, 1);

        assert!(limiter.allow("1.1.1.1:link1").await);
        assert!(!limiter.allow("1.1.1.1:link1").await);
        assert!(limiter.allow("1.1.1.1:link2").await);
        assert!(limiter.allow("2.2.2.2:link1").await);
    }

    #[tokio::test]
    async fn test_zero_quota_is_clamped() {
        let limiter = GovernorRateLimiter::new(0, 0);
        assert!(limiter.allow("k").await);
        assert_eq!(limiter.backend(), "memory");
    }
}
