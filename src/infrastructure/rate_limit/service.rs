//! Rate limiter trait and key builders.

use async_trait::async_trait;
use std::fmt;

/// Errors that can occur while setting up a rate limiter backend.
#[derive(Debug)]
pub enum RateLimitError {
    ConnectionError(String),
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Rate limiter connection error: {}", e),
        }
    }
}

impl std::error::Error for RateLimitError {}

/// Decides whether a request identified by `key` may proceed.
///
/// A `false` answer means the caller must reject the request without
/// performing the mutation.
///
/// # Implementations
///
/// - [`crate::infrastructure::rate_limit::GovernorRateLimiter`] - per-process buckets
/// - [`crate::infrastructure::rate_limit::RedisRateLimiter`] - shared Redis windows
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Consumes one unit for `key` and reports whether it was available.
    async fn allow(&self, key: &str) -> bool;

    /// Checks if the limiter backend is reachable.
    async fn health_check(&self) -> bool;

    /// Short backend name for health reporting.
    fn backend(&self) -> &'static str;
}

/// Key for authenticated mutation paths.
pub fn user_key(user_id: &str) -> String {
    format!("user:{user_id}")
}

/// Key for the public click path, scoped to one link so a single client
/// cannot inflate a specific link's counters.
pub fn click_key(ip: &str, link_id: &str) -> String {
    format!("{ip}:{link_id}")
}
