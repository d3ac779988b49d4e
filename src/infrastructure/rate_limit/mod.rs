//! Keyed rate limiting for mutation and click paths.
//!
//! Provides a [`RateLimiter`] trait with two implementations:
//! - [`GovernorRateLimiter`] - In-process token bucket per key
//! - [`RedisRateLimiter`] - Fixed-window counter shared across instances

mod governor_limiter;
mod redis_limiter;
mod service;

pub use governor_limiter::GovernorRateLimiter;
pub use redis_limiter::RedisRateLimiter;
pub use service::{RateLimitError, RateLimiter, click_key, user_key};

#[cfg(test)]
pub use service::MockRateLimiter;
