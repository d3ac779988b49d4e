//! Redis-backed fixed-window limiter.

use super::service::{RateLimitError, RateLimiter};
use async_trait::async_trait;
use chrono::Utc;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{info, warn};

const WINDOW_SECONDS: i64 = 60;

/// Counts requests per key in one-minute windows stored in Redis, so every
/// instance shares the same quota.
///
/// Fails open: if Redis is unreachable the request is allowed and a warning
/// is logged.
pub struct RedisRateLimiter {
    client: ConnectionManager,
    per_window: u64,
    key_prefix: String,
}

impl RedisRateLimiter {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitError::ConnectionError`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, per_minute: u32) -> Result<Self, RateLimitError> {
        info!("Connecting to Redis at {}", redis_url);

        let client = Client::open(redis_url).map_err(|e| {
            RateLimitError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            RateLimitError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| RateLimitError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            per_window: u64::from(per_minute.max(1)),
            key_prefix: "ratelimit:".to_string(),
        })
    }

    fn build_key(&self, key: &str, window: i64) -> String {
        format!("{}{}:{}", self.key_prefix, key, window)
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn allow(&self, key: &str) -> bool {
        let window = Utc::now().timestamp() / WINDOW_SECONDS;
        let redis_key = self.build_key(key, window);
        let mut conn = self.client.clone();

        let result: redis::RedisResult<(u64,)> = redis::pipe()
            .atomic()
            .incr(&redis_key, 1u64)
            .expire(&redis_key, WINDOW_SECONDS)
            .ignore()
            .query_async(&mut conn)
            .await;

        match result {
            Ok((count,)) => count <= self.per_window,
            Err(e) => {
                warn!(key, error = %e, "Redis rate limit check failed, allowing request");
                true
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
