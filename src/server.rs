//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, rate limiter selection and the
//! Axum server lifecycle.

use crate::config::Config;
use crate::infrastructure::rate_limit::{GovernorRateLimiter, RateLimiter, RedisRateLimiter};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis rate limiter (or in-process fallback)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let rate_limiter = build_rate_limiter(&config).await;

    let state = AppState::new(
        Arc::new(pool),
        rate_limiter,
        config.session_signing_secret.clone(),
        config.conflict_retry_attempts,
        config.behind_proxy,
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Picks the Redis limiter when configured and reachable, otherwise an
/// in-process limiter whose idle buckets are pruned periodically.
async fn build_rate_limiter(config: &Config) -> Arc<dyn RateLimiter> {
    if let Some(redis_url) = &config.redis_url {
        match RedisRateLimiter::connect(redis_url, config.rate_limit_per_minute).await {
            Ok(redis) => {
                tracing::info!("Rate limiting enabled (Redis)");
                return Arc::new(redis);
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using in-process limiter.", e);
            }
        }
    }

    let limiter = Arc::new(GovernorRateLimiter::new(
        config.rate_limit_per_minute,
        config.rate_limit_burst,
    ));

    let pruned = limiter.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PRUNE_INTERVAL);
        loop {
            ticker.tick().await;
            pruned.prune();
        }
    });

    tracing::info!("Rate limiting enabled (in-process)");
    limiter
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
