#![allow(dead_code)]

use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;
use linkbio::infrastructure::rate_limit::{GovernorRateLimiter, RateLimiter};
use linkbio::state::AppState;

pub const TEST_SECRET: &str = "test-signing-secret";

pub async fn create_test_user(pool: &PgPool, id: &str, username: &str) {
    sqlx::query(
        "INSERT INTO users (id, username, display_username, name) VALUES ($1, $2, $3, $4)",
    )
    .bind(id)
    .bind(username.to_lowercase())
    .bind(username)
    .bind(format!("{username} Test"))
    .execute(pool)
    .await
    .unwrap();
}

pub async fn create_test_link(pool: &PgPool, id: &str, user_id: &str, title: &str, position: i32) {
    sqlx::query(
        "INSERT INTO links (id, user_id, title, url, position) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(user_id)
    .bind(title)
    .bind(format!("https://example.com/{id}"))
    .bind(position)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn create_inactive_link(pool: &PgPool, id: &str, user_id: &str, position: i32) {
    sqlx::query(
        "INSERT INTO links (id, user_id, title, url, position, is_active) VALUES ($1, $2, $3, $4, $5, FALSE)",
    )
    .bind(id)
    .bind(user_id)
    .bind("Hidden")
    .bind(format!("https://example.com/{id}"))
    .bind(position)
    .execute(pool)
    .await
    .unwrap();
}

/// Returns `(id, position)` pairs of a user's links in position order.
pub async fn positions(pool: &PgPool, user_id: &str) -> Vec<(String, i32)> {
    sqlx::query_as("SELECT id, position FROM links WHERE user_id = $1 ORDER BY position")
        .bind(user_id)
        .fetch_all(pool)
        .await
        .unwrap()
}

pub async fn total_clicks(pool: &PgPool, link_id: &str) -> i64 {
    sqlx::query_scalar("SELECT total_clicks FROM links WHERE id = $1")
        .bind(link_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn daily_row_count(pool: &PgPool, link_id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM link_click_daily WHERE link_id = $1")
        .bind(link_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn create_test_state(pool: PgPool) -> AppState {
    create_test_state_with_limiter(pool, Arc::new(GovernorRateLimiter::new(10_000, 10_000)))
}

pub fn create_test_state_with_limiter(pool: PgPool, limiter: Arc<dyn RateLimiter>) -> AppState {
    AppState::new(Arc::new(pool), limiter, TEST_SECRET.to_string(), 2, false)
}

/// Issues a session for `user_id` and returns the raw token.
pub async fn create_test_session(state: &AppState, user_id: &str) -> String {
    let (token, _) = state
        .auth_service
        .issue_session(user_id, Duration::days(1))
        .await
        .unwrap();
    token
}
