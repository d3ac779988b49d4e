//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`            - Health check: database, rate limiter (public)
//! - `GET  /go/{link_id}`      - Redirect to a link target and count the click (public)
//! - `POST /clicks/{link_id}`  - Count a click from the profile page (public)
//! - `GET  /{username}`        - Public profile (public)
//! - `/api/*`                  - Link management (session required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Authentication** - Bearer token or `session_token` cookie on `/api`
//! - **Path normalization** - Trailing slash handling
//!
//! Rate limiting is applied per operation inside the services, keyed by user
//! for link creation and by client IP and link for clicks.

use crate::api;
use crate::api::handlers::{
    health_handler, profile_handler, record_click_handler, redirect_handler,
};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/go/{link_id}", get(redirect_handler))
        .route("/clicks/{link_id}", post(record_click_handler))
        .route("/{username}", get(profile_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
