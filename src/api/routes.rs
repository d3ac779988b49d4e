//! API route configuration.
//!
//! All API endpoints require an authenticated session via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, link_clicks_handler,
    list_links_handler, move_link_handler, update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All API routes, protected by session authentication.
///
/// # Endpoints
///
/// - `GET    /links`              - List the caller's links in order
/// - `POST   /links`              - Append a new link
/// - `GET    /links/{id}`         - Fetch one owned link
/// - `PATCH  /links/{id}`         - Edit title, URL or active flag
/// - `DELETE /links/{id}`         - Delete a link and close the gap
/// - `POST   /links/{id}/move`    - Move a link up or down
/// - `GET    /links/{id}/clicks`  - Daily click aggregates
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{id}",
            get(get_link_handler)
                .patch(update_link_handler)
                .delete(delete_link_handler),
        )
        .route("/links/{id}/move", post(move_link_handler))
        .route("/links/{id}/clicks", get(link_clicks_handler))
}
