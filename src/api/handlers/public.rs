//! Handlers for the unauthenticated surface: redirect, click beacon, profile.

use axum::{
    Json,
    extract::{Path, State},
    response::Redirect,
};

use crate::api::dto::public::{ClickRecordedResponse, ProfileResponse};
use crate::api::extract::ClientIp;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects to a link's target and counts the visit.
///
/// # Endpoint
///
/// `GET /go/{link_id}`
///
/// # Request Flow
///
/// 1. Resolve the link; unknown or inactive links answer a generic 404
/// 2. Consult the rate limiter with `<ip>:<link_id>`
/// 3. Record the click; recording failures are logged, never returned
/// 4. Return 307 Temporary Redirect
///
/// # Errors
///
/// Returns 404 Not Found for unknown or inactive links.
/// Returns 429 Too Many Requests when the client exhausted its quota.
pub async fn redirect_handler(
    Path(link_id): Path<String>,
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
) -> Result<Redirect, AppError> {
    let url = state.click_service.resolve_redirect(&link_id, &ip).await?;
    Ok(Redirect::temporary(&url))
}

/// Records a click reported by the profile page.
///
/// # Endpoint
///
/// `POST /clicks/{link_id}`
///
/// # Response
///
/// ```json
/// { "recorded": true }
/// ```
///
/// `recorded` is false for unknown or inactive links and on storage
/// failures; the reason is not disclosed.
pub async fn record_click_handler(
    Path(link_id): Path<String>,
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
) -> Result<Json<ClickRecordedResponse>, AppError> {
    let outcome = state.click_service.record_public(&link_id, &ip).await?;

    Ok(Json(ClickRecordedResponse {
        recorded: outcome.is_recorded(),
    }))
}

/// Returns a user's public profile with active links in display order.
///
/// # Endpoint
///
/// `GET /{username}`
///
/// # Errors
///
/// Returns 404 Not Found for unknown usernames.
pub async fn profile_handler(
    Path(username): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state.profile_service.public_profile(&username).await?;
    Ok(Json(profile.into()))
}
