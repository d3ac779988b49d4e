//! Handlers for the authenticated link endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::links::{
    ClicksQuery, CreateLinkRequest, LinkClicksResponse, LinkResponse, MoveLinkRequest,
    MoveLinkResponse, UpdateLinkRequest,
};
use crate::api::middleware::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's links in display order.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.link_service.list(&user.id).await?;
    Ok(Json(links.into_iter().map(Into::into).collect()))
}

/// Appends a new link to the caller's list.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "title": "Blog", "url": "https://example.com", "is_active": true }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 429 Too Many Requests when the per-user creation quota is spent.
/// Returns 409 Conflict if concurrent inserts kept colliding.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create(&user.id, &payload.title, &payload.url, payload.is_active)
        .await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Returns one of the caller's links.
///
/// # Endpoint
///
/// `GET /api/links/{id}`
pub async fn get_link_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get(&user.id, &id).await?;
    Ok(Json(link.into()))
}

/// Partially updates a link.
///
/// # Endpoint
///
/// `PATCH /api/links/{id}`
///
/// All fields are optional; position and click counters cannot be set here.
///
/// ```json
/// { "title": "New title", "url": "https://example.org", "is_active": false }
/// ```
pub async fn update_link_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .update(&user.id, &id, payload.into())
        .await?;

    Ok(Json(link.into()))
}

/// Deletes a link and shifts the links after it down by one position.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist or belongs to someone else.
pub async fn delete_link_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete(&user.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Moves a link one step up or down.
///
/// # Endpoint
///
/// `POST /api/links/{id}/move`
///
/// # Response
///
/// ```json
/// { "moved": false, "message": "Already at top" }
/// ```
///
/// Hitting either end of the list answers 200 with `moved: false`.
pub async fn move_link_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<MoveLinkRequest>,
) -> Result<Json<MoveLinkResponse>, AppError> {
    let outcome = state
        .link_service
        .reorder(&user.id, &id, payload.direction.into())
        .await?;

    Ok(Json(outcome.into()))
}

/// Returns daily click aggregates for one of the caller's links.
///
/// # Endpoint
///
/// `GET /api/links/{id}/clicks?days=30`
///
/// `days` is 1-365 and defaults to 30. Days without clicks are omitted.
pub async fn link_clicks_handler(
    Path(id): Path<String>,
    Query(query): Query<ClicksQuery>,
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<LinkClicksResponse>, AppError> {
    query.validate()?;

    let stats = state
        .click_service
        .daily_stats(&user.id, &id, query.days)
        .await?;

    Ok(Json(LinkClicksResponse::new(stats, query.days)))
}
