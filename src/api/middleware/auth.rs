//! Session authentication middleware for `/api` routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::COOKIE, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::{error::AppError, state::AppState};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_token";

/// Authenticated caller, inserted as a request extension by [`layer`].
///
/// Handlers read it with `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
}

/// Authenticates requests using a session token.
///
/// # Token Sources
///
/// ```text
/// Authorization: Bearer <token>
/// Cookie: session_token=<token>
/// ```
///
/// The bearer header wins when both are present.
///
/// # Authentication Flow
///
/// 1. Extract the token from the header or cookie
/// 2. Resolve it to a user via [`crate::application::services::AuthService::current_user_id`]
/// 3. Insert [`CurrentUser`] into the request extensions
/// 4. Continue to next middleware/handler
///
/// # Errors
///
/// Returns `401 Unauthorized` with `WWW-Authenticate: Bearer` if no token is
/// supplied or the session is unknown, revoked or expired.
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/links", get(list_links_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = extract_token(&mut parts).await.ok_or_else(|| {
        AppError::unauthorized(
            "Unauthorized",
            serde_json::json!({"reason": "Session token is missing"}),
        )
    })?;

    let user_id = st.auth_service.current_user_id(&token).await?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(CurrentUser { id: user_id });

    Ok(next.run(req).await)
}

async fn extract_token(parts: &mut Parts) -> Option<String> {
    if let Ok(AuthBearer(token)) = AuthBearer::from_request_parts(parts, &()).await {
        return Some(token);
    }

    parts
        .headers
        .get(COOKIE)
        .and_then(|cookie_header| cookie_header.to_str().ok())
        .and_then(session_cookie)
}

fn session_cookie(cookie_str: &str) -> Option<String> {
    cookie_str.split(';').find_map(|cookie| {
        let mut parts = cookie.trim().splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(SESSION_COOKIE), Some(value)) if !value.is_empty() => Some(value.to_string()),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_among_others() {
        assert_eq!(
            session_cookie("theme=dark; session_token=abc123; lang=en"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_session_cookie_missing_or_empty() {
        assert_eq!(session_cookie("theme=dark"), None);
        assert_eq!(session_cookie("session_token="), None);
    }
}
