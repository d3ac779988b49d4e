//! Authentication service: users and login sessions.

use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::{NewUser, Session, User};
use crate::domain::repositories::{SessionRepository, UserRepository};
use crate::error::AppError;
use crate::utils::id_generator::generate_id;
use crate::utils::username::normalize_new_username;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of a session issued without an explicit TTL.
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 30;

const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const TOKEN_LEN: usize = 48;

/// Generates a cryptographically random session token.
///
/// # Format
///
/// - Length: 48 characters
/// - Character set: A-Z, a-z, 0-9
/// - Entropy: ~286 bits
pub fn generate_session_token() -> String {
    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| TOKEN_CHARSET[rng.random_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}

/// Service resolving session tokens to users and issuing new sessions.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before storage
/// and comparison. An attacker with read-only access to the database cannot verify
/// or forge tokens without the server-side secret.
pub struct AuthService<S: SessionRepository, U: UserRepository> {
    sessions: Arc<S>,
    users: Arc<U>,
    signing_secret: String,
}

impl<S: SessionRepository, U: UserRepository> AuthService<S, U> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `sessions` - session repository
    /// - `users` - user repository
    /// - `signing_secret` - HMAC key; must match the value used when sessions were issued
    pub fn new(sessions: Arc<S>, users: Arc<U>, signing_secret: String) -> Self {
        Self {
            sessions,
            users,
            signing_secret,
        }
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    pub fn hash_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Resolves a raw session token to the id of its user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown, revoked or expired.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn current_user_id(&self, token: &str) -> Result<String, AppError> {
        let token_hash = self.hash_token(token);

        match self.sessions.find_by_token_hash(&token_hash).await? {
            Some(session) if session.is_active_at(Utc::now()) => Ok(session.user_id),
            _ => Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid, expired or revoked session"}),
            )),
        }
    }

    /// Issues a new session for a user and returns the raw token with it.
    ///
    /// The raw token is not stored and cannot be recovered later.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn issue_session(
        &self,
        user_id: &str,
        ttl: Duration,
    ) -> Result<(String, Session), AppError> {
        let token = generate_session_token();
        let session = self
            .sessions
            .create(user_id, &self.hash_token(&token), Utc::now() + ttl)
            .await?;

        tracing::info!(user_id, session_id = session.id, "Session issued");
        Ok((token, session))
    }

    /// Revokes a session by id. Returns `false` if it was missing or already revoked.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn revoke_session(&self, id: i64) -> Result<bool, AppError> {
        self.sessions.revoke(id).await
    }

    /// Lists sessions of a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_sessions(&self, user_id: &str) -> Result<Vec<Session>, AppError> {
        self.sessions.list_for_user(user_id).await
    }

    /// Creates a user account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the username breaks the naming rules.
    /// Returns [`AppError::Conflict`] if the username is taken (case-insensitively).
    pub async fn create_user(&self, username: &str, name: &str) -> Result<User, AppError> {
        let normalized = normalize_new_username(username)?;

        let new_user = NewUser {
            id: generate_id(),
            username: normalized,
            display_username: username.to_string(),
            name: name.trim().to_string(),
        };

        self.users.create(new_user).await.map_err(|e| {
            if e.is_conflict() {
                AppError::conflict(
                    "Username already taken",
                    json!({ "username": username }),
                )
            } else {
                e
            }
        })
    }

    /// Finds a user by username, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no such user exists.
    pub async fn find_user(&self, username: &str) -> Result<User, AppError> {
        self.users
            .find_by_username(&username.to_lowercase())
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "username": username })))
    }

    /// Lists all users, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.users.list().await
    }
}
