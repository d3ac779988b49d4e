//! User entity as seen by the link store.

use chrono::{DateTime, Utc};

/// An account owned by the authentication subsystem.
///
/// `username` is stored lower-cased and is unique; `display_username`
/// keeps the casing chosen at sign-up.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub display_username: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub username: String,
    pub display_username: String,
    pub name: String,
}
