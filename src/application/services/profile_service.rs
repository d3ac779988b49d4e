//! Public profile lookup.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::PublicLink;
use crate::domain::repositories::{LinkRepository, UserRepository};
use crate::error::AppError;
use crate::utils::username::normalize_lookup;

/// What an anonymous visitor sees at `/{username}`.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicProfile {
    pub username: String,
    pub display_username: String,
    pub name: String,
    pub links: Vec<PublicLink>,
}

/// Service assembling public profiles from users and their active links.
pub struct ProfileService<U: UserRepository, L: LinkRepository> {
    users: Arc<U>,
    links: Arc<L>,
}

impl<U: UserRepository, L: LinkRepository> ProfileService<U, L> {
    /// Creates a new profile service.
    pub fn new(users: Arc<U>, links: Arc<L>) -> Self {
        Self { users, links }
    }

    /// Looks up a profile by username, case-insensitively.
    ///
    /// Only active links are included, in display order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown or malformed usernames.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn public_profile(&self, username: &str) -> Result<PublicProfile, AppError> {
        let lookup = normalize_lookup(username).ok_or_else(user_not_found)?;

        let user = self
            .users
            .find_by_username(&lookup)
            .await?
            .ok_or_else(user_not_found)?;

        let links = self.links.list_active_public(&user.id).await?;

        Ok(PublicProfile {
            username: user.username,
            display_username: user.display_username,
            name: user.name,
            links,
        })
    }
}

fn user_not_found() -> AppError {
    AppError::not_found("User not found", json!({}))
}
