//! Link entity: one outbound link in a user's ordered list.

use chrono::{DateTime, Utc};

/// A link owned by exactly one user.
///
/// `position` is the zero-based rank within the owner's list. For a fixed
/// owner the positions always form `0..count` with no gaps or duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub url: String,
    pub position: i32,
    pub is_active: bool,
    pub total_clicks: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        user_id: String,
        title: String,
        url: String,
        position: i32,
        is_active: bool,
        total_clicks: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            title,
            url,
            position,
            is_active,
            total_clicks,
            created_at,
            updated_at,
        }
    }
}

/// Input data for creating a new link.
///
/// The position is assigned by the link service, never by the caller.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub url: String,
    pub position: i32,
    pub is_active: bool,
}

/// Partial update for an existing link.
///
/// Position and click counters are deliberately absent: they only change
/// through reordering and click recording.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub is_active: Option<bool>,
}

impl LinkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.url.is_none() && self.is_active.is_none()
    }
}

/// Public profile view of an active link. Carries no owner or analytics data.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicLink {
    pub id: String,
    pub title: String,
    pub url: String,
    pub position: i32,
}

/// What the redirect path may see of a link.
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectTarget {
    pub id: String,
    pub url: String,
    pub is_active: bool,
}
