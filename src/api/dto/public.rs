//! DTOs for the public profile and click endpoints.

use serde::Serialize;

use crate::application::services::PublicProfile;
use crate::domain::entities::PublicLink;

#[derive(Debug, Serialize)]
pub struct PublicLinkItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub position: i32,
}

impl From<PublicLink> for PublicLinkItem {
    fn from(link: PublicLink) -> Self {
        Self {
            id: link.id,
            title: link.title,
            url: link.url,
            position: link.position,
        }
    }
}

/// Response of `GET /{username}`.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub display_username: String,
    pub name: String,
    pub links: Vec<PublicLinkItem>,
}

impl From<PublicProfile> for ProfileResponse {
    fn from(profile: PublicProfile) -> Self {
        Self {
            username: profile.username,
            display_username: profile.display_username,
            name: profile.name,
            links: profile.links.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response of `POST /clicks/{link_id}`.
#[derive(Debug, Serialize)]
pub struct ClickRecordedResponse {
    pub recorded: bool,
}
