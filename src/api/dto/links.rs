//! DTOs for the authenticated link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::application::services::LinkClickStats;
use crate::application::services::click_service::DEFAULT_STATS_DAYS;
use crate::application::services::link_service::validate_title;
use crate::domain::entities::{DailyClicks, Link, LinkPatch};
use crate::domain::position::{Direction, ReorderOutcome};
use crate::utils::url_validator::validate_url_field;

/// Request body for `POST /api/links`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(custom(function = "validate_title_field"))]
    pub title: String,

    #[validate(custom(function = "validate_url_field"))]
    pub url: String,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

fn validate_title_field(title: &str) -> Result<(), ValidationError> {
    validate_title(title).map_err(|e| {
        let mut err = ValidationError::new(e.code());
        err.message = Some(e.to_string().into());
        err
    })
}

/// Request body for `PATCH /api/links/{id}`.
///
/// All fields are optional; only provided fields are changed.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(custom(function = "validate_title_field"))]
    pub title: Option<String>,

    #[validate(custom(function = "validate_url_field"))]
    pub url: Option<String>,

    pub is_active: Option<bool>,
}

impl From<UpdateLinkRequest> for LinkPatch {
    fn from(req: UpdateLinkRequest) -> Self {
        LinkPatch {
            title: req.title,
            url: req.url,
            is_active: req.is_active,
        }
    }
}

/// Request body for `POST /api/links/{id}/move`.
#[derive(Debug, Deserialize)]
pub struct MoveLinkRequest {
    pub direction: MoveDirection,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

impl From<MoveDirection> for Direction {
    fn from(d: MoveDirection) -> Self {
        match d {
            MoveDirection::Up => Direction::Up,
            MoveDirection::Down => Direction::Down,
        }
    }
}

/// Response of `POST /api/links/{id}/move`.
#[derive(Debug, Serialize)]
pub struct MoveLinkResponse {
    pub moved: bool,
    pub message: Option<&'static str>,
}

impl From<ReorderOutcome> for MoveLinkResponse {
    fn from(outcome: ReorderOutcome) -> Self {
        Self {
            moved: outcome.moved(),
            message: outcome.message(),
        }
    }
}

/// Owner view of a link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: String,
    pub title: String,
    pub url: String,
    pub position: i32,
    pub is_active: bool,
    pub total_clicks: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            title: link.title,
            url: link.url,
            position: link.position,
            is_active: link.is_active,
            total_clicks: link.total_clicks,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Query parameters for `GET /api/links/{id}/clicks`.
#[derive(Debug, Deserialize, Validate)]
pub struct ClicksQuery {
    #[serde(default = "default_days")]
    #[validate(range(min = 1, max = 365, message = "days must be between 1 and 365"))]
    pub days: u32,
}

fn default_days() -> u32 {
    DEFAULT_STATS_DAYS
}

#[derive(Debug, Serialize)]
pub struct DailyClicksItem {
    pub day: String,
    pub clicks: i64,
}

impl From<DailyClicks> for DailyClicksItem {
    fn from(d: DailyClicks) -> Self {
        Self {
            day: d.day,
            clicks: d.clicks,
        }
    }
}

/// Response of `GET /api/links/{id}/clicks`.
#[derive(Debug, Serialize)]
pub struct LinkClicksResponse {
    pub link_id: String,
    pub total_clicks: i64,
    pub days: u32,
    pub daily: Vec<DailyClicksItem>,
}

impl LinkClicksResponse {
    pub fn new(stats: LinkClickStats, days: u32) -> Self {
        Self {
            link_id: stats.link_id,
            total_clicks: stats.total_clicks,
            days,
            daily: stats.daily.into_iter().map(Into::into).collect(),
        }
    }
}
