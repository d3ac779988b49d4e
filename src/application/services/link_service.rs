//! Link management service: creation, edits, deletion and reordering.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::position::{Direction, ReorderOutcome, next_position, plan_swap};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::rate_limit::{RateLimiter, user_key};
use crate::utils::id_generator::{generate_id, is_valid_id};
use crate::utils::url_validator::validate_target_url;

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

const RETRY_BASE_MILLIS: u64 = 10;
const RETRY_MAX_DELAY: Duration = Duration::from_millis(200);

/// Service for a user's ordered link list.
///
/// Every operation is scoped by the caller's user id. Position-changing
/// operations (create, delete, reorder) re-read the current order on each
/// attempt and are retried when a concurrent writer wins the uniqueness race.
pub struct LinkService<L: LinkRepository> {
    repository: Arc<L>,
    rate_limiter: Arc<dyn RateLimiter>,
    conflict_retries: usize,
}

/// Rejects link ids that cannot have been generated by [`generate_id`].
pub fn check_link_id(link_id: &str) -> Result<(), AppError> {
    if is_valid_id(link_id) {
        Ok(())
    } else {
        Err(AppError::bad_request(
            "Invalid link id",
            json!({ "link_id": link_id }),
        ))
    }
}

/// Why a link title was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TitleError {
    #[error("Title is required")]
    Empty,

    #[error("Title too long")]
    TooLong,
}

impl TitleError {
    /// Machine-readable rule name, used as the validation error code.
    pub fn code(self) -> &'static str {
        match self {
            TitleError::Empty => "required",
            TitleError::TooLong => "too_long",
        }
    }
}

/// Checks a link title: non-empty and at most [`MAX_TITLE_LEN`] characters.
pub fn validate_title(title: &str) -> Result<(), TitleError> {
    match title.chars().count() {
        0 => Err(TitleError::Empty),
        n if n > MAX_TITLE_LEN => Err(TitleError::TooLong),
        _ => Ok(()),
    }
}

fn check_title(title: &str) -> Result<(), AppError> {
    validate_title(title).map_err(|e| {
        AppError::bad_request(
            e.to_string(),
            json!({ "field": "title", "reason": e.code(), "max": MAX_TITLE_LEN }),
        )
    })
}

fn check_url(url: &str) -> Result<(), AppError> {
    validate_target_url(url).map_err(|e| {
        AppError::bad_request(
            "Invalid URL",
            json!({ "field": "url", "reason": e.to_string() }),
        )
    })
}

impl<L: LinkRepository> LinkService<L> {
    /// Creates a new link service.
    ///
    /// # Arguments
    ///
    /// - `repository` - link repository
    /// - `rate_limiter` - consulted with `user:<id>` before each creation
    /// - `conflict_retries` - extra attempts after a uniqueness conflict
    pub fn new(
        repository: Arc<L>,
        rate_limiter: Arc<dyn RateLimiter>,
        conflict_retries: usize,
    ) -> Self {
        Self {
            repository,
            rate_limiter,
            conflict_retries,
        }
    }

    /// Lists all links of the user, ascending by position.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list(&self, user_id: &str) -> Result<Vec<Link>, AppError> {
        self.repository.list_by_user(user_id).await
    }

    /// Retrieves one of the user's links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link is missing or owned by someone else.
    /// Returns [`AppError::Validation`] for a malformed link id.
    pub async fn get(&self, user_id: &str, link_id: &str) -> Result<Link, AppError> {
        check_link_id(link_id)?;
        self.repository
            .find_owned(user_id, link_id)
            .await?
            .ok_or_else(AppError::link_not_found)
    }

    /// Appends a new link to the end of the user's list.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty or overlong title or a
    /// non-http(s) URL.
    /// Returns [`AppError::TooManyRequests`] when the user's creation quota is spent.
    /// Returns [`AppError::Conflict`] if concurrent inserts kept winning the
    /// position race after all retries.
    pub async fn create(
        &self,
        user_id: &str,
        title: &str,
        url: &str,
        is_active: bool,
    ) -> Result<Link, AppError> {
        check_title(title)?;
        check_url(url)?;

        if !self.rate_limiter.allow(&user_key(user_id)).await {
            return Err(AppError::too_many_requests(
                "Too many requests",
                json!({ "retry_after_secs": 60 }),
            ));
        }

        let link = self
            .with_conflict_retry("create", || {
                self.append(user_id, title, url, is_active)
            })
            .await?;

        tracing::debug!(user_id, link_id = %link.id, position = link.position, "Link created");
        Ok(link)
    }

    async fn append(
        &self,
        user_id: &str,
        title: &str,
        url: &str,
        is_active: bool,
    ) -> Result<Link, AppError> {
        let max = self.repository.max_position(user_id).await?;

        self.repository
            .create(NewLink {
                id: generate_id(),
                user_id: user_id.to_string(),
                title: title.to_string(),
                url: url.to_string(),
                position: next_position(max),
                is_active,
            })
            .await
    }

    /// Updates title, URL and/or active flag of an owned link.
    ///
    /// An empty patch returns the link unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for invalid field values.
    /// Returns [`AppError::NotFound`] if the link is missing or owned by someone else.
    pub async fn update(
        &self,
        user_id: &str,
        link_id: &str,
        patch: LinkPatch,
    ) -> Result<Link, AppError> {
        check_link_id(link_id)?;
        if let Some(title) = &patch.title {
            check_title(title)?;
        }
        if let Some(url) = &patch.url {
            check_url(url)?;
        }

        if patch.is_empty() {
            return self.get(user_id, link_id).await;
        }

        self.repository
            .update_fields(user_id, link_id, patch)
            .await?
            .ok_or_else(AppError::link_not_found)
    }

    /// Deletes an owned link and closes the gap it leaves.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link is missing or owned by someone else.
    /// Returns [`AppError::Conflict`] if the order kept changing underneath.
    pub async fn delete(&self, user_id: &str, link_id: &str) -> Result<(), AppError> {
        check_link_id(link_id)?;

        self.with_conflict_retry("delete", || self.delete_once(user_id, link_id))
            .await?;

        tracing::debug!(user_id, link_id, "Link deleted");
        Ok(())
    }

    async fn delete_once(&self, user_id: &str, link_id: &str) -> Result<(), AppError> {
        let link = self
            .repository
            .find_owned(user_id, link_id)
            .await?
            .ok_or_else(AppError::link_not_found)?;

        self.repository
            .delete_and_shift(user_id, link_id, link.position)
            .await
    }

    /// Moves an owned link one step up or down.
    ///
    /// Moving past either end is reported through the returned
    /// [`ReorderOutcome`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link is missing or owned by someone else.
    /// Returns [`AppError::Conflict`] if the order kept changing underneath.
    pub async fn reorder(
        &self,
        user_id: &str,
        link_id: &str,
        direction: Direction,
    ) -> Result<ReorderOutcome, AppError> {
        check_link_id(link_id)?;

        let outcome = self
            .with_conflict_retry("reorder", || {
                self.reorder_once(user_id, link_id, direction)
            })
            .await?;

        tracing::debug!(user_id, link_id, ?outcome, "Link reordered");
        Ok(outcome)
    }

    async fn reorder_once(
        &self,
        user_id: &str,
        link_id: &str,
        direction: Direction,
    ) -> Result<ReorderOutcome, AppError> {
        let link = self
            .repository
            .find_owned(user_id, link_id)
            .await?
            .ok_or_else(AppError::link_not_found)?;

        let neighbour = match direction.target(link.position) {
            Some(target) => self.repository.find_at_position(user_id, target).await?,
            None => None,
        };

        let plan = match plan_swap(
            &link.id,
            link.position,
            direction,
            neighbour.as_ref().map(|n| n.id.as_str()),
        ) {
            Ok(plan) => plan,
            Err(noop) => return Ok(noop),
        };

        let outcome = plan.outcome();
        self.repository.swap_positions(user_id, plan).await?;
        Ok(outcome)
    }

    /// Runs `attempt` again while it fails with [`AppError::Conflict`], up to
    /// the configured number of retries with jittered exponential backoff.
    async fn with_conflict_retry<T, F, Fut>(
        &self,
        operation: &'static str,
        attempt: F,
    ) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let strategy = ExponentialBackoff::from_millis(RETRY_BASE_MILLIS)
            .max_delay(RETRY_MAX_DELAY)
            .map(jitter)
            .take(self.conflict_retries);

        let result = RetryIf::spawn(strategy, attempt, |e: &AppError| {
            if e.is_conflict() {
                metrics::counter!("link_position_conflicts_total", "operation" => operation)
                    .increment(1);
                tracing::debug!(operation, error = %e, "Position conflict, retrying");
                true
            } else {
                false
            }
        })
        .await;

        result.map_err(|e| {
            if e.is_conflict() {
                tracing::warn!(operation, "Position conflict persisted after retries");
                AppError::conflict(
                    "Links were modified concurrently, please try again",
                    json!({ "operation": operation }),
                )
            } else {
                e
            }
        })
    }
}
