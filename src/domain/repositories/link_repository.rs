//! Repository trait for link data access.

use crate::domain::entities::{Link, LinkPatch, NewLink, PublicLink, RedirectTarget};
use crate::domain::position::SwapPlan;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for a user's ordered links.
///
/// Every method taking both a `user_id` and a `link_id` matches on both in
/// the query predicate. A link owned by someone else is indistinguishable
/// from a missing one.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// All links of a user, ascending by position.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Link>, AppError>;

    /// Active links of a user projected to public fields, ascending by position.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_active_public(&self, user_id: &str) -> Result<Vec<PublicLink>, AppError>;

    /// Finds a link by id, only if it belongs to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_owned(&self, user_id: &str, link_id: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by id regardless of owner, projected for the redirect path.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_public(&self, link_id: &str) -> Result<Option<RedirectTarget>, AppError>;

    /// Finds the user's link at exactly `position`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_at_position(&self, user_id: &str, position: i32)
    -> Result<Option<Link>, AppError>;

    /// Highest position of the user's links, or `-1` when there are none.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn max_position(&self, user_id: &str) -> Result<i32, AppError>;

    /// Inserts a new link at `new_link.position`.
    ///
    /// The position must still be the user's next free slot when the insert
    /// runs under the per-user order lock.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if another create or delete changed the
    /// user's order since `max_position` was read.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Updates title, url and/or active flag of an owned link.
    ///
    /// Returns `Ok(None)` when no link matches `user_id` + `link_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update_fields(
        &self,
        user_id: &str,
        link_id: &str,
        patch: LinkPatch,
    ) -> Result<Option<Link>, AppError>;

    /// Applies the three writes of `plan` in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the rows no longer match the state
    /// the plan was computed from, or when the uniqueness constraint rejects
    /// a write. Nothing is applied in that case.
    /// Returns [`AppError::Internal`] on database errors.
    async fn swap_positions(&self, user_id: &str, plan: SwapPlan) -> Result<(), AppError>;

    /// Deletes the link at `position` and shifts every later link of the
    /// user down by one, in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the link is no longer at
    /// `position`; nothing is applied in that case.
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_and_shift(
        &self,
        user_id: &str,
        link_id: &str,
        position: i32,
    ) -> Result<(), AppError>;
}
