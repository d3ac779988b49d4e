//! Repository trait for click counters and daily aggregates.

use crate::domain::entities::DailyClicks;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for click accounting.
///
/// `record_click` is the only write path for `total_clicks` and
/// `link_click_daily`; both change together or not at all.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Increments the link's lifetime counter and upserts the `(link_id, day)`
    /// aggregate in one transaction.
    ///
    /// Returns `Ok(false)` without writing anything when the link does not
    /// exist or is inactive at commit time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record_click(&self, link_id: &str, day: &str) -> Result<bool, AppError>;

    /// Daily aggregates of a link with `day >= since_day`, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn daily_clicks(
        &self,
        link_id: &str,
        since_day: &str,
    ) -> Result<Vec<DailyClicks>, AppError>;
}
