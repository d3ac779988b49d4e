//! Click recording and per-link click statistics.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use serde_json::json;

use crate::application::services::link_service::check_link_id;
use crate::domain::entities::{ClickOutcome, DailyClicks, day_key, utc_day};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use crate::infrastructure::rate_limit::{RateLimiter, click_key};
use crate::utils::id_generator::is_valid_id;

/// Accepted range for the statistics window, in days.
pub const MAX_STATS_DAYS: u32 = 365;
pub const DEFAULT_STATS_DAYS: u32 = 30;

/// Daily click history of one link.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkClickStats {
    pub link_id: String,
    pub total_clicks: i64,
    /// Most recent day first. Days without clicks are absent.
    pub daily: Vec<DailyClicks>,
}

/// Service for the public click path and owner-side click analytics.
///
/// Recording never fails towards its caller: missing, inactive and
/// erroring cases all collapse into [`ClickOutcome::NotRecorded`] so the
/// redirect experience does not depend on analytics.
pub struct ClickService<L: LinkRepository, C: ClickRepository> {
    links: Arc<L>,
    clicks: Arc<C>,
    rate_limiter: Arc<dyn RateLimiter>,
}

impl<L: LinkRepository, C: ClickRepository> ClickService<L, C> {
    /// Creates a new click service.
    pub fn new(links: Arc<L>, clicks: Arc<C>, rate_limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            links,
            clicks,
            rate_limiter,
        }
    }

    /// Records one click on `link_id` for the UTC day `day` (`YYYY-MM-DD`).
    ///
    /// Increments the lifetime counter and the daily aggregate together.
    pub async fn record(&self, link_id: &str, day: &str) -> ClickOutcome {
        if !is_valid_id(link_id) {
            return suppressed(link_id, "invalid_id");
        }

        match self.links.find_public(link_id).await {
            Ok(Some(target)) if target.is_active => self.record_eligible(link_id, day).await,
            Ok(_) => suppressed(link_id, "ineligible"),
            Err(e) => {
                tracing::warn!(link_id, error = %e, "Click lookup failed");
                suppressed(link_id, "error")
            }
        }
    }

    async fn record_eligible(&self, link_id: &str, day: &str) -> ClickOutcome {
        match self.clicks.record_click(link_id, day).await {
            Ok(true) => {
                metrics::counter!("link_clicks_recorded_total").increment(1);
                ClickOutcome::Recorded
            }
            // Deactivated or deleted between lookup and write.
            Ok(false) => suppressed(link_id, "ineligible"),
            Err(e) => {
                tracing::warn!(link_id, error = %e, "Click recording failed");
                suppressed(link_id, "error")
            }
        }
    }

    /// Resolves a public link to its target URL, counting the visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] with a generic message for unknown,
    /// malformed or inactive links.
    /// Returns [`AppError::TooManyRequests`] when `client_ip` exhausted its
    /// quota for this link.
    /// Returns [`AppError::Internal`] when the lookup itself fails.
    pub async fn resolve_redirect(&self, link_id: &str, client_ip: &str) -> Result<String, AppError> {
        if !is_valid_id(link_id) {
            return Err(AppError::link_not_found());
        }

        let target = self
            .links
            .find_public(link_id)
            .await?
            .filter(|t| t.is_active)
            .ok_or_else(AppError::link_not_found)?;

        self.check_click_quota(link_id, client_ip).await?;

        let outcome = self.record_eligible(link_id, &utc_day(Utc::now())).await;
        tracing::debug!(link_id, recorded = outcome.is_recorded(), "Redirecting");

        Ok(target.url)
    }

    /// Records a click reported by the public profile page.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TooManyRequests`] when `client_ip` exhausted its
    /// quota for this link. Every other failure is reported as
    /// [`ClickOutcome::NotRecorded`].
    pub async fn record_public(
        &self,
        link_id: &str,
        client_ip: &str,
    ) -> Result<ClickOutcome, AppError> {
        self.check_click_quota(link_id, client_ip).await?;
        Ok(self.record(link_id, &utc_day(Utc::now())).await)
    }

    async fn check_click_quota(&self, link_id: &str, client_ip: &str) -> Result<(), AppError> {
        if self.rate_limiter.allow(&click_key(client_ip, link_id)).await {
            Ok(())
        } else {
            metrics::counter!("link_clicks_suppressed_total", "reason" => "rate_limited")
                .increment(1);
            tracing::debug!(link_id, client_ip, "Click rate limited");
            Err(AppError::too_many_requests(
                "Too many requests",
                json!({ "retry_after_secs": 60 }),
            ))
        }
    }

    /// Returns the last `days` days of click aggregates for an owned link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `days` is outside `1..=365`.
    /// Returns [`AppError::NotFound`] if the link is missing or owned by someone else.
    pub async fn daily_stats(
        &self,
        user_id: &str,
        link_id: &str,
        days: u32,
    ) -> Result<LinkClickStats, AppError> {
        self.daily_stats_until(user_id, link_id, days, Utc::now().date_naive())
            .await
    }

    async fn daily_stats_until(
        &self,
        user_id: &str,
        link_id: &str,
        days: u32,
        today: NaiveDate,
    ) -> Result<LinkClickStats, AppError> {
        if days == 0 || days > MAX_STATS_DAYS {
            return Err(AppError::bad_request(
                "days must be between 1 and 365",
                json!({ "days": days }),
            ));
        }
        check_link_id(link_id)?;

        let link = self
            .links
            .find_owned(user_id, link_id)
            .await?
            .ok_or_else(AppError::link_not_found)?;

        let since = day_key(today - Duration::days(i64::from(days) - 1));
        let daily = self.clicks.daily_clicks(link_id, &since).await?;

        Ok(LinkClickStats {
            link_id: link.id,
            total_clicks: link.total_clicks,
            daily,
        })
    }
}

fn suppressed(link_id: &str, reason: &'static str) -> ClickOutcome {
    metrics::counter!("link_clicks_suppressed_total", "reason" => reason).increment(1);
    tracing::debug!(link_id, reason, "Click not recorded");
    ClickOutcome::NotRecorded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Link, RedirectTarget};
    use crate::domain::repositories::{MockClickRepository, MockLinkRepository};
    use crate::infrastructure::rate_limit::MockRateLimiter;

    fn target(active: bool) -> RedirectTarget {
        RedirectTarget {
            id: "l1".to_string(),
            url: "https://example.com/target".to_string(),
            is_active: active,
        }
    }

    fn limiter(allow: bool) -> Arc<dyn RateLimiter> {
        let mut limiter = MockRateLimiter::new();
        limiter.expect_allow().returning(move |_| allow);
        Arc::new(limiter)
    }

    fn service(
        links: MockLinkRepository,
        clicks: MockClickRepository,
        allow: bool,
    ) -> ClickService<MockLinkRepository, MockClickRepository> {
        ClickService::new(Arc::new(links), Arc::new(clicks), limiter(allow))
    }

    #[tokio::test]
    async fn test_record_active_link() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_public()
            .returning(|_| Ok(Some(target(true))));
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_record_click()
            .withf(|link_id, day| link_id == "l1" && day == "2025-06-01")
            .times(1)
            .returning(|_, _| Ok(true));

        let outcome = service(links, clicks, true).record("l1", "2025-06-01").await;

        assert_eq!(outcome, ClickOutcome::Recorded);
    }

    #[tokio::test]
    async fn test_record_inactive_link_writes_nothing() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_public()
            .returning(|_| Ok(Some(target(false))));
        let mut clicks = MockClickRepository::new();
        clicks.expect_record_click().never();

        let outcome = service(links, clicks, true).record("l1", "2025-06-01").await;

        assert_eq!(outcome, ClickOutcome::NotRecorded);
    }

    #[tokio::test]
    async fn test_record_unknown_link() {
        let mut links = MockLinkRepository::new();
        links.expect_find_public().returning(|_| Ok(None));
        let mut clicks = MockClickRepository::new();
        clicks.expect_record_click().never();

        let outcome = service(links, clicks, true).record("nope", "2025-06-01").await;

        assert_eq!(outcome, ClickOutcome::NotRecorded);
    }

    #[tokio::test]
    async fn test_record_swallows_storage_failure() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_public()
            .returning(|_| Ok(Some(target(true))));
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_record_click()
            .returning(|_, _| Err(AppError::internal("Database error", json!({}))));

        let outcome = service(links, clicks, true).record("l1", "2025-06-01").await;

        assert_eq!(outcome, ClickOutcome::NotRecorded);
    }

    #[tokio::test]
    async fn test_record_swallows_lookup_failure() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_public()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let outcome = service(links, MockClickRepository::new(), true)
            .record("l1", "2025-06-01")
            .await;

        assert_eq!(outcome, ClickOutcome::NotRecorded);
    }

    #[tokio::test]
    async fn test_resolve_redirect_records_and_returns_url() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_public()
            .times(1)
            .returning(|_| Ok(Some(target(true))));
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_record_click()
            .times(1)
            .returning(|_, _| Ok(true));

        let url = service(links, clicks, true)
            .resolve_redirect("l1", "203.0.113.7")
            .await
            .unwrap();

        assert_eq!(url, "https://example.com/target");
    }

    #[tokio::test]
    async fn test_resolve_redirect_survives_recording_failure() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_public()
            .returning(|_| Ok(Some(target(true))));
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_record_click()
            .returning(|_, _| Err(AppError::internal("Database error", json!({}))));

        let url = service(links, clicks, true)
            .resolve_redirect("l1", "203.0.113.7")
            .await
            .unwrap();

        assert_eq!(url, "https://example.com/target");
    }

    #[tokio::test]
    async fn test_resolve_redirect_inactive_is_generic_not_found() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_public()
            .returning(|_| Ok(Some(target(false))));

        let err = service(links, MockClickRepository::new(), true)
            .resolve_redirect("l1", "203.0.113.7")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(err.to_error_info().details, json!({}));
    }

    #[tokio::test]
    async fn test_resolve_redirect_rate_limited() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_public()
            .returning(|_| Ok(Some(target(true))));
        let mut clicks = MockClickRepository::new();
        clicks.expect_record_click().never();

        let err = service(links, clicks, false)
            .resolve_redirect("l1", "203.0.113.7")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::TooManyRequests { .. }));
    }

    #[tokio::test]
    async fn test_record_public_uses_ip_and_link_key() {
        let mut limiter = MockRateLimiter::new();
        limiter
            .expect_allow()
            .withf(|key| key == "203.0.113.7:l1")
            .times(1)
            .returning(|_| true);
        let mut links = MockLinkRepository::new();
        links.expect_find_public().returning(|_| Ok(None));

        let service = ClickService::new(
            Arc::new(links),
            Arc::new(MockClickRepository::new()),
            Arc::new(limiter),
        );
        let outcome = service.record_public("l1", "203.0.113.7").await.unwrap();

        assert_eq!(outcome, ClickOutcome::NotRecorded);
    }

    #[tokio::test]
    async fn test_daily_stats_window() {
        let mut links = MockLinkRepository::new();
        links.expect_find_owned().returning(|_, _| {
            Ok(Some(Link::new(
                "l1".to_string(),
                "u1".to_string(),
                "Blog".to_string(),
                "https://example.com".to_string(),
                0,
                true,
                5,
                Utc::now(),
                Utc::now(),
            )))
        });
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_daily_clicks()
            .withf(|link_id, since| link_id == "l1" && since == "2025-05-26")
            .returning(|_, _| {
                Ok(vec![
                    DailyClicks {
                        day: "2025-06-01".to_string(),
                        clicks: 3,
                    },
                    DailyClicks {
                        day: "2025-05-30".to_string(),
                        clicks: 2,
                    },
                ])
            });

        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let stats = service(links, clicks, true)
            .daily_stats_until("u1", "l1", 7, today)
            .await
            .unwrap();

        assert_eq!(stats.total_clicks, 5);
        assert_eq!(stats.daily.len(), 2);
        assert_eq!(stats.daily[0].day, "2025-06-01");
    }

    #[tokio::test]
    async fn test_daily_stats_rejects_bad_window() {
        let svc = service(MockLinkRepository::new(), MockClickRepository::new(), true);

        assert!(matches!(
            svc.daily_stats("u1", "l1", 0).await,
            Err(AppError::Validation { .. })
        ));
        assert!(matches!(
            svc.daily_stats("u1", "l1", 366).await,
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_daily_stats_not_owned() {
        let mut links = MockLinkRepository::new();
        links.expect_find_owned().returning(|_, _| Ok(None));

        let err = service(links, MockClickRepository::new(), true)
            .daily_stats("u1", "l1", 30)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
