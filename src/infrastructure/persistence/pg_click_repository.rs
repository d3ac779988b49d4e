//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::DailyClicks;
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct DailyRow {
    day: String,
    clicks: i64,
}

/// PostgreSQL repository for click counters.
///
/// The counter increment and the daily upsert share one transaction, so
/// `total_clicks` always equals the sum of the link's daily rows.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record_click(&self, link_id: &str, day: &str) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let bumped = sqlx::query(
            r#"
            UPDATE links SET total_clicks = total_clicks + 1
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(link_id)
        .execute(&mut *tx)
        .await?;

        if bumped.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO link_click_daily (link_id, day, clicks)
            VALUES ($1, $2, 1)
            ON CONFLICT (link_id, day)
            DO UPDATE SET clicks = link_click_daily.clicks + 1
            "#,
        )
        .bind(link_id)
        .bind(day)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn daily_clicks(
        &self,
        link_id: &str,
        since_day: &str,
    ) -> Result<Vec<DailyClicks>, AppError> {
        let rows: Vec<DailyRow> = sqlx::query_as(
            r#"
            SELECT day, clicks
            FROM link_click_daily
            WHERE link_id = $1 AND day >= $2
            ORDER BY day DESC
            "#,
        )
        .bind(link_id)
        .bind(since_day)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| DailyClicks {
                day: r.day,
                clicks: r.clicks,
            })
            .collect())
    }
}
