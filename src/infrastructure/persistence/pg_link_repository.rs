//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;

use crate::domain::entities::{Link, LinkPatch, NewLink, PublicLink, RedirectTarget};
use crate::domain::position::{EMPTY_MAX_POSITION, PositionWrite, SwapPlan, next_position};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str =
    "id, user_id, title, url, position, is_active, total_clicks, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: String,
    user_id: String,
    title: String,
    url: String,
    position: i32,
    is_active: bool,
    total_clicks: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(
            r.id,
            r.user_id,
            r.title,
            r.url,
            r.position,
            r.is_active,
            r.total_clicks,
            r.created_at,
            r.updated_at,
        )
    }
}

#[derive(sqlx::FromRow)]
struct PublicLinkRow {
    id: String,
    title: String,
    url: String,
    position: i32,
}

#[derive(sqlx::FromRow)]
struct RedirectRow {
    id: String,
    url: String,
    is_active: bool,
}

/// PostgreSQL repository for ordered link storage.
///
/// Every position change (insert, delete, swap) runs inside a transaction
/// that first locks the owner's `users` row, so changes to one user's order
/// are applied one at a time. The `links_user_position_key` constraint stays
/// as the backstop.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn stale_order(user_id: &str, link_id: &str) -> AppError {
    AppError::conflict(
        "Link order changed concurrently",
        json!({"user_id": user_id, "link_id": link_id}),
    )
}

/// Serializes position changes for `user_id` until the transaction ends.
async fn lock_user_order(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &str,
) -> Result<(), AppError> {
    sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?;

    Ok(())
}

async fn apply_write(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &str,
    write: &PositionWrite,
) -> Result<u64, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE links SET position = $4
        WHERE id = $1 AND user_id = $2 AND position = $3
        "#,
    )
    .bind(&write.link_id)
    .bind(user_id)
    .bind(write.expected)
    .bind(write.to)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Link>, AppError> {
        let rows: Vec<LinkRow> = sqlx::query_as(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE user_id = $1 ORDER BY position ASC"
        ))
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn list_active_public(&self, user_id: &str) -> Result<Vec<PublicLink>, AppError> {
        let rows: Vec<PublicLinkRow> = sqlx::query_as(
            r#"
            SELECT id, title, url, position
            FROM links
            WHERE user_id = $1 AND is_active = TRUE
            ORDER BY position ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| PublicLink {
                id: r.id,
                title: r.title,
                url: r.url,
                position: r.position,
            })
            .collect())
    }

    async fn find_owned(&self, user_id: &str, link_id: &str) -> Result<Option<Link>, AppError> {
        let row: Option<LinkRow> = sqlx::query_as(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE id = $1 AND user_id = $2"
        ))
        .bind(link_id)
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_public(&self, link_id: &str) -> Result<Option<RedirectTarget>, AppError> {
        let row: Option<RedirectRow> =
            sqlx::query_as("SELECT id, url, is_active FROM links WHERE id = $1")
                .bind(link_id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(row.map(|r| RedirectTarget {
            id: r.id,
            url: r.url,
            is_active: r.is_active,
        }))
    }

    async fn find_at_position(
        &self,
        user_id: &str,
        position: i32,
    ) -> Result<Option<Link>, AppError> {
        let row: Option<LinkRow> = sqlx::query_as(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE user_id = $1 AND position = $2"
        ))
        .bind(user_id)
        .bind(position)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn max_position(&self, user_id: &str) -> Result<i32, AppError> {
        let max: Option<i32> = sqlx::query_scalar("SELECT MAX(position) FROM links WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(max.unwrap_or(EMPTY_MAX_POSITION))
    }

    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut tx = self.pool.begin().await?;
        lock_user_order(&mut tx, &new_link.user_id).await?;

        let max: Option<i32> =
            sqlx::query_scalar("SELECT MAX(position) FROM links WHERE user_id = $1")
                .bind(&new_link.user_id)
                .fetch_one(&mut *tx)
                .await?;

        // The caller computed the position from an earlier read; a delete
        // committed since then would otherwise leave a gap.
        if next_position(max.unwrap_or(EMPTY_MAX_POSITION)) != new_link.position {
            tx.rollback().await?;
            return Err(stale_order(&new_link.user_id, &new_link.id));
        }

        let row: LinkRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO links (id, user_id, title, url, position, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(&new_link.id)
        .bind(&new_link.user_id)
        .bind(&new_link.title)
        .bind(&new_link.url)
        .bind(new_link.position)
        .bind(new_link.is_active)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    async fn update_fields(
        &self,
        user_id: &str,
        link_id: &str,
        patch: LinkPatch,
    ) -> Result<Option<Link>, AppError> {
        let row: Option<LinkRow> = sqlx::query_as(&format!(
            r#"
            UPDATE links SET
                title      = COALESCE($3::TEXT, title),
                url        = COALESCE($4::TEXT, url),
                is_active  = COALESCE($5::BOOLEAN, is_active),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(link_id)
        .bind(user_id)
        .bind(patch.title)
        .bind(patch.url)
        .bind(patch.is_active)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn swap_positions(&self, user_id: &str, plan: SwapPlan) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        lock_user_order(&mut tx, user_id).await?;

        for write in plan.writes() {
            if apply_write(&mut tx, user_id, &write).await? != 1 {
                tx.rollback().await?;
                return Err(stale_order(user_id, &write.link_id));
            }
        }

        sqlx::query("UPDATE links SET updated_at = NOW() WHERE user_id = $1 AND id IN ($2, $3)")
            .bind(user_id)
            .bind(&plan.moving_id)
            .bind(&plan.displaced_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete_and_shift(
        &self,
        user_id: &str,
        link_id: &str,
        position: i32,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        lock_user_order(&mut tx, user_id).await?;

        let deleted =
            sqlx::query("DELETE FROM links WHERE id = $1 AND user_id = $2 AND position = $3")
                .bind(link_id)
                .bind(user_id)
                .bind(position)
                .execute(&mut *tx)
                .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(stale_order(user_id, link_id));
        }

        // Uniqueness is checked at end of statement, so the shift may pass
        // through transient duplicates.
        sqlx::query(
            r#"
            UPDATE links SET position = position - 1, updated_at = NOW()
            WHERE user_id = $1 AND position > $2
            "#,
        )
        .bind(user_id)
        .bind(position)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
