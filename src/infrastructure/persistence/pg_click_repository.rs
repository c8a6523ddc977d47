//! PostgreSQL implementation of the click ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;
use serde_json::json;

/// PostgreSQL repository for the append-only click ledger.
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
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError> {
        // One ledger row, one counter increment, one transaction. The
        // increment is storage-level arithmetic so concurrent records for
        // the same link never lose updates.
        let mut tx = self.pool.begin().await?;

        let click = sqlx::query_as::<_, Click>(
            r#"
            INSERT INTO link_clicks (link_id, actor_id, ip, user_agent, referer, clicked_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, link_id, actor_id, ip, user_agent, referer, clicked_at
            "#,
        )
        .bind(new_click.link_id)
        .bind(new_click.actor_id)
        .bind(&new_click.ip)
        .bind(&new_click.user_agent)
        .bind(&new_click.referer)
        .bind(new_click.clicked_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => AppError::bad_request(
                "Tracking link does not exist",
                json!({ "link_id": new_click.link_id }),
            ),
            _ => AppError::from(e),
        })?;

        let updated = sqlx::query(
            "UPDATE tracking_links SET click_count = click_count + 1 WHERE id = $1",
        )
        .bind(new_click.link_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            // The FK above guarantees the link row exists; reaching this
            // means the ledger and registry disagree.
            return Err(AppError::invariant(
                "Click recorded for a link with no registry row",
                json!({ "link_id": new_click.link_id }),
            ));
        }

        tx.commit().await?;

        Ok(click)
    }

    async fn count_for_link(&self, link_id: i64) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM link_clicks WHERE link_id = $1")
                .bind(link_id)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }

    async fn count_for_actor(
        &self,
        actor_id: i64,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM link_clicks c
            JOIN tracking_links l ON l.id = c.link_id
            WHERE l.actor_id = $1
              AND ($2::timestamptz IS NULL OR c.clicked_at >= $2)
            "#,
        )
        .bind(actor_id)
        .bind(since)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn reconcile(&self, link_id: i64) -> Result<Option<i64>, AppError> {
        let corrected: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE tracking_links
            SET click_count = (SELECT COUNT(*) FROM link_clicks WHERE link_id = $1)
            WHERE id = $1
            RETURNING click_count
            "#,
        )
        .bind(link_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(corrected)
    }
}
