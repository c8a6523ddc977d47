//! PostgreSQL implementation of the link registry.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewTrackingLink, TrackingLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, actor_id, content_id, product_id, tracking_code, \
                            destination_url, click_count, created_at, deleted_at";

/// PostgreSQL repository for tracking links.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn upsert(&self, new_link: NewTrackingLink) -> Result<TrackingLink, AppError> {
        // The DO UPDATE clause is a no-op write against the existing row: it
        // changes nothing but makes RETURNING yield the row on conflict, so
        // concurrent registrations of the same triple all observe the single
        // surviving record.
        let sql = format!(
            r#"
            INSERT INTO tracking_links
                (actor_id, content_id, product_id, tracking_code, destination_url)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (actor_id, content_id, product_id)
            DO UPDATE SET destination_url = tracking_links.destination_url
            RETURNING {LINK_COLUMNS}
            "#
        );

        let link = sqlx::query_as::<_, TrackingLink>(&sql)
            .bind(new_link.actor_id)
            .bind(new_link.content_id)
            .bind(new_link.product_id)
            .bind(&new_link.tracking_code)
            .bind(&new_link.destination_url)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(link)
    }

    async fn find_by_code(&self, tracking_code: &str) -> Result<Option<TrackingLink>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM tracking_links \
             WHERE tracking_code = $1 AND deleted_at IS NULL"
        );

        let link = sqlx::query_as::<_, TrackingLink>(&sql)
            .bind(tracking_code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(link)
    }

    async fn find_by_code_including_deleted(
        &self,
        tracking_code: &str,
    ) -> Result<Option<TrackingLink>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM tracking_links WHERE tracking_code = $1");

        let link = sqlx::query_as::<_, TrackingLink>(&sql)
            .bind(tracking_code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(link)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<TrackingLink>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM tracking_links WHERE id = $1");

        let link = sqlx::query_as::<_, TrackingLink>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(link)
    }

    async fn list_for_actor(&self, actor_id: i64) -> Result<Vec<TrackingLink>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM tracking_links \
             WHERE actor_id = $1 ORDER BY created_at DESC"
        );

        let links = sqlx::query_as::<_, TrackingLink>(&sql)
            .bind(actor_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(links)
    }

    async fn soft_delete_for_content(&self, content_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE tracking_links SET deleted_at = now() \
             WHERE content_id = $1 AND deleted_at IS NULL",
        )
        .bind(content_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }
}
