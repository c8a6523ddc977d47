//! PostgreSQL implementation of partner lookups.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::Partner;
use crate::domain::repositories::PartnerRepository;
use crate::error::AppError;

/// PostgreSQL repository for the read-only partner registry.
pub struct PgPartnerRepository {
    pool: Arc<PgPool>,
}

impl PgPartnerRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PartnerRepository for PgPartnerRepository {
    async fn find_by_id(&self, partner_id: i64) -> Result<Option<Partner>, AppError> {
        let partner = sqlx::query_as::<_, Partner>(
            "SELECT id, name, commission_rate, webhook_secret, is_active, created_at \
             FROM partners WHERE id = $1",
        )
        .bind(partner_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(partner)
    }
}
