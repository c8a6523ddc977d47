//! PostgreSQL implementation of the attribution/settlement ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Earning, NewTransaction, Transaction};
use crate::domain::repositories::SettlementRepository;
use crate::error::AppError;

const TX_COLUMNS: &str = "id, link_id, actor_id, partner_id, external_order_id, amount, \
                          commission, status, transaction_date, created_at, updated_at";

const EARNING_COLUMNS: &str =
    "id, actor_id, transaction_id, amount, status, payment_date, created_at, updated_at";

/// PostgreSQL repository for conversion transactions and earnings.
///
/// Status transitions are compare-and-set `UPDATE ... WHERE status = x`
/// statements; transitions with side effects (earning creation, retraction,
/// compensation) run in a single database transaction with the CAS so the
/// pair commits or rolls back as one.
pub struct PgSettlementRepository {
    pool: Arc<PgPool>,
}

impl PgSettlementRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettlementRepository for PgSettlementRepository {
    async fn insert_transaction(
        &self,
        new_transaction: NewTransaction,
    ) -> Result<Option<Transaction>, AppError> {
        let sql = format!(
            r#"
            INSERT INTO affiliate_transactions
                (link_id, actor_id, partner_id, external_order_id,
                 amount, commission, status, transaction_date)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7)
            ON CONFLICT (partner_id, external_order_id) DO NOTHING
            RETURNING {TX_COLUMNS}
            "#
        );

        let transaction = sqlx::query_as::<_, Transaction>(&sql)
            .bind(new_transaction.link_id)
            .bind(new_transaction.actor_id)
            .bind(new_transaction.partner_id)
            .bind(&new_transaction.external_order_id)
            .bind(new_transaction.amount)
            .bind(new_transaction.commission)
            .bind(new_transaction.transaction_date)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(transaction)
    }

    async fn find_transaction(&self, transaction_id: i64) -> Result<Option<Transaction>, AppError> {
        let sql = format!("SELECT {TX_COLUMNS} FROM affiliate_transactions WHERE id = $1");

        let transaction = sqlx::query_as::<_, Transaction>(&sql)
            .bind(transaction_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(transaction)
    }

    async fn find_by_external_order(
        &self,
        partner_id: i64,
        external_order_id: &str,
    ) -> Result<Option<Transaction>, AppError> {
        let sql = format!(
            "SELECT {TX_COLUMNS} FROM affiliate_transactions \
             WHERE partner_id = $1 AND external_order_id = $2"
        );

        let transaction = sqlx::query_as::<_, Transaction>(&sql)
            .bind(partner_id)
            .bind(external_order_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(transaction)
    }

    async fn complete_transaction(
        &self,
        transaction_id: i64,
    ) -> Result<Option<(Transaction, Earning)>, AppError> {
        let mut tx = self.pool.begin().await?;

        let cas_sql = format!(
            r#"
            UPDATE affiliate_transactions
            SET status = 'completed', updated_at = now()
            WHERE id = $1 AND status = 'pending'
            RETURNING {TX_COLUMNS}
            "#
        );

        let Some(transaction) = sqlx::query_as::<_, Transaction>(&cas_sql)
            .bind(transaction_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let earning_sql = format!(
            r#"
            INSERT INTO earnings (actor_id, transaction_id, amount, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING {EARNING_COLUMNS}
            "#
        );

        let earning = sqlx::query_as::<_, Earning>(&earning_sql)
            .bind(transaction.actor_id)
            .bind(transaction.id)
            .bind(transaction.commission)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some((transaction, earning)))
    }

    async fn cancel_transaction(
        &self,
        transaction_id: i64,
    ) -> Result<Option<Transaction>, AppError> {
        let sql = format!(
            r#"
            UPDATE affiliate_transactions
            SET status = 'cancelled', updated_at = now()
            WHERE id = $1 AND status = 'pending'
            RETURNING {TX_COLUMNS}
            "#
        );

        let transaction = sqlx::query_as::<_, Transaction>(&sql)
            .bind(transaction_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(transaction)
    }

    async fn refund_transaction(
        &self,
        transaction_id: i64,
    ) -> Result<Option<Transaction>, AppError> {
        let mut tx = self.pool.begin().await?;

        let cas_sql = format!(
            r#"
            UPDATE affiliate_transactions
            SET status = 'refunded', updated_at = now()
            WHERE id = $1 AND status = 'completed'
            RETURNING {TX_COLUMNS}
            "#
        );

        let Some(transaction) = sqlx::query_as::<_, Transaction>(&cas_sql)
            .bind(transaction_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        // Retract the earning if it has not been paid yet.
        let retracted = sqlx::query(
            r#"
            UPDATE earnings
            SET status = 'failed', updated_at = now()
            WHERE transaction_id = $1 AND amount > 0
              AND status IN ('pending', 'processing')
            "#,
        )
        .bind(transaction_id)
        .execute(&mut *tx)
        .await?;

        if retracted.rows_affected() == 0 {
            // Already paid out: append a compensating negative entry instead
            // of touching the paid record.
            let paid_sql = format!(
                "SELECT {EARNING_COLUMNS} FROM earnings \
                 WHERE transaction_id = $1 AND amount > 0 AND status = 'completed'"
            );

            let paid = sqlx::query_as::<_, Earning>(&paid_sql)
                .bind(transaction_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| {
                    // A completed transaction always settled an earning.
                    AppError::invariant(
                        "Refunded transaction has no earning to retract",
                        json!({ "transaction_id": transaction_id }),
                    )
                })?;

            sqlx::query(
                r#"
                INSERT INTO earnings (actor_id, transaction_id, amount, status)
                VALUES ($1, $2, $3, 'pending')
                "#,
            )
            .bind(paid.actor_id)
            .bind(transaction_id)
            .bind(-paid.amount)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Some(transaction))
    }

    async fn find_earning(&self, earning_id: i64) -> Result<Option<Earning>, AppError> {
        let sql = format!("SELECT {EARNING_COLUMNS} FROM earnings WHERE id = $1");

        let earning = sqlx::query_as::<_, Earning>(&sql)
            .bind(earning_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(earning)
    }

    async fn mark_earning_paid(
        &self,
        earning_id: i64,
        payment_date: DateTime<Utc>,
    ) -> Result<Option<Earning>, AppError> {
        let sql = format!(
            r#"
            UPDATE earnings
            SET status = 'completed', payment_date = $2, updated_at = now()
            WHERE id = $1 AND status IN ('pending', 'processing')
            RETURNING {EARNING_COLUMNS}
            "#
        );

        let earning = sqlx::query_as::<_, Earning>(&sql)
            .bind(earning_id)
            .bind(payment_date)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(earning)
    }

    async fn earnings_for_actor(&self, actor_id: i64) -> Result<Vec<Earning>, AppError> {
        let sql = format!(
            "SELECT {EARNING_COLUMNS} FROM earnings \
             WHERE actor_id = $1 ORDER BY created_at DESC"
        );

        let earnings = sqlx::query_as::<_, Earning>(&sql)
            .bind(actor_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(earnings)
    }
}
