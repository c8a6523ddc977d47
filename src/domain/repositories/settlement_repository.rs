//! Repository trait for the attribution/settlement ledger.

use crate::domain::entities::{Earning, NewTransaction, Transaction};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for conversion transactions and earnings.
///
/// Status transitions are compare-and-set updates (`WHERE status = expected`)
/// so that concurrent partner signals for the same transaction serialize at
/// the storage layer; a `None` return means the CAS found the row in a
/// different state (or missing) and the caller decides how to report it.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSettlementRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettlementRepository: Send + Sync {
    /// Inserts a conversion transaction.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(tx))` when a new row was created
    /// - `Ok(None)` when `(partner_id, external_order_id)` already exists
    ///   (the caller fetches the original via [`Self::find_by_external_order`])
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert_transaction(
        &self,
        new_transaction: NewTransaction,
    ) -> Result<Option<Transaction>, AppError>;

    /// Finds a transaction by id.
    async fn find_transaction(&self, transaction_id: i64) -> Result<Option<Transaction>, AppError>;

    /// Finds a transaction by its partner-scoped external order id.
    async fn find_by_external_order(
        &self,
        partner_id: i64,
        external_order_id: &str,
    ) -> Result<Option<Transaction>, AppError>;

    /// CAS pending → completed; creates the pending earning (amount =
    /// commission) in the same transaction.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((tx, earning)))` on success
    /// - `Ok(None)` if the transaction was not in `pending` (or missing)
    async fn complete_transaction(
        &self,
        transaction_id: i64,
    ) -> Result<Option<(Transaction, Earning)>, AppError>;

    /// CAS pending → cancelled.
    async fn cancel_transaction(
        &self,
        transaction_id: i64,
    ) -> Result<Option<Transaction>, AppError>;

    /// CAS completed → refunded. In the same database transaction, a
    /// not-yet-paid earning is marked `failed`; an already-paid earning is
    /// left untouched and a compensating negative entry is appended instead.
    async fn refund_transaction(
        &self,
        transaction_id: i64,
    ) -> Result<Option<Transaction>, AppError>;

    /// Finds an earning by id.
    async fn find_earning(&self, earning_id: i64) -> Result<Option<Earning>, AppError>;

    /// CAS pending/processing → completed with the given payment date.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(earning))` on success
    /// - `Ok(None)` if the earning was not in a payable state (or missing)
    async fn mark_earning_paid(
        &self,
        earning_id: i64,
        payment_date: DateTime<Utc>,
    ) -> Result<Option<Earning>, AppError>;

    /// Lists an actor's earnings, newest first, compensating entries included.
    async fn earnings_for_actor(&self, actor_id: i64) -> Result<Vec<Earning>, AppError>;
}
