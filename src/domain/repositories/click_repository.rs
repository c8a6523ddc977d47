//! Repository trait for the append-only click ledger.

use crate::domain::entities::{Click, NewClick};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for click recording and aggregate reads.
///
/// The ledger is append-only: no update or delete operations exist. Its row
/// count is the source of truth for per-link click totals; the registry's
/// cached `click_count` is derived and may briefly lag.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends a click to the ledger and increments the owning link's
    /// `click_count` in the same database transaction.
    ///
    /// The increment is a storage-level `click_count = click_count + 1`,
    /// never a read-modify-write, so N concurrent records net exactly N.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the referenced link does not exist.
    /// Returns [`AppError::TransientStorage`] on connectivity failures (the
    /// click worker retries these).
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Counts ledger rows for one link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_for_link(&self, link_id: i64) -> Result<i64, AppError>;

    /// Counts clicks across all links owned by an actor, optionally since a
    /// point in time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_for_actor(
        &self,
        actor_id: i64,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64, AppError>;

    /// Recounts the ledger and overwrites the registry's cached counter,
    /// returning the corrected total.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(total))` after correcting the counter
    /// - `Ok(None)` if the link does not exist
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn reconcile(&self, link_id: i64) -> Result<Option<i64>, AppError>;
}
