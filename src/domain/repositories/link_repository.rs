//! Repository trait for the tracking-link registry.

use crate::domain::entities::{NewTrackingLink, TrackingLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the durable tracking-link registry.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Registers a link, returning the pre-existing row when the
    /// `(actor_id, content_id, product_id)` triple is already registered.
    ///
    /// Implementations must be safe under concurrent calls for the same
    /// triple: at most one row is ever created, enforced by a storage-level
    /// uniqueness constraint rather than application locking.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn upsert(&self, new_link: NewTrackingLink) -> Result<TrackingLink, AppError>;

    /// Finds a live (non-tombstoned) link by its tracking code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(link))` if found
    /// - `Ok(None)` if the code is unknown or the link was soft-deleted
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, tracking_code: &str) -> Result<Option<TrackingLink>, AppError>;

    /// Finds a link by code regardless of tombstone state.
    ///
    /// Used by the settlement path: a conversion may trail the removal of
    /// its content, and historical attribution must stay resolvable for
    /// audit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code_including_deleted(
        &self,
        tracking_code: &str,
    ) -> Result<Option<TrackingLink>, AppError>;

    /// Finds a link by id regardless of tombstone state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<TrackingLink>, AppError>;

    /// Lists all links owned by an actor, newest first, including
    /// soft-deleted rows so historical analytics stay visible.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_for_actor(&self, actor_id: i64) -> Result<Vec<TrackingLink>, AppError>;

    /// Tombstones every link attached to a content item.
    ///
    /// Returns the number of links soft-deleted. Click and transaction
    /// history attached to the links remains resolvable for audit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn soft_delete_for_content(&self, content_id: i64) -> Result<u64, AppError>;
}
