//! Repository trait for partner programme lookups.

use crate::domain::entities::Partner;
use crate::error::AppError;
use async_trait::async_trait;

/// Read-only lookup into the partner registry.
///
/// Partner CRUD is owned by the partner-integration layer; this engine only
/// needs the commission rate, webhook secret, and active flag.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PartnerRepository: Send + Sync {
    /// Finds a partner by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, partner_id: i64) -> Result<Option<Partner>, AppError>;
}
