//! Click ledger reads and counter reconciliation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// Service over the append-only click ledger.
///
/// Recording normally happens through the background worker; the direct
/// [`ClickService::record`] path exists for synchronous callers and tests.
pub struct ClickService<C: ClickRepository> {
    repository: Arc<C>,
}

impl<C: ClickRepository> ClickService<C> {
    pub fn new(repository: Arc<C>) -> Self {
        Self { repository }
    }

    /// Appends a click and increments the link counter atomically.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the link does not exist.
    pub async fn record(&self, new_click: NewClick) -> Result<Click, AppError> {
        self.repository.record(new_click).await
    }

    /// Total ledger rows for a link. This is the authoritative count; the
    /// registry's `click_count` is a cached derivation of it.
    pub async fn count_for_link(&self, link_id: i64) -> Result<i64, AppError> {
        self.repository.count_for_link(link_id).await
    }

    /// Clicks across all of an actor's links, optionally since a point in
    /// time.
    pub async fn count_for_actor(
        &self,
        actor_id: i64,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64, AppError> {
        self.repository.count_for_actor(actor_id, since).await
    }

    /// Recomputes a link's counter from the ledger, correcting any drift
    /// introduced by dropped click events; returns the corrected total.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    pub async fn reconcile(&self, link_id: i64) -> Result<i64, AppError> {
        self.repository
            .reconcile(link_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Tracking link not found", json!({ "link_id": link_id }))
            })
    }
}
