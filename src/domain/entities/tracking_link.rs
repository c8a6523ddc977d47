//! Tracking link entity: the registry row behind a shareable redirect URL.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A registered tracking link owned by a publishing actor.
///
/// One row exists per `(actor_id, content_id, product_id)` triple; the
/// database enforces the uniqueness, so re-registering the same triple
/// always resolves to the same row and the same tracking code.
///
/// `click_count` is a derived counter kept eventually consistent with the
/// click ledger; the ledger rows are the source of truth and the counter
/// can be rebuilt from them (see `ClickService::reconcile`).
#[derive(Debug, Clone, FromRow)]
pub struct TrackingLink {
    pub id: i64,
    pub actor_id: i64,
    pub content_id: i64,
    pub product_id: i64,
    pub tracking_code: String,
    pub destination_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TrackingLink {
    /// Returns true if the link was tombstoned when its content was removed.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Builds the public redirect URL for this link.
    pub fn public_url(&self, redirect_base_url: &str) -> String {
        format!(
            "{}/go/{}",
            redirect_base_url.trim_end_matches('/'),
            self.tracking_code
        )
    }
}

/// Input data for registering a tracking link.
#[derive(Debug, Clone)]
pub struct NewTrackingLink {
    pub actor_id: i64,
    pub content_id: i64,
    pub product_id: i64,
    pub tracking_code: String,
    pub destination_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_link() -> TrackingLink {
        TrackingLink {
            id: 1,
            actor_id: 7,
            content_id: 21,
            product_id: 99,
            tracking_code: "q1w2e3r4t5y6".to_string(),
            destination_url: "https://shop.example.com/item/99".to_string(),
            click_count: 0,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_public_url_joins_base_and_code() {
        let link = sample_link();
        assert_eq!(
            link.public_url("https://links.example.com"),
            "https://links.example.com/go/q1w2e3r4t5y6"
        );
    }

    #[test]
    fn test_public_url_trims_trailing_slash() {
        let link = sample_link();
        assert_eq!(
            link.public_url("https://links.example.com/"),
            "https://links.example.com/go/q1w2e3r4t5y6"
        );
    }

    #[test]
    fn test_is_deleted() {
        let mut link = sample_link();
        assert!(!link.is_deleted());

        link.deleted_at = Some(Utc::now());
        assert!(link.is_deleted());
    }
}
