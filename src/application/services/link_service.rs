//! Tracking-link registration and resolution service.

use std::sync::Arc;

use serde_json::json;
use url::Url;

use crate::domain::entities::{NewTrackingLink, TrackingLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::tracking_code::tracking_code;

/// Service for the link registry: idempotent registration, hot-path
/// resolution, and the per-actor analytics listing.
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
    redirect_base_url: String,
}

impl<L: LinkRepository> LinkService<L> {
    pub fn new(link_repository: Arc<L>, redirect_base_url: String) -> Self {
        Self {
            link_repository,
            redirect_base_url,
        }
    }

    /// Registers a tracking link for a published `(actor, content, product)`
    /// triple.
    ///
    /// # Idempotency
    ///
    /// The tracking code is derived deterministically from the triple and
    /// the row is upserted against the triple's uniqueness constraint, so
    /// repeated (or concurrent) publishes of the same triple return the
    /// existing link; at most one row is ever created.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `destination_url` is not an
    /// absolute http(s) URL. Returns [`AppError::Internal`] on database
    /// errors.
    pub async fn register_link(
        &self,
        actor_id: i64,
        content_id: i64,
        product_id: i64,
        destination_url: String,
    ) -> Result<TrackingLink, AppError> {
        let destination = Url::parse(&destination_url).map_err(|e| {
            AppError::bad_request(
                "Invalid destination URL",
                json!({ "reason": e.to_string() }),
            )
        })?;

        if destination.scheme() != "http" && destination.scheme() != "https" {
            return Err(AppError::bad_request(
                "Destination URL must be http or https",
                json!({ "scheme": destination.scheme() }),
            ));
        }

        let new_link = NewTrackingLink {
            actor_id,
            content_id,
            product_id,
            tracking_code: tracking_code(actor_id, content_id, product_id),
            destination_url: destination.to_string(),
        };

        self.link_repository.upsert(new_link).await
    }

    /// Resolves a tracking code to its live registry row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or the link's
    /// owning content was removed (soft-deleted link).
    pub async fn resolve(&self, tracking_code: &str) -> Result<TrackingLink, AppError> {
        self.link_repository
            .find_by_code(tracking_code)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "Tracking link not found",
                    json!({ "tracking_code": tracking_code }),
                )
            })
    }

    /// Fetches a link by id, scoped to its owner.
    ///
    /// Tombstoned links are returned so their historical counts stay
    /// readable after content removal.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist or belongs
    /// to a different actor; the two cases are indistinguishable to the
    /// caller.
    pub async fn find_owned(&self, actor_id: i64, link_id: i64) -> Result<TrackingLink, AppError> {
        self.link_repository
            .find_by_id(link_id)
            .await?
            .filter(|link| link.actor_id == actor_id)
            .ok_or_else(|| {
                AppError::not_found("Tracking link not found", json!({ "link_id": link_id }))
            })
    }

    /// Lists an actor's links for the analytics surface, newest first.
    pub async fn list_for_actor(&self, actor_id: i64) -> Result<Vec<TrackingLink>, AppError> {
        self.link_repository.list_for_actor(actor_id).await
    }

    /// Tombstones all links for a removed content item; returns how many
    /// links were retired.
    pub async fn retire_content_links(&self, content_id: i64) -> Result<u64, AppError> {
        self.link_repository.soft_delete_for_content(content_id).await
    }

    /// Builds the shareable redirect URL for a link.
    pub fn public_url(&self, link: &TrackingLink) -> String {
        link.public_url(&self.redirect_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;

    const BASE: &str = "https://links.example.com";

    fn stored_link(id: i64, new_link: &NewTrackingLink) -> TrackingLink {
        TrackingLink {
            id,
            actor_id: new_link.actor_id,
            content_id: new_link.content_id,
            product_id: new_link.product_id,
            tracking_code: new_link.tracking_code.clone(),
            destination_url: new_link.destination_url.clone(),
            click_count: 0,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_register_link_derives_deterministic_code() {
        let mut repo = MockLinkRepository::new();
        let expected_code = tracking_code(7, 21, 99);

        repo.expect_upsert()
            .withf(move |nl| nl.tracking_code == expected_code)
            .times(1)
            .returning(|nl| Ok(stored_link(1, &nl)));

        let service = LinkService::new(Arc::new(repo), BASE.to_string());
        let link = service
            .register_link(7, 21, 99, "https://shop.example.com/item/99".to_string())
            .await
            .unwrap();

        assert_eq!(link.tracking_code, tracking_code(7, 21, 99));
    }

    #[tokio::test]
    async fn test_register_link_twice_returns_same_row() {
        let mut repo = MockLinkRepository::new();

        // The repository upsert resolves both calls to the same row.
        repo.expect_upsert()
            .times(2)
            .returning(|nl| Ok(stored_link(5, &nl)));

        let service = LinkService::new(Arc::new(repo), BASE.to_string());

        let first = service
            .register_link(7, 21, 99, "https://shop.example.com/item/99".to_string())
            .await
            .unwrap();
        let second = service
            .register_link(7, 21, 99, "https://shop.example.com/item/99".to_string())
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.tracking_code, second.tracking_code);
    }

    #[tokio::test]
    async fn test_register_link_rejects_invalid_url() {
        let repo = MockLinkRepository::new();
        let service = LinkService::new(Arc::new(repo), BASE.to_string());

        let result = service
            .register_link(7, 21, 99, "not-a-url".to_string())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_register_link_rejects_non_http_scheme() {
        let repo = MockLinkRepository::new();
        let service = LinkService::new(Arc::new(repo), BASE.to_string());

        let result = service
            .register_link(7, 21, 99, "ftp://shop.example.com/item".to_string())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_find_owned_returns_own_link() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .withf(|id| *id == 3)
            .times(1)
            .returning(|id| {
                Ok(Some(stored_link(
                    id,
                    &NewTrackingLink {
                        actor_id: 7,
                        content_id: 21,
                        product_id: 99,
                        tracking_code: tracking_code(7, 21, 99),
                        destination_url: "https://shop.example.com/item/99".to_string(),
                    },
                )))
            });

        let service = LinkService::new(Arc::new(repo), BASE.to_string());
        let link = service.find_owned(7, 3).await.unwrap();

        assert_eq!(link.id, 3);
        assert_eq!(link.actor_id, 7);
    }

    #[tokio::test]
    async fn test_find_owned_hides_foreign_link() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id().times(1).returning(|id| {
            Ok(Some(stored_link(
                id,
                &NewTrackingLink {
                    actor_id: 7,
                    content_id: 21,
                    product_id: 99,
                    tracking_code: tracking_code(7, 21, 99),
                    destination_url: "https://shop.example.com/item/99".to_string(),
                },
            )))
        });

        let service = LinkService::new(Arc::new(repo), BASE.to_string());
        let result = service.find_owned(8, 3).await;

        // Indistinguishable from a link that never existed.
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_find_owned_unknown_id_is_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(repo), BASE.to_string());
        let result = service.find_owned(7, 404).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_unknown_code_is_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(repo), BASE.to_string());
        let result = service.resolve("zzzzzzzzzzzz").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_returns_destination() {
        let mut repo = MockLinkRepository::new();
        let code = tracking_code(7, 21, 99);
        let code_for_mock = code.clone();

        repo.expect_find_by_code()
            .withf(move |c| c == code_for_mock)
            .times(1)
            .returning(|c| {
                Ok(Some(stored_link(
                    3,
                    &NewTrackingLink {
                        actor_id: 7,
                        content_id: 21,
                        product_id: 99,
                        tracking_code: c.to_string(),
                        destination_url: "https://shop.example.com/item/99".to_string(),
                    },
                )))
            });

        let service = LinkService::new(Arc::new(repo), BASE.to_string());
        let link = service.resolve(&code).await.unwrap();

        assert_eq!(link.destination_url, "https://shop.example.com/item/99");
        assert_eq!(
            service.public_url(&link),
            format!("{BASE}/go/{}", link.tracking_code)
        );
    }
}
