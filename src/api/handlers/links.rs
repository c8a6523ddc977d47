//! Handlers for tracking-link registration and lifecycle.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::api::dto::{LinkAnalytics, RegisterLinkRequest, RetireLinksResponse};
use crate::api::handlers::analytics::require_actor;
use crate::error::AppError;
use crate::state::AppState;

/// Registers (or re-fetches) the tracking link for a published pairing of
/// content and product.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// Idempotent: repeating the call for the same triple returns the existing
/// link with its original code, so publish retries are safe.
pub async fn register_link_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RegisterLinkRequest>,
) -> Result<impl IntoResponse, AppError> {
    let actor_id = require_actor(&headers)?;

    let link = state
        .link_service
        .register_link(actor_id, req.content_id, req.product_id, req.destination_url)
        .await?;
    let public_url = state.link_service.public_url(&link);

    Ok((
        StatusCode::CREATED,
        Json(LinkAnalytics::from_link(link, public_url)),
    ))
}

/// Tombstones every live link under a piece of removed content.
///
/// # Endpoint
///
/// `DELETE /api/content/{content_id}/links`
///
/// Click history and settled transactions stay queryable; only redirect
/// resolution stops.
pub async fn retire_content_links_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(content_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require_actor(&headers)?;

    let retired = state.link_service.retire_content_links(content_id).await?;

    Ok(Json(RetireLinksResponse {
        content_id,
        retired,
    }))
}
