//! Handler for tracking-link redirects: the hot path.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect},
};
use std::net::SocketAddr;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::actor::resolved_actor;

/// Redirects a tracking code to its destination URL.
///
/// # Endpoint
///
/// `GET /go/{tracking_code}`
///
/// # Request Flow
///
/// 1. Resolve the tracking code via the registry (miss → 404, nothing recorded)
/// 2. Send a click event to the bounded worker channel (non-blocking)
/// 3. Return 307 Temporary Redirect immediately
///
/// # Click Tracking
///
/// The redirect never waits on click persistence: the worker owns the
/// durable write (ledger append + atomic counter increment) and its
/// retries. If the queue is full the event is dropped and counted in the
/// `clicks_dropped_total` metric; periodic reconciliation corrects any
/// counter drift from the ledger.
///
/// # Errors
///
/// Returns 404 if the tracking code doesn't resolve or its content was
/// removed. No internal failure detail ever reaches the browser.
pub async fn redirect_handler(
    Path(tracking_code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let link = state.link_service.resolve(&tracking_code).await?;

    let click_event = ClickEvent::new(
        link.id,
        resolved_actor(&headers),
        Some(addr.ip().to_string()),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
    );

    if state.click_sender.try_send(click_event).is_err() {
        metrics::counter!("clicks_dropped_total").increment(1);
        tracing::warn!(link_id = link.id, "click queue full, dropping event");
    }

    Ok(Redirect::temporary(&link.destination_url))
}
