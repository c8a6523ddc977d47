//! API route configuration.
//!
//! Partner routes require an HMAC webhook signature via
//! [`crate::api::middleware::webhook_auth`]. Actor routes identify the
//! caller from the `x-actor-id` header resolved upstream.

use crate::api::handlers::{
    click_stats_handler, earnings_handler, link_analytics_handler, link_clicks_handler,
    pay_earning_handler, reconcile_handler, record_conversion_handler, register_link_handler,
    retire_content_links_handler, transition_status_handler,
};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

/// Routes driven by partner webhooks, signature-checked per request.
///
/// # Endpoints
///
/// - `POST /conversions`              - Record a conversion
/// - `POST /conversions/{id}/status`  - Transition a transaction's status
pub fn partner_routes() -> Router<AppState> {
    Router::new()
        .route("/conversions", post(record_conversion_handler))
        .route(
            "/conversions/{id}/status",
            post(transition_status_handler),
        )
}

/// Routes serving authenticated actors and internal operator jobs.
///
/// # Endpoints
///
/// - `GET    /links`                        - List the actor's tracking links
/// - `POST   /links`                        - Register a link for a content/product pairing
/// - `GET    /links/{id}/clicks`            - Ledger-backed click count for one link
/// - `POST   /links/{id}/reconcile`         - Recompute a link's click counter
/// - `DELETE /content/{content_id}/links`   - Tombstone links of removed content
/// - `GET    /stats`                        - Aggregate click totals for the actor
/// - `GET    /earnings`                     - List the actor's earnings
/// - `POST   /earnings/{id}/pay`            - Mark an earning as paid out
pub fn actor_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/links",
            get(link_analytics_handler).post(register_link_handler),
        )
        .route("/links/{id}/clicks", get(link_clicks_handler))
        .route("/links/{id}/reconcile", post(reconcile_handler))
        .route(
            "/content/{content_id}/links",
            delete(retire_content_links_handler),
        )
        .route("/stats", get(click_stats_handler))
        .route("/earnings", get(earnings_handler))
        .route("/earnings/{id}/pay", post(pay_earning_handler))
}
