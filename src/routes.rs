//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /go/{tracking_code}` - Affiliate redirect (public)
//! - `GET /health`             - Health check: DB, click queue (public)
//! - `/api/*`                  - Partner webhooks and actor analytics
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Webhook auth** - HMAC signature verification on partner routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{tracing, webhook_auth};
use crate::state::AppState;
use axum::routing::get;
use axum::{middleware, Router};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let partner_router = api::routes::partner_routes().route_layer(
        middleware::from_fn_with_state(state.clone(), webhook_auth::layer),
    );

    let api_router = Router::new()
        .merge(partner_router)
        .merge(api::routes::actor_routes());

    let router = Router::new()
        .route("/go/{tracking_code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
