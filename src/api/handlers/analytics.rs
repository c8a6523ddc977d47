//! Handlers for the per-actor analytics surface.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::api::dto::{
    ClickStatsResponse, EarningsResponse, LinkAnalytics, LinkAnalyticsResponse,
    LinkClicksResponse, ReconcileResponse,
};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::actor::{resolved_actor, ACTOR_ID_HEADER};

/// The actor-facing surface requires an identity; the redirect path is the
/// only anonymous-capable entry point.
pub(crate) fn require_actor(headers: &HeaderMap) -> Result<i64, AppError> {
    resolved_actor(headers).ok_or_else(|| {
        AppError::bad_request(
            "Missing resolved actor identity",
            json!({ "header": ACTOR_ID_HEADER }),
        )
    })
}

/// Lists the acting user's tracking links with cumulative click counts.
///
/// # Endpoint
///
/// `GET /api/links`
///
/// Tombstoned links are included (marked inactive) so historical click
/// totals remain visible after content removal.
pub async fn link_analytics_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let actor_id = require_actor(&headers)?;

    let links = state.link_service.list_for_actor(actor_id).await?;
    let links = links
        .into_iter()
        .map(|link| {
            let public_url = state.link_service.public_url(&link);
            LinkAnalytics::from_link(link, public_url)
        })
        .collect();

    Ok(Json(LinkAnalyticsResponse { links }))
}

/// Lists the acting user's earnings, compensating entries included.
///
/// # Endpoint
///
/// `GET /api/earnings`
pub async fn earnings_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let actor_id = require_actor(&headers)?;

    let earnings = state
        .settlement_service
        .earnings_for_actor(actor_id)
        .await?;

    Ok(Json(EarningsResponse {
        earnings: earnings.into_iter().map(Into::into).collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// Lower bound for the windowed count, RFC 3339.
    pub since: Option<DateTime<Utc>>,
}

/// Aggregate click totals across the acting user's links.
///
/// # Endpoint
///
/// `GET /api/stats?since=2026-08-01T00:00:00Z`
pub async fn click_stats_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let actor_id = require_actor(&headers)?;

    let total_clicks = state.click_service.count_for_actor(actor_id, None).await?;
    let clicks_since = match query.since {
        Some(since) => Some(
            state
                .click_service
                .count_for_actor(actor_id, Some(since))
                .await?,
        ),
        None => None,
    };

    Ok(Json(ClickStatsResponse {
        actor_id,
        total_clicks,
        clicks_since,
    }))
}

/// Reports a link's authoritative click count straight from the ledger.
///
/// # Endpoint
///
/// `GET /api/links/{id}/clicks`
///
/// Scoped to the acting user: a link owned by someone else answers `404`.
pub async fn link_clicks_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(link_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let actor_id = require_actor(&headers)?;
    state.link_service.find_owned(actor_id, link_id).await?;

    let ledger_count = state.click_service.count_for_link(link_id).await?;

    Ok(Json(LinkClicksResponse {
        link_id,
        ledger_count,
    }))
}

/// Recomputes a link's click counter from the ledger.
///
/// # Endpoint
///
/// `POST /api/links/{id}/reconcile`
///
/// The ledger's row count is authoritative; this overwrites the registry's
/// cached counter with it and returns the corrected total. Scoped to the
/// acting user's own links.
pub async fn reconcile_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(link_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let actor_id = require_actor(&headers)?;
    state.link_service.find_owned(actor_id, link_id).await?;

    let click_count = state.click_service.reconcile(link_id).await?;

    Ok(Json(ReconcileResponse {
        link_id,
        click_count,
    }))
}
