//! Handlers for partner conversion ingestion and settlement transitions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;

use crate::api::dto::{
    EarningResponse, PayEarningRequest, RecordConversionRequest, TransactionResponse,
    TransitionStatusRequest,
};
use crate::api::middleware::webhook_auth::AuthenticatedPartner;
use crate::error::AppError;
use crate::state::AppState;

/// Records a conversion delivered by a partner webhook.
///
/// # Endpoint
///
/// `POST /api/conversions` (HMAC-authenticated, see
/// [`crate::api::middleware::webhook_auth`])
///
/// Replayed deliveries for the same `(partner, external_order_id)` return
/// the original transaction with `200 OK` rather than an error, so partner
/// retry loops terminate cleanly.
pub async fn record_conversion_handler(
    State(state): State<AppState>,
    Extension(partner): Extension<AuthenticatedPartner>,
    Json(req): Json<RecordConversionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.amount <= Decimal::ZERO {
        return Err(AppError::bad_request(
            "Conversion amount must be positive",
            json!({ "amount": req.amount }),
        ));
    }

    let transaction = state
        .settlement_service
        .record_conversion(
            &req.tracking_code,
            partner.0,
            &req.external_order_id,
            req.amount,
            req.occurred_at.unwrap_or_else(Utc::now),
        )
        .await?;

    Ok(Json(TransactionResponse::from(transaction)))
}

/// Applies a status transition signalled by the owning partner.
///
/// # Endpoint
///
/// `POST /api/conversions/{id}/status` (HMAC-authenticated)
///
/// Illegal transitions return `422` with code `invalid_transition`; the
/// partner must not retry those.
pub async fn transition_status_handler(
    State(state): State<AppState>,
    Extension(partner): Extension<AuthenticatedPartner>,
    Path(transaction_id): Path<i64>,
    Json(req): Json<TransitionStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let transaction = state
        .settlement_service
        .transition_status_for_partner(partner.0, transaction_id, req.status)
        .await?;

    Ok(Json(TransactionResponse::from(transaction)))
}

/// Marks an earning as paid out.
///
/// # Endpoint
///
/// `POST /api/earnings/{id}/pay`
///
/// Operator surface, called by the payout job after the transfer settles.
pub async fn pay_earning_handler(
    State(state): State<AppState>,
    Path(earning_id): Path<i64>,
    Json(req): Json<PayEarningRequest>,
) -> Result<impl IntoResponse, AppError> {
    let earning = state
        .settlement_service
        .mark_earning_paid(earning_id, req.payment_date.unwrap_or_else(Utc::now))
        .await?;

    Ok((StatusCode::OK, Json(EarningResponse::from(earning))))
}
