//! DTOs for the partner conversion-ingestion surface.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Earning, EarningStatus, Transaction, TransactionStatus};

/// Conversion report delivered by a partner webhook.
///
/// The partner id comes from the authentication middleware, not the body;
/// `external_order_id` is the partner's own order reference and forms the
/// de-duplication key together with the partner id.
#[derive(Debug, Deserialize)]
pub struct RecordConversionRequest {
    pub tracking_code: String,
    pub external_order_id: String,
    pub amount: Decimal,
    /// Defaults to the delivery time when the partner omits it.
    pub occurred_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct TransitionStatusRequest {
    pub status: TransactionStatus,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: i64,
    pub tracking_link_id: i64,
    pub actor_id: i64,
    pub partner_id: i64,
    pub external_order_id: String,
    pub amount: Decimal,
    pub commission: Decimal,
    pub status: TransactionStatus,
    pub transaction_date: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            tracking_link_id: t.link_id,
            actor_id: t.actor_id,
            partner_id: t.partner_id,
            external_order_id: t.external_order_id,
            amount: t.amount,
            commission: t.commission,
            status: t.status,
            transaction_date: t.transaction_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PayEarningRequest {
    /// Defaults to now when omitted.
    pub payment_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct EarningResponse {
    pub id: i64,
    pub actor_id: i64,
    pub transaction_id: i64,
    pub amount: Decimal,
    pub status: EarningStatus,
    pub payment_date: Option<DateTime<Utc>>,
}

impl From<Earning> for EarningResponse {
    fn from(e: Earning) -> Self {
        Self {
            id: e.id,
            actor_id: e.actor_id,
            transaction_id: e.transaction_id,
            amount: e.amount,
            status: e.status,
            payment_date: e.payment_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub link_id: i64,
    /// Corrected counter value, recomputed from the click ledger.
    pub click_count: i64,
}
