//! Earning entity: the payable record settled from a completed transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Payment status of an earning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "earning_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EarningStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl EarningStatus {
    /// An earning can only be paid out of the pending/processing states.
    pub fn is_payable(self) -> bool {
        matches!(self, EarningStatus::Pending | EarningStatus::Processing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EarningStatus::Pending => "pending",
            EarningStatus::Processing => "processing",
            EarningStatus::Completed => "completed",
            EarningStatus::Failed => "failed",
        }
    }
}

/// Money owed (or clawed back) from a settled transaction.
///
/// Created when its transaction reaches `completed`, with `amount` equal to
/// the transaction's commission. A refund after payout produces a second,
/// negative-amount row against the same transaction instead of mutating the
/// paid record.
#[derive(Debug, Clone, FromRow)]
pub struct Earning {
    pub id: i64,
    pub actor_id: i64,
    pub transaction_id: i64,
    pub amount: Decimal,
    pub status: EarningStatus,
    pub payment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
