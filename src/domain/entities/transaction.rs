//! Conversion transaction entity and its status lifecycle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle status of a conversion transaction.
///
/// Transitions are one-directional: a transaction starts `pending`, settles
/// to `completed` or `cancelled`, and a `completed` transaction may later be
/// `refunded`. `cancelled` and `refunded` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
    Refunded,
}

impl TransactionStatus {
    /// The legal transition table.
    pub fn can_transition_to(self, next: TransactionStatus) -> bool {
        use TransactionStatus::*;
        matches!(
            (self, next),
            (Pending, Completed) | (Pending, Cancelled) | (Completed, Refunded)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Cancelled => "cancelled",
            TransactionStatus::Refunded => "refunded",
        }
    }
}

/// A conversion reported by a partner, attributed to a tracking link.
///
/// `(partner_id, external_order_id)` is unique in storage; replayed webhook
/// deliveries for the same order collapse to this single row.
#[derive(Debug, Clone, FromRow)]
pub struct Transaction {
    pub id: i64,
    pub link_id: i64,
    /// The referring actor, i.e. the link owner, not the buyer.
    pub actor_id: i64,
    pub partner_id: i64,
    pub external_order_id: String,
    pub amount: Decimal,
    /// Captured at the partner's rate effective at recording time.
    pub commission: Decimal,
    pub status: TransactionStatus,
    pub transaction_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for recording a conversion.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub link_id: i64,
    pub actor_id: i64,
    pub partner_id: i64,
    pub external_order_id: String,
    pub amount: Decimal,
    pub commission: Decimal,
    pub transaction_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::TransactionStatus::*;

    #[test]
    fn test_legal_transitions() {
        assert!(Pending.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Completed.can_transition_to(Refunded));
    }

    #[test]
    fn test_refunded_is_terminal() {
        for next in [Pending, Completed, Cancelled, Refunded] {
            assert!(!Refunded.can_transition_to(next));
        }
    }

    #[test]
    fn test_cancelled_is_terminal() {
        for next in [Pending, Completed, Cancelled, Refunded] {
            assert!(!Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_no_self_or_backward_transitions() {
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Refunded));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Completed));
    }
}
