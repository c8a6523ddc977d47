//! DTOs for the per-actor analytics surface.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::entities::{Earning, EarningStatus, TrackingLink};

/// One tracking link in the owner's analytics listing.
///
/// Content and product are referenced by id only; their summaries belong to
/// the content/product collaborator, which joins them on its side.
#[derive(Debug, Serialize)]
pub struct LinkAnalytics {
    pub id: i64,
    pub content_id: i64,
    pub product_id: i64,
    pub tracking_code: String,
    pub destination_url: String,
    pub public_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    /// False when the owning content was removed (link tombstoned).
    pub active: bool,
}

impl LinkAnalytics {
    pub fn from_link(link: TrackingLink, public_url: String) -> Self {
        Self {
            id: link.id,
            content_id: link.content_id,
            product_id: link.product_id,
            active: !link.is_deleted(),
            tracking_code: link.tracking_code,
            destination_url: link.destination_url,
            public_url,
            click_count: link.click_count,
            created_at: link.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkAnalyticsResponse {
    pub links: Vec<LinkAnalytics>,
}

/// One earning row in the owner's payout listing. Compensating entries show
/// up as negative amounts.
#[derive(Debug, Serialize)]
pub struct EarningItem {
    pub id: i64,
    pub transaction_id: i64,
    pub amount: Decimal,
    pub status: EarningStatus,
    pub payment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Earning> for EarningItem {
    fn from(e: Earning) -> Self {
        Self {
            id: e.id,
            transaction_id: e.transaction_id,
            amount: e.amount,
            status: e.status,
            payment_date: e.payment_date,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EarningsResponse {
    pub earnings: Vec<EarningItem>,
}

/// Aggregate click totals for the acting user.
#[derive(Debug, Serialize)]
pub struct ClickStatsResponse {
    pub actor_id: i64,
    /// All ledger rows across the actor's links.
    pub total_clicks: i64,
    /// Ledger rows at or after the `since` query parameter; absent when the
    /// parameter was not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clicks_since: Option<i64>,
}

/// Ledger-backed click count for one link.
#[derive(Debug, Serialize)]
pub struct LinkClicksResponse {
    pub link_id: i64,
    /// Authoritative count from the ledger, which may differ from the
    /// registry's cached `click_count` until the next reconciliation.
    pub ledger_count: i64,
}
