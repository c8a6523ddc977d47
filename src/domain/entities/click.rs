//! Click entity: one row of the append-only click ledger.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A recorded click on a tracking link.
///
/// Rows are immutable once written; there is no update or delete path. The
/// ledger doubles as the audit trail backing the registry's `click_count`,
/// so every row corresponds to exactly one counter increment (both are
/// written in the same database transaction).
#[derive(Debug, Clone, FromRow)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    /// The clicking actor, when the caller was authenticated. Anonymous
    /// clicks are permitted and common.
    pub actor_id: Option<i64>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

/// Input data for appending a click to the ledger.
///
/// `clicked_at` is captured at request time, not at persistence time;
/// deferred or retried writes keep the original timestamp.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub link_id: i64,
    pub actor_id: Option<i64>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub clicked_at: DateTime<Utc>,
}
