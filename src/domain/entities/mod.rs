//! Core domain entities for the attribution engine.
//!
//! Entities are plain data structures without business logic, mapped from
//! PostgreSQL rows via `sqlx::FromRow`. Creation inputs use separate
//! `New*` structs:
//!
//! - [`TrackingLink`] / [`NewTrackingLink`] - registry rows behind redirect URLs
//! - [`Click`] / [`NewClick`] - append-only click ledger rows
//! - [`Transaction`] / [`NewTransaction`] - partner-reported conversions
//! - [`Earning`] - payable records settled from completed transactions
//! - [`Partner`] - read-only partner programme reference data

pub mod click;
pub mod earning;
pub mod partner;
pub mod tracking_link;
pub mod transaction;

pub use click::{Click, NewClick};
pub use earning::{Earning, EarningStatus};
pub use partner::Partner;
pub use tracking_link::{NewTrackingLink, TrackingLink};
pub use transaction::{NewTransaction, Transaction, TransactionStatus};
