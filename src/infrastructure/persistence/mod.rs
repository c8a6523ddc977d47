//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx with
//! runtime-bound queries against the schema in `migrations/`.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Tracking-link registry
//! - [`PgClickRepository`] - Append-only click ledger and reconciliation
//! - [`PgSettlementRepository`] - Transactions and earnings
//! - [`PgPartnerRepository`] - Partner lookups

pub mod pg_click_repository;
pub mod pg_link_repository;
pub mod pg_partner_repository;
pub mod pg_settlement_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_partner_repository::PgPartnerRepository;
pub use pg_settlement_repository::PgSettlementRepository;
