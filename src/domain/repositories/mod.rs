//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; concrete implementations
//! live in `crate::infrastructure::persistence`. Mock implementations are
//! auto-generated via `mockall` for service-level unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Tracking-link registry
//! - [`ClickRepository`] - Append-only click ledger and reconciliation
//! - [`SettlementRepository`] - Conversion transactions and earnings
//! - [`PartnerRepository`] - Read-only partner lookups

pub mod click_repository;
pub mod link_repository;
pub mod partner_repository;
pub mod settlement_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;
pub use partner_repository::PartnerRepository;
pub use settlement_repository::SettlementRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use partner_repository::MockPartnerRepository;
#[cfg(test)]
pub use settlement_repository::MockSettlementRepository;
