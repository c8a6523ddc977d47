//! Application layer services implementing business logic.
//!
//! Services orchestrate repository calls, validation, and business rules,
//! and are generic over the domain repository traits so they can be unit
//! tested against `mockall` mocks.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Registration and resolution
//! - [`services::click_service::ClickService`] - Ledger reads and reconciliation
//! - [`services::settlement_service::SettlementService`] - Conversions and earnings

pub mod services;
