//! Utility functions shared across layers.
//!
//! - [`tracking_code`] - Deterministic tracking-code derivation
//! - [`actor`] - Resolved-actor extraction from request headers

pub mod actor;
pub mod tracking_code;
