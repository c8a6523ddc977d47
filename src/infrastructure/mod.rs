//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer against PostgreSQL.
//!
//! # Modules
//!
//! - [`persistence`] - SQLx repository implementations

pub mod persistence;
