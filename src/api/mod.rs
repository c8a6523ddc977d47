//! HTTP layer translating requests into domain operations.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - Request handlers
//! - [`middleware`] - Webhook authentication

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
