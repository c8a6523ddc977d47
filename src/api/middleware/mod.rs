//! Request-processing middleware.

pub mod tracing;
pub mod webhook_auth;
