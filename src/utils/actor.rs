//! Resolved-actor extraction from request headers.
//!
//! Identity resolution is owned by an upstream collaborator (session/auth
//! layer) which injects the resolved actor id as the `x-actor-id` header
//! before requests reach this engine. The engine never authenticates anyone
//! itself; it only reads the already-resolved identity.

use axum::http::HeaderMap;

/// Header carrying the resolved actor id, set by the upstream auth layer.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Reads the resolved actor id, if any.
///
/// A missing or unparsable header means anonymous. Failures are never an
/// error here: the redirect path treats every caller as anonymous-capable,
/// and surfaces that need an identity enforce it themselves.
pub fn resolved_actor(headers: &HeaderMap) -> Option<i64> {
    headers
        .get(ACTOR_ID_HEADER)?
        .to_str()
        .ok()?
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
}
