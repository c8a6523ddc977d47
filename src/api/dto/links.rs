//! DTOs for tracking-link registration and lifecycle.

use serde::Deserialize;

/// Request body for `POST /api/links`.
///
/// The actor comes from the resolved identity header, never the body; the
/// content and product ids were already validated by the publishing
/// collaborator.
#[derive(Debug, Deserialize)]
pub struct RegisterLinkRequest {
    pub content_id: i64,
    pub product_id: i64,
    pub destination_url: String,
}

/// Response for `DELETE /api/content/{content_id}/links`.
#[derive(Debug, serde::Serialize)]
pub struct RetireLinksResponse {
    pub content_id: i64,
    /// Number of links tombstoned by this call. Zero when the content had
    /// none left, which is a success.
    pub retired: u64,
}
