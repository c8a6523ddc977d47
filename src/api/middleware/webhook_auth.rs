//! Partner webhook authentication.
//!
//! Conversion deliveries are authenticated with a partner-specific shared
//! secret: the partner sends its id in `x-partner-id` and an HMAC-SHA256
//! signature of the raw request body (hex encoded) in
//! `x-webhook-signature`. The middleware buffers the body to verify the
//! signature, then replays it to the handler with the authenticated partner
//! id attached as a request extension.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::domain::repositories::PartnerRepository;
use crate::state::AppState;

pub const PARTNER_ID_HEADER: &str = "x-partner-id";
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Webhook payloads are small JSON documents; anything larger is rejected
/// before signature verification.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Partner identity proven by a valid body signature.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedPartner(pub i64);

/// Axum middleware entry point; apply with `from_fn_with_state`.
pub async fn layer(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match authenticate(&state, req).await {
        Ok(req) => next.run(req).await,
        Err(resp) => resp,
    }
}

async fn authenticate(state: &AppState, req: Request) -> Result<Request, Response> {
    let (parts, body) = req.into_parts();

    let partner_id = parts
        .headers
        .get(PARTNER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| unauthorized("Missing or malformed partner id"))?;

    let signature = parts
        .headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| unauthorized("Missing webhook signature"))?;

    let partner = state
        .partner_repository
        .find_by_id(partner_id)
        .await
        .map_err(|e| e.into_response())?
        .ok_or_else(|| unauthorized("Unknown partner"))?;

    if !partner.is_active {
        return Err(unauthorized("Partner is inactive"));
    }

    let bytes = to_bytes(body, MAX_BODY_BYTES).await.map_err(|_| {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(json!({ "error": { "code": "payload_too_large", "message": "Webhook body too large", "details": {} } })),
        )
            .into_response()
    })?;

    if !verify_signature(&partner.webhook_secret, &bytes, &signature) {
        return Err(unauthorized("Invalid webhook signature"));
    }

    let mut req = Request::from_parts(parts, Body::from(bytes));
    req.extensions_mut().insert(AuthenticatedPartner(partner.id));

    Ok(req)
}

/// Constant-time verification of a hex-encoded HMAC-SHA256 body signature.
pub fn verify_signature(secret: &str, body: &[u8], hex_signature: &str) -> bool {
    let Ok(expected) = hex::decode(hex_signature) else {
        return false;
    };

    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);

    mac.verify_slice(&expected).is_ok()
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": { "code": "unauthorized", "message": message, "details": {} }
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_verifies() {
        let body = br#"{"tracking_code":"abc","external_order_id":"ORD-1","amount":"50.00"}"#;
        let signature = sign("s3cr3t", body);

        assert!(verify_signature("s3cr3t", body, &signature));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let body = b"payload";
        let signature = sign("s3cr3t", body);

        assert!(!verify_signature("other-secret", body, &signature));
    }

    #[test]
    fn test_tampered_body_fails() {
        let signature = sign("s3cr3t", b"original");

        assert!(!verify_signature("s3cr3t", b"tampered", &signature));
    }

    #[test]
    fn test_non_hex_signature_fails() {
        assert!(!verify_signature("s3cr3t", b"payload", "not hex at all"));
    }
}
