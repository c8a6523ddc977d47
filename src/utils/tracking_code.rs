//! Deterministic tracking-code derivation.
//!
//! A tracking code is a pure function of the `(actor, content, product)`
//! triple, so re-registering the same triple always derives the same code
//! and registration stays idempotent end to end. The code is an opaque
//! SHA-256 prefix rather than a transparent encoding, keeping the raw ids
//! out of shared URLs.

use base64::Engine as _;
use sha2::{Digest, Sha256};

/// Digest bytes kept before base64 encoding; 9 bytes → a 12-character code.
///
/// 72 bits of digest makes accidental collisions negligible across any
/// realistic id space; the unique index on `tracking_code` still backstops
/// the astronomically unlikely case.
const CODE_LENGTH_BYTES: usize = 9;

/// Derives the tracking code for a link triple.
///
/// Deterministic and URL-safe: repeated calls for the same triple return the
/// same 12-character token. No storage or network access.
///
/// # Examples
///
/// ```
/// use attribution_engine::utils::tracking_code::tracking_code;
///
/// let code = tracking_code(7, 21, 99);
/// assert_eq!(code, tracking_code(7, 21, 99));
/// assert_eq!(code.len(), 12);
/// ```
pub fn tracking_code(actor_id: i64, content_id: i64, product_id: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"link/v1:");
    hasher.update(actor_id.to_be_bytes());
    hasher.update(content_id.to_be_bytes());
    hasher.update(product_id.to_be_bytes());
    let digest = hasher.finalize();

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&digest[..CODE_LENGTH_BYTES])
}
