//! HMAC-SHA256 request signing per spec §4.1:
//! `signature = HMAC-SHA256(key, timestamp || "." || canonical_body)`,
//! where `canonical_body` is the compact, sorted-key JSON encoding of the
//! payload (the literal `{}` for bodyless GETs).

use crate::error::TransportError;
use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::Value;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Freshness window, in seconds, per spec §4.1.
pub const FRESHNESS_WINDOW_SECS: i64 = 60;

/// Canonicalize a JSON value into the compact, sorted-key string used as
/// the signed payload. `serde_json::Map` is BTreeMap-backed (we don't
/// enable the `preserve_order` feature anywhere in this workspace), so
/// converting through `Value` sorts every object level, recursively, for
/// free.
pub fn canonicalize(value: &Value) -> String {
    serde_json::to_string(value).expect("Value serialization is infallible")
}

pub fn canonicalize_body<T: Serialize>(body: &T) -> Result<String, TransportError> {
    let value = serde_json::to_value(body)
        .map_err(|e| TransportError::MalformedPayload(e.to_string()))?;
    Ok(canonicalize(&value))
}

/// Canonical body for a GET / bodyless request.
pub fn empty_canonical_body() -> String {
    "{}".to_string()
}

pub fn sign(key: &[u8], timestamp: i64, canonical_body: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts a key of any length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(canonical_body.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a signature against the given key, timestamp and canonical body.
/// `now` and `timestamp` are unix seconds. Uses `Mac::verify_slice`, which
/// performs a constant-time comparison internally (spec §4.1 point 3).
pub fn verify(
    key: &[u8],
    timestamp: i64,
    now: i64,
    canonical_body: &str,
    signature_hex: &str,
) -> Result<(), TransportError> {
    if (now - timestamp).abs() > FRESHNESS_WINDOW_SECS {
        return Err(TransportError::Stale);
    }

    let provided = hex::decode(signature_hex).map_err(|_| TransportError::InvalidSignature)?;

    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts a key of any length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(canonical_body.as_bytes());

    mac.verify_slice(&provided).map_err(|_| TransportError::InvalidSignature)
}
