//! Unverified decoding of the compact token payload segment.
//!
//! A compact token is three dot-separated base64url segments (header,
//! payload, signature). The functions here decode the payload segment only
//! and perform no signature verification; that is the job of
//! [`crate::BearerValidator`] on the server and of the identity provider.

use crate::error::AuthError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::Value;

/// Decode the payload segment of a compact token into JSON.
///
/// # Errors
///
/// Returns `AuthError::InvalidToken` if the token does not have three
/// segments, the payload is not valid base64url, or the decoded payload is
/// not valid JSON.
pub fn decode_payload(token: &str) -> Result<Value, AuthError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AuthError::InvalidToken(
            "Expected three dot-separated segments".to_string(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| AuthError::InvalidToken(format!("Invalid base64 payload: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::InvalidToken(format!("Invalid JSON payload: {e}")))
}

/// Pretty-print the decoded payload for diagnostic display.
///
/// Any failure (malformed token, bad base64, bad JSON) is swallowed and
/// surfaced as `None`; this function never panics.
#[must_use]
pub fn pretty_claims(token: &str) -> Option<String> {
    let payload = decode_payload(token).ok()?;
    serde_json::to_string_pretty(&payload).ok()
}

/// Extract the `exp` claim (seconds since epoch) without verification.
///
/// Returns `None` if the token cannot be decoded or carries no numeric `exp`.
#[must_use]
pub fn expiry(token: &str) -> Option<i64> {
    decode_payload(token).ok()?.get("exp")?.as_i64()
}
