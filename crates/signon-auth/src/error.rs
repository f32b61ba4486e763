//! Error types for token operations.

use thiserror::Error;

/// Token handling error types.
///
/// Validation failures on protected routes are not errors; they are modeled
/// as [`crate::AuthenticationOutcome`] variants. `AuthError` covers the
/// operations that can genuinely fail: payload decoding, key material
/// handling and token encoding.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Token format is malformed or the payload segment cannot be decoded.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Key material is invalid or unusable for the requested algorithm.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Signing a token failed.
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

impl AuthError {
    /// Check if this error was caused by a malformed token.
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        matches!(self, AuthError::InvalidToken(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::InvalidToken("malformed base64".to_string());
        assert_eq!(err.to_string(), "Invalid token: malformed base64");

        let err = AuthError::InvalidKey("not PEM".to_string());
        assert_eq!(err.to_string(), "Invalid key: not PEM");
    }

    #[test]
    fn test_is_decode_error() {
        assert!(AuthError::InvalidToken("x".to_string()).is_decode_error());
        assert!(!AuthError::InvalidKey("x".to_string()).is_decode_error());
    }
}
