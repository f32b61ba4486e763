//! Error types for client-side session operations.

use thiserror::Error;

/// Session lifecycle error types.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// The configured authority is not a valid URL.
    #[error("Invalid authority URL: {0}")]
    InvalidAuthority(String),

    /// The refresh request could not be sent or completed.
    #[error("Refresh request failed: {0}")]
    RefreshRequest(String),

    /// The refresh endpoint answered with a non-success status.
    #[error("Refresh endpoint returned HTTP {0}")]
    RefreshStatus(u16),

    /// The refresh endpoint answered 2xx but the body was not the expected
    /// `{"token": "..."}` shape.
    #[error("Malformed refresh response: {0}")]
    MalformedRefreshResponse(String),

    /// Durable token storage failed.
    #[error("Token storage failed: {0}")]
    Storage(String),
}

impl SessionError {
    /// Check if this error came from the refresh endpoint or transport.
    #[must_use]
    pub fn is_refresh_error(&self) -> bool {
        matches!(
            self,
            SessionError::RefreshRequest(_)
                | SessionError::RefreshStatus(_)
                | SessionError::MalformedRefreshResponse(_)
        )
    }
}
