//! Error types for dispatch configuration.

use thiserror::Error;

/// Errors raised while building a [`crate::DispatchConfig`].
///
/// Dispatch itself never errors at request time; unrecognized or
/// unauthenticated callbacks fall through to the inner service. These
/// variants exist so a misconfigured route table fails at startup instead.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// A route references a scheme with no registered authenticator.
    #[error("No authenticator registered for scheme '{0}'")]
    UnknownScheme(String),

    /// Two routes share the same state prefix.
    #[error("Duplicate tenant prefix '{0}'")]
    DuplicatePrefix(String),

    /// A route was registered with an empty prefix.
    #[error("Tenant prefix must not be empty")]
    EmptyPrefix,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DispatchError::UnknownScheme("ArmyCookieScheme".to_string());
        assert_eq!(
            err.to_string(),
            "No authenticator registered for scheme 'ArmyCookieScheme'"
        );

        let err = DispatchError::DuplicatePrefix("army".to_string());
        assert_eq!(err.to_string(), "Duplicate tenant prefix 'army'");
    }
}
