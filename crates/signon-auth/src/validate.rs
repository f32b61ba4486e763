//! Bearer token validation.
//!
//! Validates issuer, audience, lifetime and signature on every call; no
//! validation result is ever cached across requests. Emits tracing events at
//! each phase: token received, validation succeeded, validation failed.

use crate::claims::BearerClaims;
use crate::error::AuthError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Key material for signing tokens.
#[derive(Debug, Clone)]
pub enum SigningKey {
    /// Symmetric secret for HS256.
    Hmac(Vec<u8>),
    /// PEM-encoded RSA private key for RS256.
    RsaPem(Vec<u8>),
}

/// Key material for validating token signatures.
#[derive(Debug, Clone)]
pub enum ValidatorKey {
    /// Symmetric secret for HS256.
    Hmac(Vec<u8>),
    /// PEM-encoded RSA public key for RS256.
    RsaPem(Vec<u8>),
}

/// Configuration for bearer token validation.
///
/// Issuer and audience equality are always enforced. The clock-skew leeway
/// defaults to zero seconds.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Expected issuer; tokens with a different `iss` are rejected.
    pub issuer: String,
    /// Expected audience; tokens without a matching `aud` are rejected.
    pub audience: String,
    /// Leeway in seconds for exp/nbf validation (clock skew tolerance).
    pub leeway: u64,
}

impl ValidationConfig {
    /// Create a validation config with zero leeway.
    #[must_use]
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            leeway: 0,
        }
    }

    /// Set the clock-skew leeway in seconds.
    #[must_use]
    pub fn with_leeway(mut self, leeway: u64) -> Self {
        self.leeway = leeway;
        self
    }
}

/// Result of validating a bearer token.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthenticationOutcome {
    /// The token passed all checks; its decoded claims are attached.
    Valid(BearerClaims),
    /// No bearer token was presented.
    MissingToken,
    /// The token is not a well-formed compact token.
    Malformed,
    /// The token is expired or not yet valid.
    ExpiredOrNotYetValid,
    /// The `iss` claim does not equal the configured issuer.
    IssuerMismatch,
    /// The `aud` claim does not include the configured audience.
    AudienceMismatch,
    /// Signature verification failed.
    SignatureInvalid,
}

impl AuthenticationOutcome {
    /// Check if the token was accepted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, AuthenticationOutcome::Valid(_))
    }

    /// Stable reason string for diagnostics and log events.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            AuthenticationOutcome::Valid(_) => "valid",
            AuthenticationOutcome::MissingToken => "missing_token",
            AuthenticationOutcome::Malformed => "malformed",
            AuthenticationOutcome::ExpiredOrNotYetValid => "expired_or_not_yet_valid",
            AuthenticationOutcome::IssuerMismatch => "issuer_mismatch",
            AuthenticationOutcome::AudienceMismatch => "audience_mismatch",
            AuthenticationOutcome::SignatureInvalid => "signature_invalid",
        }
    }

    /// Consume the outcome, returning the claims if the token was accepted.
    #[must_use]
    pub fn into_claims(self) -> Option<BearerClaims> {
        match self {
            AuthenticationOutcome::Valid(claims) => Some(claims),
            _ => None,
        }
    }
}

/// Encode claims into a signed compact token.
///
/// The demo identity provider side of the system mints tokens this way; the
/// workspace tests use it to produce fixtures.
///
/// # Errors
///
/// Returns `AuthError::InvalidKey` if the key material is unusable and
/// `AuthError::EncodingFailed` if signing fails.
pub fn encode_token(claims: &BearerClaims, key: &SigningKey) -> Result<String, AuthError> {
    let (encoding_key, algorithm) = match key {
        SigningKey::Hmac(secret) => (EncodingKey::from_secret(secret), Algorithm::HS256),
        SigningKey::RsaPem(pem) => (
            EncodingKey::from_rsa_pem(pem)
                .map_err(|e| AuthError::InvalidKey(format!("Invalid private key: {e}")))?,
            Algorithm::RS256,
        ),
    };

    encode(&Header::new(algorithm), claims, &encoding_key)
        .map_err(|e| AuthError::EncodingFailed(e.to_string()))
}

/// Validates bearer tokens against configured issuer, audience and key.
///
/// # Example
///
/// ```rust
/// use signon_auth::{BearerValidator, ValidationConfig, ValidatorKey};
///
/// let validator = BearerValidator::new(
///     &ValidatorKey::Hmac(b"YourSuperSecureRandomSecretKey123!".to_vec()),
///     &ValidationConfig::new("https://localhost:7274", "resource-server-1"),
/// )
/// .unwrap();
///
/// let outcome = validator.check(None);
/// assert!(!outcome.is_valid());
/// ```
#[derive(Clone)]
pub struct BearerValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for BearerValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerValidator")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

impl BearerValidator {
    /// Create a validator from key material and validation config.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidKey` if the key material is invalid.
    pub fn new(key: &ValidatorKey, config: &ValidationConfig) -> Result<Self, AuthError> {
        let (decoding_key, algorithm) = match key {
            ValidatorKey::Hmac(secret) => (DecodingKey::from_secret(secret), Algorithm::HS256),
            ValidatorKey::RsaPem(pem) => (
                DecodingKey::from_rsa_pem(pem)
                    .map_err(|e| AuthError::InvalidKey(format!("Invalid public key: {e}")))?,
                Algorithm::RS256,
            ),
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = config.leeway;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Validate a token that may be absent.
    ///
    /// `None` short-circuits to [`AuthenticationOutcome::MissingToken`].
    #[must_use]
    pub fn check(&self, token: Option<&str>) -> AuthenticationOutcome {
        match token {
            Some(t) if !t.is_empty() => self.validate(t),
            _ => {
                tracing::debug!("no bearer token on request");
                AuthenticationOutcome::MissingToken
            }
        }
    }

    /// Validate a presented token. Re-verifies the signature on every call.
    #[must_use]
    pub fn validate(&self, token: &str) -> AuthenticationOutcome {
        tracing::debug!("bearer token received");

        match decode::<BearerClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => {
                tracing::info!(sub = %data.claims.sub, "bearer token validated");
                AuthenticationOutcome::Valid(data.claims)
            }
            Err(err) => {
                let outcome = map_jwt_error(&err);
                tracing::warn!(
                    reason = outcome.reason(),
                    error = %err,
                    "bearer token validation failed"
                );
                outcome
            }
        }
    }
}

/// Map jsonwebtoken errors to an authentication outcome.
fn map_jwt_error(err: &jsonwebtoken::errors::Error) -> AuthenticationOutcome {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => {
            AuthenticationOutcome::ExpiredOrNotYetValid
        }
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
            AuthenticationOutcome::SignatureInvalid
        }
        ErrorKind::InvalidIssuer => AuthenticationOutcome::IssuerMismatch,
        ErrorKind::InvalidAudience => AuthenticationOutcome::AudienceMismatch,
        ErrorKind::MissingRequiredClaim(claim) => match claim.as_str() {
            "iss" => AuthenticationOutcome::IssuerMismatch,
            "aud" => AuthenticationOutcome::AudienceMismatch,
            _ => AuthenticationOutcome::Malformed,
        },
        _ => AuthenticationOutcome::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const SECRET: &[u8] = b"YourSuperSecureRandomSecretKey123!";
    const ISSUER: &str = "https://localhost:7274";
    const AUDIENCE: &str = "resource-server-1";

    fn validator() -> BearerValidator {
        BearerValidator::new(
            &ValidatorKey::Hmac(SECRET.to_vec()),
            &ValidationConfig::new(ISSUER, AUDIENCE),
        )
        .unwrap()
    }

    fn valid_claims() -> BearerClaims {
        BearerClaims::builder()
            .subject("user-123")
            .issuer(ISSUER)
            .audience(AUDIENCE)
            .expires_in_secs(3600)
            .build()
    }

    fn mint(claims: &BearerClaims) -> String {
        encode_token(claims, &SigningKey::Hmac(SECRET.to_vec())).unwrap()
    }

    #[test]
    fn test_valid_token() {
        let token = mint(&valid_claims());

        let outcome = validator().validate(&token);
        let claims = outcome.into_claims().unwrap();
        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.iss, ISSUER);
    }

    #[test]
    fn test_missing_token() {
        assert_eq!(
            validator().check(None),
            AuthenticationOutcome::MissingToken
        );
        assert_eq!(
            validator().check(Some("")),
            AuthenticationOutcome::MissingToken
        );
    }

    #[test]
    fn test_malformed_token() {
        assert_eq!(
            validator().validate("not-a-token"),
            AuthenticationOutcome::Malformed
        );
    }

    #[test]
    fn test_expired_token() {
        let claims = BearerClaims::builder()
            .subject("user-123")
            .issuer(ISSUER)
            .audience(AUDIENCE)
            .expiration(Utc::now().timestamp() - 3600)
            .build();

        assert_eq!(
            validator().validate(&mint(&claims)),
            AuthenticationOutcome::ExpiredOrNotYetValid
        );
    }

    #[test]
    fn test_zero_leeway_is_default() {
        // A token expired one minute ago must be rejected: the original
        // resource server runs with ClockSkew zero.
        let claims = BearerClaims::builder()
            .issuer(ISSUER)
            .audience(AUDIENCE)
            .expiration(Utc::now().timestamp() - 60)
            .build();
        let token = mint(&claims);

        assert_eq!(
            validator().validate(&token),
            AuthenticationOutcome::ExpiredOrNotYetValid
        );

        // The same token passes with a two-minute leeway.
        let lenient = BearerValidator::new(
            &ValidatorKey::Hmac(SECRET.to_vec()),
            &ValidationConfig::new(ISSUER, AUDIENCE).with_leeway(120),
        )
        .unwrap();
        assert!(lenient.validate(&token).is_valid());
    }

    #[test]
    fn test_issuer_mismatch() {
        let claims = BearerClaims::builder()
            .issuer("https://rogue-idp.example.com")
            .audience(AUDIENCE)
            .expires_in_secs(3600)
            .build();

        assert_eq!(
            validator().validate(&mint(&claims)),
            AuthenticationOutcome::IssuerMismatch
        );
    }

    #[test]
    fn test_audience_mismatch_with_valid_signature_and_lifetime() {
        let claims = BearerClaims::builder()
            .subject("user-123")
            .issuer(ISSUER)
            .audience("someone-else")
            .expires_in_secs(3600)
            .build();

        // Signature and lifetime are fine; only the audience is wrong.
        assert_eq!(
            validator().validate(&mint(&claims)),
            AuthenticationOutcome::AudienceMismatch
        );
    }

    #[test]
    fn test_signature_invalid() {
        let token =
            encode_token(&valid_claims(), &SigningKey::Hmac(b"wrong-secret".to_vec())).unwrap();

        assert_eq!(
            validator().validate(&token),
            AuthenticationOutcome::SignatureInvalid
        );
    }

    #[test]
    fn test_invalid_rsa_key_rejected() {
        let result = BearerValidator::new(
            &ValidatorKey::RsaPem(b"not a pem".to_vec()),
            &ValidationConfig::new(ISSUER, AUDIENCE),
        );

        assert!(matches!(result.unwrap_err(), AuthError::InvalidKey(_)));
    }

    #[test]
    fn test_outcome_reason_strings() {
        assert_eq!(AuthenticationOutcome::MissingToken.reason(), "missing_token");
        assert_eq!(
            AuthenticationOutcome::AudienceMismatch.reason(),
            "audience_mismatch"
        );
        assert_eq!(
            AuthenticationOutcome::Valid(valid_claims()).reason(),
            "valid"
        );
    }
}
