//! Bearer token handling for signon.
//!
//! This crate provides:
//! - The [`BearerClaims`] model with standard and arbitrary additional claims
//! - Unverified payload decoding for diagnostic display ([`codec`])
//! - Bearer token validation with issuer/audience/lifetime/signature checks
//!   producing an [`AuthenticationOutcome`]
//!
//! # Example
//!
//! ```rust
//! use signon_auth::{
//!     encode_token, BearerClaims, BearerValidator, SigningKey, ValidationConfig, ValidatorKey,
//! };
//!
//! let claims = BearerClaims::builder()
//!     .subject("user-123")
//!     .issuer("https://localhost:7274")
//!     .audience("resource-server-1")
//!     .expires_in_secs(3600)
//!     .build();
//!
//! let secret = b"YourSuperSecureRandomSecretKey123!".to_vec();
//! let token = encode_token(&claims, &SigningKey::Hmac(secret.clone())).unwrap();
//!
//! let validator = BearerValidator::new(
//!     &ValidatorKey::Hmac(secret),
//!     &ValidationConfig::new("https://localhost:7274", "resource-server-1"),
//! )
//! .unwrap();
//!
//! assert!(validator.validate(&token).is_valid());
//! ```

mod claims;
pub mod codec;
mod error;
mod validate;

// Re-export public API
pub use claims::{BearerClaims, BearerClaimsBuilder};
pub use codec::{decode_payload, expiry, pretty_claims};
pub use error::AuthError;
pub use validate::{
    encode_token, AuthenticationOutcome, BearerValidator, SigningKey, ValidationConfig,
    ValidatorKey,
};
