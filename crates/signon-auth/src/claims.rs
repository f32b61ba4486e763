//! Bearer token claims with standard and arbitrary additional claims.

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Claims carried in a bearer token payload.
///
/// # Standard Claims (RFC 7519)
///
/// - `sub`: Subject
/// - `iss`: Issuer (who created the token)
/// - `aud`: Audience (intended recipients)
/// - `exp`: Expiration time (Unix timestamp)
/// - `iat`: Issued at (Unix timestamp)
///
/// Any claim not listed above is preserved verbatim in [`BearerClaims::extra`]
/// so that decoding a token never drops information.
///
/// # Example
///
/// ```rust
/// use signon_auth::BearerClaims;
///
/// let claims = BearerClaims::builder()
///     .subject("user-123")
///     .issuer("https://localhost:7274")
///     .audience("resource-server-1")
///     .expires_in_secs(3600)
///     .build();
///
/// assert_eq!(claims.sub, "user-123");
/// assert!(!claims.is_expired());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BearerClaims {
    /// Subject - typically the user identifier.
    #[serde(default)]
    pub sub: String,

    /// Issuer - who created the token.
    #[serde(default)]
    pub iss: String,

    /// Audience - intended recipients. A bare string in the payload is
    /// accepted and normalized to a single-element list.
    #[serde(default, deserialize_with = "string_or_vec")]
    pub aud: Vec<String>,

    /// Expiration time as Unix timestamp.
    pub exp: i64,

    /// Issued at as Unix timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// All remaining claims, preserved as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BearerClaims {
    /// Create a new builder for constructing claims.
    #[must_use]
    pub fn builder() -> BearerClaimsBuilder {
        BearerClaimsBuilder::default()
    }

    /// Check if the token is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Check whether the given audience is among the intended recipients.
    #[must_use]
    pub fn has_audience(&self, audience: &str) -> bool {
        self.aud.iter().any(|a| a == audience)
    }
}

/// Accept `aud` as either a string or a list of strings.
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrVec {
        One(String),
        Many(Vec<String>),
    }

    Ok(match StringOrVec::deserialize(deserializer)? {
        StringOrVec::One(s) => vec![s],
        StringOrVec::Many(v) => v,
    })
}

/// Builder for constructing bearer claims.
#[derive(Debug, Default)]
pub struct BearerClaimsBuilder {
    sub: Option<String>,
    iss: Option<String>,
    aud: Vec<String>,
    exp: Option<i64>,
    iat: Option<i64>,
    extra: Map<String, Value>,
}

impl BearerClaimsBuilder {
    /// Set the subject.
    #[must_use]
    pub fn subject(mut self, sub: impl Into<String>) -> Self {
        self.sub = Some(sub.into());
        self
    }

    /// Set the issuer.
    #[must_use]
    pub fn issuer(mut self, iss: impl Into<String>) -> Self {
        self.iss = Some(iss.into());
        self
    }

    /// Add an audience.
    #[must_use]
    pub fn audience(mut self, aud: impl Into<String>) -> Self {
        self.aud.push(aud.into());
        self
    }

    /// Set expiration time as Unix timestamp.
    #[must_use]
    pub fn expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set expiration time as seconds from now.
    #[must_use]
    pub fn expires_in_secs(mut self, secs: i64) -> Self {
        self.exp = Some(Utc::now().timestamp() + secs);
        self
    }

    /// Set the issued at time.
    #[must_use]
    pub fn issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Add an arbitrary additional claim.
    #[must_use]
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Build the claims.
    ///
    /// # Defaults
    ///
    /// - `exp`: 1 hour from now if not set
    /// - `iat`: current time if not set
    #[must_use]
    pub fn build(self) -> BearerClaims {
        let now = Utc::now().timestamp();

        BearerClaims {
            sub: self.sub.unwrap_or_default(),
            iss: self.iss.unwrap_or_default(),
            aud: self.aud,
            exp: self.exp.unwrap_or(now + 3600),
            iat: Some(self.iat.unwrap_or(now)),
            extra: self.extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_builder_basic() {
        let claims = BearerClaims::builder()
            .subject("user-123")
            .issuer("test-issuer")
            .build();

        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.iss, "test-issuer");
        assert!(claims.iat.is_some());
    }

    #[test]
    fn test_claims_expiration() {
        let claims = BearerClaims::builder()
            .subject("user-123")
            .expires_in_secs(3600)
            .build();
        assert!(!claims.is_expired());

        let claims = BearerClaims::builder()
            .subject("user-123")
            .expiration(Utc::now().timestamp() - 3600)
            .build();
        assert!(claims.is_expired());
    }

    #[test]
    fn test_claims_has_audience() {
        let claims = BearerClaims::builder()
            .audience("resource-server-1")
            .audience("resource-server-2")
            .build();

        assert!(claims.has_audience("resource-server-1"));
        assert!(!claims.has_audience("resource-server-3"));
    }

    #[test]
    fn test_claims_serialization_round_trip() {
        let claims = BearerClaims::builder()
            .subject("user-123")
            .issuer("test-issuer")
            .audience("api")
            .claim("role", "admin")
            .build();

        let json = serde_json::to_string(&claims).unwrap();
        let deserialized: BearerClaims = serde_json::from_str(&json).unwrap();

        assert_eq!(claims, deserialized);
        assert_eq!(deserialized.extra.get("role"), Some(&Value::from("admin")));
    }

    #[test]
    fn test_aud_accepts_bare_string() {
        let json = r#"{"sub":"u","iss":"i","aud":"resource-server-1","exp":4102444800}"#;
        let claims: BearerClaims = serde_json::from_str(json).unwrap();

        assert_eq!(claims.aud, vec!["resource-server-1".to_string()]);
    }

    #[test]
    fn test_aud_accepts_list() {
        let json = r#"{"sub":"u","iss":"i","aud":["a","b"],"exp":4102444800}"#;
        let claims: BearerClaims = serde_json::from_str(json).unwrap();

        assert_eq!(claims.aud.len(), 2);
    }

    #[test]
    fn test_extra_claims_preserved() {
        let json = r#"{"sub":"u","exp":4102444800,"email":"u@example.com","roles":["a"]}"#;
        let claims: BearerClaims = serde_json::from_str(json).unwrap();

        assert_eq!(
            claims.extra.get("email"),
            Some(&Value::from("u@example.com"))
        );
        assert!(claims.extra.get("roles").is_some());
    }
}
