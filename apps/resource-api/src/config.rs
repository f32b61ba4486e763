//! Environment-driven server configuration.
//!
//! Required variables are validated up front so a misconfigured deployment
//! fails at startup rather than at first request.

use signon_tenant::{CookieSchemeAuthenticator, DispatchConfig, DispatchError};
use std::env;
use std::sync::Arc;
use thiserror::Error;

/// Configuration load failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A variable is present but cannot be parsed.
    #[error("Invalid value for {name}: {reason}")]
    InvalidVar { name: &'static str, reason: String },

    /// The tenant route table failed validation.
    #[error("Invalid tenant dispatch configuration: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Runtime configuration, loaded once at startup.
pub struct Config {
    /// Expected token issuer.
    pub issuer: String,
    /// Expected token audience.
    pub audience: String,
    /// Symmetric key used to verify token signatures.
    pub jwt_signing_key: String,
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Allowed ClockSkew when checking token lifetimes, in seconds.
    pub clock_skew_secs: u64,
    /// Origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
}

// The signing key never appears in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("jwt_signing_key", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("clock_skew_secs", &self.clock_skew_secs)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn optional(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value fails
    /// to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let issuer = required("ISSUER")?;
        let audience = required("AUDIENCE")?;
        let jwt_signing_key = required("JWT_SIGNING_KEY")?;

        let host = optional("HOST", "0.0.0.0");
        let port = optional("PORT", "7275")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidVar {
                name: "PORT",
                reason: e.to_string(),
            })?;
        let clock_skew_secs = optional("CLOCK_SKEW_SECS", "0")
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidVar {
                name: "CLOCK_SKEW_SECS",
                reason: e.to_string(),
            })?;
        let cors_origins = optional("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            issuer,
            audience,
            jwt_signing_key,
            host,
            port,
            clock_skew_secs,
            cors_origins,
        })
    }

    /// Tenant callback routes served by this deployment.
    ///
    /// The table is static: army and edu are the onboarded tenants, in
    /// match order.
    ///
    /// # Errors
    ///
    /// Returns an error if the route table fails validation.
    pub fn dispatch_config(&self) -> Result<DispatchConfig, ConfigError> {
        let config = DispatchConfig::builder()
            .route("army", "ArmyCookieScheme")
            .route("edu", "EduCookieScheme")
            .authenticator(
                "ArmyCookieScheme",
                Arc::new(CookieSchemeAuthenticator::new("ArmyCookieScheme")),
            )
            .authenticator(
                "EduCookieScheme",
                Arc::new(CookieSchemeAuthenticator::new("EduCookieScheme")),
            )
            .build()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_signing_key() {
        let config = Config {
            issuer: "https://localhost:7274".to_string(),
            audience: "resource-server-1".to_string(),
            jwt_signing_key: "very-secret".to_string(),
            host: "0.0.0.0".to_string(),
            port: 7275,
            clock_skew_secs: 0,
            cors_origins: vec!["http://localhost:3000".to_string()],
        };

        let rendered = format!("{config:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("very-secret"));
    }

    #[test]
    fn test_dispatch_config_routes_army_and_edu() {
        let config = Config {
            issuer: String::new(),
            audience: String::new(),
            jwt_signing_key: String::new(),
            host: String::new(),
            port: 0,
            clock_skew_secs: 0,
            cors_origins: Vec::new(),
        };

        let dispatch = config.dispatch_config().unwrap();
        assert_eq!(dispatch.table().match_state("army-abc"), Some("ArmyCookieScheme"));
        assert_eq!(dispatch.table().match_state("edu-abc"), Some("EduCookieScheme"));
        assert_eq!(dispatch.table().match_state("navy-abc"), None);
    }
}
