//! Dispatch configuration: the callback path, the ordered tenant route
//! table, and the registered scheme authenticators.

use crate::error::DispatchError;
use crate::scheme::SchemeAuthenticator;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Default SSO callback path shared by all tenants.
pub const DEFAULT_CALLBACK_PATH: &str = "/signin-oidc";

/// One entry of the tenant route table: a state prefix mapped to an
/// authentication scheme identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRoute {
    /// Prefix of the `state` correlation parameter (e.g. "army").
    pub prefix: String,
    /// Scheme identifier handling callbacks for this tenant.
    pub scheme: String,
}

/// Ordered, immutable prefix-to-scheme table, loaded once at startup.
///
/// Matching is first-match-wins and requires the separator, so a registered
/// prefix `army` matches `army-abc123` but never `armyx-abc123`.
#[derive(Debug, Clone, Default)]
pub struct TenantRouteTable {
    routes: Vec<TenantRoute>,
}

impl TenantRouteTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Order is significant.
    pub fn push(&mut self, prefix: impl Into<String>, scheme: impl Into<String>) {
        self.routes.push(TenantRoute {
            prefix: prefix.into(),
            scheme: scheme.into(),
        });
    }

    /// Match a `state` value against the table, returning the scheme of the
    /// first route whose prefix (plus separator) starts the value.
    #[must_use]
    pub fn match_state(&self, state: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|route| {
                state
                    .strip_prefix(route.prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('-'))
            })
            .map(|route| route.scheme.as_str())
    }

    /// The registered routes in evaluation order.
    #[must_use]
    pub fn routes(&self) -> &[TenantRoute] {
        &self.routes
    }
}

/// Configuration for the tenant dispatch middleware.
///
/// # Example
///
/// ```rust
/// use signon_tenant::{CookieSchemeAuthenticator, DispatchConfig};
/// use std::sync::Arc;
///
/// let config = DispatchConfig::builder()
///     .route("army", "ArmyCookieScheme")
///     .route("edu", "EduCookieScheme")
///     .authenticator(
///         "ArmyCookieScheme",
///         Arc::new(CookieSchemeAuthenticator::new("ArmyCookieScheme")),
///     )
///     .authenticator(
///         "EduCookieScheme",
///         Arc::new(CookieSchemeAuthenticator::new("EduCookieScheme")),
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(config.callback_path(), "/signin-oidc");
/// ```
#[derive(Clone)]
pub struct DispatchConfig {
    callback_path: String,
    table: TenantRouteTable,
    authenticators: HashMap<String, Arc<dyn SchemeAuthenticator>>,
}

impl fmt::Debug for DispatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchConfig")
            .field("callback_path", &self.callback_path)
            .field("table", &self.table)
            .field(
                "authenticators",
                &self.authenticators.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl DispatchConfig {
    /// Create a new builder.
    #[must_use]
    pub fn builder() -> DispatchConfigBuilder {
        DispatchConfigBuilder::default()
    }

    /// The SSO callback path this middleware inspects.
    #[must_use]
    pub fn callback_path(&self) -> &str {
        &self.callback_path
    }

    /// The tenant route table.
    #[must_use]
    pub fn table(&self) -> &TenantRouteTable {
        &self.table
    }

    /// Look up the authenticator registered for a scheme.
    #[must_use]
    pub fn authenticator(&self, scheme: &str) -> Option<&Arc<dyn SchemeAuthenticator>> {
        self.authenticators.get(scheme)
    }
}

/// Builder for [`DispatchConfig`].
#[derive(Default)]
pub struct DispatchConfigBuilder {
    callback_path: Option<String>,
    table: TenantRouteTable,
    authenticators: HashMap<String, Arc<dyn SchemeAuthenticator>>,
}

impl DispatchConfigBuilder {
    /// Override the callback path (default: `/signin-oidc`).
    #[must_use]
    pub fn callback_path(mut self, path: impl Into<String>) -> Self {
        self.callback_path = Some(path.into());
        self
    }

    /// Append a tenant route. Order is significant (first match wins).
    #[must_use]
    pub fn route(mut self, prefix: impl Into<String>, scheme: impl Into<String>) -> Self {
        self.table.push(prefix, scheme);
        self
    }

    /// Register the authenticator for a scheme.
    #[must_use]
    pub fn authenticator(
        mut self,
        scheme: impl Into<String>,
        authenticator: Arc<dyn SchemeAuthenticator>,
    ) -> Self {
        self.authenticators.insert(scheme.into(), authenticator);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Fails fast on empty or duplicate prefixes, and on routes whose scheme
    /// has no registered authenticator.
    pub fn build(self) -> Result<DispatchConfig, DispatchError> {
        let mut seen = std::collections::HashSet::new();
        for route in self.table.routes() {
            if route.prefix.is_empty() {
                return Err(DispatchError::EmptyPrefix);
            }
            if !seen.insert(route.prefix.as_str()) {
                return Err(DispatchError::DuplicatePrefix(route.prefix.clone()));
            }
            if !self.authenticators.contains_key(&route.scheme) {
                return Err(DispatchError::UnknownScheme(route.scheme.clone()));
            }
        }

        Ok(DispatchConfig {
            callback_path: self
                .callback_path
                .unwrap_or_else(|| DEFAULT_CALLBACK_PATH.to_string()),
            table: self.table,
            authenticators: self.authenticators,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::CookieSchemeAuthenticator;

    fn cookie_auth(name: &str) -> Arc<dyn SchemeAuthenticator> {
        Arc::new(CookieSchemeAuthenticator::new(name))
    }

    #[test]
    fn test_match_state_first_match_wins() {
        let mut table = TenantRouteTable::new();
        table.push("army", "ArmyCookieScheme");
        table.push("edu", "EduCookieScheme");

        assert_eq!(table.match_state("army-abc123"), Some("ArmyCookieScheme"));
        assert_eq!(table.match_state("edu-xyz987"), Some("EduCookieScheme"));
        assert_eq!(table.match_state("navy-abc123"), None);
    }

    #[test]
    fn test_match_state_requires_separator() {
        let mut table = TenantRouteTable::new();
        table.push("army", "ArmyCookieScheme");

        assert_eq!(table.match_state("armyx-abc"), None);
        assert_eq!(table.match_state("army"), None);
        assert_eq!(table.match_state("army-"), Some("ArmyCookieScheme"));
    }

    #[test]
    fn test_builder_defaults() {
        let config = DispatchConfig::builder()
            .route("army", "ArmyCookieScheme")
            .authenticator("ArmyCookieScheme", cookie_auth("ArmyCookieScheme"))
            .build()
            .unwrap();

        assert_eq!(config.callback_path(), DEFAULT_CALLBACK_PATH);
        assert!(config.authenticator("ArmyCookieScheme").is_some());
        assert!(config.authenticator("EduCookieScheme").is_none());
    }

    #[test]
    fn test_builder_rejects_unknown_scheme() {
        let result = DispatchConfig::builder()
            .route("army", "ArmyCookieScheme")
            .build();

        assert!(matches!(
            result.unwrap_err(),
            DispatchError::UnknownScheme(_)
        ));
    }

    #[test]
    fn test_builder_rejects_duplicate_prefix() {
        let result = DispatchConfig::builder()
            .route("army", "ArmyCookieScheme")
            .route("army", "EduCookieScheme")
            .authenticator("ArmyCookieScheme", cookie_auth("ArmyCookieScheme"))
            .authenticator("EduCookieScheme", cookie_auth("EduCookieScheme"))
            .build();

        assert!(matches!(
            result.unwrap_err(),
            DispatchError::DuplicatePrefix(_)
        ));
    }

    #[test]
    fn test_builder_rejects_empty_prefix() {
        let result = DispatchConfig::builder()
            .route("", "ArmyCookieScheme")
            .authenticator("ArmyCookieScheme", cookie_auth("ArmyCookieScheme"))
            .build();

        assert!(matches!(result.unwrap_err(), DispatchError::EmptyPrefix));
    }
}
