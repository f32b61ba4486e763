//! Client configuration for the identity provider round-trip.

use crate::error::SessionError;
use url::Url;

/// Identity-source selector hints offered on the provider's login page.
///
/// A fixed, statically known set; the provider renders one button per hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// Organizational (army tenant) login.
    Army,
    /// Educational (edu tenant) login.
    Edu,
    /// Generic email login.
    Email,
}

impl IdentitySource {
    /// All known identity sources, in display order.
    pub const ALL: [IdentitySource; 3] = [
        IdentitySource::Army,
        IdentitySource::Edu,
        IdentitySource::Email,
    ];

    /// The wire name used in the `buttons` query parameter.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentitySource::Army => "army",
            IdentitySource::Edu => "edu",
            IdentitySource::Email => "email",
        }
    }
}

impl std::fmt::Display for IdentitySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the SSO client.
///
/// # Example
///
/// ```rust
/// use signon_session::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .authority("https://localhost:7274")
///     .client_id("new-client-id")
///     .redirect_uri("http://localhost:3000/callback")
///     .post_logout_redirect_uri("http://localhost:3000/")
///     .scope("openid profile email")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.client_id, "new-client-id");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Identity provider base URL.
    pub authority: Url,
    /// Client identifier registered with the provider.
    pub client_id: String,
    /// Post-login redirect URI. Absence is tolerated: an empty value is
    /// substituted at login time with a warning.
    pub redirect_uri: Option<String>,
    /// Redirect target after remote sign-out.
    pub post_logout_redirect_uri: Option<String>,
    /// Requested scopes, space-separated.
    pub scope: String,
    /// Identity-source hints to offer on the login page.
    pub identity_sources: Vec<IdentitySource>,
}

impl ClientConfig {
    /// Create a new builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    authority: Option<String>,
    client_id: Option<String>,
    redirect_uri: Option<String>,
    post_logout_redirect_uri: Option<String>,
    scope: Option<String>,
    identity_sources: Option<Vec<IdentitySource>>,
}

impl ClientConfigBuilder {
    /// Set the identity provider base URL (required).
    #[must_use]
    pub fn authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    /// Set the client identifier.
    #[must_use]
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the post-login redirect URI.
    #[must_use]
    pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    /// Set the post-logout redirect URI.
    #[must_use]
    pub fn post_logout_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.post_logout_redirect_uri = Some(uri.into());
        self
    }

    /// Set the requested scopes (space-separated).
    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Restrict the identity sources offered at login.
    #[must_use]
    pub fn identity_sources(mut self, sources: Vec<IdentitySource>) -> Self {
        self.identity_sources = Some(sources);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidAuthority` if the authority is missing
    /// or not a valid absolute URL.
    pub fn build(self) -> Result<ClientConfig, SessionError> {
        let authority = self
            .authority
            .ok_or_else(|| SessionError::InvalidAuthority("authority not set".to_string()))?;
        let authority = Url::parse(&authority)
            .map_err(|e| SessionError::InvalidAuthority(format!("{authority}: {e}")))?;

        Ok(ClientConfig {
            authority,
            client_id: self.client_id.unwrap_or_default(),
            redirect_uri: self.redirect_uri,
            post_logout_redirect_uri: self.post_logout_redirect_uri,
            scope: self
                .scope
                .unwrap_or_else(|| "openid profile email".to_string()),
            identity_sources: self
                .identity_sources
                .unwrap_or_else(|| IdentitySource::ALL.to_vec()),
        })
    }
}
