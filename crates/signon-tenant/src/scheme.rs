//! Tenant authentication schemes.
//!
//! A scheme authenticates a callback request from whatever ambient context it
//! already carries (cookies, headers). The `state` prefix only selects which
//! scheme runs; it never grants trust by itself.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use http::HeaderMap;
use std::collections::HashMap;

/// Property key under which the client's original redirect URI is stashed
/// when the flow starts.
pub const REDIRECT_URI_PROPERTY: &str = "redirect_uri";

/// Properties attached to a successful scheme authentication.
///
/// The flow initiator stashes values here (notably the client redirect URI)
/// and the dispatch middleware reads them back after authentication.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthProperties {
    items: HashMap<String, String>,
}

impl AuthProperties {
    /// Create an empty property set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property, returning self for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.items.insert(key.into(), value.into());
        self
    }

    /// Look up a property by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    /// The client redirect URI stashed at the start of the flow, if any.
    #[must_use]
    pub fn redirect_uri(&self) -> Option<&str> {
        self.get(REDIRECT_URI_PROPERTY)
    }
}

/// Authenticates a callback request under one tenant's scheme.
///
/// Implementations inspect only the ambient request context; returning `None`
/// means "not yet authenticated under this scheme" and is not an error.
pub trait SchemeAuthenticator: Send + Sync {
    /// Attempt authentication from the request headers.
    fn authenticate(&self, headers: &HeaderMap) -> Option<AuthProperties>;
}

/// Authenticator backed by a per-scheme session ticket cookie.
///
/// The ticket is a base64url-encoded JSON map of authentication properties,
/// written into a cookie named after the scheme when the identity provider
/// round-trip began. Presence of a decodable ticket counts as authenticated;
/// this mirrors how the demo's cookie schemes carry their properties.
#[derive(Debug, Clone)]
pub struct CookieSchemeAuthenticator {
    cookie_name: String,
}

impl CookieSchemeAuthenticator {
    /// Create an authenticator reading the given cookie.
    #[must_use]
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }

    /// The cookie this authenticator reads.
    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Encode properties into a ticket cookie value.
    #[must_use]
    pub fn encode_ticket(properties: &AuthProperties) -> String {
        // items is a flat string map; serialization cannot fail
        let json = serde_json::to_vec(&properties.items).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode a ticket cookie value back into properties.
    #[must_use]
    pub fn decode_ticket(value: &str) -> Option<AuthProperties> {
        let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
        let items: HashMap<String, String> = serde_json::from_slice(&bytes).ok()?;
        Some(AuthProperties { items })
    }

    fn find_cookie<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get_all(http::header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|header| header.split(';'))
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == self.cookie_name).then_some(value)
            })
            .next()
    }
}

impl SchemeAuthenticator for CookieSchemeAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Option<AuthProperties> {
        let value = self.find_cookie(headers)?;
        let properties = Self::decode_ticket(value);
        if properties.is_none() {
            tracing::debug!(cookie = %self.cookie_name, "ticket cookie present but undecodable");
        }
        properties
    }
}
