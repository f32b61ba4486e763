//! Interactive login, logout and the post-login callback.

use crate::config::ClientConfig;
use crate::refresh::RefreshScheduler;
use crate::store::SessionHandle;
use std::sync::Arc;
use url::Url;

/// Performs a full-page navigation to another origin.
///
/// Interactive sign-in and sign-out both leave the application entirely, so
/// the navigation side effect is behind a trait and the rest of the flow
/// stays testable.
pub trait Navigator: Send + Sync {
    /// Navigate the user agent to `url`.
    fn navigate(&self, url: &str);
}

/// Starts interactive sign-in and sign-out against the identity provider.
pub struct LoginInitiator {
    config: Arc<ClientConfig>,
    session: SessionHandle,
    scheduler: RefreshScheduler,
    navigator: Arc<dyn Navigator>,
}

impl LoginInitiator {
    /// Create an initiator bound to the session and its renewal scheduler.
    #[must_use]
    pub fn new(
        config: Arc<ClientConfig>,
        session: SessionHandle,
        scheduler: RefreshScheduler,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            config,
            session,
            scheduler,
            navigator,
        }
    }

    /// Send the user to the provider's login page.
    ///
    /// The login URL carries the redirect target, the client identity and
    /// the identity-source buttons to offer. A missing redirect URI is
    /// substituted with an empty value so the provider can reject it with a
    /// meaningful error page instead of this client failing silently.
    pub fn login(&self) {
        let redirect_uri = match &self.config.redirect_uri {
            Some(uri) => uri.as_str(),
            None => {
                tracing::warn!("no redirect_uri configured; sending empty value to provider");
                ""
            }
        };

        let buttons = self
            .config
            .identity_sources
            .iter()
            .map(|source| source.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let mut login_url = self.config.authority.clone();
        login_url.set_path("/login");
        login_url
            .query_pairs_mut()
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("client_id", &self.config.client_id)
            .append_pair("scope", &self.config.scope)
            .append_pair("buttons", &buttons);

        tracing::debug!(url = %login_url, "starting interactive login");
        self.navigator.navigate(login_url.as_str());
    }

    /// Clear the session and sign out at the provider.
    ///
    /// Local state is torn down before navigating away, so an interrupted
    /// sign-out still leaves the client logged out. Idempotent.
    pub fn logout(&self) {
        self.session.set_token(None);
        self.scheduler.cancel();

        let mut logout_url = self.config.authority.clone();
        logout_url.set_path("/logout");
        if let Some(uri) = &self.config.post_logout_redirect_uri {
            logout_url
                .query_pairs_mut()
                .append_pair("post_logout_redirect_uri", uri);
        }

        tracing::debug!(url = %logout_url, "signing out at provider");
        self.navigator.navigate(logout_url.as_str());
    }
}

/// Completes the login round trip when the provider redirects back.
pub struct CallbackHandler {
    session: SessionHandle,
    scheduler: RefreshScheduler,
    navigator: Arc<dyn Navigator>,
}

impl CallbackHandler {
    /// Create a handler bound to the session and its renewal scheduler.
    #[must_use]
    pub fn new(
        session: SessionHandle,
        scheduler: RefreshScheduler,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            session,
            scheduler,
            navigator,
        }
    }

    /// Process the callback URL the provider redirected to.
    ///
    /// A `token` query parameter establishes the session, arms renewal and
    /// navigates home. Without one the session is left untouched; replaying
    /// a consumed callback URL therefore has the same effect as the first
    /// visit.
    pub fn handle(&self, callback_url: &Url) {
        let token = callback_url
            .query_pairs()
            .find(|(name, _)| name == "token")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());

        let Some(token) = token else {
            tracing::warn!("callback URL carried no token; session unchanged");
            return;
        };

        self.session.set_token(Some(token.clone()));
        self.scheduler.schedule(&token);
        self.navigator.navigate("/");
    }
}
