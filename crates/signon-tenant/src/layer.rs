//! Tower Layer implementation for tenant callback dispatch.

use crate::config::DispatchConfig;
use crate::service::DispatchService;
use std::sync::Arc;
use tower_layer::Layer;

/// Tower Layer adding tenant callback dispatch to a service stack.
///
/// # Example
///
/// ```rust,ignore
/// use signon_tenant::{CookieSchemeAuthenticator, DispatchConfig, DispatchLayer};
/// use axum::Router;
/// use std::sync::Arc;
///
/// let config = DispatchConfig::builder()
///     .route("army", "ArmyCookieScheme")
///     .authenticator(
///         "ArmyCookieScheme",
///         Arc::new(CookieSchemeAuthenticator::new("ArmyCookieScheme")),
///     )
///     .build()?;
///
/// let app = Router::new()
///     .route("/api/weatherforecast", get(forecast))
///     .layer(DispatchLayer::new(config));
/// ```
#[derive(Debug, Clone)]
pub struct DispatchLayer {
    config: Arc<DispatchConfig>,
}

impl DispatchLayer {
    /// Create a new layer from a dispatch configuration.
    #[must_use]
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }
}

impl<S> Layer<S> for DispatchLayer {
    type Service = DispatchService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        DispatchService::new(inner, Arc::clone(&self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::CookieSchemeAuthenticator;

    fn config() -> DispatchConfig {
        DispatchConfig::builder()
            .route("army", "ArmyCookieScheme")
            .authenticator(
                "ArmyCookieScheme",
                Arc::new(CookieSchemeAuthenticator::new("ArmyCookieScheme")),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_layer_exposes_config() {
        let layer = DispatchLayer::new(config());
        assert_eq!(layer.config().callback_path(), "/signin-oidc");
    }

    #[test]
    fn test_layer_clone_shares_config() {
        let layer = DispatchLayer::new(config());
        let cloned = layer.clone();
        assert_eq!(
            layer.config().callback_path(),
            cloned.config().callback_path()
        );
    }
}
