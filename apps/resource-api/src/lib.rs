//! Protected resource server.
//!
//! Serves tenant-protected resources behind bearer token validation, and
//! hosts the shared SSO callback endpoint that dispatches to per-tenant
//! authentication schemes.

pub mod config;
pub mod logging;
pub mod middleware;
pub mod routes;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use config::{Config, ConfigError};
use signon_auth::{BearerValidator, ValidationConfig, ValidatorKey};
use signon_tenant::DispatchLayer;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Build-time failures assembling the router.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The bearer validator rejected the configured key.
    #[error("Invalid token validation setup: {0}")]
    Validator(#[from] signon_auth::AuthError),

    /// A CORS origin is not a valid header value.
    #[error("Invalid CORS origin: {0}")]
    CorsOrigin(String),
}

/// Assemble the full router: protected routes behind bearer auth, wrapped
/// by the tenant callback dispatcher and CORS.
///
/// # Errors
///
/// Returns an error if the validator key, tenant routes or CORS origins are
/// invalid.
pub fn build_router(config: &Config) -> Result<Router, AppError> {
    let validator = BearerValidator::new(
        &ValidatorKey::Hmac(config.jwt_signing_key.clone().into_bytes()),
        &ValidationConfig::new(&config.issuer, &config.audience)
            .with_leeway(config.clock_skew_secs),
    )?;

    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::CorsOrigin(origin.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
        .allow_credentials(true);

    let protected = Router::new()
        .route("/api/weatherforecast", get(routes::weather_forecast))
        .layer(axum::middleware::from_fn_with_state(
            Arc::new(validator),
            middleware::bearer_auth,
        ));

    let router = Router::new()
        .merge(protected)
        .layer(DispatchLayer::new(config.dispatch_config()?))
        .layer(cors);

    Ok(router)
}
