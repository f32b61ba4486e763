//! # signon-tenant
//!
//! Tower middleware that demultiplexes a single physical SSO callback
//! endpoint to N logically distinct tenant authentication schemes.
//!
//! The identity provider redirects every tenant's login back to the same
//! callback path (`/signin-oidc`) with a `state` parameter of the form
//! `<tenant-prefix>-<opaque-correlator>`. This middleware matches the prefix
//! against a static, ordered route table, authenticates the request under the
//! matched tenant's scheme, and on success redirects to the client redirect
//! URI stashed when the flow began. All other outcomes fall through to the
//! inner service unchanged.
//!
//! The `state` value is client-supplied and unauthenticated: it is a routing
//! hint only. The trust decision is the scheme-specific authentication step.
//!
//! ## Quick Start
//!
//! ```rust
//! use signon_tenant::{CookieSchemeAuthenticator, DispatchConfig, DispatchLayer};
//! use std::sync::Arc;
//!
//! let config = DispatchConfig::builder()
//!     .route("army", "ArmyCookieScheme")
//!     .route("edu", "EduCookieScheme")
//!     .authenticator(
//!         "ArmyCookieScheme",
//!         Arc::new(CookieSchemeAuthenticator::new("ArmyCookieScheme")),
//!     )
//!     .authenticator(
//!         "EduCookieScheme",
//!         Arc::new(CookieSchemeAuthenticator::new("EduCookieScheme")),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let layer = DispatchLayer::new(config);
//! ```

mod config;
mod error;
mod layer;
mod scheme;
mod service;

pub use config::{
    DispatchConfig, DispatchConfigBuilder, TenantRoute, TenantRouteTable, DEFAULT_CALLBACK_PATH,
};
pub use error::DispatchError;
pub use layer::DispatchLayer;
pub use scheme::{
    AuthProperties, CookieSchemeAuthenticator, SchemeAuthenticator, REDIRECT_URI_PROPERTY,
};
pub use service::{DispatchService, DispatchServiceFuture};
