//! Client-side session lifecycle for the signon platform.
//!
//! Owns the bearer token from login callback to logout: a [`SessionStore`]
//! mirrored into durable [`storage`], a [`RefreshScheduler`] that renews the
//! token ahead of expiry, and the [`LoginInitiator`] / [`CallbackHandler`]
//! pair that drive the interactive round trip to the identity provider.
//!
//! ```
//! use signon_session::{ClientConfig, IdentitySource};
//!
//! let config = ClientConfig::builder()
//!     .authority("https://localhost:7274")
//!     .client_id("new-client-id")
//!     .redirect_uri("http://localhost:3000/auth/callback")
//!     .identity_sources(vec![IdentitySource::Army, IdentitySource::Edu])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.authority.as_str(), "https://localhost:7274/");
//! ```

mod config;
mod error;
mod login;
mod refresh;
mod storage;
mod store;

pub use config::{ClientConfig, ClientConfigBuilder, IdentitySource};
pub use error::SessionError;
pub use login::{CallbackHandler, LoginInitiator, Navigator};
pub use refresh::{
    renewal_delay, HttpTokenRefresher, RefreshScheduler, TokenRefresher, SAFETY_MARGIN,
};
pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage, STORAGE_KEY};
pub use store::{SessionHandle, SessionStore};
