//! The session store: current token plus durable mirroring.

use crate::storage::TokenStorage;
use std::sync::{Arc, Mutex, MutexGuard};

/// Holds the current bearer token and mirrors every mutation to durable
/// storage.
///
/// Invariant: `is_logged_in() == token().is_some()`. The durable mirror is
/// written unconditionally on every [`SessionStore::set_token`] call so that
/// a restart restores the last known session via [`SessionStore::restore`].
#[derive(Debug)]
pub struct SessionStore {
    token: Option<String>,
    storage: Arc<dyn TokenStorage>,
}

impl SessionStore {
    /// Create an empty store backed by the given durable storage.
    #[must_use]
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self {
            token: None,
            storage,
        }
    }

    /// The current in-memory token.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Update the token and mirror the change to durable storage.
    ///
    /// Presence writes the value under the fixed key; absence deletes the
    /// key. Storage failures are logged and do not fail the mutation: the
    /// in-memory session stays authoritative for this process lifetime.
    pub fn set_token(&mut self, token: Option<String>) {
        let result = match &token {
            Some(value) => self.storage.store(value),
            None => self.storage.clear(),
        };
        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to mirror session token to durable storage");
        }
        self.token = token;
    }

    /// Adopt a persisted token, if any. Run once at startup; the token is
    /// revalidated by its first use.
    pub fn restore(&mut self) {
        match self.storage.load() {
            Ok(Some(token)) => {
                tracing::debug!("restored session token from durable storage");
                self.token = Some(token);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "failed to read durable token storage");
            }
        }
    }

    /// Whether a session token is present.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Pretty-printed decoded claims for diagnostic display, or `None` when
    /// there is no token or it cannot be decoded. Never panics.
    #[must_use]
    pub fn decode_claims(&self) -> Option<String> {
        signon_auth::pretty_claims(self.token.as_deref()?)
    }
}

/// Shared handle to the session store.
///
/// The session context object handed to every component that needs it; all
/// mutation goes through its methods.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionStore>>,
}

impl SessionHandle {
    /// Create a new session backed by the given durable storage.
    #[must_use]
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionStore::new(storage))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionStore> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The current token, cloned.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.lock().token().map(ToString::to_string)
    }

    /// See [`SessionStore::set_token`].
    pub fn set_token(&self, token: Option<String>) {
        self.lock().set_token(token);
    }

    /// See [`SessionStore::restore`].
    pub fn restore(&self) {
        self.lock().restore();
    }

    /// See [`SessionStore::is_logged_in`].
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.lock().is_logged_in()
    }

    /// See [`SessionStore::decode_claims`].
    #[must_use]
    pub fn decode_claims(&self) -> Option<String> {
        self.lock().decode_claims()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryTokenStorage, TokenStorage};
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    fn session() -> (SessionHandle, Arc<MemoryTokenStorage>) {
        let storage = Arc::new(MemoryTokenStorage::new());
        (SessionHandle::new(storage.clone()), storage)
    }

    #[test]
    fn test_login_state_follows_token() {
        let (session, _) = session();
        assert!(!session.is_logged_in());

        session.set_token(Some("abc.def.ghi".to_string()));
        assert!(session.is_logged_in());
        assert_eq!(session.token(), Some("abc.def.ghi".to_string()));

        session.set_token(None);
        assert!(!session.is_logged_in());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_every_mutation_mirrors_to_storage() {
        let (session, storage) = session();

        session.set_token(Some("first".to_string()));
        assert_eq!(storage.load().unwrap(), Some("first".to_string()));

        session.set_token(Some("second".to_string()));
        assert_eq!(storage.load().unwrap(), Some("second".to_string()));

        session.set_token(None);
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn test_restore_adopts_persisted_token() {
        let storage = Arc::new(MemoryTokenStorage::new());
        storage.store("persisted.tok.en").unwrap();

        let session = SessionHandle::new(storage);
        assert!(!session.is_logged_in());

        session.restore();
        assert!(session.is_logged_in());
        assert_eq!(session.token(), Some("persisted.tok.en".to_string()));
    }

    #[test]
    fn test_restore_with_empty_storage_is_noop() {
        let (session, _) = session();
        session.restore();
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_decode_claims_pretty_prints() {
        let (session, _) = session();
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"user-123","exp":4102444800}"#);
        session.set_token(Some(format!("hdr.{payload}.sig")));

        let pretty = session.decode_claims().unwrap();
        assert!(pretty.contains("user-123"));
        assert!(pretty.contains("4102444800"));
    }

    #[test]
    fn test_decode_claims_swallows_failures() {
        let (session, _) = session();
        assert_eq!(session.decode_claims(), None);

        session.set_token(Some("not-a-token".to_string()));
        assert_eq!(session.decode_claims(), None);
        // the broken token itself is untouched
        assert!(session.is_logged_in());
    }
}
