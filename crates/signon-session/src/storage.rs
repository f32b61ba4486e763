//! Durable token storage.
//!
//! The session mirrors its token into a durable key-value slot so a process
//! restart can restore the last known session. One fixed key holds the raw
//! token string; absence of the key means logged-out.

use crate::error::SessionError;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

/// Fixed storage key under which the current raw token is kept.
pub const STORAGE_KEY: &str = "jwt";

/// Durable storage for the session token.
pub trait TokenStorage: std::fmt::Debug + Send + Sync {
    /// Read the persisted token, if any.
    fn load(&self) -> Result<Option<String>, SessionError>;

    /// Persist the token under the fixed key.
    fn store(&self, token: &str) -> Result<(), SessionError>;

    /// Delete the persisted token. Must be a no-op when nothing is stored.
    fn clear(&self) -> Result<(), SessionError>;
}

/// File-backed storage: one file named after the fixed key inside a
/// directory, holding the raw token string.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Create storage rooted at the given directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(STORAGE_KEY),
        }
    }

    /// The file holding the token.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(token) => {
                let token = token.trim().to_string();
                Ok((!token.is_empty()).then_some(token))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::Storage(e.to_string())),
        }
    }

    fn store(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SessionError::Storage(e.to_string()))?;
        }
        fs::write(&self.path, token).map_err(|e| SessionError::Storage(e.to_string()))
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Storage(e.to_string())),
        }
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<String>, SessionError> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        Ok(slot.clone())
    }

    fn store(&self, token: &str) -> Result<(), SessionError> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryTokenStorage::new();
        assert_eq!(storage.load().unwrap(), None);

        storage.store("abc.def.ghi").unwrap();
        assert_eq!(storage.load().unwrap(), Some("abc.def.ghi".to_string()));

        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn test_memory_storage_clear_is_idempotent() {
        let storage = MemoryTokenStorage::new();
        storage.clear().unwrap();
        storage.clear().unwrap();
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path());

        assert_eq!(storage.load().unwrap(), None);

        storage.store("abc.def.ghi").unwrap();
        assert_eq!(storage.load().unwrap(), Some("abc.def.ghi".to_string()));

        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_file_storage_clear_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path());
        storage.clear().unwrap();
    }

    #[test]
    fn test_file_storage_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path().join("nested"));

        storage.store("tok").unwrap();
        assert_eq!(storage.load().unwrap(), Some("tok".to_string()));
    }
}
