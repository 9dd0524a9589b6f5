//! Session store: the single owner of the bearer token.
//!
//! The token lives in one persisted slot behind [`TokenStorage`]. Gateway
//! clients and the route guard hold an `Arc<SessionStore>` and read through
//! it; interested parties subscribe to changes with [`SessionStore::subscribe`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::{HelmError, Result};

/// Persisted slot holding at most one token.
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn store(&self, token: &str) -> Result<()>;
    fn erase(&self) -> Result<()>;
}

/// Token kept in a single file; survives process restarts.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        Ok(())
    }

    fn erase(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process slot for tests and throwaway runs.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        Ok(self
            .slot
            .lock()
            .map_err(|_| HelmError::Storage("token slot poisoned".to_string()))?
            .clone())
    }

    fn store(&self, token: &str) -> Result<()> {
        *self
            .slot
            .lock()
            .map_err(|_| HelmError::Storage("token slot poisoned".to_string()))? =
            Some(token.to_string());
        Ok(())
    }

    fn erase(&self) -> Result<()> {
        *self
            .slot
            .lock()
            .map_err(|_| HelmError::Storage("token slot poisoned".to_string()))? = None;
        Ok(())
    }
}

pub struct SessionStore {
    storage: Box<dyn TokenStorage>,
    current: watch::Sender<Option<String>>,
}

impl SessionStore {
    /// Open the store, loading whatever token the slot already holds.
    pub fn open(storage: impl TokenStorage + 'static) -> Result<Arc<Self>> {
        let initial = storage.load()?;
        debug!(present = initial.is_some(), "Session loaded");
        let (current, _) = watch::channel(initial);
        Ok(Arc::new(Self {
            storage: Box::new(storage),
            current,
        }))
    }

    pub fn in_memory() -> Arc<Self> {
        let (current, _) = watch::channel(None);
        Arc::new(Self {
            storage: Box::new(MemoryTokenStorage::new()),
            current,
        })
    }

    pub fn token(&self) -> Option<String> {
        self.current.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    pub fn set_token(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        self.storage.store(&token)?;
        self.current.send_replace(Some(token));
        info!("Session established");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.storage.erase()?;
        self.current.send_replace(None);
        info!("Session cleared");
        Ok(())
    }

    /// Receive every token change from now on.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.current.subscribe()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_roundtrip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session");

        let store = SessionStore::open(FileTokenStorage::new(&path)).unwrap();
        assert!(store.token().is_none());
        store.set_token("t1").unwrap();
        drop(store);

        let reopened = SessionStore::open(FileTokenStorage::new(&path)).unwrap();
        assert_eq!(reopened.token().as_deref(), Some("t1"));
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");
        let store = SessionStore::open(FileTokenStorage::new(&path)).unwrap();

        store.set_token("t1").unwrap();
        assert!(path.exists());
        store.clear().unwrap();
        assert!(!path.exists());
        assert!(!store.is_authenticated());

        // clearing an absent slot is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_empty_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");
        fs::write(&path, "  \n").unwrap();

        let store = SessionStore::open(FileTokenStorage::new(&path)).unwrap();
        assert!(store.token().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_observe_changes() {
        let store = SessionStore::in_memory();
        let mut rx = store.subscribe();

        store.set_token("abc").unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_deref(), Some("abc"));

        store.clear().unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_none());
    }
}
