// Persistent bearer-token storage
//
// The auth service is the only writer; the API client reads the token on
// every outgoing request. Backends are pluggable so the CLI can use a file
// or the OS keyring while tests run entirely in memory.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};

use crate::error::Error;

/// Storage key under which the session token is persisted.
pub const TOKEN_KEY: &str = "token";

/// Where the session token lives between runs.
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// Read the stored token, `None` if nothing is stored.
    fn load(&self) -> Result<Option<SecretString>, Error>;

    /// Persist a token, replacing any previous value.
    fn store(&self, token: &SecretString) -> Result<(), Error>;

    /// Remove the stored token. Removing a missing token is not an error.
    fn clear(&self) -> Result<(), Error>;
}

// ── In-memory ────────────────────────────────────────────────────────

/// Process-local token store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a token already present (simulates a previous session).
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(SecretString::from(token.into()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SecretString>, Error> {
        let guard = self
            .token
            .read()
            .map_err(|_| Error::TokenStore("token lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn store(&self, token: &SecretString) -> Result<(), Error> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| Error::TokenStore("token lock poisoned".into()))?;
        *guard = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| Error::TokenStore("token lock poisoned".into()))?;
        *guard = None;
        Ok(())
    }
}

// ── File-backed ──────────────────────────────────────────────────────

/// Stores the token as a single file named `token` inside a directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Token file `<dir>/token`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(TOKEN_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SecretString>, Error> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    trace!(path = %self.path.display(), "loaded stored token");
                    Ok(Some(SecretString::from(token.to_owned())))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::TokenStore(format!(
                "failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    fn store(&self, token: &SecretString) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::TokenStore(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        std::fs::write(&self.path, token.expose_secret()).map_err(|e| {
            Error::TokenStore(format!("failed to write {}: {e}", self.path.display()))
        })?;
        restrict_permissions(&self.path)?;
        debug!(path = %self.path.display(), "token persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "token removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::TokenStore(format!(
                "failed to remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), Error> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| Error::TokenStore(format!("failed to chmod {}: {e}", path.display())))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn restrict_permissions(_path: &Path) -> Result<(), Error> {
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip_and_clear() {
        let store = MemoryTokenStore::new();
        assert!(store.load().unwrap().is_none());

        store.store(&SecretString::from("abc".to_string())).unwrap();
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "abc");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_store_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::in_dir(dir.path());
        assert!(store.load().unwrap().is_none());
        // Clearing a token that was never written is fine.
        store.clear().unwrap();
    }

    #[test]
    fn file_store_persists_under_token_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::in_dir(dir.path().join("nested"));
        store.store(&SecretString::from("t-123".to_string())).unwrap();

        assert!(store.path().ends_with(TOKEN_KEY));
        let reopened = FileTokenStore::in_dir(dir.path().join("nested"));
        assert_eq!(reopened.load().unwrap().unwrap().expose_secret(), "t-123");

        reopened.clear().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn file_store_blank_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::in_dir(dir.path());
        std::fs::write(store.path(), "  \n").unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
