//! Session token storage.
//!
//! The token is the only state that survives a restart. Storage is opaque to
//! the rest of the crate: anything that can get, save and clear a string
//! implements [`CredentialStore`].

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File name of the token inside the data directory.
pub const TOKEN_FILENAME: &str = "token";

/// Get/save/clear access to the session token.
pub trait CredentialStore {
    fn get(&self) -> Result<Option<String>, CredentialError>;
    fn save(&self, token: &str) -> Result<(), CredentialError>;
    fn clear(&self) -> Result<(), CredentialError>;
}

/// Errors from a credential store.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("I/O error for {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] io::Error),
}

/// Keeps the token in memory only.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<String>, CredentialError> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, token: &str) -> Result<(), CredentialError> {
        *self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        *self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}

/// Stores the token in a file under the data directory.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    data_dir: PathBuf,
}

impl FileCredentialStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the full path of the token file.
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(TOKEN_FILENAME)
    }
}

impl CredentialStore for FileCredentialStore {
    /// Returns `Ok(None)` if no token has been saved.
    fn get(&self) -> Result<Option<String>, CredentialError> {
        let path = self.path();
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CredentialError::Io(path, e)),
        }
    }

    /// Creates the data directory if it doesn't exist.
    fn save(&self, token: &str) -> Result<(), CredentialError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| CredentialError::Io(self.data_dir.clone(), e))?;

        let path = self.path();
        let mut file = open_private(&path).map_err(|e| CredentialError::Io(path.clone(), e))?;
        // A file left by an older version keeps its mode on open.
        restrict_permissions(&path)?;
        file.write_all(token.as_bytes()).map_err(|e| CredentialError::Io(path.clone(), e))?;

        tracing::debug!(path = %path.display(), "Saved session token");
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        let path = self.path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CredentialError::Io(path, e)),
        }
    }
}

/// Opens the token file for writing, created owner-only on unix.
fn open_private(path: &Path) -> io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), CredentialError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(|e| CredentialError::Io(path.to_path_buf(), e))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), CredentialError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (FileCredentialStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    #[test]
    fn test_get_without_token_returns_none() {
        let (store, _temp) = test_store();
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn test_save_and_get() {
        let (store, _temp) = test_store();
        store.save("secret-token").unwrap();

        assert_eq!(store.get().unwrap(), Some("secret-token".to_string()));
        assert!(store.path().ends_with(TOKEN_FILENAME));
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("data");
        let store = FileCredentialStore::new(nested.clone());

        store.save("abc").unwrap();

        assert!(nested.exists());
        assert_eq!(store.get().unwrap().as_deref(), Some("abc"));
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _temp) = test_store();
        store.save("abc").unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        // An existing world-readable file is tightened and overwritten.
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();
        store.save("longer-token").unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.get().unwrap().as_deref(), Some("longer-token"));
    }

    #[test]
    fn test_clear_removes_token() {
        let (store, _temp) = test_store();
        store.save("abc").unwrap();
        store.clear().unwrap();

        assert!(store.get().unwrap().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryCredentialStore::new();
        assert!(store.get().unwrap().is_none());

        store.save("one").unwrap();
        store.save("two").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("two"));

        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());
        assert_eq!(
            MemoryCredentialStore::with_token("x").get().unwrap().as_deref(),
            Some("x")
        );
    }
}
