use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;

use super::error::ClientError;

/// Where the session token survives between runs.
pub trait TokenStorage {
    fn load(&self) -> Result<Option<String>, ClientError>;
    fn save(&self, token: &str) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

/// Token kept in a single file, by default under the user's config directory.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/taskmgr/token`, if the platform has a config directory.
    pub fn default_location() -> Option<Self> {
        ProjectDirs::from("", "", "taskmgr").map(|dirs| Self::new(dirs.config_dir().join("token")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>, ClientError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &str) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<String>, ClientError> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> Result<(), ClientError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.slot() = None;
        Ok(())
    }
}

/// The client's current token, mirrored to its storage.
///
/// No expiry check happens here; an expired token is only noticed when the server
/// rejects it.
#[derive(Debug)]
pub struct Session<S: TokenStorage> {
    storage: S,
    token: Option<String>,
}

impl<S: TokenStorage> Session<S> {
    /// Starts a session from whatever token the storage already holds.
    pub fn load(storage: S) -> Result<Self, ClientError> {
        let token = storage.load()?;
        Ok(Self { storage, token })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn login(&mut self, token: impl Into<String>) -> Result<(), ClientError> {
        let token = token.into();
        self.storage.save(&token)?;
        self.token = Some(token);
        Ok(())
    }

    /// Forgets the token. The in-memory state is reset even if clearing storage fails.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.token = None;
        self.storage.clear()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
