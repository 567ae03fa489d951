//! # Credential Store
//!
//! Key/value storage for the credential token. The token lives under the
//! key [`TOKEN_KEY`] and is read synchronously whenever a request needs it;
//! nothing else in the client caches it.
//!
//! `FileCredentialStore` persists to `~/.roadtrip/credentials.json` using an
//! atomic write (`.tmp` + rename). `MemoryCredentialStore` backs tests and
//! runs started with `--token`, which must not touch the persisted token.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, warn};

/// Key the credential token is stored under.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug)]
pub enum CredentialError {
    Io(io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::Io(e) => write!(f, "credential store I/O error: {e}"),
            CredentialError::Serialize(e) => write!(f, "credential store format error: {e}"),
        }
    }
}

impl std::error::Error for CredentialError {}

pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), CredentialError>;
    fn remove(&self, key: &str) -> Result<(), CredentialError>;
}

/// In-process store. Contents vanish with the process.
#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(TOKEN_KEY.to_string(), token.to_string());
        }
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CredentialError> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
        Ok(())
    }
}

/// JSON-file store. Every `get` re-reads the file so external edits
/// (e.g. `roadtrip logout` from another terminal) are observed.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `~/.roadtrip/credentials.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".roadtrip").join("credentials.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> HashMap<String, String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                warn!("Failed to read {}: {}", self.path.display(), e);
                return HashMap::new();
            }
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!("Ignoring malformed {}: {}", self.path.display(), e);
            HashMap::new()
        })
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(CredentialError::Io)?;
        }
        let tmp_path = self.path.with_extension("tmp");
        let json = serde_json::to_string_pretty(entries).map_err(CredentialError::Serialize)?;
        fs::write(&tmp_path, json).map_err(CredentialError::Io)?;
        fs::rename(&tmp_path, &self.path).map_err(CredentialError::Io)?;
        debug!("Wrote {} credential entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        let mut entries = self.read_all();
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), CredentialError> {
        let mut entries = self.read_all();
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(&entries)
    }
}
