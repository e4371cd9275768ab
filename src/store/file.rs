use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CredentialStore;
use crate::session::AuthError;

const STATE_FILE_VERSION: u32 = 1;

/// Configuration for file-backed credential storage.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn default_dir() -> PathBuf {
        default_kiosk_dir()
    }
}

/// File-backed credential store keeping a single versioned TOML document.
///
/// The file is read once at construction; `get` serves from memory while
/// `put`/`remove` rewrite the document so each call is durable on return.
/// A missing file reads as an empty store.
///
/// # Example
/// ```no_run
/// use kiosk::store::{CredentialStore, FileCredentialStore, StoreConfig, keys};
///
/// let store = FileCredentialStore::open(StoreConfig::new(std::path::PathBuf::from("/tmp")))?;
/// store.put(keys::IDENTITY, "user@example.org")?;
/// assert!(store.get(keys::IDENTITY).is_some());
/// # Ok::<(), kiosk::session::AuthError>(())
/// ```
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileCredentialStore {
    /// Open (or create lazily) the store under `config.base_dir`.
    pub fn open(config: StoreConfig) -> Result<Self, AuthError> {
        let path = config.base_dir.join("session.toml");
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => {
                let file: StateFile = toml::from_str(&raw)
                    .map_err(|err| AuthError::Storage(format!("{}: {err}", path.display())))?;
                if file.version != STATE_FILE_VERSION {
                    return Err(AuthError::Storage(format!(
                        "unsupported state file version {} at {}",
                        file.version,
                        path.display()
                    )));
                }
                file.entries
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(AuthError::Storage(err.to_string())),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Open the store at the default location (`~/.kiosk`).
    pub fn open_default() -> Result<Self, AuthError> {
        Self::open(StoreConfig::new(default_kiosk_dir()))
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| AuthError::Storage(err.to_string()))?;
        }
        let file = StateFile {
            version: STATE_FILE_VERSION,
            saved_at: Utc::now(),
            entries: entries.clone(),
        };
        let serialized = toml::to_string(&file)
            .map_err(|err| AuthError::Storage(err.to_string()))?;
        fs::write(&self.path, serialized).map_err(|err| AuthError::Storage(err.to_string()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|err| AuthError::Storage(err.to_string()))?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("store lock poisoned")
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, value: &str) -> Result<(), AuthError> {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    version: u32,
    saved_at: DateTime<Utc>,
    entries: BTreeMap<String, String>,
}

fn default_kiosk_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".kiosk"))
        .unwrap_or_else(|| PathBuf::from(".kiosk"))
}
