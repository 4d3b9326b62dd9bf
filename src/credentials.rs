//! The locally saved API key.
//!
//! One JSON file, `~/.job_search/config.json`, holding `{"api_key": "..."}`.
//! The store is an explicit value so callers and tests choose the path.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

const CONFIG_DIR: &str = ".job_search";
const CONFIG_FILE: &str = "config.json";

/// An API key. Never printed by `Debug`, wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(Zeroizing<String>);

impl ApiKey {
    /// Trims the input; blank keys are rejected.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = Zeroizing::new(raw.into());
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(Zeroizing::new(trimmed.to_string())))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[derive(Serialize)]
struct StoredKey<'a> {
    api_key: &'a str,
}

#[derive(Deserialize)]
struct StoredKeyOwned {
    api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.job_search/config.json` for the current user.
    pub fn default_location() -> Result<Self> {
        let dirs = directories::BaseDirs::new()
            .ok_or_else(|| Error::config("could not determine the home directory"))?;
        Ok(Self::new(dirs.home_dir().join(CONFIG_DIR).join(CONFIG_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `None` when nothing usable is saved. A missing or malformed
    /// file is not an error; an unreadable one is.
    pub fn load(&self) -> Result<Option<ApiKey>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => Zeroizing::new(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved API key");
                return Ok(None);
            }
            Err(e) => return Err(Error::config_io(&self.path, e)),
        };

        match serde_json::from_str::<StoredKeyOwned>(&content) {
            Ok(stored) => Ok(stored.api_key.and_then(ApiKey::new)),
            Err(e) => {
                warn!(path = %self.path.display(), "ignoring malformed config file: {e}");
                Ok(None)
            }
        }
    }

    /// Writes the key, replacing any previous one. The file is readable and
    /// writable by the owner only.
    pub fn save(&self, key: &ApiKey) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Error::config_io(parent, e))?;
        }

        let body = Zeroizing::new(
            serde_json::to_string(&StoredKey {
                api_key: key.expose(),
            })
            .map_err(|e| Error::parse(format!("serialize config: {e}")))?,
        );

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.path)
            .map_err(|e| Error::config_io(&self.path, e))?;
        restrict_to_owner(&file).map_err(|e| Error::config_io(&self.path, e))?;
        file.write_all(body.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| Error::config_io(&self.path, e))?;

        info!(path = %self.path.display(), "saved API key");
        Ok(())
    }

    /// Deletes the saved key. Returns whether there was one.
    pub fn remove(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "removed API key");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::config_io(&self.path, e)),
        }
    }
}

// `mode()` only applies when the file is created, so tighten existing files too.
#[cfg(unix)]
fn restrict_to_owner(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_to_owner(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, CredentialStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join(CONFIG_DIR).join(CONFIG_FILE));
        (dir, store)
    }

    #[test]
    fn api_key_rejects_blank() {
        assert!(ApiKey::new("").is_none());
        assert!(ApiKey::new("   \n").is_none());
        assert_eq!(ApiKey::new("  sk-1 ").unwrap().expose(), "sk-1");
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("sk-very-secret").unwrap();
        assert!(!format!("{key:?}").contains("sk-very-secret"));
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = temp_store();
        store.save(&ApiKey::new("sk-test-123").unwrap()).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.expose(), "sk-test-123");
    }

    #[test]
    fn save_overwrites_previous_key() {
        let (_dir, store) = temp_store();
        store.save(&ApiKey::new("first").unwrap()).unwrap();
        store.save(&ApiKey::new("second").unwrap()).unwrap();
        assert_eq!(store.load().unwrap().unwrap().expose(), "second");
    }

    #[test]
    fn save_writes_api_key_field() {
        let (_dir, store) = temp_store();
        store.save(&ApiKey::new("sk-abc").unwrap()).unwrap();
        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["api_key"], "sk-abc");
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, store) = temp_store();
        store.save(&ApiKey::new("sk-abc").unwrap()).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn overwrite_tightens_loose_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{}").unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

        store.save(&ApiKey::new("sk-abc").unwrap()).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn missing_file_loads_as_absent() {
        let (_dir, store) = temp_store();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn malformed_file_loads_as_absent() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();

        fs::write(store.path(), "not json").unwrap();
        assert!(store.load().unwrap().is_none());

        fs::write(store.path(), r#"{"other": 1}"#).unwrap();
        assert!(store.load().unwrap().is_none());

        fs::write(store.path(), r#"{"api_key": ""}"#).unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn remove_deletes_saved_key() {
        let (_dir, store) = temp_store();
        store.save(&ApiKey::new("sk-abc").unwrap()).unwrap();
        assert!(store.remove().unwrap());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn remove_when_absent_is_a_no_op() {
        let (_dir, store) = temp_store();
        assert!(!store.remove().unwrap());
        assert!(!store.remove().unwrap());
        assert!(store.load().unwrap().is_none());
    }
}
