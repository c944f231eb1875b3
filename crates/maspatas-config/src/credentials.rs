// Durable credential stores
//
// Both stores keep the token under the fixed `maspatas_token` key: as the
// file name in the data directory, or as the keyring user.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use maspatas_core::{CREDENTIAL_KEY, CoreError, CredentialStore};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::ConfigError;

const KEYRING_SERVICE: &str = "maspatas";

fn store_error(context: &str, err: impl std::fmt::Display) -> CoreError {
    CoreError::CredentialStore {
        message: format!("{context}: {err}"),
    }
}

// ── File ────────────────────────────────────────────────────────────

/// Token kept in a single file, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<data dir>/maspatas_token`.
    pub fn default_path() -> PathBuf {
        crate::data_dir().join(CREDENTIAL_KEY)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| SecretString::from(token.to_owned())))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(store_error(&format!("reading {}", self.path.display()), e)),
        }
    }

    fn save(&self, credential: &SecretString) -> Result<(), CoreError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|e| store_error("creating credential directory", e))?;

        // Write beside the target and rename over it, so a crash never
        // leaves a half-written token behind.
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| store_error("creating temporary credential file", e))?;
        tmp.write_all(credential.expose_secret().as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| store_error("writing credential", e))?;
        tmp.persist(&self.path)
            .map_err(|e| store_error(&format!("replacing {}", self.path.display()), e.error))?;

        debug!(path = %self.path.display(), "credential saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "credential removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(store_error(&format!("removing {}", self.path.display()), e)),
        }
    }
}

// ── Keyring ─────────────────────────────────────────────────────────

/// Token kept in the OS keyring (service `maspatas`, user `maspatas_token`).
#[derive(Debug)]
pub struct KeyringCredentialStore {
    entry: keyring::Entry,
}

impl KeyringCredentialStore {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            entry: keyring::Entry::new(KEYRING_SERVICE, CREDENTIAL_KEY)?,
        })
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        match self.entry.get_password() {
            Ok(token) => Ok(Some(SecretString::from(token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(store_error("reading keyring", e)),
        }
    }

    fn save(&self, credential: &SecretString) -> Result<(), CoreError> {
        self.entry
            .set_password(credential.expose_secret())
            .map_err(|e| store_error("writing keyring", e))
    }

    fn clear(&self) -> Result<(), CoreError> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(store_error("clearing keyring", e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch() -> (tempfile::TempDir, FileCredentialStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("state").join(CREDENTIAL_KEY));
        (dir, store)
    }

    #[test]
    fn missing_file_means_no_credential() {
        let (_dir, store) = scratch();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn save_load_clear() {
        let (_dir, store) = scratch();
        store.save(&SecretString::from("tok-1".to_owned())).unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "tok-1");
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "tok-1");

        store.save(&SecretString::from("tok-2".to_owned())).unwrap();
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "tok-2");

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn whitespace_only_file_is_empty() {
        let (_dir, store) = scratch();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "  \n").unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn credential_survives_a_new_store_instance() {
        let (_dir, store) = scratch();
        store.save(&SecretString::from("tok-3".to_owned())).unwrap();

        let reopened = FileCredentialStore::new(store.path().to_path_buf());
        assert_eq!(reopened.load().unwrap().unwrap().expose_secret(), "tok-3");
    }
}
