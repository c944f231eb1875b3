// ── Session ──
//
// The bearer credential lives in two places: memory (read before every
// guarded submission) and a durable store that survives restarts. Both
// copies change together, durable first, under one lock.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::CoreError;

/// Fixed key the credential is persisted under.
pub const CREDENTIAL_KEY: &str = "maspatas_token";

/// Durable client-local storage for the credential.
///
/// Implementations must make `save` and `clear` atomic: after a failed call
/// the previously stored value is still what `load` returns.
pub trait CredentialStore: Send + Sync + fmt::Debug {
    fn load(&self) -> Result<Option<SecretString>, CoreError>;
    fn save(&self, credential: &SecretString) -> Result<(), CoreError>;
    fn clear(&self) -> Result<(), CoreError>;
}

/// Process-local store. Forgets everything on exit.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    value: Mutex<Option<SecretString>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: &str) -> Self {
        Self {
            value: Mutex::new(Some(SecretString::from(credential.to_owned()))),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        Ok(self
            .value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, credential: &SecretString) -> Result<(), CoreError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// A credential is usable when it is non-blank.
fn is_valid_looking(credential: &SecretString) -> bool {
    !credential.expose_secret().trim().is_empty()
}

/// The single owned credential value.
pub struct Session {
    credential: Mutex<Option<SecretString>>,
    store: Arc<dyn CredentialStore>,
    authenticated: watch::Sender<bool>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("store", &self.store)
            .finish()
    }
}

impl Session {
    /// Start a session from whatever the store holds.
    ///
    /// An unreadable store is logged and treated as signed out.
    pub fn restore(store: Arc<dyn CredentialStore>) -> Self {
        let credential = match store.load() {
            Ok(credential) => credential.filter(is_valid_looking),
            Err(e) => {
                warn!(error = %e, "stored credential could not be read");
                None
            }
        };
        let (authenticated, _) = watch::channel(credential.is_some());
        Self {
            credential: Mutex::new(credential),
            store,
            authenticated,
        }
    }

    /// The credential, if one that looks usable is held.
    pub fn credential(&self) -> Option<SecretString> {
        self.credential
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        *self.authenticated.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.authenticated.subscribe()
    }

    /// Replace the credential. The durable copy is written first; memory is
    /// only updated if that succeeds.
    pub fn set(&self, credential: SecretString) -> Result<(), CoreError> {
        if !is_valid_looking(&credential) {
            return Err(CoreError::validation("credential", "must not be blank"));
        }
        let mut held = self.credential.lock().unwrap_or_else(PoisonError::into_inner);
        self.store.save(&credential)?;
        *held = Some(credential);
        self.authenticated.send_replace(true);
        info!("session started");
        Ok(())
    }

    /// Forget the credential, durable copy first.
    pub fn clear(&self) -> Result<(), CoreError> {
        let mut held = self.credential.lock().unwrap_or_else(PoisonError::into_inner);
        self.store.clear()?;
        *held = None;
        self.authenticated.send_replace(false);
        info!("session closed");
        Ok(())
    }
}
