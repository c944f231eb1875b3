//! Shared configuration for the MasPatas CLI and TUI.
//!
//! TOML settings layered under `MASPATAS_*` environment variables, the
//! durable credential stores, and translation to
//! `maspatas_core::DashboardConfig`. Both binaries depend on this crate;
//! the CLI adds flag overrides on top.

pub mod credentials;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use maspatas_core::{CredentialStore, DashboardConfig, TlsVerification};

pub use credentials::{FileCredentialStore, KeyringCredentialStore};

/// Prefix for every environment override (`MASPATAS_API_URL`, ...).
pub const ENV_PREFIX: &str = "MASPATAS_";

/// Environment variable consulted for the login password.
pub const PASSWORD_ENV: &str = "MASPATAS_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Where the session credential is kept between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    /// A file in the platform data directory.
    #[default]
    File,
    /// The OS keyring.
    Keyring,
}

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// API base. May be relative (`/api`), in which case it is resolved
    /// against `origin`.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Scheme, host and port a relative `api_url` is resolved against.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Username pre-filled at login.
    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default)]
    pub credential_store: CredentialBackend,

    /// Overrides the credential file location (file backend only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_file: Option<PathBuf>,

    /// Request timeout in seconds. Unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Accept any TLS certificate.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            origin: default_origin(),
            username: default_username(),
            credential_store: CredentialBackend::default(),
            credential_file: None,
            timeout_secs: None,
            insecure: false,
            ca_cert: None,
        }
    }
}

fn default_api_url() -> String {
    "/api".into()
}
fn default_origin() -> String {
    "http://127.0.0.1:8000".into()
}
fn default_username() -> String {
    "admin".into()
}

impl Config {
    /// The absolute API base URL.
    ///
    /// An absolute `api_url` is used as-is; a relative one is joined onto
    /// `origin`, mirroring how a browser resolves it against the page.
    pub fn api_base_url(&self) -> Result<Url, ConfigError> {
        resolve_api_url(&self.api_url, &self.origin)
    }

    pub fn tls(&self) -> TlsVerification {
        if self.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        }
    }

    /// Build a `DashboardConfig` with no further overrides.
    pub fn dashboard_config(&self) -> Result<DashboardConfig, ConfigError> {
        Ok(DashboardConfig {
            api_url: self.api_base_url()?,
            tls: self.tls(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        })
    }

    /// Open the configured credential store.
    pub fn credential_store(&self) -> Result<Arc<dyn CredentialStore>, ConfigError> {
        Ok(match self.credential_store {
            CredentialBackend::File => Arc::new(FileCredentialStore::new(
                self.credential_file
                    .clone()
                    .unwrap_or_else(FileCredentialStore::default_path),
            )),
            CredentialBackend::Keyring => Arc::new(KeyringCredentialStore::new()?),
        })
    }
}

/// Resolve a possibly-relative API URL against an origin.
pub fn resolve_api_url(api_url: &str, origin: &str) -> Result<Url, ConfigError> {
    let api_url = api_url.trim();
    if api_url.is_empty() {
        return Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: "must not be empty".into(),
        });
    }

    match Url::parse(api_url) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(origin).map_err(|e| ConfigError::Validation {
                field: "origin".into(),
                reason: format!("invalid URL '{origin}': {e}"),
            })?;
            base.join(api_url).map_err(|e| ConfigError::Validation {
                field: "api_url".into(),
                reason: format!("cannot resolve '{api_url}' against '{origin}': {e}"),
            })
        }
        Err(e) => Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL '{api_url}': {e}"),
        }),
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "maspatas", "maspatas")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("maspatas");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory for persistent client state (the credential file).
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(dirs_fallback, |dirs| dirs.data_dir().to_path_buf())
}

/// Directory for disposable state (TUI logs).
pub fn cache_dir() -> PathBuf {
    project_dirs().map_or_else(dirs_fallback, |dirs| dirs.cache_dir().to_path_buf())
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load the config from the canonical file plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then `path` (if it exists), then `MASPATAS_*` variables.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["password"]));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Login password from the environment, if set.
pub fn password_from_env() -> Option<SecretString> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(SecretString::from)
}
