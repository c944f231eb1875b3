// ── Runtime dashboard configuration ──
//
// Describes *where* the backend lives and how to talk to it. Never touches
// disk: the CLI/TUI resolves settings (maspatas-config) and hands this in.

use std::path::PathBuf;
use std::time::Duration;

use maspatas_api::{TlsMode, TransportConfig};
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

/// Configuration for one backend.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Absolute API base URL (e.g. `http://127.0.0.1:8000/api`).
    pub api_url: Url,
    pub tls: TlsVerification,
    /// `None` leaves requests without a deadline.
    pub timeout: Option<Duration>,
}

impl DashboardConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            tls: TlsVerification::default(),
            timeout: None,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
