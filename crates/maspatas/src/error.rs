//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a distinct exit code per family.

use miette::Diagnostic;
use thiserror::Error;

use maspatas_config::ConfigError;
use maspatas_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not communicate with the backend")]
    #[diagnostic(
        code(maspatas::communication),
        help(
            "{message}\n\
             Check --api-url / MASPATAS_API_URL, then try: maspatas health"
        )
    )]
    Communication { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Not signed in")]
    #[diagnostic(
        code(maspatas::not_authenticated),
        help("Creating records needs a session. Run: maspatas login")
    )]
    NotAuthenticated,

    #[error("{detail}")]
    #[diagnostic(
        code(maspatas::unauthorized),
        help(
            "The backend rejected the stored session token.\n\
             Sign in again with: maspatas login"
        )
    )]
    Unauthorized { detail: String },

    // ── Backend answers ──────────────────────────────────────────────
    #[error("{detail}")]
    #[diagnostic(code(maspatas::not_found), help("Run: maspatas {list_command}"))]
    NotFound {
        detail: String,
        list_command: String,
    },

    #[error("{detail}")]
    #[diagnostic(code(maspatas::rejected), help("The backend answered HTTP {status}."))]
    Rejected { status: u16, detail: String },

    // ── Workflow ─────────────────────────────────────────────────────
    #[error("Another operation is still running")]
    #[diagnostic(code(maspatas::busy))]
    Busy,

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(maspatas::validation))]
    Validation { field: String, reason: String },

    // ── Local state ──────────────────────────────────────────────────
    #[error("Credential storage failed: {message}")]
    #[diagnostic(
        code(maspatas::credential_store),
        help("Use --credential-file to keep the token somewhere writable.")
    )]
    CredentialStore { message: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(maspatas::config),
        help("Inspect it with: maspatas config show\nRecreate it with: maspatas config init")
    )]
    Config { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON output: {0}")]
    #[diagnostic(code(maspatas::json))]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML output: {0}")]
    #[diagnostic(code(maspatas::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Communication { .. } => exit_code::CONNECTION,
            Self::NotAuthenticated | Self::Unauthorized { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Point a not-found error at the listing that would show valid IDs.
    pub fn with_list_command(self, command: &str) -> Self {
        match self {
            Self::NotFound { detail, .. } => Self::NotFound {
                detail,
                list_command: command.into(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Communication { message } => Self::Communication { message },
            CoreError::Remote {
                status: 401,
                detail,
            } => Self::Unauthorized { detail },
            CoreError::Remote {
                status: 404,
                detail,
            } => Self::NotFound {
                detail,
                list_command: "--help".into(),
            },
            CoreError::Remote { status, detail } => Self::Rejected { status, detail },
            CoreError::NotAuthenticated => Self::NotAuthenticated,
            CoreError::Busy => Self::Busy,
            CoreError::Validation { field, reason } => Self::Validation { field, reason },
            CoreError::CredentialStore { message } => Self::CredentialStore { message },
            CoreError::Config { message } => Self::Config { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Keyring(e) => Self::CredentialStore {
                message: e.to_string(),
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_is_an_auth_failure_with_a_login_hint() {
        let err = CliError::from(CoreError::Remote {
            status: 401,
            detail: "Token inválido".into(),
        });
        assert_eq!(err.to_string(), "Token inválido");
        assert_eq!(err.exit_code(), exit_code::AUTH);
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("maspatas login"), "{help}");
    }

    #[test]
    fn not_found_points_at_the_listing() {
        let err = CliError::from(CoreError::Remote {
            status: 404,
            detail: "Producto no encontrado".into(),
        })
        .with_list_command("products list");
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert_eq!(help, "Run: maspatas products list");
    }

    #[test]
    fn exit_codes_by_family() {
        assert_eq!(
            CliError::from(CoreError::Communication {
                message: "timeout".into()
            })
            .exit_code(),
            exit_code::CONNECTION
        );
        assert_eq!(
            CliError::from(CoreError::NotAuthenticated).exit_code(),
            exit_code::AUTH
        );
        assert_eq!(
            CliError::from(CoreError::Remote {
                status: 409,
                detail: "Producto ya existe".into()
            })
            .exit_code(),
            exit_code::REJECTED
        );
        assert_eq!(CliError::from(CoreError::Busy).exit_code(), exit_code::GENERAL);
    }
}
