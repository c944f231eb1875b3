// ── Core error types ──
//
// User-facing errors from maspatas-core. The `From<maspatas_api::Error>`
// impl folds every transport-layer failure into one of two families:
// communication (backend unreachable or answered garbage) and remote
// (backend explicitly rejected the request).

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Backend errors ───────────────────────────────────────────────
    /// Transport or decoding failure: no usable answer from the backend.
    #[error("Could not communicate with the backend. ({message})")]
    Communication { message: String },

    /// The backend rejected the request. `detail` is already one line.
    #[error("{detail}")]
    Remote { status: u16, detail: String },

    // ── Workflow errors ──────────────────────────────────────────────
    /// A guarded mutation was attempted without a credential.
    #[error("Sign in to run protected actions.")]
    NotAuthenticated,

    /// Another guarded operation is already in flight.
    #[error("Another operation is still running.")]
    Busy,

    /// A draft field failed coercion at the submission boundary.
    #[error("{field}: {reason}")]
    Validation { field: String, reason: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Credential storage failed: {message}")]
    CredentialStore { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Single-line text for the feedback slot.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// HTTP status of a remote rejection, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `true` if the backend rejected the credential (HTTP 401).
    ///
    /// Reported only; the session is never cleared because of it.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_communication(&self) -> bool {
        matches!(self, Self::Communication { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<maspatas_api::Error> for CoreError {
    fn from(err: maspatas_api::Error) -> Self {
        match err {
            maspatas_api::Error::Remote { status, detail } => CoreError::Remote { status, detail },
            maspatas_api::Error::Transport(ref e) => CoreError::Communication {
                message: if e.is_connect() {
                    "connection refused".into()
                } else if e.is_timeout() {
                    "request timed out".into()
                } else {
                    e.to_string()
                },
            },
            maspatas_api::Error::Decode { message, body: _ } => {
                CoreError::Communication { message }
            }
            maspatas_api::Error::UnexpectedStatus { status, body: _ } => {
                CoreError::Communication {
                    message: format!("HTTP {status}"),
                }
            }
            maspatas_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            maspatas_api::Error::InvalidBaseUrl { url } => CoreError::Config {
                message: format!("Base URL cannot be used for HTTP requests: {url}"),
            },
            maspatas_api::Error::Tls(message) => CoreError::Config { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_detail_is_the_whole_message() {
        let err: CoreError = maspatas_api::Error::Remote {
            status: 400,
            detail: "price_amount: invalid, currency: invalid".into(),
        }
        .into();
        assert_eq!(
            err.user_message(),
            "price_amount: invalid, currency: invalid"
        );
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn unexpected_status_is_communication() {
        let err: CoreError = maspatas_api::Error::UnexpectedStatus {
            status: 503,
            body: "unavailable".into(),
        }
        .into();
        assert!(err.is_communication());
        assert_eq!(
            err.user_message(),
            "Could not communicate with the backend. (HTTP 503)"
        );
    }

    #[test]
    fn unauthorized_is_only_flagged() {
        let err: CoreError = maspatas_api::Error::Remote {
            status: 401,
            detail: "Token inválido".into(),
        }
        .into();
        assert!(err.is_unauthorized());
        assert!(!err.is_communication());
    }
}
