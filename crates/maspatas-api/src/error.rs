use thiserror::Error;

/// Top-level error type for the `maspatas-api` crate.
///
/// Two families matter to callers: communication failures (the backend
/// could not be reached, or answered with something that is not the
/// expected JSON) and remote rejections (the backend answered with an
/// explicit `detail`). `maspatas-core` maps both into user-facing feedback.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Base URL that cannot carry path segments (`mailto:`, `data:` ...).
    #[error("Base URL cannot be used for HTTP requests: {url}")]
    InvalidBaseUrl { url: String },

    /// TLS configuration error (unreadable or malformed CA certificate).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// A success response whose body is missing, not JSON, or the wrong shape.
    #[error("Deserialization error: {message}")]
    Decode { message: String, body: String },

    /// A failure response without a usable `detail` field.
    #[error("Unexpected response (HTTP {status})")]
    UnexpectedStatus { status: u16, body: String },

    // ── Backend ─────────────────────────────────────────────────────
    /// The backend rejected the request with an explicit `detail`.
    #[error("{detail}")]
    Remote { status: u16, detail: String },
}

impl Error {
    /// Returns `true` for transport and decoding failures, i.e. anything
    /// that is not an explicit rejection by the backend.
    pub fn is_communication(&self) -> bool {
        !self.is_remote()
    }

    /// Returns `true` if the backend explicitly rejected the request.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// HTTP status carried by the error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } | Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` for a 401 from the backend.
    ///
    /// The client never acts on this by itself; callers decide whether a
    /// rejected credential should end the session.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors_display_only_the_detail() {
        let err = Error::Remote {
            status: 400,
            detail: "Stock insuficiente".into(),
        };
        assert_eq!(err.to_string(), "Stock insuficiente");
        assert!(err.is_remote());
        assert!(!err.is_communication());
    }

    #[test]
    fn undecodable_bodies_are_communication_failures() {
        let err = Error::Decode {
            message: "expected value at line 1 column 1".into(),
            body: "<html>".into(),
        };
        assert!(err.is_communication());
        assert_eq!(err.status(), None);

        let err = Error::UnexpectedStatus {
            status: 502,
            body: String::new(),
        };
        assert!(err.is_communication());
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn status_predicates() {
        let unauthorized = Error::Remote {
            status: 401,
            detail: "Token inválido".into(),
        };
        assert!(unauthorized.is_unauthorized());
        assert!(!unauthorized.is_not_found());

        let missing = Error::Remote {
            status: 404,
            detail: "Producto no encontrado".into(),
        };
        assert!(missing.is_not_found());
    }
}
