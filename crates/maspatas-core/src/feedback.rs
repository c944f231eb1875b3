// ── Feedback slot ──
//
// One message at a time: a success, an error, or nothing. Every write
// replaces whatever was there.

use maspatas_api::EntityKind;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const SESSION_STARTED: &str = "Session started.";
pub const SESSION_CLOSED: &str = "Session closed.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum Feedback {
    #[default]
    None,
    Success(String),
    Error(String),
}

impl Feedback {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success(message.into())
    }

    pub fn error(err: &CoreError) -> Self {
        Self::Error(err.user_message())
    }

    /// Success message for a completed create.
    pub fn created(kind: EntityKind) -> Self {
        Self::success(match kind {
            EntityKind::Product => "Product registered.",
            EntityKind::Client => "Client registered.",
            EntityKind::Sale => "Sale registered.",
        })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Success(m) | Self::Error(m) => Some(m),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_feedback_carries_the_user_message() {
        let fb = Feedback::error(&CoreError::NotAuthenticated);
        assert!(fb.is_error());
        assert_eq!(fb.message(), Some("Sign in to run protected actions."));
    }

    #[test]
    fn created_messages_per_kind() {
        assert_eq!(
            Feedback::created(EntityKind::Sale).message(),
            Some("Sale registered.")
        );
        assert_eq!(Feedback::None.message(), None);
    }
}
