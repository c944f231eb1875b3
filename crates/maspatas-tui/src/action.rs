//! Every state transition in the TUI is expressed as an [`Action`].

use std::sync::Arc;

use maspatas_core::{Drafts, EntityKind, Feedback, Snapshot, Totals};
use secrecy::SecretString;

use crate::form::DraftField;
use crate::screen::ScreenId;

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Dashboard state (forwarded by the data bridge) ────────────
    SnapshotUpdated(Arc<Snapshot>),
    TotalsUpdated(Totals),
    BusyChanged(bool),
    SessionChanged(bool),
    FeedbackChanged(Feedback),
    DraftsUpdated(Drafts),

    // ── Guarded triggers ──────────────────────────────────────────
    Reload,
    Login {
        username: String,
        password: Arc<SecretString>,
    },
    Submit(EntityKind),

    // ── Unguarded commands ────────────────────────────────────────
    Logout,
    DismissFeedback,

    // ── Draft editing ─────────────────────────────────────────────
    EditDraft(DraftField, String),
    AddSaleLine,
    ResetDraft(EntityKind),
}

impl Action {
    /// Triggers that start a single-flight operation. The app drops them
    /// while an operation is in flight.
    pub fn is_trigger(&self) -> bool {
        matches!(self, Self::Reload | Self::Login { .. } | Self::Submit(_))
    }

    /// Dashboard state changes, delivered to every screen rather than only
    /// the visible one.
    pub fn is_state_update(&self) -> bool {
        matches!(
            self,
            Self::SnapshotUpdated(_)
                | Self::TotalsUpdated(_)
                | Self::BusyChanged(_)
                | Self::SessionChanged(_)
                | Self::FeedbackChanged(_)
                | Self::DraftsUpdated(_)
        )
    }
}
