//! Session, guarded mutations and dashboard state between `maspatas-api`
//! and the views (CLI / TUI).
//!
//! - **[`Dashboard`]**: central facade. Holds the [`Session`], the read
//!   [`Snapshot`], the three [`Drafts`], the busy flag and the [`Feedback`]
//!   slot, and publishes each through `tokio::sync::watch`.
//!
//! - **[`SingleFlight`]**: the busy flag. Initial load, login and every
//!   create run under it; a second attempt while one is in flight is
//!   rejected with [`CoreError::Busy`].
//!
//! - **[`Session`]**: the bearer credential, kept in memory and written
//!   through to a [`CredentialStore`] on every change.
//!
//! - **[`Draft`]**: per-entity form state, coerced into typed requests once
//!   at submission.
//!
//! - **[`Totals`]**: total stock and exact decimal revenue, recomputed
//!   whenever the snapshot is replaced.

pub mod config;
pub mod dashboard;
pub mod draft;
pub mod error;
pub mod feedback;
pub mod flight;
pub mod session;
pub mod store;
pub mod totals;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DashboardConfig, TlsVerification};
pub use dashboard::Dashboard;
pub use draft::{ClientDraft, Draft, Drafts, ProductDraft, SaleDraft, SaleLineDraft};
pub use error::CoreError;
pub use feedback::Feedback;
pub use flight::{FlightPermit, SingleFlight};
pub use session::{CREDENTIAL_KEY, CredentialStore, MemoryCredentialStore, Session};
pub use store::{DataStore, Snapshot};
pub use totals::{Totals, format_amount};

// Wire types views need without depending on the api crate directly.
pub use maspatas_api::{
    Client, Collection, CollectionKind, EntityKind, Health, InventoryItem, Product, Sale,
    SaleLine,
};
pub use rust_decimal::Decimal;
