// ── Dashboard controller ──
//
// Owns everything a view renders: session, snapshots, drafts, busy flag
// and feedback. Guarded operations go through one single-flight guard;
// reads of single records bypass it.

use std::sync::Arc;

use chrono::Utc;
use maspatas_api::{
    ApiClient, Client, Collection, CollectionKind, EntityKind, Health, InventoryItem, Product, Sale,
};
use secrecy::SecretString;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::draft::{ClientDraft, Draft, Drafts, ProductDraft, SaleDraft};
use crate::error::CoreError;
use crate::feedback::{Feedback, SESSION_CLOSED, SESSION_STARTED};
use crate::flight::SingleFlight;
use crate::session::{CredentialStore, Session};
use crate::store::{DataStore, Snapshot};
use crate::totals::Totals;

/// The main entry point for views.
///
/// Cheaply cloneable via `Arc<DashboardInner>`; clones share all state.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    api: ApiClient,
    session: Session,
    flight: SingleFlight,
    store: DataStore,
    drafts: watch::Sender<Drafts>,
    feedback: watch::Sender<Feedback>,
}

impl Dashboard {
    /// Build the API client from `config` and restore the stored session.
    pub fn new(
        config: &DashboardConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, CoreError> {
        let api = ApiClient::new(config.api_url.as_str(), &config.transport())?;
        Ok(Self::with_api(api, credentials))
    }

    /// Use an already-built API client.
    pub fn with_api(api: ApiClient, credentials: Arc<dyn CredentialStore>) -> Self {
        let (drafts, _) = watch::channel(Drafts::default());
        let (feedback, _) = watch::channel(Feedback::None);
        Self {
            inner: Arc::new(DashboardInner {
                api,
                session: Session::restore(credentials),
                flight: SingleFlight::new(),
                store: DataStore::new(),
                drafts,
                feedback,
            }),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub fn store(&self) -> &DataStore {
        &self.inner.store
    }

    // ── State accessors ──────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.store.snapshot()
    }

    pub fn totals(&self) -> Totals {
        self.inner.store.totals()
    }

    pub fn feedback(&self) -> Feedback {
        self.inner.feedback.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.flight.is_busy()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.session.is_authenticated()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_snapshot(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.inner.store.subscribe()
    }

    pub fn subscribe_totals(&self) -> watch::Receiver<Totals> {
        self.inner.store.subscribe_totals()
    }

    pub fn subscribe_feedback(&self) -> watch::Receiver<Feedback> {
        self.inner.feedback.subscribe()
    }

    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.inner.flight.subscribe()
    }

    pub fn subscribe_session(&self) -> watch::Receiver<bool> {
        self.inner.session.subscribe()
    }

    pub fn subscribe_drafts(&self) -> watch::Receiver<Drafts> {
        self.inner.drafts.subscribe()
    }

    // ── Feedback ─────────────────────────────────────────────────────

    pub fn clear_feedback(&self) {
        self.inner.feedback.send_replace(Feedback::None);
    }

    fn succeed(&self, feedback: Feedback) {
        self.inner.feedback.send_replace(feedback);
    }

    fn fail(&self, err: &CoreError) {
        warn!(error = %err, "operation failed");
        self.inner.feedback.send_replace(Feedback::error(err));
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Load all four collections under the single-flight guard.
    ///
    /// Needs no credential. On any failure the previous snapshot stays.
    pub async fn load_all(&self) -> Result<(), CoreError> {
        let Some(_permit) = self.inner.flight.try_acquire() else {
            debug!("load rejected: another operation is in flight");
            return Err(CoreError::Busy);
        };

        self.clear_feedback();
        self.refresh().await.inspect_err(|e| self.fail(e))
    }

    /// Fetch the four collections concurrently; replace them only if all
    /// four arrived.
    async fn refresh(&self) -> Result<(), CoreError> {
        let api = &self.inner.api;
        let (products, clients, inventory, sales) = tokio::try_join!(
            api.list_products(),
            api.list_clients(),
            api.list_inventory(),
            api.list_sales(),
        )?;

        info!(
            products = products.len(),
            clients = clients.len(),
            inventory = inventory.len(),
            sales = sales.len(),
            "collections refreshed"
        );

        self.inner.store.replace(Snapshot {
            products,
            clients,
            inventory,
            sales,
            refreshed_at: Some(Utc::now()),
        });
        Ok(())
    }

    /// Ad-hoc read of a single collection. Does not touch the snapshot.
    pub async fn fetch_collection(&self, kind: CollectionKind) -> Result<Collection, CoreError> {
        Ok(self.inner.api.fetch_collection(kind).await?)
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, CoreError> {
        Ok(self.inner.api.list_products().await?)
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>, CoreError> {
        Ok(self.inner.api.list_clients().await?)
    }

    pub async fn list_inventory(&self) -> Result<Vec<InventoryItem>, CoreError> {
        Ok(self.inner.api.list_inventory().await?)
    }

    pub async fn list_sales(&self) -> Result<Vec<Sale>, CoreError> {
        Ok(self.inner.api.list_sales().await?)
    }

    pub async fn get_product(&self, id: &str) -> Result<Product, CoreError> {
        Ok(self.inner.api.get_product(id).await?)
    }

    pub async fn get_client(&self, id: &str) -> Result<Client, CoreError> {
        Ok(self.inner.api.get_client(id).await?)
    }

    pub async fn get_sale(&self, id: &str) -> Result<Sale, CoreError> {
        Ok(self.inner.api.get_sale(id).await?)
    }

    pub async fn health(&self) -> Result<Health, CoreError> {
        Ok(self.inner.api.health().await?)
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Exchange credentials for a token and store it.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), CoreError> {
        let Some(_permit) = self.inner.flight.try_acquire() else {
            return Err(CoreError::Busy);
        };

        self.clear_feedback();
        let result = async {
            let credential = self.inner.api.obtain_credential(username, password).await?;
            self.inner.session.set(credential)
        }
        .await;

        match result {
            Ok(()) => {
                self.succeed(Feedback::success(SESSION_STARTED));
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Forget the credential, in memory and on disk.
    pub fn logout(&self) -> Result<(), CoreError> {
        match self.inner.session.clear() {
            Ok(()) => {
                self.succeed(Feedback::success(SESSION_CLOSED));
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    // ── Drafts ───────────────────────────────────────────────────────

    pub fn drafts(&self) -> Drafts {
        self.inner.drafts.borrow().clone()
    }

    pub fn draft(&self, kind: EntityKind) -> Draft {
        self.inner.drafts.borrow().get(kind)
    }

    /// Edit any of the three drafts in one change notification.
    pub fn edit_drafts(&self, edit: impl FnOnce(&mut Drafts)) {
        self.inner.drafts.send_modify(edit);
    }

    pub fn edit_product(&self, edit: impl FnOnce(&mut ProductDraft)) {
        self.inner.drafts.send_modify(|d| edit(&mut d.product));
    }

    pub fn edit_client(&self, edit: impl FnOnce(&mut ClientDraft)) {
        self.inner.drafts.send_modify(|d| edit(&mut d.client));
    }

    pub fn edit_sale(&self, edit: impl FnOnce(&mut SaleDraft)) {
        self.inner.drafts.send_modify(|d| edit(&mut d.sale));
    }

    pub fn reset_draft(&self, kind: EntityKind) {
        self.inner.drafts.send_modify(|d| d.reset(kind));
    }

    // ── Guarded mutations ────────────────────────────────────────────

    /// Submit the draft for `kind`.
    ///
    /// Rejected with [`CoreError::Busy`] while another guarded operation
    /// runs, and with [`CoreError::NotAuthenticated`] (no request issued)
    /// when no credential is held. On success the draft is reset and all
    /// four collections are refreshed before the busy flag clears; on
    /// failure drafts and collections are left alone.
    pub async fn submit(&self, kind: EntityKind) -> Result<Value, CoreError> {
        // Checked before the guard: a rejected submit never flips busy.
        let Some(credential) = self.inner.session.credential() else {
            let err = CoreError::NotAuthenticated;
            self.fail(&err);
            return Err(err);
        };

        let Some(_permit) = self.inner.flight.try_acquire() else {
            debug!(%kind, "submit rejected: another operation is in flight");
            return Err(CoreError::Busy);
        };

        self.clear_feedback();

        let entity = self.draft(kind).coerce().inspect_err(|e| self.fail(e))?;

        let record = self
            .inner
            .api
            .create_entity(&credential, &entity)
            .await
            .map_err(CoreError::from)
            .inspect_err(|e| self.fail(e))?;
        info!(%kind, "entity created");

        // The entity exists server-side from here on, whatever the refresh does.
        self.reset_draft(kind);
        self.refresh().await.inspect_err(|e| self.fail(e))?;

        self.succeed(Feedback::created(kind));
        Ok(record)
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("api_url", &self.inner.api.base_url().as_str())
            .field("session", &self.inner.session)
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}
