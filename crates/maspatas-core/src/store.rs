// ── Snapshot store ──
//
// The four read collections are one unit: a refresh either replaces all of
// them or none. Consumers get `Arc` snapshots and the derived totals
// through watch channels.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use maspatas_api::{Client, InventoryItem, Product, Sale};
use tokio::sync::watch;

use crate::totals::Totals;

/// A point-in-time copy of every read collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub products: Vec<Product>,
    pub clients: Vec<Client>,
    pub inventory: Vec<InventoryItem>,
    pub sales: Vec<Sale>,
    /// `None` until the first successful load.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn is_loaded(&self) -> bool {
        self.refreshed_at.is_some()
    }
}

#[derive(Debug)]
pub struct DataStore {
    snapshot: watch::Sender<Arc<Snapshot>>,
    totals: watch::Sender<Totals>,
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Snapshot::default()));
        let (totals, _) = watch::channel(Totals::default());
        Self { snapshot, totals }
    }

    /// Replace every collection at once and recompute the totals.
    pub fn replace(&self, snapshot: Snapshot) {
        let totals = Totals::compute(&snapshot);
        self.snapshot.send_replace(Arc::new(snapshot));
        self.totals.send_replace(totals);
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.borrow())
    }

    pub fn totals(&self) -> Totals {
        *self.totals.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshot.subscribe()
    }

    pub fn subscribe_totals(&self) -> watch::Receiver<Totals> {
        self.totals.subscribe()
    }
}
