//! Screen implementations. Each screen is a top-level Component.

pub mod clients;
pub mod dashboard;
pub mod products;
pub mod sales;

use maspatas_core::Snapshot;

use crate::component::Component;
use crate::screen::ScreenId;

/// One component per tab. `username` pre-fills the login form.
pub fn create_screens(username: String) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Dashboard,
            Box::new(dashboard::DashboardScreen::new(username)),
        ),
        (ScreenId::Products, Box::new(products::ProductsScreen::new())),
        (ScreenId::Clients, Box::new(clients::ClientsScreen::new())),
        (ScreenId::Sales, Box::new(sales::SalesScreen::new())),
    ]
}

// ── Snapshot lookups ─────────────────────────────────────────────────

/// Display name of a product, falling back to its ID.
pub(crate) fn product_name<'a>(snapshot: &'a Snapshot, product_id: &'a str) -> &'a str {
    snapshot
        .products
        .iter()
        .find(|p| p.id == product_id)
        .map_or(product_id, |p| p.name.as_str())
}

/// Full name of a client, falling back to its ID.
pub(crate) fn client_name<'a>(snapshot: &'a Snapshot, client_id: &'a str) -> &'a str {
    snapshot
        .clients
        .iter()
        .find(|c| c.id == client_id)
        .map_or(client_id, |c| c.full_name.as_str())
}

/// Stock on hand for a product, if the inventory lists it.
pub(crate) fn stock_of(snapshot: &Snapshot, product_id: &str) -> Option<i64> {
    snapshot
        .inventory
        .iter()
        .find(|i| i.product_id == product_id)
        .map(|i| i.stock)
}

/// Backend timestamps shortened to minutes; anything unparseable is shown
/// as sent.
pub(crate) fn format_created(created_at: Option<&str>) -> String {
    match created_at {
        None => "─".into(),
        Some(raw) => chrono::DateTime::parse_from_rfc3339(raw)
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .or_else(|_| {
                chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            })
            .unwrap_or_else(|_| raw.to_owned()),
    }
}
