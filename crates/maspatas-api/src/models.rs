// Wire types for the MasPatas backend.
//
// Monetary amounts travel as decimal strings and are kept verbatim here;
// interpretation (summing, rounding) happens in `maspatas-core`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

// ── Resource kinds ──────────────────────────────────────────────────

/// Read-only collections exposed by the backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum CollectionKind {
    Products,
    Clients,
    Inventory,
    Sales,
}

impl CollectionKind {
    /// Path segment relative to the API base.
    pub fn path(self) -> &'static str {
        self.into()
    }
}

/// Entities that can be created through a guarded POST.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
    Product,
    Client,
    Sale,
}

impl EntityKind {
    /// Collection the entity is created in (and listed from).
    pub fn collection(self) -> CollectionKind {
        match self {
            Self::Product => CollectionKind::Products,
            Self::Client => CollectionKind::Clients,
            Self::Sale => CollectionKind::Sales,
        }
    }

    pub fn path(self) -> &'static str {
        self.collection().path()
    }
}

// ── Records ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub price_amount: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub product_id: String,
    pub stock: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: String,
    pub subtotal: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub sale_id: String,
    pub client_id: String,
    /// ISO-8601 timestamp as produced by the backend.
    #[serde(default)]
    pub created_at: Option<String>,
    pub total_amount: String,
    pub currency: String,
    #[serde(default)]
    pub lines: Vec<SaleLine>,
}

/// One decoded read collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collection {
    Products(Vec<Product>),
    Clients(Vec<Client>),
    Inventory(Vec<InventoryItem>),
    Sales(Vec<Sale>),
}

impl Collection {
    pub fn kind(&self) -> CollectionKind {
        match self {
            Self::Products(_) => CollectionKind::Products,
            Self::Clients(_) => CollectionKind::Clients,
            Self::Inventory(_) => CollectionKind::Inventory,
            Self::Sales(_) => CollectionKind::Sales,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Products(v) => v.len(),
            Self::Clients(v) => v.len(),
            Self::Inventory(v) => v.len(),
            Self::Sales(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Create requests ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub price_amount: String,
    pub currency: String,
    pub initial_stock: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub client_id: String,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSaleLine {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSale {
    pub sale_id: String,
    pub client_id: String,
    pub lines: Vec<NewSaleLine>,
}

/// A create request, tagged by the entity it creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NewEntity {
    Product(NewProduct),
    Client(NewClient),
    Sale(NewSale),
}

impl NewEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Product(_) => EntityKind::Product,
            Self::Client(_) => EntityKind::Client,
            Self::Sale(_) => EntityKind::Sale,
        }
    }
}

// ── Auth / health ───────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

impl Health {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kinds_map_to_resource_paths() {
        assert_eq!(CollectionKind::Inventory.path(), "inventory");
        assert_eq!(EntityKind::Sale.path(), "sales");
        assert_eq!(EntityKind::Product.collection(), CollectionKind::Products);
        assert_eq!("clients".parse::<CollectionKind>().unwrap(), CollectionKind::Clients);
    }

    #[test]
    fn sale_without_lines_or_timestamp_decodes() {
        let sale: Sale = serde_json::from_value(json!({
            "sale_id": "S1",
            "client_id": "C1",
            "total_amount": "19.98",
            "currency": "USD"
        }))
        .unwrap();
        assert!(sale.lines.is_empty());
        assert!(sale.created_at.is_none());
    }

    #[test]
    fn new_entity_serializes_as_the_inner_body() {
        let body = NewEntity::Client(NewClient {
            client_id: "C9".into(),
            full_name: "Ana Pérez".into(),
            email: "ana@example.com".into(),
        });
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"client_id": "C9", "full_name": "Ana Pérez", "email": "ana@example.com"})
        );
        assert_eq!(body.kind(), EntityKind::Client);
    }
}
