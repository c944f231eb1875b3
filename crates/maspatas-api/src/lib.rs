// maspatas-api: Async Rust client for the MasPatas inventory and sales API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use models::{
    Client, Collection, CollectionKind, EntityKind, Health, InventoryItem, NewClient, NewEntity,
    NewProduct, NewSale, NewSaleLine, Product, Sale, SaleLine,
};
pub use transport::{TlsMode, TransportConfig};
