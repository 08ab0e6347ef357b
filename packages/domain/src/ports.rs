//! Document-store interfaces consumed by the catalog and order services.
//!
//! Binary assets go through [`crate::storage::AssetStore`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::catalog::{CatalogEntry, NewCatalogEntry};
use crate::error::StoreError;
use crate::order::NewOrder;

/// The `pizzas` collection.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every entry whose normalized name starts with `prefix`, ascending by
    /// normalized name. An empty prefix lists the whole collection.
    async fn query_by_name_prefix(&self, prefix: &str) -> Result<Vec<CatalogEntry>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<CatalogEntry, StoreError>;

    /// Write a new record and return the id the store assigned to it.
    async fn insert(&self, record: NewCatalogEntry) -> Result<Uuid, StoreError>;

    /// Overwrite the record stored under `id`.
    async fn update(&self, id: Uuid, record: NewCatalogEntry) -> Result<(), StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// The `orders` collection.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Write one order document atomically and return its id.
    async fn insert(&self, order: NewOrder) -> Result<Uuid, StoreError>;
}
