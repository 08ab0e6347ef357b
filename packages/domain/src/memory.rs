//! In-process stores, used for local runs and tests.

use std::collections::{BTreeSet, HashMap};
use std::ops::Bound;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::catalog::{CatalogEntry, NewCatalogEntry, prefix_upper_bound};
use crate::error::StoreError;
use crate::order::NewOrder;
use crate::ports::{CatalogStore, OrderStore};

#[derive(Default)]
struct CatalogState {
    records: HashMap<Uuid, NewCatalogEntry>,
    /// `(normalized_name, id)` kept sorted for range scans.
    name_index: BTreeSet<(String, Uuid)>,
}

/// Catalog collection with an ordered normalized-name index.
#[derive(Default)]
pub struct MemoryCatalogStore {
    state: RwLock<CatalogState>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn query_by_name_prefix(&self, prefix: &str) -> Result<Vec<CatalogEntry>, StoreError> {
        let state = self.state.read().await;

        let lower = Bound::Included((prefix.to_string(), Uuid::nil()));
        let upper = match prefix_upper_bound(prefix) {
            Some(bound) => Bound::Excluded((bound, Uuid::nil())),
            None => Bound::Unbounded,
        };

        state
            .name_index
            .range((lower, upper))
            .map(|(_, id)| {
                state
                    .records
                    .get(id)
                    .cloned()
                    .map(|record| record.with_id(*id))
                    .ok_or_else(|| StoreError::Corrupt(format!("index points at missing pizza {id}")))
            })
            .collect()
    }

    async fn get(&self, id: Uuid) -> Result<CatalogEntry, StoreError> {
        self.state
            .read()
            .await
            .records
            .get(&id)
            .cloned()
            .map(|record| record.with_id(id))
            .ok_or_else(|| StoreError::NotFound(format!("pizza {id}")))
    }

    async fn insert(&self, record: NewCatalogEntry) -> Result<Uuid, StoreError> {
        let id = Uuid::now_v7();
        let mut state = self.state.write().await;
        state
            .name_index
            .insert((record.normalized_name().to_string(), id));
        state.records.insert(id, record);
        Ok(id)
    }

    async fn update(&self, id: Uuid, record: NewCatalogEntry) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let previous = state
            .records
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound(format!("pizza {id}")))?;
        state
            .name_index
            .remove(&(previous.normalized_name().to_string(), id));
        state
            .name_index
            .insert((record.normalized_name().to_string(), id));
        state.records.insert(id, record);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let previous = state
            .records
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound(format!("pizza {id}")))?;
        state
            .name_index
            .remove(&(previous.normalized_name().to_string(), id));
        Ok(())
    }
}

/// Order collection that only ever grows.
#[derive(Default)]
pub struct MemoryOrderStore {
    orders: RwLock<Vec<(Uuid, NewOrder)>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored order, oldest first.
    pub async fn orders(&self) -> Vec<(Uuid, NewOrder)> {
        self.orders.read().await.clone()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert(&self, order: NewOrder) -> Result<Uuid, StoreError> {
        let id = Uuid::now_v7();
        self.orders.write().await.push((id, order));
        Ok(id)
    }
}
