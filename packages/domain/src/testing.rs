//! Test doubles with failure injection.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;
use tokio::sync::{Notify, Semaphore};
use uuid::Uuid;

use crate::catalog::{CatalogEntry, NewCatalogEntry, Price, ProductDraft, SizeCode, SizePrices};
use crate::error::StoreError;
use crate::memory::{MemoryCatalogStore, MemoryOrderStore};
use crate::order::NewOrder;
use crate::ports::{CatalogStore, OrderStore};
use crate::storage::{AssetRef, AssetStore, BoxReader, LocalImage, StorageError};
use crate::user::{Role, User};

pub fn admin() -> User {
    User::new("admin-1", "Ana", Role::Admin)
}

pub fn waiter() -> User {
    User::new("waiter-1", "Bruno", Role::Waiter)
}

pub fn prices(small: u64, medium: u64, large: u64) -> SizePrices {
    SizePrices {
        small: Price::from_units(small),
        medium: Price::from_units(medium),
        large: Price::from_units(large),
    }
}

pub fn record(name: &str) -> NewCatalogEntry {
    NewCatalogEntry::new(
        name,
        format!("{name} description"),
        prices(30, 42, 55),
        AssetRef::new(format!("pizzas/{}.png", Uuid::new_v4()), [1u8; 32]),
    )
}

pub fn draft(name: &str) -> ProductDraft {
    let mut draft = ProductDraft {
        name: name.to_string(),
        description: "Tomato sauce and cheese".into(),
        image: Some(LocalImage::Bytes(format!("image of {name}").into_bytes())),
        ..Default::default()
    };
    draft.set_price(SizeCode::Small, "30");
    draft.set_price(SizeCode::Medium, "42");
    draft.set_price(SizeCode::Large, "55,90");
    draft
}

/// Catalog store whose calls can be switched to fail.
#[derive(Default)]
pub struct FlakyCatalog {
    pub inner: MemoryCatalogStore,
    pub fail_queries: AtomicBool,
    pub fail_insert: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_delete: AtomicBool,
}

fn unavailable(flag: &AtomicBool) -> Result<(), StoreError> {
    if flag.load(Ordering::SeqCst) {
        Err(StoreError::Unavailable("injected failure".into()))
    } else {
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for FlakyCatalog {
    async fn query_by_name_prefix(&self, prefix: &str) -> Result<Vec<CatalogEntry>, StoreError> {
        unavailable(&self.fail_queries)?;
        self.inner.query_by_name_prefix(prefix).await
    }

    async fn get(&self, id: Uuid) -> Result<CatalogEntry, StoreError> {
        unavailable(&self.fail_queries)?;
        self.inner.get(id).await
    }

    async fn insert(&self, record: NewCatalogEntry) -> Result<Uuid, StoreError> {
        unavailable(&self.fail_insert)?;
        self.inner.insert(record).await
    }

    async fn update(&self, id: Uuid, record: NewCatalogEntry) -> Result<(), StoreError> {
        unavailable(&self.fail_update)?;
        self.inner.update(id, record).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        unavailable(&self.fail_delete)?;
        self.inner.delete(id).await
    }
}

/// Asset store kept in a map, with switchable upload/delete failures.
#[derive(Default)]
pub struct MemoryAssets {
    pub assets: Mutex<HashMap<String, Vec<u8>>>,
    pub fail_upload: AtomicBool,
    pub fail_delete: AtomicBool,
    pub uploads: AtomicUsize,
}

impl MemoryAssets {
    pub fn contains(&self, path: &str) -> bool {
        self.assets.lock().unwrap().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.assets.lock().unwrap().len()
    }
}

#[async_trait]
impl AssetStore for MemoryAssets {
    async fn put_stream(&self, path: &str, mut reader: BoxReader) -> Result<AssetRef, StorageError> {
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("injected upload failure")));
        }
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let digest: [u8; 32] = Sha256::digest(&bytes).into();
        self.assets.lock().unwrap().insert(path.to_string(), bytes);
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(AssetRef::new(path, digest))
    }

    async fn open(&self, path: &str) -> Result<BoxReader, StorageError> {
        let bytes = self
            .assets
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))?;
        Ok(Box::new(std::io::Cursor::new(bytes)))
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("injected delete failure")));
        }
        Ok(self.assets.lock().unwrap().remove(path).is_some())
    }

    fn download_url(&self, asset: &AssetRef) -> String {
        format!("memory://{}", asset.path())
    }
}

/// Order store that parks every insert until the test releases it.
pub struct GatedOrders {
    pub inner: MemoryOrderStore,
    pub entered: Notify,
    gate: Semaphore,
    pub fail: AtomicBool,
}

impl Default for GatedOrders {
    fn default() -> Self {
        Self {
            inner: MemoryOrderStore::new(),
            entered: Notify::new(),
            gate: Semaphore::new(0),
            fail: AtomicBool::new(false),
        }
    }
}

impl GatedOrders {
    /// Let one parked insert proceed.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl OrderStore for GatedOrders {
    async fn insert(&self, order: NewOrder) -> Result<Uuid, StoreError> {
        self.entered.notify_one();
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        permit.forget();
        unavailable(&self.fail)?;
        self.inner.insert(order).await
    }
}
