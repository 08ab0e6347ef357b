use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::catalog::{CatalogEntry, NewCatalogEntry, ProductDraft};
use crate::config::CatalogConfig;
use crate::error::{DomainError, StoreError};
use crate::ports::CatalogStore;
use crate::service::gate::require_catalog_manager;
use crate::service::locks::EntryLocks;
use crate::storage::path::unique_asset_path;
use crate::storage::{AssetRef, AssetStore, LocalImage};
use crate::user::User;

/// Creates, edits and deletes catalog entries together with their images.
///
/// An entry's record only ever references an image whose upload completed,
/// and a record is only deleted after its image is gone. Operations on the
/// same id run one at a time.
pub struct ProductLifecycle {
    catalog: Arc<dyn CatalogStore>,
    assets: Arc<dyn AssetStore>,
    config: CatalogConfig,
    locks: EntryLocks,
}

impl ProductLifecycle {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        assets: Arc<dyn AssetStore>,
        config: CatalogConfig,
    ) -> Self {
        Self {
            catalog,
            assets,
            config,
            locks: EntryLocks::new(),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Load one entry, e.g. to prefill the edit screen.
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<CatalogEntry, DomainError> {
        Ok(self.catalog.get(id).await?)
    }

    #[instrument(skip_all, fields(user = %user.id))]
    pub async fn create(
        &self,
        user: &User,
        draft: &ProductDraft,
    ) -> Result<CatalogEntry, DomainError> {
        require_catalog_manager(user)?;
        let valid = draft.validate(&self.config)?;

        let image_ref = self.upload(valid.image).await?;
        let record = NewCatalogEntry::new(valid.name, valid.description, valid.prices, image_ref);

        match self.catalog.insert(record.clone()).await {
            Ok(id) => {
                info!(%id, name = record.name(), "Catalog entry created");
                Ok(record.with_id(id))
            }
            Err(e) => {
                self.discard_asset(record.image_asset_path()).await;
                Err(persistence(e))
            }
        }
    }

    /// Replace every field of an entry. A new image is always uploaded; the
    /// superseded one is removed afterwards on a best-effort basis.
    #[instrument(skip(self, user, draft), fields(user = %user.id))]
    pub async fn update(
        &self,
        user: &User,
        id: Uuid,
        draft: &ProductDraft,
    ) -> Result<CatalogEntry, DomainError> {
        require_catalog_manager(user)?;
        let valid = draft.validate(&self.config)?;

        let _guard = self.locks.lock(id).await;
        let previous = self.catalog.get(id).await?;

        let image_ref = self.upload(valid.image).await?;
        let record = NewCatalogEntry::new(valid.name, valid.description, valid.prices, image_ref);

        if let Err(e) = self.catalog.update(id, record.clone()).await {
            self.discard_asset(record.image_asset_path()).await;
            return Err(match e {
                StoreError::NotFound(what) => DomainError::NotFound(what),
                other => persistence(other),
            });
        }
        info!(%id, name = record.name(), "Catalog entry updated");

        if previous.image_asset_path() != record.image_asset_path() {
            self.discard_asset(previous.image_asset_path()).await;
        }
        Ok(record.with_id(id))
    }

    /// Remove the entry's image, then the record. If the image cannot be
    /// removed the record stays untouched and the call can be retried.
    #[instrument(skip(self, user), fields(user = %user.id))]
    pub async fn delete(&self, user: &User, id: Uuid) -> Result<(), DomainError> {
        require_catalog_manager(user)?;

        let _guard = self.locks.lock(id).await;
        let entry = self.catalog.get(id).await?;

        let removed = self
            .assets
            .delete(entry.image_asset_path())
            .await
            .map_err(|e| {
                warn!(path = entry.image_asset_path(), error = %e, "Image delete failed, keeping record");
                DomainError::from(e)
            })?;
        if !removed {
            warn!(path = entry.image_asset_path(), "Image was already gone");
        }

        self.catalog.delete(id).await.map_err(persistence)?;
        info!(%id, "Catalog entry deleted");
        Ok(())
    }

    async fn upload(&self, image: &LocalImage) -> Result<AssetRef, DomainError> {
        let path = unique_asset_path(&self.config);
        Ok(self.assets.upload(&path, image).await?)
    }

    async fn discard_asset(&self, path: &str) {
        if let Err(e) = self.assets.delete(path).await {
            warn!(path, error = %e, "Failed to remove unreferenced image");
        }
    }
}

fn persistence(err: StoreError) -> DomainError {
    DomainError::Persistence(err.to_string())
}
