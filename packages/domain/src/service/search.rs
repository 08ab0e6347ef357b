use std::sync::Arc;

use tracing::{instrument, warn};

use crate::catalog::{CatalogEntry, normalize};
use crate::error::DomainError;
use crate::ports::CatalogStore;

/// Prefix search over the normalized catalog name index.
#[derive(Clone)]
pub struct CatalogSearch {
    store: Arc<dyn CatalogStore>,
}

impl CatalogSearch {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Every entry whose normalized name starts with the normalized `query`,
    /// ascending by normalized name. A blank query lists the full catalog.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<CatalogEntry>, DomainError> {
        let prefix = normalize(query);
        self.store
            .query_by_name_prefix(&prefix)
            .await
            .map_err(|e| {
                warn!(error = %e, "Catalog query failed");
                DomainError::QueryFailed(e.to_string())
            })
    }

    /// The dedicated clear action: identical to searching for "".
    pub async fn clear(&self) -> Result<Vec<CatalogEntry>, DomainError> {
        self.search("").await
    }
}

/// The catalog list as a screen holds it. A failed query leaves the last
/// successful result in place.
pub struct CatalogView {
    search: CatalogSearch,
    query: String,
    entries: Vec<CatalogEntry>,
}

impl CatalogView {
    pub fn new(search: CatalogSearch) -> Self {
        Self {
            search,
            query: String::new(),
            entries: Vec::new(),
        }
    }

    pub async fn submit(&mut self, query: &str) -> Result<&[CatalogEntry], DomainError> {
        let entries = self.search.search(query).await?;
        self.query = query.to_string();
        self.entries = entries;
        Ok(&self.entries)
    }

    pub async fn clear(&mut self) -> Result<&[CatalogEntry], DomainError> {
        let entries = self.search.clear().await?;
        self.query.clear();
        self.entries = entries;
        Ok(&self.entries)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }
}
