use std::sync::Arc;

use domain::ports::{CatalogStore, OrderStore};
use domain::service::{CatalogSearch, ProductLifecycle};
use domain::storage::AssetStore;

use crate::compositions::CompositionRegistry;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub search: CatalogSearch,
    pub products: Arc<ProductLifecycle>,
    pub compositions: Arc<CompositionRegistry>,
    pub assets: Arc<dyn AssetStore>,
}

impl AppState {
    /// Wire the services over the given stores.
    pub fn new(
        config: AppConfig,
        catalog: Arc<dyn CatalogStore>,
        orders: Arc<dyn OrderStore>,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        let products = ProductLifecycle::new(catalog.clone(), assets.clone(), config.catalog.clone());
        let compositions = CompositionRegistry::new(
            catalog.clone(),
            orders,
            config.orders.composition_cache_size,
        );
        Self {
            search: CatalogSearch::new(catalog),
            products: Arc::new(products),
            compositions: Arc::new(compositions),
            assets,
            config: Arc::new(config),
        }
    }
}
