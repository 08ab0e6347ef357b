use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

use domain::User;
use domain::ports::{CatalogStore, OrderStore};
use domain::service::OrderComposition;
use lru::LruCache;
use uuid::Uuid;

/// Order compositions keyed by the waiter and their client-chosen
/// composition id, so repeated taps on one order screen reach the same
/// single-flight instance and another waiter's id never collides with it.
///
/// Bounded: the least recently used composition is forgotten first.
pub struct CompositionRegistry {
    catalog: Arc<dyn CatalogStore>,
    orders: Arc<dyn OrderStore>,
    cache: Mutex<LruCache<(String, Uuid), Arc<OrderComposition>>>,
}

impl CompositionRegistry {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        orders: Arc<dyn OrderStore>,
        capacity: usize,
    ) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            catalog,
            orders,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get_or_create(&self, user: &User, id: Uuid) -> Arc<OrderComposition> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache
            .get_or_insert((user.id.clone(), id), || {
                Arc::new(OrderComposition::new(
                    self.catalog.clone(),
                    self.orders.clone(),
                ))
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
