//! The catalog and order services.

mod gate;
mod locks;
mod order;
mod product;
mod search;

pub use gate::{
    Capability, Destination, can_manage_catalog, capabilities, new_product_destination,
    require_catalog_manager, resolve_open_destination,
};
pub use locks::{EntryGuard, EntryLocks};
pub use order::{OrderComposition, quote};
pub use product::ProductLifecycle;
pub use search::{CatalogSearch, CatalogView};
