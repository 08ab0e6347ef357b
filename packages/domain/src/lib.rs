pub mod catalog;
pub mod config;
pub mod error;
pub mod memory;
pub mod order;
pub mod ports;
pub mod service;
pub mod storage;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::{CatalogEntry, NewCatalogEntry, Price, ProductDraft, SizeCode, SizePrices};
pub use config::CatalogConfig;
pub use error::{DomainError, StoreError, Violation, Violations};
pub use order::{NewOrder, OrderRef, OrderSelection, OrderStatus};
pub use user::{Role, User};
