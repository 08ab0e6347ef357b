//! Role-based decisions about which actions a user can reach.

use serde::Serialize;
use uuid::Uuid;

use crate::catalog::CatalogEntry;
use crate::error::DomainError;
use crate::user::{Role, User};

/// Where opening a catalog entry (or the "new product" action) leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Destination {
    PlaceOrder(Uuid),
    ManageProduct(Uuid),
    NewProduct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    BrowseAndOrder,
    ManageCatalog,
}

/// The single predicate gating every catalog mutation.
pub fn can_manage_catalog(user: &User) -> bool {
    user.role == Role::Admin
}

pub fn require_catalog_manager(user: &User) -> Result<(), DomainError> {
    if can_manage_catalog(user) {
        Ok(())
    } else {
        Err(DomainError::Unauthorized)
    }
}

pub fn resolve_open_destination(user: &User, entry: &CatalogEntry) -> Destination {
    if can_manage_catalog(user) {
        Destination::ManageProduct(entry.id())
    } else {
        Destination::PlaceOrder(entry.id())
    }
}

/// The "new product" action, absent for anyone who cannot manage the catalog.
pub fn new_product_destination(user: &User) -> Option<Destination> {
    can_manage_catalog(user).then_some(Destination::NewProduct)
}

pub fn capabilities(user: &User) -> Vec<Capability> {
    let mut granted = vec![Capability::BrowseAndOrder];
    if can_manage_catalog(user) {
        granted.push(Capability::ManageCatalog);
    }
    granted
}
