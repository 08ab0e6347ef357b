use domain::User;
use domain::service::{Capability, Destination};
use serde::Serialize;
use uuid::Uuid;

/// Where a navigation action leads.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DestinationResponse {
    /// One of `place_order`, `manage_product`, `new_product`.
    #[schema(example = "place_order")]
    pub kind: &'static str,
    /// Target catalog entry, absent for `new_product`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
}

impl From<Destination> for DestinationResponse {
    fn from(destination: Destination) -> Self {
        match destination {
            Destination::PlaceOrder(id) => Self {
                kind: "place_order",
                id: Some(id),
            },
            Destination::ManageProduct(id) => Self {
                kind: "manage_product",
                id: Some(id),
            },
            Destination::NewProduct => Self {
                kind: "new_product",
                id: None,
            },
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CapabilitiesResponse {
    pub user_id: String,
    pub name: String,
    #[schema(example = "waiter")]
    pub role: &'static str,
    /// Subset of `browse_and_order`, `manage_catalog`.
    pub capabilities: Vec<&'static str>,
    /// The "new product" action, only present for catalog managers.
    pub new_product: Option<DestinationResponse>,
}

impl CapabilitiesResponse {
    pub fn new(
        user: &User,
        capabilities: Vec<Capability>,
        new_product: Option<Destination>,
    ) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            role: user.role.as_str(),
            capabilities: capabilities
                .into_iter()
                .map(|c| match c {
                    Capability::BrowseAndOrder => "browse_and_order",
                    Capability::ManageCatalog => "manage_catalog",
                })
                .collect(),
            new_product: new_product.map(Into::into),
        }
    }
}
