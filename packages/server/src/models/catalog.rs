use domain::CatalogEntry;
use domain::storage::AssetStore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Price of one size tier.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PriceResponse {
    /// Size code.
    #[schema(example = "M")]
    pub size: &'static str,
    #[schema(example = 4250)]
    pub cents: u64,
    /// Two-decimal rendering of `cents`.
    #[schema(example = "42.50")]
    pub amount: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CatalogEntryResponse {
    pub id: Uuid,
    #[schema(example = "Calabresa")]
    pub name: String,
    #[schema(example = "calabresa")]
    pub normalized_name: String,
    pub description: String,
    /// One price per size, in `P`, `M`, `G` order.
    pub prices: Vec<PriceResponse>,
    /// Where the product image can be downloaded.
    pub image_url: String,
    pub image_asset_path: String,
}

impl CatalogEntryResponse {
    pub fn new(entry: &CatalogEntry, assets: &dyn AssetStore) -> Self {
        Self {
            id: entry.id(),
            name: entry.name().to_string(),
            normalized_name: entry.normalized_name().to_string(),
            description: entry.description().to_string(),
            prices: entry
                .prices()
                .iter()
                .map(|(size, price)| PriceResponse {
                    size: size.code(),
                    cents: price.cents(),
                    amount: price.to_string(),
                })
                .collect(),
            image_url: assets.download_url(entry.image_ref()),
            image_asset_path: entry.image_asset_path().to_string(),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CatalogListResponse {
    pub data: Vec<CatalogEntryResponse>,
    /// Number of entries in `data`.
    pub count: usize,
    /// The normalized query; empty for the full listing.
    pub query: String,
}

impl CatalogListResponse {
    pub fn new(entries: &[CatalogEntry], query: String, assets: &dyn AssetStore) -> Self {
        Self {
            data: entries
                .iter()
                .map(|e| CatalogEntryResponse::new(e, assets))
                .collect(),
            count: entries.len(),
            query,
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct CatalogSearchQuery {
    /// Name prefix, case-insensitive. Absent or blank lists the whole catalog.
    pub q: Option<String>,
}
