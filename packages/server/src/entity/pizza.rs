use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pizza")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    /// Lowercased, trimmed `name`; the search key.
    pub normalized_name: String,

    pub description: String,

    /// Prices in cents, one column per size tier.
    pub price_small: i64,
    pub price_medium: i64,
    pub price_large: i64,

    /// Serialized asset reference (`{path}#{sha256}`).
    pub image_ref: String,

    pub image_asset_path: String,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
