use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pizza_order")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Copied from the pizza at order time.
    pub pizza_name: String,

    /// Size code: "P", "M" or "G".
    pub size: String,

    pub quantity: i32,
    pub table_number: String,

    /// Total in cents.
    pub amount: i64,

    pub status: String,
    pub waiter_id: String,

    /// Copied from the pizza at order time.
    pub image_ref: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
