use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Price, SizeCode};
use crate::storage::AssetRef;

/// Kitchen status of an order. Only the initial state is written here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Preparing,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preparing => "preparing",
        }
    }
}

/// A table order ready to be written. Name, price and image are copies taken
/// from the product when the order was composed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub pizza_name: String,
    pub size: SizeCode,
    pub quantity: u32,
    pub table_number: String,
    pub amount: Price,
    pub status: OrderStatus,
    pub waiter_id: String,
    pub image_ref: AssetRef,
    pub created_at: DateTime<Utc>,
}

/// Reference to a stored order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderRef {
    pub id: Uuid,
}

/// What the waiter filled in on the order screen, unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrderSelection {
    /// Size code as chosen, `None` until the waiter picks one.
    pub size: Option<String>,
    pub quantity: i64,
    pub table_number: String,
}
