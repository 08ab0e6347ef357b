use domain::{OrderSelection, Price};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct QuoteRequest {
    pub product_id: Uuid,
    /// Size code (`P`, `M`, `G`). Absent until the waiter picks one.
    #[schema(example = "M")]
    pub size: Option<String>,
    #[schema(example = 3)]
    pub quantity: i64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct QuoteResponse {
    pub product_id: Uuid,
    pub size: Option<String>,
    pub quantity: i64,
    #[schema(example = 12600)]
    pub amount_cents: u64,
    #[schema(example = "126.00")]
    pub amount: String,
}

impl QuoteResponse {
    pub fn new(request: QuoteRequest, amount: Price) -> Self {
        Self {
            product_id: request.product_id,
            size: request.size,
            quantity: request.quantity,
            amount_cents: amount.cents(),
            amount: amount.to_string(),
        }
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SubmitOrderRequest {
    /// Client-generated id of the order screen; repeated submissions with
    /// the same id are rejected while one is in flight or after one succeeded.
    pub composition_id: Uuid,
    pub product_id: Uuid,
    #[schema(example = "M")]
    pub size: Option<String>,
    #[schema(example = 3)]
    #[serde(default)]
    pub quantity: i64,
    #[schema(example = "12")]
    #[serde(default)]
    pub table_number: String,
}

impl SubmitOrderRequest {
    pub fn selection(&self) -> OrderSelection {
        OrderSelection {
            size: self.size.clone(),
            quantity: self.quantity,
            table_number: self.table_number.clone(),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct OrderCreatedResponse {
    pub id: Uuid,
    pub composition_id: Uuid,
}
