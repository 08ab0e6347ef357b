use axum::Json;
use domain::service::{capabilities, new_product_destination};

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::me::CapabilitiesResponse;

#[utoipa::path(
    get,
    path = "/capabilities",
    tag = "Me",
    operation_id = "getCapabilities",
    summary = "What the current user can do",
    description = "Lists the caller's capabilities and, for catalog managers, the \"new product\" action.",
    responses(
        (status = 200, description = "Capabilities of the caller", body = CapabilitiesResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
pub async fn get_capabilities(auth_user: AuthUser) -> Result<Json<CapabilitiesResponse>, AppError> {
    let user = auth_user.user();
    Ok(Json(CapabilitiesResponse::new(
        user,
        capabilities(user),
        new_product_destination(user),
    )))
}
