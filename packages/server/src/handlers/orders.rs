use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use domain::service::quote;
use domain::{DomainError, SizeCode, Violation, Violations};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::order::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/quote",
    tag = "Orders",
    operation_id = "quoteOrder",
    summary = "Price an order before submitting it",
    description = "Returns `price[size] * quantity`. Without a size, or with quantity 0 (the \
        order screen's starting state), the amount is zero. Negative quantities are rejected.",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Amount for the selection", body = QuoteResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Product not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(product_id = %payload.product_id))]
pub async fn quote_order(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let mut violations = Violations::new();

    let size = match payload.size.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<SizeCode>() {
            Ok(size) => Some(size),
            Err(violation) => {
                violations.push(violation);
                None
            }
        },
    };
    let quantity = u32::try_from(payload.quantity).ok();
    if quantity.is_none() {
        violations.push(Violation::QuantityInvalid);
    }
    let quantity = violations.into_result(quantity.unwrap_or_default())?;

    let product = state.products.get(payload.product_id).await?;
    let amount = quote(&product, size, quantity)
        .map_err(|violation| DomainError::Validation(Violations::from_iter([violation])))?;
    Ok(Json(QuoteResponse::new(payload, amount)))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Orders",
    operation_id = "submitOrder",
    summary = "Submit a table order",
    description = "Validates size, quantity and table number together, then writes the order \
        with status `preparing`. Submissions sharing a `composition_id` go through at most \
        once: a repeat while the first is in flight gets `SUBMISSION_IN_FLIGHT`, a repeat \
        after it succeeded gets `ALREADY_SUBMITTED`.",
    request_body = SubmitOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderCreatedResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Product not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate submission (SUBMISSION_IN_FLIGHT, ALREADY_SUBMITTED)", body = ErrorBody),
        (status = 503, description = "Order could not be saved, retry (PERSISTENCE_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(
    skip(state, auth_user, payload),
    fields(composition_id = %payload.composition_id, product_id = %payload.product_id)
)]
pub async fn submit_order(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SubmitOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let composition = state
        .compositions
        .get_or_create(auth_user.user(), payload.composition_id);
    let product = composition.load(payload.product_id).await?;
    let order = composition
        .submit(auth_user.user(), &product, &payload.selection())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderCreatedResponse {
            id: order.id,
            composition_id: payload.composition_id,
        }),
    ))
}
