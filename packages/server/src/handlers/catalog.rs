use axum::Json;
use axum::extract::{Path, Query, State};
use domain::catalog::normalize;
use domain::service::resolve_open_destination;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::catalog::*;
use crate::models::me::DestinationResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Catalog",
    operation_id = "searchCatalog",
    summary = "Search the catalog by name prefix",
    description = "Returns every pizza whose lowercased name starts with the lowercased, trimmed \
        query, ordered by name. An absent or blank query returns the full catalog.",
    params(CatalogSearchQuery),
    responses(
        (status = 200, description = "Matching entries", body = CatalogListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "Catalog query failed, retry (QUERY_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, query), fields(q = query.q.as_deref().unwrap_or("")))]
pub async fn search_catalog(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<CatalogSearchQuery>,
) -> Result<Json<CatalogListResponse>, AppError> {
    let q = query.q.unwrap_or_default();
    let entries = state.search.search(&q).await?;
    Ok(Json(CatalogListResponse::new(
        &entries,
        normalize(&q),
        &*state.assets,
    )))
}

#[utoipa::path(
    post,
    path = "/clear",
    tag = "Catalog",
    operation_id = "clearCatalogSearch",
    summary = "Clear the search",
    description = "Returns the full catalog ordered by name; identical to searching with an empty query.",
    responses(
        (status = 200, description = "Full catalog", body = CatalogListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "Catalog query failed, retry (QUERY_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn clear_search(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<CatalogListResponse>, AppError> {
    let entries = state.search.clear().await?;
    Ok(Json(CatalogListResponse::new(
        &entries,
        String::new(),
        &*state.assets,
    )))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Catalog",
    operation_id = "getCatalogEntry",
    summary = "Get a catalog entry by ID",
    params(("id" = Uuid, Path, description = "Catalog entry ID")),
    responses(
        (status = 200, description = "Catalog entry", body = CatalogEntryResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Entry not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_entry(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CatalogEntryResponse>, AppError> {
    let entry = state.products.get(id).await?;
    Ok(Json(CatalogEntryResponse::new(&entry, &*state.assets)))
}

#[utoipa::path(
    get,
    path = "/{id}/open",
    tag = "Catalog",
    operation_id = "openCatalogEntry",
    summary = "Resolve where opening an entry leads",
    description = "Catalog managers are sent to `manage_product`, everyone else to `place_order`.",
    params(("id" = Uuid, Path, description = "Catalog entry ID")),
    responses(
        (status = 200, description = "Destination for the caller", body = DestinationResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Entry not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user = %auth_user.user().id))]
pub async fn open_entry(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DestinationResponse>, AppError> {
    let entry = state.products.get(id).await?;
    Ok(Json(
        resolve_open_destination(auth_user.user(), &entry).into(),
    ))
}
