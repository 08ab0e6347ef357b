use std::path::PathBuf;

use axum::Json;
use axum::extract::multipart::Field;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use domain::storage::{LocalImage, PickedImage};
use domain::{ProductDraft, SizeCode};
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::catalog::CatalogEntryResponse;
use crate::state::AppState;

/// Room for the image plus the text fields of the form.
pub fn product_body_limit(max_image_bytes: u64) -> DefaultBodyLimit {
    let limit = usize::try_from(max_image_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(64 * 1024);
    DefaultBodyLimit::max(limit)
}

/// A parsed product form. The image, if any, is spooled to a temp file that
/// must be released with [`ProductForm::cleanup`].
struct ProductForm {
    draft: ProductDraft,
    spooled: Option<PathBuf>,
}

impl ProductForm {
    async fn cleanup(self) {
        if let Some(path) = self.spooled {
            // Best effort.
            let _ = tokio::fs::remove_file(&path).await;
        }
    }
}

async fn read_product_form(
    mut multipart: Multipart,
    max_image_bytes: u64,
) -> Result<ProductForm, AppError> {
    let mut form = ProductForm {
        draft: ProductDraft::default(),
        spooled: None,
    };

    let result = async {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match name.as_str() {
                "name" => form.draft.name = field_text(field).await?,
                "description" => form.draft.description = field_text(field).await?,
                "image" => {
                    let picked = spool_image(field, max_image_bytes).await?;
                    if let PickedImage::Selected(LocalImage::File(path)) = &picked
                        && let Some(old) = form.spooled.replace(path.clone())
                    {
                        let _ = tokio::fs::remove_file(old).await;
                    }
                    form.draft.apply_pick(picked);
                }
                other => match SizeCode::ALL.into_iter().find(|s| s.price_field() == other) {
                    Some(size) => form.draft.set_price(size, field_text(field).await?),
                    None => {} // Ignore unknown fields.
                },
            }
        }
        Ok::<(), AppError>(())
    }
    .await;

    match result {
        Ok(()) => Ok(form),
        Err(e) => {
            form.cleanup().await;
            Err(e)
        }
    }
}

async fn field_text(field: Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or_default().to_string();
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))
}

/// Stream an uploaded image to a temp file. An empty file part is treated as
/// a cancelled pick.
async fn spool_image(mut field: Field<'_>, max_size: u64) -> Result<PickedImage, AppError> {
    let temp_path = std::env::temp_dir().join(format!("pizzeria-upload-{}", Uuid::new_v4()));

    let result = async {
        let mut temp_file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;

        let mut total_size: u64 = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        {
            total_size += chunk.len() as u64;
            if total_size > max_size {
                return Err(AppError::Validation(format!(
                    "Image exceeds maximum size of {max_size} bytes"
                )));
            }
            temp_file
                .write_all(&chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Temp file write failed: {e}")))?;
        }

        temp_file
            .flush()
            .await
            .map_err(|e| AppError::Internal(format!("Temp file flush failed: {e}")))?;

        Ok(total_size)
    }
    .await;

    match result {
        Ok(size) if size > 0 => Ok(PickedImage::Selected(LocalImage::File(temp_path))),
        other => {
            let _ = tokio::fs::remove_file(&temp_path).await;
            other.map(|_| PickedImage::Cancelled)
        }
    }
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Products",
    operation_id = "createProduct",
    summary = "Create a catalog entry",
    description = "Multipart form with `name`, `description` (at most 60 characters), `price_P`, \
        `price_M`, `price_G` (positive amounts such as `42`, `42.50` or `42,50`) and the file \
        field `image`. All problems are reported together. The image is stored before the \
        record is written. Requires the admin role.",
    request_body(content_type = "multipart/form-data", description = "Product form with image"),
    responses(
        (status = 201, description = "Entry created", body = CatalogEntryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 503, description = "Storage failed, retry (PERSISTENCE_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user = %auth_user.user().id))]
pub async fn create_product(
    auth_user: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_catalog_manager()?;

    let form = read_product_form(multipart, state.config.catalog.max_image_bytes).await?;
    let result = state.products.create(auth_user.user(), &form.draft).await;
    form.cleanup().await;

    let entry = result?;
    Ok((
        StatusCode::CREATED,
        Json(CatalogEntryResponse::new(&entry, &*state.assets)),
    ))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    operation_id = "updateProduct",
    summary = "Replace a catalog entry",
    description = "Same form and rules as create. A new image is always stored; the previous \
        image is removed afterwards when possible. Requires the admin role.",
    params(("id" = Uuid, Path, description = "Catalog entry ID")),
    request_body(content_type = "multipart/form-data", description = "Product form with image"),
    responses(
        (status = 200, description = "Entry updated", body = CatalogEntryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Entry not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "Storage failed, retry (PERSISTENCE_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user = %auth_user.user().id))]
pub async fn update_product(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<CatalogEntryResponse>, AppError> {
    auth_user.require_catalog_manager()?;

    let form = read_product_form(multipart, state.config.catalog.max_image_bytes).await?;
    let result = state.products.update(auth_user.user(), id, &form.draft).await;
    form.cleanup().await;

    let entry = result?;
    Ok(Json(CatalogEntryResponse::new(&entry, &*state.assets)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    operation_id = "deleteProduct",
    summary = "Delete a catalog entry",
    description = "Removes the image first and the record only after that succeeded. If the image \
        cannot be removed the entry stays in the catalog and the request can be retried. \
        Requires the admin role.",
    params(("id" = Uuid, Path, description = "Catalog entry ID")),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Entry not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "Storage failed, retry (PERSISTENCE_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user = %auth_user.user().id))]
pub async fn delete_product(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    auth_user.require_catalog_manager()?;

    state.products.delete(auth_user.user(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
