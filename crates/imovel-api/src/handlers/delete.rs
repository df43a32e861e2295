//! Image delete handler
//!
//! The filename must parse as a generated asset name before the filesystem
//! is touched; the storage layer then re-checks path containment. The WebP
//! companion is removed best-effort since it may never have been produced.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use imovel_core::models::DeleteResponse;
use imovel_core::AssetName;

use crate::error::{ErrorBody, HttpAppError};
use crate::state::AppState;

/// Delete an uploaded image and its WebP companion
#[utoipa::path(
    delete,
    path = "/api/upload/images/{filename}",
    tag = "upload",
    params(
        ("filename" = String, Path, description = "Generated filename of the stored image")
    ),
    responses(
        (status = 200, description = "Image deleted", body = DeleteResponse),
        (status = 400, description = "Invalid filename or path", body = ErrorBody),
        (status = 404, description = "Image not found", body = ErrorBody),
        (status = 500, description = "Unexpected deletion error", body = ErrorBody)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(filename = %filename, operation = "delete_image")
)]
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<DeleteResponse>, HttpAppError> {
    let name = AssetName::parse(&filename)?;

    state.store.delete(&name.filename()).await?;

    // The derivative may legitimately be missing if conversion never ran;
    // when the original was a WebP the two share one file and it is already
    // gone at this point.
    state
        .store
        .delete_if_exists(&name.derivative_filename())
        .await;

    tracing::info!(filename = %name.filename(), "Image deleted");

    Ok(Json(DeleteResponse {
        success: true,
        message: format!("{} deleted", name.filename()),
    }))
}
