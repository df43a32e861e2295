//! Image upload handler
//!
//! Receives multipart uploads under the `images` field and runs each file
//! through the validated pipeline: persist, signature check, structural
//! check, WebP derivative. The batch is all-or-nothing: a failure on any
//! file drops every staged guard, which removes every file this request
//! wrote to disk.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;

use imovel_core::models::{UploadResponse, UploadedImage, WebpDerivative};
use imovel_core::{AppError, AssetName, ImageExtension};
use imovel_processing::{convert, signature, validate};
use imovel_storage::StagedFile;

use crate::error::{ErrorBody, HttpAppError};
use crate::state::AppState;

/// Multipart form field carrying the image files
const UPLOAD_FIELD: &str = "images";

struct IncomingFile {
    original_name: String,
    extension: ImageExtension,
    data: Bytes,
}

/// Upload one or more images
///
/// Every file must pass the declared-MIME filter, the magic-byte signature
/// check, and structural validation, and must convert to WebP, or the whole
/// request is rejected with nothing left on disk.
#[utoipa::path(
    post,
    path = "/api/upload/images",
    tag = "upload",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "All images uploaded", body = UploadResponse),
        (status = 400, description = "No files, validation failure, or processing failure", body = ErrorBody),
        (status = 413, description = "File too large", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_images"))]
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let incoming = collect_files(&state, multipart).await?;
    if incoming.is_empty() {
        return Err(AppError::NoFilesProvided.into());
    }

    // Guards for every file written during this request. Returning early
    // drops them all, removing each file from disk. Multipart fields arrive
    // sequentially, so files are processed in order; no ordering is promised.
    let mut staged: Vec<StagedFile> = Vec::new();
    let mut accepted: Vec<UploadedImage> = Vec::new();

    for file in incoming {
        let record = process_file(&state, file, &mut staged).await?;
        accepted.push(record);
    }

    for file in staged {
        file.commit();
    }

    tracing::info!(count = accepted.len(), "Upload request accepted");

    Ok(Json(UploadResponse {
        success: true,
        message: format!("{} image(s) uploaded successfully", accepted.len()),
        files: accepted,
    }))
}

/// A body read can fail because the whole-request body limit tripped mid
/// stream; that case is a 413, everything else is a malformed body.
fn read_error(e: MultipartError, what: &str) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Request body exceeds the upload limit while reading {what}"
        ))
    } else {
        AppError::InvalidInput(format!("Failed to read {what}: {e}"))
    }
}

/// Drain the multipart stream, applying the coarse first-pass filters:
/// field name, declared content type, per-file size, file count.
async fn collect_files(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<Vec<IncomingFile>, HttpAppError> {
    let max_files = state.config.max_files_per_upload;
    let max_bytes = state.config.max_file_size_bytes;
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| read_error(e, "the multipart body"))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        if files.len() >= max_files {
            return Err(
                AppError::InvalidInput(format!("At most {max_files} files per upload")).into(),
            );
        }

        let original_name = field
            .file_name()
            .unwrap_or("unnamed")
            .to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let extension = ImageExtension::from_content_type(&content_type).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Unsupported content type '{content_type}' for {original_name}"
            ))
        })?;

        let data = field
            .bytes()
            .await
            .map_err(|e| read_error(e, &original_name))?;

        if data.is_empty() {
            return Err(AppError::InvalidInput(format!("{original_name} is empty")).into());
        }
        if data.len() > max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "{original_name}: {} bytes exceeds the {max_bytes} byte limit",
                data.len()
            ))
            .into());
        }

        files.push(IncomingFile {
            original_name,
            extension,
            data,
        });
    }

    Ok(files)
}

/// Run one file through the strictly ordered pipeline. Both the original and
/// the derivative are pushed onto `staged`; an error at any step leaves the
/// guards to clean up.
async fn process_file(
    state: &AppState,
    file: IncomingFile,
    staged: &mut Vec<StagedFile>,
) -> Result<UploadedImage, HttpAppError> {
    let name = AssetName::generate(file.extension);
    let filename = name.filename();
    let size = file.data.len() as u64;

    // Step 1: persist the original under its generated name
    let original = state.store.persist(&filename, &file.data).await?;

    // Step 2: magic-byte signature check against the stored file
    if !signature::check_file(original.path()).await {
        staged.push(original);
        return Err(AppError::InvalidSignature(file.original_name).into());
    }

    // Step 3: structural validation (decode off the async pool)
    let max_dimension = state.config.max_image_dimension;
    let validate_data = file.data.clone();
    let info = tokio::task::spawn_blocking(move || {
        validate::validate_bytes(&validate_data, max_dimension)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Validation task failed: {e}")))?;

    let info = match info {
        Ok(info) => info,
        Err(e) => {
            staged.push(original);
            return Err(
                AppError::InvalidImage(format!("{}: {}", file.original_name, e)).into(),
            );
        }
    };

    tracing::debug!(
        filename = %filename,
        width = info.width,
        height = info.height,
        format = ?info.format,
        "Image validated"
    );

    // Step 4: WebP derivative (resize + encode), written alongside
    let webp_result = convert::convert(
        file.data.to_vec(),
        state.config.webp_max_width,
        state.config.webp_quality,
    )
    .await;

    let webp_bytes = match webp_result {
        Ok(bytes) => bytes,
        Err(e) => {
            staged.push(original);
            return Err(
                AppError::ProcessingFailed(format!("{}: {}", file.original_name, e)).into(),
            );
        }
    };

    let derivative_filename = name.derivative_filename();
    let derivative = match state.store.persist(&derivative_filename, &webp_bytes).await {
        Ok(guard) => guard,
        Err(e) => {
            staged.push(original);
            return Err(AppError::ProcessingFailed(e.to_string()).into());
        }
    };

    let record = UploadedImage {
        url: state.store.url_for(&filename),
        original_name: file.original_name,
        size,
        filename,
        webp: WebpDerivative {
            url: state.store.url_for(&derivative_filename),
            filename: derivative_filename,
        },
    };

    staged.push(original);
    staged.push(derivative);
    Ok(record)
}
