//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. `AppError` and
//! the per-crate error types convert into `HttpAppError` so every failure
//! renders with the same status mapping, body shape, and logging.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use imovel_core::{AppError, ErrorMetadata, LogLevel};
use imovel_storage::StorageError;

/// Failure body: `{ success: false, message, error }`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    /// Human-readable message, safe to show to clients
    pub message: String,
    /// Machine-readable error code
    pub error: String,
}

/// Wrapper type for AppError to implement IntoResponse.
/// Needed because of the orphan rule: IntoResponse and AppError both live in
/// other crates.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::CreateDirFailed(msg) => AppError::DirectoryCreateFailed(msg),
            StorageError::NotFound(filename) => AppError::NotFound(filename),
            StorageError::InvalidPath(filename) => AppError::InvalidPath(filename),
            StorageError::WriteFailed(msg) | StorageError::DeleteFailed(msg) => {
                AppError::Internal(msg)
            }
            StorageError::IoError(e) => AppError::Internal(format!("IO error: {e}")),
        };
        HttpAppError(app)
    }
}

fn log_error(error: &AppError) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, code = code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, code = code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, code = code, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = Json(ErrorBody {
            success: false,
            message: app_error.client_message(),
            error: app_error.error_code().to_string(),
        });

        (status, body).into_response()
    }
}
