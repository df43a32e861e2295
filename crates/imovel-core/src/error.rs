//! Error types module
//!
//! All errors surfaced to clients are unified under the `AppError` enum.
//! The `ErrorMetadata` trait lets each error self-describe how it should be
//! presented over HTTP (status code, machine-readable code, client message,
//! log level) so handlers never hand-roll status mapping.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for suspicious but handled conditions
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "invalid_signature")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details must be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No files were provided")]
    NoFilesProvided,

    #[error("File signature does not match a supported image format: {0}")]
    InvalidSignature(String),

    #[error("File is not a valid image: {0}")]
    InvalidImage(String),

    #[error("Image processing failed: {0}")]
    ProcessingFailed(String),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to create upload directory: {0}")]
    DirectoryCreateFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error: {message}")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::NoFilesProvided
            | AppError::InvalidSignature(_)
            | AppError::InvalidImage(_)
            | AppError::ProcessingFailed(_)
            | AppError::InvalidFilename(_)
            | AppError::InvalidPath(_)
            | AppError::InvalidInput(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::PayloadTooLarge(_) => 413,
            AppError::DirectoryCreateFailed(_)
            | AppError::Internal(_)
            | AppError::InternalWithSource { .. } => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::NoFilesProvided => "no_files_provided",
            AppError::InvalidSignature(_) => "invalid_signature",
            AppError::InvalidImage(_) => "invalid_image",
            AppError::ProcessingFailed(_) => "processing_failed",
            AppError::InvalidFilename(_) => "invalid_filename",
            AppError::InvalidPath(_) => "invalid_path",
            AppError::NotFound(_) => "not_found",
            AppError::DirectoryCreateFailed(_) => "directory_create_failed",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::PayloadTooLarge(_) => "payload_too_large",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        if self.is_sensitive() {
            // Never leak filesystem paths or internal details to clients
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }

    fn is_sensitive(&self) -> bool {
        matches!(
            self,
            AppError::DirectoryCreateFailed(_)
                | AppError::Internal(_)
                | AppError::InternalWithSource { .. }
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::NoFilesProvided
            | AppError::InvalidSignature(_)
            | AppError::InvalidImage(_)
            | AppError::InvalidFilename(_)
            | AppError::NotFound(_)
            | AppError::InvalidInput(_)
            | AppError::PayloadTooLarge(_) => LogLevel::Debug,
            AppError::ProcessingFailed(_) | AppError::InvalidPath(_) => LogLevel::Warn,
            AppError::DirectoryCreateFailed(_)
            | AppError::Internal(_)
            | AppError::InternalWithSource { .. } => LogLevel::Error,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_taxonomy() {
        assert_eq!(AppError::NoFilesProvided.http_status_code(), 400);
        assert_eq!(
            AppError::InvalidSignature("a.png".into()).http_status_code(),
            400
        );
        assert_eq!(AppError::NotFound("x".into()).http_status_code(), 404);
        assert_eq!(
            AppError::PayloadTooLarge("6MB".into()).http_status_code(),
            413
        );
        assert_eq!(
            AppError::DirectoryCreateFailed("uploads".into()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_sensitive_errors_hide_details() {
        let err = AppError::Internal("/var/data/uploads/images exploded".into());
        assert_eq!(err.client_message(), "Internal server error");
        assert!(err.is_sensitive());
    }

    #[test]
    fn test_validation_errors_keep_message() {
        let err = AppError::InvalidFilename("../../etc/passwd".into());
        assert!(err.client_message().contains("Invalid filename"));
        assert_eq!(err.log_level(), LogLevel::Debug);
    }
}
