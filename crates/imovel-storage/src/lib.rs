//! Local filesystem storage for uploaded images
//!
//! The upload directory is the sole owner of image bytes. All access goes
//! through [`ImageStore`], which enforces path containment, and freshly
//! written files are wrapped in a [`StagedFile`] guard that removes them
//! again unless the caller commits.

mod local;

use thiserror::Error;

pub use local::{ImageStore, StagedFile};

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create storage directory: {0}")]
    CreateDirFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Path resolves outside the storage directory: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
