//! Imovel Core Library
//!
//! Shared domain types for the image asset service: configuration, the
//! unified error type, asset naming, and API response models.

pub mod asset;
pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use asset::{AssetName, ImageExtension};
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
