//! Image processing for the asset pipeline
//!
//! Three stages, applied in order by the upload handler:
//! 1. [`signature`] - magic-byte sniffing of the stored file
//! 2. [`validate`] - structural decode check with a dimension cap
//! 3. [`convert`] - width-capped resize and WebP encoding

pub mod convert;
pub mod signature;
pub mod validate;

pub use validate::{ImageInfo, ValidationError};
