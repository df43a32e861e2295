//! Structural image validation
//!
//! Catches files that carry a legitimate signature but are corrupted or
//! hostile: the header is decoded for format and dimensions, and extreme
//! dimensions (decompression-bomb style) are rejected before any full decode
//! happens downstream.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

/// Decoded formats the pipeline accepts
const ALLOWED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Image could not be decoded: {0}")]
    Undecodable(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Image dimensions {width}x{height} outside allowed range 1..={max}")]
    BadDimensions { width: u32, height: u32, max: u32 },
}

/// Metadata extracted during validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

/// Validate image bytes structurally. Every decoder failure is a rejection,
/// never a propagated panic.
pub fn validate_bytes(data: &[u8], max_dimension: u32) -> Result<ImageInfo, ValidationError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ValidationError::Undecodable(e.to_string()))?;

    let format = reader
        .format()
        .ok_or_else(|| ValidationError::UnsupportedFormat("unknown".to_string()))?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(ValidationError::UnsupportedFormat(format!("{format:?}")));
    }

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ValidationError::Undecodable(e.to_string()))?;

    if width < 1 || height < 1 || width > max_dimension || height > max_dimension {
        return Err(ValidationError::BadDimensions {
            width,
            height,
            max: max_dimension,
        });
    }

    Ok(ImageInfo {
        width,
        height,
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode_test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([40, 90, 160, 255]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
        buffer
    }

    #[test]
    fn test_valid_png() {
        let data = encode_test_image(64, 48, ImageFormat::Png);
        let info = validate_bytes(&data, 20_000).unwrap();
        assert_eq!(info.width, 64);
        assert_eq!(info.height, 48);
        assert_eq!(info.format, ImageFormat::Png);
    }

    #[test]
    fn test_valid_gif() {
        let data = encode_test_image(10, 10, ImageFormat::Gif);
        let info = validate_bytes(&data, 20_000).unwrap();
        assert_eq!(info.format, ImageFormat::Gif);
    }

    #[test]
    fn test_garbage_rejected() {
        let result = validate_bytes(b"definitely not an image", 20_000);
        assert!(matches!(
            result,
            Err(ValidationError::UnsupportedFormat(_)) | Err(ValidationError::Undecodable(_))
        ));
    }

    #[test]
    fn test_truncated_png_rejected() {
        let mut data = encode_test_image(64, 48, ImageFormat::Png);
        data.truncate(12); // signature survives, header does not
        assert!(validate_bytes(&data, 20_000).is_err());
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let data = encode_test_image(300, 20, ImageFormat::Png);
        let result = validate_bytes(&data, 200);
        assert!(matches!(
            result,
            Err(ValidationError::BadDimensions {
                width: 300,
                height: 20,
                max: 200
            })
        ));
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let data = encode_test_image(8, 8, ImageFormat::Bmp);
        assert!(matches!(
            validate_bytes(&data, 20_000),
            Err(ValidationError::UnsupportedFormat(_))
        ));
    }
}
