//! Asset naming
//!
//! `AssetName` is the single owner of the generated-filename scheme used by
//! both the upload and delete paths: generation, parsing, and derivative
//! naming all live here so the two paths can never drift apart. The name
//! doubles as a security control: anything that does not parse is rejected
//! before the filesystem is touched.

use std::fmt;
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use crate::error::AppError;

/// Exact shape of a generated asset filename: `image-<digits>-<digits>.<ext>`,
/// extension case-insensitive. Anchored so no path separators or traversal
/// sequences can survive a successful parse.
static ASSET_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(image-\d+-\d+)\.(jpe?g|png|gif|webp)$").expect("valid asset name regex")
});

/// Image file extensions accepted by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageExtension {
    Jpg,
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageExtension {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "jpg" => Some(ImageExtension::Jpg),
            "jpeg" => Some(ImageExtension::Jpeg),
            "png" => Some(ImageExtension::Png),
            "gif" => Some(ImageExtension::Gif),
            "webp" => Some(ImageExtension::Webp),
            _ => None,
        }
    }

    /// Map a declared content type to an extension. This is the coarse
    /// first-pass filter; actual bytes are verified later in the pipeline.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type.to_lowercase().as_str() {
            "image/jpeg" => Some(ImageExtension::Jpeg),
            "image/jpg" => Some(ImageExtension::Jpg),
            "image/png" => Some(ImageExtension::Png),
            "image/gif" => Some(ImageExtension::Gif),
            "image/webp" => Some(ImageExtension::Webp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageExtension::Jpg => "jpg",
            ImageExtension::Jpeg => "jpeg",
            ImageExtension::Png => "png",
            ImageExtension::Gif => "gif",
            ImageExtension::Webp => "webp",
        }
    }
}

/// A validated asset name: `image-<unix_ms>-<random>.<ext>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetName {
    stem: String,
    extension: ImageExtension,
}

impl AssetName {
    /// Generate a fresh unique name for an accepted upload.
    pub fn generate(extension: ImageExtension) -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
        AssetName {
            stem: format!("image-{millis}-{suffix}"),
            extension,
        }
    }

    /// Parse and validate a client-supplied filename.
    pub fn parse(filename: &str) -> Result<Self, AppError> {
        let captures = ASSET_NAME_RE
            .captures(filename)
            .ok_or_else(|| AppError::InvalidFilename(filename.to_string()))?;
        let stem = captures[1].to_string();
        let extension = ImageExtension::parse(&captures[2])
            .ok_or_else(|| AppError::InvalidFilename(filename.to_string()))?;
        Ok(AssetName { stem, extension })
    }

    /// Full filename of the original file
    pub fn filename(&self) -> String {
        format!("{}.{}", self.stem, self.extension.as_str())
    }

    /// Filename of the compressed WebP companion: same stem, `.webp`
    pub fn derivative_filename(&self) -> String {
        format!("{}.webp", self.stem)
    }

    /// True when the original already carries the derivative extension, in
    /// which case the derivative overwrites the original in place.
    pub fn derivative_shadows_original(&self) -> bool {
        self.extension == ImageExtension::Webp
    }
}

impl fmt::Display for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.filename())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_round_trips_through_parse() {
        let name = AssetName::generate(ImageExtension::Png);
        let parsed = AssetName::parse(&name.filename()).unwrap();
        assert_eq!(parsed, name);
    }

    #[test]
    fn test_parse_valid_names() {
        for filename in [
            "image-1700000000000-123456789.jpg",
            "image-1700000000000-123456789.jpeg",
            "image-1-2.png",
            "image-42-7.gif",
            "image-42-7.webp",
            "image-42-7.WEBP",
            "IMAGE-42-7.JPG",
        ] {
            assert!(AssetName::parse(filename).is_ok(), "expected ok: {filename}");
        }
    }

    #[test]
    fn test_parse_rejects_bad_names() {
        for filename in [
            "",
            "image.jpg",
            "image-1-2.bmp",
            "image-1-2.svg",
            "image-1-2",
            "image-1-2.jpg.exe",
            "photo-1-2.jpg",
            "image-a-2.jpg",
            "image-1-2.jpg ",
            "../image-1-2.jpg",
            "../../etc/passwd.png",
            "image-1-2/../../secret.png",
            "uploads/image-1-2.jpg",
        ] {
            assert!(
                matches!(AssetName::parse(filename), Err(AppError::InvalidFilename(_))),
                "expected rejection: {filename}"
            );
        }
    }

    #[test]
    fn test_derivative_shares_stem() {
        let name = AssetName::parse("image-1700000000000-555.jpg").unwrap();
        assert_eq!(
            name.derivative_filename(),
            "image-1700000000000-555.webp"
        );
        assert!(!name.derivative_shadows_original());
    }

    #[test]
    fn test_webp_original_shadowed_by_derivative() {
        let name = AssetName::parse("image-5-5.webp").unwrap();
        assert_eq!(name.filename(), name.derivative_filename());
        assert!(name.derivative_shadows_original());
    }

    #[test]
    fn test_generated_names_are_unique() {
        let a = AssetName::generate(ImageExtension::Jpeg);
        let b = AssetName::generate(ImageExtension::Jpeg);
        assert_ne!(a.filename(), b.filename());
    }
}
