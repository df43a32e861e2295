//! API response models

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Compressed WebP companion of an uploaded image
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebpDerivative {
    pub filename: String,
    pub url: String,
}

/// Record returned for each accepted file of an upload request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    /// Generated filename of the stored original
    pub filename: String,
    /// Filename as supplied by the client
    pub original_name: String,
    /// Size of the original in bytes
    pub size: u64,
    /// Public URL of the stored original
    pub url: String,
    pub webp: WebpDerivative,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub files: Vec<UploadedImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Public wire contract: camelCase keys, nested webp record.
    #[test]
    fn test_uploaded_image_wire_shape() {
        let record = UploadedImage {
            filename: "image-1700000000000-1.jpg".to_string(),
            original_name: "casa fachada.jpg".to_string(),
            size: 123_456,
            url: "/uploads/images/image-1700000000000-1.jpg".to_string(),
            webp: WebpDerivative {
                filename: "image-1700000000000-1.webp".to_string(),
                url: "/uploads/images/image-1700000000000-1.webp".to_string(),
            },
        };
        let json = serde_json::to_value(&record).expect("serialize");
        assert!(json.get("originalName").is_some());
        assert!(json.get("original_name").is_none());
        assert!(json["webp"].get("filename").is_some());
    }
}
