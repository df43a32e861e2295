//! Configuration module
//!
//! Environment-driven configuration for the asset service. Every setting has
//! a sensible default so the service runs locally with an empty environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_UPLOAD_DIR: &str = "uploads/images";
const DEFAULT_MAX_FILES_PER_UPLOAD: usize = 10;
const DEFAULT_MAX_FILE_SIZE_MB: usize = 5;
const DEFAULT_MAX_IMAGE_DIMENSION: u32 = 20_000;
const DEFAULT_WEBP_MAX_WIDTH: u32 = 1920;
const DEFAULT_WEBP_QUALITY: f32 = 80.0;
const DEFAULT_REQUEST_LOG_CAPACITY: usize = 256;

/// Service configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    /// Directory that owns all uploaded image bytes
    pub upload_dir: PathBuf,
    /// Base URL prefix used to build public URLs for stored images. When it
    /// is a path (leading `/`) the service also serves the files there.
    pub public_base_url: String,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// Maximum number of files accepted per upload request
    pub max_files_per_upload: usize,
    /// Maximum size in bytes for a single uploaded file
    pub max_file_size_bytes: usize,
    /// Upper bound on decoded image width/height in pixels
    pub max_image_dimension: u32,
    /// Derivatives are resized down to this width (never upscaled)
    pub webp_max_width: u32,
    /// WebP encoding quality (0-100)
    pub webp_quality: f32,
    /// Number of request records kept in the in-memory request log
    pub request_log_capacity: usize,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let max_file_size_mb: usize = env_parse("MAX_FILE_SIZE_MB", DEFAULT_MAX_FILE_SIZE_MB);
        let webp_quality: f32 = env_parse("WEBP_QUALITY", DEFAULT_WEBP_QUALITY);
        if !(0.0..=100.0).contains(&webp_quality) {
            anyhow::bail!("WEBP_QUALITY must be between 0 and 100, got {webp_quality}");
        }

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            server_port: env_parse("SERVER_PORT", DEFAULT_SERVER_PORT),
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", DEFAULT_UPLOAD_DIR)),
            public_base_url: env_or("PUBLIC_BASE_URL", "/uploads/images"),
            cors_origins,
            environment: env_or("ENVIRONMENT", "development"),
            max_files_per_upload: env_parse(
                "MAX_FILES_PER_UPLOAD",
                DEFAULT_MAX_FILES_PER_UPLOAD,
            ),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            max_image_dimension: env_parse("MAX_IMAGE_DIMENSION", DEFAULT_MAX_IMAGE_DIMENSION),
            webp_max_width: env_parse("WEBP_MAX_WIDTH", DEFAULT_WEBP_MAX_WIDTH),
            webp_quality,
            request_log_capacity: env_parse(
                "REQUEST_LOG_CAPACITY",
                DEFAULT_REQUEST_LOG_CAPACITY,
            ),
        })
    }

    /// Upper bound for a whole multipart request body: every file at the
    /// per-file limit, plus headroom for multipart framing and form fields.
    pub fn max_request_body_bytes(&self) -> usize {
        self.max_files_per_upload * self.max_file_size_bytes + 1024 * 1024
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_port: DEFAULT_SERVER_PORT,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            public_base_url: "/uploads/images".to_string(),
            cors_origins: Vec::new(),
            environment: "development".to_string(),
            max_files_per_upload: DEFAULT_MAX_FILES_PER_UPLOAD,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024,
            max_image_dimension: DEFAULT_MAX_IMAGE_DIMENSION,
            webp_max_width: DEFAULT_WEBP_MAX_WIDTH,
            webp_quality: DEFAULT_WEBP_QUALITY,
            request_log_capacity: DEFAULT_REQUEST_LOG_CAPACITY,
        }
    }
}
