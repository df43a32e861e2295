#![allow(dead_code)] // not every test binary uses every helper

use std::path::Path;
use std::sync::Arc;

use axum_test::TestServer;
use image::{ImageFormat, Rgb, RgbImage};
use tempfile::TempDir;

use imovel_api::routes::build_router;
use imovel_api::state::AppState;
use imovel_core::Config;

pub struct TestApp {
    pub server: TestServer,
    pub upload_dir: TempDir,
}

/// Build the full router against a scratch upload directory.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_base_url("/uploads/images").await
}

pub async fn setup_test_app_with_base_url(public_base_url: &str) -> TestApp {
    let upload_dir = TempDir::new().expect("create temp upload dir");
    let config = Config {
        upload_dir: upload_dir.path().to_path_buf(),
        public_base_url: public_base_url.to_string(),
        ..Config::default()
    };
    let state = Arc::new(AppState::new(config).await.expect("build state"));
    let server = TestServer::new(build_router(state)).expect("build test server");
    TestApp { server, upload_dir }
}

// RGB rather than RGBA: the jpeg encoder rejects alpha channels
pub fn encode_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([90, 140, 60]));
    let mut buffer = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buffer), format)
        .expect("encode fixture image");
    buffer
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode_image(width, height, ImageFormat::Png)
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode_image(width, height, ImageFormat::Jpeg)
}

pub fn webp_bytes(width: u32, height: u32) -> Vec<u8> {
    encode_image(width, height, ImageFormat::WebP)
}

/// Sorted filenames currently present in the upload directory.
pub fn stored_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read upload dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
