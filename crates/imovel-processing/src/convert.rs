//! WebP derivative generation
//!
//! Accepted originals get a compressed WebP companion: resized down to a
//! maximum width (aspect ratio preserved, never upscaled) and re-encoded.

use std::io::Cursor;

use bytes::Bytes;
use image::{imageops::FilterType, GenericImageView, ImageReader};

/// Select a resize filter based on how far the image is scaled down.
/// Stronger downscales tolerate cheaper filters.
fn select_filter(orig_width: u32, orig_height: u32, new_width: u32, new_height: u32) -> FilterType {
    let width_ratio = orig_width as f32 / new_width as f32;
    let height_ratio = orig_height as f32 / new_height as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        FilterType::Triangle
    } else if max_ratio > 1.5 {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}

/// Decode, resize to at most `max_width` wide, and encode as WebP at the
/// given quality (0-100).
pub fn to_webp(data: &[u8], max_width: u32, quality: f32) -> anyhow::Result<Bytes> {
    let img = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .decode()?;

    let (width, height) = img.dimensions();
    let img = if width > max_width {
        let target_height = ((max_width as f64 * height as f64 / width as f64).round() as u32).max(1);
        let filter = select_filter(width, height, max_width, target_height);
        img.resize(max_width, target_height, filter)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    let (out_width, out_height) = rgba.dimensions();
    let encoder = webp::Encoder::from_rgba(&rgba, out_width, out_height);
    let webp_data = encoder.encode(quality);

    Ok(Bytes::copy_from_slice(&webp_data))
}

/// Async wrapper for the upload pipeline. Decode and encode are CPU-bound,
/// so they run off the async pool.
pub async fn convert(data: Vec<u8>, max_width: u32, quality: f32) -> anyhow::Result<Bytes> {
    let out = tokio::task::spawn_blocking(move || to_webp(&data, max_width, quality)).await??;
    Ok(out)
}
