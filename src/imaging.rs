//! Image decoding, fingerprinting and preview thumbnails.

use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageOutputFormat};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::{AppError, Result};

const PREVIEW_SIZE: u32 = 320;

/// SHA-256 of the image's PNG re-encoding, as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageFingerprint(String);

impl ImageFingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| AppError::InvalidImage(e.to_string()))
}

/// Fingerprints the decoded raster, so the same pixels uploaded in different
/// lossless containers (PNG, BMP, ...) share one key.
pub fn fingerprint(img: &DynamicImage) -> Result<ImageFingerprint> {
    let mut png_bytes = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut png_bytes),
        ImageOutputFormat::Png,
    )
    .map_err(|e| AppError::InvalidImage(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(&png_bytes);
    Ok(ImageFingerprint(format!("{:x}", hasher.finalize())))
}

pub fn fingerprint_bytes(bytes: &[u8]) -> Result<ImageFingerprint> {
    fingerprint(&decode(bytes)?)
}

/// JPEG thumbnail as a `data:` URI for the upload view.
pub fn preview_data_uri(img: &DynamicImage) -> Result<String> {
    let thumb = DynamicImage::ImageRgb8(img.thumbnail(PREVIEW_SIZE, PREVIEW_SIZE).to_rgb8());

    let mut jpeg_bytes = Vec::new();
    thumb
        .write_to(
            &mut std::io::Cursor::new(&mut jpeg_bytes),
            ImageOutputFormat::Jpeg(85),
        )
        .map_err(|e| AppError::InvalidImage(e.to_string()))?;

    Ok(format!(
        "data:image/jpeg;base64,{}",
        general_purpose::STANDARD.encode(&jpeg_bytes)
    ))
}
