// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Decoding of uploaded image bytes into RGB pixel matrices

use image::{ImageFormat, RgbImage};
use thiserror::Error;

/// Maximum upload size (10MB)
const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Errors raised while decoding an uploaded image
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image data is empty")]
    EmptyData,

    #[error("image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("unsupported image format")]
    UnsupportedFormat,

    #[error("failed to decode image: {0}")]
    DecodeFailed(String),
}

/// Metadata captured while decoding an upload
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Detected format
    pub format: ImageFormat,
    /// Size of the encoded upload in bytes
    pub size_bytes: usize,
}

/// Decode raw upload bytes into an 8-bit RGB pixel matrix.
///
/// The format is detected from magic bytes, then the image is decoded and
/// converted to RGB8 (grayscale and alpha inputs are expanded). Returns the
/// matrix together with metadata about the upload.
pub fn decode_rgb_image(bytes: &[u8]) -> Result<(RgbImage, ImageInfo), ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ImageError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
    }

    let format = detect_format(bytes)?;

    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    // The classifier expects height x width x 3, 8 bits per channel
    let matrix = decoded.to_rgb8();

    let info = ImageInfo {
        width: matrix.width(),
        height: matrix.height(),
        format,
        size_bytes: bytes.len(),
    };

    Ok((matrix, info))
}

/// Detect the image format from magic bytes.
///
/// Supports PNG, JPEG, WebP, GIF and BMP. Anything else is rejected with
/// [`ImageError::UnsupportedFormat`].
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    if bytes.len() < 4 {
        return Err(ImageError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47 (0x89 P N G)
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),

        // GIF: GIF87a or GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),

        // BMP: BM
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),

        _ => Err(ImageError::UnsupportedFormat),
    }
}
