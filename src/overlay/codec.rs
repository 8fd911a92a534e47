//! Image decoding and PNG encoding for the overlay pipeline
//!
//! Decoding accepts any format the `image` crate is built with here (PNG,
//! JPEG, WebP, GIF, BMP), sniffing the format from the bytes. Encoding always
//! produces lossless RGBA8 PNG.
//!
//! # Examples
//!
//! ```
//! use lgtm_dog_mcp::overlay::{
//!     codec::{decode, encode_png},
//!     Raster,
//! };
//!
//! let raster = Raster::from_test_pattern(64, 48);
//! let png = encode_png(&raster).unwrap();
//!
//! let decoded = decode(&png).unwrap();
//! assert_eq!(decoded.raster, raster);
//! assert!(!decoded.fallback_dimensions);
//! ```

use std::io::Cursor;

use image::{
    ImageEncoder, ImageFormat, ImageReader, Limits,
    codecs::png::{CompressionType, FilterType, PngEncoder},
};

use super::{layout::DEFAULT_MAX_DECODE_DIMENSION, raster::Raster};
use crate::error::{AnnotateError, AnnotateResult};

/// PNG signature bytes
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// A decoded source image
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// The decoded pixels, always RGBA8
    pub raster:              Raster,
    /// The format sniffed from the input bytes, if recognized
    pub source_format:       Option<ImageFormat>,
    /// Whether the dimensions were unrecoverable and the fallback canvas
    /// was substituted
    pub fallback_dimensions: bool,
}

/// Decodes an image with the default dimension limit
pub fn decode(bytes: &[u8]) -> AnnotateResult<DecodedImage> {
    decode_with_limit(bytes, DEFAULT_MAX_DECODE_DIMENSION)
}

/// Decodes an image, rejecting anything wider or taller than
/// `max_dimension`
///
/// Fails with [`AnnotateError::Decode`] on empty, unrecognized, truncated,
/// or oversized input.
pub fn decode_with_limit(bytes: &[u8], max_dimension: u32) -> AnnotateResult<DecodedImage> {
    if bytes.is_empty() {
        return Err(AnnotateError::decode("input is empty"));
    }

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AnnotateError::decode(e.to_string()))?;

    let source_format = reader.format();
    if source_format.is_none() {
        return Err(AnnotateError::decode("unrecognized image format"));
    }

    let mut limits = Limits::default();
    limits.max_image_width = Some(max_dimension);
    limits.max_image_height = Some(max_dimension);
    reader.limits(limits);

    let image = reader
        .decode()
        .map_err(|e| AnnotateError::decode(e.to_string()))?;

    let (raster, fallback_dimensions) = Raster::from_dynamic(image);

    Ok(DecodedImage {
        raster,
        source_format,
        fallback_dimensions,
    })
}

/// Encodes a raster as PNG with default compression
pub fn encode_png(raster: &Raster) -> AnnotateResult<Vec<u8>> {
    encode_png_with_compression(raster, CompressionType::Default)
}

/// Encodes a raster as RGBA8 PNG with the given compression level
///
/// Uses adaptive per-scanline filtering. The output is lossless and keeps the
/// alpha channel.
pub fn encode_png_with_compression(
    raster: &Raster,
    compression: CompressionType,
) -> AnnotateResult<Vec<u8>> {
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return Err(AnnotateError::encode(
            "png",
            format!("raster has zero area ({}x{})", width, height),
        ));
    }

    let mut output = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(Cursor::new(&mut output), compression, FilterType::Adaptive);

    encoder
        .write_image(raster.as_rgba().as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| AnnotateError::encode("png", e.to_string()))?;

    Ok(output)
}
