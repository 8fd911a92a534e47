//! LGTM image annotation engine
//!
//! A strictly sequential pipeline: decode the source bytes into a
//! [`Raster`], paint a centered, proportionally scaled bitmap marker with an
//! offset shadow, and encode the result as PNG.
//!
//! The engine performs no I/O and no logging. Every call allocates its own
//! raster; the glyph table is immutable static data, so concurrent calls
//! need no synchronization.
//!
//! # Examples
//!
//! ```
//! use lgtm_dog_mcp::overlay::{Raster, annotate, codec};
//!
//! let source = codec::encode_png(&Raster::from_test_pattern(400, 300)).unwrap();
//! let png = annotate(&source, "LGTM").unwrap();
//!
//! let decoded = codec::decode(&png).unwrap();
//! assert_eq!(decoded.raster.dimensions(), (400, 300));
//! ```

pub mod codec;
pub mod composite;
pub mod glyph;
pub mod layout;
pub mod raster;

use image::ImageFormat;

pub use self::{
    composite::PaintStats,
    glyph::GlyphPattern,
    layout::{OverlayConfig, OverlaySpec},
    raster::Raster,
};
use crate::error::{AnnotateError, AnnotateResult};

/// The marker stamped onto every generated image
pub const LGTM_MARKER: &str = "LGTM";

/// Result of a detailed annotation run
#[derive(Debug, Clone)]
pub struct AnnotatedImage {
    /// Encoded PNG bytes
    pub png:                 Vec<u8>,
    /// Output width in pixels
    pub width:               u32,
    /// Output height in pixels
    pub height:              u32,
    /// Glyph cell size used for the marker
    pub scale:               u32,
    /// Format detected in the source bytes
    pub source_format:       Option<ImageFormat>,
    /// Whether the 800×600 fallback canvas replaced the source
    pub fallback_dimensions: bool,
    /// Pixel counters from the paint passes
    pub stats:               PaintStats,
}

/// Resolves every character of `marker` to its glyph
///
/// Fails on the first character without a glyph, reporting its position.
pub fn resolve_glyphs(marker: &str) -> AnnotateResult<Vec<&'static GlyphPattern>> {
    marker
        .chars()
        .enumerate()
        .map(|(position, character)| {
            glyph::glyph_for(character).ok_or_else(|| AnnotateError::UnsupportedGlyph {
                character,
                position,
                marker: marker.to_string(),
            })
        })
        .collect()
}

/// Paints `marker` onto `raster` in place
///
/// The marker is validated before any pixel is touched, so on error the
/// raster is unchanged.
pub fn render_overlay(
    raster: &mut Raster,
    marker: &str,
    config: &OverlayConfig,
) -> AnnotateResult<(OverlaySpec, PaintStats)> {
    let glyphs = resolve_glyphs(marker)?;
    let (width, height) = raster.dimensions();
    let spec = OverlaySpec::compute(width, height, glyphs.len(), config);

    let blocks = composite::ink_blocks(&glyphs, &spec);
    let stats = composite::paint_blocks(raster, &blocks, &spec);

    Ok((spec, stats))
}

/// Decodes `image_bytes`, stamps `marker` at the center, and returns PNG
/// bytes, using the default [`OverlayConfig`]
pub fn annotate(image_bytes: &[u8], marker: &str) -> AnnotateResult<Vec<u8>> {
    annotate_with(image_bytes, marker, &OverlayConfig::default())
}

/// Same as [`annotate`] with explicit overlay tuning
pub fn annotate_with(
    image_bytes: &[u8],
    marker: &str,
    config: &OverlayConfig,
) -> AnnotateResult<Vec<u8>> {
    annotate_detailed(image_bytes, marker, config).map(|annotated| annotated.png)
}

/// Runs the full pipeline and reports the geometry and counters alongside
/// the PNG bytes
pub fn annotate_detailed(
    image_bytes: &[u8],
    marker: &str,
    config: &OverlayConfig,
) -> AnnotateResult<AnnotatedImage> {
    // Fail on a bad marker before spending time decoding.
    resolve_glyphs(marker)?;

    let decoded = codec::decode_with_limit(image_bytes, config.max_decode_dimension)?;
    let mut raster = decoded.raster;

    let (spec, stats) = render_overlay(&mut raster, marker, config)?;
    let png = codec::encode_png(&raster)?;
    let (width, height) = raster.dimensions();

    Ok(AnnotatedImage {
        png,
        width,
        height,
        scale: spec.scale,
        source_format: decoded.source_format,
        fallback_dimensions: decoded.fallback_dimensions,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    fn black_png(width: u32, height: u32) -> Vec<u8> {
        codec::encode_png(&Raster::filled(width, height, Rgba([0, 0, 0, 255]))).unwrap()
    }

    #[test]
    fn test_resolve_glyphs_preserves_order() {
        let glyphs = resolve_glyphs("LGTM").unwrap();
        let chars: String = glyphs.iter().map(|g| g.character()).collect();
        assert_eq!(chars, "LGTM");
    }

    #[test]
    fn test_resolve_glyphs_reports_position() {
        let err = resolve_glyphs("LGtM").unwrap_err();
        match err {
            AnnotateError::UnsupportedGlyph {
                character,
                position,
                marker,
            } => {
                assert_eq!(character, 't');
                assert_eq!(position, 2);
                assert_eq!(marker, "LGtM");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_marker_leaves_raster_untouched() {
        let mut raster = Raster::filled(100, 100, Rgba([0, 0, 0, 255]));
        let before = raster.clone();

        let result = render_overlay(&mut raster, "OK?é", &OverlayConfig::default());

        assert!(matches!(result, Err(AnnotateError::UnsupportedGlyph { position: 3, .. })));
        assert_eq!(raster, before);
    }

    #[test]
    fn test_unsupported_marker_checked_before_decode() {
        let err = annotate(b"not an image", "lgtm").unwrap_err();
        assert!(matches!(err, AnnotateError::UnsupportedGlyph { .. }));
    }

    #[test]
    fn test_empty_marker_is_noop() {
        let mut raster = Raster::from_test_pattern(60, 40);
        let before = raster.clone();

        let (spec, stats) = render_overlay(&mut raster, "", &OverlayConfig::default()).unwrap();

        assert_eq!(spec.char_count, 0);
        assert_eq!(stats, PaintStats::default());
        assert_eq!(raster, before);
    }

    #[test]
    fn test_render_paints_white_pixels() {
        let mut raster = Raster::filled(400, 300, Rgba([0, 0, 0, 255]));
        let (spec, stats) =
            render_overlay(&mut raster, LGTM_MARKER, &OverlayConfig::default()).unwrap();

        assert!(stats.foreground_pixels > 0);
        assert_eq!(stats.clipped_pixels, 0);

        let white = raster
            .as_rgba()
            .pixels()
            .filter(|p| **p == Rgba([255, 255, 255, 255]))
            .count() as u64;
        assert_eq!(white, stats.foreground_pixels);

        // L's top-left cell is ink
        assert_eq!(raster.pixel(spec.start_x, spec.start_y), Some(Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn test_annotate_detailed_reports_geometry() {
        let annotated =
            annotate_detailed(&black_png(1000, 800), LGTM_MARKER, &OverlayConfig::default())
                .unwrap();

        assert_eq!((annotated.width, annotated.height), (1000, 800));
        assert_eq!(annotated.scale, 28);
        assert_eq!(annotated.source_format, Some(ImageFormat::Png));
        assert!(!annotated.fallback_dimensions);
        assert_eq!(&annotated.png[0..8], &codec::PNG_SIGNATURE);
    }

    #[test]
    fn test_annotate_with_respects_decode_limit() {
        let config = OverlayConfig {
            max_decode_dimension: 64,
            ..OverlayConfig::default()
        };
        let err = annotate_with(&black_png(65, 10), LGTM_MARKER, &config).unwrap_err();
        assert!(matches!(err, AnnotateError::Decode { .. }));
    }

    #[test]
    fn test_huge_min_pixel_size_stays_bounded() {
        let config = OverlayConfig {
            min_pixel_size: 20_000,
            ..OverlayConfig::default()
        };
        let mut raster = Raster::filled(10, 10, Rgba([0, 0, 0, 255]));

        let started = std::time::Instant::now();
        let (spec, stats) = render_overlay(&mut raster, LGTM_MARKER, &config).unwrap();

        assert!(started.elapsed() < std::time::Duration::from_secs(2));
        assert_eq!(spec.scale, 20_000);
        assert!(stats.foreground_pixels <= 100);
        assert!(stats.shadow_pixels <= 100);
        assert!(stats.clipped_pixels > 0);
        assert_eq!(raster.dimensions(), (10, 10));
    }

    #[test]
    fn test_annotate_tiny_raster_degrades_gracefully() {
        let png = annotate(&black_png(10, 10), LGTM_MARKER).unwrap();
        let decoded = codec::decode(&png).unwrap();
        assert_eq!(decoded.raster.dimensions(), (10, 10));
    }
}
