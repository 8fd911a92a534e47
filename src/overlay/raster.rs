//! RGBA raster with bounds-checked pixel access
//!
//! [`Raster`] wraps an `image::RgbaImage` so the overlay code never indexes
//! the pixel buffer directly. All coordinate-taking methods accept signed
//! coordinates and treat anything outside `[0, width) × [0, height)` as a
//! silent no-op, which is how glyph blocks near the border get clipped.

use image::{DynamicImage, Rgba, RgbaImage};

use super::composite::blend_over;

/// Width used when a decoder hands back a zero-area image
///
/// The bundled `image` decoders reject zero-width and zero-height inputs
/// with an error, so from encoded bytes this is only reached if a decoder
/// ever returns an empty buffer instead. [`Raster::from_dynamic`] can still
/// be called with an empty `DynamicImage` directly.
pub const FALLBACK_WIDTH: u32 = 800;

/// Height used when a decoder hands back a zero-area image
pub const FALLBACK_HEIGHT: u32 = 600;

/// An in-memory RGBA8 pixel grid with known width and height
///
/// The underlying buffer always holds exactly `width * height` pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    pixels: RgbaImage,
}

impl Raster {
    /// Creates a raster filled with a single color
    ///
    /// # Examples
    ///
    /// ```
    /// use image::Rgba;
    /// use lgtm_dog_mcp::overlay::Raster;
    ///
    /// let raster = Raster::filled(4, 3, Rgba([0, 0, 0, 255]));
    /// assert_eq!(raster.dimensions(), (4, 3));
    /// assert_eq!(raster.pixel(3, 2), Some(Rgba([0, 0, 0, 255])));
    /// assert_eq!(raster.pixel(4, 0), None);
    /// ```
    pub fn filled(width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, color),
        }
    }

    /// Creates a fully transparent raster
    pub fn transparent(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba([0, 0, 0, 0]))
    }

    /// Wraps an existing RGBA8 buffer
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Converts a decoded image of any color type to an RGBA8 raster
    ///
    /// Returns the raster and whether the fallback canvas was used. A decoded
    /// image with zero width or height carries no usable dimensions, so it is
    /// replaced by a transparent [`FALLBACK_WIDTH`] × [`FALLBACK_HEIGHT`]
    /// canvas rather than rejected.
    ///
    /// This only guards against zero-area decoder output. Headers that
    /// declare a zero dimension fail in the decoder and surface as
    /// `AnnotateError::Decode`, never as a fallback.
    pub fn from_dynamic(image: DynamicImage) -> (Self, bool) {
        if image.width() == 0 || image.height() == 0 {
            return (Self::transparent(FALLBACK_WIDTH, FALLBACK_HEIGHT), true);
        }
        (Self::from_rgba(image.into_rgba8()), false)
    }

    /// Creates a vertical blue-to-cyan gradient, handy for tests and benches
    pub fn from_test_pattern(width: u32, height: u32) -> Self {
        let start = [0.0f32, 0.0, 255.0];
        let end = [0.0f32, 255.0, 255.0];

        let pixels = RgbaImage::from_fn(width, height, |_x, y| {
            let ratio = y as f32 / height.max(1) as f32;
            let mix = |c: usize| (start[c] * (1.0 - ratio) + end[c] * ratio) as u8;
            Rgba([mix(0), mix(1), mix(2), 255])
        });

        Self { pixels }
    }

    /// Returns `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Raster width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Raster height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Whether `(x, y)` lies inside the raster
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width()) && y < i64::from(self.height())
    }

    /// Reads a pixel, or `None` when out of bounds
    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgba<u8>> {
        if !self.contains(x, y) {
            return None;
        }
        Some(*self.pixels.get_pixel(x as u32, y as u32))
    }

    /// Overwrites a pixel. Returns `false` (and does nothing) when out of
    /// bounds.
    pub fn put(&mut self, x: i64, y: i64, color: Rgba<u8>) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        self.pixels.put_pixel(x as u32, y as u32, color);
        true
    }

    /// Composites `color` over the existing pixel (source-over). Returns
    /// `false` (and does nothing) when out of bounds.
    pub fn blend(&mut self, x: i64, y: i64, color: Rgba<u8>) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        let dst = self.pixels.get_pixel_mut(x as u32, y as u32);
        *dst = blend_over(*dst, color);
        true
    }

    /// Borrows the underlying RGBA8 buffer
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Consumes the raster and returns the underlying RGBA8 buffer
    pub fn into_rgba(self) -> RgbaImage {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_length_matches_dimensions() {
        let raster = Raster::transparent(13, 7);
        assert_eq!(raster.as_rgba().as_raw().len(), 13 * 7 * 4);
    }

    #[test]
    fn test_bounds_checks() {
        let raster = Raster::transparent(10, 5);

        assert!(raster.contains(0, 0));
        assert!(raster.contains(9, 4));
        assert!(!raster.contains(10, 4));
        assert!(!raster.contains(9, 5));
        assert!(!raster.contains(-1, 0));
        assert!(!raster.contains(0, -1));
    }

    #[test]
    fn test_out_of_bounds_writes_are_noops() {
        let mut raster = Raster::filled(3, 3, Rgba([1, 2, 3, 255]));
        let before = raster.clone();

        assert!(!raster.put(3, 0, Rgba([255, 255, 255, 255])));
        assert!(!raster.put(-1, 1, Rgba([255, 255, 255, 255])));
        assert!(!raster.blend(0, 3, Rgba([0, 0, 0, 128])));

        assert_eq!(raster, before);
    }

    #[test]
    fn test_put_then_read() {
        let mut raster = Raster::transparent(4, 4);
        assert!(raster.put(2, 1, Rgba([9, 8, 7, 255])));
        assert_eq!(raster.pixel(2, 1), Some(Rgba([9, 8, 7, 255])));
        assert_eq!(raster.pixel(1, 2), Some(Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn test_blend_darkens_opaque_pixel() {
        let mut raster = Raster::filled(2, 2, Rgba([200, 200, 200, 255]));
        assert!(raster.blend(1, 1, Rgba([0, 0, 0, 128])));

        let px = raster.pixel(1, 1).unwrap();
        assert!(px[0] < 200);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_from_dynamic_converts_color_type() {
        let dynamic = DynamicImage::new_rgb8(6, 4);
        let (raster, fallback) = Raster::from_dynamic(dynamic);

        assert!(!fallback);
        assert_eq!(raster.dimensions(), (6, 4));
        assert_eq!(raster.pixel(0, 0), Some(Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn test_from_dynamic_zero_area_uses_fallback() {
        let (raster, fallback) = Raster::from_dynamic(DynamicImage::new_rgba8(0, 0));

        assert!(fallback);
        assert_eq!(raster.dimensions(), (FALLBACK_WIDTH, FALLBACK_HEIGHT));
    }

    #[test]
    fn test_test_pattern_gradient() {
        let raster = Raster::from_test_pattern(8, 100);
        let top = raster.pixel(0, 0).unwrap();
        let bottom = raster.pixel(0, 99).unwrap();

        assert_eq!(top, Rgba([0, 0, 255, 255]));
        assert!(bottom[1] > 240);
    }
}
