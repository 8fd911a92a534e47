//! Overlay geometry: scale factor, spacing, text box, and centered anchor
//!
//! All geometry is integral. Given a raster of `W × H` and a marker of `n`
//! characters drawn from `C × R` glyphs (5 × 7):
//!
//! ```text
//! budget  = n·C + (n − 1)·spacing_ratio            (glyph columns incl. gaps)
//! s       = max(min_pixel_size,
//!               floor(min(width_ratio·W / budget, height_ratio·H / R)))
//! spacing = floor(spacing_ratio · s)
//! text_w  = n·C·s + (n − 1)·spacing
//! text_h  = R·s
//! start   = (floor((W − text_w) / 2), floor((H − text_h) / 2))
//! ```
//!
//! Unless the minimum clamp kicks in, the text box therefore never exceeds
//! `width_ratio · W` by `height_ratio · H`, and the anchor is within half a
//! pixel of the true center on both axes.

use image::Rgba;

use super::glyph::{GLYPH_COLS, GLYPH_ROWS};

/// Smallest block size a glyph cell may be drawn at
pub const DEFAULT_MIN_PIXEL_SIZE: u32 = 3;

/// Largest share of the raster width the text box may take
pub const DEFAULT_MAX_WIDTH_RATIO: f64 = 0.7;

/// Largest share of the raster height the text box may take
pub const DEFAULT_MAX_HEIGHT_RATIO: f64 = 0.25;

/// Gap between glyphs, in multiples of the scale factor
pub const DEFAULT_SPACING_RATIO: f64 = 1.5;

/// Opaque white text
pub const FOREGROUND_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Semi-transparent black shadow
pub const SHADOW_COLOR: Rgba<u8> = Rgba([0, 0, 0, 128]);

/// Diagonal offset of the shadow relative to the foreground
pub const SHADOW_OFFSET: (i64, i64) = (1, 1);

/// Largest source width or height the decoder will accept
pub const DEFAULT_MAX_DECODE_DIMENSION: u32 = 16_384;

/// Tunable proportions and colors for the overlay
///
/// The defaults are visual heuristics; none of them affect correctness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayConfig {
    /// Lower clamp for the scale factor
    pub min_pixel_size:       u32,
    /// Upper bound of text width as a share of raster width
    pub max_width_ratio:      f64,
    /// Upper bound of text height as a share of raster height
    pub max_height_ratio:     f64,
    /// Inter-glyph gap in multiples of the scale factor
    pub spacing_ratio:        f64,
    /// Text color (written opaque)
    pub foreground:           Rgba<u8>,
    /// Shadow color (blended source-over)
    pub shadow:               Rgba<u8>,
    /// Shadow displacement in pixels
    pub shadow_offset:        (i64, i64),
    /// Decode limit applied to both source width and height
    pub max_decode_dimension: u32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            min_pixel_size:       DEFAULT_MIN_PIXEL_SIZE,
            max_width_ratio:      DEFAULT_MAX_WIDTH_RATIO,
            max_height_ratio:     DEFAULT_MAX_HEIGHT_RATIO,
            spacing_ratio:        DEFAULT_SPACING_RATIO,
            foreground:           FOREGROUND_COLOR,
            shadow:               SHADOW_COLOR,
            shadow_offset:        SHADOW_OFFSET,
            max_decode_dimension: DEFAULT_MAX_DECODE_DIMENSION,
        }
    }
}

/// Per-call overlay geometry for one raster and one marker length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlaySpec {
    /// Edge length in pixels of one glyph cell
    pub scale:         u32,
    /// Gap between adjacent glyphs in pixels
    pub spacing:       u32,
    /// Number of glyphs laid out
    pub char_count:    usize,
    /// Text box width in pixels
    pub text_width:    u64,
    /// Text box height in pixels
    pub text_height:   u64,
    /// Left edge of the text box (negative when wider than the raster)
    pub start_x:       i64,
    /// Top edge of the text box (negative when taller than the raster)
    pub start_y:       i64,
    /// Text color
    pub foreground:    Rgba<u8>,
    /// Shadow color
    pub shadow:        Rgba<u8>,
    /// Shadow displacement
    pub shadow_offset: (i64, i64),
}

impl OverlaySpec {
    /// Computes the layout for `char_count` glyphs on a `width × height`
    /// raster
    ///
    /// # Examples
    ///
    /// ```
    /// use lgtm_dog_mcp::overlay::layout::{OverlayConfig, OverlaySpec};
    ///
    /// let spec = OverlaySpec::compute(1000, 800, 4, &OverlayConfig::default());
    /// // width bound: 0.7·1000 / (4·5 + 3·1.5) = 28.57
    /// // height bound: 0.25·800 / 7 = 28.57
    /// assert_eq!(spec.scale, 28);
    /// assert_eq!(spec.spacing, 42);
    /// assert_eq!(spec.text_width, 4 * 5 * 28 + 3 * 42);
    /// assert_eq!(spec.text_height, 7 * 28);
    /// assert_eq!(spec.start_x, (1000 - 686) / 2);
    /// assert_eq!(spec.start_y, (800 - 196) / 2);
    /// ```
    pub fn compute(width: u32, height: u32, char_count: usize, config: &OverlayConfig) -> Self {
        let scale = scale_factor(width, height, char_count, config);
        let spacing = (config.spacing_ratio.max(0.0) * f64::from(scale)).floor() as u32;

        let glyph_width = GLYPH_COLS as u64 * u64::from(scale);
        let text_width = match char_count as u64 {
            0 => 0,
            n => n * glyph_width + (n - 1) * u64::from(spacing),
        };
        let text_height = if char_count == 0 {
            0
        } else {
            GLYPH_ROWS as u64 * u64::from(scale)
        };

        Self {
            scale,
            spacing,
            char_count,
            text_width,
            text_height,
            start_x: centered_start(width, text_width),
            start_y: centered_start(height, text_height),
            foreground: config.foreground,
            shadow: config.shadow,
            shadow_offset: config.shadow_offset,
        }
    }

    /// Horizontal distance between the left edges of adjacent glyphs
    pub fn advance(&self) -> i64 {
        (GLYPH_COLS as i64) * i64::from(self.scale) + i64::from(self.spacing)
    }

    /// Top-left corner of glyph slot `index`
    pub fn glyph_origin(&self, index: usize) -> (i64, i64) {
        (self.start_x + index as i64 * self.advance(), self.start_y)
    }
}

/// Computes the scale factor `s` for the given raster and marker length
///
/// Monotonic in the raster size: growing both dimensions never shrinks `s`.
pub fn scale_factor(width: u32, height: u32, char_count: usize, config: &OverlayConfig) -> u32 {
    let n = char_count.max(1) as f64;
    let budget = n * GLYPH_COLS as f64 + (n - 1.0) * config.spacing_ratio.max(0.0);

    let width_bound = config.max_width_ratio * f64::from(width) / budget;
    let height_bound = config.max_height_ratio * f64::from(height) / GLYPH_ROWS as f64;
    let fitted = width_bound.min(height_bound).floor();

    let fitted = if fitted.is_finite() && fitted > 0.0 {
        fitted.min(f64::from(u32::MAX)) as u32
    } else {
        0
    };

    fitted.max(config.min_pixel_size.max(1))
}

fn centered_start(extent: u32, content: u64) -> i64 {
    (i64::from(extent) - content as i64).div_euclid(2)
}
