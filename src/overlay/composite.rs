//! Pixel compositing for the text overlay
//!
//! Painting is done in two passes over the same set of ink blocks: first
//! every shadow pixel is blended at its offset position, then every
//! foreground pixel is written opaque. Because the foreground pass runs
//! last, a shadow can never cover a foreground pixel, whatever order the
//! glyph cells are visited in.

use image::Rgba;

use super::{glyph::GlyphPattern, layout::OverlaySpec, raster::Raster};

/// Composites `src` over `dst` (Porter-Duff source-over, straight alpha)
///
/// # Examples
///
/// ```
/// use image::Rgba;
/// use lgtm_dog_mcp::overlay::composite::blend_over;
///
/// // Opaque source replaces the destination
/// let out = blend_over(Rgba([10, 20, 30, 255]), Rgba([255, 255, 255, 255]));
/// assert_eq!(out, Rgba([255, 255, 255, 255]));
///
/// // Half-transparent black over opaque white gives opaque mid-gray
/// let out = blend_over(Rgba([255, 255, 255, 255]), Rgba([0, 0, 0, 128]));
/// assert_eq!(out, Rgba([127, 127, 127, 255]));
/// ```
pub fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = f32::from(src[3]) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);

    if out_a <= f32::EPSILON {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |i: usize| {
        let c = (f32::from(src[i]) * sa + f32::from(dst[i]) * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Counters describing one overlay pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintStats {
    /// Foreground pixels written inside the raster
    pub foreground_pixels: u64,
    /// Shadow pixels blended inside the raster
    pub shadow_pixels:     u64,
    /// Foreground or shadow writes skipped because they fell outside
    pub clipped_pixels:    u64,
}

/// A square block of ink in raster coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkBlock {
    /// Left edge (may be negative on tiny rasters)
    pub x:    i64,
    /// Top edge (may be negative on tiny rasters)
    pub y:    i64,
    /// Edge length in pixels
    pub size: u32,
}

impl InkBlock {
    /// Number of pixels covered, inside the raster or not
    pub fn area(self) -> u64 {
        u64::from(self.size) * u64::from(self.size)
    }

    /// The part of this block, shifted by `offset`, that lies inside a
    /// `width × height` raster, as half-open `(x0, y0, x1, y1)` bounds
    pub fn clip(
        self,
        offset: (i64, i64),
        width: u32,
        height: u32,
    ) -> Option<(i64, i64, i64, i64)> {
        let size = i64::from(self.size);
        let left = self.x.saturating_add(offset.0);
        let top = self.y.saturating_add(offset.1);

        let x0 = left.max(0);
        let y0 = top.max(0);
        let x1 = left.saturating_add(size).min(i64::from(width));
        let y1 = top.saturating_add(size).min(i64::from(height));

        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

/// Expands glyph patterns into ink blocks positioned by `spec`
///
/// Glyph `i` occupies the slot starting at `spec.glyph_origin(i)`; each ink
/// cell `(row, col)` becomes one `scale × scale` block inside that slot.
pub fn ink_blocks(glyphs: &[&GlyphPattern], spec: &OverlaySpec) -> Vec<InkBlock> {
    let scale = i64::from(spec.scale);
    glyphs
        .iter()
        .enumerate()
        .flat_map(|(index, &glyph)| {
            let (origin_x, origin_y) = spec.glyph_origin(index);
            glyph.ink_cells().map(move |(row, col)| InkBlock {
                x:    origin_x + col as i64 * scale,
                y:    origin_y + row as i64 * scale,
                size: spec.scale,
            })
        })
        .collect()
}

/// Paints shadow then foreground for every block
///
/// Only the visible part of each block is visited; off-raster pixels are
/// counted, not walked, so the cost is bounded by the raster area whatever
/// the scale.
pub fn paint_blocks(raster: &mut Raster, blocks: &[InkBlock], spec: &OverlaySpec) -> PaintStats {
    let mut stats = PaintStats::default();

    let (shadowed, clipped) = paint_pass(raster, blocks, spec.shadow_offset, |raster, x, y| {
        raster.blend(x, y, spec.shadow);
    });
    stats.shadow_pixels = shadowed;
    stats.clipped_pixels = clipped;

    let (painted, clipped) = paint_pass(raster, blocks, (0, 0), |raster, x, y| {
        raster.put(x, y, spec.foreground);
    });
    stats.foreground_pixels = painted;
    stats.clipped_pixels = stats.clipped_pixels.saturating_add(clipped);

    stats
}

/// Applies `paint` to every visible pixel of every block shifted by
/// `offset`, returning `(painted, clipped)` counts
fn paint_pass<F>(
    raster: &mut Raster,
    blocks: &[InkBlock],
    offset: (i64, i64),
    mut paint: F,
) -> (u64, u64)
where
    F: FnMut(&mut Raster, i64, i64),
{
    let (width, height) = raster.dimensions();
    let mut painted = 0u64;
    let mut clipped = 0u64;

    for block in blocks {
        let visible = match block.clip(offset, width, height) {
            Some((x0, y0, x1, y1)) => {
                for y in y0..y1 {
                    for x in x0..x1 {
                        paint(raster, x, y);
                    }
                }
                ((x1 - x0) * (y1 - y0)) as u64
            }
            None => 0,
        };
        painted += visible;
        clipped = clipped.saturating_add(block.area() - visible);
    }

    (painted, clipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{glyph::glyph_for, layout::OverlayConfig};

    #[test]
    fn test_blend_transparent_source_is_identity() {
        let dst = Rgba([12, 34, 56, 200]);
        assert_eq!(blend_over(dst, Rgba([255, 0, 0, 0])), dst);
    }

    #[test]
    fn test_blend_over_transparent_destination() {
        let out = blend_over(Rgba([0, 0, 0, 0]), Rgba([0, 0, 0, 128]));
        assert_eq!(out, Rgba([0, 0, 0, 128]));
    }

    #[test]
    fn test_blend_both_transparent() {
        assert_eq!(blend_over(Rgba([5, 5, 5, 0]), Rgba([7, 7, 7, 0])), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_blend_black_over_black_stays_black() {
        let out = blend_over(Rgba([0, 0, 0, 255]), Rgba([0, 0, 0, 128]));
        assert_eq!(out, Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_ink_blocks_match_ink_cells() {
        let glyph = glyph_for('L').unwrap();
        let spec = OverlaySpec::compute(100, 100, 1, &OverlayConfig::default());
        let blocks = ink_blocks(&[glyph], &spec);

        assert_eq!(blocks.len(), glyph.ink_cells().count());
        assert!(blocks.iter().all(|b| b.size == spec.scale));
    }

    #[test]
    fn test_foreground_wins_over_shadow() {
        let mut raster = Raster::filled(20, 20, Rgba([100, 100, 100, 255]));
        let spec = OverlaySpec::compute(20, 20, 1, &OverlayConfig::default());
        let blocks = [
            InkBlock { x: 5, y: 5, size: 2 },
            InkBlock { x: 6, y: 6, size: 2 },
        ];

        paint_blocks(&mut raster, &blocks, &spec);

        // (6,6) is the shadow target of (5,5) and also foreground
        assert_eq!(raster.pixel(6, 6), Some(spec.foreground));
        assert_eq!(raster.pixel(7, 7), Some(spec.foreground));
        // (8,8) only receives shadow
        let shadowed = raster.pixel(8, 8).unwrap();
        assert!(shadowed[0] < 100);
    }

    #[test]
    fn test_clipping_counts() {
        let mut raster = Raster::filled(4, 4, Rgba([0, 0, 0, 255]));
        let spec = OverlaySpec::compute(4, 4, 1, &OverlayConfig::default());
        let blocks = [InkBlock { x: 3, y: 3, size: 2 }];

        let stats = paint_blocks(&mut raster, &blocks, &spec);

        assert_eq!(stats.foreground_pixels, 1);
        assert_eq!(stats.shadow_pixels, 0);
        assert_eq!(stats.clipped_pixels, 4 + 3);
        assert_eq!(raster.pixel(3, 3), Some(spec.foreground));
    }

    #[test]
    fn test_clip_bounds() {
        let block = InkBlock { x: -2, y: 8, size: 5 };

        assert_eq!(block.clip((0, 0), 10, 10), Some((0, 8, 3, 10)));
        assert_eq!(block.clip((1, 1), 10, 10), Some((0, 9, 4, 10)));
        assert_eq!(block.clip((0, 2), 10, 10), None);
        assert_eq!(block.area(), 25);
    }

    #[test]
    fn test_huge_block_is_counted_not_walked() {
        let mut raster = Raster::filled(10, 10, Rgba([0, 0, 0, 255]));
        let spec = OverlaySpec::compute(10, 10, 1, &OverlayConfig::default());
        let blocks = [InkBlock {
            x:    -50_000,
            y:    -50_000,
            size: 100_000,
        }];

        let stats = paint_blocks(&mut raster, &blocks, &spec);

        assert_eq!(stats.foreground_pixels, 100);
        assert_eq!(stats.shadow_pixels, 100);
        assert_eq!(stats.clipped_pixels, 2 * (blocks[0].area() - 100));
    }
}
