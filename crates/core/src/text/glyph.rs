//! Per-character glyph data: layout metrics plus the GPU texture.

use fontdue::Metrics;

/// Layout metrics for one rasterized glyph at the renderer's fixed pixel
/// size.
///
/// Bearings are measured from the pen origin on the baseline: `bearing_x`
/// to the bitmap's left edge, `bearing_y` up to the bitmap's top edge.
/// `bearing_y` is negative for glyphs that sit entirely below the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMetrics {
    /// Bitmap width in pixels.
    pub width: i32,
    /// Bitmap height in pixels.
    pub height: i32,
    /// Horizontal offset from the pen origin to the bitmap's left edge.
    pub bearing_x: i32,
    /// Vertical offset from the baseline up to the bitmap's top edge.
    pub bearing_y: i32,
    /// Pen displacement to the next glyph, in 1/64-pixel fixed point.
    pub advance: u32,
}

impl GlyphMetrics {
    /// Converts the rasterizer's metrics.
    ///
    /// `fontdue` reports `ymin` as the bitmap bottom's offset from the
    /// baseline, so the top bearing is `height + ymin`. The advance comes
    /// back in (fractional) pixels and is stored in 1/64-pixel fixed point,
    /// rounded, floored at zero.
    pub fn from_fontdue(metrics: &Metrics) -> Self {
        Self {
            width: metrics.width as i32,
            height: metrics.height as i32,
            bearing_x: metrics.xmin,
            bearing_y: metrics.height as i32 + metrics.ymin,
            advance: (metrics.advance_width * 64.0).round().max(0.0) as u32,
        }
    }

    /// Returns whether the glyph has no pixels to draw (e.g. a space).
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A rasterized character: its single-channel coverage texture plus the
/// metrics needed to place it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    /// Texture holding the glyph's coverage bitmap. Owned by the glyph;
    /// deleted by the renderer's `destroy`.
    pub texture: glow::Texture,
    /// Placement metrics at the renderer's pixel size.
    pub metrics: GlyphMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster_metrics(
        xmin: i32,
        ymin: i32,
        width: usize,
        height: usize,
        advance_width: f32,
    ) -> Metrics {
        Metrics {
            xmin,
            ymin,
            width,
            height,
            advance_width,
            advance_height: 0.0,
            bounds: fontdue::OutlineBounds {
                xmin: 0.0,
                ymin: 0.0,
                width: 0.0,
                height: 0.0,
            },
        }
    }

    #[test]
    fn conversion_copies_bitmap_dimensions() {
        let converted = GlyphMetrics::from_fontdue(&raster_metrics(3, 0, 34, 46, 35.0));
        assert_eq!(converted.width, 34);
        assert_eq!(converted.height, 46);
        assert_eq!(converted.bearing_x, 3);
    }

    #[test]
    fn top_bearing_is_height_plus_ymin() {
        // An 'H'-like glyph sitting on the baseline: ymin = 0.
        let upright = GlyphMetrics::from_fontdue(&raster_metrics(3, 0, 34, 46, 35.0));
        assert_eq!(upright.bearing_y, 46);

        // A 'p'-like glyph with a descender below the baseline.
        let descender = GlyphMetrics::from_fontdue(&raster_metrics(2, -12, 28, 36, 30.0));
        assert_eq!(descender.bearing_y, 24);
    }

    #[test]
    fn advance_is_stored_as_64ths_of_a_pixel() {
        let whole = GlyphMetrics::from_fontdue(&raster_metrics(0, 0, 10, 10, 33.0));
        assert_eq!(whole.advance, 33 * 64);

        let fractional = GlyphMetrics::from_fontdue(&raster_metrics(0, 0, 10, 10, 10.4));
        assert_eq!(fractional.advance, 666, "expected round(10.4 * 64)");
    }

    #[test]
    fn negative_advance_floors_at_zero() {
        let converted = GlyphMetrics::from_fontdue(&raster_metrics(0, 0, 4, 4, -2.5));
        assert_eq!(converted.advance, 0);
    }

    #[test]
    fn empty_bitmap_is_detected() {
        let space = GlyphMetrics::from_fontdue(&raster_metrics(0, 0, 0, 0, 16.0));
        assert!(space.is_empty(), "a 0x0 bitmap is empty");
        assert!(space.advance > 0, "space still advances the pen");

        let visible = GlyphMetrics::from_fontdue(&raster_metrics(1, 0, 8, 12, 9.0));
        assert!(!visible.is_empty());
    }

    #[test]
    fn glyph_texture_handle_is_nonzero_by_construction() {
        // glow texture handles wrap NonZeroU32, so a glyph that exists
        // always carries a nonzero texture name.
        let glyph = Glyph {
            texture: glow::NativeTexture(std::num::NonZeroU32::new(7).unwrap()),
            metrics: GlyphMetrics::from_fontdue(&raster_metrics(0, 0, 4, 4, 5.0)),
        };
        assert_eq!(glyph.texture.0.get(), 7);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn advance_conversion_is_monotonic(
                a in -100.0_f32..1000.0,
                b in -100.0_f32..1000.0,
            ) {
                let left = GlyphMetrics::from_fontdue(&raster_metrics(0, 0, 8, 8, a));
                let right = GlyphMetrics::from_fontdue(&raster_metrics(0, 0, 8, 8, b));
                if a <= b {
                    prop_assert!(left.advance <= right.advance);
                } else {
                    prop_assert!(left.advance >= right.advance);
                }
            }

            #[test]
            fn advance_round_trips_to_pixels(advance_width in 0.0_f32..512.0) {
                let converted =
                    GlyphMetrics::from_fontdue(&raster_metrics(0, 0, 8, 8, advance_width));
                let pixels = converted.advance as f32 / 64.0;
                prop_assert!(
                    (pixels - advance_width).abs() < 0.02,
                    "expected {} within half a 64th of {}",
                    pixels,
                    advance_width
                );
            }

            #[test]
            fn top_bearing_tracks_height_and_ymin(
                ymin in -64_i32..64,
                height in 0_usize..128,
            ) {
                let converted =
                    GlyphMetrics::from_fontdue(&raster_metrics(0, ymin, 8, height, 10.0));
                prop_assert_eq!(converted.bearing_y, height as i32 + ymin);
            }
        }
    }
}
