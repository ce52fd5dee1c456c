//! Pure glyph placement for a single line of text.
//!
//! Positions arrive in window coordinates with the origin at the top-left
//! and y growing downward. Quads leave in GL coordinates with y growing
//! upward, ready for an orthographic projection over the viewport. The
//! line is anchored so the tallest glyph's top sits exactly at the
//! requested vertical offset; every glyph then hangs from the shared
//! baseline by its own bearings.
//!
//! Everything here is plain arithmetic over [`GlyphMetrics`], so layout
//! behavior is covered by unit tests without a GL context or a font file.

use std::collections::HashMap;
use std::str::Chars;

use glam::Vec2;

use crate::text::glyph::{Glyph, GlyphMetrics};

/// One textured quad: six vertices of `[x, y, u, v]`, two triangles,
/// `v = 0` at the glyph's top.
pub type QuadVertices = [[f32; 4]; 6];

/// Tallest ascent among the given glyphs, in pixels above the baseline.
///
/// Glyphs that sit entirely below the baseline contribute nothing, so the
/// result is never negative and an empty iterator yields zero.
pub fn max_bearing_y<'a, I>(metrics: I) -> i32
where
    I: IntoIterator<Item = &'a GlyphMetrics>,
{
    metrics
        .into_iter()
        .fold(0, |tallest, m| tallest.max(m.bearing_y))
}

/// Baseline height in GL coordinates for a line placed `y` pixels below
/// the top of a viewport `viewport_height` pixels tall.
///
/// Flipping the vertical axis and subtracting the tallest ascent puts the
/// top of the tallest glyph exactly `y` pixels below the window's top
/// edge.
pub fn anchored_baseline(viewport_height: f32, y: f32, max_bearing: i32) -> f32 {
    viewport_height - y - max_bearing as f32
}

/// Horizontal pen advance in pixels for a 26.6 fixed-point advance.
///
/// The fractional bits are dropped before scaling, matching the whole-pixel
/// stepping of unhinted screen text.
pub fn advance_px(advance: u32, scale: f32) -> f32 {
    (advance >> 6) as f32 * scale
}

/// Builds the six-vertex quad for one glyph at the current pen position.
///
/// The quad's lower-left corner is offset from the pen by the glyph's
/// bearings: right by `bearing_x`, and down by however much of the bitmap
/// hangs below the baseline. Texture coordinates run `v = 0` at the top of
/// the glyph image and `v = 1` at the bottom.
pub fn glyph_quad(pen_x: f32, baseline: f32, metrics: &GlyphMetrics, scale: f32) -> QuadVertices {
    let x = pen_x + metrics.bearing_x as f32 * scale;
    let y = baseline - (metrics.height - metrics.bearing_y) as f32 * scale;
    let w = metrics.width as f32 * scale;
    let h = metrics.height as f32 * scale;

    [
        [x, y + h, 0.0, 0.0],
        [x, y, 0.0, 1.0],
        [x + w, y, 1.0, 1.0],
        [x, y + h, 0.0, 0.0],
        [x + w, y, 1.0, 1.0],
        [x + w, y + h, 1.0, 0.0],
    ]
}

/// Iterator that walks a line of text and yields one `(glyph, quad)` pair
/// per drawable character, advancing the pen as it goes.
///
/// Characters with no glyph entry are skipped outright: no quad, no
/// advance, and no say in the line's anchor. Characters whose glyph has an
/// empty bitmap (space, most control whitespace) advance the pen but yield
/// nothing, so zero-area quads never reach the GPU.
pub struct LineLayout<'a> {
    glyphs: &'a HashMap<char, Glyph>,
    chars: Chars<'a>,
    pen_x: f32,
    baseline: f32,
    scale: f32,
}

impl<'a> LineLayout<'a> {
    /// Lays out `text` starting at `position` (window coordinates,
    /// top-left origin) in a viewport `viewport_height` pixels tall.
    pub fn new(
        glyphs: &'a HashMap<char, Glyph>,
        text: &'a str,
        position: Vec2,
        scale: f32,
        viewport_height: f32,
    ) -> Self {
        let tallest = max_bearing_y(
            text.chars()
                .filter_map(|ch| glyphs.get(&ch))
                .map(|glyph| &glyph.metrics),
        );
        Self {
            glyphs,
            chars: text.chars(),
            pen_x: position.x,
            baseline: anchored_baseline(viewport_height, position.y, tallest),
            scale,
        }
    }

    /// Current pen position. After the iterator is exhausted this is the
    /// right edge of the line.
    pub fn pen_x(&self) -> f32 {
        self.pen_x
    }

    /// Baseline height in GL coordinates shared by every glyph on the line.
    pub fn baseline(&self) -> f32 {
        self.baseline
    }
}

impl<'a> Iterator for LineLayout<'a> {
    type Item = (&'a Glyph, QuadVertices);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let ch = self.chars.next()?;
            let Some(glyph) = self.glyphs.get(&ch) else {
                continue;
            };
            if glyph.metrics.is_empty() {
                self.pen_x += advance_px(glyph.metrics.advance, self.scale);
                continue;
            }
            let quad = glyph_quad(self.pen_x, self.baseline, &glyph.metrics, self.scale);
            self.pen_x += advance_px(glyph.metrics.advance, self.scale);
            return Some((glyph, quad));
        }
    }
}
