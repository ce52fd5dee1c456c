//! Immediate-mode ASCII text rendering.
//!
//! Each printable glyph of the 7-bit range gets its own single-channel
//! texture; every drawn character re-fills one shared dynamic quad buffer
//! and issues one draw call. That is deliberately the simplest thing that
//! puts readable text on screen for bootstrap demos and overlays, not a
//! batched atlas renderer.

use std::collections::HashMap;
use std::path::Path;

use glam::{Mat4, Vec2, Vec3};

use crate::error::RenderError;
use crate::shader::ShaderProgram;
use crate::text::glyph::{Glyph, GlyphMetrics};
use crate::text::layout::LineLayout;
use crate::text::phase::DrawPhase;
use crate::text::shaders::{TEXT_FRAGMENT_SHADER, TEXT_VERTEX_SHADER};

/// Byte size of the streamed quad buffer: six `[x, y, u, v]` vertices.
pub const QUAD_BYTES: i32 = (6 * 4 * std::mem::size_of::<f32>()) as i32;

/// Draws lines of ASCII text as one textured quad per glyph.
///
/// Frame usage is bracketed: [`begin`](Self::begin) binds the glyph shader
/// and the projection for the current viewport, any number of
/// [`draw_text`](Self::draw_text) calls follow, and [`end`](Self::end)
/// closes the bracket. Drawing outside the bracket is a caller bug and
/// panics rather than rendering with a stale projection.
///
/// Positions are given in window coordinates with the origin at the
/// top-left corner; the requested `y` is where the top of the line's
/// tallest glyph lands. Characters the font does not map are skipped
/// without advancing the pen.
///
/// The renderer owns GL objects, so [`destroy`](Self::destroy) must be
/// called (with the owning context current) before the value is dropped.
pub struct TextRenderer {
    shader: ShaderProgram,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    glyphs: HashMap<char, Glyph>,
    pixel_size: u32,
    viewport_height: f32,
    phase: DrawPhase,
}

impl TextRenderer {
    /// Builds a renderer from a font file, rasterizing the ASCII range at
    /// `pixel_size` pixels per em.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Io`] if the font file cannot be read, plus
    /// every failure mode of [`TextRenderer::from_font_bytes`].
    pub fn new(
        gl: &glow::Context,
        font_path: impl AsRef<Path>,
        pixel_size: u32,
    ) -> Result<Self, RenderError> {
        let path = font_path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_font_bytes(gl, &bytes, pixel_size)
    }

    /// Builds a renderer from in-memory font data.
    ///
    /// Construction acquires GL objects in dependency order and rolls the
    /// earlier ones back if a later step fails, so an `Err` never leaks
    /// buffers, programs, or textures.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::FontLoad`] for unparseable font data,
    /// [`RenderError::Compile`]/[`RenderError::Link`] if the embedded
    /// glyph shaders are rejected by the driver, and the respective
    /// `Create*` variants when the context refuses an object.
    pub fn from_font_bytes(
        gl: &glow::Context,
        font_bytes: &[u8],
        pixel_size: u32,
    ) -> Result<Self, RenderError> {
        let (vao, vbo) = create_quad_buffers(gl)?;

        let shader = match ShaderProgram::from_sources(gl, TEXT_VERTEX_SHADER, TEXT_FRAGMENT_SHADER)
        {
            Ok(shader) => shader,
            Err(err) => {
                delete_quad_buffers(gl, vao, vbo);
                return Err(err);
            }
        };

        let font = match fontdue::Font::from_bytes(font_bytes, fontdue::FontSettings::default()) {
            Ok(font) => font,
            Err(message) => {
                shader.destroy(gl);
                delete_quad_buffers(gl, vao, vbo);
                return Err(RenderError::FontLoad(message.to_owned()));
            }
        };

        let glyphs = match rasterize_ascii(gl, &font, pixel_size) {
            Ok(glyphs) => glyphs,
            Err(err) => {
                shader.destroy(gl);
                delete_quad_buffers(gl, vao, vbo);
                return Err(err);
            }
        };
        log::info!("rasterized {} ASCII glyphs at {pixel_size}px", glyphs.len());

        Ok(Self {
            shader,
            vao,
            vbo,
            glyphs,
            pixel_size,
            viewport_height: 0.0,
            phase: DrawPhase::Idle,
        })
    }

    /// Opens a text phase: binds the glyph shader and sets the projection
    /// for a viewport `viewport_height` pixels tall.
    ///
    /// The height is what converts top-left window positions into GL
    /// coordinates, so pass the same extent the projection was built from.
    pub fn begin(&mut self, gl: &glow::Context, projection: Mat4, viewport_height: f32) {
        self.shader.bind(gl);
        self.shader.set_mat4(gl, "projection", projection);
        self.viewport_height = viewport_height;
        self.phase.begin();
    }

    /// Draws one line of text at `position` (window coordinates, top-left
    /// origin), tinted `color`, with glyph bitmaps scaled by `scale`.
    ///
    /// Expects alpha blending to be enabled. Characters without a glyph
    /// are skipped; blank glyphs such as the space advance the pen without
    /// a draw call.
    ///
    /// # Panics
    ///
    /// Panics if called outside a [`begin`](Self::begin)/[`end`](Self::end)
    /// bracket.
    #[allow(unsafe_code)]
    pub fn draw_text(
        &self,
        gl: &glow::Context,
        position: Vec2,
        scale: f32,
        color: Vec3,
        text: &str,
    ) {
        use glow::HasContext;

        self.phase.expect_drawing();

        self.shader.bind(gl);
        self.shader.set_vec3(gl, "textColor", color);
        self.shader.set_int(gl, "text", 0);

        // SAFETY: every handle was created in from_font_bytes against this
        // context, and each streamed quad is exactly QUAD_BYTES long.
        unsafe {
            gl.active_texture(glow::TEXTURE0);
            gl.bind_vertex_array(Some(self.vao));

            let layout =
                LineLayout::new(&self.glyphs, text, position, scale, self.viewport_height);
            for (glyph, quad) in layout {
                gl.bind_texture(glow::TEXTURE_2D, Some(glyph.texture));
                gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
                gl.buffer_sub_data_u8_slice(
                    glow::ARRAY_BUFFER,
                    0,
                    bytemuck::cast_slice(quad.as_flattened()),
                );
                gl.bind_buffer(glow::ARRAY_BUFFER, None);
                gl.draw_arrays(glow::TRIANGLES, 0, 6);
            }

            gl.bind_vertex_array(None);
            gl.bind_texture(glow::TEXTURE_2D, None);
        }
    }

    /// Closes the current text phase.
    pub fn end(&mut self) {
        self.phase.end();
    }

    /// Whether a [`begin`](Self::begin) bracket is currently open.
    pub fn is_drawing(&self) -> bool {
        self.phase.is_drawing()
    }

    /// Looks up the rasterized glyph for `ch`, if the font maps it.
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    /// Pixel size the ASCII range was rasterized at.
    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    /// Releases every GL object the renderer owns.
    ///
    /// Must be called with the owning context current before the renderer
    /// is dropped; handles are plain ids, so nothing is freed on drop.
    #[allow(unsafe_code)]
    pub fn destroy(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: deleting handles created in from_font_bytes; the
        // renderer must not be used afterwards.
        unsafe {
            for glyph in self.glyphs.values() {
                gl.delete_texture(glyph.texture);
            }
            gl.delete_buffer(self.vbo);
            gl.delete_vertex_array(self.vao);
        }
        self.shader.destroy(gl);
    }
}

/// Creates the shared VAO/VBO pair for streamed glyph quads.
///
/// The buffer is allocated once at [`QUAD_BYTES`] with `DYNAMIC_DRAW` and
/// re-filled per character; attribute 0 reads four floats per vertex.
#[allow(unsafe_code)]
fn create_quad_buffers(
    gl: &glow::Context,
) -> Result<(glow::VertexArray, glow::Buffer), RenderError> {
    use glow::HasContext;

    // SAFETY: object creation and vertex-format setup against a live
    // context; both binds are undone before returning.
    unsafe {
        let vao = gl
            .create_vertex_array()
            .map_err(RenderError::CreateVertexArray)?;
        let vbo = match gl.create_buffer() {
            Ok(vbo) => vbo,
            Err(message) => {
                gl.delete_vertex_array(vao);
                return Err(RenderError::CreateBuffer(message));
            }
        };

        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_size(glow::ARRAY_BUFFER, QUAD_BYTES, glow::DYNAMIC_DRAW);
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(
            0,
            4,
            glow::FLOAT,
            false,
            4 * std::mem::size_of::<f32>() as i32,
            0,
        );
        gl.bind_buffer(glow::ARRAY_BUFFER, None);
        gl.bind_vertex_array(None);

        Ok((vao, vbo))
    }
}

#[allow(unsafe_code)]
fn delete_quad_buffers(gl: &glow::Context, vao: glow::VertexArray, vbo: glow::Buffer) {
    use glow::HasContext;

    // SAFETY: both handles came from create_quad_buffers.
    unsafe {
        gl.delete_buffer(vbo);
        gl.delete_vertex_array(vao);
    }
}

/// Uploads one glyph's coverage bitmap as a single-channel texture.
///
/// Blank glyphs upload a zero-sized image; they still need a texture so
/// the glyph map can carry their advance.
#[allow(unsafe_code)]
fn upload_glyph_texture(
    gl: &glow::Context,
    width: i32,
    height: i32,
    coverage: &[u8],
) -> Result<glow::Texture, RenderError> {
    use glow::HasContext;

    // SAFETY: coverage holds width * height one-byte texels and the unpack
    // alignment is 1, so the upload reads exactly that many bytes.
    unsafe {
        let texture = gl.create_texture().map_err(RenderError::CreateTexture)?;
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RED as i32,
            width,
            height,
            0,
            glow::RED,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(Some(coverage)),
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_S,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_T,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            glow::LINEAR as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MAG_FILTER,
            glow::LINEAR as i32,
        );
        gl.bind_texture(glow::TEXTURE_2D, None);
        Ok(texture)
    }
}

/// Rasterizes the 7-bit ASCII range into per-glyph textures.
///
/// Characters the font does not map get no entry at all; later layout
/// skips them. On an upload failure every texture created so far is
/// deleted before the error is returned.
#[allow(unsafe_code)]
fn rasterize_ascii(
    gl: &glow::Context,
    font: &fontdue::Font,
    pixel_size: u32,
) -> Result<HashMap<char, Glyph>, RenderError> {
    use glow::HasContext;

    // Coverage rows are tightly packed single bytes, not 4-byte aligned.
    // SAFETY: adjusts client-side pixel storage state only.
    unsafe { gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1) };

    let mut glyphs = HashMap::new();
    for code in 0u8..128 {
        let ch = code as char;
        if font.lookup_glyph_index(ch) == 0 {
            log::debug!("font maps no glyph for {ch:?} (0x{code:02x})");
            continue;
        }

        let (metrics, coverage) = font.rasterize(ch, pixel_size as f32);
        match upload_glyph_texture(gl, metrics.width as i32, metrics.height as i32, &coverage) {
            Ok(texture) => {
                glyphs.insert(
                    ch,
                    Glyph {
                        texture,
                        metrics: GlyphMetrics::from_fontdue(&metrics),
                    },
                );
            }
            Err(err) => {
                // SAFETY: every handle in the map came from
                // upload_glyph_texture against this context.
                for glyph in glyphs.values() {
                    unsafe { gl.delete_texture(glyph.texture) };
                }
                return Err(err);
            }
        }
    }
    Ok(glyphs)
}
