#![deny(unsafe_code)]
//! Rotating triangle with a text overlay.
//!
//! Exercises the file-loading path of [`ShaderProgram`] (sources live
//! under `shaders/` next to this crate) and [`TextRenderer`]: the scene
//! draws the same spinning triangle as the `triangle` demo, then overlays
//! "Hello, World" 100 pixels in from the window's top-left corner. Alpha
//! blending is on for the glyph quads; the triangle is opaque and doesn't
//! care. Closes on Escape.

use glam::{Mat4, Vec2, Vec3};
use glsketch_core::{RenderError, ShaderProgram, TextRenderer};
use glsketch_demos::{find_font, run_scene, DemoError, Scene};

const VERT_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/tri.vert");
const FRAG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/tri.frag");

const FONT_PIXEL_SIZE: u32 = 48;

/// Interleaved `x, y, r, g, b` for the three corners.
const TRIANGLE: [[f32; 5]; 3] = [
    [-0.6, -0.4, 1.0, 0.0, 0.0],
    [0.6, -0.4, 0.0, 1.0, 0.0],
    [0.0, 0.6, 0.0, 0.0, 1.0],
];

const VERTEX_STRIDE: i32 = (5 * std::mem::size_of::<f32>()) as i32;

struct Gfx {
    shader: ShaderProgram,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    text: TextRenderer,
}

#[derive(Default)]
struct TriangleText {
    gfx: Option<Gfx>,
    rotation_degrees: f32,
}

/// Uploads the triangle, compiles the file-sourced program, and wires the
/// attributes it exposes.
#[allow(unsafe_code)]
fn build_triangle(
    gl: &glow::Context,
) -> Result<(ShaderProgram, glow::VertexArray, glow::Buffer), DemoError> {
    use glow::HasContext;

    // SAFETY: object creation, a STATIC_DRAW upload, and attribute setup
    // against the current context; every bind is undone before returning.
    unsafe {
        let vao = gl
            .create_vertex_array()
            .map_err(|e| DemoError::Render(RenderError::CreateVertexArray(e)))?;
        let vbo = match gl.create_buffer() {
            Ok(vbo) => vbo,
            Err(message) => {
                gl.delete_vertex_array(vao);
                return Err(DemoError::Render(RenderError::CreateBuffer(message)));
            }
        };

        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(TRIANGLE.as_flattened()),
            glow::STATIC_DRAW,
        );

        let shader = match ShaderProgram::from_files(gl, VERT_PATH, FRAG_PATH) {
            Ok(shader) => shader,
            Err(err) => {
                gl.bind_buffer(glow::ARRAY_BUFFER, None);
                gl.bind_vertex_array(None);
                gl.delete_buffer(vbo);
                gl.delete_vertex_array(vao);
                return Err(err.into());
            }
        };

        let attribs = shader
            .attrib_location(gl, "vPos")
            .zip(shader.attrib_location(gl, "vCol"));
        let Some((vpos, vcol)) = attribs else {
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_vertex_array(None);
            shader.destroy(gl);
            gl.delete_buffer(vbo);
            gl.delete_vertex_array(vao);
            return Err(DemoError::Scene(
                "triangle shader exposes no vPos/vCol attributes".into(),
            ));
        };

        gl.enable_vertex_attrib_array(vpos);
        gl.vertex_attrib_pointer_f32(vpos, 2, glow::FLOAT, false, VERTEX_STRIDE, 0);
        gl.enable_vertex_attrib_array(vcol);
        gl.vertex_attrib_pointer_f32(
            vcol,
            3,
            glow::FLOAT,
            false,
            VERTEX_STRIDE,
            (2 * std::mem::size_of::<f32>()) as i32,
        );

        gl.bind_buffer(glow::ARRAY_BUFFER, None);
        gl.bind_vertex_array(None);

        Ok((shader, vao, vbo))
    }
}

#[allow(unsafe_code)]
fn enable_overlay_state(gl: &glow::Context) {
    use glow::HasContext;

    // SAFETY: fixed-function state enables on the current context.
    unsafe {
        gl.enable(glow::CULL_FACE);
        gl.enable(glow::BLEND);
        gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
    }
}

#[allow(unsafe_code)]
fn draw_triangle(gl: &glow::Context, shader: &ShaderProgram, vao: glow::VertexArray, mvp: Mat4) {
    use glow::HasContext;

    // SAFETY: clearing the default framebuffer.
    unsafe { gl.clear(glow::COLOR_BUFFER_BIT) };

    shader.bind(gl);
    shader.set_mat4(gl, "MVP", mvp);

    // SAFETY: the vertex array from build_triangle holds three vertices.
    unsafe {
        gl.bind_vertex_array(Some(vao));
        gl.draw_arrays(glow::TRIANGLES, 0, 3);
        gl.bind_vertex_array(None);
    }
}

#[allow(unsafe_code)]
fn release_gfx(gfx: &Gfx, gl: &glow::Context) {
    use glow::HasContext;

    gfx.text.destroy(gl);
    // SAFETY: handles from build_triangle; nothing uses them afterwards.
    unsafe {
        gl.delete_buffer(gfx.vbo);
        gl.delete_vertex_array(gfx.vao);
    }
    gfx.shader.destroy(gl);
}

impl Scene for TriangleText {
    fn init(&mut self, gl: &glow::Context) -> Result<(), DemoError> {
        let font_path = find_font()?;
        log::info!("text overlay font: {}", font_path.display());

        let (shader, vao, vbo) = build_triangle(gl)?;
        let text = match TextRenderer::new(gl, &font_path, FONT_PIXEL_SIZE) {
            Ok(text) => text,
            Err(err) => {
                release_triangle(gl, &shader, vao, vbo);
                return Err(err.into());
            }
        };

        enable_overlay_state(gl);
        self.gfx = Some(Gfx {
            shader,
            vao,
            vbo,
            text,
        });
        Ok(())
    }

    fn frame(&mut self, gl: &glow::Context, width: u32, height: u32) -> Result<(), DemoError> {
        let Some(gfx) = self.gfx.as_mut() else {
            return Err(DemoError::Scene("frame before init".into()));
        };

        let ratio = width as f32 / height as f32;
        let projection = Mat4::orthographic_rh_gl(-ratio, ratio, -1.0, 1.0, -1.0, 1.0);
        let model = Mat4::from_rotation_z(self.rotation_degrees.to_radians());
        draw_triangle(gl, &gfx.shader, gfx.vao, projection * model);

        let text_projection =
            Mat4::orthographic_rh_gl(0.0, width as f32, 0.0, height as f32, -1.0, 1.0);
        gfx.text.begin(gl, text_projection, height as f32);
        gfx.text.draw_text(
            gl,
            Vec2::new(100.0, 100.0),
            1.0,
            Vec3::new(1.0, 0.0, 0.0),
            "Hello, World",
        );
        gfx.text.end();

        self.rotation_degrees += 1.0;
        Ok(())
    }

    fn destroy(&mut self, gl: &glow::Context) {
        if let Some(gfx) = self.gfx.take() {
            release_gfx(&gfx, gl);
        }
    }
}

#[allow(unsafe_code)]
fn release_triangle(
    gl: &glow::Context,
    shader: &ShaderProgram,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
) {
    use glow::HasContext;

    // SAFETY: handles from build_triangle.
    unsafe {
        gl.delete_buffer(vbo);
        gl.delete_vertex_array(vao);
    }
    shader.destroy(gl);
}

fn main() {
    env_logger::init();

    if let Err(e) = run_scene("Rotating Triangle + Text", TriangleText::default()) {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}
