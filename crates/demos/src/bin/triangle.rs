#![deny(unsafe_code)]
//! Rotating triangle drawn through [`ShaderProgram`] with embedded GLSL.
//!
//! The classic bootstrap scene: three interleaved `x, y, r, g, b`
//! vertices, an MVP from an aspect-correct orthographic projection, and a
//! rotation that advances one degree per frame. Closes on Escape.

use glam::Mat4;
use glsketch_core::{RenderError, ShaderProgram};
use glsketch_demos::{run_scene, DemoError, Scene};

const VERTEX_SHADER: &str = r#"#version 330 core
uniform mat4 MVP;

layout (location = 0) in vec2 vPos;
layout (location = 1) in vec3 vCol;

out vec3 v_color;

void main() {
    gl_Position = MVP * vec4(vPos, 0.0, 1.0);
    v_color = vCol;
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 330 core
in vec3 v_color;
out vec4 frag_color;

void main() {
    frag_color = vec4(v_color, 1.0);
}
"#;

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
}

#[derive(Default)]
struct Triangle {
    gfx: Option<Gfx>,
    rotation_degrees: f32,
}

/// Uploads the triangle and wires its attributes to the compiled program.
#[allow(unsafe_code)]
fn build_gfx(gl: &glow::Context) -> Result<Gfx, DemoError> {
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

        let shader = match ShaderProgram::from_sources(gl, VERTEX_SHADER, FRAGMENT_SHADER) {
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

        Ok(Gfx { shader, vao, vbo })
    }
}

#[allow(unsafe_code)]
fn draw(gfx: &Gfx, gl: &glow::Context, mvp: Mat4) {
    use glow::HasContext;

    // SAFETY: clearing the default framebuffer.
    unsafe { gl.clear(glow::COLOR_BUFFER_BIT) };

    gfx.shader.bind(gl);
    gfx.shader.set_mat4(gl, "MVP", mvp);

    // SAFETY: the vertex array from build_gfx holds three vertices.
    unsafe {
        gl.bind_vertex_array(Some(gfx.vao));
        gl.draw_arrays(glow::TRIANGLES, 0, 3);
        gl.bind_vertex_array(None);
    }
}

#[allow(unsafe_code)]
fn release_gfx(gfx: &Gfx, gl: &glow::Context) {
    use glow::HasContext;

    // SAFETY: handles from build_gfx; nothing uses them afterwards.
    unsafe {
        gl.delete_buffer(gfx.vbo);
        gl.delete_vertex_array(gfx.vao);
    }
    gfx.shader.destroy(gl);
}

impl Scene for Triangle {
    fn init(&mut self, gl: &glow::Context) -> Result<(), DemoError> {
        self.gfx = Some(build_gfx(gl)?);
        Ok(())
    }

    fn frame(&mut self, gl: &glow::Context, width: u32, height: u32) -> Result<(), DemoError> {
        let Some(gfx) = self.gfx.as_ref() else {
            return Err(DemoError::Scene("frame before init".into()));
        };

        let ratio = width as f32 / height as f32;
        let projection = Mat4::orthographic_rh_gl(-ratio, ratio, -1.0, 1.0, -1.0, 1.0);
        let model = Mat4::from_rotation_z(self.rotation_degrees.to_radians());
        draw(gfx, gl, projection * model);

        self.rotation_degrees += 1.0;
        Ok(())
    }

    fn destroy(&mut self, gl: &glow::Context) {
        if let Some(gfx) = self.gfx.take() {
            release_gfx(&gfx, gl);
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run_scene("Rotating Triangle", Triangle::default()) {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}
