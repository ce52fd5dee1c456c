//! Embedded GLSL for the glyph pipeline.
//!
//! Glyph coverage lives in the red channel of a single-channel texture, so
//! the fragment shader turns `texture(...).r` into alpha and tints with a
//! uniform color. Keeping the sources in the binary means a text renderer
//! never depends on shader files shipped next to the executable.

/// GLSL 3.30 vertex shader for glyph quads.
///
/// Each vertex packs position and texture coordinates into one `vec4`
/// (`xy` = position, `zw` = UV), matching the interleaved quad buffer the
/// renderer streams. The attribute is pinned to location 0 and positions
/// are mapped to clip space by the `projection` uniform.
pub const TEXT_VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec4 a_vertex;
out vec2 v_uv;
uniform mat4 projection;
void main() {
    gl_Position = projection * vec4(a_vertex.xy, 0.0, 1.0);
    v_uv = a_vertex.zw;
}
"#;

/// GLSL 3.30 fragment shader for glyph quads.
///
/// Samples the glyph's coverage from the red channel of the `text`
/// sampler, uses it as alpha, and tints with `textColor`. Expects alpha
/// blending to be enabled by the caller.
pub const TEXT_FRAGMENT_SHADER: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 frag_color;
uniform sampler2D text;
uniform vec3 textColor;
void main() {
    frag_color = vec4(textColor, texture(text, v_uv).r);
}
"#;
