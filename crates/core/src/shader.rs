//! Shader program construction and uniform upload.
//!
//! A [`ShaderProgram`] compiles a vertex/fragment/optional-geometry stage
//! triple into a linked program. Each stage's source comes from a
//! [`ShaderSource`] descriptor, either a file path or an in-memory string.
//! Compile and link failures are logged with the driver's info log and
//! returned as typed errors; intermediate stage handles never outlive
//! construction.
//!
//! Uniform setters look their location up by name on every call. This keeps
//! the wrapper stateless beyond the program handle itself; callers that need
//! per-frame throughput should hold locations via [`ShaderProgram::uniform_location`].

use std::fmt;
use std::fs;
use std::path::PathBuf;

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::error::RenderError;

/// One step of the programmable pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
}

impl ShaderStage {
    /// Returns the GL object type for this stage.
    pub fn gl_type(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
            ShaderStage::Geometry => glow::GEOMETRY_SHADER,
        }
    }

    /// Returns the lowercase stage name used in logs and error messages.
    pub fn label(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Geometry => "geometry",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a shader stage's GLSL comes from: a file on disk or a string
/// already in memory. Exactly one of the two, by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderSource {
    /// Read the source from this path at construction time.
    File(PathBuf),
    /// Use this string as-is.
    Source(String),
}

impl ShaderSource {
    /// Descriptor backed by a file path.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ShaderSource::File(path.into())
    }

    /// Descriptor backed by an in-memory string.
    pub fn source(glsl: impl Into<String>) -> Self {
        ShaderSource::Source(glsl.into())
    }

    /// Resolves the descriptor to source text, reading the file if needed.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Io`] with the offending path if the file
    /// cannot be read.
    pub fn resolve(&self) -> Result<String, RenderError> {
        match self {
            ShaderSource::File(path) => fs::read_to_string(path).map_err(|source| {
                RenderError::Io {
                    path: path.clone(),
                    source,
                }
            }),
            ShaderSource::Source(glsl) => Ok(glsl.clone()),
        }
    }
}

/// Resolves the descriptors for a program into an ordered stage list.
///
/// The geometry stage is present only when a descriptor was supplied for it.
/// A file-read failure is fatal: it aborts before any GL work happens.
fn stage_sources(
    vertex: &ShaderSource,
    fragment: &ShaderSource,
    geometry: Option<&ShaderSource>,
) -> Result<Vec<(ShaderStage, String)>, RenderError> {
    let mut stages = vec![
        (ShaderStage::Vertex, vertex.resolve()?),
        (ShaderStage::Fragment, fragment.resolve()?),
    ];
    if let Some(geometry) = geometry {
        stages.push((ShaderStage::Geometry, geometry.resolve()?));
    }
    Ok(stages)
}

/// Prepends a line-number gutter to `source` and appends the driver `log`,
/// so driver messages that reference line numbers can be read against the
/// GLSL that produced them.
pub fn annotate_source(source: &str, log: &str) -> String {
    let numbered = source
        .lines()
        .enumerate()
        .map(|(idx, line)| format!("{:>4} | {line}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n");
    let log = log.trim_end();

    if numbered.is_empty() {
        log.to_string()
    } else if log.is_empty() {
        numbered
    } else {
        format!("{numbered}\n\n{log}")
    }
}

/// Compiles a single stage, deleting the shader object on failure.
#[allow(unsafe_code)]
fn compile_stage(
    gl: &glow::Context,
    stage: ShaderStage,
    source: &str,
) -> Result<glow::Shader, RenderError> {
    use glow::HasContext;

    // SAFETY: glow wraps raw GL calls as unsafe. We pass a valid stage type
    // constant and a valid source string; the handle is deleted on the
    // failure path before returning.
    let shader = unsafe {
        gl.create_shader(stage.gl_type())
            .map_err(|message| RenderError::CreateShader { stage, message })?
    };

    unsafe {
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
    }

    let compiled = unsafe { gl.get_shader_compile_status(shader) };

    if compiled {
        Ok(shader)
    } else {
        let info_log = unsafe { gl.get_shader_info_log(shader) };
        unsafe { gl.delete_shader(shader) };
        let log = annotate_source(source, &info_log);
        log::error!("{stage} shader failed to compile:\n{log}");
        Err(RenderError::Compile { stage, log })
    }
}

/// A linked shader program. Owns exactly one driver handle.
///
/// GL objects need the live context to be released, so cleanup is the
/// explicit [`destroy`](ShaderProgram::destroy) call rather than `Drop`.
pub struct ShaderProgram {
    program: glow::Program,
}

impl ShaderProgram {
    /// Compiles and links a program from per-stage source descriptors.
    ///
    /// Stages compile in vertex, fragment, geometry order; the geometry
    /// stage is skipped entirely when `geometry` is `None`. After linking,
    /// every stage handle is detached and deleted whether or not the link
    /// succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Io`] if a file-backed descriptor cannot be
    /// read, [`RenderError::Compile`] if a stage fails to compile, and
    /// [`RenderError::Link`] if the program fails to link. Already-compiled
    /// stage handles are released on every failure path.
    #[allow(unsafe_code)]
    pub fn new(
        gl: &glow::Context,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
        geometry: Option<&ShaderSource>,
    ) -> Result<Self, RenderError> {
        use glow::HasContext;

        let stages = stage_sources(vertex, fragment, geometry)?;

        let mut handles: Vec<glow::Shader> = Vec::with_capacity(stages.len());
        for (stage, source) in &stages {
            match compile_stage(gl, *stage, source) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    // SAFETY: every handle in the list came from a successful
                    // compile_stage call.
                    unsafe {
                        for handle in &handles {
                            gl.delete_shader(*handle);
                        }
                    }
                    return Err(e);
                }
            }
        }

        // SAFETY: glow wraps raw GL calls as unsafe. All shader handles are
        // valid; they are detached and deleted below on both outcomes, and
        // the program is deleted if linking fails.
        let program = unsafe {
            match gl.create_program() {
                Ok(program) => program,
                Err(message) => {
                    for handle in handles {
                        gl.delete_shader(handle);
                    }
                    return Err(RenderError::CreateProgram(message));
                }
            }
        };

        unsafe {
            for handle in &handles {
                gl.attach_shader(program, *handle);
            }
            gl.link_program(program);
        }

        let linked = unsafe { gl.get_program_link_status(program) };

        // A compiled stage must never outlive the program it was attached
        // to: detach and delete regardless of the link outcome.
        unsafe {
            for handle in handles {
                gl.detach_shader(program, handle);
                gl.delete_shader(handle);
            }
        }

        if linked {
            Ok(Self { program })
        } else {
            let info_log = unsafe { gl.get_program_info_log(program) };
            unsafe { gl.delete_program(program) };
            log::error!("shader program failed to link:\n{info_log}");
            Err(RenderError::Link(info_log))
        }
    }

    /// Compiles and links a vertex/fragment pair from file paths.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ShaderProgram::new`].
    pub fn from_files(
        gl: &glow::Context,
        vertex_path: impl Into<PathBuf>,
        fragment_path: impl Into<PathBuf>,
    ) -> Result<Self, RenderError> {
        Self::new(
            gl,
            &ShaderSource::file(vertex_path),
            &ShaderSource::file(fragment_path),
            None,
        )
    }

    /// Compiles and links a vertex/fragment pair from in-memory sources.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ShaderProgram::new`], minus file I/O.
    pub fn from_sources(
        gl: &glow::Context,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self, RenderError> {
        Self::new(
            gl,
            &ShaderSource::source(vertex_src),
            &ShaderSource::source(fragment_src),
            None,
        )
    }

    /// Makes this program current for subsequent draw calls.
    #[allow(unsafe_code)]
    pub fn bind(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: self.program is a valid linked program from new().
        unsafe { gl.use_program(Some(self.program)) };
    }

    /// Returns the linked program handle.
    pub fn program(&self) -> glow::Program {
        self.program
    }

    /// Looks up a uniform location by name, or `None` if the name does not
    /// resolve to an active uniform.
    #[allow(unsafe_code)]
    pub fn uniform_location(
        &self,
        gl: &glow::Context,
        name: &str,
    ) -> Option<glow::UniformLocation> {
        use glow::HasContext;

        // SAFETY: self.program is a valid linked program from new().
        unsafe { gl.get_uniform_location(self.program, name) }
    }

    /// Looks up a vertex attribute location by name, for wiring attribute
    /// bindings externally.
    #[allow(unsafe_code)]
    pub fn attrib_location(&self, gl: &glow::Context, name: &str) -> Option<u32> {
        use glow::HasContext;

        // SAFETY: self.program is a valid linked program from new().
        unsafe { gl.get_attrib_location(self.program, name) }
    }

    /// Sets a boolean uniform (uploaded as 0 or 1).
    ///
    /// Like every setter on this type, the location is looked up by name on
    /// each call, and a name with no active uniform is a silent no-op. The
    /// program must be bound first.
    #[allow(unsafe_code)]
    pub fn set_bool(&self, gl: &glow::Context, name: &str, value: bool) {
        use glow::HasContext;

        // SAFETY: a None location makes the upload a no-op, matching GL's
        // treatment of location -1.
        unsafe {
            let location = gl.get_uniform_location(self.program, name);
            gl.uniform_1_i32(location.as_ref(), i32::from(value));
        }
    }

    /// Sets an integer uniform.
    #[allow(unsafe_code)]
    pub fn set_int(&self, gl: &glow::Context, name: &str, value: i32) {
        use glow::HasContext;

        // SAFETY: see set_bool.
        unsafe {
            let location = gl.get_uniform_location(self.program, name);
            gl.uniform_1_i32(location.as_ref(), value);
        }
    }

    /// Sets a float uniform.
    #[allow(unsafe_code)]
    pub fn set_float(&self, gl: &glow::Context, name: &str, value: f32) {
        use glow::HasContext;

        // SAFETY: see set_bool.
        unsafe {
            let location = gl.get_uniform_location(self.program, name);
            gl.uniform_1_f32(location.as_ref(), value);
        }
    }

    /// Sets a vec2 uniform.
    #[allow(unsafe_code)]
    pub fn set_vec2(&self, gl: &glow::Context, name: &str, value: Vec2) {
        use glow::HasContext;

        // SAFETY: see set_bool.
        unsafe {
            let location = gl.get_uniform_location(self.program, name);
            gl.uniform_2_f32(location.as_ref(), value.x, value.y);
        }
    }

    /// Sets a vec3 uniform.
    #[allow(unsafe_code)]
    pub fn set_vec3(&self, gl: &glow::Context, name: &str, value: Vec3) {
        use glow::HasContext;

        // SAFETY: see set_bool.
        unsafe {
            let location = gl.get_uniform_location(self.program, name);
            gl.uniform_3_f32(location.as_ref(), value.x, value.y, value.z);
        }
    }

    /// Sets a vec4 uniform.
    #[allow(unsafe_code)]
    pub fn set_vec4(&self, gl: &glow::Context, name: &str, value: Vec4) {
        use glow::HasContext;

        // SAFETY: see set_bool.
        unsafe {
            let location = gl.get_uniform_location(self.program, name);
            gl.uniform_4_f32(location.as_ref(), value.x, value.y, value.z, value.w);
        }
    }

    /// Sets a 2x2 matrix uniform (column-major, no transpose).
    #[allow(unsafe_code)]
    pub fn set_mat2(&self, gl: &glow::Context, name: &str, value: Mat2) {
        use glow::HasContext;

        // SAFETY: see set_bool.
        unsafe {
            let location = gl.get_uniform_location(self.program, name);
            gl.uniform_matrix_2_f32_slice(location.as_ref(), false, &value.to_cols_array());
        }
    }

    /// Sets a 3x3 matrix uniform (column-major, no transpose).
    #[allow(unsafe_code)]
    pub fn set_mat3(&self, gl: &glow::Context, name: &str, value: Mat3) {
        use glow::HasContext;

        // SAFETY: see set_bool.
        unsafe {
            let location = gl.get_uniform_location(self.program, name);
            gl.uniform_matrix_3_f32_slice(location.as_ref(), false, &value.to_cols_array());
        }
    }

    /// Sets a 4x4 matrix uniform (column-major, no transpose).
    #[allow(unsafe_code)]
    pub fn set_mat4(&self, gl: &glow::Context, name: &str, value: Mat4) {
        use glow::HasContext;

        // SAFETY: see set_bool.
        unsafe {
            let location = gl.get_uniform_location(self.program, name);
            gl.uniform_matrix_4_f32_slice(location.as_ref(), false, &value.to_cols_array());
        }
    }

    /// Deletes the program, releasing the driver handle.
    ///
    /// Must be called before dropping the `ShaderProgram` for deterministic
    /// cleanup; GL objects cannot be released without the live context.
    #[allow(unsafe_code)]
    pub fn destroy(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: self.program is a valid linked program from new().
        unsafe { gl.delete_program(self.program) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // ── ShaderStage tests ──────────────────────────────────────────

    #[test]
    fn stage_gl_types_match_driver_constants() {
        assert_eq!(ShaderStage::Vertex.gl_type(), glow::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_type(), glow::FRAGMENT_SHADER);
        assert_eq!(ShaderStage::Geometry.gl_type(), glow::GEOMETRY_SHADER);
    }

    #[test]
    fn stage_labels_are_lowercase_names() {
        assert_eq!(ShaderStage::Vertex.label(), "vertex");
        assert_eq!(ShaderStage::Fragment.label(), "fragment");
        assert_eq!(ShaderStage::Geometry.label(), "geometry");
    }

    #[test]
    fn stage_display_matches_label() {
        for stage in [
            ShaderStage::Vertex,
            ShaderStage::Fragment,
            ShaderStage::Geometry,
        ] {
            assert_eq!(format!("{stage}"), stage.label());
        }
    }

    // ── ShaderSource tests ─────────────────────────────────────────

    #[test]
    fn file_constructor_stores_path() {
        let src = ShaderSource::file("shaders/tri.vert");
        assert_eq!(src, ShaderSource::File(PathBuf::from("shaders/tri.vert")));
    }

    #[test]
    fn source_constructor_stores_text() {
        let src = ShaderSource::source("void main() {}");
        assert_eq!(src, ShaderSource::Source("void main() {}".into()));
    }

    #[test]
    fn resolve_returns_in_memory_source_verbatim() {
        let glsl = "#version 330 core\nvoid main() {}\n";
        let resolved = ShaderSource::source(glsl).resolve().unwrap();
        assert_eq!(resolved, glsl);
    }

    #[test]
    fn resolve_reads_file_contents() {
        let glsl = "#version 330 core\nvoid main() {}\n";
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(glsl.as_bytes()).unwrap();

        let resolved = ShaderSource::file(file.path()).resolve().unwrap();
        assert_eq!(resolved, glsl);
    }

    #[test]
    fn resolve_missing_file_reports_path() {
        let result = ShaderSource::file("/no/such/dir/missing.vert").resolve();
        match result {
            Err(RenderError::Io { path, .. }) => {
                assert_eq!(path, PathBuf::from("/no/such/dir/missing.vert"));
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn file_and_source_resolve_to_identical_text() {
        let glsl = "#version 330 core\nuniform mat4 MVP;\nvoid main() {}\n";
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(glsl.as_bytes()).unwrap();

        let from_file = ShaderSource::file(file.path()).resolve().unwrap();
        let from_memory = ShaderSource::source(glsl).resolve().unwrap();
        assert_eq!(
            from_file, from_memory,
            "file-backed and in-memory descriptors must resolve identically"
        );
    }

    // ── stage_sources tests ────────────────────────────────────────

    #[test]
    fn stage_sources_without_geometry_has_two_stages() {
        let stages = stage_sources(
            &ShaderSource::source("vert"),
            &ShaderSource::source("frag"),
            None,
        )
        .unwrap();

        let kinds: Vec<ShaderStage> = stages.iter().map(|(stage, _)| *stage).collect();
        assert_eq!(kinds, vec![ShaderStage::Vertex, ShaderStage::Fragment]);
        assert!(
            !kinds.contains(&ShaderStage::Geometry),
            "no geometry stage may appear when no descriptor was supplied"
        );
    }

    #[test]
    fn stage_sources_with_geometry_appends_it_last() {
        let stages = stage_sources(
            &ShaderSource::source("vert"),
            &ShaderSource::source("frag"),
            Some(&ShaderSource::source("geo")),
        )
        .unwrap();

        assert_eq!(stages.len(), 3);
        assert_eq!(stages[2].0, ShaderStage::Geometry);
        assert_eq!(stages[2].1, "geo");
    }

    #[test]
    fn stage_sources_resolves_mixed_descriptors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"from file").unwrap();

        let stages = stage_sources(
            &ShaderSource::file(file.path()),
            &ShaderSource::source("from memory"),
            None,
        )
        .unwrap();

        assert_eq!(stages[0].1, "from file");
        assert_eq!(stages[1].1, "from memory");
    }

    #[test]
    fn stage_sources_propagates_read_failure() {
        let result = stage_sources(
            &ShaderSource::file("/no/such/file.vert"),
            &ShaderSource::source("frag"),
            None,
        );
        assert!(
            matches!(result, Err(RenderError::Io { .. })),
            "a missing file must abort stage resolution"
        );
    }

    // ── annotate_source tests ──────────────────────────────────────

    #[test]
    fn annotate_source_numbers_every_line() {
        let source = "#version 330 core\nvoid main() {\n}";
        let annotated = annotate_source(source, "ERROR: 0:2: syntax error");

        assert!(
            annotated.contains("   1 | #version 330 core"),
            "missing numbered line 1 in:\n{annotated}"
        );
        assert!(
            annotated.contains("   2 | void main() {"),
            "missing numbered line 2 in:\n{annotated}"
        );
        assert!(
            annotated.contains("   3 | }"),
            "missing numbered line 3 in:\n{annotated}"
        );
        assert!(
            annotated.contains("ERROR: 0:2"),
            "missing driver log in:\n{annotated}"
        );
    }

    #[test]
    fn annotate_source_keeps_line_order() {
        let source = "alpha\nbeta\ngamma";
        let annotated = annotate_source(source, "");
        let lines: Vec<&str> = annotated.lines().collect();
        assert_eq!(lines[0], "   1 | alpha");
        assert_eq!(lines[1], "   2 | beta");
        assert_eq!(lines[2], "   3 | gamma");
    }

    #[test]
    fn annotate_source_with_empty_source_returns_log() {
        assert_eq!(annotate_source("", "driver said no"), "driver said no");
    }

    #[test]
    fn annotate_source_with_empty_log_returns_numbered_source() {
        let annotated = annotate_source("void main() {}", "");
        assert_eq!(annotated, "   1 | void main() {}");
    }

    #[test]
    fn annotate_source_with_both_empty_is_empty() {
        assert_eq!(annotate_source("", ""), "");
    }

    #[test]
    fn annotate_source_trims_trailing_log_whitespace() {
        let annotated = annotate_source("x", "boom\n\n");
        assert!(
            annotated.ends_with("boom"),
            "expected trimmed log, got: {annotated:?}"
        );
    }

    // ── GL-bound tests ─────────────────────────────────────────────
    //
    // Program construction needs a live GL context. Run with
    // `cargo test -- --ignored` under a headless EGL/osmesa setup.

    #[test]
    #[ignore = "requires GL context"]
    fn new_compiles_and_links_a_valid_pair() {
        // Would test: ShaderProgram::from_sources with minimal valid GLSL
        // succeeds and program() returns a usable handle.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn from_files_behaves_like_from_sources() {
        // Would test: programs built from a file and from its contents
        // resolve the same uniform names and draw identically.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn geometry_stage_is_not_compiled_when_absent() {
        // Would test: construction with geometry = None performs no
        // geometry-stage compile or attach (no GL error, two attached
        // shaders reported before linking).
    }

    #[test]
    #[ignore = "requires GL context"]
    fn stage_handles_are_released_after_linking() {
        // Would test: after construction (success or link failure), no
        // intermediate shader objects remain alive.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn setters_are_noops_for_unknown_names() {
        // Would test: set_float(gl, "not_a_uniform", 1.0) neither errors
        // nor disturbs other uniforms.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn destroy_releases_the_program() {
        // Would test: after destroy(), the program handle is deleted.
    }
}
