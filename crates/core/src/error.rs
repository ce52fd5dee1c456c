//! Error types for the glsketch core.

use std::path::PathBuf;

use thiserror::Error;

use crate::shader::ShaderStage;

/// Errors produced while building shader programs or the text renderer.
///
/// Every constructor in this crate returns `Result<_, RenderError>`; partial
/// native resources are released before the error propagates, so a failed
/// construction never leaks driver objects.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A shader source or font file could not be read.
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The driver refused to allocate a shader object.
    #[error("could not create a {stage} shader object: {message}")]
    CreateShader {
        stage: ShaderStage,
        message: String,
    },

    /// A shader stage failed to compile.
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile {
        /// The stage that failed.
        stage: ShaderStage,
        /// Driver info log, with the offending source prepended line-numbered.
        log: String,
    },

    /// A program failed to link.
    #[error("shader program failed to link:\n{0}")]
    Link(String),

    /// The driver refused to allocate a program object.
    #[error("could not create a program object: {0}")]
    CreateProgram(String),

    /// The driver refused to allocate a buffer object.
    #[error("could not create a vertex buffer: {0}")]
    CreateBuffer(String),

    /// The driver refused to allocate a vertex array object.
    #[error("could not create a vertex array: {0}")]
    CreateVertexArray(String),

    /// The driver refused to allocate a texture object.
    #[error("could not create a glyph texture: {0}")]
    CreateTexture(String),

    /// The font file could not be parsed by the rasterizer.
    #[error("could not load font: {0}")]
    FontLoad(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_includes_path_and_cause() {
        let err = RenderError::Io {
            path: PathBuf::from("shaders/tri.vert"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = format!("{err}");
        assert!(
            msg.contains("shaders/tri.vert"),
            "missing path in: {msg}"
        );
        assert!(msg.contains("no such file"), "missing cause in: {msg}");
    }

    #[test]
    fn compile_error_includes_stage_and_log() {
        let err = RenderError::Compile {
            stage: ShaderStage::Fragment,
            log: "undeclared identifier".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("fragment"), "missing stage in: {msg}");
        assert!(
            msg.contains("undeclared identifier"),
            "missing log in: {msg}"
        );
    }

    #[test]
    fn create_shader_error_includes_stage() {
        let err = RenderError::CreateShader {
            stage: ShaderStage::Geometry,
            message: "out of handles".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("geometry"), "missing stage in: {msg}");
        assert!(msg.contains("out of handles"), "missing message in: {msg}");
    }

    #[test]
    fn link_error_includes_log() {
        let err = RenderError::Link("varying mismatch".into());
        let msg = format!("{err}");
        assert!(msg.contains("varying mismatch"), "missing log in: {msg}");
    }

    #[test]
    fn font_load_error_includes_message() {
        let err = RenderError::FontLoad("unsupported table".into());
        let msg = format!("{err}");
        assert!(
            msg.contains("unsupported table"),
            "missing message in: {msg}"
        );
    }

    #[test]
    fn object_creation_errors_name_the_object() {
        let buffer = format!("{}", RenderError::CreateBuffer("oom".into()));
        assert!(buffer.contains("buffer"), "got: {buffer}");
        let vao = format!("{}", RenderError::CreateVertexArray("oom".into()));
        assert!(vao.contains("vertex array"), "got: {vao}");
        let texture = format!("{}", RenderError::CreateTexture("oom".into()));
        assert!(texture.contains("texture"), "got: {texture}");
        let program = format!("{}", RenderError::CreateProgram("oom".into()));
        assert!(program.contains("program"), "got: {program}");
    }

    #[test]
    fn io_error_exposes_source() {
        use std::error::Error;
        let err = RenderError::Io {
            path: PathBuf::from("font.ttf"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some(), "expected a source error");
    }

    #[test]
    fn render_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RenderError>();
    }

    #[test]
    fn render_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<RenderError>();
    }
}
