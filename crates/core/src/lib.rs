#![deny(unsafe_code)]
//! Shader and text-rendering building blocks for OpenGL bootstrap demos.
//!
//! Provides the [`ShaderProgram`] wrapper (file- or memory-sourced stages,
//! by-name uniform setters) and the [`TextRenderer`] (per-glyph textures
//! over one streamed quad), with typed [`RenderError`]s for everything
//! that can fail against the driver.
//!
//! All GL access goes through [`glow`], so a context from any windowing
//! stack works. Raw calls are confined to narrow `#[allow(unsafe_code)]`
//! functions; the crate root denies `unsafe` everywhere else.

pub mod error;
pub mod shader;
pub mod text;

pub use error::RenderError;
pub use shader::{ShaderProgram, ShaderSource, ShaderStage};
pub use text::{Glyph, GlyphMetrics, TextRenderer};
