//! Glyph-based text rendering.
//!
//! - [`glyph`]: per-character textures and pixel metrics
//! - [`layout`]: pure line layout (anchoring, quads, pen advances)
//! - [`phase`]: begin/end bracketing of text drawing
//! - [`renderer`]: the GL-facing [`TextRenderer`]
//! - [`shaders`]: embedded GLSL for the glyph pipeline
//!
//! Layout is kept free of GL calls so the coordinate math is testable
//! without a context; the renderer only binds objects and streams the
//! quads layout hands it.

pub mod glyph;
pub mod layout;
pub mod phase;
pub mod renderer;
pub mod shaders;

pub use glyph::{Glyph, GlyphMetrics};
pub use layout::{LineLayout, QuadVertices};
pub use phase::DrawPhase;
pub use renderer::{TextRenderer, QUAD_BYTES};
pub use shaders::{TEXT_FRAGMENT_SHADER, TEXT_VERTEX_SHADER};
