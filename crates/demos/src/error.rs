//! Structured demo errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success (window closed normally)
//! - 10: render error (shader compile/link, GL object creation, font parse)
//! - 11: window error (event loop, GL context or surface creation)
//! - 12: font discovery error (no usable TTF found)
//! - 13: scene error (a demo's own GL setup went wrong)

use std::fmt;

use glsketch_core::RenderError;

/// Errors produced by the demo binaries, each mapped to a distinct exit code.
pub enum DemoError {
    /// A rendering-layer error (shader, GL object, font data).
    Render(RenderError),
    /// A windowing error (event loop, context, surface).
    Window(String),
    /// No font file could be located for the text overlay.
    Font(String),
    /// A demo scene failed its own setup (missing attribute, bad state).
    Scene(String),
}

impl DemoError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            DemoError::Render(_) => 10,
            DemoError::Window(_) => 11,
            DemoError::Font(_) => 12,
            DemoError::Scene(_) => 13,
        }
    }
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemoError::Render(e) => write!(f, "{e}"),
            DemoError::Window(msg) => write!(f, "{msg}"),
            DemoError::Font(msg) => write!(f, "{msg}"),
            DemoError::Scene(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<RenderError> for DemoError {
    fn from(e: RenderError) -> Self {
        DemoError::Render(e)
    }
}
