#![deny(unsafe_code)]
//! Shared plumbing for the windowed demo binaries.
//!
//! - [`host`]: winit event loop, glutin context/surface, [`host::Scene`] trait
//! - [`font`]: TTF discovery for the text overlay
//! - [`error`]: demo errors mapped to process exit codes
//!
//! The binaries themselves live under `src/bin/` and stay small: a
//! [`host::Scene`] impl plus a `main` that picks the exit code.

pub mod error;
pub mod font;
pub mod host;

pub use error::DemoError;
pub use font::find_font;
pub use host::{run_scene, Scene};
