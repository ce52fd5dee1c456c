//! Locates a TrueType font for the text overlay demos.
//!
//! No font ships with the repo, so discovery walks a short candidate
//! list: a `fonts/` directory next to the working directory first, then
//! the usual system locations per platform. `GLSKETCH_FONT` overrides
//! everything for odd setups.

use std::path::{Path, PathBuf};

use crate::error::DemoError;

/// Environment variable that overrides font discovery.
pub const FONT_ENV: &str = "GLSKETCH_FONT";

/// Candidate font paths, probed in order.
const CANDIDATES: &[&str] = &[
    "fonts/arial.ttf",
    "fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Returns the first path in `candidates` that names an existing file.
fn first_existing<'a, I>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = &'a str>,
{
    candidates
        .into_iter()
        .map(Path::new)
        .find(|path| path.is_file())
        .map(Path::to_path_buf)
}

/// Finds a TTF to rasterize, honoring the [`FONT_ENV`] override.
///
/// # Errors
///
/// Returns [`DemoError::Font`] when the override points at a missing file
/// or no candidate exists on this machine.
pub fn find_font() -> Result<PathBuf, DemoError> {
    if let Ok(path) = std::env::var(FONT_ENV) {
        let path = PathBuf::from(path);
        if path.is_file() {
            return Ok(path);
        }
        return Err(DemoError::Font(format!(
            "{FONT_ENV} points to {}, which is not a file",
            path.display()
        )));
    }

    first_existing(CANDIDATES.iter().copied()).ok_or_else(|| {
        DemoError::Font(format!(
            "no usable TTF found; set {FONT_ENV} to a font file path"
        ))
    })
}
