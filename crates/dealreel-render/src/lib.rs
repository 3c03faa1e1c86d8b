//! Renderers: pure functions from a [`dealreel_core::DealSnapshot`] to an
//! artifact. They format canonical fields and never re-derive them.

pub mod error;
pub mod html;
pub mod metadata;
pub mod slides;

use std::path::Path;

use serde::Serialize;

pub use error::RenderError;
pub use html::render_html;
pub use metadata::{build_metadata, VideoMetadata};
pub use slides::{load_layout, plan_slides, SlideLayout, SlidePlan};

/// Serializes a plan or metadata value as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`RenderError::Serialize`] if the value cannot be represented as JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Writes a rendered artifact to `path`.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the file cannot be written.
pub fn write_artifact(path: &Path, contents: &str) -> Result<(), RenderError> {
    std::fs::write(path, contents).map_err(|e| RenderError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "artifact written");
    Ok(())
}
