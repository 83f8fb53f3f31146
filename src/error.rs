//! Error types for the render pipeline

use thiserror::Error;

/// Errors that can occur while loading and rendering a diagram document.
///
/// Engine-internal failures are non-fatal (bad elements degrade to "not
/// drawn"), so the only error surface is the document boundary.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The input was not a valid diagram document
    #[error("invalid diagram document: {0}")]
    Document(#[from] serde_json::Error),
}
