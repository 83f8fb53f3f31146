//! Diaglyph - a diagram composition and rendering engine
//!
//! The engine takes flat diagram documents (shapes, connections, and an
//! open-ended prop bag per element), builds the nesting hierarchy, maps
//! each element through its notation's shape templates, and composes the
//! result into a scene graph that exports to SVG.
//!
//! # Example
//!
//! ```rust
//! use diaglyph::render;
//!
//! let json = r#"{
//!     "id": 1, "notationType": "generic", "width": 400, "height": 300,
//!     "shapes": [{"id": 2, "type": "Rectangle",
//!                 "x": 10, "y": 10, "width": 100, "height": 60}],
//!     "connections": []
//! }"#;
//! let svg = render(json).unwrap();
//! assert!(svg.contains("<svg"));
//! ```

pub mod composer;
pub mod error;
pub mod geometry;
pub mod hierarchy;
pub mod model;
pub mod scene;
pub mod style;
pub mod svg;
pub mod templates;
pub mod theme;

pub use composer::{DiagramView, NoStencils, StencilCache, StencilProvider};
pub use error::RenderError;
pub use model::{Connection, DiagramModel, NotationType, Shape};
pub use style::Style;
pub use theme::Theme;

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Theme for color resolution
    pub theme: Theme,
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the theme for color resolution
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

/// Render a diagram document (JSON wire format) to SVG with defaults.
///
/// This is the main entry point for the library. It parses the document,
/// composes the scene, and exports SVG markup.
pub fn render(json: &str) -> Result<String, RenderError> {
    render_with_config(json, RenderConfig::default())
}

/// Render a diagram document to SVG with an explicit configuration
pub fn render_with_config(json: &str, config: RenderConfig) -> Result<String, RenderError> {
    let model = DiagramModel::from_json(json)?;
    let mut view = DiagramView::new(config.theme, StencilCache::new());
    view.draw_diagram(&model);
    Ok(view.to_svg())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_minimal_document() {
        let json = r#"{
            "id": 1, "notationType": "generic", "width": 400, "height": 300,
            "shapes": [{"id": 2, "type": "Rectangle",
                        "x": 10, "y": 10, "width": 100, "height": 60}],
            "connections": []
        }"#;
        let svg = render(json).expect("should render");
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("viewBox=\"0 0 400 300\""));
    }

    #[test]
    fn test_render_rejects_malformed_json() {
        let err = render("{not json").expect_err("should fail");
        assert!(matches!(err, RenderError::Document(_)));
    }
}
