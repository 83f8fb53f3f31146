//! Color theme support
//!
//! Shape factories consult a theme for default fill and stroke values; a
//! diagram document's own style attributes always win over the theme.
//! Themes load from TOML so deployments can re-skin diagrams without
//! touching documents.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing themes
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("failed to read theme file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse theme TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A theme mapping color tokens to concrete values
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: Option<String>,
    /// Token name -> color value
    pub colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlTheme {
    metadata: Option<TomlMetadata>,
    colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
}

/// Default palette: white fills, dark strokes, muted container tints
const DEFAULT_PALETTE: &str = r##"
[colors]
shape-fill = "#ffffff"
shape-stroke = "#585858"
container-fill = "#f9f9f9"
container-stroke = "#585858"
marker-fill = "#ffffff"
marker-stroke = "#585858"
edge-stroke = "#585858"
label-color = "#373737"
annotation-stroke = "#9a9a9a"
"##;

impl Theme {
    /// Load a theme from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load a theme from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ThemeError> {
        let parsed: TomlTheme = toml::from_str(content)?;
        Ok(Theme {
            name: parsed.metadata.and_then(|m| m.name),
            colors: parsed.colors,
        })
    }

    /// Resolve a token against this theme, falling back to the default
    /// palette and finally to a dark gray.
    pub fn resolve(&self, token: &str) -> String {
        if let Some(color) = self.colors.get(token) {
            return color.clone();
        }
        if let Some(color) = Theme::default().colors.get(token) {
            return color.clone();
        }
        "#585858".to_string()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_toml(DEFAULT_PALETTE).expect("default palette is valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_tokens() {
        let theme = Theme::default();
        assert_eq!(theme.resolve("shape-fill"), "#ffffff");
        assert_eq!(theme.resolve("edge-stroke"), "#585858");
    }

    #[test]
    fn test_override_wins_over_default() {
        let theme = Theme::from_toml(
            r##"
[metadata]
name = "dark"

[colors]
shape-fill = "#222222"
"##,
        )
        .expect("should parse");
        assert_eq!(theme.name.as_deref(), Some("dark"));
        assert_eq!(theme.resolve("shape-fill"), "#222222");
        // Unset tokens fall through to the default palette
        assert_eq!(theme.resolve("shape-stroke"), "#585858");
    }

    #[test]
    fn test_unknown_token_falls_back() {
        let theme = Theme::default();
        assert_eq!(theme.resolve("no-such-token"), "#585858");
    }

    #[test]
    fn test_invalid_toml_error() {
        assert!(Theme::from_toml("not toml {{{{").is_err());
    }
}
