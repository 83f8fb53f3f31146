//! Style serialization for scene-graph cells
//!
//! The scene graph consumes styles as `key1=value1;key2=value2;` strings.
//! `Style` is an order-preserving builder over that wire format: keys
//! serialize in insertion order and parsing the produced string recovers an
//! equivalent key/value set.

use indexmap::IndexMap;

/// An insertion-ordered mapping of style keys to values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    entries: IndexMap<String, String>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a key, returning the updated style.
    ///
    /// Replacing an existing key keeps its original position.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.entries.insert(key.into(), value.to_string());
        self
    }

    /// Conditionally add a key; `None` leaves the style unchanged
    pub fn with_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    /// Remove a key, returning the updated style
    pub fn without(mut self, key: &str) -> Self {
        self.entries.shift_remove(key);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Serialize to the `key=value;` wire format. Empty style yields `""`.
    pub fn to_style_string(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push(';');
        }
        out
    }

    /// Parse a `key=value;` string back into a style.
    ///
    /// Segments without `=` and empty segments are skipped.
    pub fn parse(input: &str) -> Self {
        let mut style = Style::new();
        for segment in input.split(';') {
            if segment.is_empty() {
                continue;
            }
            if let Some((key, value)) = segment.split_once('=') {
                style.entries.insert(key.to_string(), value.to_string());
            }
        }
        style
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_style_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serialize_insertion_order() {
        let style = Style::new()
            .with("shape", "ellipse")
            .with("fillColor", "#ffffff")
            .with("strokeWidth", 2);
        assert_eq!(
            style.to_style_string(),
            "shape=ellipse;fillColor=#ffffff;strokeWidth=2;"
        );
    }

    #[test]
    fn test_empty_style_serializes_to_empty_string() {
        assert_eq!(Style::new().to_style_string(), "");
    }

    #[test]
    fn test_without_removes_key() {
        let style = Style::new()
            .with("rounded", 1)
            .with("dashed", 1)
            .without("rounded");
        assert_eq!(style.to_style_string(), "dashed=1;");
        assert!(!style.contains("rounded"));
    }

    #[test]
    fn test_replace_keeps_position() {
        let style = Style::new()
            .with("a", 1)
            .with("b", 2)
            .with("a", 3);
        assert_eq!(style.to_style_string(), "a=3;b=2;");
    }

    #[test]
    fn test_round_trip() {
        let style = Style::new()
            .with("shape", "rhombus")
            .with("fillColor", "#f5f5f5")
            .with("opacity", "0.5")
            .with("dashPattern", "4 2");
        let parsed = Style::parse(&style.to_style_string());
        assert_eq!(parsed, style);
    }

    #[test]
    fn test_parse_skips_malformed_segments() {
        let style = Style::parse("a=1;;garbage;b=2;");
        assert_eq!(style.len(), 2);
        assert_eq!(style.get("a"), Some("1"));
        assert_eq!(style.get("b"), Some("2"));
    }

    #[test]
    fn test_parse_empty_string() {
        assert_eq!(Style::parse(""), Style::new());
    }

    #[test]
    fn test_with_opt_none_is_noop() {
        let style = Style::new().with_opt("fillColor", None::<&str>).with("a", 1);
        assert_eq!(style.to_style_string(), "a=1;");
    }
}
