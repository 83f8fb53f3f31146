//! Wire-format data model for diagram documents
//!
//! Field names and nesting follow the JSON documents produced by the
//! authoring side exactly; changing a rename here breaks compatibility
//! with stored diagrams.

use serde::Deserialize;
use serde_json::Value;

use crate::geometry::Rect;

/// Diagram notation, selecting the shape vocabulary and connector rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum NotationType {
    BusinessProcess,
    UseCase,
    Domain,
    Storyboard,
    Mockup,
    #[default]
    Generic,
}

impl NotationType {
    /// All notation types, in registration order
    pub const ALL: [NotationType; 6] = [
        NotationType::BusinessProcess,
        NotationType::UseCase,
        NotationType::Domain,
        NotationType::Storyboard,
        NotationType::Mockup,
        NotationType::Generic,
    ];

    /// Parse a kebab-case notation name, if recognized
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.as_str() == value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NotationType::BusinessProcess => "business-process",
            NotationType::UseCase => "use-case",
            NotationType::Domain => "domain",
            NotationType::Storyboard => "storyboard",
            NotationType::Mockup => "mockup",
            NotationType::Generic => "generic",
        }
    }
}

/// A complete diagram document, immutable input to one render pass
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramModel {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub notation_type: NotationType,
    #[serde(default = "default_canvas_extent")]
    pub width: f64,
    #[serde(default = "default_canvas_extent")]
    pub height: f64,
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

fn default_canvas_extent() -> f64 {
    1000.0
}

impl DiagramModel {
    /// Parse a diagram document from its JSON wire format
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Open-ended name/value attribute attached to a shape or connection.
///
/// Meaning is assigned per notation by the shape factory; the model itself
/// never interprets values.
#[derive(Debug, Clone, Deserialize)]
pub struct Prop {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

/// A single diagram shape, authored in the flattened absolute frame
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: u64,
    /// 0 or null means root
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(rename = "type")]
    pub shape_type: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_opacity: Option<f64>,
    #[serde(default)]
    pub stroke_width: Option<f64>,
    #[serde(default)]
    pub stroke_dash_pattern: Option<String>,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub gradient_fill: Option<String>,
    #[serde(default)]
    pub fill_opacity: Option<f64>,
    #[serde(default)]
    pub shadow: Option<bool>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub label_text_alignment: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub props: Vec<Prop>,
}

impl Shape {
    /// Parent shape id, if this shape is nested
    pub fn parent(&self) -> Option<u64> {
        match self.parent_id {
            Some(0) | None => None,
            other => other,
        }
    }

    /// Authored bounds in the flattened absolute frame
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Look up a prop by exact name. First match wins when duplicates exist.
    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    /// String value of a prop, if present and a string
    pub fn prop_str(&self, name: &str) -> Option<&str> {
        self.prop(name).and_then(Value::as_str)
    }

    /// Truthy prop: boolean `true` or the string `"true"`
    pub fn prop_bool(&self, name: &str) -> bool {
        match self.prop(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

/// An explicit waypoint on a connection path
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ModelPoint {
    pub x: f64,
    pub y: f64,
}

/// An edge between two shapes, or anchored to explicit coordinates
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: u64,
    #[serde(default)]
    pub parent_id: Option<u64>,
    /// Routing variant ("straight", "curved", "right-angled"); the notation
    /// default applies when absent or unrecognized.
    #[serde(rename = "type", default)]
    pub connection_type: Option<String>,
    #[serde(default)]
    pub source_id: Option<u64>,
    #[serde(default)]
    pub target_id: Option<u64>,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<f64>,
    #[serde(default)]
    pub stroke_dash_pattern: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub source_label: Option<String>,
    #[serde(default)]
    pub target_label: Option<String>,
    #[serde(default)]
    pub points: Vec<ModelPoint>,
    #[serde(default)]
    pub start_arrow: Option<String>,
    #[serde(default)]
    pub end_arrow: Option<String>,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub props: Vec<Prop>,
}

impl Connection {
    /// Source shape id, when the connection references one
    pub fn source(&self) -> Option<u64> {
        match self.source_id {
            Some(0) | None => None,
            other => other,
        }
    }

    /// Target shape id, when the connection references one
    pub fn target(&self) -> Option<u64> {
        match self.target_id {
            Some(0) | None => None,
            other => other,
        }
    }
}
