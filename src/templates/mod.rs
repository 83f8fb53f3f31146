//! Shape templates: one module per diagram notation
//!
//! Each notation maps its shape vocabulary onto a closed kind enum and
//! renders a [`VisualUnit`] per shape: a primary styled primitive plus
//! nested sub-units (markers, inner rings, title bars) with geometry
//! expressed relative to the parent so they survive resizes. An unknown
//! type string renders to `None`, which the composer treats as "skip this
//! element" rather than an error; that keeps old engines tolerant of
//! documents written by newer notations.

mod business;
mod domain;
mod generic;
mod mockup;
mod storyboard;
mod usecase;

pub use business::BusinessProcessTemplates;
pub use domain::DomainTemplates;
pub use generic::GenericTemplates;
pub use mockup::MockupTemplates;
pub use storyboard::StoryboardTemplates;
pub use usecase::UseCaseTemplates;

use crate::geometry::Point;
use crate::model::{Connection, NotationType, Shape};
use crate::style::Style;
use crate::theme::Theme;

/// Side length of a decorative marker sub-shape
pub const MARKER_SIZE: f64 = 14.0;
/// Horizontal slot claimed by one marker in the bottom strip
pub const MARKER_SLOT_WIDTH: f64 = 17.0;
/// Gap between the marker strip and the shape's bottom edge
pub const MARKER_BOTTOM_GAP: f64 = 3.0;

/// A nested primitive composed into a parent visual unit.
///
/// `fraction` positions the sub-unit as a fraction of the parent's size;
/// `offset` is an extra pixel displacement. Width and height are pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct SubUnit {
    pub style: Style,
    pub fraction: Point,
    pub offset: Point,
    pub width: f64,
    pub height: f64,
    pub label: Option<String>,
}

impl SubUnit {
    /// A marker-sized sub-unit anchored to the bottom-center of its parent
    pub fn bottom_marker(style: Style) -> Self {
        Self {
            style,
            fraction: Point::new(0.5, 1.0),
            offset: Point::new(-MARKER_SIZE / 2.0, -MARKER_SIZE - MARKER_BOTTOM_GAP),
            width: MARKER_SIZE,
            height: MARKER_SIZE,
            label: None,
        }
    }

    /// A marker-sized sub-unit anchored to the top-left corner of its parent
    pub fn corner_marker(style: Style) -> Self {
        Self {
            style,
            fraction: Point::new(0.0, 0.0),
            offset: Point::new(4.0, 4.0),
            width: MARKER_SIZE,
            height: MARKER_SIZE,
            label: None,
        }
    }
}

/// One diagram element rendered as a composed, styled primitive
#[derive(Debug, Clone, PartialEq)]
pub struct VisualUnit {
    pub style: Style,
    pub label: Option<String>,
    /// Organizational container: children keep their coordinates and the
    /// bounds derive from them instead of the authored rectangle
    pub is_group: bool,
    pub children: Vec<SubUnit>,
}

impl VisualUnit {
    pub fn new(style: Style) -> Self {
        Self {
            style,
            label: None,
            is_group: false,
            children: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn group(style: Style) -> Self {
        Self {
            is_group: true,
            ..Self::new(style)
        }
    }
}

/// Routing rule for a connection path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeRouting {
    #[default]
    Straight,
    Curved,
    RightAngled,
}

impl EdgeRouting {
    /// Parse the wire-format routing name, if recognized
    pub fn from_type(value: &str) -> Option<Self> {
        match value {
            "straight" => Some(EdgeRouting::Straight),
            "curved" => Some(EdgeRouting::Curved),
            "right-angled" => Some(EdgeRouting::RightAngled),
            _ => None,
        }
    }
}

/// A rendered connection: style plus the routing rule to lay its path out
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeUnit {
    pub style: Style,
    pub routing: EdgeRouting,
}

/// A notation's shape factory and connector rule
pub trait NotationTemplates {
    /// Render one shape into a visual unit; `None` skips the element
    fn render_shape(&self, shape: &Shape, theme: &Theme) -> Option<VisualUnit>;

    /// Render one connection. Notations have a single connector rule; the
    /// connection's own `type` may still pick a different routing variant.
    fn connector(&self, conn: &Connection, theme: &Theme) -> EdgeUnit;
}

/// Resolve the template set for a notation
pub fn for_notation(notation: NotationType) -> &'static dyn NotationTemplates {
    match notation {
        NotationType::BusinessProcess => &BusinessProcessTemplates,
        NotationType::UseCase => &UseCaseTemplates,
        NotationType::Domain => &DomainTemplates,
        NotationType::Storyboard => &StoryboardTemplates,
        NotationType::Mockup => &MockupTemplates,
        NotationType::Generic => &GenericTemplates,
    }
}

/// Append a marker to the bottom strip.
///
/// Each newly activated marker claims the slot nearest the bottom-center
/// anchor and pushes every already-placed marker one slot to the left, so
/// the strip grows leftwards without overlaps.
pub fn push_strip_marker(strip: &mut Vec<SubUnit>, marker: SubUnit) {
    for placed in strip.iter_mut() {
        placed.offset.x -= MARKER_SLOT_WIDTH;
    }
    strip.push(marker);
}

/// Shared base style: primitive class plus the shape's own attribute
/// overrides layered over the theme defaults.
pub(crate) fn base_shape_style(
    primitive: &str,
    shape: &Shape,
    theme: &Theme,
    fill_token: &str,
    stroke_token: &str,
) -> Style {
    let fill = shape
        .fill
        .clone()
        .unwrap_or_else(|| theme.resolve(fill_token));
    let stroke = shape
        .stroke
        .clone()
        .unwrap_or_else(|| theme.resolve(stroke_token));
    let mut style = Style::new()
        .with("shape", primitive)
        .with("fillColor", fill)
        .with("strokeColor", stroke)
        .with_opt("strokeWidth", shape.stroke_width)
        .with_opt("fillOpacity", shape.fill_opacity)
        .with_opt("strokeOpacity", shape.stroke_opacity)
        .with_opt("gradientColor", shape.gradient_fill.clone())
        .with_opt("align", shape.label_text_alignment.clone());
    if let Some(pattern) = &shape.stroke_dash_pattern {
        style = style.with("dashed", 1).with("dashPattern", pattern);
    }
    if shape.shadow == Some(true) {
        style = style.with("shadow", 1);
    }
    if shape.angle != 0.0 {
        style = style.with("rotation", shape.angle);
    }
    style
}

/// Shared base style for edges, with the connection's attribute overrides
pub(crate) fn base_edge_style(
    conn: &Connection,
    theme: &Theme,
    default_routing: EdgeRouting,
) -> EdgeUnit {
    let routing = conn
        .connection_type
        .as_deref()
        .and_then(EdgeRouting::from_type)
        .unwrap_or(default_routing);
    let stroke = conn
        .stroke
        .clone()
        .unwrap_or_else(|| theme.resolve("edge-stroke"));
    let mut style = Style::new()
        .with(
            "edgeStyle",
            match routing {
                EdgeRouting::Straight => "straight",
                EdgeRouting::Curved => "curved",
                EdgeRouting::RightAngled => "rightAngled",
            },
        )
        .with("strokeColor", stroke)
        .with_opt("strokeWidth", conn.stroke_width)
        .with_opt("startArrow", conn.start_arrow.clone())
        .with_opt("endArrow", conn.end_arrow.clone());
    if let Some(pattern) = &conn.stroke_dash_pattern {
        style = style.with("dashed", 1).with("dashPattern", pattern);
    }
    EdgeUnit { style, routing }
}
