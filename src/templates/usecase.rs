//! Use-case notation: actors, use cases, system boundaries

use crate::model::{Connection, Shape};
use crate::style::Style;
use crate::theme::Theme;

use super::{base_edge_style, base_shape_style, EdgeRouting, EdgeUnit, NotationTemplates, VisualUnit};

pub struct UseCaseTemplates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeKind {
    Actor,
    UseCase,
    SystemBoundary,
    Note,
    Group,
}

impl ShapeKind {
    fn parse(type_name: &str) -> Option<Self> {
        Some(match type_name {
            "Actor" => ShapeKind::Actor,
            "UseCase" => ShapeKind::UseCase,
            "SystemBoundary" => ShapeKind::SystemBoundary,
            "Note" => ShapeKind::Note,
            "Group" => ShapeKind::Group,
            _ => return None,
        })
    }
}

impl NotationTemplates for UseCaseTemplates {
    fn render_shape(&self, shape: &Shape, theme: &Theme) -> Option<VisualUnit> {
        let kind = ShapeKind::parse(&shape.shape_type)?;
        let unit = match kind {
            ShapeKind::Actor => {
                // Stick-figure stencil, label below the figure
                let style = base_shape_style("actor", shape, theme, "shape-fill", "shape-stroke")
                    .with("verticalLabelPosition", "bottom");
                VisualUnit::new(style).with_label(shape.label.clone())
            }
            ShapeKind::UseCase => {
                let style =
                    base_shape_style("ellipse", shape, theme, "shape-fill", "shape-stroke");
                VisualUnit::new(style).with_label(shape.label.clone())
            }
            ShapeKind::SystemBoundary => {
                let style = base_shape_style(
                    "rectangle",
                    shape,
                    theme,
                    "container-fill",
                    "container-stroke",
                )
                .with("verticalAlign", "top");
                VisualUnit::new(style).with_label(shape.label.clone())
            }
            ShapeKind::Note => {
                let style =
                    base_shape_style("note", shape, theme, "shape-fill", "annotation-stroke");
                VisualUnit::new(style).with_label(shape.label.clone())
            }
            ShapeKind::Group => {
                let style = Style::new()
                    .with("shape", "rectangle")
                    .with("fillColor", "none")
                    .with("strokeColor", theme.resolve("annotation-stroke"))
                    .with("dashed", 1)
                    .with("group", 1);
                VisualUnit::group(style).with_label(shape.label.clone())
            }
        };
        Some(unit)
    }

    fn connector(&self, conn: &Connection, theme: &Theme) -> EdgeUnit {
        let mut unit = base_edge_style(conn, theme, EdgeRouting::Straight);
        // Include/extend relationships arrive as a dashed open-arrow edge
        if conn.props.iter().any(|p| p.name == "Stereotype") {
            if !unit.style.contains("dashed") {
                unit.style = unit.style.clone().with("dashed", 1).with("dashPattern", "4 4");
            }
            if !unit.style.contains("endArrow") {
                unit.style = unit.style.clone().with("endArrow", "open");
            }
        }
        unit
    }
}
