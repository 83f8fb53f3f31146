//! Generic shape notation: plain drawing primitives

use crate::model::{Connection, Shape};
use crate::style::Style;
use crate::theme::Theme;

use super::{base_edge_style, base_shape_style, EdgeRouting, EdgeUnit, NotationTemplates, VisualUnit};

pub struct GenericTemplates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeKind {
    Rectangle,
    RoundedRectangle,
    Ellipse,
    Rhombus,
    Triangle,
    Text,
    Group,
}

impl ShapeKind {
    fn parse(type_name: &str) -> Option<Self> {
        Some(match type_name {
            "Rectangle" => ShapeKind::Rectangle,
            "RoundedRectangle" => ShapeKind::RoundedRectangle,
            "Ellipse" => ShapeKind::Ellipse,
            "Rhombus" => ShapeKind::Rhombus,
            "Triangle" => ShapeKind::Triangle,
            "Text" => ShapeKind::Text,
            "Group" => ShapeKind::Group,
            _ => return None,
        })
    }
}

impl NotationTemplates for GenericTemplates {
    fn render_shape(&self, shape: &Shape, theme: &Theme) -> Option<VisualUnit> {
        let kind = ShapeKind::parse(&shape.shape_type)?;
        let unit = match kind {
            ShapeKind::Rectangle => VisualUnit::new(base_shape_style(
                "rectangle",
                shape,
                theme,
                "shape-fill",
                "shape-stroke",
            ))
            .with_label(shape.label.clone()),
            ShapeKind::RoundedRectangle => VisualUnit::new(
                base_shape_style("rectangle", shape, theme, "shape-fill", "shape-stroke")
                    .with("rounded", 1),
            )
            .with_label(shape.label.clone()),
            ShapeKind::Ellipse => VisualUnit::new(base_shape_style(
                "ellipse",
                shape,
                theme,
                "shape-fill",
                "shape-stroke",
            ))
            .with_label(shape.label.clone()),
            ShapeKind::Rhombus => VisualUnit::new(base_shape_style(
                "rhombus",
                shape,
                theme,
                "shape-fill",
                "shape-stroke",
            ))
            .with_label(shape.label.clone()),
            ShapeKind::Triangle => VisualUnit::new(base_shape_style(
                "triangle",
                shape,
                theme,
                "shape-fill",
                "shape-stroke",
            ))
            .with_label(shape.label.clone()),
            ShapeKind::Text => VisualUnit::new(
                Style::new()
                    .with("shape", "text")
                    .with("fillColor", "none")
                    .with("strokeColor", "none")
                    .with("fontColor", theme.resolve("label-color")),
            )
            .with_label(shape.label.clone()),
            ShapeKind::Group => VisualUnit::group(
                Style::new()
                    .with("shape", "rectangle")
                    .with("fillColor", "none")
                    .with("strokeColor", theme.resolve("annotation-stroke"))
                    .with("dashed", 1)
                    .with("group", 1),
            )
            .with_label(shape.label.clone()),
        };
        Some(unit)
    }

    fn connector(&self, conn: &Connection, theme: &Theme) -> EdgeUnit {
        base_edge_style(conn, theme, EdgeRouting::Straight)
    }
}
