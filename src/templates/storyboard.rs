//! Storyboard notation: frames, scenes, captions

use crate::geometry::Point;
use crate::model::{Connection, Shape};
use crate::style::Style;
use crate::theme::Theme;

use super::{
    base_edge_style, base_shape_style, EdgeRouting, EdgeUnit, NotationTemplates, SubUnit,
    VisualUnit,
};

pub struct StoryboardTemplates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeKind {
    Frame,
    Scene,
    Caption,
    Group,
}

impl ShapeKind {
    fn parse(type_name: &str) -> Option<Self> {
        Some(match type_name {
            "Frame" => ShapeKind::Frame,
            "Scene" => ShapeKind::Scene,
            "Caption" => ShapeKind::Caption,
            "Group" => ShapeKind::Group,
            _ => return None,
        })
    }
}

impl NotationTemplates for StoryboardTemplates {
    fn render_shape(&self, shape: &Shape, theme: &Theme) -> Option<VisualUnit> {
        let kind = ShapeKind::parse(&shape.shape_type)?;
        let unit = match kind {
            ShapeKind::Frame => {
                let style = base_shape_style(
                    "rectangle",
                    shape,
                    theme,
                    "container-fill",
                    "container-stroke",
                )
                .with("verticalAlign", "top");
                let mut unit = VisualUnit::new(style).with_label(shape.label.clone());
                // Numbered badge in the frame corner
                if let Some(number) = shape.prop_str("FrameNumber") {
                    unit.children.push(SubUnit {
                        style: Style::new()
                            .with("shape", "ellipse")
                            .with("fillColor", theme.resolve("marker-fill"))
                            .with("strokeColor", theme.resolve("marker-stroke")),
                        fraction: Point::new(0.0, 0.0),
                        offset: Point::new(4.0, 4.0),
                        width: 18.0,
                        height: 18.0,
                        label: Some(number.to_string()),
                    });
                }
                unit
            }
            ShapeKind::Scene => {
                let style = base_shape_style(
                    "scene",
                    shape,
                    theme,
                    "shape-fill",
                    "shape-stroke",
                );
                VisualUnit::new(style).with_label(shape.label.clone())
            }
            ShapeKind::Caption => {
                let style = Style::new()
                    .with("shape", "text")
                    .with("fillColor", "none")
                    .with("strokeColor", "none")
                    .with("fontColor", theme.resolve("label-color"));
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
        // Narrative flow reads best as a curve
        let mut unit = base_edge_style(conn, theme, EdgeRouting::Curved);
        if !unit.style.contains("endArrow") {
            unit.style = unit.style.clone().with("endArrow", "block");
        }
        unit
    }
}
