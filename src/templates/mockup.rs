//! UI-mockup notation: panels, widgets, controls

use crate::model::{Connection, Shape};
use crate::style::Style;
use crate::theme::Theme;

use super::{base_edge_style, base_shape_style, EdgeRouting, EdgeUnit, NotationTemplates, VisualUnit};

pub struct MockupTemplates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeKind {
    Panel,
    Button,
    TextInput,
    Checkbox,
    Dropdown,
    Label,
    Image,
    Group,
}

impl ShapeKind {
    fn parse(type_name: &str) -> Option<Self> {
        Some(match type_name {
            "Panel" => ShapeKind::Panel,
            "Button" => ShapeKind::Button,
            "TextInput" => ShapeKind::TextInput,
            "Checkbox" => ShapeKind::Checkbox,
            "Dropdown" => ShapeKind::Dropdown,
            "Label" => ShapeKind::Label,
            "Image" => ShapeKind::Image,
            "Group" => ShapeKind::Group,
            _ => return None,
        })
    }
}

impl NotationTemplates for MockupTemplates {
    fn render_shape(&self, shape: &Shape, theme: &Theme) -> Option<VisualUnit> {
        let kind = ShapeKind::parse(&shape.shape_type)?;
        let unit = match kind {
            ShapeKind::Panel => {
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
            ShapeKind::Button => {
                let style =
                    base_shape_style("rectangle", shape, theme, "shape-fill", "shape-stroke")
                        .with("rounded", 1);
                VisualUnit::new(style).with_label(shape.label.clone())
            }
            ShapeKind::TextInput => {
                let style =
                    base_shape_style("rectangle", shape, theme, "shape-fill", "shape-stroke")
                        .with("align", "left");
                VisualUnit::new(style).with_label(shape.label.clone())
            }
            ShapeKind::Checkbox => {
                let mut style =
                    base_shape_style("checkbox", shape, theme, "shape-fill", "shape-stroke")
                        .with("verticalLabelPosition", "right");
                if shape.prop_bool("Checked") {
                    style = style.with("checked", 1);
                }
                VisualUnit::new(style).with_label(shape.label.clone())
            }
            ShapeKind::Dropdown => {
                let style =
                    base_shape_style("dropdown", shape, theme, "shape-fill", "shape-stroke")
                        .with("align", "left");
                VisualUnit::new(style).with_label(shape.label.clone())
            }
            ShapeKind::Label => {
                let style = Style::new()
                    .with("shape", "text")
                    .with("fillColor", "none")
                    .with("strokeColor", "none")
                    .with("fontColor", theme.resolve("label-color"))
                    .with_opt("align", shape.label_text_alignment.clone());
                VisualUnit::new(style).with_label(shape.label.clone())
            }
            ShapeKind::Image => {
                let style =
                    base_shape_style("image-placeholder", shape, theme, "shape-fill", "shape-stroke");
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
        // Mockup annotations point at widgets with plain straight lines
        base_edge_style(conn, theme, EdgeRouting::Straight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkbox_checked_prop() {
        let shape: Shape = serde_json::from_value(serde_json::json!({
            "id": 1, "type": "Checkbox", "label": "Remember me",
            "props": [{"name": "Checked", "value": true}]
        }))
        .expect("shape json");
        let unit = MockupTemplates
            .render_shape(&shape, &Theme::default())
            .expect("checkbox renders");
        assert_eq!(unit.style.get("checked"), Some("1"));
    }

    #[test]
    fn test_label_has_no_border() {
        let shape: Shape = serde_json::from_value(serde_json::json!({
            "id": 1, "type": "Label", "label": "Username"
        }))
        .expect("shape json");
        let unit = MockupTemplates
            .render_shape(&shape, &Theme::default())
            .expect("label renders");
        assert_eq!(unit.style.get("strokeColor"), Some("none"));
    }
}
