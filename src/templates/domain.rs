//! Domain notation: entities with attribute compartments and typed relations

use crate::geometry::Point;
use crate::model::{Connection, Shape};
use crate::style::Style;
use crate::theme::Theme;

use super::{
    base_edge_style, base_shape_style, EdgeRouting, EdgeUnit, NotationTemplates, SubUnit,
    VisualUnit,
};

pub struct DomainTemplates;

/// Height of the title compartment of an entity box
const TITLE_HEIGHT: f64 = 26.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeKind {
    Entity,
    Enumeration,
    Note,
    Group,
}

impl ShapeKind {
    fn parse(type_name: &str) -> Option<Self> {
        Some(match type_name {
            "Entity" => ShapeKind::Entity,
            "Enumeration" => ShapeKind::Enumeration,
            "Note" => ShapeKind::Note,
            "Group" => ShapeKind::Group,
            _ => return None,
        })
    }
}

/// Title bar plus attribute body, shared by entities and enumerations
fn compartmented(shape: &Shape, theme: &Theme, stereotype: Option<&str>) -> VisualUnit {
    let style = base_shape_style("rectangle", shape, theme, "shape-fill", "shape-stroke")
        .with("verticalAlign", "top");
    let mut unit = VisualUnit::new(style).with_label(match (stereotype, &shape.label) {
        (Some(tag), Some(label)) => Some(format!("\u{ab}{tag}\u{bb} {label}")),
        (Some(tag), None) => Some(format!("\u{ab}{tag}\u{bb}")),
        (None, label) => label.clone(),
    });
    // Separator under the title compartment
    unit.children.push(SubUnit {
        style: Style::new()
            .with("shape", "separator")
            .with("strokeColor", theme.resolve("shape-stroke")),
        fraction: Point::new(0.0, 0.0),
        offset: Point::new(0.0, TITLE_HEIGHT),
        width: shape.width,
        height: 0.0,
        label: None,
    });
    // One body row per Attribute prop, in declaration order
    for (row, prop) in shape
        .props
        .iter()
        .filter(|p| p.name == "Attribute")
        .enumerate()
    {
        if let Some(text) = prop.value.as_str() {
            unit.children.push(SubUnit {
                style: Style::new().with("shape", "attribute-row").with("align", "left"),
                fraction: Point::new(0.0, 0.0),
                offset: Point::new(4.0, TITLE_HEIGHT + 4.0 + row as f64 * 16.0),
                width: (shape.width - 8.0).max(0.0),
                height: 16.0,
                label: Some(text.to_string()),
            });
        }
    }
    unit
}

impl NotationTemplates for DomainTemplates {
    fn render_shape(&self, shape: &Shape, theme: &Theme) -> Option<VisualUnit> {
        let kind = ShapeKind::parse(&shape.shape_type)?;
        let unit = match kind {
            ShapeKind::Entity => compartmented(shape, theme, None),
            ShapeKind::Enumeration => compartmented(shape, theme, Some("enumeration")),
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
        if !unit.style.contains("endArrow") {
            let arrow = match conn.props.iter().find(|p| p.name == "RelationType") {
                Some(p) if p.value.as_str() == Some("Aggregation") => "diamond",
                Some(p) if p.value.as_str() == Some("Composition") => "diamond-filled",
                Some(p) if p.value.as_str() == Some("Generalization") => "triangle",
                _ => "open",
            };
            unit.style = unit.style.clone().with("endArrow", arrow);
        }
        unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_attribute_rows_in_order() {
        let shape: Shape = serde_json::from_value(serde_json::json!({
            "id": 1, "type": "Entity", "width": 120.0, "height": 90.0, "label": "Order",
            "props": [
                {"name": "Attribute", "value": "id: Long"},
                {"name": "Attribute", "value": "total: Money"}
            ]
        }))
        .expect("shape json");
        let unit = DomainTemplates
            .render_shape(&shape, &Theme::default())
            .expect("entity renders");
        let rows: Vec<&SubUnit> = unit
            .children
            .iter()
            .filter(|c| c.style.get("shape") == Some("attribute-row"))
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label.as_deref(), Some("id: Long"));
        assert!(rows[0].offset.y < rows[1].offset.y);
    }

    #[test]
    fn test_enumeration_stereotype_in_label() {
        let shape: Shape = serde_json::from_value(serde_json::json!({
            "id": 1, "type": "Enumeration", "label": "Status"
        }))
        .expect("shape json");
        let unit = DomainTemplates
            .render_shape(&shape, &Theme::default())
            .expect("enumeration renders");
        assert_eq!(unit.label.as_deref(), Some("\u{ab}enumeration\u{bb} Status"));
    }

    #[test]
    fn test_relation_type_selects_arrow() {
        let conn: Connection = serde_json::from_value(serde_json::json!({
            "id": 2, "sourceId": 1, "targetId": 3,
            "props": [{"name": "RelationType", "value": "Composition"}]
        }))
        .expect("connection json");
        let unit = DomainTemplates.connector(&conn, &Theme::default());
        assert_eq!(unit.style.get("endArrow"), Some("diamond-filled"));
    }
}
