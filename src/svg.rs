//! SVG export of a composed scene
//!
//! Every vertex renders as a `<path>` whose `d` string is built from its
//! absolute rectangle; edges render their waypoint polyline (or a cubic
//! curve when the composer produced control points). Output is
//! deterministic: rendering the same scene twice yields byte-identical
//! markup.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::geometry::{clamp_corner_radius, Point, Rect};
use crate::scene::{Cell, CellKind, Scene};
use crate::style::Style;

const DEFAULT_CORNER_RADIUS: f64 = 6.0;
const FONT_SIZE: f64 = 12.0;

/// Render a scene to a standalone SVG document.
///
/// `canvas` supplies the `viewBox`. The scene must not be inside an open
/// transactional update.
pub fn scene_to_svg(scene: &Scene, canvas: Rect) -> String {
    debug_assert!(!scene.in_update(), "cannot export a scene mid-update");

    let mut body = String::new();
    for &child in &scene.cell(scene.root()).children {
        render_cell(scene, child, &mut body);
    }

    let mut out = String::new();
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{} {} {} {}\">",
        num(canvas.x),
        num(canvas.y),
        num(canvas.width),
        num(canvas.height)
    );
    render_defs(scene, &mut out);
    out.push_str(&body);
    out.push_str("</svg>");
    out
}

/// Arrowhead `<marker>` definitions for every arrow name the scene uses
fn render_defs(scene: &Scene, out: &mut String) {
    let mut arrows: BTreeSet<String> = BTreeSet::new();
    for cell in scene.cells() {
        if cell.kind != CellKind::Edge {
            continue;
        }
        let style = cell.style();
        for key in ["startArrow", "endArrow"] {
            if let Some(name) = style.get(key) {
                arrows.insert(name.to_string());
            }
        }
    }
    if arrows.is_empty() {
        return;
    }
    out.push_str("<defs>");
    for name in &arrows {
        let (path, filled) = arrow_geometry(name);
        let fill = if filled { "context-stroke" } else { "none" };
        let _ = write!(
            out,
            "<marker id=\"arrow-{name}\" orient=\"auto\" markerWidth=\"12\" \
             markerHeight=\"12\" refX=\"9\" refY=\"5\">\
             <path d=\"{path}\" fill=\"{fill}\" stroke=\"context-stroke\"/></marker>",
        );
    }
    out.push_str("</defs>");
}

fn arrow_geometry(name: &str) -> (&'static str, bool) {
    match name {
        "open" => ("M 1 1 L 9 5 L 1 9", false),
        "triangle" => ("M 1 1 L 9 5 L 1 9 Z", false),
        "diamond" => ("M 1 5 L 5 1 L 9 5 L 5 9 Z", false),
        "diamond-filled" => ("M 1 5 L 5 1 L 9 5 L 5 9 Z", true),
        // "block" and anything unrecognized draw the solid default head
        _ => ("M 1 1 L 9 5 L 1 9 Z", true),
    }
}

fn render_cell(scene: &Scene, id: usize, out: &mut String) {
    let cell = scene.cell(id);
    match cell.kind {
        CellKind::Vertex => render_vertex(scene, cell, out),
        CellKind::Edge => render_edge(cell, out),
    }
    for &child in &cell.children {
        render_cell(scene, child, out);
    }
}

fn render_vertex(scene: &Scene, cell: &Cell, out: &mut String) {
    let origin = scene.absolute_origin(cell.id);
    let rect = Rect::new(
        origin.x,
        origin.y,
        cell.geometry.rect.width,
        cell.geometry.rect.height,
    );
    let style = cell.style();
    let shape = style.get("shape").unwrap_or("rectangle");

    if shape != "text" {
        let d = vertex_path(shape, &rect, &style);
        let _ = write!(out, "<path d=\"{d}\"");
        write_paint(&style, out);
        // Rotation pivots on the cell center
        if let Some(angle) = style.get("rotation") {
            let c = rect.center();
            let _ = write!(
                out,
                " transform=\"rotate({} {} {})\"",
                escape(angle),
                num(c.x),
                num(c.y)
            );
        }
        if !matches!(
            shape,
            "rectangle" | "ellipse" | "rhombus" | "triangle"
        ) {
            // Stencil primitives keep their class name for icon overlays
            let _ = write!(out, " data-shape=\"{}\"", escape(shape));
        }
        out.push_str("/>");
    }

    if let Some(label) = &cell.value {
        if !label.is_empty() {
            render_label(label, &rect, &style, out);
        }
    }
}

/// Path `d` for one styled primitive at an absolute rectangle
fn vertex_path(shape: &str, rect: &Rect, style: &Style) -> String {
    let rounded = style.get("rounded") == Some("1");
    match shape {
        "ellipse" => ellipse_path(rect),
        "rhombus" => rhombus_path(rect),
        "triangle" => triangle_path(rect),
        "rectangle" if rounded => rounded_rect_path(rect, DEFAULT_CORNER_RADIUS),
        _ => rect_path(rect),
    }
}

fn rect_path(r: &Rect) -> String {
    format!(
        "M {} {} L {} {} L {} {} L {} {} Z",
        num(r.x),
        num(r.y),
        num(r.right()),
        num(r.y),
        num(r.right()),
        num(r.bottom()),
        num(r.x),
        num(r.bottom())
    )
}

fn rounded_rect_path(r: &Rect, radius: f64) -> String {
    let rad = clamp_corner_radius(r, radius);
    let a = |out: &mut String, x: f64, y: f64| {
        let _ = write!(out, " A {} {} 0 0 1 {} {}", num(rad), num(rad), num(x), num(y));
    };
    let mut d = String::new();
    let _ = write!(d, "M {} {}", num(r.x + rad), num(r.y));
    let _ = write!(d, " L {} {}", num(r.right() - rad), num(r.y));
    a(&mut d, r.right(), r.y + rad);
    let _ = write!(d, " L {} {}", num(r.right()), num(r.bottom() - rad));
    a(&mut d, r.right() - rad, r.bottom());
    let _ = write!(d, " L {} {}", num(r.x + rad), num(r.bottom()));
    a(&mut d, r.x, r.bottom() - rad);
    let _ = write!(d, " L {} {}", num(r.x), num(r.y + rad));
    a(&mut d, r.x + rad, r.y);
    d.push_str(" Z");
    d
}

fn ellipse_path(r: &Rect) -> String {
    let c = r.center();
    let rx = r.width / 2.0;
    let ry = r.height / 2.0;
    format!(
        "M {} {} A {} {} 0 1 0 {} {} A {} {} 0 1 0 {} {} Z",
        num(r.x),
        num(c.y),
        num(rx),
        num(ry),
        num(r.right()),
        num(c.y),
        num(rx),
        num(ry),
        num(r.x),
        num(c.y)
    )
}

fn rhombus_path(r: &Rect) -> String {
    let c = r.center();
    format!(
        "M {} {} L {} {} L {} {} L {} {} Z",
        num(c.x),
        num(r.y),
        num(r.right()),
        num(c.y),
        num(c.x),
        num(r.bottom()),
        num(r.x),
        num(c.y)
    )
}

fn triangle_path(r: &Rect) -> String {
    let c = r.center();
    format!(
        "M {} {} L {} {} L {} {} Z",
        num(r.x),
        num(r.bottom()),
        num(c.x),
        num(r.y),
        num(r.right()),
        num(r.bottom())
    )
}

fn render_edge(cell: &Cell, out: &mut String) {
    let points = &cell.geometry.points;
    if points.is_empty() {
        return;
    }
    let style = cell.style();
    let d = edge_path(points, style.get("edgeStyle") == Some("curved"));

    let _ = write!(out, "<path d=\"{d}\" fill=\"none\"");
    write_stroke(&style, out);
    if let Some(name) = style.get("startArrow") {
        let _ = write!(out, " marker-start=\"url(#arrow-{})\"", escape(name));
    }
    if let Some(name) = style.get("endArrow") {
        let _ = write!(out, " marker-end=\"url(#arrow-{})\"", escape(name));
    }
    out.push_str("/>");

    if let Some(label) = &cell.value {
        if !label.is_empty() {
            let mid = edge_midpoint(points);
            let _ = write!(
                out,
                "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"{}\">{}</text>",
                num(mid.x),
                num(mid.y - 4.0),
                num(FONT_SIZE),
                escape(label)
            );
        }
    }
}

/// Polyline `d` for an edge; a four-point curved edge renders as one cubic
fn edge_path(points: &[Point], curved: bool) -> String {
    if curved && points.len() == 4 {
        return format!(
            "M {} {} C {} {} {} {} {} {}",
            num(points[0].x),
            num(points[0].y),
            num(points[1].x),
            num(points[1].y),
            num(points[2].x),
            num(points[2].y),
            num(points[3].x),
            num(points[3].y)
        );
    }
    let mut d = format!("M {} {}", num(points[0].x), num(points[0].y));
    for p in &points[1..] {
        let _ = write!(d, " L {} {}", num(p.x), num(p.y));
    }
    d
}

fn edge_midpoint(points: &[Point]) -> Point {
    let i = points.len() / 2;
    if points.len() % 2 == 0 {
        let a = points[i - 1];
        let b = points[i];
        Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
    } else {
        points[i]
    }
}

fn render_label(label: &str, rect: &Rect, style: &Style, out: &mut String) {
    let vertical = style.get("verticalAlign");
    let y = match vertical {
        Some("top") => rect.y + FONT_SIZE + 2.0,
        _ => rect.center().y + FONT_SIZE / 2.0 - 2.0,
    };
    let (x, anchor) = match style.get("align") {
        Some("left") => (rect.x + 4.0, "start"),
        Some("right") => (rect.right() - 4.0, "end"),
        _ => (rect.center().x, "middle"),
    };
    let color = style.get("fontColor").unwrap_or("#373737");
    let _ = write!(
        out,
        "<text x=\"{}\" y=\"{}\" text-anchor=\"{anchor}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        num(x),
        num(y),
        num(FONT_SIZE),
        escape(color),
        escape(label)
    );
}

fn write_paint(style: &Style, out: &mut String) {
    let _ = write!(
        out,
        " fill=\"{}\"",
        escape(style.get("fillColor").unwrap_or("none"))
    );
    if let Some(opacity) = style.get("fillOpacity") {
        let _ = write!(out, " fill-opacity=\"{}\"", escape(opacity));
    }
    write_stroke(style, out);
}

fn write_stroke(style: &Style, out: &mut String) {
    let _ = write!(
        out,
        " stroke=\"{}\"",
        escape(style.get("strokeColor").unwrap_or("none"))
    );
    if let Some(width) = style.get("strokeWidth") {
        let _ = write!(out, " stroke-width=\"{}\"", escape(width));
    }
    if style.get("dashed") == Some("1") {
        let pattern = style.get("dashPattern").unwrap_or("4 4");
        let _ = write!(out, " stroke-dasharray=\"{}\"", escape(pattern));
    }
    if let Some(opacity) = style.get("strokeOpacity") {
        let _ = write!(out, " stroke-opacity=\"{}\"", escape(opacity));
    }
}

/// Format a coordinate: rounded to 1/1000 and printed without a trailing
/// fractional part when whole, so `100.0` renders as `100`.
fn num(n: f64) -> String {
    let rounded = (n * 1000.0).round() / 1000.0;
    rounded.to_string()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::CellGeometry;

    fn style(pairs: &[(&str, &str)]) -> Style {
        let mut s = Style::new();
        for (k, v) in pairs {
            s = s.with(*k, *v);
        }
        s
    }

    #[test]
    fn test_rect_path_corners() {
        let d = rect_path(&Rect::new(100.0, 100.0, 100.0, 100.0));
        assert_eq!(d, "M 100 100 L 200 100 L 200 200 L 100 200 Z");
    }

    #[test]
    fn test_edge_path_polyline() {
        let points = vec![
            Point::new(51.0, 252.0),
            Point::new(51.0, 310.0),
            Point::new(150.0, 310.0),
            Point::new(150.0, 25.0),
            Point::new(350.0, 25.0),
            Point::new(350.0, 98.0),
        ];
        let d = edge_path(&points, false);
        assert_eq!(d, "M 51 252 L 51 310 L 150 310 L 150 25 L 350 25 L 350 98");
    }

    #[test]
    fn test_curved_edge_path_is_cubic() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(50.0, 60.0),
            Point::new(100.0, 60.0),
        ];
        let d = edge_path(&points, true);
        assert_eq!(d, "M 0 0 C 50 0 50 60 100 60");
    }

    #[test]
    fn test_num_trims_whole_values() {
        assert_eq!(num(100.0), "100");
        assert_eq!(num(2.5), "2.5");
        assert_eq!(num(0.1 + 0.2), "0.3");
    }

    #[test]
    fn test_rounded_rect_clamps_radius() {
        // 8x8 rect clamps the 6px default down to 4
        let d = rounded_rect_path(&Rect::new(0.0, 0.0, 8.0, 8.0), DEFAULT_CORNER_RADIUS);
        assert!(d.starts_with("M 4 0"), "{d}");
        assert!(d.contains("A 4 4 0 0 1"), "{d}");
    }

    #[test]
    fn test_scene_export_rectangle() {
        let mut scene = Scene::new();
        let root = scene.root();
        scene.insert_vertex(
            root,
            &style(&[
                ("shape", "rectangle"),
                ("fillColor", "#ffffff"),
                ("strokeColor", "#585858"),
            ]),
            CellGeometry::absolute(Rect::new(100.0, 100.0, 100.0, 100.0)),
            None,
        );
        let svg = scene_to_svg(&scene, Rect::new(0.0, 0.0, 800.0, 600.0));
        assert!(svg.contains("<path d=\"M 100 100 L 200 100 L 200 200 L 100 200 Z\""));
        assert!(svg.contains("viewBox=\"0 0 800 600\""));
        assert!(svg.contains("fill=\"#ffffff\""));
        assert!(svg.contains("stroke=\"#585858\""));
    }

    #[test]
    fn test_export_is_deterministic() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.insert_vertex(
            root,
            &style(&[("shape", "rectangle"), ("fillColor", "#fff"), ("strokeColor", "#000")]),
            CellGeometry::absolute(Rect::new(0.0, 0.0, 50.0, 50.0)),
            Some("A".to_string()),
        );
        scene.insert_edge(
            root,
            &style(&[("edgeStyle", "straight"), ("strokeColor", "#000"), ("endArrow", "block")]),
            vec![Point::new(50.0, 25.0), Point::new(120.0, 25.0)],
            None,
            Some(a),
            None,
        );
        let canvas = Rect::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(scene_to_svg(&scene, canvas), scene_to_svg(&scene, canvas));
    }

    #[test]
    fn test_arrow_defs_emitted_once_per_name() {
        let mut scene = Scene::new();
        let root = scene.root();
        for _ in 0..2 {
            scene.insert_edge(
                root,
                &style(&[("strokeColor", "#000"), ("endArrow", "block")]),
                vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
                None,
                None,
                None,
            );
        }
        let svg = scene_to_svg(&scene, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(svg.matches("<marker id=\"arrow-block\"").count(), 1);
        assert_eq!(svg.matches("marker-end=\"url(#arrow-block)\"").count(), 2);
    }

    #[test]
    fn test_rotation_applied_around_center() {
        let mut scene = Scene::new();
        let root = scene.root();
        scene.insert_vertex(
            root,
            &style(&[
                ("shape", "rectangle"),
                ("fillColor", "#fff"),
                ("strokeColor", "#000"),
                ("rotation", "45"),
            ]),
            CellGeometry::absolute(Rect::new(0.0, 0.0, 100.0, 50.0)),
            None,
        );
        let svg = scene_to_svg(&scene, Rect::new(0.0, 0.0, 200.0, 100.0));
        assert!(svg.contains("transform=\"rotate(45 50 25)\""), "{svg}");
    }

    #[test]
    fn test_label_escaped() {
        let mut scene = Scene::new();
        let root = scene.root();
        scene.insert_vertex(
            root,
            &style(&[("shape", "rectangle"), ("fillColor", "#fff"), ("strokeColor", "#000")]),
            CellGeometry::absolute(Rect::new(0.0, 0.0, 100.0, 40.0)),
            Some("a < b & c".to_string()),
        );
        let svg = scene_to_svg(&scene, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(svg.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_stencil_shape_keeps_data_attribute() {
        let mut scene = Scene::new();
        let root = scene.root();
        scene.insert_vertex(
            root,
            &style(&[("shape", "actor"), ("fillColor", "#fff"), ("strokeColor", "#000")]),
            CellGeometry::absolute(Rect::new(0.0, 0.0, 40.0, 80.0)),
            None,
        );
        let svg = scene_to_svg(&scene, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(svg.contains("data-shape=\"actor\""));
    }

    #[test]
    fn test_text_cell_renders_no_outline() {
        let mut scene = Scene::new();
        let root = scene.root();
        scene.insert_vertex(
            root,
            &style(&[("shape", "text"), ("fontColor", "#373737")]),
            CellGeometry::absolute(Rect::new(10.0, 10.0, 80.0, 20.0)),
            Some("caption".to_string()),
        );
        let svg = scene_to_svg(&scene, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(!svg.contains("data-shape"));
        assert!(svg.contains(">caption</text>"));
    }
}
